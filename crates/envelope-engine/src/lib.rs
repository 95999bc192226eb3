//! The archive manager, variation stage, front-file writer, and
//! evolution loop (C5, C6, C7) that drive the PESA and NSGA-II
//! algorithms over the primitives in `envelope-core`.

mod archive;
mod engine;
mod front_file;
mod variation;

pub use archive::{AdmissionOutcome, AdmissionReport, Archive};
pub use engine::{Engine, EngineBuilder, RunOutcome};
pub use front_file::write_front_file;
pub use variation::{mutation_rate_at, produce_children, tournament};

/// Installs a `tracing-subscriber` formatting layer so the
/// `tracing::debug!`/`info!`/`warn!`/`error!` calls `Engine::run`
/// emits per iteration (spec §4.7 "Progress reporting") are actually
/// visible to a caller who hasn't installed their own subscriber.
/// Idempotent — safe to call from every test or example that wants
/// engine logging on screen.
pub fn init_logging() {
    use std::sync::Once;
    static INIT_LOGGING: Once = Once::new();

    INIT_LOGGING.call_once(|| {
        use tracing_subscriber::fmt::format::FmtSpan;
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        std::panic::set_hook(Box::new(|info| {
            tracing::error!("PANIC: {}", info);
        }));

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                    .with_target(false)
                    .with_level(true)
                    .compact(),
            )
            .init();
    });
}
