//! A parallel multi-objective evolutionary optimization engine over
//! bit-string chromosomes, implementing the PESA and NSGA-II
//! algorithms against a shared archive, variation stage, and
//! resumable log store.
//!
//! Bring your own problem by implementing [`Genetics`], build an
//! [`Engine`] from an [`EngineConfig`] with [`EngineBuilder`], and
//! call [`Engine::run`] (or [`resume`] as a shorthand for `run(true)`).

pub use envelope_core::*;
pub use envelope_engine::*;
pub use envelope_error::{EnvelopeError, Result};
pub use envelope_log::{decode_record, encode_record, Header};

/// Equivalent to `engine.run(true)` (spec §6's `resume()` entry point).
pub fn resume<P: std::fmt::Debug, G: Genetics<P> + 'static>(engine: &Engine<P, G>) -> Result<RunOutcome> {
    engine.run(true)
}
