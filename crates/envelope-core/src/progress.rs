/// Optional progress/cancellation capability consumed by the
/// evolution loop (spec §6). Reporting never changes the computation;
/// `break_requested` is the only method whose return value affects
/// control flow (the cancellation check between iterations, spec
/// §4.7/§5).
pub trait ProgressListener: Send + Sync {
    /// One call per iteration-level step (e.g. "evaluate", "admit").
    fn step(&self, _text: &str) {}

    /// Finer-grained progress within a step, e.g. per-individual.
    fn substep(&self, _level: usize, _text: &str) {}

    /// Polled between iterations; `true` requests a clean stop.
    fn break_requested(&self) -> bool {
        false
    }
}

/// The default listener: reports nothing, never requests a break.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressListener;

impl ProgressListener for NullProgressListener {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct CancelAfterFirstPoll(AtomicBool);

    impl ProgressListener for CancelAfterFirstPoll {
        fn break_requested(&self) -> bool {
            !self.0.swap(true, Ordering::SeqCst)
        }
    }

    #[test]
    fn null_listener_never_requests_break() {
        let listener = NullProgressListener;
        assert!(!listener.break_requested());
        listener.step("evaluate");
        listener.substep(0, "individual 3");
    }

    #[test]
    fn custom_listener_can_request_break() {
        let listener = CancelAfterFirstPoll(AtomicBool::new(false));
        assert!(listener.break_requested());
    }
}
