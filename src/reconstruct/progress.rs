//! Progress reporting and cooperative cancellation.
//!
//! The pipeline reports at stage boundaries only, so the callback cost is
//! negligible and a cancellation request takes effect between stages, never
//! inside one.

/// Receives stage-boundary progress and answers cancellation polls.
pub trait ProgressSink {
    /// Called when a stage completes. `percent` is a coarse 0..=100 value.
    fn report(&mut self, percent: u8, stage: &str);

    /// Polled before each stage; returning `true` stops the pipeline after
    /// the stages already completed.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Sink that ignores progress and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8, _stage: &str) {}
}
