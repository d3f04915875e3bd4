//! Reconstruction pipeline: parameters, progress, timing and orchestration.

mod params;
mod pipeline;
mod progress;
mod report;

pub use params::{ColonyParams, ReconParams, TwinParams};
pub use pipeline::Reconstructor;
pub use progress::{NoProgress, ProgressSink};
pub use report::{StageTiming, TimingBreakdown};
