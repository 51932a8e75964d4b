//! Serializable run summaries returned by the pipeline and written by the
//! demos.

pub mod report;
pub mod timing;

pub use report::{
    DegenerateRecord, FitStage, InputDescriptor, MatchingStage, PlaneRecord, RefinementStage,
    StereoReport,
};
pub use timing::{StageTiming, TimingBreakdown};
