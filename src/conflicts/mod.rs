//! Conflict detection, alternative scoring and resolution.
//!
//! Works on an already-assembled list of [`ScheduledSection`]s, whether it
//! came from the [`scheduler`](crate::scheduler) or from a published
//! timetable.
//!
//! | Step | Function |
//! |------|----------|
//! | Detect | [`detect`] → `Vec<ScheduleConflict>` |
//! | Rank alternatives | [`suggest`] / [`viability`] |
//! | Resolve | [`resolve`] → [`AppliedResolution`], then [`apply`] |
//!
//! After applying a resolution, run [`detect`] again on the updated list.
//!
//! [`ScheduledSection`]: crate::models::ScheduledSection

mod detector;
mod resolver;
mod suggest;

pub use detector::{detect, has_blocking, summarize, ConflictSummary};
pub use resolver::{
    apply, resolve, AppliedResolution, ManualAction, ResolutionChange, ResolutionOutcome,
    ResolutionRequest,
};
pub use suggest::{required_capacity, suggest, viability, MovePlan, Occupancy, Viability};
