//! Typed errors.
//!
//! Expected scheduling outcomes (no schedules, no candidates, a failed
//! auto-resolution) are ordinary return values. The errors here cover
//! input that cannot be interpreted when the caller asks for strictness,
//! and the reasons a resolver request did not apply.

use thiserror::Error;

/// Failure to parse an `"HH:MM"` clock string strictly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    /// Input was empty or whitespace.
    #[error("empty time string")]
    Empty,

    /// No `:` separator between hours and minutes.
    #[error("missing ':' separator in time '{0}'")]
    MissingSeparator(String),

    /// Hours or minutes were not a non-negative integer.
    #[error("non-numeric component in time '{0}'")]
    NotNumeric(String),

    /// Hour outside 0..=23 or minute outside 0..=59.
    #[error("time '{0}' is out of range")]
    OutOfRange(String),
}

/// Reason a resolution could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    /// No section with this `course/id` label is in the schedule.
    #[error("section '{0}' not found in the schedule")]
    SectionNotFound(String),

    /// The conflict lists no section entity to move.
    #[error("conflict '{0}' does not reference any section")]
    NoTargetSection(String),

    /// Every candidate scored below the acceptability floor.
    #[error("no candidate reaches the acceptability floor of {floor}")]
    NoAcceptableCandidate {
        /// Best score seen, `None` when there were no candidates at all.
        best_score: Option<u8>,
        floor: u8,
    },

    /// A manual action with neither a new slot nor a new room.
    #[error("manual action for section '{0}' changes nothing")]
    EmptyAction(String),

    /// `replace_slot` points past the section's meetings.
    #[error("section '{section}' has no meeting at index {index}")]
    SlotIndexOutOfRange { section: String, index: usize },
}
