//! Generated schedule models.
//!
//! A `GeneratedSchedule` is one conflict-free candidate timetable: exactly
//! one `ScheduleOption` per input course. Candidates are created by the
//! enumerator and never mutated afterwards.

use serde::{Deserialize, Serialize};

use super::Section;

/// The chosen section(s) for one course within a candidate schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOption {
    /// Course code.
    pub course_code: String,
    /// Course display name.
    pub course_name: String,
    /// Chosen sections (one, or one per role when grouped).
    pub sections: Vec<Section>,
}

impl ScheduleOption {
    /// Creates an option.
    pub fn new(
        course_code: impl Into<String>,
        course_name: impl Into<String>,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            course_code: course_code.into(),
            course_name: course_name.into(),
            sections,
        }
    }

    /// All meeting slots across the option's sections.
    pub fn times(&self) -> impl Iterator<Item = &super::TimeSlot> {
        self.sections.iter().flat_map(|s| s.times.iter())
    }
}

/// One complete, conflict-free candidate timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    /// Identifier, `"{prefix}-{n}"` in discovery order.
    pub id: String,
    /// One option per input course, in course input order.
    pub options: Vec<ScheduleOption>,
    /// Credit total for the candidate.
    pub total_credits: u32,
}

impl GeneratedSchedule {
    /// IDs of every chosen section, in option order.
    pub fn section_ids(&self) -> Vec<&str> {
        self.sections().map(|s| s.id.as_str()).collect()
    }

    /// Every chosen section, in option order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.options.iter().flat_map(|o| o.sections.iter())
    }

    /// Option chosen for a course.
    pub fn option_for(&self, course_code: &str) -> Option<&ScheduleOption> {
        self.options.iter().find(|o| o.course_code == course_code)
    }
}

/// Output of a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Valid candidates, in deterministic discovery order.
    pub schedules: Vec<GeneratedSchedule>,
    /// Brute force: cartesian size. Backtracking: search nodes explored.
    pub total_combinations: u64,
    /// Number of schedules returned.
    pub valid_count: usize,
    /// Wall-clock generation time (ms).
    pub generation_ms: u64,
    /// Number of input courses.
    pub courses_count: usize,
}

impl GenerationResult {
    /// An empty result for `courses_count` courses.
    pub fn empty(courses_count: usize) -> Self {
        Self {
            courses_count,
            ..Default::default()
        }
    }

    /// Whether no schedule was produced.
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}
