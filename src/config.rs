//! Tunable configuration for detection, scoring and resolution.
//!
//! Every component receives its configuration as an explicit argument;
//! nothing is read from the environment. All structs implement `Default`
//! and deserialize with missing fields falling back to defaults, so hosts
//! may keep them in JSON alongside their own settings.
//!
//! The default constants are policy, not invariants: only their relative
//! ordering (more deviation ⇒ lower score, double-booking ⇒ blocking) is
//! relied on.

use serde::{Deserialize, Serialize};

use crate::models::{format_time, Room, Severity, TimeSlot, Weekday};

/// Penalty weights for candidate scoring. All deductions from 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Candidate day not in the preferred set.
    pub non_preferred_day: u32,
    /// Candidate day differs from the section's current day.
    pub day_change: u32,
    /// Per started hour before `core_start`.
    pub early_per_hour: u32,
    /// Per started hour after `core_end`.
    pub late_per_hour: u32,
    /// Per 100% of seats beyond the required capacity.
    pub capacity_waste: u32,
    /// Cap on the capacity waste penalty.
    pub max_capacity_waste: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            non_preferred_day: 20,
            day_change: 5,
            early_per_hour: 10,
            late_per_hour: 10,
            capacity_waste: 20,
            max_capacity_waste: 60,
        }
    }
}

/// Candidate scoring preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Preferred days. Empty = no day preference.
    pub preferred_days: Vec<Weekday>,
    /// Start of core teaching hours, `"HH:MM"`.
    pub core_start: String,
    /// End of core teaching hours, `"HH:MM"`.
    pub core_end: String,
    /// Penalty weights.
    pub weights: ScoringWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            preferred_days: Vec::new(),
            core_start: "08:00".into(),
            core_end: "18:00".into(),
            weights: ScoringWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Sets preferred days.
    pub fn with_preferred_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.preferred_days = days.into_iter().collect();
        self
    }

    /// Sets core teaching hours.
    pub fn with_core_hours(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.core_start = start.into();
        self.core_end = end.into();
        self
    }

    /// Sets penalty weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Bounded universe of candidate slots and rooms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionGrid {
    /// Candidate meeting slots.
    pub time_slots: Vec<TimeSlot>,
    /// Candidate rooms.
    pub rooms: Vec<Room>,
}

impl SuggestionGrid {
    /// Creates a grid.
    pub fn new(time_slots: Vec<TimeSlot>, rooms: Vec<Room>) -> Self {
        Self { time_slots, rooms }
    }

    /// Standard class-period grid: Monday-Friday, 50-minute periods on
    /// the hour from 08:00 to 17:50.
    pub fn standard(rooms: Vec<Room>) -> Self {
        let time_slots = Weekday::WORKWEEK
            .iter()
            .flat_map(|&day| {
                (8..18).map(move |hour| {
                    TimeSlot::new(day.short_name(), format_time(hour * 60), format_time(hour * 60 + 50))
                })
            })
            .collect();
        Self { time_slots, rooms }
    }

    /// Whether the grid offers no candidates at all.
    pub fn is_empty(&self) -> bool {
        self.time_slots.is_empty() && self.rooms.is_empty()
    }
}

/// Severity assigned to each conflict kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityPolicy {
    pub room_double_booking: Severity,
    pub instructor_double_booking: Severity,
    pub student_overlap: Severity,
    pub over_capacity: Severity,
    pub near_capacity: Severity,
    pub back_to_back: Severity,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self {
            room_double_booking: Severity::Critical,
            instructor_double_booking: Severity::Critical,
            student_overlap: Severity::Error,
            over_capacity: Severity::Error,
            near_capacity: Severity::Warning,
            back_to_back: Severity::Info,
        }
    }
}

/// Conflict detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Severity per conflict kind.
    pub severity: SeverityPolicy,
    /// Enrolment ratio at which a capacity warning is raised.
    pub near_capacity_ratio: f64,
    /// Same-day gaps below this (minutes) are reported as back-to-back.
    /// Zero disables back-to-back notices.
    pub back_to_back_gap_minutes: u32,
    /// Candidate universe for auto-resolvability checks.
    pub grid: SuggestionGrid,
    /// Scoring used by auto-resolvability checks and hints.
    pub scoring: ScoringConfig,
    /// Maximum hints attached to each conflict.
    pub max_hints: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            severity: SeverityPolicy::default(),
            near_capacity_ratio: 0.9,
            back_to_back_gap_minutes: 10,
            grid: SuggestionGrid::default(),
            scoring: ScoringConfig::default(),
            max_hints: 3,
        }
    }
}

impl DetectorConfig {
    /// Sets the candidate grid.
    pub fn with_grid(mut self, grid: SuggestionGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the scoring preferences.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Sets the severity policy.
    pub fn with_severity(mut self, severity: SeverityPolicy) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the near-capacity warning ratio.
    pub fn with_near_capacity_ratio(mut self, ratio: f64) -> Self {
        self.near_capacity_ratio = ratio;
        self
    }

    /// Sets the back-to-back gap threshold.
    pub fn with_back_to_back_gap(mut self, minutes: u32) -> Self {
        self.back_to_back_gap_minutes = minutes;
        self
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Candidate universe.
    pub grid: SuggestionGrid,
    /// Scoring preferences.
    pub scoring: ScoringConfig,
    /// Candidates scoring below this are not applied automatically.
    pub min_acceptable_score: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            grid: SuggestionGrid::default(),
            scoring: ScoringConfig::default(),
            min_acceptable_score: 50,
        }
    }
}

impl ResolverConfig {
    /// Sets the candidate grid.
    pub fn with_grid(mut self, grid: SuggestionGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the scoring preferences.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Sets the acceptability floor.
    pub fn with_min_score(mut self, score: u8) -> Self {
        self.min_acceptable_score = score;
        self
    }
}

impl From<&DetectorConfig> for ResolverConfig {
    fn from(config: &DetectorConfig) -> Self {
        Self {
            grid: config.grid.clone(),
            scoring: config.scoring.clone(),
            ..Default::default()
        }
    }
}
