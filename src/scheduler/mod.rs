//! Conflict-free schedule enumeration.
//!
//! Given course offerings, produces every combination of one option per
//! course whose sections are pairwise free of day/time overlap.
//!
//! # Strategies
//!
//! - **Brute force** (`cartesian`): walks the full cartesian product and
//!   filters each complete combination pairwise.
//! - **Backtracking** (`backtracking`): depth-first over courses in input
//!   order, pruning an option as soon as it overlaps an earlier choice.
//!
//! Both strategies visit combinations in the same order (first course
//! outermost, last course varying fastest), so for identical input they
//! return identical schedules. Only `total_combinations` differs: the
//! cartesian size for brute force, explored search nodes for backtracking.
//!
//! # Limits
//! `limit: None` is unbounded (beware cartesian blow-up); `Some(0)` returns
//! immediately with no schedules. There is no cancellation: callers cap
//! cost with `limit`.

mod backtracking;
mod cartesian;

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::models::{Course, GeneratedSchedule, GenerationResult, OptionGrouping, ScheduleOption};
use crate::overlap::overlaps;

/// Enumeration strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Cartesian product, then pairwise filter.
    BruteForce,
    /// Depth-first search with early pruning.
    #[default]
    Backtracking,
}

/// Options for [`generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Maximum schedules to return. `None` = unbounded.
    pub limit: Option<usize>,
    /// Enumeration strategy.
    pub strategy: Strategy,
    /// How sections become options.
    pub grouping: OptionGrouping,
    /// Prefix for generated schedule IDs.
    pub id_prefix: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            limit: None,
            strategy: Strategy::Backtracking,
            grouping: OptionGrouping::PerSection,
            id_prefix: "schedule".into(),
        }
    }
}

impl GenerateOptions {
    /// Sets the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the option grouping.
    pub fn with_grouping(mut self, grouping: OptionGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Sets the schedule ID prefix.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }
}

/// Enumerates conflict-free schedules.
///
/// Zero courses yield zero schedules. A course with no options makes every
/// combination impossible and also yields zero schedules.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Course, Section, TimeSlot};
/// use u_timetable::scheduler::{generate, GenerateOptions};
///
/// let courses = vec![
///     Course::new("CS301", "Algorithms").with_credits(3).with_section(
///         Section::new("A", "CS301").with_time(TimeSlot::new("Mon", "09:00", "09:50")),
///     ),
///     Course::new("CS302", "Databases").with_credits(3).with_section(
///         Section::new("C", "CS302").with_time(TimeSlot::new("Mon", "10:00", "10:50")),
///     ),
/// ];
/// let result = generate(&courses, &GenerateOptions::default());
/// assert_eq!(result.valid_count, 1);
/// assert_eq!(result.schedules[0].total_credits, 6);
/// ```
pub fn generate(courses: &[Course], options: &GenerateOptions) -> GenerationResult {
    let started = Instant::now();

    if courses.is_empty() || options.limit == Some(0) {
        debug!(
            courses = courses.len(),
            limit = ?options.limit,
            "schedule generation skipped"
        );
        return GenerationResult::empty(courses.len());
    }

    let lists: Vec<Vec<ScheduleOption>> =
        courses.iter().map(|c| c.options(options.grouping)).collect();
    let mut collector = Collector::new(courses, options);

    let total_combinations = match options.strategy {
        Strategy::BruteForce => cartesian::enumerate(&lists, &mut collector),
        Strategy::Backtracking => backtracking::enumerate(&lists, &mut collector),
    };

    let schedules = collector.into_schedules();
    let generation_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    debug!(
        courses = courses.len(),
        strategy = ?options.strategy,
        total_combinations,
        valid = schedules.len(),
        generation_ms,
        "schedule generation finished"
    );

    GenerationResult {
        valid_count: schedules.len(),
        schedules,
        total_combinations,
        generation_ms,
        courses_count: courses.len(),
    }
}

/// Brute-force generation.
pub fn generate_brute_force(courses: &[Course], limit: Option<usize>) -> GenerationResult {
    let options = GenerateOptions {
        limit,
        strategy: Strategy::BruteForce,
        ..Default::default()
    };
    generate(courses, &options)
}

/// Backtracking generation.
pub fn generate_backtracking(courses: &[Course], limit: Option<usize>) -> GenerationResult {
    let options = GenerateOptions {
        limit,
        strategy: Strategy::Backtracking,
        ..Default::default()
    };
    generate(courses, &options)
}

/// Independently re-checks that no two options in a schedule overlap.
pub fn is_conflict_free(schedule: &GeneratedSchedule) -> bool {
    let opts = &schedule.options;
    opts.iter()
        .enumerate()
        .all(|(i, a)| opts[i + 1..].iter().all(|b| !options_conflict(a, b)))
}

/// Whether any section of `a` overlaps any section of `b`.
pub(crate) fn options_conflict(a: &ScheduleOption, b: &ScheduleOption) -> bool {
    a.sections
        .iter()
        .any(|x| b.sections.iter().any(|y| overlaps(&x.times, &y.times)))
}

/// Accumulates valid combinations up to the limit.
struct Collector<'a> {
    courses: &'a [Course],
    limit: Option<usize>,
    id_prefix: &'a str,
    schedules: Vec<GeneratedSchedule>,
}

impl<'a> Collector<'a> {
    fn new(courses: &'a [Course], options: &'a GenerateOptions) -> Self {
        Self {
            courses,
            limit: options.limit,
            id_prefix: &options.id_prefix,
            schedules: Vec::new(),
        }
    }

    /// Records a combination (`choice[i]` indexes course i's options).
    ///
    /// Returns `true` once the limit is reached.
    fn push(&mut self, lists: &[Vec<ScheduleOption>], choice: &[usize]) -> bool {
        let options: Vec<ScheduleOption> = choice
            .iter()
            .enumerate()
            .map(|(course, &opt)| lists[course][opt].clone())
            .collect();
        let total_credits = self.courses.iter().map(|c| c.credits).sum();

        self.schedules.push(GeneratedSchedule {
            id: format!("{}-{}", self.id_prefix, self.schedules.len() + 1),
            options,
            total_credits,
        });
        self.is_full()
    }

    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.schedules.len() >= limit)
    }

    fn into_schedules(self) -> Vec<GeneratedSchedule> {
        self.schedules
    }
}
