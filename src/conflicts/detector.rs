//! Conflict detection over an assembled schedule.
//!
//! # Algorithm
//! For every unordered pair `(i, j)`, `i < j` in input order:
//! - overlapping meetings + shared cohort ⇒ `Time`
//! - overlapping meetings + same room ⇒ `Room`
//! - overlapping meetings + same instructor ⇒ `Instructor`
//!
//! A shared resource is reported under its own kind, never also as
//! `Time`; one overlapping pair can yield several conflicts.
//! - no overlap, but a same-day gap below the threshold with a shared
//!   instructor or cohort ⇒ `BackToBack`
//!
//! Then, per section, enrolment against capacity ⇒ `Capacity`.
//!
//! The later section of a pair (`j`) is the one proposed to move; its
//! alternatives decide `auto_resolvable` and feed the hint text.
//!
//! # Complexity
//! O(n²) pair checks plus one occupancy scan per emitted conflict.

use tracing::debug;

use super::suggest::{required_capacity, suggest, viability, MovePlan};
use crate::config::DetectorConfig;
use crate::models::{
    same_resource, AffectedEntity, ConflictType, ScheduleConflict, ScheduledSection, Severity,
};
use crate::overlap::{gap_minutes, overlaps};

/// Detects conflicts among `sections`.
///
/// Conflicts are emitted pair by pair in input order, then capacity
/// conflicts; IDs are `conflict-1`, `conflict-2`, ... in that order.
pub fn detect(sections: &[ScheduledSection], config: &DetectorConfig) -> Vec<ScheduleConflict> {
    let mut conflicts = Vec::new();

    for (i, a) in sections.iter().enumerate() {
        for b in &sections[i + 1..] {
            detect_pair(a, b, sections, config, &mut conflicts);
        }
    }
    for s in sections {
        if let Some(c) = capacity_conflict(s, sections, config) {
            conflicts.push(c);
        }
    }

    for (n, c) in conflicts.iter_mut().enumerate() {
        c.id = format!("conflict-{}", n + 1);
    }

    debug!(
        sections = sections.len(),
        conflicts = conflicts.len(),
        blocking = conflicts.iter().filter(|c| c.severity.is_blocking()).count(),
        "conflict detection finished"
    );
    conflicts
}

/// Counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflictSummary {
    pub critical: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub auto_resolvable: usize,
}

impl ConflictSummary {
    /// Total conflicts counted.
    pub fn total(&self) -> usize {
        self.critical + self.error + self.warning + self.info
    }
}

/// Summarizes a conflict list.
pub fn summarize(conflicts: &[ScheduleConflict]) -> ConflictSummary {
    let mut summary = ConflictSummary::default();
    for c in conflicts {
        match c.severity {
            Severity::Critical => summary.critical += 1,
            Severity::Error => summary.error += 1,
            Severity::Warning => summary.warning += 1,
            Severity::Info => summary.info += 1,
        }
        if c.auto_resolvable {
            summary.auto_resolvable += 1;
        }
    }
    summary
}

/// Whether any conflict is error or critical.
pub fn has_blocking(conflicts: &[ScheduleConflict]) -> bool {
    conflicts.iter().any(|c| c.severity.is_blocking())
}

fn detect_pair(
    a: &ScheduledSection,
    b: &ScheduledSection,
    all: &[ScheduledSection],
    config: &DetectorConfig,
    out: &mut Vec<ScheduleConflict>,
) {
    let policy = &config.severity;

    if overlaps(&a.section.times, &b.section.times) {
        if a.shares_cohort(b) {
            let shared: Vec<&str> = a
                .cohorts
                .iter()
                .filter(|c| b.cohorts.iter().any(|o| same_resource(c, o)))
                .map(String::as_str)
                .collect();
            out.push(pair_conflict(
                ConflictType::Time,
                policy.student_overlap,
                "Student time clash".into(),
                format!(
                    "{} and {} meet at the same time and share cohort(s) {}",
                    a.label(),
                    b.label(),
                    shared.join(", ")
                ),
                a,
                b,
                None,
                all,
                config,
            ));
        }
        if a.shares_room(b) {
            out.push(pair_conflict(
                ConflictType::Room,
                policy.room_double_booking,
                "Room double-booked".into(),
                format!(
                    "Room {} is booked by {} and {} at the same time",
                    a.section.room.trim(),
                    a.label(),
                    b.label()
                ),
                a,
                b,
                Some(AffectedEntity::room(&a.section.room)),
                all,
                config,
            ));
        }
        if a.shares_instructor(b) {
            out.push(pair_conflict(
                ConflictType::Instructor,
                policy.instructor_double_booking,
                "Instructor double-booked".into(),
                format!(
                    "{} teaches {} and {} at the same time",
                    a.section.instructor.trim(),
                    a.label(),
                    b.label()
                ),
                a,
                b,
                Some(AffectedEntity::instructor(&a.section.instructor)),
                all,
                config,
            ));
        }
        return;
    }

    let threshold = config.back_to_back_gap_minutes;
    if threshold == 0 || !(a.shares_instructor(b) || a.shares_cohort(b)) {
        return;
    }
    if let Some(gap) = gap_minutes(&a.section.times, &b.section.times) {
        if gap < threshold {
            let who = if a.shares_instructor(b) {
                a.section.instructor.trim().to_string()
            } else {
                "Students".to_string()
            };
            let extra = a
                .shares_instructor(b)
                .then(|| AffectedEntity::instructor(&a.section.instructor));
            out.push(pair_conflict(
                ConflictType::BackToBack,
                policy.back_to_back,
                "Back-to-back meetings".into(),
                format!(
                    "{who} have {gap} minute(s) between {} and {} (minimum {threshold})",
                    a.label(),
                    b.label()
                ),
                a,
                b,
                extra,
                all,
                config,
            ));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn pair_conflict(
    conflict_type: ConflictType,
    severity: Severity,
    title: String,
    description: String,
    a: &ScheduledSection,
    b: &ScheduledSection,
    extra: Option<AffectedEntity>,
    all: &[ScheduledSection],
    config: &DetectorConfig,
) -> ScheduleConflict {
    let mut affected_entities = vec![AffectedEntity::section(a), AffectedEntity::section(b)];
    affected_entities.extend(extra);

    let (auto_resolvable, resolution_suggestions) = assess(conflict_type, b, all, config);

    ScheduleConflict {
        id: String::new(),
        conflict_type,
        severity,
        title,
        description,
        affected_entities,
        resolution_suggestions,
        auto_resolvable,
    }
}

fn capacity_conflict(
    s: &ScheduledSection,
    all: &[ScheduledSection],
    config: &DetectorConfig,
) -> Option<ScheduleConflict> {
    let enrolled = s.enrolled?;
    let capacity = s.section.capacity;
    // Capacity 0 means unknown.
    if capacity == 0 {
        return None;
    }

    let (severity, title, description) = if enrolled > capacity {
        (
            config.severity.over_capacity,
            "Section over capacity",
            format!("{} has {enrolled} enrolled for {capacity} seats", s.label()),
        )
    } else if f64::from(enrolled) >= config.near_capacity_ratio * f64::from(capacity) {
        (
            config.severity.near_capacity,
            "Section near capacity",
            format!(
                "{} is at {enrolled}/{capacity} seats ({:.0}%)",
                s.label(),
                100.0 * f64::from(enrolled) / f64::from(capacity)
            ),
        )
    } else {
        return None;
    };

    let mut affected_entities = vec![AffectedEntity::section(s)];
    if !s.section.room.trim().is_empty() {
        affected_entities.push(AffectedEntity::room(&s.section.room));
    }
    let (auto_resolvable, resolution_suggestions) = assess(ConflictType::Capacity, s, all, config);

    Some(ScheduleConflict {
        id: String::new(),
        conflict_type: ConflictType::Capacity,
        severity,
        title: title.into(),
        description,
        affected_entities,
        resolution_suggestions,
        auto_resolvable,
    })
}

/// Auto-resolvability and hint text for moving `target`.
fn assess(
    conflict_type: ConflictType,
    target: &ScheduledSection,
    all: &[ScheduledSection],
    config: &DetectorConfig,
) -> (bool, Vec<String>) {
    if conflict_type == ConflictType::BackToBack {
        return (
            false,
            vec![format!(
                "Leave at least {} minutes between consecutive meetings",
                config.back_to_back_gap_minutes
            )],
        );
    }

    let occ = MovePlan::new(target, all).occupancy;
    let required = required_capacity(target);
    let section = &target.section;
    let v = viability(section, &occ.slots, &occ.rooms, required, &config.grid);

    let auto_resolvable = match conflict_type {
        ConflictType::Room => v.room || v.time_slot,
        ConflictType::Capacity => v.room,
        _ => v.time_slot,
    };

    let mut hints = Vec::new();
    if auto_resolvable && config.max_hints > 0 {
        let s = suggest(section, &occ.slots, &occ.rooms, required, &config.grid, &config.scoring);
        let wants_rooms = matches!(conflict_type, ConflictType::Room | ConflictType::Capacity);
        let wants_slots = conflict_type != ConflictType::Capacity;
        if wants_rooms {
            hints.extend(s.rooms.iter().map(|r| {
                format!("Move {} to room {} (score {}): {}", target.label(), r.room_id, r.score, r.reason)
            }));
        }
        if wants_slots {
            hints.extend(s.time_slots.iter().map(|t| {
                format!("Move {} to {} (score {}): {}", target.label(), t.slot, t.score, t.reason)
            }));
        }
        hints.truncate(config.max_hints);
    }
    if !auto_resolvable {
        hints.push(match conflict_type {
            ConflictType::Capacity => format!(
                "No free room seats {required}; raise capacity or split {}",
                target.label()
            ),
            _ => format!("No free alternative for {} in the candidate grid; resolve manually", target.label()),
        });
    }

    (auto_resolvable, hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuggestionGrid;
    use crate::models::{EntityType, Room, Section, TimeSlot};
    use pretty_assertions::assert_eq;

    fn placed(id: &str, course: &str, room: &str, instructor: &str, slot: TimeSlot) -> ScheduledSection {
        ScheduledSection::new(
            Section::new(id, course)
                .with_room(room)
                .with_instructor(instructor)
                .with_capacity(30)
                .with_time(slot),
        )
    }

    fn grid_config() -> DetectorConfig {
        DetectorConfig::default().with_grid(SuggestionGrid::standard(vec![
            Room::new("101", 30),
            Room::new("201", 60),
        ]))
    }

    #[test]
    fn test_room_conflict_references_both_sections() {
        let sections = vec![
            placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50")),
            placed("C", "CS302", "101", "Z", TimeSlot::new("Mon", "09:30", "10:20")),
        ];
        let conflicts = detect(&sections, &DetectorConfig::default());
        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!(c.conflict_type, ConflictType::Room);
        assert_eq!(c.severity, Severity::Critical);
        assert_eq!(c.section_ids(), vec!["A", "C"]);
        assert_eq!(c.affected_entities[2].entity_type, EntityType::Room);
        assert_eq!(c.id, "conflict-1");
    }

    #[test]
    fn test_disjoint_schedule_has_no_conflicts() {
        let sections = vec![
            placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50")),
            placed("B", "CS302", "102", "Y", TimeSlot::new("Tue", "09:00", "09:50")),
            placed("C", "CS303", "103", "Z", TimeSlot::new("Mon", "09:00", "09:50")),
        ];
        assert!(detect(&sections, &grid_config()).is_empty());
    }

    #[test]
    fn test_instructor_and_room_conflicts_from_one_pair() {
        let sections = vec![
            placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50")),
            placed("B", "CS301", "101", "x", TimeSlot::new("Mon", "09:00", "09:50")),
        ];
        let conflicts = detect(&sections, &DetectorConfig::default());
        let kinds: Vec<ConflictType> = conflicts.iter().map(|c| c.conflict_type).collect();
        assert_eq!(kinds, vec![ConflictType::Room, ConflictType::Instructor]);
        assert!(has_blocking(&conflicts));
        assert_eq!(conflicts[1].id, "conflict-2");
    }

    #[test]
    fn test_time_conflict_requires_shared_cohort() {
        let a = placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50")).with_cohort("CS-Y3");
        let b = placed("C", "CS302", "103", "Z", TimeSlot::new("Mon", "09:30", "10:20")).with_cohort("CS-Y3");
        let c = placed("D", "MA201", "104", "Q", TimeSlot::new("Mon", "09:30", "10:20")).with_cohort("MA-Y2");

        let conflicts = detect(&[a, b, c], &DetectorConfig::default());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Time);
        assert_eq!(conflicts[0].severity, Severity::Error);
        assert!(conflicts[0].description.contains("CS-Y3"));
    }

    #[test]
    fn test_touching_meetings_are_back_to_back_info() {
        let sections = vec![
            placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "10:00")),
            placed("B", "CS302", "102", "X", TimeSlot::new("Mon", "10:00", "10:50")),
        ];
        let conflicts = detect(&sections, &grid_config());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::BackToBack);
        assert_eq!(conflicts[0].severity, Severity::Info);
        assert!(!conflicts[0].auto_resolvable);
        assert!(!has_blocking(&conflicts));

        let relaxed = grid_config().with_back_to_back_gap(0);
        assert!(detect(&sections, &relaxed).is_empty());
    }

    #[test]
    fn test_capacity_conflicts() {
        let over = placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50")).with_enrolled(35);
        let near = placed("B", "CS302", "102", "Y", TimeSlot::new("Tue", "09:00", "09:50")).with_enrolled(28);
        let fine = placed("C", "CS303", "103", "Z", TimeSlot::new("Wed", "09:00", "09:50")).with_enrolled(10);

        let conflicts = detect(&[over, near, fine], &grid_config());
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Capacity);
        assert_eq!(conflicts[0].severity, Severity::Error);
        // Room 201 seats 60 and is free.
        assert!(conflicts[0].auto_resolvable);
        assert!(conflicts[0].resolution_suggestions[0].contains("room 201"));
        assert_eq!(conflicts[1].severity, Severity::Warning);

        let summary = summarize(&conflicts);
        assert_eq!(summary.error, 1);
        assert_eq!(summary.warning, 1);
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn test_auto_resolvable_needs_grid() {
        let sections = vec![
            placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50")),
            placed("C", "CS302", "101", "Z", TimeSlot::new("Mon", "09:30", "10:20")),
        ];
        let without = detect(&sections, &DetectorConfig::default());
        assert!(!without[0].auto_resolvable);
        assert!(without[0].resolution_suggestions[0].contains("resolve manually"));

        let with = detect(&sections, &grid_config());
        assert!(with[0].auto_resolvable);
        assert_eq!(with[0].resolution_suggestions.len(), 3);
        assert!(with[0].resolution_suggestions[0].starts_with("Move CS302/C to room 201"));
    }

    #[test]
    fn test_auto_resolvable_false_when_grid_fully_occupied() {
        // Instructor Z already teaches every grid slot via section W.
        let mut blocker = Section::new("W", "CS900").with_room("900").with_instructor("Z");
        for day in ["Mon", "Tue", "Wed", "Thu", "Fri"] {
            blocker = blocker.with_time(TimeSlot::new(day, "08:00", "18:00"));
        }
        let sections = vec![
            placed("A", "CS301", "101", "Z", TimeSlot::new("Sat", "09:00", "09:50")),
            placed("C", "CS302", "102", "Z", TimeSlot::new("Sat", "09:30", "10:20")),
            ScheduledSection::new(blocker),
        ];
        let conflicts = detect(&sections, &grid_config());
        let instructor: Vec<&ScheduleConflict> = conflicts
            .iter()
            .filter(|c| c.conflict_type == ConflictType::Instructor)
            .collect();
        assert_eq!(instructor.len(), 1);
        assert!(!instructor[0].auto_resolvable);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let sections = vec![
            placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50")),
            placed("B", "CS302", "101", "X", TimeSlot::new("Mon", "09:30", "10:20")),
            placed("C", "CS303", "101", "Y", TimeSlot::new("Mon", "09:45", "10:30")),
        ];
        let first = detect(&sections, &grid_config());
        let second = detect(&sections, &grid_config());
        assert_eq!(first, second);
        assert_eq!(first.len(), 4); // A-B room + instructor, A-C room, B-C room
    }

    #[test]
    fn test_same_section_id_in_two_courses() {
        let sections = vec![
            placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50")),
            placed("A", "CS302", "102", "X", TimeSlot::new("Mon", "09:30", "10:20")),
        ];
        let conflicts = detect(&sections, &grid_config());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Instructor);
        assert_eq!(conflicts[0].section_keys(), vec![("CS301", "A"), ("CS302", "A")]);
        // The partner is not hidden from the moving section's occupancy.
        assert!(conflicts[0].auto_resolvable);
        assert!(!conflicts[0].resolution_suggestions[0].contains("Mon 09:00-09:50"));
    }

    #[test]
    fn test_auto_resolvable_counts_own_retained_meetings() {
        let a = placed("A", "CS301", "101", "X", TimeSlot::new("Mon", "09:00", "09:50"));
        let c = ScheduledSection::new(
            Section::new("C", "CS302")
                .with_room("102")
                .with_instructor("X")
                .with_time(TimeSlot::new("Mon", "09:30", "10:20"))
                .with_time(TimeSlot::new("Tue", "09:00", "09:50")),
        );
        // The only candidate not taken by A clashes with C's Tuesday meeting.
        let config = DetectorConfig::default().with_grid(SuggestionGrid::new(
            vec![
                TimeSlot::new("Mon", "09:00", "09:50"),
                TimeSlot::new("Tue", "09:30", "10:20"),
            ],
            vec![],
        ));
        let conflicts = detect(&[a, c], &config);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Instructor);
        assert!(!conflicts[0].auto_resolvable);
    }
}
