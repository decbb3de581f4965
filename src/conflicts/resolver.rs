//! Conflict resolution.
//!
//! # Algorithm
//! `Auto` moves the last section named by the conflict:
//! 1. Build its [`MovePlan`]: the meeting to replace, and the occupancy
//!    of the rest of the schedule plus the meetings it keeps.
//! 2. Rank alternatives with [`suggest`] and take the top room or slot,
//!    depending on the conflict type, provided it scores at least
//!    `min_acceptable_score`.
//!
//! Sections are addressed by `(course_code, id)`.
//!
//! `Manual` applies the caller's slot and/or room without scoring.
//!
//! The resolver never marks a conflict resolved. Callers [`apply`] the
//! result and re-run [`detect`](super::detect); a conflict that is no
//! longer emitted is resolved.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::suggest::{required_capacity, suggest, MovePlan};
use crate::config::ResolverConfig;
use crate::error::ResolutionFailure;
use crate::models::{
    AlternativeRoom, AlternativeTimeSlot, ConflictType, ScheduleConflict, ScheduledSection, TimeSlot,
};

/// How a conflict should be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionRequest {
    /// Apply the top-scored acceptable candidate.
    Auto,
    /// Apply a caller-chosen change.
    Manual(ManualAction),
}

/// A caller-chosen change to one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAction {
    /// Course of the section to change.
    pub course_code: String,
    /// Section to change.
    pub section_id: String,
    /// Replacement meeting slot.
    #[serde(default)]
    pub new_time_slot: Option<TimeSlot>,
    /// Index of the meeting replaced by `new_time_slot` (default 0).
    #[serde(default)]
    pub replace_slot: Option<usize>,
    /// Replacement room.
    #[serde(default)]
    pub new_room: Option<String>,
}

impl ManualAction {
    /// Creates an empty action for section `section_id` of `course_code`.
    pub fn new(course_code: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            section_id: section_id.into(),
            new_time_slot: None,
            replace_slot: None,
            new_room: None,
        }
    }

    /// Sets the replacement slot.
    pub fn with_time_slot(mut self, slot: TimeSlot) -> Self {
        self.new_time_slot = Some(slot);
        self
    }

    /// Sets which meeting is replaced.
    pub fn replacing(mut self, index: usize) -> Self {
        self.replace_slot = Some(index);
        self
    }

    /// Sets the replacement room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.new_room = Some(room.into());
        self
    }
}

/// What a resolution changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionChange {
    /// New meeting slot, if moved in time.
    pub new_time_slot: Option<TimeSlot>,
    /// Index of the replaced meeting.
    pub replaced_slot: Option<usize>,
    /// New room, if moved.
    pub new_room: Option<String>,
    /// Score of the applied candidate (`None` for manual changes).
    pub score: Option<u8>,
}

/// A successfully computed resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedResolution {
    /// The section after the change.
    pub section: ScheduledSection,
    /// The change made.
    pub change: ResolutionChange,
}

/// Result of [`resolve`].
pub type ResolutionOutcome = Result<AppliedResolution, ResolutionFailure>;

/// Resolves `conflict` within `all_sections`.
///
/// `all_sections` is not modified; pass the result to [`apply`].
pub fn resolve(
    conflict: &ScheduleConflict,
    all_sections: &[ScheduledSection],
    request: &ResolutionRequest,
    config: &ResolverConfig,
) -> ResolutionOutcome {
    let outcome = match request {
        ResolutionRequest::Auto => resolve_auto(conflict, all_sections, config),
        ResolutionRequest::Manual(action) => resolve_manual(action, all_sections),
    };
    match &outcome {
        Ok(applied) => debug!(
            conflict = %conflict.id,
            section = %applied.section.label(),
            score = ?applied.change.score,
            "resolution computed"
        ),
        Err(failure) => debug!(conflict = %conflict.id, %failure, "resolution failed"),
    }
    outcome
}

/// Returns `all_sections` with the resolved section swapped in.
///
/// Matches on `(course_code, id)`; other sections are cloned unchanged.
pub fn apply(all_sections: &[ScheduledSection], applied: &AppliedResolution) -> Vec<ScheduledSection> {
    all_sections
        .iter()
        .map(|s| {
            if s.key() == applied.section.key() {
                applied.section.clone()
            } else {
                s.clone()
            }
        })
        .collect()
}

fn find<'a>(
    all: &'a [ScheduledSection],
    course_code: &str,
    id: &str,
) -> Result<&'a ScheduledSection, ResolutionFailure> {
    all.iter()
        .find(|s| s.is_section(course_code, id))
        .ok_or_else(|| ResolutionFailure::SectionNotFound(format!("{course_code}/{id}")))
}

enum Move {
    Room(AlternativeRoom),
    Slot(AlternativeTimeSlot),
}

impl Move {
    fn score(&self) -> u8 {
        match self {
            Move::Room(r) => r.score,
            Move::Slot(t) => t.score,
        }
    }
}

fn resolve_auto(
    conflict: &ScheduleConflict,
    all: &[ScheduledSection],
    config: &ResolverConfig,
) -> ResolutionOutcome {
    let (course_code, id) = conflict
        .section_keys()
        .last()
        .copied()
        .ok_or_else(|| ResolutionFailure::NoTargetSection(conflict.id.clone()))?;
    let target = find(all, course_code, id)?;

    let plan = MovePlan::new(target, all);
    let replaced = plan.replaced_slot;
    let occ = plan.occupancy;

    let suggestions = suggest(
        &target.section,
        &occ.slots,
        &occ.rooms,
        required_capacity(target),
        &config.grid,
        &config.scoring,
    );
    let top_room = suggestions.rooms.into_iter().next().map(Move::Room);
    let top_slot = suggestions.time_slots.into_iter().next().map(Move::Slot);

    let preference: Vec<Move> = match conflict.conflict_type {
        ConflictType::Room => top_room.into_iter().chain(top_slot).collect(),
        ConflictType::Capacity => top_room.into_iter().collect(),
        ConflictType::Time | ConflictType::Instructor | ConflictType::BackToBack => {
            top_slot.into_iter().collect()
        }
    };

    let floor = config.min_acceptable_score;
    let best_score = preference.iter().map(Move::score).max();
    let chosen = preference
        .into_iter()
        .find(|m| m.score() >= floor)
        .ok_or(ResolutionFailure::NoAcceptableCandidate { best_score, floor })?;

    let mut section = target.clone();
    let change = match chosen {
        Move::Room(room) => {
            section.section.room = room.room_id.clone();
            section.section.capacity = room.capacity;
            ResolutionChange {
                new_room: Some(room.room_id),
                score: Some(room.score),
                ..Default::default()
            }
        }
        Move::Slot(alt) => {
            if section.section.times.is_empty() {
                section.section.times.push(alt.slot.clone());
            } else {
                section.section.times[replaced] = alt.slot.clone();
            }
            ResolutionChange {
                new_time_slot: Some(alt.slot),
                replaced_slot: Some(replaced),
                score: Some(alt.score),
                ..Default::default()
            }
        }
    };

    Ok(AppliedResolution { section, change })
}

fn resolve_manual(action: &ManualAction, all: &[ScheduledSection]) -> ResolutionOutcome {
    let target = find(all, &action.course_code, &action.section_id)?;
    if action.new_time_slot.is_none() && action.new_room.is_none() {
        return Err(ResolutionFailure::EmptyAction(target.label()));
    }

    let mut section = target.clone();
    let mut change = ResolutionChange::default();

    if let Some(slot) = &action.new_time_slot {
        let index = action.replace_slot.unwrap_or(0);
        let times = &mut section.section.times;
        if times.is_empty() && index == 0 {
            times.push(slot.clone());
        } else if let Some(existing) = times.get_mut(index) {
            *existing = slot.clone();
        } else {
            return Err(ResolutionFailure::SlotIndexOutOfRange {
                section: target.label(),
                index,
            });
        }
        change.new_time_slot = Some(slot.clone());
        change.replaced_slot = Some(index);
    }
    if let Some(room) = &action.new_room {
        section.section.room = room.clone();
        change.new_room = Some(room.clone());
    }

    Ok(AppliedResolution { section, change })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DetectorConfig, SuggestionGrid};
    use crate::conflicts::detect;
    use crate::models::{Room, Section};
    use pretty_assertions::assert_eq;

    fn placed(id: &str, course: &str, room: &str, instructor: &str, slots: &[TimeSlot]) -> ScheduledSection {
        let mut section = Section::new(id, course)
            .with_room(room)
            .with_instructor(instructor)
            .with_capacity(30);
        for s in slots {
            section = section.with_time(s.clone());
        }
        ScheduledSection::new(section)
    }

    fn room_clash() -> Vec<ScheduledSection> {
        vec![
            placed("A", "CS301", "101", "X", &[TimeSlot::new("Mon", "09:00", "09:50")]),
            placed("C", "CS302", "101", "Z", &[TimeSlot::new("Mon", "09:30", "10:20")]),
        ]
    }

    fn config(rooms: Vec<Room>) -> ResolverConfig {
        ResolverConfig::default().with_grid(SuggestionGrid::standard(rooms))
    }

    fn redetect(sections: &[ScheduledSection], config: &ResolverConfig) -> Vec<ScheduleConflict> {
        detect(sections, &DetectorConfig::default().with_grid(config.grid.clone()))
    }

    #[test]
    fn test_auto_room_conflict_moves_room_then_clears() {
        let sections = room_clash();
        let cfg = config(vec![Room::new("101", 30), Room::new("201", 60)]);
        let conflicts = redetect(&sections, &cfg);
        assert_eq!(conflicts.len(), 1);

        let applied = resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &cfg).unwrap();
        assert_eq!(applied.section.id(), "C");
        assert_eq!(applied.change.new_room.as_deref(), Some("201"));
        assert_eq!(applied.change.score, Some(80));
        assert_eq!(applied.section.section.capacity, 60);

        let updated = apply(&sections, &applied);
        assert_eq!(updated[0], sections[0]);
        assert!(redetect(&updated, &cfg).is_empty());
    }

    #[test]
    fn test_auto_room_conflict_falls_back_to_time_slot() {
        let sections = room_clash();
        // 201 wastes too many seats to clear the floor.
        let cfg = config(vec![Room::new("101", 30), Room::new("201", 500)]);
        let conflicts = redetect(&sections, &cfg);

        let applied = resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &cfg).unwrap();
        assert_eq!(applied.change.new_room, None);
        assert_eq!(applied.change.new_time_slot, Some(TimeSlot::new("Mon", "08:00", "08:50")));
        assert_eq!(applied.change.replaced_slot, Some(0));
        assert!(redetect(&apply(&sections, &applied), &cfg).is_empty());
    }

    #[test]
    fn test_auto_fails_below_floor() {
        let sections = room_clash();
        let conflicts = redetect(&sections, &ResolverConfig::default());

        let strict = config(vec![Room::new("201", 60)]).with_min_score(101);
        let err = resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &strict).unwrap_err();
        assert_eq!(
            err,
            ResolutionFailure::NoAcceptableCandidate {
                best_score: Some(100),
                floor: 101
            }
        );

        let err = resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &ResolverConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            ResolutionFailure::NoAcceptableCandidate {
                best_score: None,
                floor: 50
            }
        );
    }

    #[test]
    fn test_auto_keeps_other_meetings() {
        let sections = vec![
            placed("A", "CS301", "101", "X", &[TimeSlot::new("Mon", "09:00", "09:50")]),
            placed(
                "C",
                "CS302",
                "102",
                "X",
                &[TimeSlot::new("Wed", "09:30", "10:20"), TimeSlot::new("Mon", "09:30", "10:20")],
            ),
        ];
        let cfg = config(vec![]);
        let conflicts = redetect(&sections, &cfg);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Instructor);

        let applied = resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &cfg).unwrap();
        assert_eq!(applied.change.replaced_slot, Some(1));
        assert_eq!(
            applied.section.section.times,
            vec![TimeSlot::new("Wed", "09:30", "10:20"), TimeSlot::new("Mon", "08:00", "08:50")]
        );
        assert!(redetect(&apply(&sections, &applied), &cfg).is_empty());
    }

    #[test]
    fn test_auto_capacity_needs_room() {
        let sections = vec![placed("A", "CS301", "101", "X", &[TimeSlot::new("Mon", "09:00", "09:50")])
            .with_enrolled(35)];
        let cfg = config(vec![Room::new("101", 30), Room::new("201", 60)]);
        let conflicts = redetect(&sections, &cfg);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Capacity);

        let applied = resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &cfg).unwrap();
        assert_eq!(applied.change.new_room.as_deref(), Some("201"));
        assert_eq!(applied.change.new_time_slot, None);
        assert!(redetect(&apply(&sections, &applied), &cfg).is_empty());

        // No room big enough: a time move would not help.
        let small = config(vec![Room::new("201", 32)]);
        assert!(resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &small).is_err());
    }

    #[test]
    fn test_manual_resolution_then_redetect() {
        let sections = room_clash();
        let conflicts = redetect(&sections, &ResolverConfig::default());
        let action = ManualAction::new("CS302", "C").with_time_slot(TimeSlot::new("Tue", "09:00", "09:50"));

        let applied = resolve(
            &conflicts[0],
            &sections,
            &ResolutionRequest::Manual(action),
            &ResolverConfig::default(),
        )
        .unwrap();
        assert_eq!(applied.change.score, None);
        assert_eq!(applied.change.replaced_slot, Some(0));
        assert!(redetect(&apply(&sections, &applied), &ResolverConfig::default()).is_empty());
    }

    #[test]
    fn test_manual_failures() {
        let sections = room_clash();
        let conflicts = redetect(&sections, &ResolverConfig::default());
        let cfg = ResolverConfig::default();
        let run = |action: ManualAction| {
            resolve(&conflicts[0], &sections, &ResolutionRequest::Manual(action), &cfg).unwrap_err()
        };

        assert_eq!(
            run(ManualAction::new("CS302", "Z").with_room("201")),
            ResolutionFailure::SectionNotFound("CS302/Z".into())
        );
        assert_eq!(
            run(ManualAction::new("CS301", "C").with_room("201")),
            ResolutionFailure::SectionNotFound("CS301/C".into())
        );
        assert_eq!(
            run(ManualAction::new("CS302", "C")),
            ResolutionFailure::EmptyAction("CS302/C".into())
        );
        assert_eq!(
            run(ManualAction::new("CS302", "C")
                .with_time_slot(TimeSlot::new("Tue", "09:00", "09:50"))
                .replacing(3)),
            ResolutionFailure::SlotIndexOutOfRange {
                section: "CS302/C".into(),
                index: 3
            }
        );
    }

    #[test]
    fn test_conflict_without_sections() {
        let mut conflict = redetect(&room_clash(), &ResolverConfig::default()).remove(0);
        conflict.affected_entities.clear();
        let err = resolve(&conflict, &room_clash(), &ResolutionRequest::Auto, &ResolverConfig::default())
            .unwrap_err();
        assert_eq!(err, ResolutionFailure::NoTargetSection("conflict-1".into()));
    }

    #[test]
    fn test_request_wire_shape() {
        let json = serde_json::to_value(ResolutionRequest::Manual(
            ManualAction::new("CS302", "C").with_room("201"),
        ))
        .unwrap();
        assert_eq!(json["manual"]["course_code"], "CS302");
        assert_eq!(json["manual"]["section_id"], "C");
        assert_eq!(json["manual"]["new_room"], "201");

        let auto: ResolutionRequest = serde_json::from_str(r#""auto""#).unwrap();
        assert_eq!(auto, ResolutionRequest::Auto);
    }

    #[test]
    fn test_shared_section_id_across_courses() {
        let sections = vec![
            placed("A", "CS301", "101", "X", &[TimeSlot::new("Mon", "09:00", "09:50")]),
            placed("A", "CS302", "102", "X", &[TimeSlot::new("Mon", "09:30", "10:20")]),
        ];
        let cfg = config(vec![]);
        let conflicts = redetect(&sections, &cfg);
        assert_eq!(conflicts.len(), 1);

        let applied = resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &cfg).unwrap();
        assert_eq!(applied.section.key(), ("CS302", "A"));
        assert_eq!(applied.change.new_time_slot, Some(TimeSlot::new("Mon", "08:00", "08:50")));

        let updated = apply(&sections, &applied);
        let keys: Vec<(&str, &str)> = updated.iter().map(ScheduledSection::key).collect();
        assert_eq!(keys, vec![("CS301", "A"), ("CS302", "A")]);
        assert_eq!(updated[0], sections[0]);
        assert!(redetect(&updated, &cfg).is_empty());
    }

    #[test]
    fn test_auto_fails_when_only_candidate_hits_retained_meeting() {
        let sections = vec![
            placed("A", "CS301", "101", "X", &[TimeSlot::new("Mon", "09:00", "09:50")]),
            placed(
                "C",
                "CS302",
                "102",
                "X",
                &[TimeSlot::new("Mon", "09:30", "10:20"), TimeSlot::new("Tue", "09:00", "09:50")],
            ),
        ];
        let cfg = ResolverConfig::default().with_grid(SuggestionGrid::new(
            vec![
                TimeSlot::new("Mon", "09:00", "09:50"),
                TimeSlot::new("Tue", "09:30", "10:20"),
            ],
            vec![],
        ));
        let conflicts = redetect(&sections, &cfg);
        assert!(!conflicts[0].auto_resolvable);

        let err = resolve(&conflicts[0], &sections, &ResolutionRequest::Auto, &cfg).unwrap_err();
        assert_eq!(
            err,
            ResolutionFailure::NoAcceptableCandidate {
                best_score: None,
                floor: 50
            }
        );
    }
}
