//! Resolution suggestion scoring.
//!
//! # Algorithm
//! 1. Take the bounded candidate universe from the [`SuggestionGrid`].
//! 2. Drop time candidates overlapping any occupied slot or equal to one
//!    of the section's current slots; drop rooms that are occupied, are
//!    the current room, or seat fewer than the required capacity.
//! 3. Score survivors from 100 downwards with the penalty terms in
//!    [`ScoringWeights`](crate::config::ScoringWeights).
//! 4. Sort by score descending; ties by (day, start, end) for slots and
//!    (capacity, id) for rooms.
//!
//! Scoring is deterministic, and more deviation never raises a score.

use std::cmp::Reverse;

use crate::config::{ScoringConfig, SuggestionGrid};
use crate::models::{
    parse_time, same_resource, AlternativeRoom, AlternativeTimeSlot, Room, ScheduledSection,
    Section, Suggestions, TimeSlot, Weekday,
};
use crate::overlap::{overlaps, slot_overlaps};

/// Slots and rooms already taken from the point of view of one section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Occupancy {
    /// Meetings of every other section sharing an instructor, room or
    /// cohort with the target.
    pub slots: Vec<TimeSlot>,
    /// Rooms used by other sections overlapping the target's meetings.
    pub rooms: Vec<String>,
}

impl Occupancy {
    /// Computes the occupancy around `target` within `all`.
    ///
    /// `target` itself (matched by course code and ID) is excluded.
    pub fn around(target: &ScheduledSection, all: &[ScheduledSection]) -> Self {
        let mut occ = Self::default();
        for other in all.iter().filter(|s| s.key() != target.key()) {
            let related = target.shares_instructor(other)
                || target.shares_room(other)
                || target.shares_cohort(other);
            if related {
                occ.slots.extend(other.section.times.iter().cloned());
            }
            let room = other.section.room.trim();
            if !room.is_empty()
                && overlaps(&target.section.times, &other.section.times)
                && !occ.rooms.iter().any(|r| same_resource(r, room))
            {
                occ.rooms.push(room.to_string());
            }
        }
        occ
    }
}

/// Occupancy for moving one meeting of a section.
///
/// The meeting replaced is the first one colliding with the section's
/// occupancy, else the first. The meetings it keeps are added to the
/// occupied slots, so a move never overlaps the section itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovePlan {
    /// Index of the meeting to replace.
    pub replaced_slot: usize,
    /// Occupancy around the section plus its retained meetings.
    pub occupancy: Occupancy,
}

impl MovePlan {
    /// Plans a move of `target` within `all`.
    pub fn new(target: &ScheduledSection, all: &[ScheduledSection]) -> Self {
        let mut occupancy = Occupancy::around(target, all);
        let times = &target.section.times;
        let replaced_slot = times
            .iter()
            .position(|t| occupancy.slots.iter().any(|o| slot_overlaps(t, o)))
            .unwrap_or(0);
        occupancy.slots.extend(
            times
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != replaced_slot)
                .map(|(_, t)| t.clone()),
        );
        Self {
            replaced_slot,
            occupancy,
        }
    }
}

/// Seats a replacement room must provide: enrolment when known, otherwise
/// the section's capacity.
pub fn required_capacity(section: &ScheduledSection) -> u32 {
    section.enrolled.unwrap_or(section.section.capacity)
}

/// Which kinds of alternative exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viability {
    /// At least one free time slot.
    pub time_slot: bool,
    /// At least one free room of sufficient capacity.
    pub room: bool,
}

/// Ranks alternative time slots and rooms for `section`.
///
/// Returns empty lists when nothing in the grid is viable.
pub fn suggest(
    section: &Section,
    occupied_slots: &[TimeSlot],
    occupied_rooms: &[String],
    required_capacity: u32,
    grid: &SuggestionGrid,
    scoring: &ScoringConfig,
) -> Suggestions {
    let mut time_slots: Vec<AlternativeTimeSlot> = grid
        .time_slots
        .iter()
        .filter(|c| slot_is_free(section, c, occupied_slots))
        .map(|c| score_slot(section, c, scoring))
        .collect();
    time_slots.sort_by_key(|a| (Reverse(a.score), a.slot.sort_key()));

    let mut rooms: Vec<AlternativeRoom> = grid
        .rooms
        .iter()
        .filter(|r| room_is_free(section, r, occupied_rooms, required_capacity))
        .map(|r| score_room(r, required_capacity, scoring))
        .collect();
    rooms.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.capacity.cmp(&b.capacity))
            .then_with(|| a.room_id.cmp(&b.room_id))
    });

    Suggestions { time_slots, rooms }
}

/// Check-only variant of [`suggest`]: no scoring, no sorting.
pub fn viability(
    section: &Section,
    occupied_slots: &[TimeSlot],
    occupied_rooms: &[String],
    required_capacity: u32,
    grid: &SuggestionGrid,
) -> Viability {
    Viability {
        time_slot: grid
            .time_slots
            .iter()
            .any(|c| slot_is_free(section, c, occupied_slots)),
        room: grid
            .rooms
            .iter()
            .any(|r| room_is_free(section, r, occupied_rooms, required_capacity)),
    }
}

fn slot_is_free(section: &Section, candidate: &TimeSlot, occupied: &[TimeSlot]) -> bool {
    !candidate.is_empty()
        && !section.times.contains(candidate)
        && !occupied.iter().any(|o| slot_overlaps(candidate, o))
}

fn room_is_free(section: &Section, room: &Room, occupied: &[String], required: u32) -> bool {
    room.capacity >= required
        && !same_resource(&room.id, &section.room)
        && !occupied.iter().any(|o| same_resource(o, &room.id))
}

fn score_slot(section: &Section, candidate: &TimeSlot, scoring: &ScoringConfig) -> AlternativeTimeSlot {
    let w = &scoring.weights;
    let mut penalty: u32 = 0;
    let mut notes: Vec<String> = Vec::new();

    let days = candidate.weekdays();
    if !scoring.preferred_days.is_empty()
        && days.iter().any(|d| !scoring.preferred_days.contains(d))
    {
        penalty = penalty.saturating_add(w.non_preferred_day);
        notes.push("non-preferred day".into());
    }

    let current: Vec<Weekday> = section.times.iter().flat_map(|t| t.weekdays()).collect();
    if !current.is_empty() && !days.iter().any(|d| current.contains(d)) {
        penalty = penalty.saturating_add(w.day_change);
        notes.push("moves to a different day".into());
    }

    let core_start = parse_time(&scoring.core_start);
    let core_end = parse_time(&scoring.core_end);
    let (start, end) = (candidate.start_minutes(), candidate.end_minutes());
    if start < core_start {
        let hours = (core_start - start).div_ceil(60);
        penalty = penalty.saturating_add(w.early_per_hour.saturating_mul(hours));
        notes.push(format!("starts {hours}h before core hours"));
    }
    if end > core_end {
        let hours = (end - core_end).div_ceil(60);
        penalty = penalty.saturating_add(w.late_per_hour.saturating_mul(hours));
        notes.push(format!("ends {hours}h after core hours"));
    }

    let reason = if notes.is_empty() {
        "within core hours on a preferred day, no occupancy conflict".to_string()
    } else {
        format!("no occupancy conflict; {}", notes.join(", "))
    };

    AlternativeTimeSlot {
        slot: candidate.clone(),
        score: to_score(penalty),
        reason,
    }
}

fn score_room(room: &Room, required: u32, scoring: &ScoringConfig) -> AlternativeRoom {
    let w = &scoring.weights;
    let spare = room.capacity - required;
    let penalty = if required == 0 {
        0
    } else {
        let scaled = u64::from(spare) * u64::from(w.capacity_waste) / u64::from(required);
        u32::try_from(scaled)
            .unwrap_or(u32::MAX)
            .min(w.max_capacity_waste)
    };

    let reason = if spare == 0 {
        format!("free, exact fit for {required} seats")
    } else {
        format!("free, seats {} ({spare} spare)", room.capacity)
    };

    AlternativeRoom {
        room_id: room.id.clone(),
        capacity: room.capacity,
        score: to_score(penalty),
        reason,
    }
}

fn to_score(penalty: u32) -> u8 {
    u8::try_from(100u32.saturating_sub(penalty)).unwrap_or(0)
}
