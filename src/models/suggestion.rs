//! Scored resolution candidates.
//!
//! Candidates are ephemeral: produced on demand by the scorer and never
//! persisted. Scores run 0-100, higher is better.

use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// A room in the candidate catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier.
    pub id: String,
    /// Seat capacity.
    pub capacity: u32,
}

impl Room {
    /// Creates a room.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }
}

/// An alternative meeting slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeTimeSlot {
    /// Proposed slot.
    #[serde(flatten)]
    pub slot: TimeSlot,
    /// Desirability, 0-100.
    pub score: u8,
    /// Why the slot scored as it did.
    pub reason: String,
}

/// An alternative room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRoom {
    /// Proposed room.
    pub room_id: String,
    /// Seat capacity.
    pub capacity: u32,
    /// Desirability, 0-100.
    pub score: u8,
    /// Why the room scored as it did.
    pub reason: String,
}

/// Ranked alternatives for one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    /// Time slots, best first.
    pub time_slots: Vec<AlternativeTimeSlot>,
    /// Rooms, best first.
    pub rooms: Vec<AlternativeRoom>,
}

impl Suggestions {
    /// Whether no alternative of either kind exists.
    pub fn is_empty(&self) -> bool {
        self.time_slots.is_empty() && self.rooms.is_empty()
    }

    /// Best time slot, if any.
    pub fn best_time_slot(&self) -> Option<&AlternativeTimeSlot> {
        self.time_slots.first()
    }

    /// Best room, if any.
    pub fn best_room(&self) -> Option<&AlternativeRoom> {
        self.rooms.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternative_slot_flattens() {
        let alt = AlternativeTimeSlot {
            slot: TimeSlot::new("Tue", "10:00", "10:50"),
            score: 90,
            reason: "preferred day".into(),
        };
        let json = serde_json::to_value(&alt).unwrap();
        assert_eq!(json["day"], "Tue");
        assert_eq!(json["start"], "10:00");
        assert_eq!(json["score"], 90);
    }

    #[test]
    fn test_suggestions_accessors() {
        let mut s = Suggestions::default();
        assert!(s.is_empty());
        s.rooms.push(AlternativeRoom {
            room_id: "201".into(),
            capacity: 40,
            score: 95,
            reason: String::new(),
        });
        assert!(!s.is_empty());
        assert_eq!(s.best_room().map(|r| r.room_id.as_str()), Some("201"));
        assert!(s.best_time_slot().is_none());
    }
}
