//! Timetabling domain models.
//!
//! Plain owned value types exchanged with the host application: course
//! offerings in, generated schedules, conflicts and suggestions out. All
//! types serialize with serde in snake_case.
//!
//! | Model | Role |
//! |-------|------|
//! | `TimeSlot` | One weekly meeting (days + `[start, end)`) |
//! | `Section` / `Course` | Enumerator input |
//! | `ScheduleOption` / `GeneratedSchedule` | Enumerator output |
//! | `ScheduledSection` | Detector input |
//! | `ScheduleConflict` | Detector output |
//! | `Suggestions` | Scorer output |

mod conflict;
mod course;
mod schedule;
mod suggestion;
mod time_slot;

pub(crate) use conflict::same_resource;
pub use conflict::{
    AffectedEntity, ConflictType, EntityType, ScheduleConflict, ScheduledSection, Severity,
};
pub use course::{Course, OptionGrouping, Section, SectionRole};
pub use schedule::{GeneratedSchedule, GenerationResult, ScheduleOption};
pub use suggestion::{AlternativeRoom, AlternativeTimeSlot, Room, Suggestions};
pub use time_slot::{format_time, parse_time, parse_time_strict, DayKey, TimeSlot, Weekday};
