//! Timetabling core for university course scheduling.
//!
//! Given course offerings with sections meeting on weekly day/time
//! patterns, enumerates every conflict-free combination of sections; given
//! an assembled timetable, detects and classifies time and resource
//! conflicts and proposes scored alternatives.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeSlot`, `Section`, `Course`,
//!   `GeneratedSchedule`, `ScheduledSection`, `ScheduleConflict`
//! - **`overlap`**: Day/time overlap predicate shared by every component
//! - **`scheduler`**: Conflict-free schedule enumeration (brute force and
//!   backtracking)
//! - **`conflicts`**: Conflict detection, suggestion scoring, resolution
//! - **`config`**: Tunable weights, severities and candidate grids
//! - **`validation`**: Input integrity checks (duplicate IDs, bad times)
//! - **`error`**: Typed errors
//!
//! # Architecture
//!
//! Pure computation over in-memory data. Nothing here touches storage,
//! the network or global state; every tunable is an explicit argument.
//! Diagnostics go through `tracing`, and no subscriber is installed.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated Timetabling"

pub mod config;
pub mod conflicts;
pub mod error;
pub mod models;
pub mod overlap;
pub mod scheduler;
pub mod validation;
