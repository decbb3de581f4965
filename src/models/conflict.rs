//! Conflict models.
//!
//! A conflict records a time or resource collision between scheduled
//! sections. Conflicts are immutable detector output: once a resolution is
//! applied the detector is re-run, and a conflict that is no longer emitted
//! is resolved.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Section;

/// A section placed in an assembled schedule.
///
/// Identified by `(course_code, id)`: section IDs need only be unique
/// within their course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSection {
    /// The placed section.
    pub section: Section,
    /// Display name of the owning course.
    #[serde(default)]
    pub course_name: String,
    /// Enrolled students, when known.
    #[serde(default)]
    pub enrolled: Option<u32>,
    /// Student populations attending (e.g. `"CS-Y3"`).
    #[serde(default)]
    pub cohorts: Vec<String>,
}

impl ScheduledSection {
    /// Wraps a section.
    pub fn new(section: Section) -> Self {
        Self {
            section,
            course_name: String::new(),
            enrolled: None,
            cohorts: Vec::new(),
        }
    }

    /// Sets the course name.
    pub fn with_course_name(mut self, name: impl Into<String>) -> Self {
        self.course_name = name.into();
        self
    }

    /// Sets the enrolment count.
    pub fn with_enrolled(mut self, enrolled: u32) -> Self {
        self.enrolled = Some(enrolled);
        self
    }

    /// Adds a cohort.
    pub fn with_cohort(mut self, cohort: impl Into<String>) -> Self {
        self.cohorts.push(cohort.into());
        self
    }

    /// Section ID.
    #[inline]
    pub fn id(&self) -> &str {
        &self.section.id
    }

    /// Identity key, `(course_code, id)`.
    #[inline]
    pub fn key(&self) -> (&str, &str) {
        (&self.section.course_code, &self.section.id)
    }

    /// Whether this is the section `id` of `course_code`.
    pub fn is_section(&self, course_code: &str, id: &str) -> bool {
        self.section.course_code == course_code && self.section.id == id
    }

    /// Label used in conflict text, e.g. `"CS301/A"`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.section.course_code, self.section.id)
    }

    /// Whether the two sections share at least one cohort.
    pub fn shares_cohort(&self, other: &Self) -> bool {
        self.cohorts
            .iter()
            .any(|c| other.cohorts.iter().any(|o| same_resource(c, o)))
    }

    /// Whether both sections use the same non-empty room.
    pub fn shares_room(&self, other: &Self) -> bool {
        same_resource(&self.section.room, &other.section.room)
    }

    /// Whether both sections have the same non-empty instructor.
    pub fn shares_instructor(&self, other: &Self) -> bool {
        same_resource(&self.section.instructor, &other.section.instructor)
    }
}

impl From<Section> for ScheduledSection {
    fn from(section: Section) -> Self {
        Self::new(section)
    }
}

/// Resource identity: trimmed, case-insensitive, never matching when empty.
pub(crate) fn same_resource(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

/// Conflict classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Overlapping sections attended by the same students.
    Time,
    /// Room double-booked.
    Room,
    /// Instructor double-booked.
    Instructor,
    /// Enrolment at or above section capacity.
    Capacity,
    /// Consecutive meetings with too little gap.
    BackToBack,
}

impl ConflictType {
    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictType::Time => "time",
            ConflictType::Room => "room",
            ConflictType::Instructor => "instructor",
            ConflictType::Capacity => "capacity",
            ConflictType::BackToBack => "back_to_back",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conflict severity, ordered `Info < Warning < Error < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Whether the conflict blocks publishing (error or critical).
    #[inline]
    pub fn is_blocking(self) -> bool {
        self >= Severity::Error
    }
}

/// Kind of entity a conflict refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Section,
    Room,
    Instructor,
}

/// An entity affected by a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedEntity {
    /// Entity kind.
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Entity identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning course, for section entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
}

impl AffectedEntity {
    /// A section entity.
    pub fn section(s: &ScheduledSection) -> Self {
        let name = if s.course_name.is_empty() {
            s.label()
        } else {
            format!("{} ({})", s.course_name, s.label())
        };
        Self {
            entity_type: EntityType::Section,
            id: s.section.id.clone(),
            name,
            course_code: Some(s.section.course_code.clone()),
        }
    }

    /// A room entity.
    pub fn room(room: &str) -> Self {
        Self {
            entity_type: EntityType::Room,
            id: room.trim().to_string(),
            name: format!("Room {}", room.trim()),
            course_code: None,
        }
    }

    /// An instructor entity.
    pub fn instructor(instructor: &str) -> Self {
        Self {
            entity_type: EntityType::Instructor,
            id: instructor.trim().to_string(),
            name: instructor.trim().to_string(),
            course_code: None,
        }
    }
}

/// A detected conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    /// Identifier, `"conflict-{n}"` in emission order.
    pub id: String,
    /// Conflict classification.
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    /// Severity.
    pub severity: Severity,
    /// Short title.
    pub title: String,
    /// Human-readable description.
    pub description: String,
    /// Sections first (in input order), then rooms/instructors.
    pub affected_entities: Vec<AffectedEntity>,
    /// Human-readable resolution hints.
    pub resolution_suggestions: Vec<String>,
    /// Whether an alternative slot or room exists.
    pub auto_resolvable: bool,
}

impl ScheduleConflict {
    /// IDs of affected sections, in entity order.
    pub fn section_ids(&self) -> Vec<&str> {
        self.affected_entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Section)
            .map(|e| e.id.as_str())
            .collect()
    }

    /// `(course_code, id)` keys of affected sections, in entity order.
    pub fn section_keys(&self) -> Vec<(&str, &str)> {
        self.affected_entities
            .iter()
            .filter(|e| e.entity_type == EntityType::Section)
            .map(|e| (e.course_code.as_deref().unwrap_or_default(), e.id.as_str()))
            .collect()
    }

    /// Whether the conflict involves section `id` of `course_code`.
    pub fn involves_section(&self, course_code: &str, id: &str) -> bool {
        self.section_keys().contains(&(course_code, id))
    }
}
