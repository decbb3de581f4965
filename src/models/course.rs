//! Course and section models.
//!
//! A `Course` is an offering in a term; each `Section` is one concrete
//! instance of it with its own instructor, room and meeting times.
//! Sections are immutable inputs: algorithms clone, never mutate.

use serde::{Deserialize, Serialize};

use super::{ScheduleOption, TimeSlot};
use crate::overlap::overlaps;

/// Teaching role of a section within its course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionRole {
    /// Main lecture (default).
    #[default]
    Lecture,
    /// Laboratory session.
    Lab,
    /// Tutorial or recitation.
    Tutorial,
}

/// One offered instance of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier.
    pub id: String,
    /// Code of the owning course.
    pub course_code: String,
    /// Instructor name or identifier (empty = unassigned).
    pub instructor: String,
    /// Room identifier (empty = unassigned).
    pub room: String,
    /// Seat capacity.
    pub capacity: u32,
    /// Weekly meetings (e.g. lecture + lab).
    pub times: Vec<TimeSlot>,
    /// Teaching role.
    #[serde(default)]
    pub role: SectionRole,
}

impl Section {
    /// Creates a section with no meetings.
    pub fn new(id: impl Into<String>, course_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            course_code: course_code.into(),
            instructor: String::new(),
            room: String::new(),
            capacity: 0,
            times: Vec::new(),
            role: SectionRole::Lecture,
        }
    }

    /// Sets the instructor.
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    /// Sets the room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// Sets the seat capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Adds a weekly meeting.
    pub fn with_time(mut self, slot: TimeSlot) -> Self {
        self.times.push(slot);
        self
    }

    /// Sets the teaching role.
    pub fn with_role(mut self, role: SectionRole) -> Self {
        self.role = role;
        self
    }

    /// Whether the section meets at least once for a non-zero duration.
    pub fn has_meetings(&self) -> bool {
        self.times.iter().any(|t| !t.is_empty())
    }

    /// Total weekly contact minutes (each listed day counts).
    pub fn weekly_minutes(&self) -> u32 {
        self.times
            .iter()
            .map(|t| t.duration_minutes() * t.day_tokens().count() as u32)
            .sum()
    }
}

/// How a course's sections become schedule options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionGrouping {
    /// One option per section.
    #[default]
    PerSection,
    /// One option per non-overlapping pick of exactly one section per role.
    ByRole,
}

/// A course offering and its sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course code, e.g. `"CS301"`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Credit value.
    pub credits: u32,
    /// Academic level (e.g. 300).
    pub level: u32,
    /// Owning department.
    pub department: String,
    /// Offered sections.
    pub sections: Vec<Section>,
}

impl Course {
    /// Creates a course with no sections.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            credits: 0,
            level: 0,
            department: String::new(),
            sections: Vec::new(),
        }
    }

    /// Sets the credit value.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the academic level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Adds a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Finds a section by ID.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Builds the schedule options for this course.
    ///
    /// Options preserve section input order. With [`OptionGrouping::ByRole`],
    /// roles are combined in `Lecture, Lab, Tutorial` order and picks whose
    /// own sections overlap are dropped.
    pub fn options(&self, grouping: OptionGrouping) -> Vec<ScheduleOption> {
        match grouping {
            OptionGrouping::PerSection => self
                .sections
                .iter()
                .map(|s| ScheduleOption::new(&self.code, &self.name, vec![s.clone()]))
                .collect(),
            OptionGrouping::ByRole => self.role_group_options(),
        }
    }

    fn role_group_options(&self) -> Vec<ScheduleOption> {
        let mut roles: Vec<SectionRole> = self.sections.iter().map(|s| s.role).collect();
        roles.sort();
        roles.dedup();

        let by_role: Vec<Vec<&Section>> = roles
            .iter()
            .map(|r| self.sections.iter().filter(|s| s.role == *r).collect())
            .collect();

        let mut out = Vec::new();
        let mut picked: Vec<&Section> = Vec::with_capacity(by_role.len());
        self.extend_role_picks(&by_role, &mut picked, &mut out);
        out
    }

    fn extend_role_picks<'a>(
        &self,
        by_role: &[Vec<&'a Section>],
        picked: &mut Vec<&'a Section>,
        out: &mut Vec<ScheduleOption>,
    ) {
        let depth = picked.len();
        if depth == by_role.len() {
            if depth > 0 {
                let sections = picked.iter().map(|s| (*s).clone()).collect();
                out.push(ScheduleOption::new(&self.code, &self.name, sections));
            }
            return;
        }
        for &candidate in &by_role[depth] {
            if picked.iter().any(|p| overlaps(&p.times, &candidate.times)) {
                continue;
            }
            picked.push(candidate);
            self.extend_role_picks(by_role, picked, out);
            picked.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lab_course() -> Course {
        Course::new("CH101", "General Chemistry")
            .with_credits(4)
            .with_section(
                Section::new("L1", "CH101").with_time(TimeSlot::new("Mon Wed", "09:00", "09:50")),
            )
            .with_section(
                Section::new("L2", "CH101").with_time(TimeSlot::new("Tue Thu", "09:00", "09:50")),
            )
            .with_section(
                Section::new("B1", "CH101")
                    .with_role(SectionRole::Lab)
                    .with_time(TimeSlot::new("Mon", "09:30", "11:30")),
            )
            .with_section(
                Section::new("B2", "CH101")
                    .with_role(SectionRole::Lab)
                    .with_time(TimeSlot::new("Fri", "13:00", "15:00")),
            )
    }

    fn ids(option: &ScheduleOption) -> Vec<&str> {
        option.sections.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_section_builder() {
        let s = Section::new("A", "CS301")
            .with_instructor("X")
            .with_room("101")
            .with_capacity(40)
            .with_time(TimeSlot::new("Mon Wed", "09:00", "09:50"));

        assert_eq!(s.course_code, "CS301");
        assert_eq!(s.role, SectionRole::Lecture);
        assert_eq!(s.capacity, 40);
        assert!(s.has_meetings());
        assert_eq!(s.weekly_minutes(), 100);
    }

    #[test]
    fn test_per_section_options() {
        let course = lab_course();
        let options = course.options(OptionGrouping::PerSection);
        assert_eq!(options.len(), 4);
        assert_eq!(ids(&options[0]), vec!["L1"]);
        assert_eq!(ids(&options[3]), vec!["B2"]);
        assert!(options.iter().all(|o| o.course_code == "CH101"));
    }

    #[test]
    fn test_role_grouped_options() {
        let course = lab_course();
        let options = course.options(OptionGrouping::ByRole);
        let picks: Vec<Vec<&str>> = options.iter().map(ids).collect();
        // L1 + B1 overlap on Monday morning and are dropped.
        assert_eq!(
            picks,
            vec![vec!["L1", "B2"], vec!["L2", "B1"], vec!["L2", "B2"]]
        );
    }

    #[test]
    fn test_options_empty_course() {
        let course = Course::new("X", "Empty");
        assert!(course.options(OptionGrouping::PerSection).is_empty());
        assert!(course.options(OptionGrouping::ByRole).is_empty());
    }

    #[test]
    fn test_section_lookup() {
        let course = lab_course();
        assert_eq!(course.section("B1").map(|s| s.role), Some(SectionRole::Lab));
        assert!(course.section("Z9").is_none());
    }
}
