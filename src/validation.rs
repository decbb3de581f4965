//! Input validation for timetabling data.
//!
//! Checks structural integrity of courses and placed sections. Detects:
//! - Duplicate course codes and section IDs
//! - Courses without sections
//! - Sections filed under the wrong course
//! - Malformed, inverted or zero-length meeting times
//! - Unknown or missing weekday tokens
//!
//! Validation is advisory. The overlap engine, scheduler and detector
//! accept unvalidated input and coerce malformed times to `00:00`;
//! callers that want strictness run these checks first.

use std::collections::HashSet;

use crate::models::{parse_time_strict, Course, ScheduledSection, Section, Weekday};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two courses share a code, or two sections share an ID.
    DuplicateId,
    /// A course has no sections.
    EmptyCourse,
    /// A section's `course_code` differs from its course.
    CourseMismatch,
    /// A start or end time is not a valid `"HH:MM"` or `"HH:MM:SS"`.
    MalformedTime,
    /// A meeting ends at or before it starts.
    InvalidTimeRange,
    /// A day token is not a recognised weekday.
    UnknownWeekday,
    /// A meeting has no day tokens.
    MissingDays,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates course offerings before generation.
///
/// Checks:
/// 1. No duplicate course codes
/// 2. No duplicate section IDs within a course
/// 3. Every course has at least one section
/// 4. Every section's `course_code` matches its course
/// 5. Every meeting passes [`check_meetings`]
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_courses(courses: &[Course]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut codes = HashSet::new();

    for course in courses {
        if !codes.insert(course.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course code: {}", course.code),
            ));
        }

        if course.sections.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCourse,
                format!("Course '{}' has no sections", course.code),
            ));
        }

        let mut section_ids = HashSet::new();
        for section in &course.sections {
            if !section_ids.insert(section.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate section ID '{}' in course '{}'", section.id, course.code),
                ));
            }
            if section.course_code != course.code {
                errors.push(ValidationError::new(
                    ValidationErrorKind::CourseMismatch,
                    format!(
                        "Section '{}' belongs to '{}' but is listed under '{}'",
                        section.id, section.course_code, course.code
                    ),
                ));
            }
            check_meetings(section, &mut errors);
        }
    }

    finish(errors)
}

/// Validates an assembled schedule before conflict detection.
///
/// Each `(course_code, id)` pair must appear once, since the detector
/// and resolver address sections by that key. The same ID under two
/// courses is fine.
pub fn validate_sections(sections: &[ScheduledSection]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut keys = HashSet::new();

    for s in sections {
        if !keys.insert(s.key()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate section: {}", s.label()),
            ));
        }
        check_meetings(&s.section, &mut errors);
    }

    finish(errors)
}

/// Per-meeting checks shared by both entry points.
fn check_meetings(section: &Section, errors: &mut Vec<ValidationError>) {
    for (i, slot) in section.times.iter().enumerate() {
        let label = format!("Section '{}' meeting {}", section.id, i + 1);

        if slot.day_tokens().next().is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingDays,
                format!("{label} has no days"),
            ));
        }
        for token in slot.day_tokens().filter(|t| Weekday::parse(t).is_none()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownWeekday,
                format!("{label} has unknown day '{token}'"),
            ));
        }

        let start = parse_time_strict(&slot.start);
        let end = parse_time_strict(&slot.end);
        for err in [&start, &end].into_iter().filter_map(|r| r.as_ref().err()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedTime,
                format!("{label}: {err}"),
            ));
        }
        if let (Ok(start), Ok(end)) = (start, end) {
            if end <= start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimeRange,
                    format!("{label} ends at {} before it starts at {}", slot.end, slot.start),
                ));
            }
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
