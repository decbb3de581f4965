//! Day/time overlap checks.
//!
//! Two slots conflict iff they share at least one day key and their
//! half-open minute ranges intersect (`s1 < e2 && s2 < e1`). Touching
//! endpoints do not conflict. Zero-length or inverted slots never
//! conflict, including with themselves.
//!
//! # Complexity
//! `overlaps(a, b)` is O(|a| * |b| * d) where d = day tokens per slot,
//! short-circuiting on the first conflicting pair.

use crate::models::{Section, TimeSlot};

/// Whether any slot in `a` overlaps any slot in `b`.
pub fn overlaps(a: &[TimeSlot], b: &[TimeSlot]) -> bool {
    a.iter().any(|x| b.iter().any(|y| slot_overlaps(x, y)))
}

/// Whether two single slots overlap.
pub fn slot_overlaps(a: &TimeSlot, b: &TimeSlot) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    shares_day(a, b) && ranges_overlap(a, b)
}

/// Whether two slots share at least one day key.
pub fn shares_day(a: &TimeSlot, b: &TimeSlot) -> bool {
    let b_days = b.day_keys();
    a.day_keys().iter().any(|d| b_days.contains(d))
}

/// Whether two sections' meetings overlap.
pub fn sections_overlap(a: &Section, b: &Section) -> bool {
    overlaps(&a.times, &b.times)
}

/// Smallest same-day gap (minutes) between non-overlapping slots.
///
/// Returns `None` when the lists share no day, or when any same-day pair
/// overlaps. Zero-length slots are ignored.
pub fn gap_minutes(a: &[TimeSlot], b: &[TimeSlot]) -> Option<u32> {
    let mut best: Option<u32> = None;
    for x in a.iter().filter(|s| !s.is_empty()) {
        for y in b.iter().filter(|s| !s.is_empty()) {
            if !shares_day(x, y) {
                continue;
            }
            if ranges_overlap(x, y) {
                return None;
            }
            let gap = if x.end_minutes() <= y.start_minutes() {
                y.start_minutes() - x.end_minutes()
            } else {
                x.start_minutes() - y.end_minutes()
            };
            best = Some(best.map_or(gap, |g| g.min(gap)));
        }
    }
    best
}

#[inline]
fn ranges_overlap(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.start_minutes() < b.end_minutes() && b.start_minutes() < a.end_minutes()
}
