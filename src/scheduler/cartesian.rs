//! Brute-force enumeration over the full cartesian product.
//!
//! # Algorithm
//! 1. An odometer of per-course option indices walks every combination,
//!    last course varying fastest. Combinations are never materialized.
//! 2. Each complete combination is checked pairwise for overlap.
//! 3. Valid combinations are collected until the limit is hit.
//!
//! # Complexity
//! O(Π|options| * n²) overlap checks in the worst case.

use tracing::trace;

use super::{options_conflict, Collector};
use crate::models::ScheduleOption;

/// Walks the product, returning the cartesian size (saturating).
pub(super) fn enumerate(lists: &[Vec<ScheduleOption>], collector: &mut Collector<'_>) -> u64 {
    let total = lists
        .iter()
        .fold(1u64, |acc, l| acc.saturating_mul(l.len() as u64));
    if lists.is_empty() || total == 0 {
        return 0;
    }

    let n = lists.len();
    let mut idx = vec![0usize; n];
    let mut checked: u64 = 0;

    loop {
        checked += 1;
        let valid = (0..n).all(|i| {
            (i + 1..n).all(|j| !options_conflict(&lists[i][idx[i]], &lists[j][idx[j]]))
        });
        if valid && collector.push(lists, &idx) {
            trace!(checked, "limit reached");
            break;
        }
        if !advance(&mut idx, lists) {
            break;
        }
    }

    total
}

/// Advances the odometer. Returns `false` once every combination was seen.
fn advance(idx: &mut [usize], lists: &[Vec<ScheduleOption>]) -> bool {
    for k in (0..idx.len()).rev() {
        idx[k] += 1;
        if idx[k] < lists[k].len() {
            return true;
        }
        idx[k] = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(sizes: &[usize]) -> Vec<Vec<ScheduleOption>> {
        sizes
            .iter()
            .map(|&n| (0..n).map(|_| ScheduleOption::new("X", "X", vec![])).collect())
            .collect()
    }

    #[test]
    fn test_advance_visits_all_in_order() {
        let l = lists(&[2, 3]);
        let mut idx = vec![0, 0];
        let mut seen = vec![idx.clone()];
        while advance(&mut idx, &l) {
            seen.push(idx.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }
}
