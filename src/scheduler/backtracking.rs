//! Depth-first enumeration with early pruning.
//!
//! # Algorithm
//! Courses are placed in input order. At each depth every option of the
//! course is tried in input order; an option overlapping any earlier
//! choice is rejected immediately and its whole subtree skipped. A full
//! assignment is recorded when the last course is placed.
//!
//! # Complexity
//! Worst case equals brute force; in practice pruning removes most dead
//! branches. The returned node count is the number of options tried.

use tracing::trace;

use super::{options_conflict, Collector};
use crate::models::ScheduleOption;

/// Runs the search, returning the number of nodes explored.
pub(super) fn enumerate(lists: &[Vec<ScheduleOption>], collector: &mut Collector<'_>) -> u64 {
    if lists.is_empty() {
        return 0;
    }
    let mut search = Search {
        lists,
        chosen: Vec::with_capacity(lists.len()),
        nodes: 0,
    };
    search.descend(collector);
    search.nodes
}

struct Search<'a> {
    lists: &'a [Vec<ScheduleOption>],
    chosen: Vec<usize>,
    nodes: u64,
}

impl Search<'_> {
    /// Returns `true` when the collector is full and the search must stop.
    fn descend(&mut self, collector: &mut Collector<'_>) -> bool {
        let lists = self.lists;
        let depth = self.chosen.len();
        if depth == lists.len() {
            return collector.push(lists, &self.chosen);
        }

        for (i, candidate) in lists[depth].iter().enumerate() {
            self.nodes += 1;
            let clash = self
                .chosen
                .iter()
                .enumerate()
                .any(|(course, &opt)| options_conflict(&lists[course][opt], candidate));
            if clash {
                trace!(depth, option = i, course = %candidate.course_code, "pruned");
                continue;
            }

            self.chosen.push(i);
            if self.descend(collector) {
                return true;
            }
            self.chosen.pop();
        }
        false
    }
}
