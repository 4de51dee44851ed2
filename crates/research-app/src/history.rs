//! Merging fetched history into the chart's dataset

use std::collections::HashSet;

use research_charts::TimeWindow;
use research_core::{DataPoint, Direction};

/// Directions whose history has already been fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadedRanges {
    pub before: bool,
    pub after: bool,
}

impl LoadedRanges {
    pub fn is_loaded(&self, direction: Direction) -> bool {
        match direction {
            Direction::Before => self.before,
            Direction::After => self.after,
        }
    }

    pub fn mark(&mut self, direction: Direction) {
        match direction {
            Direction::Before => self.before = true,
            Direction::After => self.after = true,
        }
    }
}

/// Add the fetched points that lie beyond `extent` in `direction` and are
/// not already present, then sort by time.
pub fn merge_history(
    current: &[DataPoint],
    fetched: Vec<DataPoint>,
    direction: Direction,
    extent: TimeWindow,
) -> Vec<DataPoint> {
    let existing: HashSet<i64> = current.iter().filter_map(|p| p.x.as_millis()).collect();

    let fresh: Vec<DataPoint> = fetched
        .into_iter()
        .filter(|p| {
            p.x.as_millis().is_some_and(|t| {
                let beyond = match direction {
                    Direction::Before => t < extent.start,
                    Direction::After => t > extent.end,
                };
                beyond && !existing.contains(&t)
            })
        })
        .collect();

    tracing::info!(%direction, added = fresh.len(), "history merged");

    let mut merged: Vec<DataPoint> = current.iter().cloned().chain(fresh).collect();
    merged.sort_by_key(|p| p.x.as_millis().unwrap_or(i64::MIN));
    merged
}
