//! Drag-to-pan controller
//!
//! `Idle -> Dragging -> Idle`. While dragging, the controller owns the
//! visible time window and translates it rigidly with the pointer. On
//! release it reports the final window plus any data-needed events for
//! edges the window has moved past.

use chrono::{DateTime, Utc};
use research_core::{AxisValue, Direction};
use serde::Serialize;

// ============================================================================
// TIME WINDOW
// ============================================================================

/// A visible or loaded time range in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn from_pair(bounds: (i64, i64)) -> Self {
        Self::new(bounds.0, bounds.1)
    }

    pub fn span(&self) -> i64 {
        self.end - self.start
    }

    /// Rigid translation of both ends
    pub fn shift(&self, delta_ms: i64) -> Self {
        Self::new(self.start + delta_ms, self.end + delta_ms)
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        AxisValue::from(self.start).as_instant()
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        AxisValue::from(self.end).as_instant()
    }

    /// The window as an explicit x domain
    pub fn to_domain(&self) -> (AxisValue, AxisValue) {
        (AxisValue::from(self.start), AxisValue::from(self.end))
    }
}

/// Request for more data beyond one edge of the loaded extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataNeeded {
    pub direction: Direction,
    /// Visible window when the drag ended
    pub domain: TimeWindow,
    /// Extent of the loaded data
    pub extent: TimeWindow,
}

/// What a finished drag produced
#[derive(Debug, Clone, PartialEq)]
pub struct PanOutcome {
    pub domain: TimeWindow,
    pub data_needed: Vec<DataNeeded>,
}

// ============================================================================
// STATE MACHINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    Dragging {
        origin_px: f64,
        start_domain: TimeWindow,
        domain: TimeWindow,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PanController {
    state: PanState,
    extent: Option<TimeWindow>,
    requested_before: bool,
    requested_after: bool,
}

impl PanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PanState::Dragging { .. })
    }

    /// Window under the pointer while dragging
    pub fn domain(&self) -> Option<TimeWindow> {
        match self.state {
            PanState::Dragging { domain, .. } => Some(domain),
            PanState::Idle => None,
        }
    }

    /// Track the loaded data's extent. An edge that moved clears its
    /// "already requested" flag.
    pub fn sync_extent(&mut self, extent: Option<TimeWindow>) {
        if extent == self.extent {
            return;
        }
        let previous = self.extent;
        if previous.map(|e| e.start) != extent.map(|e| e.start) {
            self.requested_before = false;
        }
        if previous.map(|e| e.end) != extent.map(|e| e.end) {
            self.requested_after = false;
        }
        tracing::debug!(?previous, ?extent, "pan extent changed");
        self.extent = extent;
    }

    /// Pointer down inside the plot. Returns false when already dragging.
    pub fn begin(&mut self, px: f64, domain: TimeWindow) -> bool {
        if self.is_dragging() {
            return false;
        }
        tracing::debug!(px, ?domain, "pan started");
        self.state = PanState::Dragging {
            origin_px: px,
            start_domain: domain,
            domain,
        };
        true
    }

    /// Pointer moved to `px`. Dragging right reveals earlier times.
    /// The window is always the start window shifted by the total pointer
    /// travel, so rounding does not accumulate across moves.
    pub fn drag(&mut self, px: f64, inner_width: f64) -> Option<TimeWindow> {
        let PanState::Dragging {
            origin_px,
            start_domain,
            domain,
        } = self.state
        else {
            return None;
        };

        if inner_width <= 0.0 {
            return Some(domain);
        }

        let ms_per_px = start_domain.span() as f64 / inner_width;
        let delta_ms = (-(px - origin_px) * ms_per_px).round() as i64;
        let domain = start_domain.shift(delta_ms);

        self.state = PanState::Dragging {
            origin_px,
            start_domain,
            domain,
        };
        Some(domain)
    }

    /// Pointer released: back to idle, reporting the final window
    pub fn end(&mut self) -> Option<PanOutcome> {
        let PanState::Dragging {
            start_domain,
            domain,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };

        tracing::debug!(shifted_ms = domain.start - start_domain.start, ?domain, "pan ended");

        let mut data_needed = Vec::new();
        if let Some(extent) = self.extent {
            if domain.start < extent.start && !self.requested_before {
                self.requested_before = true;
                data_needed.push(DataNeeded {
                    direction: Direction::Before,
                    domain,
                    extent,
                });
            }
            if domain.end > extent.end && !self.requested_after {
                self.requested_after = true;
                data_needed.push(DataNeeded {
                    direction: Direction::After,
                    domain,
                    extent,
                });
            }
        }

        Some(PanOutcome { domain, data_needed })
    }

    /// Abandon a drag without reporting (teardown, pointer capture lost)
    pub fn cancel(&mut self) -> Option<TimeWindow> {
        match std::mem::take(&mut self.state) {
            PanState::Dragging { start_domain, .. } => Some(start_domain),
            PanState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    fn controller() -> PanController {
        let mut pan = PanController::new();
        pan.sync_extent(Some(TimeWindow::new(10 * DAY, 20 * DAY)));
        pan
    }

    #[test]
    fn test_drag_is_rigid_translation() {
        let mut pan = controller();
        let start = TimeWindow::new(10 * DAY, 20 * DAY);
        assert!(pan.begin(100.0, start));
        assert!(!pan.begin(50.0, start));

        // 100 px over a 1000 px plot showing 10 days = 1 day
        let moved = pan.drag(200.0, 1000.0).unwrap();
        assert_eq!(moved, TimeWindow::new(9 * DAY, 19 * DAY));
        assert_eq!(moved.span(), start.span());

        let back = pan.drag(100.0, 1000.0).unwrap();
        assert_eq!(back, start);
    }

    #[test]
    fn test_many_small_moves_do_not_drift() {
        let mut pan = controller();
        let start = TimeWindow::new(10 * DAY, 20 * DAY);
        pan.begin(0.0, start);

        // 10 days over 7 px is a fractional number of ms per pixel
        let mut last = None;
        for px in 1..=7 {
            last = pan.drag(px as f64, 7.0);
        }
        assert_eq!(last, Some(TimeWindow::new(0, 10 * DAY)));
        assert_eq!(pan.end().map(|o| o.domain), last);
    }

    #[test]
    fn test_release_reports_data_needed_before() {
        let mut pan = controller();
        pan.begin(0.0, TimeWindow::new(10 * DAY, 20 * DAY));
        pan.drag(300.0, 1000.0);
        let outcome = pan.end().unwrap();

        assert_eq!(outcome.domain, TimeWindow::new(7 * DAY, 17 * DAY));
        assert_eq!(
            outcome.data_needed,
            vec![DataNeeded {
                direction: Direction::Before,
                domain: outcome.domain,
                extent: TimeWindow::new(10 * DAY, 20 * DAY),
            }]
        );
        assert!(!pan.is_dragging());
    }

    #[test]
    fn test_fetch_once_per_edge_until_extent_changes() {
        let mut pan = controller();
        let window = TimeWindow::new(10 * DAY, 20 * DAY);
        let mut before_events = 0;

        for _ in 0..2 {
            pan.begin(0.0, window);
            pan.drag(200.0, 1000.0);
            before_events += pan
                .end()
                .unwrap()
                .data_needed
                .iter()
                .filter(|e| e.direction == Direction::Before)
                .count();
        }
        assert_eq!(before_events, 1);

        // growth at the other edge does not re-arm this one
        pan.sync_extent(Some(TimeWindow::new(10 * DAY, 25 * DAY)));
        pan.begin(0.0, window);
        pan.drag(200.0, 1000.0);
        assert!(pan.end().unwrap().data_needed.is_empty());

        pan.sync_extent(Some(TimeWindow::new(5 * DAY, 25 * DAY)));
        pan.begin(0.0, TimeWindow::new(5 * DAY, 15 * DAY));
        pan.drag(200.0, 1000.0);
        assert_eq!(pan.end().unwrap().data_needed.len(), 1);
    }

    #[test]
    fn test_both_edges_when_zoomed_out() {
        let mut pan = controller();
        pan.begin(0.0, TimeWindow::new(5 * DAY, 25 * DAY));
        let outcome = pan.end().unwrap();
        let directions: Vec<Direction> = outcome.data_needed.iter().map(|e| e.direction).collect();
        assert_eq!(directions, [Direction::Before, Direction::After]);
    }

    #[test]
    fn test_idle_ignores_moves_and_cancel_restores() {
        let mut pan = controller();
        assert_eq!(pan.drag(10.0, 100.0), None);
        assert_eq!(pan.end(), None);

        let start = TimeWindow::new(10 * DAY, 20 * DAY);
        pan.begin(0.0, start);
        pan.drag(500.0, 1000.0);
        assert_eq!(pan.cancel(), Some(start));
        assert_eq!(pan.state(), PanState::Idle);
    }
}
