//! # research-charts
//!
//! D3.js-style interactive line chart engine built with Leptos.
//! Turns a series of (x, y) observations into a pannable, tooltip-driven
//! line chart with eased y-domain transitions and on-demand history loading.
//!
//! ## Architecture
//!
//! Framework-free core driven through an explicit state machine:
//! - Scale computation (linear, log, time, band)
//! - Highlight projection and tooltip placement as pure functions
//! - Draw pipeline producing a retained scene graph rendered as SVG markup
//! - Frame scheduling behind a trait so the engine runs natively in tests
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, ticks, paths
//! - `scales` - Scale factory for the line chart axes
//! - `highlight` - Highlight range projection
//! - `interpolator` - Animated y-domain and frame scheduling
//! - `scene` - Scene graph and SVG serialization
//! - `draw` - Draw pipeline
//! - `pan` - Drag-to-pan controller
//! - `tooltip` - Tooltip placement
//! - `engine` - Chart orchestrator
//! - `browser` - web-sys glue (animation frames, listeners, resize observation)
//! - `line_chart` - Leptos `LineChart` component

pub mod browser;
pub mod chartkit;
pub mod config;
pub mod draw;
pub mod engine;
pub mod highlight;
pub mod interpolator;
pub mod line_chart;
pub mod pan;
pub mod scales;
pub mod scene;
pub mod tooltip;

pub use chartkit::*;
pub use config::*;
pub use engine::*;
pub use highlight::*;
pub use interpolator::*;
pub use line_chart::*;
pub use pan::*;
pub use scales::*;
pub use tooltip::*;

// Re-export colors from research-core for convenience
pub use research_core::colors;

use serde::{Deserialize, Serialize};

/// Chart margin configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Standard line chart margins (room for y tick labels on the left)
    pub const fn standard() -> Self {
        Self::new(20.0, 20.0, 30.0, 60.0)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::standard()
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Whether a container-relative point lies inside the inner plot rectangle
    pub fn contains_inner(&self, x: f64, y: f64) -> bool {
        let lx = x - self.margin.left;
        let ly = y - self.margin.top;
        lx >= 0.0 && ly >= 0.0 && lx <= self.inner_width() && ly <= self.inner_height()
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_dimensions() {
        let dims = ChartDimensions::new(800.0, 400.0);
        assert_eq!(dims.inner_width(), 720.0);
        assert_eq!(dims.inner_height(), 350.0);
    }

    #[test]
    fn test_contains_inner() {
        let dims = ChartDimensions::new(800.0, 400.0);
        assert!(dims.contains_inner(60.0, 20.0));
        assert!(dims.contains_inner(400.0, 200.0));
        assert!(!dims.contains_inner(10.0, 200.0));
        assert!(!dims.contains_inner(400.0, 390.0));
    }

    #[test]
    fn test_default_margin_leaves_room_for_y_labels() {
        assert_eq!(ChartMargin::default(), ChartMargin::new(20.0, 20.0, 30.0, 60.0));
        let dims = ChartDimensions::new(400.0, 300.0).with_margin(ChartMargin::new(10.0, 10.0, 10.0, 10.0));
        assert_eq!(dims.inner_width(), 380.0);
        assert_eq!(dims.inner_height(), 280.0);
    }

    #[test]
    fn test_tiny_container_never_negative() {
        let dims = ChartDimensions::new(50.0, 20.0);
        assert_eq!(dims.inner_width(), 0.0);
        assert_eq!(dims.inner_height(), 0.0);
    }
}
