//! Line chart configuration
//!
//! Every section has sensible defaults and can be loaded from JSON.
//! Formatter slots hold strategies and are skipped by serde.

use std::sync::Arc;

use research_core::{AxisValue, HighlightRange, XAxisKind, XFormatter, YAxisKind, YFormatter, colors};
use serde::{Deserialize, Serialize};

use crate::{ChartDimensions, ChartMargin};

// ============================================================================
// DIMENSIONS
// ============================================================================

/// Width or height of the chart: fixed pixels or a share of the container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Pixels(f64),
    Percent(f64),
}

impl Dimension {
    fn resolve(&self, container: f64) -> f64 {
        match self {
            Self::Pixels(px) => *px,
            Self::Percent(pct) => container * pct / 100.0,
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::Percent(100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionConfig {
    pub width: Dimension,
    pub height: Dimension,
    pub margin: ChartMargin,
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    /// Container size assumed before the first resize observation
    pub fallback_width: f64,
    pub fallback_height: f64,
}

impl Default for DimensionConfig {
    fn default() -> Self {
        Self {
            width: Dimension::Percent(100.0),
            height: Dimension::Pixels(400.0),
            margin: ChartMargin::standard(),
            min_width: 300.0,
            min_height: 200.0,
            max_width: None,
            max_height: None,
            fallback_width: 800.0,
            fallback_height: 400.0,
        }
    }
}

impl DimensionConfig {
    pub fn fixed(width: f64, height: f64) -> Self {
        Self {
            width: Dimension::Pixels(width),
            height: Dimension::Pixels(height),
            ..Self::default()
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Resolve against the observed container size, clamped to the min/max constraints
    pub fn resolve(&self, container: Option<(f64, f64)>) -> ChartDimensions {
        let (cw, ch) = container.unwrap_or((self.fallback_width, self.fallback_height));

        let mut width = self.width.resolve(cw).max(self.min_width);
        let mut height = self.height.resolve(ch).max(self.min_height);
        if let Some(max) = self.max_width {
            width = width.min(max);
        }
        if let Some(max) = self.max_height {
            height = height.min(max);
        }

        ChartDimensions::new(width, height).with_margin(self.margin)
    }
}

// ============================================================================
// AXES
// ============================================================================

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub x_kind: XAxisKind,
    pub y_kind: YAxisKind,
    /// Explicit x domain; for categorical axes the pair names the first and
    /// last category (kept for compatibility, see DESIGN.md)
    pub x_domain: Option<(AxisValue, AxisValue)>,
    pub y_domain: Option<(f64, f64)>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Derive the y target from the points inside the visible x window
    pub fit_y_to_visible: bool,
    #[serde(skip)]
    pub format_x: Option<Arc<dyn XFormatter>>,
    #[serde(skip)]
    pub format_y: Option<Arc<dyn YFormatter>>,
    #[serde(skip)]
    pub tooltip_format_x: Option<Arc<dyn XFormatter>>,
    #[serde(skip)]
    pub tooltip_format_y: Option<Arc<dyn YFormatter>>,
}

/// Formatter slots print as `Some("<fn>")` or `None`
fn formatter_slot<T: ?Sized>(slot: &Option<Arc<T>>) -> Option<&'static str> {
    slot.as_ref().map(|_| "<fn>")
}

impl std::fmt::Debug for AxisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisConfig")
            .field("x_kind", &self.x_kind)
            .field("y_kind", &self.y_kind)
            .field("x_domain", &self.x_domain)
            .field("y_domain", &self.y_domain)
            .field("x_label", &self.x_label)
            .field("y_label", &self.y_label)
            .field("fit_y_to_visible", &self.fit_y_to_visible)
            .field("format_x", &formatter_slot(&self.format_x))
            .field("format_y", &formatter_slot(&self.format_y))
            .field("tooltip_format_x", &formatter_slot(&self.tooltip_format_x))
            .field("tooltip_format_y", &formatter_slot(&self.tooltip_format_y))
            .finish()
    }
}

impl AxisConfig {
    pub fn new(x_kind: XAxisKind, y_kind: YAxisKind) -> Self {
        Self {
            x_kind,
            y_kind,
            ..Self::default()
        }
    }

    pub fn x_domain(mut self, start: impl Into<AxisValue>, end: impl Into<AxisValue>) -> Self {
        self.x_domain = Some((start.into(), end.into()));
        self
    }

    pub fn y_domain(mut self, min: f64, max: f64) -> Self {
        self.y_domain = Some((min, max));
        self
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    pub fn fit_y_to_visible(mut self, fit: bool) -> Self {
        self.fit_y_to_visible = fit;
        self
    }

    pub fn format_x(mut self, formatter: impl XFormatter + 'static) -> Self {
        self.format_x = Some(Arc::new(formatter));
        self
    }

    pub fn format_y(mut self, formatter: impl YFormatter + 'static) -> Self {
        self.format_y = Some(Arc::new(formatter));
        self
    }

    pub fn tooltip_format_x(mut self, formatter: impl XFormatter + 'static) -> Self {
        self.tooltip_format_x = Some(Arc::new(formatter));
        self
    }

    pub fn tooltip_format_y(mut self, formatter: impl YFormatter + 'static) -> Self {
        self.tooltip_format_y = Some(Arc::new(formatter));
        self
    }
}

// ============================================================================
// STYLE, GRID, INTERACTION, ANIMATION, TOOLTIP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub line_color: String,
    pub line_width: f64,
    pub dot_radius: f64,
    pub dot_color: String,
    pub grid_color: String,
    pub text_color: String,
    pub highlight_color: String,
    pub highlight_opacity: f64,
    pub tooltip_background: String,
    pub tooltip_border: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_color: colors::PRIMARY.to_string(),
            line_width: 2.0,
            dot_radius: 4.0,
            dot_color: colors::PRIMARY.to_string(),
            grid_color: colors::GRID.to_string(),
            text_color: colors::TEXT_MUTED.to_string(),
            highlight_color: colors::HIGHLIGHT.to_string(),
            highlight_opacity: 0.2,
            tooltip_background: colors::BG_ELEVATED.to_string(),
            tooltip_border: colors::BORDER.to_string(),
        }
    }
}

/// `show_x_grid` draws the horizontal lines (one per y tick),
/// `show_y_grid` the vertical ones (one per x tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show_x_grid: bool,
    pub show_y_grid: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            show_x_grid: true,
            show_y_grid: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub show_dots: bool,
    pub show_tooltip: bool,
    pub enable_panning: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            show_dots: false,
            show_tooltip: true,
            enable_panning: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub animate: bool,
    /// y-domain easing duration
    pub duration_ms: f64,
    /// line reveal and dot cascade duration
    pub draw_duration_ms: f64,
    pub animate_on_data_change: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            animate: true,
            duration_ms: 400.0,
            draw_duration_ms: 1000.0,
            animate_on_data_change: true,
        }
    }
}

impl AnimationConfig {
    pub fn disabled() -> Self {
        Self {
            animate: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub padding: f64,
    pub arrow_size: f64,
    /// Size assumed before the tooltip has been laid out once
    pub fallback_width: f64,
    pub fallback_height: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            arrow_size: 8.0,
            fallback_width: 120.0,
            fallback_height: 60.0,
        }
    }
}

// ============================================================================
// CHART CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub dimensions: DimensionConfig,
    pub axis: AxisConfig,
    pub style: ChartStyle,
    pub grid: GridConfig,
    pub interaction: InteractionConfig,
    pub animation: AnimationConfig,
    pub tooltip: TooltipConfig,
    pub x_highlights: Vec<HighlightRange>,
    pub y_highlights: Vec<HighlightRange>,
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn dimensions(mut self, dimensions: DimensionConfig) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn axis(mut self, axis: AxisConfig) -> Self {
        self.axis = axis;
        self
    }

    pub fn style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    pub fn tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn x_highlights(mut self, ranges: Vec<HighlightRange>) -> Self {
        self.x_highlights = ranges;
        self
    }

    pub fn y_highlights(mut self, ranges: Vec<HighlightRange>) -> Self {
        self.y_highlights = ranges;
        self
    }

    /// Panning only applies to time axes
    pub fn panning_active(&self) -> bool {
        self.interaction.enable_panning && self.axis.x_kind.is_temporal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fallback_container() {
        let dims = DimensionConfig::default().resolve(None);
        assert_eq!((dims.width, dims.height), (800.0, 400.0));
    }

    #[test]
    fn test_resolve_clamps_to_constraints() {
        let config = DimensionConfig {
            max_width: Some(1000.0),
            ..DimensionConfig::default()
        };
        assert_eq!(config.resolve(Some((120.0, 50.0))).width, 300.0);
        assert_eq!(config.resolve(Some((1600.0, 50.0))).width, 1000.0);
        assert_eq!(config.resolve(Some((1600.0, 50.0))).height, 400.0);
    }

    #[test]
    fn test_percent_dimension() {
        let config = DimensionConfig {
            width: Dimension::Percent(50.0),
            height: Dimension::Percent(50.0),
            ..DimensionConfig::default()
        };
        let dims = config.resolve(Some((1000.0, 800.0)));
        assert_eq!((dims.width, dims.height), (500.0, 400.0));
    }

    #[test]
    fn test_config_from_json() {
        let config = ChartConfig::from_json(
            r#"{
                "axis": { "x_kind": "time", "y_kind": "log", "y_label": "Price" },
                "interaction": { "enable_panning": true },
                "animation": { "duration_ms": 250 },
                "x_highlights": [{ "start": "2024-01-06", "end": "2024-01-07", "opacity": 0.1 }]
            }"#,
        )
        .unwrap();

        assert_eq!(config.axis.x_kind, XAxisKind::Temporal);
        assert_eq!(config.axis.y_kind, YAxisKind::Logarithmic);
        assert!(config.panning_active());
        assert_eq!(config.animation.duration_ms, 250.0);
        assert_eq!(config.animation.draw_duration_ms, 1000.0);
        assert_eq!(config.tooltip.padding, 10.0);
        assert_eq!(config.x_highlights.len(), 1);
    }

    #[test]
    fn test_axis_debug_lists_every_formatter_slot() {
        let axis = AxisConfig::new(XAxisKind::Temporal, YAxisKind::Linear)
            .tooltip_format_y(|v: f64| format!("{v:.1}"));
        let debug = format!("{axis:?}");
        assert!(debug.contains(r#"tooltip_format_y: Some("<fn>")"#));
        assert!(debug.contains("tooltip_format_x: None"));
        assert!(debug.contains("format_y: None"));
    }

    #[test]
    fn test_panning_requires_time_axis() {
        let config = ChartConfig::default()
            .axis(AxisConfig::new(XAxisKind::Categorical, YAxisKind::Linear))
            .interaction(InteractionConfig {
                enable_panning: true,
                ..InteractionConfig::default()
            });
        assert!(!config.panning_active());
    }
}
