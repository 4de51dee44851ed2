//! Tooltip placement
//!
//! [`place`] is a pure function: given the hovered point, the tooltip's
//! measured size and the plot bounds (all in container pixels) it picks the
//! first placement that fits and clamps the result inside the plot.

use research_core::{AxisValue, DataPoint, XAxisKind};

use crate::{ChartDimensions, config::AxisConfig, config::TooltipConfig};

/// Minimum slack beyond the tooltip and arrow for a placement to fit
const FIT_SLACK: f64 = 4.0;

/// Gap between the arrow tip and the point
const ARROW_GAP: f64 = 2.0;

/// Inner plot rectangle in container pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotBounds {
    pub fn from_dimensions(dims: &ChartDimensions) -> Self {
        Self {
            left: dims.margin.left,
            top: dims.margin.top,
            right: dims.width - dims.margin.right,
            bottom: dims.height - dims.margin.bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipSize {
    pub width: f64,
    pub height: f64,
}

impl TooltipSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Measured size, or the configured estimate while the tooltip has never
    /// been laid out (zero or missing measurement)
    pub fn measured_or_fallback(measured: Option<(f64, f64)>, config: &TooltipConfig) -> Self {
        let (w, h) = measured.unwrap_or((0.0, 0.0));
        Self {
            width: if w > 0.0 { w } else { config.fallback_width },
            height: if h > 0.0 { h } else { config.fallback_height },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
    Right,
    Left,
    /// Above the point, extending to its right
    TopLeft,
    /// Above the point, extending to its left
    TopRight,
    /// Below the point, extending to its right
    BottomLeft,
    /// Below the point, extending to its left
    BottomRight,
    TopFallback,
    BottomFallback,
    RightFallback,
    LeftFallback,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Right => "right",
            Self::Left => "left",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::TopFallback => "top-fallback",
            Self::BottomFallback => "bottom-fallback",
            Self::RightFallback => "right-fallback",
            Self::LeftFallback => "left-fallback",
        }
    }

    /// Edge of the tooltip that carries the arrow, for the four primary placements
    pub fn arrow_edge(&self) -> Option<ArrowEdge> {
        match self {
            Self::Top => Some(ArrowEdge::Bottom),
            Self::Bottom => Some(ArrowEdge::Top),
            Self::Right => Some(ArrowEdge::Left),
            Self::Left => Some(ArrowEdge::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Arrow drawn on the tooltip edge facing the point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub edge: ArrowEdge,
    pub size: f64,
    /// Position along the edge, in percent
    pub align: f64,
}

impl Arrow {
    /// Inline CSS for a CSS-triangle arrow. `inset` is the distance the
    /// triangle hangs outside the tooltip box.
    pub fn css(&self, size: f64, inset: f64, color: &str) -> String {
        let (anchor, cross, axis, solid, sides) = match self.edge {
            ArrowEdge::Bottom => ("bottom", "left", "translateX(-50%)", "top", ("left", "right")),
            ArrowEdge::Top => ("top", "left", "translateX(-50%)", "bottom", ("left", "right")),
            ArrowEdge::Left => ("left", "top", "translateY(-50%)", "right", ("top", "bottom")),
            ArrowEdge::Right => ("right", "top", "translateY(-50%)", "left", ("top", "bottom")),
        };
        format!(
            "position: absolute; {anchor}: -{inset}px; {cross}: {align}%; transform: {axis}; \
             width: 0; height: 0; border-{a}: {size}px solid transparent; \
             border-{b}: {size}px solid transparent; border-{solid}: {size}px solid {color};",
            align = self.align,
            a = sides.0,
            b = sides.1,
        )
    }
}

/// Result of [`place`]: the tooltip's top-left corner in container pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    pub left: f64,
    pub top: f64,
    pub placement: Placement,
    pub arrow: Option<Arrow>,
}

impl TooltipPlacement {
    pub fn show_arrow(&self) -> bool {
        self.arrow.is_some()
    }
}

/// Place a tooltip next to `point` (container pixels).
///
/// Primary placements (top, bottom, right, left) are centered on the point
/// and carry an arrow. Then the four corners without arrow. Then the side
/// with the most room. The result is always clamped into `bounds` inset by
/// `padding`.
pub fn place(
    point: (f64, f64),
    size: TooltipSize,
    bounds: PlotBounds,
    padding: f64,
    arrow_size: f64,
) -> TooltipPlacement {
    let (px, py) = point;
    let TooltipSize { width: w, height: h } = size;

    let above = py - bounds.top - padding;
    let below = bounds.bottom - py - padding;
    let left_space = px - bounds.left - padding;
    let right_space = bounds.right - px - padding;

    let fits_v = |space: f64| space >= h + arrow_size + FIT_SLACK;
    let fits_h = |space: f64| space >= w + arrow_size + FIT_SLACK;
    let centered_h = left_space >= w / 2.0 && right_space >= w / 2.0;
    let centered_v = above >= h / 2.0 && below >= h / 2.0;

    let clamp_left = |left: f64| left.min(bounds.right - w - padding).max(bounds.left + padding);
    let clamp_top = |top: f64| top.min(bounds.bottom - h - padding).max(bounds.top + padding);

    let (left, top, placement) = if fits_v(above) && centered_h {
        (px - w / 2.0, py - h - arrow_size - ARROW_GAP, Placement::Top)
    } else if fits_v(below) && centered_h {
        (px - w / 2.0, py + arrow_size + ARROW_GAP, Placement::Bottom)
    } else if fits_h(right_space) && centered_v {
        (px + arrow_size + ARROW_GAP, py - h / 2.0, Placement::Right)
    } else if fits_h(left_space) && centered_v {
        (px - w - arrow_size - ARROW_GAP, py - h / 2.0, Placement::Left)
    } else if fits_v(above) && right_space >= w {
        (px + padding, py - h - padding, Placement::TopLeft)
    } else if fits_v(above) && left_space >= w {
        (px - w - padding, py - h - padding, Placement::TopRight)
    } else if fits_v(below) && right_space >= w {
        (px + padding, py + padding, Placement::BottomLeft)
    } else if fits_v(below) && left_space >= w {
        (px - w - padding, py + padding, Placement::BottomRight)
    } else {
        let most = above.max(below).max(left_space).max(right_space);
        if most == above {
            (clamp_left(px - w / 2.0), bounds.top + padding, Placement::TopFallback)
        } else if most == below {
            (clamp_left(px - w / 2.0), bounds.bottom - h - padding, Placement::BottomFallback)
        } else if most == right_space {
            (bounds.right - w - padding, clamp_top(py - h / 2.0), Placement::RightFallback)
        } else {
            (bounds.left + padding, clamp_top(py - h / 2.0), Placement::LeftFallback)
        }
    };

    TooltipPlacement {
        left: clamp_left(left),
        top: clamp_top(top),
        placement,
        arrow: placement.arrow_edge().map(|edge| Arrow {
            edge,
            size: arrow_size,
            align: 50.0,
        }),
    }
}

// ============================================================================
// CONTENT
// ============================================================================

/// The two lines a tooltip shows for a point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipText {
    pub title: String,
    pub value: String,
}

/// Tooltip formatter, then axis formatter, then a per-kind default
pub fn tooltip_text(point: &DataPoint, axis: &AxisConfig) -> TooltipText {
    let title = match axis.tooltip_format_x.as_ref().or(axis.format_x.as_ref()) {
        Some(formatter) => formatter.format(&point.x),
        None => default_x_text(&point.x, axis.x_kind),
    };
    let value = match axis.tooltip_format_y.as_ref().or(axis.format_y.as_ref()) {
        Some(formatter) => formatter.format(point.y),
        None => point.y.to_string(),
    };
    TooltipText { title, value }
}

fn default_x_text(x: &AxisValue, kind: XAxisKind) -> String {
    match (kind, x.as_instant()) {
        (XAxisKind::Temporal, Some(t)) => t.format("%b %-d, %Y").to_string(),
        _ => x.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::CurrencyFormatter;

    const BOUNDS: PlotBounds = PlotBounds {
        left: 60.0,
        top: 20.0,
        right: 780.0,
        bottom: 370.0,
    };

    fn placed(point: (f64, f64), w: f64, h: f64) -> TooltipPlacement {
        place(point, TooltipSize::new(w, h), BOUNDS, 10.0, 8.0)
    }

    #[test]
    fn test_top_when_room_above() {
        let p = placed((400.0, 200.0), 120.0, 60.0);
        assert_eq!(p.placement, Placement::Top);
        assert_eq!((p.left, p.top), (340.0, 130.0));
        assert_eq!(p.arrow.map(|a| a.edge), Some(ArrowEdge::Bottom));
    }

    #[test]
    fn test_bottom_near_top_edge() {
        let p = placed((400.0, 40.0), 120.0, 60.0);
        assert_eq!(p.placement, Placement::Bottom);
        assert_eq!(p.top, 50.0);
    }

    #[test]
    fn test_right_then_left_when_plot_is_short() {
        let short = PlotBounds { bottom: 120.0, ..BOUNDS };
        let p = place((100.0, 70.0), TooltipSize::new(120.0, 60.0), short, 10.0, 8.0);
        assert_eq!(p.placement, Placement::Right);
        assert_eq!(p.left, 110.0);
        assert_eq!(p.arrow.map(|a| a.edge), Some(ArrowEdge::Left));

        let p = place((740.0, 70.0), TooltipSize::new(120.0, 60.0), short, 10.0, 8.0);
        assert_eq!(p.placement, Placement::Left);
        assert_eq!(p.arrow.map(|a| a.edge), Some(ArrowEdge::Right));
    }

    #[test]
    fn test_corner_without_arrow_near_left_edge() {
        // too close to the left and bottom edges to center, plenty of room above
        let p = placed((80.0, 345.0), 120.0, 60.0);
        assert_eq!(p.placement, Placement::TopLeft);
        assert!(!p.show_arrow());
        assert_eq!((p.left, p.top), (90.0, 275.0));
    }

    #[test]
    fn test_fallback_picks_largest_space() {
        let tight = PlotBounds { left: 0.0, top: 0.0, right: 200.0, bottom: 100.0 };
        let p = place((50.0, 30.0), TooltipSize::new(120.0, 60.0), tight, 10.0, 8.0);
        assert_eq!(p.placement, Placement::RightFallback);
        assert_eq!((p.left, p.top), (70.0, 10.0));
    }

    #[test]
    fn test_always_contained() {
        let sizes = [(40.0, 20.0), (120.0, 60.0), (300.0, 150.0), (680.0, 300.0)];
        for &(w, h) in &sizes {
            for xi in 0..=24 {
                for yi in 0..=14 {
                    let point = (BOUNDS.left + xi as f64 * 30.0, BOUNDS.top + yi as f64 * 25.0);
                    let p = placed(point, w, h);
                    assert!(p.left >= BOUNDS.left + 10.0 - 1e-9, "{point:?} {w}x{h} {p:?}");
                    assert!(p.left + w <= BOUNDS.right - 10.0 + 1e-9, "{point:?} {w}x{h} {p:?}");
                    assert!(p.top >= BOUNDS.top + 10.0 - 1e-9, "{point:?} {w}x{h} {p:?}");
                    assert!(p.top + h <= BOUNDS.bottom - 10.0 + 1e-9, "{point:?} {w}x{h} {p:?}");
                }
            }
        }
    }

    #[test]
    fn test_size_falls_back_until_measured() {
        let config = TooltipConfig::default();
        assert_eq!(TooltipSize::measured_or_fallback(None, &config), TooltipSize::new(120.0, 60.0));
        assert_eq!(
            TooltipSize::measured_or_fallback(Some((0.0, 44.0)), &config),
            TooltipSize::new(120.0, 44.0)
        );
    }

    #[test]
    fn test_text_formatter_precedence() {
        let point = DataPoint::new("2024-01-05", 152.8);
        let axis = AxisConfig::new(XAxisKind::Temporal, research_core::YAxisKind::Linear);
        assert_eq!(
            tooltip_text(&point, &axis),
            TooltipText { title: "Jan 5, 2024".into(), value: "152.8".into() }
        );

        let axis = axis
            .format_y(CurrencyFormatter { decimals: 0 })
            .tooltip_format_x(|x: &AxisValue| format!("day {x}"));
        let text = tooltip_text(&point, &axis);
        assert_eq!(text.title, "day 2024-01-05");
        assert_eq!(text.value, "$153");
    }

    #[test]
    fn test_arrow_css() {
        let arrow = Arrow { edge: ArrowEdge::Bottom, size: 8.0, align: 50.0 };
        let css = arrow.css(9.0, 9.0, "#2a2a2a");
        assert!(css.contains("bottom: -9px"));
        assert!(css.contains("left: 50%"));
        assert!(css.contains("border-top: 9px solid #2a2a2a"));
    }
}
