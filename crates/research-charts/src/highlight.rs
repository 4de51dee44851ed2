//! Highlight range projection
//!
//! Converts domain-space highlight ranges into pixel bands clipped to the plot.

use research_core::{AxisValue, HighlightRange};

use crate::scales::{XScale, YScale};

/// A highlight band in pixels along one axis of the inner plot
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedHighlight {
    /// Leading edge (x for vertical bands, y for horizontal ones)
    pub offset: f64,
    pub length: f64,
    pub color: String,
    pub opacity: f64,
}

// ============================================================================
// STRATEGY PATTERN: Range Projection
// ============================================================================

/// Projects the two ends of a highlight range to pixels
pub trait RangeProjection {
    fn project(&self, start: &AxisValue, end: &AxisValue) -> Option<(f64, f64)>;
}

impl RangeProjection for XScale {
    fn project(&self, start: &AxisValue, end: &AxisValue) -> Option<(f64, f64)> {
        match self {
            // cover both boundary categories fully
            XScale::Band(_) => Some((self.position(start)?, self.position(end)? + self.bandwidth())),
            _ => Some((self.position(start)?, self.position(end)?)),
        }
    }
}

impl RangeProjection for YScale {
    fn project(&self, start: &AxisValue, end: &AxisValue) -> Option<(f64, f64)> {
        Some((self.scale(start.as_number()?), self.scale(end.as_number()?)))
    }
}

/// Project ranges through a scale, clipped to `[0, extent]`.
///
/// Ranges are order-independent. A range outside the visible domain, or one
/// whose ends cannot be read on this axis, degenerates to zero length.
pub fn process_highlights<S: RangeProjection + ?Sized>(
    scale: Option<&S>,
    ranges: &[HighlightRange],
    extent: f64,
    default_color: &str,
    default_opacity: f64,
) -> Vec<ProcessedHighlight> {
    let Some(scale) = scale else {
        return Vec::new();
    };

    ranges
        .iter()
        .map(|range| {
            let (offset, length) = match scale.project(&range.start, &range.end) {
                Some((a, b)) if a.is_finite() && b.is_finite() => {
                    let lead = a.min(b).clamp(0.0, extent);
                    let trail = a.max(b).clamp(0.0, extent);
                    (lead, trail - lead)
                }
                _ => (0.0, 0.0),
            };

            ProcessedHighlight {
                offset,
                length,
                color: range.color.clone().unwrap_or_else(|| default_color.to_string()),
                opacity: range.opacity.unwrap_or(default_opacity),
            }
        })
        .collect()
}
