//! Scale factory for the line chart
//!
//! Builds the x and y scales for a dataset, an inner plot size and the
//! axis configuration. Scales are rebuilt from scratch whenever an input
//! changes; nothing here holds state.

use research_core::{
    AxisValue, ChartError, DataPoint, XAxisKind, YAxisKind, numeric_extent, time_extent,
    value_extent,
};

use crate::chartkit::{
    BandScale, DEFAULT_TICK_COUNT, LinearScale, LogScale, Scale, TimeScale, nice_domain,
};

/// Inner padding between categorical bands, as a fraction of the step
pub const BAND_PADDING: f64 = 0.1;

// ============================================================================
// SCALE OPTIONS
// ============================================================================

/// Inputs of the scale factory beyond the data and plot size
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleOptions {
    pub x_kind: XAxisKind,
    pub y_kind: YAxisKind,
    pub x_domain: Option<(AxisValue, AxisValue)>,
    pub y_domain: Option<(f64, f64)>,
}

impl ScaleOptions {
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
}

// ============================================================================
// X SCALE
// ============================================================================

/// Horizontal scale, one variant per x-axis kind
#[derive(Debug, Clone, PartialEq)]
pub enum XScale {
    Linear(LinearScale),
    Time(TimeScale),
    Band(BandScale),
}

/// A tick on the x axis: its raw value and pixel offset
#[derive(Debug, Clone, PartialEq)]
pub struct XTick {
    pub value: AxisValue,
    pub offset: f64,
}

impl XScale {
    pub fn kind(&self) -> XAxisKind {
        match self {
            Self::Linear(_) => XAxisKind::Continuous,
            Self::Time(_) => XAxisKind::Temporal,
            Self::Band(_) => XAxisKind::Categorical,
        }
    }

    /// Leading pixel edge of a value (band start for categories)
    pub fn position(&self, value: &AxisValue) -> Option<f64> {
        match self {
            Self::Linear(s) => value.as_number().map(|n| s.scale(n)),
            Self::Time(s) => value.as_millis().map(|t| s.scale(t)),
            Self::Band(s) => s.position(&value.category()),
        }
    }

    /// Pixel x of a data point (band center for categories)
    pub fn point_x(&self, value: &AxisValue) -> Option<f64> {
        match self {
            Self::Band(s) => s.center(&value.category()),
            _ => self.position(value),
        }
    }

    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band(s) => s.bandwidth(),
            _ => 0.0,
        }
    }

    /// Visible domain as numbers (epoch millis for time), `None` for bands
    pub fn numeric_domain(&self) -> Option<(f64, f64)> {
        match self {
            Self::Linear(s) => Some(s.domain_bounds()),
            Self::Time(s) => {
                let (lo, hi) = s.domain_bounds();
                Some((lo as f64, hi as f64))
            }
            Self::Band(_) => None,
        }
    }

    pub fn time_domain(&self) -> Option<(i64, i64)> {
        match self {
            Self::Time(s) => Some(s.domain_bounds()),
            _ => None,
        }
    }

    /// Tick values and offsets; categorical ticks sit on band centers
    pub fn ticks(&self, count: usize) -> Vec<XTick> {
        match self {
            Self::Linear(s) => s
                .ticks(count)
                .into_iter()
                .map(|v| XTick {
                    value: AxisValue::Number(v),
                    offset: s.scale(v),
                })
                .collect(),
            Self::Time(s) => s
                .ticks(count)
                .into_iter()
                .filter_map(|t| {
                    let instant = AxisValue::Number(t as f64).as_instant()?;
                    Some(XTick {
                        value: AxisValue::Time(instant),
                        offset: s.scale(t),
                    })
                })
                .collect(),
            Self::Band(s) => s
                .keys()
                .iter()
                .filter_map(|k| {
                    Some(XTick {
                        value: AxisValue::Text(k.clone()),
                        offset: s.center(k)?,
                    })
                })
                .collect(),
        }
    }

    /// Step between linear ticks, used for default label precision
    pub fn tick_step(&self, count: usize) -> f64 {
        match self {
            Self::Linear(s) => s.tick_step(count),
            _ => 0.0,
        }
    }
}

// ============================================================================
// Y SCALE
// ============================================================================

/// Vertical scale, inverted so larger values plot higher
#[derive(Debug, Clone, PartialEq)]
pub enum YScale {
    Linear(LinearScale),
    Log(LogScale),
}

impl YScale {
    pub fn scale(&self, value: f64) -> f64 {
        match self {
            Self::Linear(s) => s.scale(value),
            Self::Log(s) => s.scale(value),
        }
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        match self {
            Self::Linear(s) => s.invert(pixel),
            Self::Log(s) => s.invert(pixel),
        }
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Log(s) => s.ticks(count),
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain_bounds(),
            Self::Log(s) => s.domain_bounds(),
        }
    }

    pub fn tick_step(&self, count: usize) -> f64 {
        match self {
            Self::Linear(s) => s.tick_step(count),
            Self::Log(_) => 0.0,
        }
    }

    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log(_))
    }
}

// ============================================================================
// FACTORY
// ============================================================================

/// Both scales, either of which may be absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartScales {
    pub x: Option<XScale>,
    pub y: Option<YScale>,
}

impl ChartScales {
    /// Both scales when the chart can be drawn
    pub fn ready(&self) -> Option<(&XScale, &YScale)> {
        Some((self.x.as_ref()?, self.y.as_ref()?))
    }
}

/// Build the x and y scales for the inner plot rectangle.
///
/// An axis with neither data nor an explicit domain gets no scale. A
/// logarithmic y domain with a non-positive bound is rejected.
pub fn build_scales(
    data: &[DataPoint],
    inner_width: f64,
    inner_height: f64,
    options: &ScaleOptions,
) -> Result<ChartScales, ChartError> {
    let x = build_x_scale(data, inner_width, options.x_kind, options.x_domain.as_ref());
    let y = build_y_scale(data, inner_height, options.y_kind, options.y_domain)?;

    tracing::debug!(
        points = data.len(),
        inner_width,
        inner_height,
        has_x = x.is_some(),
        has_y = y.is_some(),
        "scales rebuilt"
    );

    Ok(ChartScales { x, y })
}

pub fn build_x_scale(
    data: &[DataPoint],
    width: f64,
    kind: XAxisKind,
    explicit: Option<&(AxisValue, AxisValue)>,
) -> Option<XScale> {
    match kind {
        XAxisKind::Continuous => {
            let (lo, hi) = explicit
                .and_then(|(a, b)| Some((a.as_number()?, b.as_number()?)))
                .or_else(|| numeric_extent(data))?;
            Some(XScale::Linear(LinearScale::new().domain(lo, hi).range(0.0, width)))
        }
        XAxisKind::Temporal => {
            let (lo, hi) = explicit
                .and_then(|(a, b)| Some((a.as_millis()?, b.as_millis()?)))
                .or_else(|| time_extent(data))?;
            Some(XScale::Time(TimeScale::new().domain(lo, hi).range(0.0, width)))
        }
        XAxisKind::Categorical => {
            let keys = match explicit {
                // a two-element domain names the end categories only
                Some((first, last)) => vec![first.category(), last.category()],
                None if data.is_empty() => return None,
                None => distinct_categories(data),
            };
            Some(XScale::Band(
                BandScale::new(keys).range(0.0, width).padding(BAND_PADDING),
            ))
        }
    }
}

pub fn build_y_scale(
    data: &[DataPoint],
    height: f64,
    kind: YAxisKind,
    explicit: Option<(f64, f64)>,
) -> Result<Option<YScale>, ChartError> {
    let Some((lo, hi)) = explicit.or_else(|| value_extent(data)) else {
        return Ok(None);
    };

    let scale = match kind {
        YAxisKind::Linear => {
            let scale = LinearScale::new().domain(lo, hi).range(height, 0.0);
            if explicit.is_none() {
                YScale::Linear(scale.nice(DEFAULT_TICK_COUNT))
            } else {
                YScale::Linear(scale)
            }
        }
        YAxisKind::Logarithmic => {
            check_log_domain(lo, hi)?;
            YScale::Log(LogScale::new().domain(lo, hi).range(height, 0.0))
        }
    };

    Ok(Some(scale))
}

pub fn check_log_domain(lo: f64, hi: f64) -> Result<(), ChartError> {
    if lo > 0.0 && hi > 0.0 {
        Ok(())
    } else {
        Err(ChartError::NonPositiveLogDomain { min: lo, max: hi })
    }
}

/// Distinct x categories in first-seen order
pub fn distinct_categories(data: &[DataPoint]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for point in data {
        let key = point.x.category();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

// ============================================================================
// Y TARGET DOMAIN
// ============================================================================

/// The y domain the chart should settle on.
///
/// Explicit domains win. Otherwise the extent of the data (restricted to the
/// visible x window when `fit_to_visible` is set and the window contains
/// points), nice-rounded for linear axes.
pub fn target_y_domain(
    data: &[DataPoint],
    visible_x: Option<(f64, f64)>,
    options: &ScaleOptions,
    fit_to_visible: bool,
) -> Option<(f64, f64)> {
    if let Some(explicit) = options.y_domain {
        return Some(explicit);
    }

    let visible_extent = match (fit_to_visible, visible_x, options.x_kind) {
        (true, Some((lo, hi)), XAxisKind::Continuous | XAxisKind::Temporal) => {
            let inside: Vec<DataPoint> = data
                .iter()
                .filter(|p| {
                    let x = match options.x_kind {
                        XAxisKind::Temporal => p.x.as_millis().map(|t| t as f64),
                        _ => p.x.as_number(),
                    };
                    x.is_some_and(|x| x >= lo.min(hi) && x <= lo.max(hi))
                })
                .cloned()
                .collect();
            value_extent(&inside)
        }
        _ => None,
    };

    let (lo, hi) = visible_extent.or_else(|| value_extent(data))?;
    match options.y_kind {
        YAxisKind::Linear => Some(nice_domain(lo, hi, DEFAULT_TICK_COUNT)),
        YAxisKind::Logarithmic => Some((lo, hi)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> Vec<DataPoint> {
        vec![
            DataPoint::new("2024-01-01", 150.25),
            DataPoint::new("2024-01-02", 152.80),
        ]
    }

    fn ms(s: &str) -> i64 {
        AxisValue::from(s).as_millis().unwrap()
    }

    #[test]
    fn test_temporal_round_trip_extent() {
        let options = ScaleOptions::new(XAxisKind::Temporal, YAxisKind::Linear);
        let scales = build_scales(&stock(), 700.0, 300.0, &options).unwrap();
        let (x, y) = scales.ready().unwrap();

        assert_eq!(x.time_domain(), Some((ms("2024-01-01"), ms("2024-01-02"))));
        assert_eq!(x.position(&AxisValue::from("2024-01-01")), Some(0.0));
        assert_eq!(x.position(&AxisValue::from("2024-01-02")), Some(700.0));

        let (lo, hi) = y.domain();
        assert!(lo <= 150.25 && hi >= 152.80);
        // larger values plot higher
        assert!(y.scale(152.8) < y.scale(150.25));
    }

    #[test]
    fn test_empty_data_without_domains_has_no_scales() {
        let options = ScaleOptions::new(XAxisKind::Temporal, YAxisKind::Linear);
        let scales = build_scales(&[], 700.0, 300.0, &options).unwrap();
        assert_eq!(scales, ChartScales::default());
    }

    #[test]
    fn test_empty_data_with_explicit_y_only() {
        let options = ScaleOptions::new(XAxisKind::Continuous, YAxisKind::Linear).y_domain(0.0, 10.0);
        let scales = build_scales(&[], 700.0, 300.0, &options).unwrap();
        assert!(scales.x.is_none());
        assert_eq!(scales.y.unwrap().domain(), (0.0, 10.0));
    }

    #[test]
    fn test_explicit_y_is_not_niced() {
        let options = ScaleOptions::new(XAxisKind::Continuous, YAxisKind::Linear).y_domain(0.3, 97.0);
        let data = vec![DataPoint::new(1.0, 5.0)];
        let y = build_scales(&data, 10.0, 10.0, &options).unwrap().y.unwrap();
        assert_eq!(y.domain(), (0.3, 97.0));
    }

    #[test]
    fn test_linear_x_monotonic() {
        let data: Vec<DataPoint> = (0..5).map(|i| DataPoint::new(i as f64 * 2.5, 1.0)).collect();
        let options = ScaleOptions::new(XAxisKind::Continuous, YAxisKind::Linear);
        let x = build_scales(&data, 400.0, 100.0, &options).unwrap().x.unwrap();

        let pixels: Vec<f64> = data.iter().filter_map(|p| x.position(&p.x)).collect();
        assert!(pixels.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(pixels[0], 0.0);
        assert_eq!(pixels[4], 400.0);
    }

    #[test]
    fn test_categorical_distinct_in_order() {
        let data = vec![
            DataPoint::new("Jan", 65.0),
            DataPoint::new("Feb", 75.0),
            DataPoint::new("Jan", 70.0),
        ];
        let options = ScaleOptions::new(XAxisKind::Categorical, YAxisKind::Linear);
        let x = build_scales(&data, 210.0, 100.0, &options).unwrap().x.unwrap();

        match &x {
            XScale::Band(band) => assert_eq!(band.keys(), ["Jan".to_string(), "Feb".to_string()]),
            other => panic!("expected band scale, got {other:?}"),
        }
        let ticks = x.ticks(10);
        assert_eq!(ticks.len(), 2);
        assert!((ticks[0].offset - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_categorical_two_element_domain_names_end_categories() {
        let data = vec![
            DataPoint::new("Jan", 1.0),
            DataPoint::new("Feb", 2.0),
            DataPoint::new("Mar", 3.0),
        ];
        let options = ScaleOptions::new(XAxisKind::Categorical, YAxisKind::Linear).x_domain("Jan", "Mar");
        let x = build_scales(&data, 300.0, 100.0, &options).unwrap().x.unwrap();

        assert!(x.position(&AxisValue::from("Jan")).is_some());
        assert!(x.position(&AxisValue::from("Mar")).is_some());
        assert_eq!(x.position(&AxisValue::from("Feb")), None);
    }

    #[test]
    fn test_log_rejects_non_positive() {
        let data = vec![DataPoint::new(1.0, 0.0), DataPoint::new(2.0, 10.0)];
        let options = ScaleOptions::new(XAxisKind::Continuous, YAxisKind::Logarithmic);
        assert_eq!(
            build_scales(&data, 100.0, 100.0, &options),
            Err(ChartError::NonPositiveLogDomain { min: 0.0, max: 10.0 })
        );
    }

    #[test]
    fn test_log_never_snaps() {
        let data = vec![DataPoint::new(1.0, 3.0), DataPoint::new(2.0, 870.0)];
        let options = ScaleOptions::new(XAxisKind::Continuous, YAxisKind::Logarithmic);
        let y = build_scales(&data, 100.0, 100.0, &options).unwrap().y.unwrap();
        assert!(y.is_log());
        assert_eq!(y.domain(), (3.0, 870.0));
    }

    #[test]
    fn test_target_fits_visible_window() {
        let data = vec![
            DataPoint::new(0.0, 10.0),
            DataPoint::new(1.0, 50.0),
            DataPoint::new(2.0, 52.0),
            DataPoint::new(3.0, 90.0),
        ];
        let options = ScaleOptions::new(XAxisKind::Continuous, YAxisKind::Linear);

        let full = target_y_domain(&data, Some((1.0, 2.0)), &options, false).unwrap();
        assert_eq!(full, (10.0, 90.0));

        let (lo, hi) = target_y_domain(&data, Some((1.0, 2.0)), &options, true).unwrap();
        assert!(lo <= 50.0 && hi >= 52.0 && lo > 40.0 && hi < 60.0);

        // an empty window falls back to the full extent
        let fallback = target_y_domain(&data, Some((10.0, 20.0)), &options, true).unwrap();
        assert_eq!(fallback, (10.0, 90.0));
    }
}
