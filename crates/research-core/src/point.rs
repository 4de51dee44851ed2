//! Observation and highlight types for charting

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// AXIS VALUE
// ============================================================================

/// A raw value on an axis: number, instant or category label.
///
/// Deserializes untagged, so `1.5`, `"2024-01-02T12:00:00Z"` and `"Jan"`
/// all parse. RFC 3339 strings become [`AxisValue::Time`]; any other string
/// stays [`AxisValue::Text`] and is coerced lazily by the active axis kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Time(DateTime<Utc>),
    Text(String),
}

impl AxisValue {
    /// Numeric reading of the value. Instants read as epoch milliseconds.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Time(t) => Some(t.timestamp_millis() as f64),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|n| n.is_finite())
    }

    /// Instant reading of the value. Numbers read as epoch milliseconds.
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Time(t) => Some(*t),
            Self::Number(n) if n.is_finite() => Utc.timestamp_millis_opt(*n as i64).single(),
            Self::Number(_) => None,
            Self::Text(s) => parse_instant(s),
        }
    }

    /// Epoch milliseconds of the instant reading
    pub fn as_millis(&self) -> Option<i64> {
        self.as_instant().map(|t| t.timestamp_millis())
    }

    /// Category key (the display string of the raw value)
    pub fn category(&self) -> String {
        self.to_string()
    }

    pub fn is_time(&self) -> bool {
        matches!(self, Self::Time(_))
    }
}

impl std::fmt::Display for AxisValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for AxisValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AxisValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for AxisValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AxisValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<DateTime<Utc>> for AxisValue {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Time(t)
    }
}

/// Parse RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) or a bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// ============================================================================
// DATA POINT
// ============================================================================

/// Single (x, y) observation with an open bag of extra named fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: AxisValue,
    pub y: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataPoint {
    pub fn new(x: impl Into<AxisValue>, y: f64) -> Self {
        Self {
            x: x.into(),
            y,
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Earliest and latest instant over a dataset, in epoch milliseconds.
///
/// Points whose x cannot be read as an instant are skipped.
pub fn time_extent(points: &[DataPoint]) -> Option<(i64, i64)> {
    points
        .iter()
        .filter_map(|p| p.x.as_millis())
        .fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
}

/// Numeric x extent over a dataset
pub fn numeric_extent(points: &[DataPoint]) -> Option<(f64, f64)> {
    extent(points.iter().filter_map(|p| p.x.as_number()))
}

/// y extent over a dataset, ignoring non-finite values
pub fn value_extent(points: &[DataPoint]) -> Option<(f64, f64)> {
    extent(points.iter().map(|p| p.y).filter(|y| y.is_finite()))
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ============================================================================
// HIGHLIGHT RANGE
// ============================================================================

/// Shaded background band over an axis-domain interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub start: AxisValue,
    pub end: AxisValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl HighlightRange {
    pub fn new(start: impl Into<AxisValue>, end: impl Into<AxisValue>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            color: None,
            opacity: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_value_untagged_parsing() {
        let values: Vec<AxisValue> =
            serde_json::from_str(r#"[1.5, "2024-01-02T12:00:00Z", "Jan"]"#).unwrap();
        assert_eq!(values[0], AxisValue::Number(1.5));
        assert!(values[1].is_time());
        assert_eq!(values[2], AxisValue::Text("Jan".into()));
    }

    #[test]
    fn test_text_coerces_to_instant() {
        let day = AxisValue::from("2024-01-01");
        let t = day.as_instant().unwrap();
        assert_eq!(t.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert!(AxisValue::from("Jan").as_instant().is_none());
    }

    #[test]
    fn test_numbers_read_as_millis() {
        let v = AxisValue::from(86_400_000.0);
        assert_eq!(v.as_millis(), Some(86_400_000));
        assert_eq!(AxisValue::from("42").as_number(), Some(42.0));
    }

    #[test]
    fn test_extra_fields_flatten() {
        let p: DataPoint =
            serde_json::from_str(r#"{"x": 1, "y": 2.5, "volume": 1200}"#).unwrap();
        assert_eq!(p.y, 2.5);
        assert_eq!(p.field("volume"), Some(&Value::from(1200)));
        assert_eq!(DataPoint::new(1.0, 2.5).with_field("volume", 1200), p);
    }

    #[test]
    fn test_time_extent_keeps_raw_order_independent() {
        let points = vec![
            DataPoint::new("2024-01-03", 1.0),
            DataPoint::new("2024-01-01", 2.0),
            DataPoint::new("2024-01-02", 3.0),
        ];
        let (lo, hi) = time_extent(&points).unwrap();
        assert_eq!(hi - lo, 2 * 86_400_000);
    }
}
