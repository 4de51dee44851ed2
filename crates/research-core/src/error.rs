//! Chart error taxonomy and input validation

use serde_json::Value;
use thiserror::Error;

use crate::{DataPoint, XAxisKind};

/// Broad class of a [`ChartError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed dataset, detected before any scale construction
    InputValidation,
    /// Data outside what an axis kind can represent
    Domain,
    /// Error supplied by the caller
    External,
}

/// Everything that can stop a chart from rendering
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("Data must be an array")]
    NotASequence,

    #[error("Data array cannot be empty")]
    EmptyData,

    #[error("Data point at index {index} must be an object")]
    NotAnObject { index: usize },

    #[error("Data point at index {index} is missing x value")]
    MissingX { index: usize },

    #[error("Data point at index {index} is missing y value")]
    MissingY { index: usize },

    #[error("Data point at index {index} has invalid y value (must be a number)")]
    InvalidY { index: usize },

    #[error("Data point at index {index} has an x value that is not a valid {expected}")]
    InvalidX { index: usize, expected: &'static str },

    #[error("Logarithmic y-axis requires a strictly positive domain, got [{min}, {max}]")]
    NonPositiveLogDomain { min: f64, max: f64 },

    #[error("{0}")]
    External(String),
}

impl ChartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositiveLogDomain { .. } => ErrorKind::Domain,
            Self::External(_) => ErrorKind::External,
            _ => ErrorKind::InputValidation,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::InputValidation
    }
}

/// Parse an untyped JSON dataset, rejecting anything that is not a
/// non-empty array of `{x, y}` objects with a numeric `y`.
pub fn parse_series(value: &Value) -> Result<Vec<DataPoint>, ChartError> {
    let items = value.as_array().ok_or(ChartError::NotASequence)?;
    if items.is_empty() {
        return Err(ChartError::EmptyData);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item.as_object().ok_or(ChartError::NotAnObject { index })?;

            match object.get("x") {
                None | Some(Value::Null) => return Err(ChartError::MissingX { index }),
                Some(_) => {}
            }
            match object.get("y") {
                None | Some(Value::Null) => return Err(ChartError::MissingY { index }),
                Some(Value::Number(_)) => {}
                Some(_) => return Err(ChartError::InvalidY { index }),
            }

            serde_json::from_value::<DataPoint>(item.clone())
                .map_err(|_| ChartError::InvalidY { index })
        })
        .collect()
}

/// Validate a typed dataset: non-empty with every `y` finite.
pub fn validate_points(points: &[DataPoint]) -> Result<(), ChartError> {
    if points.is_empty() {
        return Err(ChartError::EmptyData);
    }

    match points.iter().position(|p| !p.y.is_finite()) {
        Some(index) => Err(ChartError::InvalidY { index }),
        None => Ok(()),
    }
}

/// Validate a dataset and check every `x` reads as the axis kind expects.
pub fn validate_for_axis(points: &[DataPoint], kind: XAxisKind) -> Result<(), ChartError> {
    validate_points(points)?;

    let bad = match kind {
        XAxisKind::Continuous => points.iter().position(|p| p.x.as_number().is_none()),
        XAxisKind::Temporal => points.iter().position(|p| p.x.as_instant().is_none()),
        XAxisKind::Categorical => None,
    };

    match bad {
        Some(index) => Err(ChartError::InvalidX {
            index,
            expected: kind.value_name(),
        }),
        None => Ok(()),
    }
}
