//! # research-core
//!
//! Core domain types for the stock research charting engine.
//! Observations, axis kinds, highlight ranges, validation and formatting strategies.

pub mod error;
pub mod format;
pub mod point;

pub use error::*;
pub use format::*;
pub use point::*;

use serde::{Deserialize, Serialize};

// ============================================================================
// AXIS KINDS
// ============================================================================

/// How raw x values are projected onto the horizontal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XAxisKind {
    /// Numeric values on a linear scale
    #[serde(alias = "linear")]
    Continuous,
    /// Instants on a time scale
    #[default]
    #[serde(alias = "time")]
    Temporal,
    /// Distinct labels on a band scale
    #[serde(alias = "band")]
    Categorical,
}

impl XAxisKind {
    /// Name of the value type this axis expects, for error messages
    pub fn value_name(&self) -> &'static str {
        match self {
            Self::Continuous => "number",
            Self::Temporal => "date",
            Self::Categorical => "category",
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Temporal)
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Categorical)
    }
}

/// How y values are projected onto the vertical axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxisKind {
    #[default]
    Linear,
    #[serde(alias = "log")]
    Logarithmic,
}

/// Which way a pan crossed the loaded data's edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Before,
    After,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const PRIMARY: &str = "#3b82f6";
    pub const BG_ELEVATED: &str = "#1a1a1a";
    pub const BORDER: &str = "#2a2a2a";
    pub const TEXT_MUTED: &str = "#888888";
    pub const GRID: &str = "#e5e7eb";
    pub const HIGHLIGHT: &str = "#fbbf24";
}
