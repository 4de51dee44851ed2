//! Formatting strategies for axis ticks and tooltips

use chrono::{DateTime, Utc};

use crate::AxisValue;

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for formatting x-axis values
pub trait XFormatter: Send + Sync {
    fn format(&self, value: &AxisValue) -> String;
}

/// Strategy trait for formatting y values
pub trait YFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

impl<F> XFormatter for F
where
    F: Fn(&AxisValue) -> String + Send + Sync,
{
    fn format(&self, value: &AxisValue) -> String {
        self(value)
    }
}

impl<F> YFormatter for F
where
    F: Fn(f64) -> String + Send + Sync,
{
    fn format(&self, value: f64) -> String {
        self(value)
    }
}

/// `$150.25` style currency formatter
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    pub decimals: usize,
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl YFormatter for CurrencyFormatter {
    fn format(&self, value: f64) -> String {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}${:.prec$}", sign, value.abs(), prec = self.decimals)
    }
}

/// Currency with thousands separators, e.g. `$12,345.67`
#[derive(Debug, Clone, Default)]
pub struct FullCurrencyFormatter;

impl YFormatter for FullCurrencyFormatter {
    fn format(&self, value: f64) -> String {
        let sign = if value < 0.0 { "-" } else { "" };
        let fixed = format!("{:.2}", value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
    }
}

/// One-decimal percentage, e.g. `12.5%`
#[derive(Debug, Clone, Default)]
pub struct PercentFormatter;

impl YFormatter for PercentFormatter {
    fn format(&self, value: f64) -> String {
        format!("{:.1}%", value)
    }
}

/// Values in millions, e.g. `$274.5M`
#[derive(Debug, Clone, Default)]
pub struct MillionsFormatter;

impl YFormatter for MillionsFormatter {
    fn format(&self, value: f64) -> String {
        format!("${:.1}M", value / 1_000_000.0)
    }
}

/// Compact formatter for large numbers (K, M, B suffixes)
#[derive(Debug, Clone, Default)]
pub struct CompactNumberFormatter;

impl YFormatter for CompactNumberFormatter {
    fn format(&self, num: f64) -> String {
        let abs = num.abs();
        let sign = if num < 0.0 { "-" } else { "" };

        if abs >= 1_000_000_000.0 {
            format!("{}{:.2}B", sign, abs / 1_000_000_000.0)
        } else if abs >= 1_000_000.0 {
            format!("{}{:.2}M", sign, abs / 1_000_000.0)
        } else if abs >= 1_000.0 {
            format!("{}{:.2}K", sign, abs / 1_000.0)
        } else {
            format!("{}{:.2}", sign, abs)
        }
    }
}

/// Dollar amounts with T/B/M suffixes, e.g. `$2.80T`; smaller values are
/// printed whole with thousands separators
#[derive(Debug, Clone, Default)]
pub struct MarketCapFormatter;

impl YFormatter for MarketCapFormatter {
    fn format(&self, value: f64) -> String {
        let abs = value.abs();
        let sign = if value < 0.0 { "-" } else { "" };

        if abs >= 1e12 {
            format!("{}${:.2}T", sign, abs / 1e12)
        } else if abs >= 1e9 {
            format!("{}${:.2}B", sign, abs / 1e9)
        } else if abs >= 1e6 {
            format!("{}${:.2}M", sign, abs / 1e6)
        } else {
            format!("{}${}", sign, group_thousands(&format!("{:.0}", abs)))
        }
    }
}

/// Dates as `Jan 5` (UTC), or `Jan 5, 2024 14:30` when `full` is set
#[derive(Debug, Clone, Default)]
pub struct DateFormatter {
    pub full: bool,
}

impl DateFormatter {
    pub fn short() -> Self {
        Self { full: false }
    }

    pub fn full() -> Self {
        Self { full: true }
    }
}

impl XFormatter for DateFormatter {
    fn format(&self, value: &AxisValue) -> String {
        match value.as_instant() {
            Some(t) if self.full => t.format("%b %-d, %Y %H:%M").to_string(),
            Some(t) => t.format("%b %-d").to_string(),
            None => value.to_string(),
        }
    }
}

// ============================================================================
// DEFAULT FORMATTERS
// ============================================================================

/// Format a tick value with just enough decimals for the tick step
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    let text = format!("{:.prec$}", value, prec = decimals);
    // avoid "-0"
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_string()
    } else {
        text
    }
}

/// Default time tick label (`01/05`)
pub fn format_time_tick(t: DateTime<Utc>) -> String {
    t.format("%m/%d").to_string()
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}
