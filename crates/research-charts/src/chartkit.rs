//! # chartkit
//!
//! Core chart primitives: scales, tick generators, path builders, easing.
//! Tick and nice-rounding behaviour follows D3 so axes read the way analysts expect.

use std::fmt::Write;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for continuous scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;

    /// Generate tick values
    fn ticks(&self, count: usize) -> Vec<f64>;
}

// ============================================================================
// TICK ARITHMETIC
// ============================================================================

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Default tick count for every axis
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Returns `(i1, i2, inc)`: ticks are `i * inc` for positive `inc`,
/// `i / -inc` for negative `inc` (keeps sub-unit steps exact).
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round();
        i2 = (stop / step).round();
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick increment for `[start, stop]` (negative means `1 / -inc`)
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Absolute distance between adjacent ticks
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -step } else { step }
}

/// Roughly `count` round-numbered ticks inside `[start, stop]`
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if i2 < i1 || !inc.is_finite() {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();

    if reverse {
        out.reverse();
    }
    out
}

/// Extend a domain outward so both ends land on round tick values
pub fn nice_domain(start: f64, stop: f64, count: usize) -> (f64, f64) {
    if !start.is_finite() || !stop.is_finite() || start == stop || count == 0 {
        return (start, stop);
    }

    let reverse = stop < start;
    let (mut lo, mut hi) = if reverse { (stop, start) } else { (start, stop) };
    let mut prestep = None;

    for _ in 0..10 {
        let step = tick_increment(lo, hi, count);
        if prestep == Some(step) {
            break;
        } else if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else if step < 0.0 {
            lo = (lo * step).ceil() / step;
            hi = (hi * step).floor() / step;
        } else {
            break;
        }
        prestep = Some(step);
    }

    if reverse { (hi, lo) } else { (lo, hi) }
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Snap the domain outward to round numbers
    pub fn nice(mut self, count: usize) -> Self {
        self.domain = nice_domain(self.domain.0, self.domain.1, count);
        self
    }

    /// Get domain bounds
    pub fn domain_bounds(&self) -> (f64, f64) {
        self.domain
    }

    /// Distance between the ticks `ticks(count)` would produce
    pub fn tick_step(&self, count: usize) -> f64 {
        tick_step(self.domain.0, self.domain.1, count).abs()
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (value - d_min) / (d_max - d_min);
        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        d_min + normalized * (d_max - d_min)
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

// ============================================================================
// LOG SCALE
// ============================================================================

/// Base-10 logarithmic scale. Domain bounds must be strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LogScale {
    pub fn new() -> Self {
        Self {
            domain: (1.0, 10.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn domain_bounds(&self) -> (f64, f64) {
        self.domain
    }

    fn log_domain(&self) -> (f64, f64) {
        (self.domain.0.log10(), self.domain.1.log10())
    }
}

impl Default for LogScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LogScale {
    fn scale(&self, value: f64) -> f64 {
        let (l0, l1) = self.log_domain();
        let (r_min, r_max) = self.range;

        if (l1 - l0).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        r_min + (value.log10() - l0) / (l1 - l0) * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (l0, l1) = self.log_domain();
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return 10f64.powf((l0 + l1) / 2.0);
        }

        let normalized = (value - r_min) / (r_max - r_min);
        10f64.powf(l0 + normalized * (l1 - l0))
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut u, mut v) = self.domain;
        let reverse = v < u;
        if reverse {
            std::mem::swap(&mut u, &mut v);
        }
        if u <= 0.0 || !u.is_finite() || !v.is_finite() {
            return Vec::new();
        }

        let (i, j) = (u.log10(), v.log10());
        let n = count as f64;
        let mut out = Vec::new();

        if j - i < n {
            // few decades: 1..9 sub-steps within each power of ten
            for p in (i.floor() as i32)..=(j.ceil() as i32) {
                for k in 1..10 {
                    let t = if p < 0 {
                        k as f64 / 10f64.powi(-p)
                    } else {
                        k as f64 * 10f64.powi(p)
                    };
                    if t < u {
                        continue;
                    }
                    if t > v {
                        break;
                    }
                    out.push(t);
                }
            }
            if out.len() * 2 < count {
                out = ticks(u, v, count);
            }
        } else {
            let decades = (j - i).min(n).max(1.0) as usize;
            out = ticks(i, j, decades).into_iter().map(|e| 10f64.powf(e)).collect();
        }

        if reverse {
            out.reverse();
        }
        out
    }
}

// ============================================================================
// TIME SCALE
// ============================================================================

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Calendar-aware tick interval (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    /// Fixed duration in milliseconds, aligned to the epoch
    Fixed(i64),
    /// Every n-th day of the month, starting on the 1st
    Days(u32),
    /// Sundays at midnight
    Weeks,
    /// Every n-th month, starting in January
    Months(u32),
    /// Every n-th year
    Years(i32),
}

const TICK_INTERVALS: [(TimeInterval, i64); 18] = [
    (TimeInterval::Fixed(SECOND), SECOND),
    (TimeInterval::Fixed(5 * SECOND), 5 * SECOND),
    (TimeInterval::Fixed(15 * SECOND), 15 * SECOND),
    (TimeInterval::Fixed(30 * SECOND), 30 * SECOND),
    (TimeInterval::Fixed(MINUTE), MINUTE),
    (TimeInterval::Fixed(5 * MINUTE), 5 * MINUTE),
    (TimeInterval::Fixed(15 * MINUTE), 15 * MINUTE),
    (TimeInterval::Fixed(30 * MINUTE), 30 * MINUTE),
    (TimeInterval::Fixed(HOUR), HOUR),
    (TimeInterval::Fixed(3 * HOUR), 3 * HOUR),
    (TimeInterval::Fixed(6 * HOUR), 6 * HOUR),
    (TimeInterval::Fixed(12 * HOUR), 12 * HOUR),
    (TimeInterval::Days(1), DAY),
    (TimeInterval::Days(2), 2 * DAY),
    (TimeInterval::Weeks, WEEK),
    (TimeInterval::Months(1), MONTH),
    (TimeInterval::Months(3), 3 * MONTH),
    (TimeInterval::Years(1), YEAR),
];

// bounds any calendar walk
const MAX_TICK_WALK: usize = 2_000;

/// Time scale (maps timestamps to pixel positions)
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64), // Unix timestamps in milliseconds
    range: (f64, f64),
}

impl TimeScale {
    pub fn new() -> Self {
        Self {
            domain: (0, 1),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: i64, max: i64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn domain_bounds(&self) -> (i64, i64) {
        self.domain
    }

    /// Scale timestamp to pixel position
    pub fn scale(&self, timestamp: i64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if d_max == d_min {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (timestamp - d_min) as f64 / (d_max - d_min) as f64;
        r_min + normalized * (r_max - r_min)
    }

    /// Inverse scale (pixel to timestamp)
    pub fn invert(&self, value: f64) -> i64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        (d_min as f64 + normalized * (d_max - d_min) as f64) as i64
    }

    /// Interval that yields roughly `count` ticks over the domain
    pub fn tick_interval(&self, count: usize) -> TimeInterval {
        let (lo, hi) = ordered(self.domain);
        let target = (hi - lo) as f64 / count.max(1) as f64;

        let i = TICK_INTERVALS
            .iter()
            .position(|&(_, duration)| duration as f64 > target)
            .unwrap_or(TICK_INTERVALS.len());

        if i == TICK_INTERVALS.len() {
            let years = tick_step(lo as f64 / YEAR as f64, hi as f64 / YEAR as f64, count);
            return TimeInterval::Years(years.abs().round().max(1.0) as i32);
        }
        if i == 0 {
            let step = tick_step(lo as f64, hi as f64, count).abs().round().max(1.0);
            return TimeInterval::Fixed(step as i64);
        }

        let (prev, prev_len) = TICK_INTERVALS[i - 1];
        let (next, next_len) = TICK_INTERVALS[i];
        if target / (prev_len as f64) < next_len as f64 / target {
            prev
        } else {
            next
        }
    }

    /// Calendar-aligned tick timestamps inside the domain
    pub fn ticks(&self, count: usize) -> Vec<i64> {
        let (lo, hi) = ordered(self.domain);
        if count == 0 {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }
        interval_range(self.tick_interval(count), lo, hi)
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new()
    }
}

fn ordered((a, b): (i64, i64)) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn midnight_millis(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp_millis())
}

fn first_day_at_or_after(ms: i64) -> Option<NaiveDate> {
    let t: DateTime<Utc> = Utc.timestamp_millis_opt(ms).single()?;
    let day = t.date_naive();
    if midnight_millis(day)? < ms {
        day.succ_opt()
    } else {
        Some(day)
    }
}

/// All interval boundaries in `[lo, hi]`
fn interval_range(interval: TimeInterval, lo: i64, hi: i64) -> Vec<i64> {
    let mut out = Vec::new();

    match interval {
        TimeInterval::Fixed(step) => {
            let step = step.max(1);
            let mut t = lo.div_euclid(step) * step;
            if t < lo {
                t += step;
            }
            while t <= hi && out.len() < MAX_TICK_WALK {
                out.push(t);
                t += step;
            }
        }
        TimeInterval::Days(every) => {
            let mut day = first_day_at_or_after(lo);
            while let Some(d) = day {
                match midnight_millis(d) {
                    Some(t) if t <= hi && out.len() < MAX_TICK_WALK => {
                        if (d.day() - 1) % every.max(1) == 0 {
                            out.push(t);
                        }
                    }
                    _ => break,
                }
                day = d.succ_opt();
            }
        }
        TimeInterval::Weeks => {
            let mut day = first_day_at_or_after(lo);
            while let Some(d) = day {
                if d.weekday() == Weekday::Sun {
                    break;
                }
                day = d.succ_opt();
            }
            while let Some(d) = day {
                match midnight_millis(d) {
                    Some(t) if t <= hi && out.len() < MAX_TICK_WALK => out.push(t),
                    _ => break,
                }
                day = d.checked_add_signed(Duration::days(7));
            }
        }
        TimeInterval::Months(every) => {
            let mut month = first_day_at_or_after(lo).and_then(|d| {
                if d.day() == 1 {
                    Some(d)
                } else {
                    next_month(d.with_day(1)?)
                }
            });
            while let Some(d) = month {
                match midnight_millis(d) {
                    Some(t) if t <= hi && out.len() < MAX_TICK_WALK => {
                        if d.month0() % every.max(1) == 0 {
                            out.push(t);
                        }
                    }
                    _ => break,
                }
                month = next_month(d);
            }
        }
        TimeInterval::Years(every) => {
            let Some(start) = first_day_at_or_after(lo) else {
                return out;
            };
            let mut year = if start.ordinal() == 1 {
                start.year()
            } else {
                start.year() + 1
            };
            while out.len() < MAX_TICK_WALK {
                let Some(t) = NaiveDate::from_ymd_opt(year, 1, 1).and_then(midnight_millis) else {
                    break;
                };
                if t > hi {
                    break;
                }
                if year.rem_euclid(every.max(1)) == 0 {
                    out.push(t);
                }
                year += 1;
            }
        }
    }

    out
}

fn next_month(d: NaiveDate) -> Option<NaiveDate> {
    if d.month() == 12 {
        NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
    }
}

// ============================================================================
// BAND SCALE (categorical x positions)
// ============================================================================

/// Band scale for categorical data: one band per distinct key, in order
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl BandScale {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            range: (0.0, 1.0),
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Set inner and outer padding as fractions of the step
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Get step size (band + gap)
    pub fn step(&self) -> f64 {
        let n = self.keys.len() as f64;
        let (r_min, r_max) = self.range;
        (r_max - r_min) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0)
    }

    /// Get band width (width of each category band)
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    fn start(&self) -> f64 {
        let n = self.keys.len() as f64;
        let (r_min, r_max) = self.range;
        r_min + (r_max - r_min - self.step() * (n - self.padding_inner)) * self.align
    }

    /// Get band start for index
    pub fn scale_index(&self, index: usize) -> f64 {
        self.start() + self.step() * index as f64
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Band start for a key, `None` when the key is not in the domain
    pub fn position(&self, key: &str) -> Option<f64> {
        self.index_of(key).map(|i| self.scale_index(i))
    }

    /// Band center for a key
    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|p| p + self.bandwidth() / 2.0)
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn horizontal_to(mut self, x: f64) -> Self {
        let _ = write!(self.commands, "H{:.2}", x);
        self
    }

    pub fn vertical_to(mut self, y: f64) -> Self {
        let _ = write!(self.commands, "V{:.2}", y);
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

/// Generate line path (non-closed)
pub fn line_path(points: &[(f64, f64)]) -> String {
    let Some((&(x0, y0), rest)) = points.split_first() else {
        return String::new();
    };

    rest.iter()
        .fold(PathBuilder::new().move_to(x0, y0), |path, &(x, y)| path.line_to(x, y))
        .build()
}

/// Total length of a polyline, used for the dash-offset reveal
pub fn polyline_length(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
        .sum()
}

// ============================================================================
// EASING
// ============================================================================

/// Easing curve over normalized time `t` in `[0, 1]`
pub type Easing = fn(f64) -> f64;

pub fn ease_linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

pub fn ease_cubic_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}

pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(s: &str) -> i64 {
        DateTime::parse_from_rfc3339(s).unwrap().timestamp_millis()
    }

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);

        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(50.0), 250.0);
        assert_eq!(scale.scale(100.0), 500.0);
        assert_eq!(scale.invert(250.0), 50.0);
        // out-of-domain values extrapolate; the plot clip hides them
        assert_eq!(scale.scale(150.0), 750.0);
        assert_eq!(scale.scale(-20.0), -100.0);
    }

    #[test]
    fn test_ticks_match_d3() {
        assert_eq!(ticks(0.0, 1.0, 10).len(), 11);
        assert_eq!(ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        let fine = ticks(150.25, 152.8, 10);
        assert!((fine[0] - 150.4).abs() < 1e-9);
        assert!((fine.last().unwrap() - 152.8).abs() < 1e-9);
    }

    #[test]
    fn test_nice_domain_extends_outward() {
        let (lo, hi) = nice_domain(150.25, 152.80, 10);
        assert!(lo <= 150.25 && hi >= 152.80);
        assert!((lo - 150.2).abs() < 1e-9);
        assert!((hi - 152.8).abs() < 1e-9);

        assert_eq!(nice_domain(0.3, 97.0, 10), (0.0, 100.0));
        assert_eq!(nice_domain(5.0, 5.0, 10), (5.0, 5.0));
    }

    #[test]
    fn test_log_scale() {
        let scale = LogScale::new().domain(1.0, 1000.0).range(300.0, 0.0);
        assert_eq!(scale.scale(1.0), 300.0);
        assert!((scale.scale(10.0) - 200.0).abs() < 1e-9);
        assert!((scale.invert(100.0) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_log_ticks_sub_steps() {
        let scale = LogScale::new().domain(1.0, 100.0);
        let t = scale.ticks(10);
        assert_eq!(t.first(), Some(&1.0));
        assert_eq!(t.last(), Some(&100.0));
        assert!(t.contains(&5.0));
        assert!(t.contains(&50.0));
    }

    #[test]
    fn test_time_interval_daily() {
        let scale = TimeScale::new()
            .domain(ms("2024-01-01T00:00:00Z"), ms("2024-01-11T00:00:00Z"))
            .range(0.0, 700.0);
        assert_eq!(scale.tick_interval(10), TimeInterval::Days(1));
        let t = scale.ticks(10);
        assert_eq!(t.len(), 11);
        assert_eq!(t[0], ms("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_time_interval_monthly() {
        let scale = TimeScale::new()
            .domain(ms("2023-01-15T00:00:00Z"), ms("2024-01-15T00:00:00Z"))
            .range(0.0, 700.0);
        assert_eq!(scale.tick_interval(10), TimeInterval::Months(1));
        let t = scale.ticks(10);
        assert_eq!(t[0], ms("2023-02-01T00:00:00Z"));
        assert_eq!(t.len(), 12);
    }

    #[test]
    fn test_time_interval_hourly() {
        let scale = TimeScale::new()
            .domain(ms("2024-01-01T09:30:00Z"), ms("2024-01-01T19:30:00Z"))
            .range(0.0, 700.0);
        assert_eq!(scale.tick_interval(10), TimeInterval::Fixed(HOUR));
        assert_eq!(scale.ticks(10)[0], ms("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn test_time_scale_round_trip() {
        let scale = TimeScale::new().domain(0, 1_000).range(0.0, 100.0);
        assert_eq!(scale.scale(500), 50.0);
        assert_eq!(scale.invert(25.0), 250);
    }

    #[test]
    fn test_band_scale_padding() {
        let scale = BandScale::new(vec!["Jan".into(), "Feb".into()])
            .range(0.0, 210.0)
            .padding(0.1);
        // step = 210 / (2 - 0.1 + 0.2) = 100
        assert!((scale.step() - 100.0).abs() < 1e-9);
        assert!((scale.bandwidth() - 90.0).abs() < 1e-9);
        assert!((scale.position("Jan").unwrap() - 10.0).abs() < 1e-9);
        assert!((scale.center("Feb").unwrap() - 155.0).abs() < 1e-9);
        assert_eq!(scale.position("Mar"), None);
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .vertical_to(0.0)
            .build();

        assert!(path.contains("M0.00,0.00"));
        assert!(path.contains("L100.00,100.00"));
        assert!(path.ends_with("V0.00"));
    }

    #[test]
    fn test_line_path_and_length() {
        let points = [(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)];
        let path = line_path(&points);

        assert!(path.starts_with("M0.00,0.00"));
        assert!(path.contains("L3.00,4.00"));
        assert!((polyline_length(&points) - 11.0).abs() < 1e-9);
        assert_eq!(line_path(&[]), "");
    }

    #[test]
    fn test_easing_endpoints() {
        for ease in [ease_linear as Easing, ease_cubic_out, ease_cubic_in_out] {
            assert_eq!(ease(0.0), 0.0);
            assert!((ease(1.0) - 1.0).abs() < 1e-12);
        }
        assert!(ease_cubic_out(0.5) > 0.5);
    }
}
