//! Sample datasets and simulated price history

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use rand::Rng;
use research_charts::TimeWindow;
use research_core::{DataPoint, Direction, MarketCapFormatter, YFormatter};

/// Daily closes for January 2024, sampled at 12:00 UTC
const JANUARY_CLOSES: [f64; 31] = [
    150.25, 152.80, 148.90, 155.20, 159.75, 159.75, 159.75, 162.30, 158.95, 164.50, 167.80,
    169.95, 169.95, 169.95, 172.40, 175.25, 178.90, 181.30, 184.85, 188.40, 188.40, 192.20,
    195.75, 197.60, 201.40, 205.90, 205.90, 205.90, 208.25, 212.25, 215.50,
];

pub fn stock_series() -> Vec<DataPoint> {
    JANUARY_CLOSES
        .iter()
        .zip(1u32..)
        .filter_map(|(&close, day)| {
            let at = Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).single()?;
            Some(DataPoint::new(at, close))
        })
        .collect()
}

pub fn linear_series() -> Vec<DataPoint> {
    [10.0, 15.0, 12.0, 18.0, 22.0, 20.0, 25.0, 28.0, 26.0, 32.0]
        .into_iter()
        .enumerate()
        .map(|(i, y)| DataPoint::new(i as f64, y))
        .collect()
}

pub fn categorical_series() -> Vec<DataPoint> {
    let months = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let values = [65.0, 75.0, 80.0, 88.0, 92.0, 98.0, 105.0, 102.0, 95.0, 87.0, 78.0, 70.0];
    months
        .into_iter()
        .zip(values)
        .map(|(month, y)| DataPoint::new(month, y))
        .collect()
}

/// Annual revenue in millions
pub fn revenue_series() -> Vec<DataPoint> {
    [
        (2020.0, 274_515.0),
        (2021.0, 365_817.0),
        (2022.0, 394_328.0),
        (2023.0, 383_285.0),
        (2024.0, 391_035.0),
    ]
    .into_iter()
    .map(|(year, y)| DataPoint::new(year, y))
    .collect()
}

/// Tooltip label for a revenue value given in millions
pub fn revenue_label(millions: f64) -> String {
    MarketCapFormatter.format(millions * 1e6)
}

/// Random-walk closes for `days` trading days beyond one edge of `extent`,
/// sorted by time. Weekends are skipped.
pub fn generate_trading_days(
    direction: Direction,
    extent: TimeWindow,
    days: usize,
    anchor_price: f64,
    rng: &mut impl Rng,
) -> Vec<DataPoint> {
    let edge = match direction {
        Direction::Before => extent.start_time(),
        Direction::After => extent.end_time(),
    };
    let Some(edge) = edge else {
        return Vec::new();
    };
    let step = match direction {
        Direction::Before => Duration::days(-1),
        Direction::After => Duration::days(1),
    };

    let mut date: NaiveDate = edge.date_naive();
    let mut price = anchor_price;
    let mut points = Vec::with_capacity(days);
    while points.len() < days {
        date += step;
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }
        let variation = (rng.r#gen::<f64>() - 0.5) * 0.02;
        price = (price * (1.0 + variation) * 100.0).round() / 100.0;
        if let Some(at) = date.and_hms_opt(12, 0, 0) {
            points.push(DataPoint::new(at.and_utc(), price));
        }
    }

    if direction == Direction::Before {
        points.reverse();
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_stock_series_covers_january() {
        let data = stock_series();
        assert_eq!(data.len(), 31);
        assert_eq!(data[0].x.to_string(), "2024-01-01T12:00:00+00:00");
        assert_eq!(data[30].y, 215.50);
    }

    #[test]
    fn test_revenue_label_scales_millions() {
        assert_eq!(revenue_label(365_817.0), "$365.82B");
        assert_eq!(revenue_label(0.5), "$500,000");
    }

    #[test]
    fn test_generated_history_precedes_extent_on_weekdays() {
        let extent = TimeWindow::from_pair((
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap().timestamp_millis(),
            Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap().timestamp_millis(),
        ));
        let mut rng = StdRng::seed_from_u64(7);
        let points = generate_trading_days(Direction::Before, extent, 5, 150.0, &mut rng);

        let dates: Vec<String> = points
            .iter()
            .map(|p| p.x.as_instant().unwrap().format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(
            dates,
            ["2023-12-25", "2023-12-26", "2023-12-27", "2023-12-28", "2023-12-29"]
        );
        assert!(points.iter().all(|p| (p.y - 150.0).abs() < 10.0));
    }

    #[test]
    fn test_generated_history_follows_extent() {
        let extent = TimeWindow::from_pair((
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap().timestamp_millis(),
            Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap().timestamp_millis(),
        ));
        let mut rng = StdRng::seed_from_u64(7);
        let points = generate_trading_days(Direction::After, extent, 3, 215.5, &mut rng);

        let first = points[0].x.as_millis().unwrap();
        assert!(first > extent.end);
        // Feb 1 is a Thursday, so Feb 3-4 are skipped
        assert_eq!(
            points[2].x.as_instant().unwrap().format("%Y-%m-%d").to_string(),
            "2024-02-05"
        );
    }
}
