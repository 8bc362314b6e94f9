use chrono::{DateTime, Utc};

use crate::constants::NOT_APPLICABLE;
use crate::domain::{Dimensions, LineItem};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Sum of item weights in kilograms. Empty input yields 0.
pub fn total_weight(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.weight).sum()
}

/// Sum of declared item values. Empty input yields 0.
pub fn total_value(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.value).sum()
}

/// Sum of item quantities. Empty input yields 0.
pub fn total_quantity(items: &[LineItem]) -> u32 {
    items.iter().map(|item| item.quantity).sum()
}

/// Package volume in cubic meters, rounded to two decimal places.
/// All three dimensions are centimeters; callers must not mix units.
pub fn volume_cubic_meters(dimensions: &Dimensions) -> f64 {
    let cubic_cm = dimensions.length * dimensions.width * dimensions.height;
    (cubic_cm / 1_000_000.0 * 100.0).round() / 100.0
}

/// Whole days in transit, rounded up. Returns `None` when either date is
/// absent: 0 would falsely read as same-day transit.
pub fn transit_days(
    departure: Option<DateTime<Utc>>,
    arrival: Option<DateTime<Utc>>,
) -> Option<i64> {
    let (departure, arrival) = (departure?, arrival?);
    let millis = (arrival - departure).num_milliseconds() as f64;
    Some((millis / MILLIS_PER_DAY).ceil() as i64)
}

/// Display form of `transit_days`, with the documented sentinel for the
/// not-applicable case.
pub fn format_transit_days(days: Option<i64>) -> String {
    match days {
        Some(days) => days.to_string(),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Arithmetic mean, defined as 0 on empty input.
pub fn average_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
