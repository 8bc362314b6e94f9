use serde::Serialize;

use crate::constants::UNKNOWN_DESTINATION;
use crate::domain::{category_color, ShipmentRecord, ShipmentStatus};
use crate::engine::distribution::{build_distribution, top_n};
use crate::engine::metrics::{average_of, transit_days};

/// Headline dashboard numbers, recomputed fresh from every snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_entries: usize,
    pub total_weight_kg: f64,
    pub delivered_count: usize,
    pub delivered_pct: u32,
    /// Mean transit days over records where both dates are known; 0 when
    /// no record has a computable transit time.
    pub average_transit_days: f64,
}

/// Status bucket annotated with the badge color for chart rendering.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSlice {
    pub status: String,
    pub count: usize,
    pub percentage: u32,
    pub color: String,
}

/// Destination bucket annotated with a deterministic category color.
#[derive(Debug, Clone, Serialize)]
pub struct DestinationSlice {
    pub destination: String,
    pub count: usize,
    pub percentage: u32,
    pub color: String,
}

pub fn summarize(records: &[ShipmentRecord]) -> ReportSummary {
    let total_entries = records.len();
    let total_weight_kg = records.iter().map(|r| r.weight).sum();
    let delivered_count = records
        .iter()
        .filter(|r| r.status == ShipmentStatus::Delivered)
        .count();
    let delivered_pct = if total_entries == 0 {
        0
    } else {
        (100.0 * delivered_count as f64 / total_entries as f64).round() as u32
    };

    let transit_samples: Vec<f64> = records
        .iter()
        .filter_map(|r| transit_days(r.departure_date, r.arrival_date))
        .map(|days| days as f64)
        .collect();

    ReportSummary {
        total_entries,
        total_weight_kg,
        delivered_count,
        delivered_pct,
        average_transit_days: average_of(&transit_samples),
    }
}

pub fn status_distribution(records: &[ShipmentRecord]) -> Vec<StatusSlice> {
    build_distribution(records, |r| r.status.label().to_string())
        .into_iter()
        .map(|bucket| StatusSlice {
            color: ShipmentStatus::parse(&bucket.key).color().to_string(),
            status: bucket.key,
            count: bucket.count,
            percentage: bucket.percentage,
        })
        .collect()
}

/// Top destinations by shipment count. Records without a destination fall
/// into the `Unknown` bucket rather than being dropped.
pub fn top_destinations(records: &[ShipmentRecord], limit: usize) -> Vec<DestinationSlice> {
    let buckets = build_distribution(records, destination_key);
    top_n(buckets, limit)
        .into_iter()
        .map(|bucket| DestinationSlice {
            color: category_color(&bucket.key),
            destination: bucket.key,
            count: bucket.count,
            percentage: bucket.percentage,
        })
        .collect()
}

fn destination_key(record: &ShipmentRecord) -> String {
    if record.destination.is_empty() {
        UNKNOWN_DESTINATION.to_string()
    } else {
        record.destination.clone()
    }
}
