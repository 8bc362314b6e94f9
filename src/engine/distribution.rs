use serde::Serialize;

use crate::domain::ShipmentRecord;

/// A group of records sharing a categorical key. `percentage` is rounded
/// independently per bucket, so bucket percentages may not sum to exactly
/// 100; counts always sum to the total record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionBucket {
    pub key: String,
    pub count: usize,
    pub percentage: u32,
}

/// Groups records by `key_fn`, preserving first-encountered key order.
/// An empty record set yields an empty bucket list.
pub fn build_distribution<F>(records: &[ShipmentRecord], key_fn: F) -> Vec<DistributionBucket>
where
    F: Fn(&ShipmentRecord) -> String,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for record in records {
        let key = key_fn(record);
        if !counts.contains_key(&key) {
            order.push(key.clone());
        }
        *counts.entry(key).or_insert(0) += 1;
    }

    let total = records.len();
    order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            DistributionBucket {
                percentage: percentage(count, total),
                key,
                count,
            }
        })
        .collect()
}

/// Sorts buckets by descending count (stable, so ties keep their
/// first-encountered order) and truncates to the top `n`.
pub fn top_n(mut buckets: Vec<DistributionBucket>, n: usize) -> Vec<DistributionBucket> {
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(n);
    buckets
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * count as f64 / total as f64).round() as u32
}
