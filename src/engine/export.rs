use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::NOT_APPLICABLE;
use crate::domain::ShipmentRecord;
use crate::engine::metrics::{
    format_transit_days, total_quantity, total_value, total_weight, transit_days,
    volume_cubic_meters,
};

/// Flat, serializable projection of a record for the export collaborator
/// (spreadsheet/PDF/CSV writers). Every normalized field is present and
/// nested structures are flattened into scalar columns; the collaborator
/// owns the actual serialization format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub id: String,
    pub sender_name: String,
    pub receiver_name: String,
    pub origin: String,
    pub destination: String,
    pub mode: String,
    pub weight_kg: f64,
    pub piece_count: u32,
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub volume_m3: f64,
    pub description: String,
    pub carrier_name: String,
    pub status: String,
    pub tracking_number: String,
    pub departure_date: String,
    pub arrival_date: String,
    pub created_at: String,
    pub transit_days: String,
    pub item_count: usize,
    pub items_total_weight_kg: f64,
    pub items_total_value: f64,
    pub items_total_quantity: u32,
    pub image_count: usize,
}

/// Projects the snapshot into flat rows, preserving input order.
pub fn flatten(records: &[ShipmentRecord]) -> Vec<FlatRecord> {
    records.iter().map(flatten_one).collect()
}

pub fn flatten_one(record: &ShipmentRecord) -> FlatRecord {
    FlatRecord {
        id: record.id.clone(),
        sender_name: record.sender_name.clone(),
        receiver_name: record.receiver_name.clone(),
        origin: record.origin.clone(),
        destination: record.destination.clone(),
        mode: record.mode.clone(),
        weight_kg: record.weight,
        piece_count: record.piece_count,
        length_cm: record.dimensions.length,
        width_cm: record.dimensions.width,
        height_cm: record.dimensions.height,
        volume_m3: volume_cubic_meters(&record.dimensions),
        description: record.description.clone(),
        carrier_name: record.carrier_name.clone(),
        status: record.status.label().to_string(),
        tracking_number: record.tracking_number.clone(),
        departure_date: format_date(record.departure_date),
        arrival_date: format_date(record.arrival_date),
        created_at: format_date(record.created_at),
        transit_days: format_transit_days(transit_days(
            record.departure_date,
            record.arrival_date,
        )),
        item_count: record.items.len(),
        items_total_weight_kg: total_weight(&record.items),
        items_total_value: total_value(&record.items),
        items_total_quantity: total_quantity(&record.items),
        image_count: record.images.len(),
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.to_rfc3339(),
        None => NOT_APPLICABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::normalize;
    use serde_json::json;

    #[test]
    fn test_flatten_preserves_input_order() {
        let records: Vec<ShipmentRecord> = ["b", "a", "c"]
            .iter()
            .map(|id| normalize(&json!({ "id": id })))
            .collect();
        let rows = flatten(&records);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_flatten_computes_derived_columns() {
        let record = normalize(&json!({
            "id": "ship-1",
            "dimensions": {"length": 100, "width": 50, "height": 20},
            "departureDate": "2024-01-01",
            "arrivalDate": "2024-01-04",
            "items": [
                {"itemName": "Pump", "weight": 10, "value": 100, "quantity": 2},
                {"itemName": "Hose", "weight": 5, "value": 50, "quantity": 1}
            ]
        }));
        let row = flatten_one(&record);
        assert_eq!(row.volume_m3, 0.10);
        assert_eq!(row.transit_days, "3");
        assert_eq!(row.items_total_weight_kg, 15.0);
        assert_eq!(row.items_total_value, 150.0);
        assert_eq!(row.items_total_quantity, 3);
    }

    #[test]
    fn test_flatten_uses_sentinels_for_missing_dates() {
        let row = flatten_one(&normalize(&json!({})));
        assert_eq!(row.departure_date, "N/A");
        assert_eq!(row.transit_days, "N/A");
        assert_eq!(row.tracking_number, "-");
    }
}
