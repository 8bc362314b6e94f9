use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::constants::TRACKING_NUMBER_SENTINEL;
use crate::domain::{Dimensions, ImageRef, LineItem, ShipmentRecord, ShipmentStatus};

/// Normalizes a raw shipment document into the canonical record shape.
///
/// The function is total over arbitrary JSON input: malformed or missing
/// fields resolve to their documented defaults and never to an error.
/// Synonym-bearing fields are resolved by an ordered candidate list
/// evaluated first-match-wins, newer field names before legacy ones.
pub fn normalize(raw: &Value) -> ShipmentRecord {
    ShipmentRecord {
        id: string_field(raw, &["id", "documentId"], ""),
        sender_name: string_field(raw, &["senderName"], ""),
        receiver_name: string_field(raw, &["receiverName"], ""),
        carrier_name: string_field(raw, &["carrierName"], ""),
        origin: string_field(raw, &["origin"], ""),
        destination: string_field(
            raw,
            &["destination", "destinationCity", "receiverCity", "city"],
            "",
        ),
        mode: string_field(raw, &["mode"], ""),
        weight: number_field(raw, &["weight", "totalWeight", "Weight"]),
        piece_count: count_field(raw, &["pieces", "numberOfPieces"]),
        dimensions: dimensions_field(raw.get("dimensions")),
        description: string_field(raw, &["description"], ""),
        status: status_field(raw),
        tracking_number: string_field(raw, &["trackingNumber"], TRACKING_NUMBER_SENTINEL),
        arrival_date: date_field(raw, &["arrivalDate"]),
        departure_date: date_field(raw, &["departureDate"]),
        created_at: date_field(raw, &["timestamp", "createdAt", "dateCreated"]),
        items: items_field(raw.get("items")),
        images: images_field(raw.get("images")),
    }
}

/// First candidate holding a non-empty string wins; otherwise the default.
fn string_field(data: &Value, candidates: &[&str], default: &str) -> String {
    candidates
        .iter()
        .filter_map(|key| data.get(key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// The first populated candidate terminates resolution. Numeric strings
/// are accepted; a non-empty string that fails to parse yields the default
/// 0 rather than falling through, so garbage in a newer field never
/// resurrects a stale legacy value. Absent, null, and empty-string
/// candidates fall through to the next synonym. Negative values clamp to 0
/// so downstream arithmetic never sees a negative weight or dimension, and
/// nothing here can produce NaN.
fn number_field(data: &Value, candidates: &[&str]) -> f64 {
    for value in candidates.iter().filter_map(|key| data.get(key)) {
        if let Some(n) = value.as_f64() {
            return n.max(0.0);
        }
        if let Some(s) = value.as_str() {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                continue;
            }
            return match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => n.max(0.0),
                _ => 0.0,
            };
        }
    }
    0.0
}

fn count_field(data: &Value, candidates: &[&str]) -> u32 {
    number_field(data, candidates).floor() as u32
}

fn status_field(data: &Value) -> ShipmentStatus {
    let label = string_field(data, &["status", "Status", "shipmentStatus"], "");
    ShipmentStatus::parse(&label)
}

/// Dimensions are defaulted field-by-field: a record supplying only
/// `length` still yields width and height of 0.
fn dimensions_field(value: Option<&Value>) -> Dimensions {
    let data = value.unwrap_or(&Value::Null);
    Dimensions {
        length: number_field(data, &["length"]),
        width: number_field(data, &["width"]),
        height: number_field(data, &["height"]),
    }
}

fn items_field(value: Option<&Value>) -> Vec<LineItem> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| LineItem {
            item_name: string_field(entry, &["itemName", "name"], ""),
            weight: number_field(entry, &["weight"]),
            quantity: count_field(entry, &["quantity"]),
            value: number_field(entry, &["value"]),
            description: string_field(entry, &["description"], ""),
            dimensions: dimensions_field(entry.get("dimensions")),
        })
        .collect()
}

/// Accepts a literal URL, a `{url: ...}` descriptor, or a bare storage
/// path. Anything else is kept as an empty path, which resolves to the
/// placeholder image downstream.
fn images_field(value: Option<&Value>) -> Vec<ImageRef> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| {
            if let Some(s) = entry.as_str() {
                if s.starts_with("http") {
                    ImageRef::Url(s.to_string())
                } else {
                    ImageRef::Path(s.to_string())
                }
            } else if let Some(url) = entry.get("url").and_then(Value::as_str) {
                ImageRef::Url(url.to_string())
            } else {
                ImageRef::Path(String::new())
            }
        })
        .collect()
}

/// Dates arrive as RFC 3339 strings, bare `YYYY-MM-DD` days, US-style
/// `MM/DD/YYYY`, or a store timestamp object carrying epoch seconds.
/// Anything unparseable is treated as absent.
fn date_field(data: &Value, candidates: &[&str]) -> Option<DateTime<Utc>> {
    candidates
        .iter()
        .filter_map(|key| data.get(key))
        .find_map(parse_date)
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    if let Some(seconds) = value.get("seconds").and_then(Value::as_i64) {
        return Utc.timestamp_opt(seconds, 0).single();
    }
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%m/%d/%Y"))
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
