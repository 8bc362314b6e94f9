use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw shipment document as fetched from the hosted store.
pub type RawDocument = serde_json::Value;

/// The fixed set of shipment statuses. Anything the store hands us that is
/// not one of these labels normalizes to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    Pending,
    #[serde(rename = "In Transit")]
    InTransit,
    Delivered,
    Delayed,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 4] = [
        ShipmentStatus::Pending,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Delayed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "Pending",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Delayed => "Delayed",
        }
    }

    /// Case-insensitive parse; unrecognized labels fall back to `Pending`.
    pub fn parse(label: &str) -> ShipmentStatus {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
            .unwrap_or(ShipmentStatus::Pending)
    }

    /// Badge color for the status, from the dashboard palette.
    pub fn color(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "#F59E0B",
            ShipmentStatus::InTransit => "#3B82F6",
            ShipmentStatus::Delivered => "#10B981",
            ShipmentStatus::Delayed => "#EF4444",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Deterministic color for open categories such as destinations: the label
/// hashes to a hue in [0, 360) with fixed saturation and lightness.
pub fn category_color(label: &str) -> String {
    let mut hash: u32 = 2166136261;
    for byte in label.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(16777619);
    }
    format!("hsl({}, 65%, 50%)", hash % 360)
}

/// Package dimensions in centimeters. Missing source values default to 0
/// field-by-field, never wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// A single line item inside a shipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_name: String,
    pub weight: f64,
    pub quantity: u32,
    pub value: f64,
    pub description: String,
    pub dimensions: Dimensions,
}

/// An image attached to a shipment: either an already-resolved URL or a
/// bare storage path that needs resolution through the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum ImageRef {
    Url(String),
    Path(String),
}

/// Canonical shipment record after normalization. Every field is populated
/// with either the source value or its documented default; derived totals
/// (weight, value, volume) are recomputed from `items`/`dimensions` on
/// every read rather than stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRecord {
    pub id: String,
    pub sender_name: String,
    pub receiver_name: String,
    pub carrier_name: String,
    pub origin: String,
    pub destination: String,
    pub mode: String,
    pub weight: f64,
    pub piece_count: u32,
    pub dimensions: Dimensions,
    pub description: String,
    pub status: ShipmentStatus,
    pub tracking_number: String,
    pub arrival_date: Option<DateTime<Utc>>,
    pub departure_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub items: Vec<LineItem>,
    pub images: Vec<ImageRef>,
}
