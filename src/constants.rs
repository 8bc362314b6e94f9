/// Placeholder shown when an image reference cannot be resolved.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Sentinel for an absent tracking number.
pub const TRACKING_NUMBER_SENTINEL: &str = "-";

/// Sentinel rendered for absent or unparseable dates and durations.
pub const NOT_APPLICABLE: &str = "N/A";

/// Bucket key for records that carry no resolvable destination.
pub const UNKNOWN_DESTINATION: &str = "Unknown";

/// Default document collection name in the hosted store.
pub const SHIPMENTS_COLLECTION: &str = "shipments";
