use serde::Deserialize;

use crate::domain::ShipmentRecord;

/// Sentinel filter value meaning "no constraint".
pub const ALL: &str = "all";

/// Composable filter over the record list. `text` is matched as a
/// case-insensitive substring; `status` and `origin` are exact matches
/// with the `"all"` sentinel disabling the constraint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterQuery {
    pub text: String,
    pub status: String,
    pub origin: String,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            status: ALL.to_string(),
            origin: ALL.to_string(),
        }
    }
}

/// Pure predicate: true when the record satisfies every active constraint.
pub fn matches(record: &ShipmentRecord, query: &FilterQuery) -> bool {
    matches_text(record, &query.text)
        && matches_category(record.status.label(), &query.status)
        && matches_category(&record.origin, &query.origin)
}

/// A record matches the text filter when any searchable field contains the
/// query substring: sender, receiver, tracking number, carrier, and the
/// first line item's name when the record carries items. The empty query
/// matches everything.
fn matches_text(record: &ShipmentRecord, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    let mut haystacks = vec![
        record.sender_name.as_str(),
        record.receiver_name.as_str(),
        record.tracking_number.as_str(),
        record.carrier_name.as_str(),
    ];
    if let Some(first) = record.items.first() {
        haystacks.push(first.item_name.as_str());
    }
    haystacks
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn matches_category(field: &str, constraint: &str) -> bool {
    constraint == ALL || field == constraint
}

/// Applies the filter to a snapshot, preserving input order.
pub fn apply<'a>(records: &'a [ShipmentRecord], query: &FilterQuery) -> Vec<&'a ShipmentRecord> {
    records.iter().filter(|r| matches(r, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::normalize;
    use serde_json::json;

    fn record(fields: serde_json::Value) -> ShipmentRecord {
        normalize(&fields)
    }

    #[test]
    fn test_all_sentinel_query_matches_every_record() {
        let records = [
            record(json!({})),
            record(json!({"senderName": "Acme", "status": "Delayed"})),
        ];
        let query = FilterQuery::default();
        for r in &records {
            assert!(matches(r, &query));
        }
    }

    #[test]
    fn test_text_search_is_case_insensitive_across_fields() {
        let r = record(json!({
            "senderName": "Acme Exports",
            "receiverName": "Zulu Trading",
            "trackingNumber": "PRC-88341",
            "carrierName": "Procet Freight",
            "items": [{"itemName": "Solar panels"}]
        }));
        for term in ["acme", "ZULU", "prc-88", "procet", "solar"] {
            let query = FilterQuery {
                text: term.to_string(),
                ..FilterQuery::default()
            };
            assert!(matches(&r, &query), "expected match for {term}");
        }

        let miss = FilterQuery {
            text: "missing".to_string(),
            ..FilterQuery::default()
        };
        assert!(!matches(&r, &miss));
    }

    #[test]
    fn test_categorical_filters_are_exact() {
        let r = record(json!({"status": "In Transit", "origin": "Nairobi"}));

        let hit = FilterQuery {
            status: "In Transit".to_string(),
            origin: "Nairobi".to_string(),
            ..FilterQuery::default()
        };
        assert!(matches(&r, &hit));

        // Case-sensitive equality, unlike text search
        let wrong_case = FilterQuery {
            origin: "nairobi".to_string(),
            ..FilterQuery::default()
        };
        assert!(!matches(&r, &wrong_case));
    }

    #[test]
    fn test_adding_text_constraint_never_expands_the_matched_set() {
        let records: Vec<ShipmentRecord> = vec![
            record(json!({"senderName": "Acme"})),
            record(json!({"senderName": "Globex"})),
            record(json!({"senderName": "Acme Exports"})),
        ];
        let unconstrained = apply(&records, &FilterQuery::default());
        let constrained = apply(
            &records,
            &FilterQuery {
                text: "acme".to_string(),
                ..FilterQuery::default()
            },
        );
        assert!(constrained.len() <= unconstrained.len());
        for r in &constrained {
            assert!(unconstrained.iter().any(|u| std::ptr::eq(*u, *r)));
        }
    }
}
