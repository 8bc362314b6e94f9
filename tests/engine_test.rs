use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use waretrack::blobs::{resolve_images, BlobStore, InMemoryBlobStore};
use waretrack::domain::{ShipmentRecord, ShipmentStatus};
use waretrack::engine;
use waretrack::engine::filter::FilterQuery;
use waretrack::engine::sort::SortKey;
use waretrack::storage::{InMemoryStore, RecordStore};

fn seeded_store() -> InMemoryStore {
    InMemoryStore::with_documents(vec![
        (
            "ship-1".to_string(),
            json!({
                "senderName": "Acme Exports",
                "receiverName": "Zulu Trading",
                "carrierName": "Procet Freight",
                "origin": "Johannesburg",
                "destination": "Durban",
                "mode": "Road",
                "weight": 120.5,
                "pieces": 4,
                "dimensions": {"length": 100, "width": 50, "height": 20},
                "status": "Delivered",
                "trackingNumber": "PRC-88341",
                "departureDate": "2024-01-01",
                "arrivalDate": "2024-01-04",
                "createdAt": "2024-01-01T08:00:00Z",
                "items": [
                    {"itemName": "Solar panels", "weight": 80, "value": 4000, "quantity": 10},
                    {"itemName": "Inverters", "weight": 40, "value": 2500, "quantity": 5}
                ]
            }),
        ),
        (
            "ship-2".to_string(),
            // Legacy shape: numberOfPieces, string weight, loose status casing
            json!({
                "senderName": "Globex",
                "receiverName": "Initech",
                "carrierName": "DHL Express",
                "origin": "Nairobi",
                "receiverCity": "Harare",
                "weight": "45.5",
                "numberOfPieces": 2,
                "status": "in transit",
                "createdAt": "2024-03-10T08:00:00Z"
            }),
        ),
        (
            "ship-3".to_string(),
            // Sparse document: everything defaults
            json!({
                "senderName": "Umbrella",
                "destination": "Durban"
            }),
        ),
    ])
}

async fn snapshot(store: &dyn RecordStore) -> Result<Vec<ShipmentRecord>> {
    let documents = store.fetch_all().await?;
    Ok(documents.iter().map(engine::normalize).collect())
}

#[tokio::test]
async fn test_fetch_normalize_filter_sort_pipeline() -> Result<()> {
    let store = seeded_store();
    let records = snapshot(&store).await?;
    assert_eq!(records.len(), 3);

    // Every record is fully populated after normalization
    for record in &records {
        assert!(!record.weight.is_nan());
        assert!(record.weight >= 0.0);
    }

    let legacy = records.iter().find(|r| r.id == "ship-2").unwrap();
    assert_eq!(legacy.piece_count, 2);
    assert_eq!(legacy.weight, 45.5);
    assert_eq!(legacy.status, ShipmentStatus::InTransit);
    // destination resolved through the receiverCity synonym
    assert_eq!(legacy.destination, "Harare");

    // Free-text search narrows to the matching record
    let query = FilterQuery {
        text: "procet".to_string(),
        ..FilterQuery::default()
    };
    let hits: Vec<_> = records.iter().filter(|r| engine::matches(r, &query)).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "ship-1");

    // Date-created sort: the undated record takes the front slot
    let mut sorted = records.clone();
    engine::sort_records(&mut sorted, SortKey::DateCreated, Utc::now());
    assert_eq!(sorted[0].id, "ship-3");
    assert_eq!(sorted[1].id, "ship-2");
    assert_eq!(sorted[2].id, "ship-1");

    Ok(())
}

#[tokio::test]
async fn test_reports_reflect_crud_changes() -> Result<()> {
    let store = seeded_store();

    let records = snapshot(&store).await?;
    let summary = engine::summarize(&records);
    assert_eq!(summary.total_entries, 3);
    assert_eq!(summary.delivered_count, 1);
    assert_eq!(summary.total_weight_kg, 166.0);

    // Deliver ship-2 and re-read: derived views are recomputed from the
    // fresh snapshot, never cached.
    let mut doc = store.fetch("ship-2").await?.unwrap();
    doc["status"] = json!("Delivered");
    store.update("ship-2", doc).await?;

    let records = snapshot(&store).await?;
    let summary = engine::summarize(&records);
    assert_eq!(summary.delivered_count, 2);

    store.delete("ship-3").await?;
    let records = snapshot(&store).await?;
    assert_eq!(engine::summarize(&records).total_entries, 2);

    let slices = engine::status_distribution(&records);
    let count_sum: usize = slices.iter().map(|s| s.count).sum();
    assert_eq!(count_sum, 2);

    Ok(())
}

#[tokio::test]
async fn test_top_destinations_from_snapshot() -> Result<()> {
    let store = seeded_store();
    let records = snapshot(&store).await?;

    let destinations = engine::top_destinations(&records, 5);
    let durban = destinations
        .iter()
        .find(|d| d.destination == "Durban")
        .unwrap();
    assert_eq!(durban.count, 2);

    let limited = engine::top_destinations(&records, 1);
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].destination, "Durban");

    Ok(())
}

#[tokio::test]
async fn test_export_projection_covers_snapshot() -> Result<()> {
    let store = seeded_store();
    let records = snapshot(&store).await?;

    let rows = engine::flatten(&records);
    assert_eq!(rows.len(), records.len());

    let full = rows.iter().find(|r| r.id == "ship-1").unwrap();
    assert_eq!(full.volume_m3, 0.10);
    assert_eq!(full.transit_days, "3");
    assert_eq!(full.items_total_weight_kg, 120.0);
    assert_eq!(full.items_total_value, 6500.0);

    let sparse = rows.iter().find(|r| r.id == "ship-3").unwrap();
    assert_eq!(sparse.transit_days, "N/A");
    assert_eq!(sparse.tracking_number, "-");

    Ok(())
}

#[tokio::test]
async fn test_image_resolution_for_fetched_record() -> Result<()> {
    let blobs: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
    blobs.upload("uploads/crate.jpg", vec![0xFF]).await?;

    let store = InMemoryStore::with_documents(vec![(
        "ship-img".to_string(),
        json!({
            "senderName": "Acme",
            "images": [
                "https://cdn.example.com/label.jpg",
                "uploads/crate.jpg",
                "uploads/gone.jpg"
            ]
        }),
    )]);

    let doc = store.fetch("ship-img").await?.unwrap();
    let record = engine::normalize(&doc);
    let urls = resolve_images(blobs, &record.images).await;

    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], "https://cdn.example.com/label.jpg");
    assert_eq!(urls[1], "memory://uploads/crate.jpg");
    assert_eq!(urls[2], "/placeholder.svg");

    Ok(())
}
