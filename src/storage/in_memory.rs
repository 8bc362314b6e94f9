use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::domain::RawDocument;
use crate::error::{Result, TrackerError};
use crate::storage::RecordStore;

/// In-memory store for development and testing.
pub struct InMemoryStore {
    documents: Mutex<HashMap<String, RawDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds the store with pre-identified documents, e.g. test fixtures.
    pub fn with_documents(docs: Vec<(String, RawDocument)>) -> Self {
        Self {
            documents: Mutex::new(docs.into_iter().collect()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn with_id(id: &str, mut doc: RawDocument) -> RawDocument {
    if let Some(map) = doc.as_object_mut() {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    doc
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn fetch_all(&self) -> Result<Vec<RawDocument>> {
        let documents = self.documents.lock().unwrap();
        let mut all: Vec<RawDocument> = documents
            .iter()
            .map(|(id, doc)| with_id(id, doc.clone()))
            .collect();
        // HashMap iteration order is arbitrary; keep snapshots reproducible
        all.sort_by_key(|doc| {
            doc.get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        });
        Ok(all)
    }

    async fn fetch(&self, id: &str) -> Result<Option<RawDocument>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents.get(id).map(|doc| with_id(id, doc.clone())))
    }

    async fn create(&self, doc: RawDocument) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        let mut documents = self.documents.lock().unwrap();
        documents.insert(id.clone(), doc);

        debug!("Created shipment document with id {}", id);
        Ok(id)
    }

    async fn update(&self, id: &str, doc: RawDocument) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        if !documents.contains_key(id) {
            return Err(TrackerError::NotFound(id.to_string()));
        }
        documents.insert(id.to_string(), doc);

        debug!("Updated shipment document with id {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        if documents.remove(id).is_none() {
            return Err(TrackerError::NotFound(id.to_string()));
        }

        debug!("Deleted shipment document with id {}", id);
        Ok(())
    }
}
