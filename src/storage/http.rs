use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::RawDocument;
use crate::error::{Result, TrackerError};
use crate::storage::RecordStore;

/// Document store backed by a hosted JSON document API.
///
/// Expected surface, collection-scoped under the base URL:
/// - `GET    {base}/{collection}`       -> JSON array of documents
/// - `GET    {base}/{collection}/{id}`  -> one document (404 when absent)
/// - `POST   {base}/{collection}`       -> `{"id": "..."}`
/// - `PUT    {base}/{collection}/{id}`
/// - `DELETE {base}/{collection}/{id}`
///
/// Wire-protocol details beyond this shape are the backend's concern; the
/// engine only ever sees the returned documents.
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
}

impl HttpDocumentStore {
    pub fn new(base_url: &str, collection: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            api_key,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TrackerError::Store {
            message: format!("store responded {}: {}", status, body),
        })
    }
}

fn with_id(id: &str, mut doc: RawDocument) -> RawDocument {
    if let Some(map) = doc.as_object_mut() {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    doc
}

#[async_trait]
impl RecordStore for HttpDocumentStore {
    async fn fetch_all(&self) -> Result<Vec<RawDocument>> {
        let response = self
            .authorize(self.client.get(self.collection_url()))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let documents: Vec<RawDocument> = response.json().await?;

        debug!(
            count = documents.len(),
            collection = %self.collection,
            "Fetched shipment collection"
        );
        Ok(documents)
    }

    async fn fetch(&self, id: &str) -> Result<Option<RawDocument>> {
        let response = self
            .authorize(self.client.get(self.document_url(id)))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::expect_success(response).await?;
        let doc: RawDocument = response.json().await?;
        Ok(Some(with_id(id, doc)))
    }

    async fn create(&self, doc: RawDocument) -> Result<String> {
        let response = self
            .authorize(self.client.post(self.collection_url()).json(&doc))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let body: Value = response.json().await?;

        let id = body
            .get("id")
            .or_else(|| body.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| TrackerError::Store {
                message: "create response carried no document id".to_string(),
            })?
            .to_string();

        debug!("Created shipment document with id {}", id);
        Ok(id)
    }

    async fn update(&self, id: &str, doc: RawDocument) -> Result<()> {
        let response = self
            .authorize(self.client.put(self.document_url(id)).json(&doc))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TrackerError::NotFound(id.to_string()));
        }
        Self::expect_success(response).await?;

        debug!("Updated shipment document with id {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .authorize(self.client.delete(self.document_url(id)))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TrackerError::NotFound(id.to_string()));
        }
        Self::expect_success(response).await?;

        debug!("Deleted shipment document with id {}", id);
        Ok(())
    }
}
