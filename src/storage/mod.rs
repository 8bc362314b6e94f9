pub mod http;
pub mod in_memory;

pub use http::HttpDocumentStore;
pub use in_memory::InMemoryStore;

use crate::domain::RawDocument;
use crate::error::Result;
use async_trait::async_trait;

/// Storage trait for the hosted shipment document collection.
///
/// The engine's only bulk-read contract is "fetch all documents": no
/// server-side filtering, sorting, or pagination is assumed, and all
/// derived views are computed client-side from the returned snapshot.
/// Documents come back as raw JSON; normalization happens on read.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches every document in the collection. Documents are expected to
    /// carry their `id` field; a backend that keys documents externally
    /// embeds the id before returning.
    async fn fetch_all(&self) -> Result<Vec<RawDocument>>;

    /// Fetches a single document by id, with that `id` embedded in the
    /// returned document.
    async fn fetch(&self, id: &str) -> Result<Option<RawDocument>>;

    /// Creates a document and returns its assigned id.
    async fn create(&self, doc: RawDocument) -> Result<String>;

    /// Replaces the document stored under `id`.
    async fn update(&self, id: &str, doc: RawDocument) -> Result<()>;

    /// Deletes the document stored under `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}
