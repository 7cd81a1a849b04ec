//! Storage ports for the catalog.
//!
//! The ingestion pipeline and the CLI talk to storage only through these
//! traits. [`crate::sqlite_store`] is the production adapter;
//! [`crate::memory_store`] backs unit tests.

use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{DifficultyCount, Question, TopicRank};

/// A company row as persisted, with its assigned id and timestamps.
#[derive(Debug, Clone)]
pub struct CompanyRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub total_questions: i64,
    pub blob_url: String,
    pub file_name: String,
    /// SHA-256 of the raw file bytes from the most recent ingestion.
    pub checksum: String,
    /// Unix seconds of the most recent ingestion.
    pub last_updated: i64,
    /// Unix seconds of the first ingestion, never changed by re-ingestion.
    pub created_at: i64,
}

/// Fields for an insert-or-replace of a company, keyed by slug.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub slug: String,
    pub total_questions: i64,
    pub blob_url: String,
    pub file_name: String,
    pub checksum: String,
    pub last_updated: i64,
}

/// A company joined with its stored aggregates.
#[derive(Debug, Clone)]
pub struct CompanyOverview {
    pub company: CompanyRecord,
    pub difficulties: Vec<DifficultyCount>,
    pub top_topics: Vec<TopicRank>,
}

/// Persistence port for companies, questions, and aggregates.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert the company or, when the slug already exists, update its
    /// metadata in place. `created_at` is preserved across updates.
    async fn upsert_company(&self, company: &NewCompany) -> CatalogResult<CompanyRecord>;

    /// Fetch one company with its aggregates.
    async fn get_company(&self, slug: &str) -> CatalogResult<Option<CompanyOverview>>;

    /// All companies with aggregates, ordered by question count descending,
    /// then name.
    async fn list_companies(&self) -> CatalogResult<Vec<CompanyOverview>>;

    /// Questions for a company, in insertion order.
    async fn list_questions(&self, company_id: &str) -> CatalogResult<Vec<Question>>;

    async fn delete_questions(&self, company_id: &str) -> CatalogResult<()>;

    async fn delete_difficulties(&self, company_id: &str) -> CatalogResult<()>;

    async fn delete_topics(&self, company_id: &str) -> CatalogResult<()>;

    /// Insert one batch of questions, atomically.
    async fn insert_questions(&self, company_id: &str, batch: &[Question]) -> CatalogResult<()>;

    async fn insert_difficulties(
        &self,
        company_id: &str,
        counts: &[DifficultyCount],
    ) -> CatalogResult<()>;

    async fn insert_topics(&self, company_id: &str, topics: &[TopicRank]) -> CatalogResult<()>;

    /// Delete every company whose name matches the SQL `LIKE` pattern,
    /// along with its questions and aggregates. Returns the number of
    /// companies removed.
    async fn delete_companies_matching(&self, pattern: &str) -> CatalogResult<u64>;
}

/// Location of a stored raw file.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub url: String,
}

/// Port for archiving the raw uploaded files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `path`, overwriting any previous version.
    async fn put(&self, path: &str, bytes: &[u8]) -> CatalogResult<StoredBlob>;
}
