//! Core data models shared across the ingestion pipeline and the CLI.

use serde::{Deserialize, Serialize};

/// A single interview question extracted from one CSV data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier carried over from the source file, or a synthesized
    /// `q-<row>` placeholder when the file has none.
    pub external_id: String,
    /// Question title. Rows without one are dropped before this type exists.
    pub title: String,
    /// Link to the question, empty when the source has no URL column.
    pub url: String,
    /// Whether the source marks the question as premium-only.
    pub is_premium: bool,
    /// Acceptance rate, kept verbatim as the source formats it.
    pub acceptance: String,
    /// Difficulty label, defaulting to `Medium` when absent.
    pub difficulty: String,
    /// How often the question is reported, `0` when absent or non-numeric.
    pub frequency: i64,
    /// Topic tags, already split and trimmed.
    pub topics: Vec<String>,
}

/// One bucket of the per-company difficulty histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyCount {
    pub level: String,
    pub count: i64,
}

/// One entry of the per-company ranked topic list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicRank {
    pub name: String,
    pub count: i64,
    /// 1-based rank, assigned after sorting by count descending.
    pub rank: i64,
}

/// An in-memory file handed to the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Path-like name, used to derive the company identity.
    pub name: String,
    pub bytes: Vec<u8>,
}

/// The outcome of one successful file ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub file_name: String,
    pub company_name: String,
    pub slug: String,
    pub total_questions: i64,
    pub blob_url: String,
}

/// A per-file failure recorded during bulk ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct IngestFailure {
    pub file_name: String,
    pub reason: String,
}

/// The envelope returned by a bulk ingestion run.
///
/// Every submitted file lands in exactly one of the two lists, so
/// `successful.len() + failed.len() == total` always holds.
#[derive(Debug, Clone, Serialize)]
pub struct BulkSummary {
    pub successful: Vec<IngestReceipt>,
    pub failed: Vec<IngestFailure>,
    pub total: usize,
}
