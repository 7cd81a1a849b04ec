//! Ingestion pipeline orchestration.
//!
//! Coordinates the full flow for one CSV file: parse → normalize →
//! aggregate → archive the raw bytes → replace the company's stored
//! catalog. Bulk runs fan files out in small concurrent groups with a
//! pause between groups, isolating per-file failures so one bad export
//! never sinks the batch.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use globset::{Glob, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::aggregate::{difficulty_histogram, top_topics};
use crate::config::IngestConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::header::resolve_headers;
use crate::models::{BulkSummary, IngestFailure, IngestReceipt, Question, UploadFile};
use crate::naming::{company_name_from_file, slug_from_file, slugify};
use crate::normalize::normalize_row;
use crate::parse::parse_csv;
use crate::store::{BlobStore, CatalogStore, NewCompany};

pub struct Ingestor {
    store: Arc<dyn CatalogStore>,
    blobs: Arc<dyn BlobStore>,
    settings: IngestConfig,
}

impl Ingestor {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        blobs: Arc<dyn BlobStore>,
        settings: IngestConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            settings,
        }
    }

    /// Ingest one CSV file, replacing whatever the catalog already holds
    /// for the company.
    ///
    /// The company identity comes from `company_name` when given, otherwise
    /// it is derived from `file_name`. Re-ingesting the same company keeps
    /// its id and `created_at`.
    pub async fn ingest_file(
        &self,
        bytes: &[u8],
        file_name: &str,
        company_name: Option<&str>,
    ) -> CatalogResult<IngestReceipt> {
        let (name, slug) = match company_name {
            Some(name) => (name.trim().to_string(), slugify(name)),
            None => (company_name_from_file(file_name), slug_from_file(file_name)),
        };
        if slug.is_empty() {
            return Err(CatalogError::InvalidInput(format!(
                "cannot derive a slug from {file_name:?}"
            )));
        }
        info!("ingesting {} as {} ({})", file_name, name, slug);

        let text = String::from_utf8_lossy(bytes);
        let document = parse_csv(&text)?;
        if document.rows.is_empty() {
            return Err(CatalogError::Parse(format!(
                "{file_name}: no data rows found"
            )));
        }

        let roles = resolve_headers(&document.headers);
        let mut questions: Vec<Question> = Vec::new();
        for (index, row) in document.rows.iter().enumerate() {
            if let Some(question) = normalize_row(row, &roles, index + 1) {
                questions.push(question);
            }
        }
        let skipped = document.rows.len() - questions.len();
        if skipped > 0 {
            warn!("{}: skipped {} rows without a title", file_name, skipped);
        }

        let difficulties = difficulty_histogram(&questions);
        let topics = top_topics(&questions);

        let checksum = {
            let mut hasher = Sha256::new();
            hasher.update(bytes);
            format!("{:x}", hasher.finalize())
        };

        let blob = self
            .blobs
            .put(&format!("companies/{slug}.csv"), bytes)
            .await?;
        debug!("archived raw file at {}", blob.url);

        let company = self
            .store
            .upsert_company(&NewCompany {
                name: name.clone(),
                slug: slug.clone(),
                total_questions: questions.len() as i64,
                blob_url: blob.url.clone(),
                file_name: file_name.to_string(),
                checksum,
                last_updated: Utc::now().timestamp(),
            })
            .await?;

        // Clear previous catalog content before inserting the new one.
        futures::try_join!(
            self.store.delete_questions(&company.id),
            self.store.delete_difficulties(&company.id),
            self.store.delete_topics(&company.id),
        )?;

        for batch in questions.chunks(self.settings.question_batch_size.max(1)) {
            self.store.insert_questions(&company.id, batch).await?;
        }
        if !difficulties.is_empty() {
            self.store
                .insert_difficulties(&company.id, &difficulties)
                .await?;
        }
        if !topics.is_empty() {
            self.store.insert_topics(&company.id, &topics).await?;
        }

        info!("ingested {}: {} questions", slug, questions.len());
        Ok(IngestReceipt {
            file_name: file_name.to_string(),
            company_name: name,
            slug,
            total_questions: questions.len() as i64,
            blob_url: blob.url,
        })
    }

    /// Ingest many files, deriving each company from its file name.
    ///
    /// Files are processed in groups of `group_size` concurrent tasks with
    /// a pause between groups. Each file gets its own deadline; the whole
    /// run gets another. A file that fails or times out becomes a `failed`
    /// entry while the rest of the batch proceeds, so every submitted file
    /// is accounted for in the returned [`BulkSummary`].
    pub async fn ingest_batch(&self, files: Vec<UploadFile>) -> CatalogResult<BulkSummary> {
        if files.is_empty() {
            return Err(CatalogError::InvalidInput("no files provided".into()));
        }

        let total = files.len();
        let file_timeout = Duration::from_secs(self.settings.file_timeout_secs);
        let deadline = Instant::now() + Duration::from_secs(self.settings.batch_timeout_secs);
        let group_size = self.settings.group_size.max(1);
        let groups: Vec<&[UploadFile]> = files.chunks(group_size).collect();
        let group_count = groups.len();

        let mut successful: Vec<IngestReceipt> = Vec::new();
        let mut failed: Vec<IngestFailure> = Vec::new();

        for (group_index, group) in groups.iter().enumerate() {
            if Instant::now() >= deadline {
                warn!(
                    "batch deadline hit before group {}/{}",
                    group_index + 1,
                    group_count
                );
                for file in groups[group_index..].iter().flat_map(|g| g.iter()) {
                    failed.push(IngestFailure {
                        file_name: file.name.clone(),
                        reason: "batch deadline exceeded".into(),
                    });
                }
                break;
            }

            info!(
                "processing group {}/{} ({} files)",
                group_index + 1,
                group_count,
                group.len()
            );

            let mut tasks: FuturesUnordered<_> = group
                .iter()
                .map(|file| async move {
                    match timeout(file_timeout, self.ingest_file(&file.bytes, &file.name, None))
                        .await
                    {
                        Ok(Ok(receipt)) => Ok(receipt),
                        Ok(Err(err)) => Err(IngestFailure {
                            file_name: file.name.clone(),
                            reason: err.to_string(),
                        }),
                        Err(_) => Err(IngestFailure {
                            file_name: file.name.clone(),
                            reason: CatalogError::Timeout(self.settings.file_timeout_secs)
                                .to_string(),
                        }),
                    }
                })
                .collect();

            while let Some(outcome) = tasks.next().await {
                match outcome {
                    Ok(receipt) => successful.push(receipt),
                    Err(failure) => {
                        error!("{}: {}", failure.file_name, failure.reason);
                        failed.push(failure);
                    }
                }
            }

            if group_index + 1 < group_count {
                sleep(Duration::from_millis(self.settings.group_pause_ms)).await;
            }
        }

        info!(
            "bulk ingestion done: {} ok, {} failed of {}",
            successful.len(),
            failed.len(),
            total
        );
        Ok(BulkSummary {
            successful,
            failed,
            total,
        })
    }
}

/// Collect the CSV files under `root` that match `include_globs`, as
/// in-memory uploads named by their path relative to `root`.
pub fn collect_upload_files(root: &Path, include_globs: &[String]) -> Result<Vec<UploadFile>> {
    if !root.exists() {
        bail!("Bulk directory does not exist: {}", root.display());
    }

    let include_set = build_globset(include_globs)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if !include_set.is_match(&rel_str) {
            continue;
        }

        let bytes = std::fs::read(path)?;
        files.push(UploadFile {
            name: rel_str,
            bytes,
        });
    }

    // Sort for deterministic ordering
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
