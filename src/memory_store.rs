//! In-memory [`CatalogStore`] and [`BlobStore`] implementations for tests.
//!
//! Uses `HashMap` and `Vec` behind `std::sync::RwLock` for thread safety.
//! `LIKE` matching supports the `%` wildcard only, case-insensitively,
//! mirroring how SQLite treats ASCII patterns.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{DifficultyCount, Question, TopicRank};
use crate::store::{
    BlobStore, CatalogStore, CompanyOverview, CompanyRecord, NewCompany, StoredBlob,
};

struct StoredQuestion {
    company_id: String,
    question: Question,
}

struct StoredDifficulty {
    company_id: String,
    count: DifficultyCount,
}

struct StoredTopic {
    company_id: String,
    topic: TopicRank,
}

/// In-memory catalog store.
pub struct MemoryCatalogStore {
    companies: RwLock<HashMap<String, CompanyRecord>>,
    questions: RwLock<Vec<StoredQuestion>>,
    difficulties: RwLock<Vec<StoredDifficulty>>,
    topics: RwLock<Vec<StoredTopic>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            companies: RwLock::new(HashMap::new()),
            questions: RwLock::new(Vec::new()),
            difficulties: RwLock::new(Vec::new()),
            topics: RwLock::new(Vec::new()),
        }
    }

    fn overview_for(&self, company: CompanyRecord) -> CompanyOverview {
        let difficulties = self
            .difficulties
            .read()
            .unwrap()
            .iter()
            .filter(|d| d.company_id == company.id)
            .map(|d| d.count.clone())
            .collect();
        let mut top_topics: Vec<TopicRank> = self
            .topics
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.company_id == company.id)
            .map(|t| t.topic.clone())
            .collect();
        top_topics.sort_by_key(|t| t.rank);
        CompanyOverview {
            company,
            difficulties,
            top_topics,
        }
    }
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Match `value` against a SQL `LIKE` pattern supporting only `%`.
fn like_match(pattern: &str, value: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let value = value.to_lowercase();
    let segments: Vec<&str> = pattern.split('%').collect();
    if segments.len() == 1 {
        return value == pattern;
    }

    let first = segments[0];
    let last = segments[segments.len() - 1];
    let mut rest = match value.strip_prefix(first) {
        Some(rest) => rest,
        None => return false,
    };
    for segment in &segments[1..segments.len() - 1] {
        if segment.is_empty() {
            continue;
        }
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn upsert_company(&self, company: &NewCompany) -> CatalogResult<CompanyRecord> {
        let mut companies = self.companies.write().unwrap();
        let record = match companies.get(&company.slug) {
            Some(existing) => CompanyRecord {
                id: existing.id.clone(),
                name: company.name.clone(),
                slug: company.slug.clone(),
                total_questions: company.total_questions,
                blob_url: company.blob_url.clone(),
                file_name: company.file_name.clone(),
                checksum: company.checksum.clone(),
                last_updated: company.last_updated,
                created_at: existing.created_at,
            },
            None => CompanyRecord {
                id: Uuid::new_v4().to_string(),
                name: company.name.clone(),
                slug: company.slug.clone(),
                total_questions: company.total_questions,
                blob_url: company.blob_url.clone(),
                file_name: company.file_name.clone(),
                checksum: company.checksum.clone(),
                last_updated: company.last_updated,
                created_at: company.last_updated,
            },
        };
        companies.insert(company.slug.clone(), record.clone());
        Ok(record)
    }

    async fn get_company(&self, slug: &str) -> CatalogResult<Option<CompanyOverview>> {
        let company = {
            let companies = self.companies.read().unwrap();
            companies.get(slug).cloned()
        };
        Ok(company.map(|c| self.overview_for(c)))
    }

    async fn list_companies(&self) -> CatalogResult<Vec<CompanyOverview>> {
        let records: Vec<CompanyRecord> = {
            let companies = self.companies.read().unwrap();
            companies.values().cloned().collect()
        };
        let mut overviews: Vec<CompanyOverview> = records
            .into_iter()
            .map(|c| self.overview_for(c))
            .collect();
        overviews.sort_by(|a, b| {
            b.company
                .total_questions
                .cmp(&a.company.total_questions)
                .then_with(|| a.company.name.cmp(&b.company.name))
        });
        Ok(overviews)
    }

    async fn list_questions(&self, company_id: &str) -> CatalogResult<Vec<Question>> {
        let questions = self.questions.read().unwrap();
        Ok(questions
            .iter()
            .filter(|q| q.company_id == company_id)
            .map(|q| q.question.clone())
            .collect())
    }

    async fn delete_questions(&self, company_id: &str) -> CatalogResult<()> {
        let mut questions = self.questions.write().unwrap();
        questions.retain(|q| q.company_id != company_id);
        Ok(())
    }

    async fn delete_difficulties(&self, company_id: &str) -> CatalogResult<()> {
        let mut difficulties = self.difficulties.write().unwrap();
        difficulties.retain(|d| d.company_id != company_id);
        Ok(())
    }

    async fn delete_topics(&self, company_id: &str) -> CatalogResult<()> {
        let mut topics = self.topics.write().unwrap();
        topics.retain(|t| t.company_id != company_id);
        Ok(())
    }

    async fn insert_questions(&self, company_id: &str, batch: &[Question]) -> CatalogResult<()> {
        let mut questions = self.questions.write().unwrap();
        for question in batch {
            questions.push(StoredQuestion {
                company_id: company_id.to_string(),
                question: question.clone(),
            });
        }
        Ok(())
    }

    async fn insert_difficulties(
        &self,
        company_id: &str,
        counts: &[DifficultyCount],
    ) -> CatalogResult<()> {
        let mut difficulties = self.difficulties.write().unwrap();
        for count in counts {
            difficulties.push(StoredDifficulty {
                company_id: company_id.to_string(),
                count: count.clone(),
            });
        }
        Ok(())
    }

    async fn insert_topics(&self, company_id: &str, topics: &[TopicRank]) -> CatalogResult<()> {
        let mut stored = self.topics.write().unwrap();
        for topic in topics {
            stored.push(StoredTopic {
                company_id: company_id.to_string(),
                topic: topic.clone(),
            });
        }
        Ok(())
    }

    async fn delete_companies_matching(&self, pattern: &str) -> CatalogResult<u64> {
        let removed_ids: Vec<String> = {
            let mut companies = self.companies.write().unwrap();
            let matching: Vec<String> = companies
                .iter()
                .filter(|(_, c)| like_match(pattern, &c.name))
                .map(|(slug, _)| slug.clone())
                .collect();
            matching
                .iter()
                .filter_map(|slug| companies.remove(slug))
                .map(|c| c.id)
                .collect()
        };
        for id in &removed_ids {
            self.delete_questions(id).await?;
            self.delete_difficulties(id).await?;
            self.delete_topics(id).await?;
        }
        Ok(removed_ids.len() as u64)
    }
}

/// In-memory blob store.
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.read().unwrap().get(path).cloned()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> CatalogResult<StoredBlob> {
        let mut blobs = self.blobs.write().unwrap();
        blobs.insert(path.to_string(), bytes.to_vec());
        Ok(StoredBlob {
            url: format!("memory://{path}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_match_wildcards() {
        assert!(like_match("Data/%", "Data/Acme"));
        assert!(!like_match("Data/%", "Acme"));
        assert!(like_match("%Corp", "Acme Corp"));
        assert!(like_match("%cme%", "Acme Corp"));
        assert!(like_match("Acme Corp", "acme corp"));
        assert!(!like_match("Acme", "Acme Corp"));
        assert!(like_match("%", "anything"));
    }

    #[tokio::test]
    async fn test_upsert_preserves_identity() {
        let store = MemoryCatalogStore::new();
        let first = store
            .upsert_company(&NewCompany {
                name: "Acme".into(),
                slug: "acme".into(),
                total_questions: 2,
                blob_url: "memory://a".into(),
                file_name: "acme.csv".into(),
                checksum: "aa".into(),
                last_updated: 100,
            })
            .await
            .unwrap();
        let second = store
            .upsert_company(&NewCompany {
                name: "Acme Corp".into(),
                slug: "acme".into(),
                total_questions: 5,
                blob_url: "memory://b".into(),
                file_name: "acme2.csv".into(),
                checksum: "bb".into(),
                last_updated: 200,
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.name, "Acme Corp");
        assert_eq!(second.total_questions, 5);
    }
}
