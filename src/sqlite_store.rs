//! SQLite-backed [`CatalogStore`].

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{DifficultyCount, Question, TopicRank};
use crate::store::{CatalogStore, CompanyOverview, CompanyRecord, NewCompany};

pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

fn store_err(e: sqlx::Error) -> CatalogError {
    CatalogError::Store(e.to_string())
}

impl SqliteCatalogStore {
    /// Open (creating if missing) the database at `config.db.path`.
    pub async fn connect(config: &Config) -> CatalogResult<Self> {
        let db_path = &config.db.path;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CatalogError::Store(format!("create {}: {e}", parent.display())))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(store_err)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(store_err)?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes. Safe to run repeatedly.
    pub async fn init_schema(&self) -> CatalogResult<()> {
        // Create companies table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS companies (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                total_questions INTEGER NOT NULL DEFAULT 0,
                blob_url TEXT NOT NULL DEFAULT '',
                file_name TEXT NOT NULL DEFAULT '',
                checksum TEXT NOT NULL DEFAULT '',
                last_updated INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        // Create questions table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                question_id TEXT NOT NULL,
                title TEXT NOT NULL,
                url TEXT NOT NULL DEFAULT '',
                is_premium INTEGER NOT NULL DEFAULT 0,
                acceptance TEXT NOT NULL DEFAULT '',
                difficulty TEXT NOT NULL DEFAULT 'Medium',
                frequency INTEGER NOT NULL DEFAULT 0,
                topics TEXT NOT NULL DEFAULT '[]',
                FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        // Create difficulty histogram table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS company_difficulties (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                count INTEGER NOT NULL,
                FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        // Create ranked topics table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS company_topics (
                id TEXT PRIMARY KEY,
                company_id TEXT NOT NULL,
                topic TEXT NOT NULL,
                count INTEGER NOT NULL,
                rank INTEGER NOT NULL,
                FOREIGN KEY (company_id) REFERENCES companies(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        // Create indexes
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_questions_company ON questions(company_id)")
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_difficulties_company ON company_difficulties(company_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_topics_company ON company_topics(company_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_companies_totals ON companies(total_questions DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(())
    }

    async fn company_row(&self, slug: &str) -> CatalogResult<Option<CompanyRecord>> {
        let row = sqlx::query(
            "SELECT id, name, slug, total_questions, blob_url, file_name, checksum, last_updated, created_at
             FROM companies WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(|r| record_from_row(&r)))
    }

    async fn difficulties_for(&self, company_id: &str) -> CatalogResult<Vec<DifficultyCount>> {
        let rows = sqlx::query(
            "SELECT difficulty, count FROM company_difficulties WHERE company_id = ? ORDER BY rowid",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows
            .iter()
            .map(|r| DifficultyCount {
                level: r.get("difficulty"),
                count: r.get("count"),
            })
            .collect())
    }

    async fn topics_for(&self, company_id: &str) -> CatalogResult<Vec<TopicRank>> {
        let rows = sqlx::query(
            "SELECT topic, count, rank FROM company_topics WHERE company_id = ? ORDER BY rank",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows
            .iter()
            .map(|r| TopicRank {
                name: r.get("topic"),
                count: r.get("count"),
                rank: r.get("rank"),
            })
            .collect())
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> CompanyRecord {
    CompanyRecord {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        total_questions: row.get("total_questions"),
        blob_url: row.get("blob_url"),
        file_name: row.get("file_name"),
        checksum: row.get("checksum"),
        last_updated: row.get("last_updated"),
        created_at: row.get("created_at"),
    }
}

fn question_from_row(row: &sqlx::sqlite::SqliteRow) -> Question {
    let topics_json: String = row.get("topics");
    Question {
        external_id: row.get("question_id"),
        title: row.get("title"),
        url: row.get("url"),
        is_premium: row.get("is_premium"),
        acceptance: row.get("acceptance"),
        difficulty: row.get("difficulty"),
        frequency: row.get("frequency"),
        topics: serde_json::from_str(&topics_json).unwrap_or_default(),
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn upsert_company(&self, company: &NewCompany) -> CatalogResult<CompanyRecord> {
        // Check if company exists
        let existing_id: Option<String> =
            sqlx::query_scalar("SELECT id FROM companies WHERE slug = ?")
                .bind(&company.slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_err)?;

        let company_id = existing_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        sqlx::query(
            r#"
            INSERT INTO companies (id, name, slug, total_questions, blob_url, file_name, checksum, last_updated, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(slug) DO UPDATE SET
                name = excluded.name,
                total_questions = excluded.total_questions,
                blob_url = excluded.blob_url,
                file_name = excluded.file_name,
                checksum = excluded.checksum,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(&company_id)
        .bind(&company.name)
        .bind(&company.slug)
        .bind(company.total_questions)
        .bind(&company.blob_url)
        .bind(&company.file_name)
        .bind(&company.checksum)
        .bind(company.last_updated)
        .bind(company.last_updated)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        match self.company_row(&company.slug).await? {
            Some(record) => Ok(record),
            None => Err(CatalogError::Store(format!(
                "company {} vanished after upsert",
                company.slug
            ))),
        }
    }

    async fn get_company(&self, slug: &str) -> CatalogResult<Option<CompanyOverview>> {
        let company = match self.company_row(slug).await? {
            Some(company) => company,
            None => return Ok(None),
        };
        let difficulties = self.difficulties_for(&company.id).await?;
        let top_topics = self.topics_for(&company.id).await?;
        Ok(Some(CompanyOverview {
            company,
            difficulties,
            top_topics,
        }))
    }

    async fn list_companies(&self) -> CatalogResult<Vec<CompanyOverview>> {
        let rows = sqlx::query(
            "SELECT id, name, slug, total_questions, blob_url, file_name, checksum, last_updated, created_at
             FROM companies ORDER BY total_questions DESC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        let companies: Vec<CompanyRecord> = rows.iter().map(record_from_row).collect();

        // One pass over each aggregate table instead of a query per company.
        let mut difficulty_map: HashMap<String, Vec<DifficultyCount>> = HashMap::new();
        let rows = sqlx::query(
            "SELECT company_id, difficulty, count FROM company_difficulties ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        for row in &rows {
            let company_id: String = row.get("company_id");
            difficulty_map.entry(company_id).or_default().push(DifficultyCount {
                level: row.get("difficulty"),
                count: row.get("count"),
            });
        }

        let mut topic_map: HashMap<String, Vec<TopicRank>> = HashMap::new();
        let rows = sqlx::query(
            "SELECT company_id, topic, count, rank FROM company_topics ORDER BY rank",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;
        for row in &rows {
            let company_id: String = row.get("company_id");
            topic_map.entry(company_id).or_default().push(TopicRank {
                name: row.get("topic"),
                count: row.get("count"),
                rank: row.get("rank"),
            });
        }

        Ok(companies
            .into_iter()
            .map(|company| {
                let difficulties = difficulty_map.remove(&company.id).unwrap_or_default();
                let top_topics = topic_map.remove(&company.id).unwrap_or_default();
                CompanyOverview {
                    company,
                    difficulties,
                    top_topics,
                }
            })
            .collect())
    }

    async fn list_questions(&self, company_id: &str) -> CatalogResult<Vec<Question>> {
        let rows = sqlx::query(
            "SELECT question_id, title, url, is_premium, acceptance, difficulty, frequency, topics
             FROM questions WHERE company_id = ? ORDER BY rowid",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.iter().map(question_from_row).collect())
    }

    async fn delete_questions(&self, company_id: &str) -> CatalogResult<()> {
        sqlx::query("DELETE FROM questions WHERE company_id = ?")
            .bind(company_id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn delete_difficulties(&self, company_id: &str) -> CatalogResult<()> {
        sqlx::query("DELETE FROM company_difficulties WHERE company_id = ?")
            .bind(company_id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn delete_topics(&self, company_id: &str) -> CatalogResult<()> {
        sqlx::query("DELETE FROM company_topics WHERE company_id = ?")
            .bind(company_id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn insert_questions(&self, company_id: &str, batch: &[Question]) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;
        for question in batch {
            let topics_json =
                serde_json::to_string(&question.topics).map_err(|e| CatalogError::Store(e.to_string()))?;
            sqlx::query(
                r#"
                INSERT INTO questions (id, company_id, question_id, title, url, is_premium, acceptance, difficulty, frequency, topics)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(company_id)
            .bind(&question.external_id)
            .bind(&question.title)
            .bind(&question.url)
            .bind(question.is_premium)
            .bind(&question.acceptance)
            .bind(&question.difficulty)
            .bind(question.frequency)
            .bind(topics_json)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;
        }
        tx.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn insert_difficulties(
        &self,
        company_id: &str,
        counts: &[DifficultyCount],
    ) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;
        for count in counts {
            sqlx::query(
                "INSERT INTO company_difficulties (id, company_id, difficulty, count) VALUES (?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(company_id)
            .bind(&count.level)
            .bind(count.count)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;
        }
        tx.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn insert_topics(&self, company_id: &str, topics: &[TopicRank]) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;
        for topic in topics {
            sqlx::query(
                "INSERT INTO company_topics (id, company_id, topic, count, rank) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(company_id)
            .bind(&topic.name)
            .bind(topic.count)
            .bind(topic.rank)
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;
        }
        tx.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn delete_companies_matching(&self, pattern: &str) -> CatalogResult<u64> {
        // Child rows go with the companies via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM companies WHERE name LIKE ?")
            .bind(pattern)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected())
    }
}
