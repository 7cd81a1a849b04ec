//! Catalog statistics and health overview.
//!
//! Provides a quick summary of what's ingested: company and question
//! counts, premium share, and per-company breakdowns. Used by `qcat stats`
//! to give confidence that ingestion runs are landing as expected.

use anyhow::Result;
use sqlx::Row;

use crate::config::Config;
use crate::progress::{self, JsonFileProgressStore};
use crate::sqlite_store::SqliteCatalogStore;

/// Per-company breakdown of question counts and tracked progress.
struct CompanyStats {
    name: String,
    slug: String,
    question_count: i64,
    premium_count: i64,
    last_updated: i64,
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let store = SqliteCatalogStore::connect(config).await?;
    let pool = store.pool();
    let tracker = JsonFileProgressStore::new(config.progress.path.clone());

    let total_companies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
        .fetch_one(pool)
        .await?;

    let total_questions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;

    let total_premium: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(is_premium), 0) FROM questions")
            .fetch_one(pool)
            .await?;

    let favorite_count = progress::favorites(&tracker).map(|f| f.len()).unwrap_or(0);

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Question Catalog — Stats");
    println!("========================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Companies:   {}", total_companies);
    println!(
        "  Questions:   {} ({} premium)",
        total_questions, total_premium
    );
    println!("  Favorites:   {}", favorite_count);

    // Per-company breakdown
    let rows = sqlx::query(
        r#"
        SELECT
            c.name,
            c.slug,
            c.total_questions,
            c.last_updated,
            COALESCE(SUM(q.is_premium), 0) AS premium_count
        FROM companies c
        LEFT JOIN questions q ON q.company_id = c.id
        GROUP BY c.id
        ORDER BY c.total_questions DESC, c.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let company_stats: Vec<CompanyStats> = rows
        .iter()
        .map(|row| CompanyStats {
            name: row.get("name"),
            slug: row.get("slug"),
            question_count: row.get("total_questions"),
            premium_count: row.get("premium_count"),
            last_updated: row.get("last_updated"),
        })
        .collect();

    if !company_stats.is_empty() {
        println!();
        println!("  By company:");
        println!(
            "  {:<24} {:>9} {:>8} {:>6}   {}",
            "COMPANY", "QUESTIONS", "PREMIUM", "DONE", "LAST INGEST"
        );
        println!("  {}", "-".repeat(76));

        for s in &company_stats {
            let completed = progress::completed_questions(&tracker, &s.slug)
                .map(|ids| ids.len())
                .unwrap_or(0);
            println!(
                "  {:<24} {:>9} {:>8} {:>6}   {}",
                s.name,
                s.question_count,
                s.premium_count,
                completed,
                format_ts_relative(s.last_updated)
            );
        }
    }

    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
pub(crate) fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
pub(crate) fn format_ts_relative(ts: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_ts_relative_recent() {
        let now = chrono::Utc::now().timestamp();
        assert_eq!(format_ts_relative(now), "just now");
        assert_eq!(format_ts_relative(now - 120), "2 mins ago");
        assert_eq!(format_ts_relative(now - 7200), "2 hours ago");
        assert_eq!(format_ts_relative(now - 86400), "1 day ago");
    }
}
