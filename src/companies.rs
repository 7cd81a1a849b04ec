//! Company listing and catalog maintenance commands.

use anyhow::Result;

use crate::config::Config;
use crate::progress::{self, JsonFileProgressStore, ProgressStore};
use crate::sqlite_store::SqliteCatalogStore;
use crate::stats::format_ts_relative;
use crate::store::CatalogStore;

/// Run the companies command: list every company with its aggregates.
pub async fn run_companies(config: &Config) -> Result<()> {
    let store = SqliteCatalogStore::connect(config).await?;
    let tracker = JsonFileProgressStore::new(config.progress.path.clone());

    let overviews = store.list_companies().await?;
    if overviews.is_empty() {
        println!("No companies in the catalog. Run 'qcat ingest' or 'qcat bulk' first.");
        return Ok(());
    }

    println!(
        "  {:<20} {:<16} {:>9} {:>6}   {:<26} {:<34} {}",
        "COMPANY", "SLUG", "QUESTIONS", "DONE", "DIFFICULTY", "TOP TOPICS", "LAST INGEST"
    );
    println!("  {}", "-".repeat(126));

    for overview in &overviews {
        let company = &overview.company;
        let completed = completed_count(&tracker, &company.slug);
        let percent = progress::completion_percent(completed, company.total_questions);
        let difficulty = overview
            .difficulties
            .iter()
            .map(|d| format!("{} {}", d.count, d.level))
            .collect::<Vec<_>>()
            .join(", ");
        let topics = overview
            .top_topics
            .iter()
            .take(5)
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "  {:<20} {:<16} {:>9} {:>5}%   {:<26} {:<34} {}",
            truncate(&company.name, 20),
            company.slug,
            company.total_questions,
            percent,
            truncate(&difficulty, 26),
            truncate(&topics, 34),
            format_ts_relative(company.last_updated)
        );
    }

    println!();
    println!("  {} companies", overviews.len());

    Ok(())
}

/// Run the cleanup command: delete companies whose name matches a SQL
/// `LIKE` pattern, along with their questions and aggregates.
pub async fn run_cleanup(config: &Config, pattern: &str) -> Result<()> {
    let store = SqliteCatalogStore::connect(config).await?;
    let removed = store.delete_companies_matching(pattern).await?;

    println!("cleanup {}", pattern);
    println!("  companies removed: {}", removed);

    Ok(())
}

fn completed_count(tracker: &dyn ProgressStore, slug: &str) -> usize {
    progress::completed_questions(tracker, slug)
        .map(|ids| ids.len())
        .unwrap_or(0)
}

/// Truncate to `max` characters, appending "..." when shortened.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
