//! Per-company question listing with filters.

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::companies::truncate;
use crate::config::Config;
use crate::models::Question;
use crate::progress::{self, JsonFileProgressStore};
use crate::sqlite_store::SqliteCatalogStore;
use crate::stats::format_ts_relative;
use crate::store::CatalogStore;

/// Which completion states to include when listing questions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFilter {
    #[default]
    All,
    CompletedOnly,
    IncompleteOnly,
}

#[derive(Debug, Default, Clone)]
pub struct QuestionFilters {
    /// Exact difficulty label, compared case-insensitively.
    pub difficulty: Option<String>,
    /// Topic tag the question must carry, compared case-insensitively.
    pub topic: Option<String>,
    /// Substring of the title, compared case-insensitively.
    pub search: Option<String>,
    pub completion: CompletionFilter,
}

/// Apply `filters` to `questions`, preserving order.
pub fn apply_filters<'a>(
    questions: &'a [Question],
    filters: &QuestionFilters,
    completed: &HashSet<String>,
) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| {
            if let Some(ref difficulty) = filters.difficulty {
                if !q.difficulty.eq_ignore_ascii_case(difficulty) {
                    return false;
                }
            }
            if let Some(ref topic) = filters.topic {
                if !q.topics.iter().any(|t| t.eq_ignore_ascii_case(topic)) {
                    return false;
                }
            }
            if let Some(ref search) = filters.search {
                if !q.title.to_lowercase().contains(&search.to_lowercase()) {
                    return false;
                }
            }
            match filters.completion {
                CompletionFilter::All => true,
                CompletionFilter::CompletedOnly => completed.contains(&q.external_id),
                CompletionFilter::IncompleteOnly => !completed.contains(&q.external_id),
            }
        })
        .collect()
}

/// Run the questions command: print one company's catalog.
pub async fn run_questions(config: &Config, slug: &str, filters: &QuestionFilters) -> Result<()> {
    let store = SqliteCatalogStore::connect(config).await?;
    let tracker = JsonFileProgressStore::new(config.progress.path.clone());

    let overview = match store.get_company(slug).await? {
        Some(overview) => overview,
        None => bail!("company not found: {}", slug),
    };
    let company = &overview.company;

    let questions = store.list_questions(&company.id).await?;
    let completed: HashSet<String> = progress::completed_questions(&tracker, slug)?
        .into_iter()
        .collect();
    let shown = apply_filters(&questions, filters, &completed);

    let difficulty_line = overview
        .difficulties
        .iter()
        .map(|d| format!("{} {}", d.count, d.level))
        .collect::<Vec<_>>()
        .join(", ");
    let topic_line = overview
        .top_topics
        .iter()
        .map(|t| format!("{} ({})", t.name, t.count))
        .collect::<Vec<_>>()
        .join(", ");
    let percent = progress::completion_percent(completed.len(), company.total_questions);

    println!("--- {} ({}) ---", company.name, company.slug);
    println!("questions:    {}", company.total_questions);
    if !difficulty_line.is_empty() {
        println!("difficulty:   {}", difficulty_line);
    }
    if !topic_line.is_empty() {
        println!("top topics:   {}", topic_line);
    }
    println!("completed:    {} ({}%)", completed.len(), percent);
    println!("last ingest:  {}", format_ts_relative(company.last_updated));
    println!();

    if shown.is_empty() {
        println!("No questions match the given filters.");
        return Ok(());
    }

    println!(
        "  {:<3} {:<8} {:<42} {:<10} {:>5}  {}",
        "", "ID", "TITLE", "DIFFICULTY", "FREQ", "TOPICS"
    );
    println!("  {}", "-".repeat(96));

    for question in &shown {
        let mark = if completed.contains(&question.external_id) {
            "[x]"
        } else {
            "[ ]"
        };
        let mut title = question.title.clone();
        if question.is_premium {
            title.push_str(" (premium)");
        }
        println!(
            "  {:<3} {:<8} {:<42} {:<10} {:>5}  {}",
            mark,
            truncate(&question.external_id, 8),
            truncate(&title, 42),
            truncate(&question.difficulty, 10),
            question.frequency,
            topics_cell(&question.topics)
        );
    }

    println!();
    println!("  {} of {} questions", shown.len(), questions.len());

    Ok(())
}

/// First two topics verbatim, the rest folded into a "+n" suffix.
fn topics_cell(topics: &[String]) -> String {
    match topics.len() {
        0 => String::new(),
        1 => topics[0].clone(),
        2 => topics.join(", "),
        n => format!("{}, {} +{}", topics[0], topics[1], n - 2),
    }
}
