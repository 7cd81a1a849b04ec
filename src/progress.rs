//! Favorites and per-question completion tracking.
//!
//! Kept separate from the catalog proper: this is the user's own state,
//! stored as a flat key-value map where each value is a JSON string list.
//! `favorites` holds company slugs; `progress:<slug>` holds the external
//! ids of completed questions for that company. Unreadable values are
//! treated as empty rather than failing the command.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::error::{CatalogError, CatalogResult};
use crate::sqlite_store::SqliteCatalogStore;
use crate::store::CatalogStore;

pub const FAVORITES_KEY: &str = "favorites";

pub fn progress_key(slug: &str) -> String {
    format!("progress:{slug}")
}

/// Key-value port behind favorites and completion state.
pub trait ProgressStore: Send + Sync {
    fn get(&self, key: &str) -> CatalogResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CatalogResult<()>;
    fn keys(&self) -> CatalogResult<Vec<String>>;
}

/// JSON-file adapter: the whole map lives in one file, rewritten on every
/// set. Fine for the handful of keys a single user produces.
pub struct JsonFileProgressStore {
    path: PathBuf,
}

impl JsonFileProgressStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> CatalogResult<HashMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(CatalogError::Store(format!(
                    "read {}: {e}",
                    self.path.display()
                )))
            }
        };
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    fn write_map(&self, map: &HashMap<String, String>) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Store(format!("create {}: {e}", parent.display()))
            })?;
        }
        let raw = serde_json::to_string_pretty(map)
            .map_err(|e| CatalogError::Store(e.to_string()))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| CatalogError::Store(format!("write {}: {e}", self.path.display())))
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn get(&self, key: &str) -> CatalogResult<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> CatalogResult<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn keys(&self) -> CatalogResult<Vec<String>> {
        let mut keys: Vec<String> = self.read_map()?.into_keys().collect();
        keys.sort();
        Ok(keys)
    }
}

/// In-memory adapter for tests.
pub struct MemoryProgressStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get(&self, key: &str) -> CatalogResult<Option<String>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CatalogResult<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> CatalogResult<Vec<String>> {
        let mut keys: Vec<String> = self.entries.read().unwrap().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

fn read_list(store: &dyn ProgressStore, key: &str) -> CatalogResult<Vec<String>> {
    Ok(store
        .get(key)?
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default())
}

fn write_list(store: &dyn ProgressStore, key: &str, items: &[String]) -> CatalogResult<()> {
    let raw = serde_json::to_string(items).map_err(|e| CatalogError::Store(e.to_string()))?;
    store.set(key, &raw)
}

pub fn favorites(store: &dyn ProgressStore) -> CatalogResult<Vec<String>> {
    read_list(store, FAVORITES_KEY)
}

/// Add `slug` to favorites. Returns `false` when it was already present.
pub fn add_favorite(store: &dyn ProgressStore, slug: &str) -> CatalogResult<bool> {
    let mut list = favorites(store)?;
    if list.iter().any(|s| s == slug) {
        return Ok(false);
    }
    list.push(slug.to_string());
    write_list(store, FAVORITES_KEY, &list)?;
    Ok(true)
}

/// Remove `slug` from favorites. Returns `false` when it was not present.
pub fn remove_favorite(store: &dyn ProgressStore, slug: &str) -> CatalogResult<bool> {
    let mut list = favorites(store)?;
    let before = list.len();
    list.retain(|s| s != slug);
    if list.len() == before {
        return Ok(false);
    }
    write_list(store, FAVORITES_KEY, &list)?;
    Ok(true)
}

/// External ids of the questions completed for `slug`.
pub fn completed_questions(store: &dyn ProgressStore, slug: &str) -> CatalogResult<Vec<String>> {
    read_list(store, &progress_key(slug))
}

/// Record `question_id` as completed. Returns `false` when already marked.
pub fn mark_completed(
    store: &dyn ProgressStore,
    slug: &str,
    question_id: &str,
) -> CatalogResult<bool> {
    let key = progress_key(slug);
    let mut list = read_list(store, &key)?;
    if list.iter().any(|id| id == question_id) {
        return Ok(false);
    }
    list.push(question_id.to_string());
    write_list(store, &key, &list)?;
    Ok(true)
}

/// Clear a completion mark. Returns `false` when it was not marked.
pub fn unmark_completed(
    store: &dyn ProgressStore,
    slug: &str,
    question_id: &str,
) -> CatalogResult<bool> {
    let key = progress_key(slug);
    let mut list = read_list(store, &key)?;
    let before = list.len();
    list.retain(|id| id != question_id);
    if list.len() == before {
        return Ok(false);
    }
    write_list(store, &key, &list)?;
    Ok(true)
}

/// Completion percentage, rounded to the nearest whole number.
pub fn completion_percent(completed: usize, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as i64
}

// --- CLI entry points ---

/// Add a company to favorites. The company must exist in the catalog.
pub async fn run_favorites_add(config: &Config, slug: &str) -> Result<()> {
    let store = SqliteCatalogStore::connect(config).await?;
    if store.get_company(slug).await?.is_none() {
        bail!("company not found: {}", slug);
    }
    let tracker = JsonFileProgressStore::new(config.progress.path.clone());
    if add_favorite(&tracker, slug)? {
        println!("added {} to favorites", slug);
    } else {
        println!("{} is already a favorite", slug);
    }
    Ok(())
}

pub async fn run_favorites_remove(config: &Config, slug: &str) -> Result<()> {
    let tracker = JsonFileProgressStore::new(config.progress.path.clone());
    if remove_favorite(&tracker, slug)? {
        println!("removed {} from favorites", slug);
    } else {
        println!("{} is not a favorite", slug);
    }
    Ok(())
}

/// List favorite companies with their question counts and progress.
pub async fn run_favorites_list(config: &Config) -> Result<()> {
    let store = SqliteCatalogStore::connect(config).await?;
    let tracker = JsonFileProgressStore::new(config.progress.path.clone());

    let slugs = favorites(&tracker)?;
    if slugs.is_empty() {
        println!("No favorites yet. Add one with 'qcat favorites add <slug>'.");
        return Ok(());
    }

    let mut total_questions: i64 = 0;
    for slug in &slugs {
        match store.get_company(slug).await? {
            Some(overview) => {
                let completed = completed_questions(&tracker, slug)?.len();
                let percent =
                    completion_percent(completed, overview.company.total_questions);
                total_questions += overview.company.total_questions;
                println!(
                    "  {:<18} {:<24} {:>5} questions  {:>3}% done",
                    slug, overview.company.name, overview.company.total_questions, percent
                );
            }
            None => println!("  {:<18} (not in catalog)", slug),
        }
    }

    println!();
    println!(
        "  {} favorites, {} questions",
        slugs.len(),
        total_questions
    );

    Ok(())
}

/// Mark a question as completed. Both the company and the question id
/// must exist in the catalog.
pub async fn run_progress_mark(config: &Config, slug: &str, question_id: &str) -> Result<()> {
    let store = SqliteCatalogStore::connect(config).await?;
    let overview = match store.get_company(slug).await? {
        Some(overview) => overview,
        None => bail!("company not found: {}", slug),
    };
    let questions = store.list_questions(&overview.company.id).await?;
    if !questions.iter().any(|q| q.external_id == question_id) {
        bail!("question not found in {}: {}", slug, question_id);
    }

    let tracker = JsonFileProgressStore::new(config.progress.path.clone());
    if mark_completed(&tracker, slug, question_id)? {
        println!("marked {} / {} as completed", slug, question_id);
    } else {
        println!("{} / {} is already completed", slug, question_id);
    }
    Ok(())
}

pub async fn run_progress_unmark(config: &Config, slug: &str, question_id: &str) -> Result<()> {
    let tracker = JsonFileProgressStore::new(config.progress.path.clone());
    if unmark_completed(&tracker, slug, question_id)? {
        println!("unmarked {} / {}", slug, question_id);
    } else {
        println!("{} / {} was not marked", slug, question_id);
    }
    Ok(())
}

/// Show completion state for one company.
pub async fn run_progress_show(config: &Config, slug: &str) -> Result<()> {
    let store = SqliteCatalogStore::connect(config).await?;
    let overview = match store.get_company(slug).await? {
        Some(overview) => overview,
        None => bail!("company not found: {}", slug),
    };

    let tracker = JsonFileProgressStore::new(config.progress.path.clone());
    let completed = completed_questions(&tracker, slug)?;
    let total = overview.company.total_questions;
    let percent = completion_percent(completed.len(), total);

    println!("--- {} ({}) ---", overview.company.name, slug);
    println!("completed:    {}/{} ({}%)", completed.len(), total, percent);

    if !completed.is_empty() {
        let questions = store.list_questions(&overview.company.id).await?;
        println!();
        for question in questions
            .iter()
            .filter(|q| completed.iter().any(|id| id == &q.external_id))
        {
            println!("  [x] {:<8} {}", question.external_id, question.title);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorites_add_remove() {
        let store = MemoryProgressStore::new();
        assert!(add_favorite(&store, "acme").unwrap());
        assert!(!add_favorite(&store, "acme").unwrap());
        assert!(add_favorite(&store, "globex").unwrap());
        assert_eq!(favorites(&store).unwrap(), vec!["acme", "globex"]);

        assert!(remove_favorite(&store, "acme").unwrap());
        assert!(!remove_favorite(&store, "acme").unwrap());
        assert_eq!(favorites(&store).unwrap(), vec!["globex"]);
    }

    #[test]
    fn test_progress_mark_unmark() {
        let store = MemoryProgressStore::new();
        assert!(mark_completed(&store, "acme", "1").unwrap());
        assert!(mark_completed(&store, "acme", "2").unwrap());
        assert!(!mark_completed(&store, "acme", "1").unwrap());
        assert_eq!(completed_questions(&store, "acme").unwrap(), vec!["1", "2"]);

        // Companies do not share progress lists.
        assert!(completed_questions(&store, "globex").unwrap().is_empty());

        assert!(unmark_completed(&store, "acme", "1").unwrap());
        assert!(!unmark_completed(&store, "acme", "1").unwrap());
        assert_eq!(completed_questions(&store, "acme").unwrap(), vec!["2"]);
    }

    #[test]
    fn test_corrupt_value_reads_as_empty() {
        let store = MemoryProgressStore::new();
        store.set(FAVORITES_KEY, "not json").unwrap();
        assert!(favorites(&store).unwrap().is_empty());
    }

    #[test]
    fn test_completion_percent_rounds() {
        assert_eq!(completion_percent(0, 0), 0);
        assert_eq!(completion_percent(0, 10), 0);
        assert_eq!(completion_percent(1, 3), 33);
        assert_eq!(completion_percent(2, 3), 67);
        assert_eq!(completion_percent(3, 3), 100);
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/progress.json");
        let store = JsonFileProgressStore::new(path.clone());

        assert!(store.get("missing").unwrap().is_none());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);

        // A fresh handle sees the persisted state.
        let reopened = JsonFileProgressStore::new(path);
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }
}
