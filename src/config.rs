use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub blob: BlobConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlobConfig {
    /// Directory where raw uploaded CSV files are kept.
    #[serde(default = "default_blob_root")]
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProgressConfig {
    /// Path to the JSON file backing favorites and per-question progress.
    #[serde(default = "default_progress_path")]
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Questions inserted per store call.
    #[serde(default = "default_question_batch_size")]
    pub question_batch_size: usize,
    /// Files processed concurrently per bulk group.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
    /// Pause between bulk groups, in milliseconds.
    #[serde(default = "default_group_pause_ms")]
    pub group_pause_ms: u64,
    /// Deadline for a single file, in seconds.
    #[serde(default = "default_file_timeout_secs")]
    pub file_timeout_secs: u64,
    /// Deadline for a whole bulk run, in seconds.
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,
    /// Glob patterns selecting files under the bulk directory.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
}

fn default_blob_root() -> PathBuf {
    PathBuf::from("./data/blobs")
}

fn default_progress_path() -> PathBuf {
    PathBuf::from("./data/progress.json")
}

fn default_question_batch_size() -> usize {
    100
}

fn default_group_size() -> usize {
    5
}

fn default_group_pause_ms() -> u64 {
    1000
}

fn default_file_timeout_secs() -> u64 {
    120
}

fn default_batch_timeout_secs() -> u64 {
    900
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.csv".to_string()]
}

impl Default for BlobConfig {
    fn default() -> Self {
        BlobConfig {
            root: default_blob_root(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        ProgressConfig {
            path: default_progress_path(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            question_batch_size: default_question_batch_size(),
            group_size: default_group_size(),
            group_pause_ms: default_group_pause_ms(),
            file_timeout_secs: default_file_timeout_secs(),
            batch_timeout_secs: default_batch_timeout_secs(),
            include_globs: default_include_globs(),
        }
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    if config.ingest.question_batch_size == 0 {
        anyhow::bail!("ingest.question_batch_size must be greater than zero");
    }
    if config.ingest.group_size == 0 {
        anyhow::bail!("ingest.group_size must be greater than zero");
    }
    if config.ingest.file_timeout_secs == 0 || config.ingest.batch_timeout_secs == 0 {
        anyhow::bail!("ingest timeouts must be greater than zero");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str("[db]\npath = \"./data/qcat.sqlite\"\n").unwrap();
        assert_eq!(config.blob.root, PathBuf::from("./data/blobs"));
        assert_eq!(config.progress.path, PathBuf::from("./data/progress.json"));
        assert_eq!(config.ingest.question_batch_size, 100);
        assert_eq!(config.ingest.group_size, 5);
        assert_eq!(config.ingest.group_pause_ms, 1000);
        assert_eq!(config.ingest.file_timeout_secs, 120);
        assert_eq!(config.ingest.batch_timeout_secs, 900);
        assert_eq!(config.ingest.include_globs, vec!["**/*.csv"]);
    }

    #[test]
    fn test_load_config_rejects_zero_group_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qcat.toml");
        std::fs::write(&path, "[db]\npath = \"db.sqlite\"\n\n[ingest]\ngroup_size = 0\n")
            .unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("group_size"));
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("/no/such/qcat.toml")).is_err());
    }
}
