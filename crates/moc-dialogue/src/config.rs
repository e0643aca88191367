//! Bot configuration, loadable from TOML.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{DialogueError, DialogueResult};

/// Top-level configuration for the dialogue core.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Directory holding the stats file and the default knowledge table.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Stats file name inside `log_dir`.
    #[serde(default = "default_stats_file")]
    pub stats_file: String,
    /// Manual knowledge table. Defaults to `<log_dir>/knowledge_base.json`.
    #[serde(default)]
    pub knowledge_base: Option<PathBuf>,
    /// Maximum number of utterances kept per session for repeat detection.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Replies longer than this count as a completed solution.
    #[serde(default = "default_final_answer_min_len")]
    pub final_answer_min_len: usize,
    /// Trimmed messages up to this length are handled as short/ambiguous.
    #[serde(default = "default_short_message_max_len")]
    pub short_message_max_len: usize,
    /// Write counters to disk; `false` keeps them in memory only.
    #[serde(default = "default_persist_stats")]
    pub persist_stats: bool,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_stats_file() -> String {
    "conversation_stats.json".to_string()
}

fn default_history_limit() -> usize {
    50
}

fn default_final_answer_min_len() -> usize {
    200
}

fn default_short_message_max_len() -> usize {
    5
}

fn default_persist_stats() -> bool {
    true
}

impl BotConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> DialogueResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| DialogueError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Full path of the stats file.
    pub fn stats_path(&self) -> PathBuf {
        self.log_dir.join(&self.stats_file)
    }

    /// Full path of the manual knowledge table.
    pub fn knowledge_path(&self) -> PathBuf {
        self.knowledge_base
            .clone()
            .unwrap_or_else(|| self.log_dir.join("knowledge_base.json"))
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            stats_file: default_stats_file(),
            knowledge_base: None,
            history_limit: default_history_limit(),
            final_answer_min_len: default_final_answer_min_len(),
            short_message_max_len: default_short_message_max_len(),
            persist_stats: default_persist_stats(),
        }
    }
}
