//! Stats sink: conversation log and aggregate counters.
//!
//! Receives one [`TurnRecord`] per processed message. Has no influence on
//! dialogue decisions; failures are reported to the caller, which logs and
//! swallows them.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use moc_protocol::{StatsSnapshot, TurnRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{DialogueError, DialogueResult};

/// Recent turns kept in the stats file.
const MAX_RECENT_TURNS: usize = 500;

/// Destination for finished turns.
#[async_trait]
pub trait StatsSink: Send + Sync {
    /// Append a turn to the log and update the counters.
    async fn record(&self, turn: &TurnRecord) -> DialogueResult<()>;

    /// Current counters.
    async fn snapshot(&self) -> StatsSnapshot;
}

/// Counters held in memory only.
#[derive(Default)]
pub struct MemoryStatsSink {
    inner: Mutex<StatsFile>,
}

impl MemoryStatsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns recorded so far, oldest first.
    pub async fn turns(&self) -> Vec<TurnRecord> {
        self.inner.lock().await.recent.iter().cloned().collect()
    }
}

#[async_trait]
impl StatsSink for MemoryStatsSink {
    async fn record(&self, turn: &TurnRecord) -> DialogueResult<()> {
        self.inner.lock().await.push(turn);
        Ok(())
    }

    async fn snapshot(&self) -> StatsSnapshot {
        self.inner.lock().await.stats.clone()
    }
}

/// On-disk layout of the stats file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StatsFile {
    stats: StatsSnapshot,
    recent: VecDeque<TurnRecord>,
}

impl StatsFile {
    fn push(&mut self, turn: &TurnRecord) {
        self.stats.record(turn);
        self.recent.push_back(turn.clone());
        while self.recent.len() > MAX_RECENT_TURNS {
            self.recent.pop_front();
        }
    }
}

/// Counters persisted as pretty JSON after every turn.
pub struct JsonFileStatsSink {
    path: PathBuf,
    inner: Mutex<StatsFile>,
}

impl JsonFileStatsSink {
    /// Open the stats file, starting fresh when it is missing or corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "stats file unreadable, starting fresh");
                StatsFile::default()
            }),
            Err(_) => StatsFile::default(),
        };
        Self {
            path,
            inner: Mutex::new(file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatsSink for JsonFileStatsSink {
    async fn record(&self, turn: &TurnRecord) -> DialogueResult<()> {
        let mut file = self.inner.lock().await;
        file.push(turn);
        let json = serde_json::to_string_pretty(&*file)?;

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| DialogueError::Stats(format!("{}: {e}", self.path.display())))
    }

    async fn snapshot(&self) -> StatsSnapshot {
        self.inner.lock().await.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moc_protocol::{SurveyOutcome, System};

    fn turn(system: Option<System>) -> TurnRecord {
        let mut t = TurnRecord::new("u1", "msg", "reply");
        t.system = system;
        t
    }

    #[tokio::test]
    async fn memory_sink_counts_turns() {
        let sink = MemoryStatsSink::new();
        sink.record(&turn(Some(System::Apu))).await.unwrap();
        sink.record(&turn(None)).await.unwrap();

        let stats = sink.snapshot().await;
        assert_eq!(stats.total_turns, 2);
        assert_eq!(stats.by_system["APU"], 1);
        assert_eq!(sink.turns().await.len(), 2);
    }

    #[tokio::test]
    async fn json_sink_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("conversation_stats.json");

        let sink = JsonFileStatsSink::open(&path);
        let mut t = turn(Some(System::Galley));
        t.survey = Some(SurveyOutcome::Satisfied);
        sink.record(&t).await.unwrap();
        assert!(path.exists());

        let reopened = JsonFileStatsSink::open(&path);
        let stats = reopened.snapshot().await;
        assert_eq!(stats.total_turns, 1);
        assert_eq!(stats.satisfied_surveys, 1);
        assert_eq!(stats.by_system["GALLEY"], 1);
    }

    #[tokio::test]
    async fn corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation_stats.json");
        std::fs::write(&path, "not json").unwrap();

        let sink = JsonFileStatsSink::open(&path);
        assert_eq!(sink.snapshot().await.total_turns, 0);
    }

    #[tokio::test]
    async fn recent_turns_are_capped() {
        let sink = MemoryStatsSink::new();
        for _ in 0..(MAX_RECENT_TURNS + 5) {
            sink.record(&turn(None)).await.unwrap();
        }
        assert_eq!(sink.turns().await.len(), MAX_RECENT_TURNS);
        assert_eq!(sink.snapshot().await.total_turns, (MAX_RECENT_TURNS + 5) as u64);
    }
}
