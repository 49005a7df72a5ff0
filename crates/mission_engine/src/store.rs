//! Mission persistence: one row per action, keyed by (domain, week start).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use mission_core::{
    ActionCategory, ActionStatus, Priority, VerificationStatus, WeeklyAction,
};
use serde::{Deserialize, Serialize};

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("mission store is unavailable: {0}")]
    Unavailable(String),
    #[error("mission store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("mission store io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchKey {
    pub domain: String,
    pub week_start: NaiveDate,
}

impl BatchKey {
    pub fn new(domain: impl Into<String>, week_start: NaiveDate) -> Self {
        Self {
            domain: domain.into(),
            week_start,
        }
    }
}

/// A persisted action with its batch key and the batch summary copied onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionRow {
    pub id: u64,
    pub domain: String,
    pub week_start: NaiveDate,
    pub summary: String,
    pub title: String,
    pub description: String,
    pub category: ActionCategory,
    pub priority: Priority,
    pub status: ActionStatus,
    pub estimated_time: String,
    #[serde(default)]
    pub ai_tip: Option<String>,
    #[serde(default)]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verification_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MissionRow {
    pub fn to_action(&self) -> WeeklyAction {
        WeeklyAction {
            id: self.id.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            priority: self.priority,
            status: self.status,
            estimated_time: self.estimated_time.clone(),
            ai_tip: self.ai_tip.clone(),
            verification_status: self.verification_status,
            verified_at: self.verified_at,
            verification_message: self.verification_message.clone(),
        }
    }

    fn belongs_to(&self, key: &BatchKey) -> bool {
        self.domain == key.domain && self.week_start == key.week_start
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRecord {
    pub status: VerificationStatus,
    pub verified_at: DateTime<Utc>,
    pub message: String,
}

#[async_trait::async_trait]
pub trait MissionStore: Send + Sync {
    async fn has_batch(&self, key: &BatchKey) -> Result<bool, StoreError>;
    /// Rows of one batch, high priority first, then by id.
    async fn load_batch(&self, key: &BatchKey) -> Result<Vec<MissionRow>, StoreError>;
    /// Hard delete; returns the number of rows removed.
    async fn delete_batch(&self, key: &BatchKey) -> Result<usize, StoreError>;
    /// Insert one row per action and return the assigned ids.
    async fn insert_batch(
        &self,
        key: &BatchKey,
        summary: &str,
        actions: &[WeeklyAction],
    ) -> Result<Vec<u64>, StoreError>;
    /// Returns `false` when no row has this id.
    async fn update_status(&self, id: u64, status: ActionStatus) -> Result<bool, StoreError>;
    /// Stores the outcome; a verified outcome also completes the row.
    async fn record_verification(
        &self,
        id: u64,
        record: &VerificationRecord,
    ) -> Result<bool, StoreError>;
}

/// The full row set. Shared by the in-memory and file-backed stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MissionTable {
    next_id: u64,
    rows: Vec<MissionRow>,
}

impl MissionTable {
    fn has_batch(&self, key: &BatchKey) -> bool {
        self.rows.iter().any(|row| row.belongs_to(key))
    }

    fn load_batch(&self, key: &BatchKey) -> Vec<MissionRow> {
        let mut rows: Vec<MissionRow> = self
            .rows
            .iter()
            .filter(|row| row.belongs_to(key))
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.priority, row.id));
        rows
    }

    fn delete_batch(&mut self, key: &BatchKey) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !row.belongs_to(key));
        before - self.rows.len()
    }

    fn insert_batch(&mut self, key: &BatchKey, summary: &str, actions: &[WeeklyAction]) -> Vec<u64> {
        let now = Utc::now();
        actions
            .iter()
            .map(|action| {
                self.next_id += 1;
                let id = self.next_id;
                self.rows.push(MissionRow {
                    id,
                    domain: key.domain.clone(),
                    week_start: key.week_start,
                    summary: summary.to_string(),
                    title: action.title.clone(),
                    description: action.description.clone(),
                    category: action.category,
                    priority: action.priority,
                    status: action.status,
                    estimated_time: action.estimated_time.clone(),
                    ai_tip: action.ai_tip.clone(),
                    verification_status: action.verification_status,
                    verified_at: action.verified_at,
                    verification_message: action.verification_message.clone(),
                    created_at: now,
                });
                id
            })
            .collect()
    }

    fn row_mut(&mut self, id: u64) -> Option<&mut MissionRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    fn update_status(&mut self, id: u64, status: ActionStatus) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.status = status;
                true
            }
            None => false,
        }
    }

    fn record_verification(&mut self, id: u64, record: &VerificationRecord) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };
        row.verification_status = Some(record.status);
        row.verified_at = Some(record.verified_at);
        row.verification_message = Some(record.message.clone());
        if record.status == VerificationStatus::Verified {
            row.status = ActionStatus::Completed;
        }
        true
    }
}

/// Non-durable store for tests and key-less local runs.
#[derive(Debug, Default)]
pub struct MemoryMissionStore {
    table: Mutex<MissionTable>,
}

impl MemoryMissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_table<T>(&self, f: impl FnOnce(&mut MissionTable) -> T) -> Result<T, StoreError> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        Ok(f(&mut table))
    }
}

#[async_trait::async_trait]
impl MissionStore for MemoryMissionStore {
    async fn has_batch(&self, key: &BatchKey) -> Result<bool, StoreError> {
        self.with_table(|table| table.has_batch(key))
    }

    async fn load_batch(&self, key: &BatchKey) -> Result<Vec<MissionRow>, StoreError> {
        self.with_table(|table| table.load_batch(key))
    }

    async fn delete_batch(&self, key: &BatchKey) -> Result<usize, StoreError> {
        self.with_table(|table| table.delete_batch(key))
    }

    async fn insert_batch(
        &self,
        key: &BatchKey,
        summary: &str,
        actions: &[WeeklyAction],
    ) -> Result<Vec<u64>, StoreError> {
        self.with_table(|table| table.insert_batch(key, summary, actions))
    }

    async fn update_status(&self, id: u64, status: ActionStatus) -> Result<bool, StoreError> {
        self.with_table(|table| table.update_status(id, status))
    }

    async fn record_verification(
        &self,
        id: u64,
        record: &VerificationRecord,
    ) -> Result<bool, StoreError> {
        self.with_table(|table| table.record_verification(id, record))
    }
}

/// Store kept as one pretty-printed JSON document, rewritten atomically on
/// every mutation. File I/O runs on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct JsonFileMissionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Arc<Mutex<()>>,
}

impl JsonFileMissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&MissionTable) -> T + Send + 'static,
    {
        self.blocking(move |path| Ok(f(&read_table(path)?))).await
    }

    async fn modify<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut MissionTable) -> T + Send + 'static,
    {
        self.blocking(move |path| {
            let mut table = read_table(path)?;
            let out = f(&mut table);
            let content = serde_json::to_string_pretty(&table)?;
            write_atomically(path, &content)?;
            Ok(out)
        })
        .await
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T, StoreError> + Send + 'static,
    {
        let path = self.path.clone();
        let guard = self.guard.clone();
        tokio::task::spawn_blocking(move || {
            let _lock = guard
                .lock()
                .map_err(|_| StoreError::Unavailable("file store lock poisoned".into()))?;
            work(&path)
        })
        .await
        .map_err(|err| StoreError::Unavailable(format!("file store task failed: {err}")))?
    }
}

fn read_table(path: &Path) -> Result<MissionTable, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(MissionTable::default()),
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(MissionTable::default()),
        Err(err) => Err(err.into()),
    }
}

#[async_trait::async_trait]
impl MissionStore for JsonFileMissionStore {
    async fn has_batch(&self, key: &BatchKey) -> Result<bool, StoreError> {
        let key = key.clone();
        self.read(move |table| table.has_batch(&key)).await
    }

    async fn load_batch(&self, key: &BatchKey) -> Result<Vec<MissionRow>, StoreError> {
        let key = key.clone();
        self.read(move |table| table.load_batch(&key)).await
    }

    async fn delete_batch(&self, key: &BatchKey) -> Result<usize, StoreError> {
        let key = key.clone();
        self.modify(move |table| table.delete_batch(&key)).await
    }

    async fn insert_batch(
        &self,
        key: &BatchKey,
        summary: &str,
        actions: &[WeeklyAction],
    ) -> Result<Vec<u64>, StoreError> {
        let key = key.clone();
        let summary = summary.to_string();
        let actions = actions.to_vec();
        self.modify(move |table| table.insert_batch(&key, &summary, &actions))
            .await
    }

    async fn update_status(&self, id: u64, status: ActionStatus) -> Result<bool, StoreError> {
        self.modify(move |table| table.update_status(id, status)).await
    }

    async fn record_verification(
        &self,
        id: u64,
        record: &VerificationRecord,
    ) -> Result<bool, StoreError> {
        let record = record.clone();
        self.modify(move |table| table.record_verification(id, &record))
            .await
    }
}
