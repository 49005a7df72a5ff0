//! Weekly mission generation: reuse this week's batch, or analyze the site,
//! draft actions (LLM first, rules as fallback) and persist them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use mission_core::{
    build_prompt, fallback_summary, parse_plan, synthesize, week_start, ActionStatus,
    SiteAnalysis, WeeklyAction,
};
use mission_logging::{mission_error, mission_info, mission_warn};
use serde::{Deserialize, Serialize};

use crate::analyze::SiteAnalyzer;
use crate::llm::{CompletionRequest, CompletionService};
use crate::store::{BatchKey, MissionRow, MissionStore};
use crate::MissionError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub domain: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub force_regenerate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMissions {
    pub actions: Vec<WeeklyAction>,
    pub summary: String,
    pub cached: bool,
    pub week_start: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
}

impl BatchProgress {
    pub fn of(actions: &[WeeklyAction]) -> Self {
        let count = |status: ActionStatus| actions.iter().filter(|a| a.status == status).count();
        Self {
            total: actions.len(),
            completed: count(ActionStatus::Completed),
            in_progress: count(ActionStatus::InProgress),
            pending: count(ActionStatus::Pending),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBatch {
    pub week_start: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub actions: Vec<WeeklyAction>,
    pub progress: BatchProgress,
}

/// Parameters forwarded to the completion service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionTuning {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionTuning {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 2000,
        }
    }
}

/// One async mutex per (domain, week) so concurrent requests in this process
/// cannot both pass the existence check and write duplicate batches.
#[derive(Default)]
struct WeekLocks {
    locks: Mutex<HashMap<BatchKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl WeekLocks {
    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<BatchKey, Arc<tokio::sync::Mutex<()>>>> {
        match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lease(&self, key: &BatchKey) -> WeekLease<'_> {
        let lock = self.map().entry(key.clone()).or_default().clone();
        WeekLease {
            locks: self,
            key: key.clone(),
            lock,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map().len()
    }
}

/// A claim on one week's mutex. The map entry is removed when the last
/// lease for that key is dropped.
struct WeekLease<'a> {
    locks: &'a WeekLocks,
    key: BatchKey,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl WeekLease<'_> {
    async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for WeekLease<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.map();
        // One reference is the map's, the other is ours. New leases need the
        // map lock held here, so the count cannot grow before removal.
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(&self.key);
        }
    }
}

pub struct MissionGenerator {
    analyzer: Arc<SiteAnalyzer>,
    store: Arc<dyn MissionStore>,
    llm: Option<Arc<dyn CompletionService>>,
    tuning: CompletionTuning,
    locks: WeekLocks,
}

impl MissionGenerator {
    pub fn new(analyzer: Arc<SiteAnalyzer>, store: Arc<dyn MissionStore>) -> Self {
        Self {
            analyzer,
            store,
            llm: None,
            tuning: CompletionTuning::default(),
            locks: WeekLocks::default(),
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn CompletionService>, tuning: CompletionTuning) -> Self {
        self.llm = Some(llm);
        self.tuning = tuning;
        self
    }

    /// Return this week's batch for `request.domain`, creating it if needed.
    ///
    /// Only a blank domain fails. Analysis, completion and persistence
    /// failures degrade to the rule-based actions held in memory, so a caller
    /// can receive actions that were never durably saved.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        today: NaiveDate,
    ) -> Result<GeneratedMissions, MissionError> {
        let domain = request.domain.trim();
        if domain.is_empty() {
            return Err(MissionError::MissingDomain);
        }
        let key = BatchKey::new(domain, week_start(today));
        let lease = self.locks.lease(&key);
        let _guard = lease.lock().await;

        // Rows are only written when the week holds no earlier batch.
        let mut persist = true;
        if request.force_regenerate {
            match self.store.delete_batch(&key).await {
                Ok(removed) => mission_info!(
                    "Force regenerate {} week {}: removed {} rows",
                    key.domain,
                    key.week_start,
                    removed
                ),
                Err(err) => {
                    mission_error!(
                        "Failed to clear batch {} week {}, new actions stay unsaved: {}",
                        key.domain,
                        key.week_start,
                        err
                    );
                    persist = false;
                }
            }
        } else if let Some(cached) = self.cached_batch(&key).await {
            return Ok(cached);
        }

        let analysis = self.analyzer.analyze(domain).await;
        let (summary, actions) = self.draft(domain, &request.keywords, &analysis).await;

        if !persist {
            return Ok(GeneratedMissions {
                actions,
                summary,
                cached: false,
                week_start: key.week_start,
            });
        }

        if let Err(err) = self.store.insert_batch(&key, &summary, &actions).await {
            mission_error!(
                "Failed to persist {} actions for {} week {}: {}",
                actions.len(),
                key.domain,
                key.week_start,
                err
            );
        }

        let actions = match self.store.load_batch(&key).await {
            Ok(rows) if !rows.is_empty() => rows.iter().map(MissionRow::to_action).collect(),
            Ok(_) => {
                mission_warn!("Batch {} week {} empty after insert", key.domain, key.week_start);
                actions
            }
            Err(err) => {
                mission_warn!("Re-reading batch {} failed: {}", key.domain, err);
                actions
            }
        };

        Ok(GeneratedMissions {
            actions,
            summary,
            cached: false,
            week_start: key.week_start,
        })
    }

    /// The stored batch of the week containing `today`, with progress counts.
    pub async fn fetch_batch(
        &self,
        domain: &str,
        today: NaiveDate,
    ) -> Result<StoredBatch, MissionError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(MissionError::MissingDomain);
        }
        let key = BatchKey::new(domain, week_start(today));
        let rows = self.store.load_batch(&key).await?;
        let actions: Vec<WeeklyAction> = rows.iter().map(MissionRow::to_action).collect();
        Ok(StoredBatch {
            week_start: key.week_start,
            summary: rows.first().map(|row| row.summary.clone()),
            progress: BatchProgress::of(&actions),
            actions,
        })
    }

    async fn cached_batch(&self, key: &BatchKey) -> Option<GeneratedMissions> {
        match self.store.has_batch(key).await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => {
                mission_warn!("Existence check for {} failed: {}", key.domain, err);
                return None;
            }
        }
        let rows = match self.store.load_batch(key).await {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => return None,
            Err(err) => {
                mission_warn!("Loading cached batch for {} failed: {}", key.domain, err);
                return None;
            }
        };
        mission_info!(
            "Returning cached batch for {} week {} ({} actions)",
            key.domain,
            key.week_start,
            rows.len()
        );
        Some(GeneratedMissions {
            summary: rows[0].summary.clone(),
            actions: rows.iter().map(MissionRow::to_action).collect(),
            cached: true,
            week_start: key.week_start,
        })
    }

    async fn draft(
        &self,
        domain: &str,
        keywords: &[String],
        analysis: &SiteAnalysis,
    ) -> (String, Vec<WeeklyAction>) {
        if let Some(llm) = self.llm.as_ref().filter(|_| !analysis.issues.is_empty()) {
            let request = CompletionRequest {
                prompt: build_prompt(domain, keywords, analysis),
                temperature: self.tuning.temperature,
                max_tokens: self.tuning.max_tokens,
            };
            match llm.complete(&request).await {
                Ok(raw) => match parse_plan(&raw) {
                    Ok(plan) => {
                        mission_info!("Drafted {} actions for {} via LLM", plan.actions.len(), domain);
                        return (plan.summary, plan.actions);
                    }
                    Err(err) => mission_warn!("Unusable LLM plan for {}: {}", domain, err),
                },
                Err(err) => mission_warn!("LLM completion for {} failed: {}", domain, err),
            }
        }

        let actions = synthesize(&analysis.issues, keywords);
        mission_info!("Synthesized {} rule-based actions for {}", actions.len(), domain);
        (fallback_summary(domain, analysis.issues.len()), actions)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::WeekLocks;
    use crate::store::BatchKey;

    fn key(domain: &str) -> BatchKey {
        BatchKey::new(domain, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[test]
    fn entry_lives_until_last_lease_drops() {
        let locks = WeekLocks::default();

        let first = locks.lease(&key("a.com"));
        let second = locks.lease(&key("a.com"));
        let other = locks.lease(&key("b.com"));
        assert_eq!(locks.len(), 2);

        drop(first);
        assert_eq!(locks.len(), 2);
        drop(second);
        assert_eq!(locks.len(), 1);
        drop(other);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn entry_is_removed_after_locked_section() {
        let locks = WeekLocks::default();
        {
            let lease = locks.lease(&key("a.com"));
            let _guard = lease.lock().await;
            assert_eq!(locks.len(), 1);
        }
        assert_eq!(locks.len(), 0);
    }
}
