use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use mission_core::{ActionStatus, SiteAnalysis, Verification};
use mission_logging::mission_info;

use crate::analyze::{AnalyzerSettings, SiteAnalyzer};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::generate::{
    CompletionTuning, GenerateRequest, GeneratedMissions, MissionGenerator, StoredBatch,
};
use crate::llm::{CompletionService, GroqClient, LlmSettings};
use crate::status::{update_action_status, StatusUpdate};
use crate::store::{JsonFileMissionStore, MemoryMissionStore, MissionStore};
use crate::verify::{MissionVerifier, VerifyRequest};
use crate::MissionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    JsonFile(PathBuf),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub analyzer: AnalyzerSettings,
    /// `None` runs in rules-only mode.
    pub llm: Option<LlmSettings>,
    pub store: StoreLocation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            analyzer: AnalyzerSettings::default(),
            llm: None,
            store: StoreLocation::Memory,
        }
    }
}

/// The caller-facing surface: generate-or-fetch, status update, verification.
pub struct MissionEngine {
    analyzer: Arc<SiteAnalyzer>,
    store: Arc<dyn MissionStore>,
    generator: MissionGenerator,
    verifier: MissionVerifier,
}

impl MissionEngine {
    pub fn new(config: EngineConfig) -> Self {
        let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(config.fetch));
        let store: Arc<dyn MissionStore> = match &config.store {
            StoreLocation::Memory => Arc::new(MemoryMissionStore::new()),
            StoreLocation::JsonFile(path) => Arc::new(JsonFileMissionStore::new(path.clone())),
        };
        let llm = config.llm.map(|settings| {
            let client = GroqClient::new(&settings);
            mission_info!("Completion service enabled (model {})", client.model());
            let tuning = CompletionTuning {
                temperature: settings.temperature,
                max_tokens: settings.max_tokens,
            };
            (Arc::new(client) as Arc<dyn CompletionService>, tuning)
        });
        Self::from_parts(fetcher, config.analyzer, store, llm)
    }

    /// Assemble an engine from explicit collaborators.
    pub fn from_parts(
        fetcher: Arc<dyn Fetcher>,
        analyzer_settings: AnalyzerSettings,
        store: Arc<dyn MissionStore>,
        llm: Option<(Arc<dyn CompletionService>, CompletionTuning)>,
    ) -> Self {
        let analyzer = Arc::new(SiteAnalyzer::new(fetcher, analyzer_settings));
        let mut generator = MissionGenerator::new(analyzer.clone(), store.clone());
        if let Some((service, tuning)) = llm {
            generator = generator.with_llm(service, tuning);
        }
        let verifier = MissionVerifier::new(analyzer.clone()).with_store(store.clone());
        Self {
            analyzer,
            store,
            generator,
            verifier,
        }
    }

    pub async fn analyze(&self, domain: &str) -> SiteAnalysis {
        self.analyzer.analyze(domain).await
    }

    pub async fn generate(
        &self,
        request: &GenerateRequest,
        today: NaiveDate,
    ) -> Result<GeneratedMissions, MissionError> {
        self.generator.generate(request, today).await
    }

    pub async fn fetch_batch(
        &self,
        domain: &str,
        today: NaiveDate,
    ) -> Result<StoredBatch, MissionError> {
        self.generator.fetch_batch(domain, today).await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: ActionStatus,
    ) -> Result<StatusUpdate, MissionError> {
        update_action_status(self.store.as_ref(), id, status).await
    }

    /// Verify an action; with an `id`, the outcome is recorded on its row.
    pub async fn verify(&self, id: Option<&str>, request: &VerifyRequest) -> Verification {
        match id {
            Some(id) => self.verifier.verify_and_record(id, request).await,
            None => self.verifier.verify(request).await,
        }
    }
}
