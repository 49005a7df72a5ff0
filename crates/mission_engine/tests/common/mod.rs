#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mission_engine::{
    AnalyzerSettings, BatchKey, CompletionRequest, CompletionService, CompletionTuning,
    FetchSettings, LlmError, MemoryMissionStore, MissionEngine, MissionRow, MissionStore,
    ReqwestFetcher, StoreError, VerificationRecord,
};
use mission_core::{ActionStatus, WeeklyAction};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TITLE_OK: &str = "Specialty Coffee Roastery in Seoul | Daily Beans";
pub const DESCRIPTION_OK: &str = "Fresh specialty coffee roasted daily in Seoul. Order beans online, book a hand-drip class, or visit our cafe.";

pub fn init_logging() {
    mission_logging::initialize_for_tests();
}

/// A page that triggers no markup or Open Graph issue.
pub fn healthy_page() -> String {
    format!(
        r#"<!doctype html>
<html><head>
  <title>{TITLE_OK}</title>
  <meta name="description" content="{DESCRIPTION_OK}">
  <meta property="og:title" content="Daily Beans">
  <meta property="og:description" content="Specialty coffee">
  <meta property="og:image" content="https://cdn.example/og.png">
</head><body>
  <h1>Daily Beans</h1>
  <img src="/hero.jpg" alt="Roasting drum">
  <a href="/beans">Beans</a> <a href="/classes">Classes</a> <a href="/visit">Visit</a>
</body></html>"#
    )
}

/// Short title, no description, two H1s and one image without alt.
pub fn neglected_page() -> &'static str {
    r#"<html><head><title>Short</title></head>
<body><h1>One</h1><h1>Two</h1><img src="/a.png"></body></html>"#
}

pub async fn mount_html(server: &MockServer, body: impl Into<String>) {
    let body: String = body.into();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

pub async fn mount_assets(server: &MockServer) {
    for asset in ["/robots.txt", "/sitemap.xml"] {
        Mock::given(method("GET"))
            .and(path(asset))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(server)
            .await;
    }
}

pub fn engine_with(
    store: Arc<dyn MissionStore>,
    llm: Option<Arc<dyn CompletionService>>,
) -> MissionEngine {
    MissionEngine::from_parts(
        Arc::new(ReqwestFetcher::new(FetchSettings::default())),
        AnalyzerSettings::default(),
        store,
        llm.map(|service| (service, CompletionTuning::default())),
    )
}

pub fn memory_engine() -> (MissionEngine, Arc<MemoryMissionStore>) {
    let store = Arc::new(MemoryMissionStore::new());
    (engine_with(store.clone(), None), store)
}

/// Completion double that replays one canned answer and records prompts.
pub struct ScriptedLlm {
    reply: Result<String, String>,
    pub prompts: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CompletionService for ScriptedLlm {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.clone());
        self.reply.clone().map_err(LlmError::Api)
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("database offline".into())
}

#[async_trait::async_trait]
impl MissionStore for BrokenStore {
    async fn has_batch(&self, _key: &BatchKey) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn load_batch(&self, _key: &BatchKey) -> Result<Vec<MissionRow>, StoreError> {
        Err(unavailable())
    }

    async fn delete_batch(&self, _key: &BatchKey) -> Result<usize, StoreError> {
        Err(unavailable())
    }

    async fn insert_batch(
        &self,
        _key: &BatchKey,
        _summary: &str,
        _actions: &[WeeklyAction],
    ) -> Result<Vec<u64>, StoreError> {
        Err(unavailable())
    }

    async fn update_status(&self, _id: u64, _status: ActionStatus) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn record_verification(
        &self,
        _id: u64,
        _record: &VerificationRecord,
    ) -> Result<bool, StoreError> {
        Err(unavailable())
    }
}

/// In-memory store whose deletes always fail.
#[derive(Default)]
pub struct UndeletableStore {
    pub inner: MemoryMissionStore,
}

#[async_trait::async_trait]
impl MissionStore for UndeletableStore {
    async fn has_batch(&self, key: &BatchKey) -> Result<bool, StoreError> {
        self.inner.has_batch(key).await
    }

    async fn load_batch(&self, key: &BatchKey) -> Result<Vec<MissionRow>, StoreError> {
        self.inner.load_batch(key).await
    }

    async fn delete_batch(&self, _key: &BatchKey) -> Result<usize, StoreError> {
        Err(unavailable())
    }

    async fn insert_batch(
        &self,
        key: &BatchKey,
        summary: &str,
        actions: &[WeeklyAction],
    ) -> Result<Vec<u64>, StoreError> {
        self.inner.insert_batch(key, summary, actions).await
    }

    async fn update_status(&self, id: u64, status: ActionStatus) -> Result<bool, StoreError> {
        self.inner.update_status(id, status).await
    }

    async fn record_verification(
        &self,
        id: u64,
        record: &VerificationRecord,
    ) -> Result<bool, StoreError> {
        self.inner.record_verification(id, record).await
    }
}
