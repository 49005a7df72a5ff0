use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use mission_engine::{
    AnalyzerSettings, EngineConfig, FetchSettings, LlmSettings, StoreLocation, DEFAULT_MODEL,
    DEFAULT_USER_AGENT, GROQ_BASE_URL,
};
use mission_logging::{mission_info, mission_warn};
use serde::{Deserialize, Serialize};

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const STORE_VAR: &str = "SEO_MISSIONS_STORE";
const DEFAULT_STORE: &str = "seo-missions.json";

/// Settings read from an optional RON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON mission store; `None` keeps missions in memory for one run.
    pub store_path: Option<PathBuf>,
    pub llm: LlmConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub page_timeout_secs: u64,
    pub asset_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: Some(PathBuf::from(DEFAULT_STORE)),
            llm: LlmConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: GROQ_BASE_URL.to_string(),
            temperature: 0.5,
            max_tokens: 2000,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_timeout_secs: 10,
            asset_timeout_secs: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Read `path` if given, otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = ron::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        mission_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply environment overrides; `lookup` is `std::env::var` outside tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(store) = lookup(STORE_VAR) {
            self.store_path = match store.trim() {
                "" | ":memory:" => None,
                path => Some(PathBuf::from(path)),
            };
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        let llm = match self.llm.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Some(LlmSettings {
                api_key: key.to_string(),
                model: self.llm.model.clone(),
                base_url: self.llm.base_url.clone(),
                temperature: self.llm.temperature,
                max_tokens: self.llm.max_tokens,
            }),
            _ => {
                mission_warn!("No {} configured; using rule-based missions only", API_KEY_VAR);
                None
            }
        };

        EngineConfig {
            fetch: FetchSettings {
                user_agent: self.fetch.user_agent.clone(),
                ..FetchSettings::default()
            },
            analyzer: AnalyzerSettings {
                page_timeout: Duration::from_secs(self.fetch.page_timeout_secs),
                asset_timeout: Duration::from_secs(self.fetch.asset_timeout_secs),
            },
            llm,
            store: match &self.store_path {
                Some(path) => StoreLocation::JsonFile(path.clone()),
                None => StoreLocation::Memory,
            },
        }
    }
}
