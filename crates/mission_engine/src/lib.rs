//! Mission engine: site analysis, mission generation and verification over
//! HTTP, a completion service and a mission store.
mod analyze;
mod decode;
mod engine;
mod error;
mod extract;
mod fetch;
mod generate;
mod llm;
mod persist;
mod response;
mod status;
mod store;
mod types;
mod verify;

pub use analyze::{normalize_url, AnalyzeError, AnalyzerSettings, SiteAnalyzer};
pub use decode::{decode_text, DecodedText};
pub use engine::{EngineConfig, MissionEngine, StoreLocation};
pub use error::MissionError;
pub use extract::PageSignals;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use generate::{
    BatchProgress, CompletionTuning, GenerateRequest, GeneratedMissions, MissionGenerator,
    StoredBatch,
};
pub use llm::{
    CompletionRequest, CompletionService, GroqClient, LlmError, LlmSettings, DEFAULT_MODEL,
    GROQ_BASE_URL,
};
pub use persist::{ensure_storage_dir, write_atomically, PersistError};
pub use response::ApiResponse;
pub use status::{parse_status, update_action_status, StatusUpdate};
pub use store::{
    BatchKey, JsonFileMissionStore, MemoryMissionStore, MissionRow, MissionStore, StoreError,
    VerificationRecord,
};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
pub use verify::{MissionVerifier, VerifyRequest};
