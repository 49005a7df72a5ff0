use crate::store::StoreError;

/// Caller-facing failures. Display strings are shown to end users as-is.
#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("도메인을 입력해주세요")]
    MissingDomain,
    #[error("올바르지 않은 상태 값입니다: {0}")]
    InvalidStatus(String),
    #[error("해당 미션을 찾을 수 없습니다 (id: {0})")]
    ActionNotFound(u64),
    #[error("미션 데이터를 처리하지 못했습니다: {0}")]
    Store(#[from] StoreError),
}
