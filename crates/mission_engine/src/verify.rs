use std::sync::Arc;

use chrono::Utc;
use mission_core::{judge, Verification, VerificationStatus, VerificationTarget};
use mission_logging::{mission_error, mission_info, mission_warn};
use serde::Deserialize;

use crate::analyze::SiteAnalyzer;
use crate::store::{MissionStore, VerificationRecord};

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub domain: String,
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Re-checks a live site to confirm that an action's underlying issue is gone.
pub struct MissionVerifier {
    analyzer: Arc<SiteAnalyzer>,
    store: Option<Arc<dyn MissionStore>>,
}

impl MissionVerifier {
    pub fn new(analyzer: Arc<SiteAnalyzer>) -> Self {
        Self {
            analyzer,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn MissionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Never fails: fetch problems come back as `verified: false`.
    pub async fn verify(&self, request: &VerifyRequest) -> Verification {
        let target = VerificationTarget::classify(&request.category, &request.title);
        if target == VerificationTarget::Manual {
            return judge(target, &Default::default());
        }

        match self.analyzer.inspect(&request.domain).await {
            Ok(analysis) => {
                let verdict = judge(target, &analysis);
                mission_info!(
                    "Verified {:?} on {}: {}",
                    target,
                    request.domain,
                    verdict.verified
                );
                verdict
            }
            Err(err) => {
                mission_warn!("Verification of {} failed: {}", request.domain, err);
                Verification {
                    verified: false,
                    message: format!("검증 중 오류가 발생했습니다: {err}"),
                }
            }
        }
    }

    /// Verify, then store the outcome on the action row when `id` is a storage id.
    ///
    /// Recording is best effort: store failures are logged and the verdict is
    /// returned regardless.
    pub async fn verify_and_record(&self, id: &str, request: &VerifyRequest) -> Verification {
        let verdict = self.verify(request).await;
        let (Some(store), Ok(row_id)) = (self.store.as_ref(), id.trim().parse::<u64>()) else {
            return verdict;
        };

        let record = VerificationRecord {
            status: if verdict.verified {
                VerificationStatus::Verified
            } else {
                VerificationStatus::Failed
            },
            verified_at: Utc::now(),
            message: verdict.message.clone(),
        };
        match store.record_verification(row_id, &record).await {
            Ok(true) => {}
            Ok(false) => mission_warn!("No action {} to record verification on", row_id),
            Err(err) => mission_error!("Recording verification for {} failed: {}", row_id, err),
        }
        verdict
    }
}
