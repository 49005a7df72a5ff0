use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join;
use mission_core::{Issue, IssueType, PageSnapshot, Priority, SiteAnalysis};
use mission_logging::{mission_debug, mission_info, mission_warn};
use url::Url;

use crate::decode::decode_text;
use crate::extract::PageSignals;
use crate::fetch::Fetcher;
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub page_timeout: Duration,
    pub asset_timeout: Duration,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(10),
            asset_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("invalid site address {domain:?}: {message}")]
    InvalidUrl { domain: String, message: String },
    #[error("page fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Prefix `https://` unless the caller already supplied a scheme.
pub fn normalize_url(domain: &str) -> String {
    let domain = domain.trim();
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}

pub struct SiteAnalyzer {
    fetcher: Arc<dyn Fetcher>,
    settings: AnalyzerSettings,
}

impl SiteAnalyzer {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: AnalyzerSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Analyze a site, turning every failure into an issue. Never fails.
    pub async fn analyze(&self, domain: &str) -> SiteAnalysis {
        match self.inspect(domain).await {
            Ok(analysis) => analysis,
            Err(err) => {
                mission_warn!("Analysis of {} failed: {}", domain, err);
                let message = match &err {
                    AnalyzeError::Fetch(FetchError {
                        kind: FailureKind::HttpStatus(code),
                        ..
                    }) => format!("HTTP {code} 오류: 페이지에 접근할 수 없습니다"),
                    other => format!("사이트 분석 실패: {other}"),
                };
                SiteAnalysis {
                    issues: vec![Issue::new(IssueType::Technical, Priority::High, message)],
                    page_data: PageSnapshot::default(),
                }
            }
        }
    }

    /// Analyze a site, reporting an unreachable root page as an error.
    ///
    /// robots.txt and sitemap.xml failures are still reported as issues.
    pub async fn inspect(&self, domain: &str) -> Result<SiteAnalysis, AnalyzeError> {
        let page_url = normalize_url(domain);
        let base = Url::parse(&page_url).map_err(|err| AnalyzeError::InvalidUrl {
            domain: domain.to_string(),
            message: err.to_string(),
        })?;

        let page = self
            .fetcher
            .fetch(base.as_str(), self.settings.page_timeout)
            .await?;
        let decoded = decode_text(&page.bytes, page.metadata.content_type.as_deref());
        if decoded.lossy {
            mission_debug!(
                "{} decoded lossily as {}",
                page.metadata.final_url,
                decoded.encoding_label
            );
        }

        let signals = PageSignals::extract(&decoded.text);
        let mut issues = signals.markup_issues();

        let (robots, sitemap) = join(
            self.check_asset(&base, "robots.txt"),
            self.check_asset(&base, "sitemap.xml"),
        )
        .await;
        issues.extend(robots);
        issues.extend(sitemap);
        issues.extend(signals.open_graph_issue());

        mission_info!(
            "Analyzed {} ({} bytes): {} issues",
            page.metadata.final_url,
            page.metadata.byte_len,
            issues.len()
        );
        Ok(SiteAnalysis {
            issues,
            page_data: signals.snapshot(),
        })
    }

    async fn check_asset(&self, base: &Url, name: &str) -> Option<Issue> {
        let url = match base.join(&format!("/{name}")) {
            Ok(url) => url,
            Err(err) => {
                mission_warn!("Cannot build {} url from {}: {}", name, base, err);
                return Some(asset_unreachable(name));
            }
        };
        match self
            .fetcher
            .check_status(url.as_str(), self.settings.asset_timeout)
            .await
        {
            Ok(_) => None,
            Err(FetchError {
                kind: FailureKind::HttpStatus(code),
                ..
            }) => Some(Issue::new(
                IssueType::Technical,
                Priority::Medium,
                format!("{name} 파일을 찾을 수 없습니다 (HTTP {code})"),
            )),
            Err(err) => {
                mission_warn!("Fetching {} failed: {}", url, err);
                Some(asset_unreachable(name))
            }
        }
    }
}

fn asset_unreachable(name: &str) -> Issue {
    Issue::new(
        IssueType::Technical,
        Priority::Low,
        format!("{name} 확인 실패"),
    )
}
