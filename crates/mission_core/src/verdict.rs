use serde::{Deserialize, Serialize};

use crate::{IssueTopic, SiteAnalysis, VerificationTarget};

pub const MANUAL_VERIFICATION_MESSAGE: &str = "수동 검증이 필요한 항목입니다";

const TITLE_LEN: std::ops::RangeInclusive<usize> = 30..=60;
const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 70..=160;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub verified: bool,
    pub message: String,
}

impl Verification {
    fn new(verified: bool, message: impl Into<String>) -> Self {
        Self {
            verified,
            message: message.into(),
        }
    }

    fn check(verified: bool, passed: impl Into<String>, failed: impl Into<String>) -> Self {
        if verified {
            Self::new(true, passed)
        } else {
            Self::new(false, failed)
        }
    }
}

fn has_topic(analysis: &SiteAnalysis, topic: IssueTopic) -> bool {
    analysis
        .issues
        .iter()
        .any(|issue| IssueTopic::classify(&issue.message) == Some(topic))
}

fn char_len(value: Option<&String>) -> usize {
    value.map(|text| text.chars().count()).unwrap_or(0)
}

/// Decide from a fresh analysis whether the action behind `target` is done.
pub fn judge(target: VerificationTarget, analysis: &SiteAnalysis) -> Verification {
    let page = &analysis.page_data;
    match target {
        VerificationTarget::MetaTitle => {
            let len = char_len(page.title.as_ref());
            Verification::check(
                !has_topic(analysis, IssueTopic::Title) && TITLE_LEN.contains(&len),
                format!("title 태그가 최적화되었습니다 ({len}자)"),
                format!("title 태그가 아직 최적화되지 않았습니다 (현재 {len}자, 권장 30~60자)"),
            )
        }
        VerificationTarget::MetaDescription => {
            let len = char_len(page.description.as_ref());
            Verification::check(
                !has_topic(analysis, IssueTopic::Description) && DESCRIPTION_LEN.contains(&len),
                format!("meta description이 최적화되었습니다 ({len}자)"),
                format!(
                    "meta description이 아직 최적화되지 않았습니다 (현재 {len}자, 권장 70~160자)"
                ),
            )
        }
        VerificationTarget::OpenGraph => Verification::check(
            !has_topic(analysis, IssueTopic::OpenGraph),
            "Open Graph 태그가 모두 설정되었습니다",
            "Open Graph 태그가 아직 누락되어 있습니다",
        ),
        VerificationTarget::H1 => Verification::check(
            page.h1_count == 1,
            "H1 태그가 1개로 올바르게 설정되었습니다",
            format!("H1 태그가 {}개입니다 (1개 권장)", page.h1_count),
        ),
        VerificationTarget::ImageAlt => Verification::check(
            page.img_without_alt == 0,
            "모든 이미지에 alt 속성이 설정되었습니다",
            format!(
                "alt 속성이 없는 이미지가 아직 {}개 있습니다",
                page.img_without_alt
            ),
        ),
        VerificationTarget::Robots => Verification::check(
            !has_topic(analysis, IssueTopic::Robots),
            "robots.txt 파일이 확인되었습니다",
            "robots.txt 파일이 아직 확인되지 않습니다",
        ),
        VerificationTarget::Sitemap => Verification::check(
            !has_topic(analysis, IssueTopic::Sitemap),
            "sitemap.xml 파일이 확인되었습니다",
            "sitemap.xml 파일이 아직 확인되지 않습니다",
        ),
        VerificationTarget::InternalLinks => Verification::check(
            !has_topic(analysis, IssueTopic::InternalLinks),
            "내부 링크가 충분히 확보되었습니다",
            "내부 링크가 아직 부족합니다",
        ),
        VerificationTarget::Generic(category) => {
            let remaining = analysis
                .issues
                .iter()
                .filter(|issue| issue.kind == category.issue_type())
                .count();
            Verification::check(
                remaining == 0,
                format!("{category} 관련 문제가 모두 해결되었습니다"),
                format!("{category} 관련 문제가 {remaining}개 남아 있습니다"),
            )
        }
        VerificationTarget::Manual => Verification::new(true, MANUAL_VERIFICATION_MESSAGE),
    }
}
