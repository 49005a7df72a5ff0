use std::fmt::Write;

use serde::Deserialize;

use crate::{ActionCategory, ActionStatus, Priority, SiteAnalysis, WeeklyAction, MAX_ACTIONS};

const PROMPT_KEYWORDS: usize = 5;
const PROMPT_ISSUES: usize = 10;

/// Summary plus actions proposed by the completion service, already
/// renumbered and reset to `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionPlan {
    pub summary: String,
    pub actions: Vec<WeeklyAction>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("completion is not a valid mission plan: {0}")]
    Json(String),
    #[error("completion contained no actions")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RawPlan {
    summary: String,
    actions: Vec<RawAction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    title: String,
    description: String,
    category: ActionCategory,
    priority: Priority,
    #[serde(default = "default_estimated_time")]
    estimated_time: String,
    #[serde(default)]
    ai_tip: Option<String>,
}

fn default_estimated_time() -> String {
    "30분".to_string()
}

/// Build the single user-role prompt sent to the completion service.
pub fn build_prompt(domain: &str, keywords: &[String], analysis: &SiteAnalysis) -> String {
    let keywords = if keywords.is_empty() {
        "(없음)".to_string()
    } else {
        keywords
            .iter()
            .take(PROMPT_KEYWORDS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let page = &analysis.page_data;

    let mut prompt = String::new();
    let _ = writeln!(prompt, "당신은 SEO 전문 컨설턴트입니다. 아래 웹사이트 분석 결과를 바탕으로 이번 주에 실행할 SEO 개선 미션을 제안하세요.");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "도메인: {domain}");
    let _ = writeln!(prompt, "타겟 키워드: {keywords}");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "페이지 정보:");
    let _ = writeln!(prompt, "- 제목: {}", page.title.as_deref().unwrap_or("없음"));
    let _ = writeln!(prompt, "- 설명: {}", page.description.as_deref().unwrap_or("없음"));
    let _ = writeln!(prompt, "- H1 태그 수: {}", page.h1_count);
    let _ = writeln!(prompt, "- alt 없는 이미지 수: {}", page.img_without_alt);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "발견된 문제:");
    for issue in analysis.issues.iter().take(PROMPT_ISSUES) {
        let priority = match issue.priority {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        let _ = writeln!(prompt, "- [{priority}] {}", issue.message);
    }
    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "최대 {MAX_ACTIONS}개의 미션을 다음 JSON 형식으로만 응답하세요:"
    );
    prompt.push_str(
        r#"{
  "summary": "이번 주 SEO 상태 요약 (1~2문장)",
  "actions": [
    {
      "title": "미션 제목",
      "description": "구체적인 실행 방법",
      "category": "content | technical | link | image | meta",
      "priority": "high | medium | low",
      "estimatedTime": "예상 소요 시간 (예: 30분)",
      "aiTip": "실행 팁"
    }
  ]
}"#,
    );
    prompt
}

/// Remove a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````), if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line, which may also
    // be the only line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a raw completion into a [`MissionPlan`].
pub fn parse_plan(raw: &str) -> Result<MissionPlan, PlanError> {
    let json = strip_code_fences(raw);
    let plan: RawPlan =
        serde_json::from_str(json).map_err(|err| PlanError::Json(err.to_string()))?;
    if plan.actions.is_empty() {
        return Err(PlanError::Empty);
    }

    let actions = plan
        .actions
        .into_iter()
        .take(MAX_ACTIONS)
        .enumerate()
        .map(|(idx, action)| WeeklyAction {
            id: format!("action-{}", idx + 1),
            title: action.title,
            description: action.description,
            category: action.category,
            priority: action.priority,
            status: ActionStatus::Pending,
            estimated_time: action.estimated_time,
            ai_tip: action.ai_tip.filter(|tip| !tip.trim().is_empty()),
            verification_status: None,
            verified_at: None,
            verification_message: None,
        })
        .collect();

    Ok(MissionPlan {
        summary: plan.summary,
        actions,
    })
}
