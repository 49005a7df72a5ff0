//! Rule-based action synthesis: the deterministic fallback whenever no LLM
//! plan is available.

use crate::{ActionCategory, ActionStatus, Issue, IssueTopic, Priority, WeeklyAction};

/// Upper bound on actions in one weekly batch.
pub const MAX_ACTIONS: usize = 5;
/// Below this many issue-derived actions, a keyword content action is appended.
pub const MIN_ACTIONS: usize = 3;

const DEFAULT_KEYWORD: &str = "주요 키워드";

struct Template {
    title: &'static str,
    description: &'static str,
    category: ActionCategory,
    estimated_time: &'static str,
    ai_tip: Option<&'static str>,
}

fn template(topic: IssueTopic) -> Template {
    match topic {
        IssueTopic::Title => Template {
            title: "title 태그 최적화",
            description: "핵심 키워드를 앞쪽에 배치하고 30~60자 길이로 페이지 제목을 다듬으세요.",
            category: ActionCategory::Meta,
            estimated_time: "15분",
            ai_tip: Some("브랜드명은 제목 끝에 ' | 브랜드' 형태로 붙이는 것이 좋습니다."),
        },
        IssueTopic::Description => Template {
            title: "meta description 작성",
            description: "검색 결과에 노출될 70~160자 분량의 페이지 요약을 작성하세요.",
            category: ActionCategory::Meta,
            estimated_time: "15분",
            ai_tip: Some("클릭을 유도하는 행동 문구와 핵심 키워드를 함께 넣으세요."),
        },
        IssueTopic::H1 => Template {
            title: "H1 태그 구조 수정",
            description: "페이지당 H1 태그가 정확히 하나만 있도록 제목 구조를 정리하세요.",
            category: ActionCategory::Content,
            estimated_time: "20분",
            ai_tip: Some("나머지 제목은 H2, H3로 내려 계층 구조를 만드세요."),
        },
        IssueTopic::ImageAlt => Template {
            title: "이미지 alt 속성 추가",
            description: "모든 이미지에 내용을 설명하는 alt 텍스트를 추가하세요.",
            category: ActionCategory::Image,
            estimated_time: "30분",
            ai_tip: Some("장식용 이미지가 아니라면 키워드를 자연스럽게 포함하세요."),
        },
        IssueTopic::Robots => Template {
            title: "robots.txt 파일 생성",
            description: "사이트 루트에 robots.txt를 만들고 크롤링 규칙과 sitemap 위치를 명시하세요.",
            category: ActionCategory::Technical,
            estimated_time: "30분",
            ai_tip: None,
        },
        IssueTopic::Sitemap => Template {
            title: "sitemap.xml 생성 및 제출",
            description: "sitemap.xml을 생성하고 Search Console에 제출하세요.",
            category: ActionCategory::Technical,
            estimated_time: "1시간",
            ai_tip: Some("CMS를 사용한다면 자동 생성 플러그인을 활용하세요."),
        },
        IssueTopic::InternalLinks => Template {
            title: "내부 링크 구조 강화",
            description: "관련 페이지끼리 서로 연결되도록 본문과 메뉴에 내부 링크를 추가하세요.",
            category: ActionCategory::Link,
            estimated_time: "1시간",
            ai_tip: Some("앵커 텍스트에는 연결 대상 페이지의 키워드를 사용하세요."),
        },
        IssueTopic::OpenGraph => Template {
            title: "Open Graph 태그 추가",
            description: "og:title, og:description, og:image 메타 태그를 추가해 소셜 공유 미리보기를 개선하세요.",
            category: ActionCategory::Meta,
            estimated_time: "20분",
            ai_tip: None,
        },
    }
}

/// Map issues to at most [`MAX_ACTIONS`] remediation actions.
///
/// Pure and deterministic: issues are stably sorted by priority, the top five
/// are matched against the trigger table and unmatched ones are dropped.
pub fn synthesize(issues: &[Issue], keywords: &[String]) -> Vec<WeeklyAction> {
    let mut sorted: Vec<&Issue> = issues.iter().collect();
    sorted.sort_by_key(|issue| issue.priority);

    let mut next_id = 1;
    let mut actions = Vec::with_capacity(MAX_ACTIONS);
    for issue in sorted.into_iter().take(MAX_ACTIONS) {
        let Some(topic) = IssueTopic::classify(&issue.message) else {
            continue;
        };
        let template = template(topic);
        actions.push(WeeklyAction {
            id: format!("action-{next_id}"),
            title: template.title.to_string(),
            description: template.description.to_string(),
            category: template.category,
            priority: issue.priority,
            status: ActionStatus::Pending,
            estimated_time: template.estimated_time.to_string(),
            ai_tip: template.ai_tip.map(str::to_string),
            verification_status: None,
            verified_at: None,
            verification_message: None,
        });
        next_id += 1;
    }

    if actions.len() < MIN_ACTIONS {
        let keyword = keywords
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_KEYWORD);
        actions.push(WeeklyAction {
            id: format!("action-{next_id}"),
            title: format!("\"{keyword}\" 관련 콘텐츠 작성"),
            description: format!(
                "\"{keyword}\" 키워드를 중심으로 검색 의도에 맞는 블로그 글이나 가이드 페이지를 작성하세요."
            ),
            category: ActionCategory::Content,
            priority: Priority::Medium,
            status: ActionStatus::Pending,
            estimated_time: "2시간".to_string(),
            ai_tip: Some("1,500자 이상의 깊이 있는 글이 검색 순위에 유리합니다.".to_string()),
            verification_status: None,
            verified_at: None,
            verification_message: None,
        });
    }

    actions.truncate(MAX_ACTIONS);
    actions
}

/// Batch summary used whenever the synthesizer produced the actions.
pub fn fallback_summary(domain: &str, issue_count: usize) -> String {
    if issue_count == 0 {
        format!("{domain}: 발견된 문제가 없어 기본 SEO 개선 미션을 생성했습니다.")
    } else {
        format!("{domain}에서 {issue_count}개의 문제가 발견되었습니다.")
    }
}
