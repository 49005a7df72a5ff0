use mission_core::{
    synthesize, ActionCategory, ActionStatus, Issue, IssueType, Priority, MAX_ACTIONS,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    mission_logging::initialize_for_tests();
}

fn issue(kind: IssueType, priority: Priority, message: &str) -> Issue {
    Issue::new(kind, priority, message)
}

fn keywords(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

#[test]
fn description_fix_comes_first_for_typical_small_site() {
    init_logging();
    let issues = vec![
        issue(IssueType::Meta, Priority::Medium, "title 태그가 너무 짧습니다 (5자)"),
        issue(IssueType::Meta, Priority::High, "meta description이 없습니다"),
        issue(IssueType::Content, Priority::Medium, "H1 태그가 2개 있습니다 (1개 권장)"),
        issue(IssueType::Image, Priority::Medium, "alt 속성이 없는 이미지가 1개 있습니다"),
    ];

    let actions = synthesize(&issues, &keywords(&["카페 창업"]));

    let titles: Vec<_> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "meta description 작성",
            "title 태그 최적화",
            "H1 태그 구조 수정",
            "이미지 alt 속성 추가",
        ]
    );
    assert_eq!(actions[0].priority, Priority::High);
    assert_eq!(actions[0].category, ActionCategory::Meta);
    let ids: Vec<_> = actions.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["action-1", "action-2", "action-3", "action-4"]);
    assert!(actions.iter().all(|a| a.status == ActionStatus::Pending));
}

#[test]
fn ties_keep_input_order() {
    let issues = vec![
        issue(IssueType::Technical, Priority::Medium, "sitemap.xml 파일을 찾을 수 없습니다 (HTTP 404)"),
        issue(IssueType::Technical, Priority::Medium, "robots.txt 파일을 찾을 수 없습니다 (HTTP 404)"),
        issue(IssueType::Link, Priority::Medium, "내부 링크가 부족합니다 (1개)"),
    ];

    let actions = synthesize(&issues, &[]);
    let titles: Vec<_> = actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["sitemap.xml 생성 및 제출", "robots.txt 파일 생성", "내부 링크 구조 강화"]
    );
}

#[test]
fn is_deterministic() {
    let issues = vec![
        issue(IssueType::Meta, Priority::Low, "Open Graph 태그가 일부 누락되었습니다"),
        issue(IssueType::Meta, Priority::High, "title 태그가 없습니다"),
    ];
    let kws = keywords(&["seo"]);
    assert_eq!(synthesize(&issues, &kws), synthesize(&issues, &kws));
}

#[test]
fn never_returns_more_than_five() {
    let issues = vec![
        issue(IssueType::Meta, Priority::High, "title 태그가 없습니다"),
        issue(IssueType::Meta, Priority::High, "meta description이 없습니다"),
        issue(IssueType::Content, Priority::High, "H1 태그가 없습니다"),
        issue(IssueType::Image, Priority::Medium, "alt 속성이 없는 이미지가 3개 있습니다"),
        issue(IssueType::Link, Priority::Medium, "내부 링크가 부족합니다 (0개)"),
        issue(IssueType::Technical, Priority::Medium, "robots.txt 파일을 찾을 수 없습니다 (HTTP 404)"),
        issue(IssueType::Meta, Priority::Low, "Open Graph 태그가 일부 누락되었습니다"),
    ];

    let actions = synthesize(&issues, &[]);
    assert_eq!(actions.len(), MAX_ACTIONS);
    assert!(actions.iter().all(|a| !a.title.contains("robots")));
}

#[test]
fn only_top_five_sorted_issues_are_considered() {
    // Five unmatched high issues push the matchable low one out of the window.
    let mut issues: Vec<Issue> = (0..5)
        .map(|n| issue(IssueType::Technical, Priority::High, &format!("HTTP 50{n} 오류")))
        .collect();
    issues.push(issue(IssueType::Meta, Priority::Low, "title 태그가 너무 깁니다 (72자)"));

    let actions = synthesize(&issues, &keywords(&["커피"]));
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].title, "\"커피\" 관련 콘텐츠 작성");
}

#[test]
fn keyword_floor_is_appended_when_few_actions() {
    let issues = vec![
        issue(IssueType::Meta, Priority::High, "title 태그가 없습니다"),
        issue(IssueType::Meta, Priority::Medium, "meta description이 너무 짧습니다 (20자)"),
    ];

    let actions = synthesize(&issues, &keywords(&["강남 치과", "임플란트"]));
    assert_eq!(actions.len(), 3);
    let floor = &actions[2];
    assert_eq!(floor.id, "action-3");
    assert_eq!(floor.category, ActionCategory::Content);
    assert_eq!(floor.priority, Priority::Medium);
    assert_eq!(floor.estimated_time, "2시간");
    assert!(floor.title.contains("강남 치과"));
}

#[test]
fn floor_uses_generic_label_without_keywords() {
    let actions = synthesize(&[], &[]);
    assert_eq!(actions.len(), 1);
    assert!(actions[0].title.contains("주요 키워드"));
    assert_eq!(actions[0].id, "action-1");
}

#[test]
fn unmatched_issues_are_dropped() {
    let issues = vec![issue(
        IssueType::Technical,
        Priority::High,
        "사이트 분석 실패: connection refused",
    )];
    let actions = synthesize(&issues, &keywords(&["x"]));
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].category, ActionCategory::Content);
}
