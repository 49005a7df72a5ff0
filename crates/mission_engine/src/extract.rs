use mission_core::{Issue, IssueType, PageSnapshot, Priority};
use scraper::{Html, Selector};

const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const DESCRIPTION_MIN: usize = 70;
const DESCRIPTION_MAX: usize = 160;
const MIN_INTERNAL_LINKS: usize = 3;

/// On-page SEO signals read from one HTML document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSignals {
    pub title: Option<String>,
    pub description: Option<String>,
    pub h1_count: usize,
    pub img_without_alt: usize,
    pub internal_links: usize,
    pub has_og_title: bool,
    pub has_og_description: bool,
    pub has_og_image: bool,
}

impl PageSignals {
    pub fn extract(html: &str) -> Self {
        let doc = Html::parse_document(html);

        let title = first_match(&doc, "title")
            .map(|title| title.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty());
        let description = first_match(&doc, r#"meta[name="description"]"#)
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        let img_without_alt = select_all(&doc, "img")
            .into_iter()
            .filter(|img| {
                img.value()
                    .attr("alt")
                    .map_or(true, |alt| alt.trim().is_empty())
            })
            .count();
        let internal_links = select_all(&doc, "a[href]")
            .into_iter()
            .filter(|a| {
                a.value()
                    .attr("href")
                    .is_some_and(|href| href.trim_start().starts_with('/'))
            })
            .count();

        Self {
            title,
            description,
            h1_count: select_all(&doc, "h1").len(),
            img_without_alt,
            internal_links,
            has_og_title: first_match(&doc, r#"meta[property="og:title"]"#).is_some(),
            has_og_description: first_match(&doc, r#"meta[property="og:description"]"#).is_some(),
            has_og_image: first_match(&doc, r#"meta[property="og:image"]"#).is_some(),
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            title: self.title.clone(),
            description: self.description.clone(),
            h1_count: self.h1_count,
            img_without_alt: self.img_without_alt,
        }
    }

    /// Issues derivable from the markup alone, in reporting order:
    /// title, description, H1, image alt, internal links.
    pub fn markup_issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        match self.title.as_deref().map(|t| t.chars().count()) {
            None => issues.push(Issue::new(
                IssueType::Meta,
                Priority::High,
                "title 태그가 없습니다",
            )),
            Some(len) if len < TITLE_MIN => issues.push(Issue::new(
                IssueType::Meta,
                Priority::Medium,
                format!("title 태그가 너무 짧습니다 ({len}자, 권장 30~60자)"),
            )),
            Some(len) if len > TITLE_MAX => issues.push(Issue::new(
                IssueType::Meta,
                Priority::Low,
                format!("title 태그가 너무 깁니다 ({len}자, 권장 30~60자)"),
            )),
            Some(_) => {}
        }

        match self.description.as_deref().map(|d| d.chars().count()) {
            None => issues.push(Issue::new(
                IssueType::Meta,
                Priority::High,
                "meta description이 없습니다",
            )),
            Some(len) if len < DESCRIPTION_MIN => issues.push(Issue::new(
                IssueType::Meta,
                Priority::Medium,
                format!("meta description이 너무 짧습니다 ({len}자, 권장 70~160자)"),
            )),
            Some(len) if len > DESCRIPTION_MAX => issues.push(Issue::new(
                IssueType::Meta,
                Priority::Low,
                format!("meta description이 너무 깁니다 ({len}자, 권장 70~160자)"),
            )),
            Some(_) => {}
        }

        match self.h1_count {
            0 => issues.push(Issue::new(
                IssueType::Content,
                Priority::High,
                "H1 태그가 없습니다",
            )),
            1 => {}
            count => issues.push(Issue::new(
                IssueType::Content,
                Priority::Medium,
                format!("H1 태그가 {count}개 있습니다 (1개 권장)"),
            )),
        }

        if self.img_without_alt > 0 {
            issues.push(Issue::new(
                IssueType::Image,
                Priority::Medium,
                format!("alt 속성이 없는 이미지가 {}개 있습니다", self.img_without_alt),
            ));
        }

        if self.internal_links < MIN_INTERNAL_LINKS {
            issues.push(Issue::new(
                IssueType::Link,
                Priority::Medium,
                format!(
                    "내부 링크가 부족합니다 ({}개, 최소 3개 권장)",
                    self.internal_links
                ),
            ));
        }

        issues
    }

    /// One low-priority issue when any of og:title / og:description / og:image is missing.
    pub fn open_graph_issue(&self) -> Option<Issue> {
        if self.has_og_title && self.has_og_description && self.has_og_image {
            return None;
        }
        Some(Issue::new(
            IssueType::Meta,
            Priority::Low,
            "Open Graph 태그가 일부 누락되었습니다",
        ))
    }
}

fn first_match<'a>(doc: &'a Html, css: &str) -> Option<scraper::ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).next()
}

fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<scraper::ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => doc.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use mission_core::{IssueType, Priority};

    use super::PageSignals;

    /// Signals that produce no markup issue.
    fn clean() -> PageSignals {
        PageSignals {
            title: Some("t".repeat(45)),
            description: Some("d".repeat(120)),
            h1_count: 1,
            img_without_alt: 0,
            internal_links: 3,
            has_og_title: true,
            has_og_description: true,
            has_og_image: true,
        }
    }

    fn issues_of(signals: &PageSignals) -> Vec<(IssueType, Priority, String)> {
        signals
            .markup_issues()
            .into_iter()
            .map(|issue| (issue.kind, issue.priority, issue.message))
            .collect()
    }

    #[test]
    fn title_length_bounds_are_inclusive() {
        for len in [30, 60] {
            let signals = PageSignals {
                title: Some("가".repeat(len)),
                ..clean()
            };
            assert!(issues_of(&signals).is_empty(), "title of {len} chars");
        }

        let short = PageSignals {
            title: Some("가".repeat(29)),
            ..clean()
        };
        assert_eq!(
            issues_of(&short),
            vec![(
                IssueType::Meta,
                Priority::Medium,
                "title 태그가 너무 짧습니다 (29자, 권장 30~60자)".to_string()
            )]
        );

        let long = PageSignals {
            title: Some("가".repeat(61)),
            ..clean()
        };
        assert_eq!(
            issues_of(&long),
            vec![(
                IssueType::Meta,
                Priority::Low,
                "title 태그가 너무 깁니다 (61자, 권장 30~60자)".to_string()
            )]
        );
    }

    #[test]
    fn description_length_bounds_are_inclusive() {
        for len in [70, 160] {
            let signals = PageSignals {
                description: Some("d".repeat(len)),
                ..clean()
            };
            assert!(issues_of(&signals).is_empty(), "description of {len} chars");
        }

        let short = PageSignals {
            description: Some("d".repeat(69)),
            ..clean()
        };
        assert_eq!(
            issues_of(&short),
            vec![(
                IssueType::Meta,
                Priority::Medium,
                "meta description이 너무 짧습니다 (69자, 권장 70~160자)".to_string()
            )]
        );

        let long = PageSignals {
            description: Some("d".repeat(161)),
            ..clean()
        };
        assert_eq!(
            issues_of(&long),
            vec![(
                IssueType::Meta,
                Priority::Low,
                "meta description이 너무 깁니다 (161자, 권장 70~160자)".to_string()
            )]
        );
    }

    #[test]
    fn missing_h1_is_high_priority() {
        let signals = PageSignals {
            h1_count: 0,
            ..clean()
        };
        assert_eq!(
            issues_of(&signals),
            vec![(
                IssueType::Content,
                Priority::High,
                "H1 태그가 없습니다".to_string()
            )]
        );
    }

    #[test]
    fn three_internal_links_are_enough() {
        assert!(issues_of(&clean()).is_empty());

        let sparse = PageSignals {
            internal_links: 2,
            ..clean()
        };
        assert_eq!(
            issues_of(&sparse),
            vec![(
                IssueType::Link,
                Priority::Medium,
                "내부 링크가 부족합니다 (2개, 최소 3개 권장)".to_string()
            )]
        );
    }

    #[test]
    fn partial_open_graph_is_reported_once() {
        let signals = PageSignals {
            has_og_image: false,
            ..clean()
        };
        let issue = signals.open_graph_issue().expect("og issue");
        assert_eq!(issue.kind, IssueType::Meta);
        assert_eq!(issue.priority, Priority::Low);
        assert_eq!(issue.message, "Open Graph 태그가 일부 누락되었습니다");
    }

    #[test]
    fn counts_only_images_without_meaningful_alt() {
        let html = r#"<body><img src="a.png" alt="logo"><img src="b.png"><img src="c.png" alt="  "></body>"#;
        assert_eq!(PageSignals::extract(html).img_without_alt, 2);
    }

    #[test]
    fn internal_links_are_root_relative() {
        let html = r#"<a href="/about">a</a><a href="https://other.example/">b</a><a href=" /blog">c</a><a>d</a>"#;
        assert_eq!(PageSignals::extract(html).internal_links, 2);
    }

    #[test]
    fn blank_title_counts_as_missing() {
        let signals = PageSignals::extract("<html><head><title>   </title></head></html>");
        assert_eq!(signals.title, None);
        assert_eq!(signals.markup_issues()[0].message, "title 태그가 없습니다");
    }

    #[test]
    fn complete_open_graph_yields_no_issue() {
        let html = r#"<head>
            <meta property="og:title" content="t">
            <meta property="og:description" content="d">
            <meta property="og:image" content="https://x/i.png">
        </head>"#;
        assert_eq!(PageSignals::extract(html).open_graph_issue(), None);
    }
}
