use crate::ActionCategory;

/// What an issue message is about. Derived from the message text before any
/// action template or check is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueTopic {
    Title,
    Description,
    H1,
    ImageAlt,
    Robots,
    Sitemap,
    InternalLinks,
    OpenGraph,
}

// Order matters: the first trigger found in a message decides its topic.
const TRIGGERS: &[(&[&str], IssueTopic)] = &[
    (&["title"], IssueTopic::Title),
    (&["description"], IssueTopic::Description),
    (&["H1"], IssueTopic::H1),
    (&["alt", "이미지"], IssueTopic::ImageAlt),
    (&["robots"], IssueTopic::Robots),
    (&["sitemap"], IssueTopic::Sitemap),
    (&["내부 링크"], IssueTopic::InternalLinks),
    (&["Open Graph"], IssueTopic::OpenGraph),
];

impl IssueTopic {
    pub fn classify(message: &str) -> Option<Self> {
        TRIGGERS
            .iter()
            .find(|(needles, _)| needles.iter().any(|needle| message.contains(needle)))
            .map(|(_, topic)| *topic)
    }
}

/// Which live check confirms that an action has been carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationTarget {
    MetaTitle,
    MetaDescription,
    OpenGraph,
    H1,
    ImageAlt,
    Robots,
    Sitemap,
    InternalLinks,
    /// No specific check matched: pass when no issue of the category's type remains.
    Generic(ActionCategory),
    /// Unknown category; cannot be checked automatically.
    Manual,
}

impl VerificationTarget {
    /// Classify an action by its raw category and (case-insensitive) title.
    pub fn classify(category: &str, title: &str) -> Self {
        let Some(category) = ActionCategory::parse(category) else {
            return Self::Manual;
        };
        let title = title.to_lowercase();
        let mentions = |needles: &[&str]| needles.iter().any(|needle| title.contains(needle));

        match category {
            ActionCategory::Meta if mentions(&["title", "타이틀"]) => Self::MetaTitle,
            ActionCategory::Meta if mentions(&["description", "설명"]) => Self::MetaDescription,
            ActionCategory::Meta if mentions(&["og", "open graph", "소셜"]) => Self::OpenGraph,
            ActionCategory::Content if mentions(&["h1"]) => Self::H1,
            ActionCategory::Image if mentions(&["alt", "이미지"]) => Self::ImageAlt,
            ActionCategory::Technical if mentions(&["robots"]) => Self::Robots,
            ActionCategory::Technical if mentions(&["sitemap", "사이트맵"]) => Self::Sitemap,
            ActionCategory::Link if mentions(&["내부", "internal"]) => Self::InternalLinks,
            other => Self::Generic(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_trigger_wins() {
        // Mentions both "title" and "description"; title comes first in the table.
        assert_eq!(
            IssueTopic::classify("title과 description이 같습니다"),
            Some(IssueTopic::Title)
        );
        assert_eq!(
            IssueTopic::classify("alt 속성이 없는 이미지가 2개 있습니다"),
            Some(IssueTopic::ImageAlt)
        );
    }

    #[test]
    fn triggers_are_case_sensitive() {
        assert_eq!(IssueTopic::classify("h1 태그가 없습니다"), None);
        assert_eq!(IssueTopic::classify("H1 태그가 없습니다"), Some(IssueTopic::H1));
    }

    #[test]
    fn unmatched_message_has_no_topic() {
        assert_eq!(IssueTopic::classify("HTTP 500 오류"), None);
    }

    #[test]
    fn action_titles_are_matched_case_insensitively() {
        assert_eq!(
            VerificationTarget::classify("content", "H1 태그 수정"),
            VerificationTarget::H1
        );
        assert_eq!(
            VerificationTarget::classify("meta", "Open Graph 태그 추가"),
            VerificationTarget::OpenGraph
        );
        assert_eq!(
            VerificationTarget::classify("technical", "사이트맵 제출"),
            VerificationTarget::Sitemap
        );
    }

    #[test]
    fn unknown_category_needs_manual_check() {
        assert_eq!(
            VerificationTarget::classify("other", "anything"),
            VerificationTarget::Manual
        );
        assert_eq!(
            VerificationTarget::classify("link", "백링크 확보"),
            VerificationTarget::Generic(ActionCategory::Link)
        );
    }
}
