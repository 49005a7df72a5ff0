//! Mission core: pure SEO mission domain model and decision tables.
mod plan;
mod synthesize;
mod topic;
mod types;
mod verdict;
mod week;

pub use plan::{build_prompt, parse_plan, strip_code_fences, MissionPlan, PlanError};
pub use synthesize::{fallback_summary, synthesize, MAX_ACTIONS, MIN_ACTIONS};
pub use topic::{IssueTopic, VerificationTarget};
pub use types::{
    ActionCategory, ActionStatus, Issue, IssueType, PageSnapshot, Priority, SiteAnalysis,
    VerificationStatus, WeeklyAction,
};
pub use verdict::{judge, Verification, MANUAL_VERIFICATION_MESSAGE};
pub use week::week_start;
