//! Work distribution and recommendation engine for collection desks.
//!
//! Every scoring entry point consumes immutable snapshots and returns derived
//! values; persistence and transport stay with the caller.

pub mod config;
pub mod domain;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use workflows::approval::{ApprovalModel, ApprovalService, LoanApplication, LoanAssessment};
pub use workflows::casework::{
    classify_psychotype, forecast_return, recommend_next_action, BehaviorProfile,
    NbaRecommendation, ReturnForecast,
};
pub use workflows::compliance::{check_compliance, ComplianceRequest, ComplianceResult};
pub use workflows::distribution::{
    distribute, score_operator, score_priority, Assignment, DistributionOutcome,
    ExperienceScore, PriorityScore,
};
