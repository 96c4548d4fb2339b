//! Work distribution: rank credits by collection priority, rank operators by
//! experience, and match them tier by tier under a per-operator load cap.
//!
//! The matcher is greedy within each tier. It balances load inside a tier's
//! operator pool but does not search for a globally better assignment.

mod engine;
pub mod repository;
mod scoring;
pub mod service;
mod stats;
mod tiers;

#[cfg(test)]
mod tests;

pub use engine::{
    Assignment, DistributionEngine, DistributionOutcome, EmptyDistribution, OperatorLoad,
};
pub use repository::{
    AssignmentStore, AssignmentStoreError, CollectionQueries, CreditRecord, OperatorRecord,
    RepositoryError,
};
pub use scoring::{score_operator, score_priority, ExperienceScore, PriorityScore};
pub use service::{DistributionService, DistributionServiceError};
pub use stats::{DistributionStats, OperatorWorkload, PriorityCount};
pub use tiers::PriorityTier;

use chrono::NaiveDate;

use crate::config::DistributionConfig;
use crate::domain::{CreditSnapshot, OperatorSnapshot};

/// Run one distribution batch over fully materialised snapshots.
pub fn distribute(
    operators: &[OperatorSnapshot],
    credits: &[CreditSnapshot],
    config: &DistributionConfig,
    assignment_date: NaiveDate,
) -> DistributionOutcome {
    DistributionEngine::new(*config).run(operators, credits, assignment_date)
}
