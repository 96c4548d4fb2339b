use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::engine::{Assignment, OperatorLoad};
use crate::domain::{
    ClientId, CreditId, CreditState, CreditStatus, InterventionStatus, OperatorId, OperatorRole,
    OperatorStatus, RiskSegment,
};

/// Operator row as stored, before intervention history is aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorRecord {
    pub id: OperatorId,
    pub full_name: String,
    pub role: OperatorRole,
    pub status: OperatorStatus,
    pub hire_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_load: u32,
}

/// Credit row as stored, before the latest state and scoring are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRecord {
    pub id: CreditId,
    pub client_id: ClientId,
    pub debtor_name: String,
    pub status: CreditStatus,
    pub monthly_payment: Decimal,
}

/// Read-only lookups the distribution service needs from storage.
pub trait CollectionQueries: Send + Sync {
    /// Operators in a dispatchable status.
    fn active_operators(&self) -> Result<Vec<OperatorRecord>, RepositoryError>;
    /// Credits that are not closed.
    fn open_credits(&self) -> Result<Vec<CreditRecord>, RepositoryError>;
    fn latest_state_for(&self, credit_id: CreditId) -> Result<Option<CreditState>, RepositoryError>;
    fn latest_risk_segment_for(
        &self,
        credit_id: CreditId,
    ) -> Result<Option<RiskSegment>, RepositoryError>;
    fn intervention_statuses_for_operator(
        &self,
        operator_id: OperatorId,
    ) -> Result<Vec<InterventionStatus>, RepositoryError>;
    /// Count of `no_answer` and `refuse` interventions on the credit.
    fn failed_contacts_for(&self, credit_id: CreditId) -> Result<u32, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sink for distribution results. Re-running a date supersedes its assignments.
pub trait AssignmentStore: Send + Sync {
    /// Assignments currently held for `date`.
    fn assignments_on(&self, date: NaiveDate) -> Result<Vec<Assignment>, AssignmentStoreError>;
    /// Replace every assignment dated `date` and write operator loads as one unit,
    /// returning how many assignments were superseded.
    fn commit_run(
        &self,
        date: NaiveDate,
        assignments: &[Assignment],
        loads: &[OperatorLoad],
    ) -> Result<usize, AssignmentStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssignmentStoreError {
    #[error("assignment store unavailable: {0}")]
    Unavailable(String),
    #[error("assignment store rejected write: {0}")]
    Rejected(String),
}
