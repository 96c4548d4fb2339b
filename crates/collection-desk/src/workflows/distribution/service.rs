use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::engine::{Assignment, DistributionEngine, DistributionOutcome, OperatorLoad};
use super::repository::{
    AssignmentStore, AssignmentStoreError, CollectionQueries, CreditRecord, OperatorRecord,
    RepositoryError,
};
use crate::config::DistributionConfig;
use crate::domain::{
    CreditSnapshot, CreditStatus, InterventionTally, OperatorId, OperatorSnapshot,
};

/// Service composing the query collaborator, the engine, and the assignment sink.
pub struct DistributionService<Q, S> {
    queries: Arc<Q>,
    store: Arc<S>,
    engine: DistributionEngine,
}

impl<Q, S> DistributionService<Q, S>
where
    Q: CollectionQueries + 'static,
    S: AssignmentStore + 'static,
{
    pub fn new(queries: Arc<Q>, store: Arc<S>, config: DistributionConfig) -> Self {
        Self {
            queries,
            store,
            engine: DistributionEngine::new(config),
        }
    }

    pub fn operator_snapshots(&self) -> Result<Vec<OperatorSnapshot>, RepositoryError> {
        self.queries
            .active_operators()?
            .into_iter()
            .filter(|record| record.status.is_dispatchable())
            .map(|record| self.operator_snapshot(record))
            .collect()
    }

    pub fn credit_snapshots(&self) -> Result<Vec<CreditSnapshot>, RepositoryError> {
        self.queries
            .open_credits()?
            .into_iter()
            .filter(|record| record.status != CreditStatus::Closed)
            .map(|record| self.credit_snapshot(record))
            .collect()
    }

    /// Distribute the open book for `date`, replacing any earlier run for that date.
    ///
    /// Assignments from an earlier run of the same date are taken off their
    /// operators' loads before matching, so a re-run starts from the same
    /// capacity as the first run did.
    pub fn run(&self, date: NaiveDate) -> Result<DistributionOutcome, DistributionServiceError> {
        let previous = self.store.assignments_on(date)?;
        let mut operators = self.operator_snapshots()?;
        let stored_loads: BTreeMap<OperatorId, u32> = operators
            .iter()
            .map(|operator| (operator.id, operator.current_load))
            .collect();
        release_superseded(&mut operators, &previous);
        let credits = self.credit_snapshots()?;

        let outcome = self.engine.run(&operators, &credits, date);

        let loads: Vec<OperatorLoad> = outcome
            .loads
            .iter()
            .filter_map(|load| {
                let stored = stored_loads.get(&load.operator_id).copied()?;
                (stored != load.final_load).then_some(OperatorLoad {
                    operator_id: load.operator_id,
                    initial_load: stored,
                    final_load: load.final_load,
                })
            })
            .collect();
        let superseded = self
            .store
            .commit_run(date, &outcome.assignments, &loads)?;

        info!(
            date = %date,
            superseded,
            persisted_loads = loads.len(),
            max_load = self.engine.config().max_load,
            "distribution persisted"
        );
        Ok(outcome)
    }

    fn operator_snapshot(&self, record: OperatorRecord) -> Result<OperatorSnapshot, RepositoryError> {
        let statuses = self.queries.intervention_statuses_for_operator(record.id)?;
        Ok(OperatorSnapshot {
            id: record.id,
            full_name: record.full_name,
            role: record.role,
            status: record.status,
            hire_date: record.hire_date,
            current_load: record.current_load,
            interventions: InterventionTally::from_statuses(statuses),
        })
    }

    fn credit_snapshot(&self, record: CreditRecord) -> Result<CreditSnapshot, RepositoryError> {
        Ok(CreditSnapshot {
            latest_state: self.queries.latest_state_for(record.id)?,
            risk_segment: self.queries.latest_risk_segment_for(record.id)?,
            failed_contacts: self.queries.failed_contacts_for(record.id)?,
            id: record.id,
            client_id: record.client_id,
            debtor_name: record.debtor_name,
            status: record.status,
            monthly_payment: record.monthly_payment,
            overdue_days: None,
        })
    }
}

/// Take assignments from a superseded run off the operators holding them.
fn release_superseded(operators: &mut [OperatorSnapshot], previous: &[Assignment]) {
    if previous.is_empty() {
        return;
    }
    let mut held: BTreeMap<OperatorId, u32> = BTreeMap::new();
    for assignment in previous {
        *held.entry(assignment.operator_id).or_default() += 1;
    }
    for operator in operators.iter_mut() {
        if let Some(count) = held.get(&operator.id) {
            operator.current_load = operator.current_load.saturating_sub(*count);
        }
    }
    debug!(released = previous.len(), "released superseded assignments");
}

/// Error raised by the distribution service.
#[derive(Debug, thiserror::Error)]
pub enum DistributionServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Store(#[from] AssignmentStoreError),
}
