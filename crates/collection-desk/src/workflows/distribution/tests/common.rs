use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{
    ClientId, CreditId, CreditSnapshot, CreditState, CreditStatus, InterventionStatus,
    InterventionTally, OperatorId, OperatorRole, OperatorSnapshot, OperatorStatus, RiskSegment,
};
use crate::workflows::distribution::engine::{Assignment, OperatorLoad};
use crate::workflows::distribution::repository::{
    AssignmentStore, AssignmentStoreError, CollectionQueries, CreditRecord, OperatorRecord,
    RepositoryError,
};

pub(super) fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

pub(super) fn operator(id: u64, role: OperatorRole, years: i64, load: u32) -> OperatorSnapshot {
    OperatorSnapshot {
        id: OperatorId(id),
        full_name: format!("Operator {id}"),
        role,
        status: OperatorStatus::Active,
        hire_date: Some(run_date() - chrono::Duration::days(365 * years)),
        current_load: load,
        interventions: InterventionTally::default(),
    }
}

pub(super) fn credit(
    id: u64,
    status: CreditStatus,
    overdue: i64,
    monthly: i64,
    segment: Option<RiskSegment>,
    failed_contacts: u32,
) -> CreditSnapshot {
    CreditSnapshot {
        id: CreditId(id),
        client_id: ClientId(100 + id),
        debtor_name: format!("Debtor {id}"),
        status,
        monthly_payment: Decimal::from(monthly),
        latest_state: Some(CreditState {
            state_date: run_date(),
            principal_debt: Decimal::from(overdue * 3),
            overdue_principal: Decimal::from(overdue),
        }),
        risk_segment: segment,
        failed_contacts,
        overdue_days: None,
    }
}

/// Five heavy credits followed by five light ones.
pub(super) fn mixed_book() -> Vec<CreditSnapshot> {
    let mut credits = Vec::new();
    for id in 1..=5 {
        credits.push(credit(
            id,
            CreditStatus::Default,
            400_000,
            10_000,
            Some(RiskSegment::Critical),
            4,
        ));
    }
    for id in 6..=10 {
        credits.push(credit(
            id,
            CreditStatus::Overdue,
            1_000,
            10_000,
            Some(RiskSegment::Low),
            0,
        ));
    }
    credits
}

pub(super) fn three_operators(load: u32) -> Vec<OperatorSnapshot> {
    vec![
        operator(1, OperatorRole::Manager, 6, load),
        operator(2, OperatorRole::SeniorOperator, 3, load),
        operator(3, OperatorRole::Operator, 0, load),
    ]
}

#[derive(Default)]
pub(super) struct MemoryQueries {
    pub(super) operators: Vec<OperatorRecord>,
    pub(super) credits: Vec<CreditRecord>,
    pub(super) states: HashMap<CreditId, CreditState>,
    pub(super) segments: HashMap<CreditId, RiskSegment>,
    pub(super) interventions: HashMap<OperatorId, Vec<InterventionStatus>>,
    pub(super) failed_contacts: HashMap<CreditId, u32>,
}

impl CollectionQueries for MemoryQueries {
    fn active_operators(&self) -> Result<Vec<OperatorRecord>, RepositoryError> {
        Ok(self.operators.clone())
    }

    fn open_credits(&self) -> Result<Vec<CreditRecord>, RepositoryError> {
        Ok(self.credits.clone())
    }

    fn latest_state_for(&self, credit_id: CreditId) -> Result<Option<CreditState>, RepositoryError> {
        Ok(self.states.get(&credit_id).cloned())
    }

    fn latest_risk_segment_for(
        &self,
        credit_id: CreditId,
    ) -> Result<Option<RiskSegment>, RepositoryError> {
        Ok(self.segments.get(&credit_id).copied())
    }

    fn intervention_statuses_for_operator(
        &self,
        operator_id: OperatorId,
    ) -> Result<Vec<InterventionStatus>, RepositoryError> {
        Ok(self
            .interventions
            .get(&operator_id)
            .cloned()
            .unwrap_or_default())
    }

    fn failed_contacts_for(&self, credit_id: CreditId) -> Result<u32, RepositoryError> {
        Ok(self.failed_contacts.get(&credit_id).copied().unwrap_or(0))
    }
}

pub(super) struct UnavailableQueries;

impl CollectionQueries for UnavailableQueries {
    fn active_operators(&self) -> Result<Vec<OperatorRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("replica offline".to_string()))
    }

    fn open_credits(&self) -> Result<Vec<CreditRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("replica offline".to_string()))
    }

    fn latest_state_for(&self, _credit_id: CreditId) -> Result<Option<CreditState>, RepositoryError> {
        Err(RepositoryError::Unavailable("replica offline".to_string()))
    }

    fn latest_risk_segment_for(
        &self,
        _credit_id: CreditId,
    ) -> Result<Option<RiskSegment>, RepositoryError> {
        Err(RepositoryError::Unavailable("replica offline".to_string()))
    }

    fn intervention_statuses_for_operator(
        &self,
        _operator_id: OperatorId,
    ) -> Result<Vec<InterventionStatus>, RepositoryError> {
        Err(RepositoryError::Unavailable("replica offline".to_string()))
    }

    fn failed_contacts_for(&self, _credit_id: CreditId) -> Result<u32, RepositoryError> {
        Err(RepositoryError::Unavailable("replica offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) assignments: Arc<Mutex<HashMap<NaiveDate, Vec<Assignment>>>>,
    pub(super) loads: Arc<Mutex<Vec<OperatorLoad>>>,
}

impl MemoryStore {
    pub(super) fn assignments_for(&self, date: NaiveDate) -> Vec<Assignment> {
        self.assignments
            .lock()
            .expect("store mutex poisoned")
            .get(&date)
            .cloned()
            .unwrap_or_default()
    }

    pub(super) fn persisted_loads(&self) -> Vec<OperatorLoad> {
        self.loads.lock().expect("store mutex poisoned").clone()
    }
}

impl AssignmentStore for MemoryStore {
    fn assignments_on(&self, date: NaiveDate) -> Result<Vec<Assignment>, AssignmentStoreError> {
        Ok(self.assignments_for(date))
    }

    fn commit_run(
        &self,
        date: NaiveDate,
        assignments: &[Assignment],
        loads: &[OperatorLoad],
    ) -> Result<usize, AssignmentStoreError> {
        let mut stored = self.assignments.lock().expect("store mutex poisoned");
        let mut persisted = self.loads.lock().expect("store mutex poisoned");
        let previous = stored.insert(date, assignments.to_vec());
        persisted.extend_from_slice(loads);
        Ok(previous.map(|items| items.len()).unwrap_or(0))
    }
}

/// Queries and store over one book, so loads written by a run are what the
/// next run reads back.
pub(super) struct LedgerDesk {
    book: Mutex<MemoryQueries>,
    assignments: Mutex<HashMap<NaiveDate, Vec<Assignment>>>,
}

impl LedgerDesk {
    pub(super) fn new(book: MemoryQueries) -> Self {
        Self {
            book: Mutex::new(book),
            assignments: Mutex::new(HashMap::new()),
        }
    }

    pub(super) fn load_of(&self, operator_id: OperatorId) -> Option<u32> {
        self.book
            .lock()
            .expect("book mutex poisoned")
            .operators
            .iter()
            .find(|record| record.id == operator_id)
            .map(|record| record.current_load)
    }

    pub(super) fn stored_on(&self, date: NaiveDate) -> Vec<Assignment> {
        self.assignments
            .lock()
            .expect("assignments mutex poisoned")
            .get(&date)
            .cloned()
            .unwrap_or_default()
    }

    pub(super) fn close_credit(&self, credit_id: CreditId) {
        let mut book = self.book.lock().expect("book mutex poisoned");
        if let Some(record) = book.credits.iter_mut().find(|record| record.id == credit_id) {
            record.status = CreditStatus::Closed;
        }
    }
}

impl CollectionQueries for LedgerDesk {
    fn active_operators(&self) -> Result<Vec<OperatorRecord>, RepositoryError> {
        self.book.lock().expect("book mutex poisoned").active_operators()
    }

    fn open_credits(&self) -> Result<Vec<CreditRecord>, RepositoryError> {
        self.book.lock().expect("book mutex poisoned").open_credits()
    }

    fn latest_state_for(&self, credit_id: CreditId) -> Result<Option<CreditState>, RepositoryError> {
        self.book
            .lock()
            .expect("book mutex poisoned")
            .latest_state_for(credit_id)
    }

    fn latest_risk_segment_for(
        &self,
        credit_id: CreditId,
    ) -> Result<Option<RiskSegment>, RepositoryError> {
        self.book
            .lock()
            .expect("book mutex poisoned")
            .latest_risk_segment_for(credit_id)
    }

    fn intervention_statuses_for_operator(
        &self,
        operator_id: OperatorId,
    ) -> Result<Vec<InterventionStatus>, RepositoryError> {
        self.book
            .lock()
            .expect("book mutex poisoned")
            .intervention_statuses_for_operator(operator_id)
    }

    fn failed_contacts_for(&self, credit_id: CreditId) -> Result<u32, RepositoryError> {
        self.book
            .lock()
            .expect("book mutex poisoned")
            .failed_contacts_for(credit_id)
    }
}

impl AssignmentStore for LedgerDesk {
    fn assignments_on(&self, date: NaiveDate) -> Result<Vec<Assignment>, AssignmentStoreError> {
        Ok(self.stored_on(date))
    }

    fn commit_run(
        &self,
        date: NaiveDate,
        assignments: &[Assignment],
        loads: &[OperatorLoad],
    ) -> Result<usize, AssignmentStoreError> {
        let mut book = self.book.lock().expect("book mutex poisoned");
        let mut stored = self.assignments.lock().expect("assignments mutex poisoned");
        for load in loads {
            if let Some(record) = book
                .operators
                .iter_mut()
                .find(|record| record.id == load.operator_id)
            {
                record.current_load = load.final_load;
            }
        }
        let previous = stored.insert(date, assignments.to_vec());
        Ok(previous.map(|items| items.len()).unwrap_or(0))
    }
}

pub(super) fn operator_record(id: u64, status: OperatorStatus, load: u32) -> OperatorRecord {
    OperatorRecord {
        id: OperatorId(id),
        full_name: format!("Operator {id}"),
        role: OperatorRole::Operator,
        status,
        hire_date: None,
        current_load: load,
    }
}

pub(super) fn credit_record(id: u64, status: CreditStatus) -> CreditRecord {
    CreditRecord {
        id: CreditId(id),
        client_id: ClientId(100 + id),
        debtor_name: format!("Debtor {id}"),
        status,
        monthly_payment: Decimal::from(10_000),
    }
}
