use chrono::{NaiveDate, NaiveDateTime};
use collection_desk::domain::{
    ClientId, CreditId, CreditState, CreditStatus, InterventionStatus, OperatorId, RiskSegment,
};
use collection_desk::error::AppError;
use collection_desk::workflows::distribution::{
    Assignment, AssignmentStore, AssignmentStoreError, CollectionQueries, CreditRecord,
    OperatorLoad, OperatorRecord, RepositoryError,
};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD HH:MM[:SS]"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

pub(crate) fn deserialize_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).map_err(serde::de::Error::custom)
}

/// Accepts `true`/`false`, `yes`/`no` and `1`/`0`.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a yes/no flag, got '{other}'"
        ))),
    }
}

pub(crate) fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AppError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|err| AppError::Input(format!("cannot open {}: {err}", path.display())))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|err| AppError::Input(format!("invalid CSV in {}: {err}", path.display())))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|err| AppError::Input(format!("invalid JSON in {}: {err}", path.display())))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Input(format!("cannot render output: {err}")))?;
    println!("{json}");
    Ok(())
}

/// One row of the credits export: the credit plus its latest ledger state.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreditRow {
    id: u64,
    client_id: u64,
    debtor_name: String,
    status: CreditStatus,
    monthly_payment: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    state_date: Option<NaiveDate>,
    #[serde(default)]
    principal_debt: Option<Decimal>,
    #[serde(default)]
    overdue_principal: Option<Decimal>,
    #[serde(default)]
    risk_segment: Option<RiskSegment>,
}

impl CreditRow {
    fn record(&self) -> CreditRecord {
        CreditRecord {
            id: CreditId(self.id),
            client_id: ClientId(self.client_id),
            debtor_name: self.debtor_name.clone(),
            status: self.status,
            monthly_payment: self.monthly_payment,
        }
    }

    fn state(&self) -> Option<CreditState> {
        Some(CreditState {
            state_date: self.state_date?,
            principal_debt: self.principal_debt.unwrap_or(Decimal::ZERO),
            overdue_principal: self.overdue_principal.unwrap_or(Decimal::ZERO),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InterventionRow {
    operator_id: u64,
    credit_id: u64,
    status: InterventionStatus,
}

/// Query collaborator backed by snapshot files loaded up front.
pub(crate) struct SnapshotQueries {
    operators: Vec<OperatorRecord>,
    credits: BTreeMap<CreditId, CreditRow>,
    interventions: Vec<InterventionRow>,
}

impl SnapshotQueries {
    pub(crate) fn new(
        operators: Vec<OperatorRecord>,
        credits: Vec<CreditRow>,
        interventions: Vec<InterventionRow>,
    ) -> Self {
        Self {
            operators,
            credits: credits
                .into_iter()
                .map(|row| (CreditId(row.id), row))
                .collect(),
            interventions,
        }
    }
}

impl CollectionQueries for SnapshotQueries {
    fn active_operators(&self) -> Result<Vec<OperatorRecord>, RepositoryError> {
        Ok(self
            .operators
            .iter()
            .filter(|record| record.status.is_dispatchable())
            .cloned()
            .collect())
    }

    fn open_credits(&self) -> Result<Vec<CreditRecord>, RepositoryError> {
        Ok(self
            .credits
            .values()
            .filter(|row| row.status != CreditStatus::Closed)
            .map(CreditRow::record)
            .collect())
    }

    fn latest_state_for(&self, credit_id: CreditId) -> Result<Option<CreditState>, RepositoryError> {
        let row = self.credits.get(&credit_id).ok_or(RepositoryError::NotFound)?;
        Ok(row.state())
    }

    fn latest_risk_segment_for(
        &self,
        credit_id: CreditId,
    ) -> Result<Option<RiskSegment>, RepositoryError> {
        let row = self.credits.get(&credit_id).ok_or(RepositoryError::NotFound)?;
        Ok(row.risk_segment)
    }

    fn intervention_statuses_for_operator(
        &self,
        operator_id: OperatorId,
    ) -> Result<Vec<InterventionStatus>, RepositoryError> {
        Ok(self
            .interventions
            .iter()
            .filter(|row| OperatorId(row.operator_id) == operator_id)
            .map(|row| row.status)
            .collect())
    }

    fn failed_contacts_for(&self, credit_id: CreditId) -> Result<u32, RepositoryError> {
        let failed = self
            .interventions
            .iter()
            .filter(|row| CreditId(row.credit_id) == credit_id && row.status.is_failed_contact())
            .count();
        Ok(u32::try_from(failed).unwrap_or(u32::MAX))
    }
}

/// Assignment sink that keeps results in memory for the lifetime of the command.
#[derive(Default)]
pub(crate) struct InMemoryAssignmentStore {
    assignments: Mutex<BTreeMap<NaiveDate, Vec<Assignment>>>,
    loads: Mutex<BTreeMap<OperatorId, u32>>,
}

impl InMemoryAssignmentStore {
    pub(crate) fn loads(&self) -> BTreeMap<OperatorId, u32> {
        self.loads
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
    fn assignments_on(&self, date: NaiveDate) -> Result<Vec<Assignment>, AssignmentStoreError> {
        let guard = self
            .assignments
            .lock()
            .map_err(|_| AssignmentStoreError::Unavailable("assignment mutex poisoned".into()))?;
        Ok(guard.get(&date).cloned().unwrap_or_default())
    }

    fn commit_run(
        &self,
        date: NaiveDate,
        assignments: &[Assignment],
        loads: &[OperatorLoad],
    ) -> Result<usize, AssignmentStoreError> {
        let mut stored = self
            .assignments
            .lock()
            .map_err(|_| AssignmentStoreError::Unavailable("assignment mutex poisoned".into()))?;
        let mut persisted = self
            .loads
            .lock()
            .map_err(|_| AssignmentStoreError::Unavailable("load mutex poisoned".into()))?;
        for load in loads {
            persisted.insert(load.operator_id, load.final_load);
        }
        let superseded = stored
            .insert(date, assignments.to_vec())
            .map(|previous| previous.len())
            .unwrap_or(0);
        Ok(superseded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_desk::workflows::distribution::PriorityTier;

    #[test]
    fn datetimes_accept_common_layouts() {
        let expected = parse_datetime("2025-03-12T10:30:00").expect("iso layout");
        assert_eq!(parse_datetime("2025-03-12 10:30"), Ok(expected));
        assert_eq!(parse_datetime(" 2025-03-12T10:30 "), Ok(expected));
        assert!(parse_datetime("12.03.2025").is_err());
    }

    #[test]
    fn credit_rows_without_state_have_no_ledger() {
        let data = "id,client_id,debtor_name,status,monthly_payment,state_date,principal_debt,overdue_principal,risk_segment\n\
                    7,70,Ivanov,overdue,5000,,,,\n\
                    8,80,Petrova,default,7000,2025-03-01,90000,45000,high\n";
        let rows: Vec<CreditRow> = csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("rows parse");
        let queries = SnapshotQueries::new(Vec::new(), rows, Vec::new());

        assert_eq!(queries.latest_state_for(CreditId(7)).expect("known"), None);
        let state = queries
            .latest_state_for(CreditId(8))
            .expect("known")
            .expect("state present");
        assert_eq!(state.overdue_principal, Decimal::from(45_000));
        assert_eq!(
            queries.latest_risk_segment_for(CreditId(8)).expect("known"),
            Some(RiskSegment::High)
        );
        assert!(matches!(
            queries.latest_state_for(CreditId(9)),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn failed_contacts_count_no_answer_and_refusals() {
        let interventions = vec![
            InterventionRow {
                operator_id: 1,
                credit_id: 7,
                status: InterventionStatus::NoAnswer,
            },
            InterventionRow {
                operator_id: 1,
                credit_id: 7,
                status: InterventionStatus::Refuse,
            },
            InterventionRow {
                operator_id: 2,
                credit_id: 7,
                status: InterventionStatus::Promise,
            },
        ];
        let queries = SnapshotQueries::new(Vec::new(), Vec::new(), interventions);

        assert_eq!(queries.failed_contacts_for(CreditId(7)).expect("count"), 2);
        assert_eq!(
            queries
                .intervention_statuses_for_operator(OperatorId(1))
                .expect("statuses")
                .len(),
            2
        );
    }

    fn assignment(operator: u64, credit: u64, date: NaiveDate) -> Assignment {
        Assignment {
            operator_id: OperatorId(operator),
            credit_id: CreditId(credit),
            client_id: ClientId(credit * 10),
            debtor_name: format!("Debtor {credit}"),
            overdue_amount: Decimal::from(15_000),
            overdue_days: 45,
            priority: 5,
            tier: PriorityTier::High,
            priority_score: 61.5,
            assignment_date: date,
        }
    }

    #[test]
    fn store_supersedes_earlier_runs() {
        let store = InMemoryAssignmentStore::default();
        let date = parse_date("2025-03-10").expect("date");
        let first_run = vec![assignment(3, 7, date), assignment(3, 8, date)];

        let superseded = store
            .commit_run(
                date,
                &first_run,
                &[OperatorLoad {
                    operator_id: OperatorId(3),
                    initial_load: 1,
                    final_load: 3,
                }],
            )
            .expect("first run");
        assert_eq!(superseded, 0);
        assert_eq!(store.assignments_on(date).expect("stored"), first_run);

        let second_run = vec![assignment(4, 7, date)];
        let superseded = store
            .commit_run(
                date,
                &second_run,
                &[
                    OperatorLoad {
                        operator_id: OperatorId(3),
                        initial_load: 3,
                        final_load: 1,
                    },
                    OperatorLoad {
                        operator_id: OperatorId(4),
                        initial_load: 0,
                        final_load: 1,
                    },
                ],
            )
            .expect("second run");
        assert_eq!(superseded, 2);
        assert_eq!(store.assignments_on(date).expect("stored"), second_run);
        assert_eq!(store.loads().get(&OperatorId(3)), Some(&1));
        assert_eq!(store.loads().get(&OperatorId(4)), Some(&1));

        let other_day = date.succ_opt().expect("valid date");
        assert!(store.assignments_on(other_day).expect("empty").is_empty());
    }
}
