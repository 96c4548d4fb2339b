use crate::infra::{
    print_json, read_csv, CreditRow, InMemoryAssignmentStore, InterventionRow, SnapshotQueries,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use collection_desk::config::{AppConfig, DistributionConfig};
use collection_desk::domain::OperatorId;
use collection_desk::error::AppError;
use collection_desk::workflows::distribution::{
    DistributionOutcome, DistributionService, DistributionStats, OperatorRecord,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DistributeArgs {
    /// Operators CSV (id, full_name, role, status, hire_date, current_load)
    #[arg(long)]
    pub(crate) operators: PathBuf,
    /// Credits CSV with the latest ledger state and risk segment per credit
    #[arg(long)]
    pub(crate) credits: PathBuf,
    /// Interventions CSV (operator_id, credit_id, status)
    #[arg(long)]
    pub(crate) interventions: Option<PathBuf>,
    /// Override the configured per-operator load ceiling
    #[arg(long)]
    pub(crate) max_load: Option<u32>,
    /// Assignment date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct DistributionReport {
    outcome: DistributionOutcome,
    stats: DistributionStats,
    final_loads: BTreeMap<OperatorId, u32>,
}

pub(crate) fn run_distribution(args: DistributeArgs, config: &AppConfig) -> Result<(), AppError> {
    let DistributeArgs {
        operators,
        credits,
        interventions,
        max_load,
        date,
    } = args;

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let distribution = DistributionConfig {
        max_load: max_load.unwrap_or(config.distribution.max_load),
        ..config.distribution
    };

    let operators: Vec<OperatorRecord> = read_csv(&operators)?;
    let credits: Vec<CreditRow> = read_csv(&credits)?;
    let interventions: Vec<InterventionRow> = match interventions {
        Some(path) => read_csv(&path)?,
        None => Vec::new(),
    };

    let queries = Arc::new(SnapshotQueries::new(operators, credits, interventions));
    let store = Arc::new(InMemoryAssignmentStore::default());
    let service = DistributionService::new(queries, store.clone(), distribution);

    let outcome = service.run(date)?;
    let stats = DistributionStats::from_assignments(date, &outcome.assignments);
    print_json(&DistributionReport {
        outcome,
        stats,
        final_loads: store.loads(),
    })
}

