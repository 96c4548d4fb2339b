use crate::infra::{deserialize_flag, print_json, read_csv, read_json};
use clap::Args;
use collection_desk::config::AppConfig;
use collection_desk::domain::Employment;
use collection_desk::error::AppError;
use collection_desk::workflows::approval::{
    ApprovalModel, ApprovalService, LoanApplication, LogisticApprovalModel,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct TrainArgs {
    /// Labelled applications (CSV with an `approved` column)
    #[arg(long)]
    pub(crate) samples: PathBuf,
    /// Where to write the trained model (JSON)
    #[arg(long)]
    pub(crate) model: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Application to assess (JSON)
    #[arg(long)]
    pub(crate) application: PathBuf,
    /// Saved model; defaults to APPROVAL_MODEL_PATH when set
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct SampleRow {
    monthly_income: Decimal,
    #[serde(default)]
    monthly_expenses: Option<Decimal>,
    loan_amount: Decimal,
    loan_term_months: u32,
    #[serde(deserialize_with = "deserialize_flag")]
    good_credit_history: bool,
    employment: Employment,
    #[serde(default)]
    dependents: Option<u32>,
    #[serde(deserialize_with = "deserialize_flag")]
    approved: bool,
}

impl SampleRow {
    fn into_parts(self) -> (LoanApplication, bool) {
        let application = LoanApplication {
            monthly_income: self.monthly_income,
            monthly_expenses: self.monthly_expenses.unwrap_or(Decimal::ZERO),
            loan_amount: self.loan_amount,
            loan_term_months: self.loan_term_months,
            good_credit_history: self.good_credit_history,
            employment: self.employment,
            dependents: self.dependents.unwrap_or(0),
        };
        (application, self.approved)
    }
}

pub(crate) fn run_train(args: TrainArgs) -> Result<(), AppError> {
    let rows: Vec<SampleRow> = read_csv(&args.samples)?;
    let (samples, labels): (Vec<LoanApplication>, Vec<bool>) =
        rows.into_iter().map(SampleRow::into_parts).unzip();

    let mut model = LogisticApprovalModel::new();
    let metrics = model.train(&samples, &labels)?;
    model.save(&args.model)?;
    info!(path = %args.model.display(), "approval model ready");

    print_json(&metrics)
}

pub(crate) fn run_predict(args: PredictArgs, config: &AppConfig) -> Result<(), AppError> {
    let application: LoanApplication = read_json(&args.application)?;
    let model = match args.model.or_else(|| config.approval_model_path.clone()) {
        Some(path) => Some(Arc::new(LogisticApprovalModel::load(&path)?)),
        None => None,
    };

    let service = ApprovalService::new(model);
    print_json(&service.assess(&application))
}
