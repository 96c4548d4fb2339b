use crate::infra::{print_json, read_json};
use chrono::{Local, NaiveDateTime};
use clap::Args;
use collection_desk::config::AppConfig;
use collection_desk::domain::CreditSnapshot;
use collection_desk::error::AppError;
use collection_desk::workflows::casework::{
    classify_psychotype, forecast_return, live_suggestions, recommend_next_action, script_for,
    BehaviorEvidence, BehaviorProfile, ClientFinancials, ContactPreferences, ContactRecord,
    IndicatorSet, NbaRecommendation, PaymentRecord, PromiseRecord, ReturnForecast, Script,
    ScriptContext, ScriptSuggestion,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CaseworkArgs {
    /// Case file (JSON) with the credit, client financials, and history
    #[arg(long)]
    pub(crate) case: PathBuf,
    /// Reference time for the recommendation. Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Operator name spoken in the call script
    #[arg(long)]
    pub(crate) operator_name: Option<String>,
    /// Bank name spoken in the call script
    #[arg(long)]
    pub(crate) bank_name: Option<String>,
    /// Running call transcript (plain text) to draw live suggestions from
    #[arg(long)]
    pub(crate) transcript: Option<PathBuf>,
}

/// Everything known about one credit and its borrower.
#[derive(Debug, Deserialize)]
struct CaseFile {
    credit: CreditSnapshot,
    financials: ClientFinancials,
    #[serde(default)]
    payments: Vec<PaymentRecord>,
    /// Oldest first.
    #[serde(default)]
    contacts: Vec<ContactRecord>,
    #[serde(default)]
    promises: Vec<PromiseRecord>,
    #[serde(default)]
    preferences: ContactPreferences,
    #[serde(default)]
    observed: IndicatorSet,
}

impl CaseFile {
    fn evidence(&self) -> BehaviorEvidence {
        BehaviorEvidence {
            monthly_income: self.financials.monthly_income,
            total_debt: self.credit.principal_debt(),
            overdue_days: self.credit.overdue_days(),
            payments: self.payments.clone(),
            contacts: self.contacts.clone(),
            promises: self.promises.clone(),
            preferences: self.preferences,
            observed: self.observed.clone(),
            ..BehaviorEvidence::new(self.credit.client_id)
        }
    }
}

#[derive(Serialize)]
struct CaseworkReport {
    profile: BehaviorProfile,
    next_action: NbaRecommendation,
    forecast: ReturnForecast,
    script: Script,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<Vec<ScriptSuggestion>>,
}

pub(crate) fn run_casework(args: CaseworkArgs, config: &AppConfig) -> Result<(), AppError> {
    let case: CaseFile = read_json(&args.case)?;
    let now = args.now.unwrap_or_else(|| Local::now().naive_local());

    let profile = classify_psychotype(&case.evidence());
    let next_action = recommend_next_action(
        Some(&profile),
        &case.credit,
        &case.contacts,
        case.financials.monthly_income,
        now,
    );
    let forecast = forecast_return(
        &case.financials,
        Some(&profile),
        &case.credit,
        &case.payments,
        &config.forecast,
    );

    let mut context = ScriptContext::for_credit(&case.credit);
    if let Some(operator_name) = args.operator_name {
        context.operator_name = operator_name;
    }
    if let Some(bank_name) = args.bank_name {
        context.bank_name = bank_name;
    }
    let script = script_for(profile.psychotype, next_action.scenario, &context);
    let suggestions = args
        .transcript
        .as_deref()
        .map(std::fs::read_to_string)
        .transpose()?
        .map(|transcript| {
            live_suggestions(&transcript, profile.psychotype, next_action.scenario, &context)
        });

    print_json(&CaseworkReport {
        profile,
        next_action,
        forecast,
        script,
        suggestions,
    })
}
