//! Loan-application approval: an optional trained classifier backed by a
//! rule-based heuristic.

mod model;
mod rules;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::{money_to_f64, round_places, Employment};

pub use model::{ApprovalModel, LogisticApprovalModel, TrainingMetrics, MIN_TRAINING_SAMPLES};
pub use rules::{risk_factors, rule_based_assessment};

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("approval model has not been trained")]
    NotTrained,
    #[error("{samples} samples but {labels} labels")]
    LabelCountMismatch { samples: usize, labels: usize },
    #[error("at least {required} samples are needed to train, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },
    #[error("saved model has {actual} weights, expected {expected}")]
    CorruptModel { expected: usize, actual: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

fn default_term() -> u32 {
    12
}

fn default_history() -> bool {
    true
}

/// A credit application as submitted; money is monthly unless named otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    #[serde(default)]
    pub monthly_income: Decimal,
    #[serde(default)]
    pub monthly_expenses: Decimal,
    pub loan_amount: Decimal,
    #[serde(default = "default_term")]
    pub loan_term_months: u32,
    #[serde(default = "default_history")]
    pub good_credit_history: bool,
    #[serde(default = "unknown_employment")]
    pub employment: Employment,
    #[serde(default)]
    pub dependents: u32,
}

fn unknown_employment() -> Employment {
    Employment::Unknown
}

impl LoanApplication {
    /// `(loan / term + expenses) / income`, or `None` without a positive income.
    pub fn debt_to_income(&self) -> Option<f64> {
        let income = money_to_f64(self.monthly_income);
        if income <= 0.0 {
            return None;
        }
        let term = f64::from(self.loan_term_months.max(1));
        let monthly_payment = money_to_f64(self.loan_amount) / term;
        Some((monthly_payment + money_to_f64(self.monthly_expenses)) / income)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentSource {
    Model,
    RuleBased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAssessment {
    pub approved_probability: f64,
    pub approved: bool,
    pub confidence: f64,
    pub source: AssessmentSource,
    pub risk_factors: Vec<String>,
}

impl LoanAssessment {
    fn from_model(probability: f64, application: &LoanApplication) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        Self {
            approved_probability: round_places(probability, 3),
            approved: probability >= 0.5,
            confidence: round_places(probability.max(1.0 - probability), 3),
            source: AssessmentSource::Model,
            risk_factors: risk_factors(application),
        }
    }
}

/// Scores applications with a caller-supplied model, falling back to the
/// rule-based heuristic whenever no trained model is available.
pub struct ApprovalService<M> {
    model: Option<Arc<M>>,
}

impl<M> ApprovalService<M>
where
    M: ApprovalModel,
{
    pub fn new(model: Option<Arc<M>>) -> Self {
        Self { model }
    }

    pub fn without_model() -> Self {
        Self { model: None }
    }

    pub fn has_trained_model(&self) -> bool {
        self.model.as_ref().is_some_and(|model| model.is_trained())
    }

    pub fn assess(&self, application: &LoanApplication) -> LoanAssessment {
        let Some(model) = self.model.as_ref().filter(|model| model.is_trained()) else {
            warn!("no trained approval model, using rule-based assessment");
            return rule_based_assessment(application);
        };

        match model.predict(application) {
            Ok(probability) => LoanAssessment::from_model(probability, application),
            Err(err) => {
                warn!(error = %err, "approval model failed, using rule-based assessment");
                rule_based_assessment(application)
            }
        }
    }
}
