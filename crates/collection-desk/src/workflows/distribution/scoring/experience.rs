use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::capped;
use crate::domain::{OperatorId, OperatorRole, OperatorSnapshot};

const TENURE_CAP: f64 = 40.0;
const TENURE_POINTS_PER_YEAR: f64 = 8.0;
const NEUTRAL_TENURE: f64 = 20.0;
const SUCCESS_CAP: f64 = 30.0;
const NEUTRAL_SUCCESS: f64 = 15.0;

/// Composite operator experience on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceScore {
    pub operator_id: OperatorId,
    pub tenure_score: f64,
    pub role_score: f64,
    pub success_score: f64,
    pub total: f64,
    pub success_rate: Option<f64>,
    pub total_interventions: u32,
}

pub(crate) const fn role_score(role: OperatorRole) -> f64 {
    match role {
        OperatorRole::Operator => 10.0,
        OperatorRole::SeniorOperator => 20.0,
        OperatorRole::Supervisor => 25.0,
        OperatorRole::Manager => 30.0,
    }
}

fn tenure_score(hire_date: Option<NaiveDate>, today: NaiveDate) -> f64 {
    match hire_date {
        Some(hired) => {
            let years = (today - hired).num_days() as f64 / 365.0;
            capped(years * TENURE_POINTS_PER_YEAR, TENURE_CAP)
        }
        None => NEUTRAL_TENURE,
    }
}

/// Score an operator's tenure, role, and historical success. Missing data
/// resolves to neutral defaults; this never fails.
pub fn score_operator(snapshot: &OperatorSnapshot, today: NaiveDate) -> ExperienceScore {
    let tenure_score = tenure_score(snapshot.hire_date, today);
    let role_score = role_score(snapshot.role);
    let success_rate = snapshot.interventions.success_rate();
    let success_score = success_rate
        .map(|rate| capped(rate * SUCCESS_CAP, SUCCESS_CAP))
        .unwrap_or(NEUTRAL_SUCCESS);

    ExperienceScore {
        operator_id: snapshot.id,
        tenure_score,
        role_score,
        success_score,
        total: tenure_score + role_score + success_score,
        success_rate,
        total_interventions: snapshot.interventions.total,
    }
}
