use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{capped, proportional};
use crate::domain::{
    money_to_f64, CreditId, CreditSnapshot, RiskSegment, MAX_ESTIMATED_OVERDUE_DAYS,
};

/// Overdue principal at which the amount component saturates. Policy constant.
pub const AMOUNT_NORMALIZATION: f64 = 500_000.0;

const AMOUNT_CAP: f64 = 30.0;
const DAYS_CAP: f64 = 30.0;
const FAILED_CAP: f64 = 15.0;
const FAILED_POINTS_PER_CONTACT: f64 = 3.0;
const UNSCORED_RISK: f64 = 12.0;

/// Composite collection priority of a credit on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityScore {
    pub credit_id: CreditId,
    pub amount_score: f64,
    pub days_score: f64,
    pub risk_score: f64,
    pub failed_score: f64,
    pub total: f64,
    pub overdue_amount: Decimal,
    pub days_overdue: u32,
    pub risk_segment: Option<RiskSegment>,
}

pub(crate) const fn risk_score(segment: Option<RiskSegment>) -> f64 {
    match segment {
        Some(RiskSegment::Low) => 5.0,
        Some(RiskSegment::Medium) => 12.0,
        Some(RiskSegment::High) => 20.0,
        Some(RiskSegment::Critical) => 25.0,
        None => UNSCORED_RISK,
    }
}

/// Score how urgently a credit needs an experienced operator.
pub fn score_priority(credit: &CreditSnapshot) -> PriorityScore {
    let overdue_amount = credit.overdue_principal();
    let days_overdue = credit.estimated_days_overdue();

    let amount_score = proportional(money_to_f64(overdue_amount), AMOUNT_NORMALIZATION, AMOUNT_CAP);
    let days_score = proportional(
        f64::from(days_overdue),
        f64::from(MAX_ESTIMATED_OVERDUE_DAYS),
        DAYS_CAP,
    );
    let risk_score = risk_score(credit.risk_segment);
    let failed_score = capped(
        f64::from(credit.failed_contacts) * FAILED_POINTS_PER_CONTACT,
        FAILED_CAP,
    );

    PriorityScore {
        credit_id: credit.id,
        amount_score,
        days_score,
        risk_score,
        failed_score,
        total: amount_score + days_score + risk_score + failed_score,
        overdue_amount,
        days_overdue,
        risk_segment: credit.risk_segment,
    }
}
