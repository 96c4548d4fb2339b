//! Return forecast: how likely a delinquent credit is to be repaid, how much
//! and how soon, and which portfolio strategy has the best present value.

mod factors;
mod npv;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{ClientFinancials, PaymentRecord, Psychotype, Strategy};
use super::psychotype::BehaviorProfile;
use crate::config::ForecastConfig;
use crate::domain::{
    money_from_f64, round_places, ClientId, CreditId, CreditSnapshot, RiskSegment,
};
use factors::{analyze, FactorInputs};
use npv::{net_present_values, NetPresentValues};

const MIN_PROBABILITY: f64 = 0.01;
const MAX_PROBABILITY: f64 = 0.99;
const UNKNOWN_SEGMENT_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnForecast {
    pub client_id: ClientId,
    pub credit_id: CreditId,
    pub return_probability: f64,
    pub partial_return_probability: f64,
    pub expected_return_amount: Decimal,
    pub expected_return_days: u32,
    pub recommendation: Strategy,
    pub recommendation_confidence: f64,
    /// Sum of the signed factor weights applied to the base probability.
    pub adjustment: f64,
    pub positive_factors: Vec<String>,
    pub negative_factors: Vec<String>,
    pub npv_continue: Decimal,
    pub npv_sell: Decimal,
    pub npv_write_off: Decimal,
}

pub(crate) const fn base_probability(segment: Option<RiskSegment>) -> f64 {
    match segment {
        Some(RiskSegment::Low) => 0.85,
        Some(RiskSegment::Medium) => 0.55,
        Some(RiskSegment::High) => 0.25,
        Some(RiskSegment::Critical) => 0.08,
        None => UNKNOWN_SEGMENT_PROBABILITY,
    }
}

/// Full and partial return probabilities. The partial figure is only
/// guaranteed to dominate the full one when `adjustment` is non-negative.
pub(crate) fn return_probabilities(segment: Option<RiskSegment>, adjustment: f64) -> (f64, f64) {
    let full = (base_probability(segment) + adjustment).clamp(MIN_PROBABILITY, MAX_PROBABILITY);
    let partial = (full * 1.3 + 0.1).clamp(MIN_PROBABILITY, MAX_PROBABILITY);
    (full, partial)
}

pub(crate) const fn expected_days(full_probability: f64) -> u32 {
    if full_probability > 0.7 {
        30
    } else if full_probability > 0.5 {
        60
    } else if full_probability > 0.3 {
        120
    } else {
        365
    }
}

fn expected_amount(total_debt: Decimal, full: f64, partial: f64) -> Decimal {
    let share = full + (partial - full).max(0.0) * 0.5;
    total_debt * money_from_f64(share)
}

/// NPV baseline first, then the hard rules; the highest confidence wins and
/// the earliest candidate keeps ties.
fn recommend(
    full_probability: f64,
    values: &NetPresentValues,
    overdue_days: u32,
    psychotype: Option<Psychotype>,
) -> (Strategy, f64) {
    let baseline = if values.continue_collection >= values.sell
        && values.continue_collection >= values.write_off
    {
        if full_probability > 0.5 {
            (Strategy::ContinueSoft, 0.8)
        } else {
            (Strategy::ContinueHard, 0.7)
        }
    } else if values.sell >= values.write_off {
        (Strategy::Sell, 0.75)
    } else {
        (Strategy::WriteOff, 0.6)
    };

    let overrides = [
        (
            overdue_days > 365 && full_probability < 0.15,
            (Strategy::WriteOff, 0.85),
        ),
        (
            psychotype == Some(Psychotype::Unable) && full_probability > 0.3,
            (Strategy::Restructure, 0.70),
        ),
        (
            overdue_days > 180 && full_probability < 0.25,
            (Strategy::Legal, 0.65),
        ),
    ];

    overrides
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, candidate)| candidate)
        .fold(baseline, |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        })
}

/// Forecast repayment of `credit`. Payments are oldest first.
pub fn forecast_return(
    financials: &ClientFinancials,
    profile: Option<&BehaviorProfile>,
    credit: &CreditSnapshot,
    payments: &[PaymentRecord],
    config: &ForecastConfig,
) -> ReturnForecast {
    let total_debt = credit.principal_debt();
    let overdue_days = credit.overdue_days();
    let psychotype = profile.map(|profile| profile.psychotype);

    let inputs = FactorInputs::new(financials, profile, overdue_days, total_debt, payments);
    let analysis = analyze(&inputs);

    let (full, partial) = return_probabilities(credit.risk_segment, analysis.adjustment);
    let amount = expected_amount(total_debt, full, partial);
    let days = expected_days(full);
    let values = net_present_values(amount, days, total_debt, credit.risk_segment, config);
    let (recommendation, confidence) = recommend(full, &values, overdue_days, psychotype);

    ReturnForecast {
        client_id: credit.client_id,
        credit_id: credit.id,
        return_probability: round_places(full, 3),
        partial_return_probability: round_places(partial, 3),
        expected_return_amount: amount.round_dp(2),
        expected_return_days: days,
        recommendation,
        recommendation_confidence: round_places(confidence, 2),
        adjustment: analysis.adjustment,
        positive_factors: analysis.positive,
        negative_factors: analysis.negative,
        npv_continue: values.continue_collection.round_dp(2),
        npv_sell: values.sell.round_dp(2),
        npv_write_off: values.write_off.round_dp(2),
    }
}
