use rust_decimal::Decimal;

use crate::domain::{money_to_f64, Employment};
use crate::workflows::casework::domain::{ClientFinancials, PaymentRecord, Psychotype};
use crate::workflows::casework::psychotype::BehaviorProfile;

const STABLE_INCOME: f64 = 50_000.0;
const RECENT_PAYMENTS: usize = 5;
const NEUTRAL_RATE: f64 = 0.5;

/// Inputs the factor rules read, resolved from optional data up front.
#[derive(Debug, Clone)]
pub(crate) struct FactorInputs<'a> {
    pub financials: &'a ClientFinancials,
    pub psychotype: Option<Psychotype>,
    pub contact_rate: f64,
    pub promises_kept_ratio: f64,
    pub overdue_days: u32,
    pub total_debt: Decimal,
    pub payments: &'a [PaymentRecord],
}

impl<'a> FactorInputs<'a> {
    pub(crate) fn new(
        financials: &'a ClientFinancials,
        profile: Option<&BehaviorProfile>,
        overdue_days: u32,
        total_debt: Decimal,
        payments: &'a [PaymentRecord],
    ) -> Self {
        Self {
            financials,
            psychotype: profile.map(|profile| profile.psychotype),
            contact_rate: profile
                .and_then(|profile| profile.contact_rate)
                .unwrap_or(NEUTRAL_RATE),
            promises_kept_ratio: profile
                .and_then(|profile| profile.promises_kept_ratio)
                .unwrap_or(NEUTRAL_RATE),
            overdue_days,
            total_debt,
            payments,
        }
    }
}

/// Signed adjustments to the base return probability, with explanations.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FactorAnalysis {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub adjustment: f64,
}

impl FactorAnalysis {
    fn push(&mut self, weight: f64, label: impl Into<String>) {
        self.adjustment += weight;
        if weight >= 0.0 {
            self.positive.push(label.into());
        } else {
            self.negative.push(label.into());
        }
    }
}

pub(crate) fn analyze(inputs: &FactorInputs<'_>) -> FactorAnalysis {
    let mut analysis = FactorAnalysis::default();
    let income = inputs
        .financials
        .monthly_income
        .map(money_to_f64)
        .unwrap_or(0.0);

    if income > STABLE_INCOME {
        analysis.push(0.15, "Stable income");
    } else if income > 0.0 {
        analysis.push(0.075, "Has income");
    } else {
        analysis.push(-0.20, "No confirmed income");
    }

    match inputs.financials.employment {
        Employment::Employed => analysis.push(0.10, "Employed"),
        Employment::Unemployed => analysis.push(-0.12, "Unemployed"),
        _ => {}
    }

    match inputs.psychotype {
        Some(Psychotype::Cooperative) => analysis.push(0.08, "Open to dialog"),
        Some(Psychotype::Toxic) => analysis.push(-0.10, "Conflict-prone client"),
        Some(Psychotype::Unable) => analysis.push(-0.05, "Financial hardship"),
        _ => {}
    }

    if inputs.contact_rate > 0.7 {
        analysis.push(0.12, "Highly reachable");
    } else if inputs.contact_rate < 0.3 {
        analysis.push(-0.15, "Ignores contacts");
    }

    if inputs.promises_kept_ratio > 0.7 {
        analysis.push(0.18, "Keeps promises");
    } else if inputs.promises_kept_ratio < 0.3 {
        analysis.push(-0.20, "Breaks promises");
    }

    match inputs.overdue_days {
        days if days > 180 => analysis.push(-0.15, format!("Long overdue ({days} days)")),
        days if days > 90 => analysis.push(-0.075, "Overdue more than 90 days"),
        days if days < 30 => analysis.push(0.05, "Short overdue period"),
        _ => {}
    }

    if income > 0.0 {
        let debt_ratio = money_to_f64(inputs.total_debt) / income;
        if debt_ratio < 2.0 {
            analysis.push(0.05, "Affordable debt size");
        } else if debt_ratio > 6.0 {
            analysis.push(-0.10, "Debt exceeds six monthly incomes");
        }
    }

    if inputs.financials.job_changed_recently {
        analysis.push(-0.05, "Recent job change");
    }
    if inputs.financials.income_dropped {
        analysis.push(-0.08, "Income dropped");
    }
    if inputs.financials.multiple_credits {
        analysis.push(-0.08, "Multiple credits");
    }

    let recent = &inputs.payments[inputs.payments.len().saturating_sub(RECENT_PAYMENTS)..];
    if recent.iter().any(PaymentRecord::is_partial) {
        analysis.push(0.10, "Makes partial payments");
    }

    analysis
}
