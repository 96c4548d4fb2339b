use crate::domain::{money_to_f64, round_places, Employment};

use super::{AssessmentSource, LoanApplication, LoanAssessment};

const LARGE_FAMILY: u32 = 3;
const MAX_INCOME_MULTIPLE: f64 = 24.0;

/// Heuristic approval used when no trained model is on hand.
pub fn rule_based_assessment(application: &LoanApplication) -> LoanAssessment {
    let mut score = 0.5;

    score += if application.good_credit_history {
        0.2
    } else {
        -0.3
    };

    match application.debt_to_income() {
        Some(dti) if dti < 0.3 => score += 0.15,
        Some(dti) if dti < 0.5 => score += 0.05,
        Some(dti) if dti > 0.7 => score -= 0.2,
        Some(_) => {}
        None => score -= 0.25,
    }

    match application.employment {
        Employment::Employed | Employment::SelfEmployed => score += 0.1,
        Employment::Unemployed => score -= 0.2,
        _ => {}
    }

    let probability: f64 = round_places(score, 3).clamp(0.0, 1.0);
    LoanAssessment {
        approved_probability: probability,
        approved: probability >= 0.5,
        confidence: round_places((probability - 0.5).abs() * 2.0, 3),
        source: AssessmentSource::RuleBased,
        risk_factors: risk_factors(application),
    }
}

/// Human-readable concerns about an application, independent of how it was scored.
pub fn risk_factors(application: &LoanApplication) -> Vec<String> {
    let mut factors = Vec::new();

    if !application.good_credit_history {
        factors.push("negative credit history".to_string());
    }

    match application.debt_to_income() {
        Some(dti) if dti > 0.6 => factors.push(format!(
            "high debt load: {:.0}% of income",
            dti * 100.0
        )),
        Some(_) => {}
        None => factors.push("no confirmed income".to_string()),
    }

    if application.employment == Employment::Unemployed {
        factors.push("no permanent employment".to_string());
    }

    if application.dependents >= LARGE_FAMILY {
        factors.push(format!("{} dependents", application.dependents));
    }

    let income = money_to_f64(application.monthly_income);
    if income > 0.0 && money_to_f64(application.loan_amount) > income * MAX_INCOME_MULTIPLE {
        factors.push("requested amount exceeds two years of income".to_string());
    }

    factors
}
