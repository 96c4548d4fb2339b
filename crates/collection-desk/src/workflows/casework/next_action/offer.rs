use rust_decimal::Decimal;

use crate::domain::{money_to_f64, RiskSegment};
use crate::workflows::casework::domain::{Offer, Psychotype};

const SEVERE_DEBT_TO_INCOME: f64 = 6.0;
const MODERATE_DEBT_TO_INCOME: f64 = 3.0;
const NO_INCOME_DEBT_TO_INCOME: f64 = 999.0;
const DISCOUNT_CEILING: u8 = 50;
const SEVERE_DISCOUNT_BONUS: u8 = 20;

fn offers_for(segment: RiskSegment) -> Vec<Offer> {
    match segment {
        RiskSegment::Low => vec![Offer::None, Offer::Discount10],
        RiskSegment::Medium => vec![Offer::Discount10, Offer::Discount20, Offer::Restructure6m],
        RiskSegment::High => vec![
            Offer::Discount20,
            Offer::Discount50,
            Offer::Restructure12m,
            Offer::Holiday1m,
        ],
        RiskSegment::Critical => vec![Offer::Discount50, Offer::Holiday3m, Offer::PartialWriteOff],
    }
}

/// Largest discount an operator may grant, in percent.
pub(crate) const fn max_discount(segment: RiskSegment) -> u8 {
    match segment {
        RiskSegment::Low => 5,
        RiskSegment::Medium => 15,
        RiskSegment::High => 30,
        RiskSegment::Critical => 50,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OfferDecision {
    pub offer: Offer,
    pub max_discount_percent: u8,
    pub reasoning: Vec<String>,
}

/// Choose the concession. A declared zero income is treated as the worst
/// debt-to-income case; an unknown income skips the affordability rules.
pub(crate) fn best_offer(
    segment: RiskSegment,
    total_debt: Decimal,
    psychotype: Psychotype,
    monthly_income: Option<Decimal>,
) -> OfferDecision {
    let mut reasoning = Vec::new();
    let mut offers = offers_for(segment);
    let mut max_discount_percent = max_discount(segment);

    if let Some(income) = monthly_income {
        let income = money_to_f64(income);
        let debt_to_income = if income > 0.0 {
            money_to_f64(total_debt) / income
        } else {
            NO_INCOME_DEBT_TO_INCOME
        };

        if debt_to_income > SEVERE_DEBT_TO_INCOME {
            offers = vec![Offer::Restructure12m, Offer::Holiday3m, Offer::PartialWriteOff];
            max_discount_percent =
                (max_discount_percent + SEVERE_DISCOUNT_BONUS).min(DISCOUNT_CEILING);
            reasoning.push(format!("High debt-to-income ratio ({debt_to_income:.1}x)"));
        } else if debt_to_income > MODERATE_DEBT_TO_INCOME {
            if !offers.contains(&Offer::Restructure6m) {
                offers.insert(0, Offer::Restructure6m);
            }
            reasoning.push("Moderate debt load".to_string());
        }
    }

    match psychotype {
        Psychotype::Unable => {
            offers.retain(|offer| offer.is_restructure_or_holiday());
            reasoning
                .push("Client wants to pay but cannot, offer an installment plan".to_string());
        }
        Psychotype::Unwilling => {
            offers.retain(|offer| offer.is_discount());
            reasoning.push("Client can pay, offer a discount for quick payment".to_string());
        }
        _ => {}
    }

    OfferDecision {
        offer: offers.first().copied().unwrap_or(Offer::None),
        max_discount_percent,
        reasoning,
    }
}
