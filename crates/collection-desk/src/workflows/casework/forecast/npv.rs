use rust_decimal::Decimal;

use crate::config::ForecastConfig;
use crate::domain::{money_from_f64, RiskSegment};

const WRITE_OFF_TAX_OFFSET: f64 = 0.20;
const UNKNOWN_SEGMENT_SALE_PRICE: f64 = 0.20;

/// Portfolio sale price as a fraction of the outstanding debt.
pub(crate) const fn sale_price(segment: Option<RiskSegment>) -> f64 {
    match segment {
        Some(RiskSegment::Low) => 0.70,
        Some(RiskSegment::Medium) => 0.35,
        Some(RiskSegment::High) => 0.12,
        Some(RiskSegment::Critical) => 0.03,
        None => UNKNOWN_SEGMENT_SALE_PRICE,
    }
}

pub(crate) fn discount_factor(annual_rate: f64, days: u32) -> f64 {
    let years = f64::from(days) / 365.0;
    1.0 / (1.0 + annual_rate).powf(years)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NetPresentValues {
    pub continue_collection: Decimal,
    pub sell: Decimal,
    pub write_off: Decimal,
}

pub(crate) fn net_present_values(
    expected_amount: Decimal,
    expected_days: u32,
    total_debt: Decimal,
    segment: Option<RiskSegment>,
    config: &ForecastConfig,
) -> NetPresentValues {
    let factor = money_from_f64(discount_factor(config.annual_discount_rate, expected_days));
    let collection_cost = total_debt * money_from_f64(config.collection_cost_ratio);

    NetPresentValues {
        continue_collection: expected_amount * factor - collection_cost,
        sell: total_debt * money_from_f64(sale_price(segment)),
        write_off: -(total_debt * money_from_f64(WRITE_OFF_TAX_OFFSET)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_factor_is_one_today_and_shrinks_with_time() {
        assert!((discount_factor(0.15, 0) - 1.0).abs() < 1e-12);
        assert!((discount_factor(0.15, 365) - 1.0 / 1.15).abs() < 1e-12);
        assert!(discount_factor(0.15, 120) > discount_factor(0.15, 365));
    }

    #[test]
    fn sell_and_write_off_scale_with_debt() {
        let values = net_present_values(
            Decimal::ZERO,
            365,
            Decimal::from(100_000),
            Some(RiskSegment::High),
            &ForecastConfig::default(),
        );
        assert_eq!(values.sell.round_dp(2), Decimal::from(12_000));
        assert_eq!(values.write_off.round_dp(2), Decimal::from(-20_000));
        assert_eq!(values.continue_collection.round_dp(2), Decimal::from(-15_000));
    }
}
