use chrono::{NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::Decimal;

use crate::domain::{
    ClientId, CreditId, CreditSnapshot, CreditState, CreditStatus, Employment, InterventionStatus,
    RiskSegment,
};
use crate::workflows::casework::domain::{
    Channel, ClientFinancials, ContactPreferences, ContactRecord, PaymentRecord, Psychotype,
    Scenario,
};
use crate::workflows::casework::psychotype::BehaviorProfile;

/// Wednesday.
pub(super) fn at(hour: u32, minute: u32) -> NaiveDateTime {
    on(12, hour, minute)
}

pub(super) fn on(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

pub(super) fn credit(
    segment: Option<RiskSegment>,
    overdue_days: u32,
    overdue: i64,
    principal: i64,
) -> CreditSnapshot {
    CreditSnapshot {
        id: CreditId(7),
        client_id: ClientId(70),
        debtor_name: "Casework Debtor".to_string(),
        status: CreditStatus::Overdue,
        monthly_payment: Decimal::from(10_000),
        latest_state: Some(CreditState {
            state_date: NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
            principal_debt: Decimal::from(principal),
            overdue_principal: Decimal::from(overdue),
        }),
        risk_segment: segment,
        failed_contacts: 0,
        overdue_days: Some(overdue_days),
    }
}

pub(super) fn profile(psychotype: Psychotype) -> BehaviorProfile {
    BehaviorProfile {
        client_id: ClientId(70),
        psychotype,
        confidence: 0.8,
        scores: Vec::new(),
        factors: Vec::new(),
        recommended_approach: psychotype.recommended_approach().to_string(),
        preferences: ContactPreferences::default(),
        on_time_payment_ratio: None,
        promises_kept_ratio: None,
        contact_rate: None,
    }
}

pub(super) fn preferring(
    mut base: BehaviorProfile,
    hour: u32,
    weekday: Weekday,
    channel: Channel,
) -> BehaviorProfile {
    base.preferences = ContactPreferences {
        best_hour: hour,
        best_weekday: weekday,
        preferred_channel: channel,
    };
    base
}

pub(super) fn contact(channel: Channel, result: InterventionStatus) -> ContactRecord {
    ContactRecord {
        at: None,
        channel,
        result,
        scenario: None,
        aggression_detected: false,
    }
}

pub(super) fn scripted(scenario: Scenario) -> ContactRecord {
    ContactRecord {
        scenario: Some(scenario),
        ..contact(Channel::Phone, InterventionStatus::Callback)
    }
}

pub(super) fn payment(amount: i64, min_payment: i64, overdue_days: u32) -> PaymentRecord {
    PaymentRecord {
        paid_on: None,
        amount: Decimal::from(amount),
        min_payment: Some(Decimal::from(min_payment)),
        overdue_days,
    }
}

pub(super) fn financials(income: Option<i64>, employment: Employment) -> ClientFinancials {
    ClientFinancials {
        client_id: ClientId(70),
        monthly_income: income.map(Decimal::from),
        employment,
        job_changed_recently: false,
        income_dropped: false,
        multiple_credits: false,
    }
}
