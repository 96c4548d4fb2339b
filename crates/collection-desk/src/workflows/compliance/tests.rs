use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use super::*;

const SCRIPTED: &str = "Добрый день, меня зовут Анна, компания Вектор. \
    Звоню по поводу просроченного платежа. Всего доброго!";

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid timestamp")
}

fn call(day: u32, hour: u32) -> RecentContact {
    RecentContact {
        at: at(day, hour, 0),
        kind: ContactKind::Call,
    }
}

#[test]
fn threat_without_script_costs_one_violation_and_three_warnings() {
    let result = check_compliance(&ComplianceRequest::new("Мы приедем к вам", at(12, 10, 0)));

    assert!(!result.is_compliant);
    assert_eq!(result.violations.len(), 1);
    let threat = &result.violations[0];
    assert_eq!(threat.category, FindingCategory::Threats);
    assert_eq!(threat.matched.as_deref(), Some("приедем к вам"));
    assert_eq!(threat.context.as_deref(), Some("Мы приедем к вам"));
    assert_eq!(result.count(FindingCategory::ScriptDeviation), 3);
    assert_eq!(result.warnings.len(), 3);
    assert_eq!(result.score, 0.55);
}

#[test]
fn scripted_call_in_hours_is_clean() {
    let result = check_compliance(&ComplianceRequest::new(SCRIPTED, at(12, 14, 30)));

    assert!(result.is_compliant);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.score, 1.0);
}

#[test]
fn disclosure_is_a_violation_and_pressure_a_warning() {
    let text = format!("{SCRIPTED} Платите немедленно, иначе позвоним на работу.");
    let result = check_compliance(&ComplianceRequest::new(text, at(12, 11, 0)));

    assert_eq!(result.count(FindingCategory::Disclosure), 1);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.count(FindingCategory::Pressure), 1);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.score, 0.65);
}

#[test]
fn matching_ignores_case() {
    let text = format!("{SCRIPTED} ПОСЛЕДНИЙ ШАНС");
    let result = check_compliance(&ComplianceRequest::new(text, at(12, 11, 0)));

    assert_eq!(result.count(FindingCategory::Pressure), 1);
    assert!(result.is_compliant);
}

#[test]
fn contract_wording_is_not_an_insult() {
    let text = format!("{SCRIPTED} По договору срок оплаты до 20 числа.");
    let result = check_compliance(&ComplianceRequest::new(text, at(12, 11, 0)));

    assert_eq!(result.count(FindingCategory::Rudeness), 0);
    assert_eq!(result.score, 1.0);
}

#[test]
fn weekday_and_weekend_windows_differ() {
    let cases = [
        (at(12, 8, 0), true),
        (at(12, 7, 59), false),
        (at(12, 21, 59), true),
        (at(12, 22, 0), false),
        (at(15, 8, 30), false),
        (at(15, 9, 0), true),
        (at(16, 19, 59), true),
        (at(16, 20, 0), false),
    ];
    for (call_at, allowed) in cases {
        let result = check_compliance(&ComplianceRequest::new(SCRIPTED, call_at));
        assert_eq!(
            result.count(FindingCategory::Timing) == 0,
            allowed,
            "call at {call_at}"
        );
    }
}

#[test]
fn second_call_on_the_same_day_is_a_violation() {
    let request = ComplianceRequest::new(SCRIPTED, at(12, 15, 0))
        .with_recent_contacts(vec![call(12, 9)]);
    let result = check_compliance(&request);

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].category, FindingCategory::Frequency);
    assert!(result.warnings.is_empty());
    assert_eq!(result.score, 0.7);
}

#[test]
fn weekly_and_monthly_limits_warn() {
    let mut contacts: Vec<RecentContact> = (1..=7).map(|day| call(day, 10)).collect();
    contacts.push(call(10, 10));
    let request = ComplianceRequest::new(SCRIPTED, at(12, 15, 0)).with_recent_contacts(contacts);
    let result = check_compliance(&request);

    assert!(result.is_compliant);
    assert_eq!(result.count(FindingCategory::Frequency), 2);
    assert_eq!(result.score, 0.9);
}

#[test]
fn only_earlier_contacts_of_the_same_kind_count() {
    let contacts = vec![
        RecentContact {
            at: at(12, 9, 0),
            kind: ContactKind::Sms,
        },
        call(12, 18),
    ];
    let request = ComplianceRequest::new(SCRIPTED, at(12, 15, 0)).with_recent_contacts(contacts);
    let result = check_compliance(&request);

    assert_eq!(result.count(FindingCategory::Frequency), 0);
}

#[test]
fn sms_allows_two_per_day() {
    let sms = |hour| RecentContact {
        at: at(12, hour, 0),
        kind: ContactKind::Sms,
    };
    let text = SCRIPTED;
    let one = ComplianceRequest::new(text, at(12, 15, 0))
        .with_kind(ContactKind::Sms)
        .with_recent_contacts(vec![sms(9)]);
    assert!(check_compliance(&one).is_compliant);

    let two = one.clone().with_recent_contacts(vec![sms(9), sms(11)]);
    let result = check_compliance(&two);
    assert!(!result.is_compliant);
    assert_eq!(result.count(FindingCategory::Frequency), 1);
}

#[test]
fn custom_required_elements_replace_the_defaults() {
    let request = ComplianceRequest::new(SCRIPTED, at(12, 11, 0)).with_required_elements(vec![
        ScriptElement::Amount,
        ScriptElement::Deadline,
        ScriptElement::PaymentMethods,
    ]);
    let result = check_compliance(&request);

    assert_eq!(result.count(FindingCategory::ScriptDeviation), 3);

    let covered = format!(
        "{SCRIPTED} Сумма долга 15000 руб, срок оплаты до 20 числа, оплатить можно через приложение."
    );
    let request = ComplianceRequest::new(covered, at(12, 11, 0)).with_required_elements(vec![
        ScriptElement::Amount,
        ScriptElement::Deadline,
        ScriptElement::PaymentMethods,
    ]);
    assert_eq!(check_compliance(&request).score, 1.0);
}

#[test]
fn score_never_drops_below_zero() {
    assert_eq!(compliance_score(4, 0), 0.0);
    assert_eq!(compliance_score(3, 2), 0.0);
    assert_eq!(compliance_score(0, 3), 0.85);
}

#[test]
fn request_deserializes_with_defaults() {
    let request: ComplianceRequest = serde_json::from_str(
        r#"{"text": "Всего доброго", "call_datetime": "2025-03-12T10:00:00"}"#,
    )
    .expect("valid request");

    assert_eq!(request.contact_kind, ContactKind::Call);
    assert!(request.recent_contacts.is_empty());
    assert!(request.required_elements.is_none());

    let result = check_compliance(&request);
    assert_eq!(result.count(FindingCategory::ScriptDeviation), 2);
}

proptest! {
    #[test]
    fn compliance_tracks_violations(text in "\\PC{0,80}", hour in 0u32..24, day in 10u32..17) {
        let result = check_compliance(&ComplianceRequest::new(text, at(day, hour, 0)));

        prop_assert_eq!(result.is_compliant, result.violations.is_empty());
        prop_assert!((0.0..=1.0).contains(&result.score));
        prop_assert_eq!(
            result.score,
            compliance_score(result.violations.len(), result.warnings.len())
        );
    }
}
