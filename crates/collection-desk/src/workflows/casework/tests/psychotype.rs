use proptest::prelude::*;
use rust_decimal::Decimal;

use super::common::*;
use crate::domain::{ClientId, InterventionStatus};
use crate::workflows::casework::domain::{Channel, PromiseRecord, Psychotype};
use crate::workflows::casework::psychotype::{
    classify_psychotype, score_psychotypes, BehaviorEvidence, Indicator, IndicatorSet,
};

#[test]
fn reliable_payer_is_cooperative() {
    let mut evidence = BehaviorEvidence::new(ClientId(70));
    evidence.monthly_income = Some(Decimal::from(80_000));
    evidence.total_debt = Decimal::from(100_000);
    evidence.overdue_days = 40;
    evidence.payments = vec![payment(10_000, 10_000, 0), payment(10_000, 10_000, 1)];
    evidence.contacts = vec![contact(Channel::Phone, InterventionStatus::Completed); 4];
    evidence.promises = vec![
        PromiseRecord {
            kept: true,
            partial: false
        };
        4
    ];
    evidence.observed = IndicatorSet::new()
        .with(Indicator::ProactiveContact, 1.0)
        .with(Indicator::ConstructiveDialog, 1.0);

    let profile = classify_psychotype(&evidence);

    assert_eq!(profile.psychotype, Psychotype::Cooperative);
    assert_eq!(profile.confidence, 1.0);
    assert_eq!(
        profile.factors,
        vec!["Answers calls", "Keeps promises", "Reaches out proactively"]
    );
    assert_eq!(profile.promises_kept_ratio, Some(1.0));
    assert_eq!(profile.contact_rate, Some(1.0));
    assert_eq!(profile.on_time_payment_ratio, Some(1.0));
    assert_eq!(
        profile.recommended_approach,
        Psychotype::Cooperative.recommended_approach()
    );
}

#[test]
fn overloaded_partial_payer_is_unable() {
    let mut evidence = BehaviorEvidence::new(ClientId(70));
    evidence.monthly_income = Some(Decimal::from(20_000));
    evidence.total_debt = Decimal::from(200_000);
    evidence.overdue_days = 45;
    evidence.payments = vec![payment(1_000, 5_000, 10), payment(1_000, 5_000, 12)];
    evidence.contacts = vec![contact(Channel::Phone, InterventionStatus::Promise); 2];
    evidence.promises = vec![PromiseRecord::default(); 2];
    evidence.observed = IndicatorSet::new()
        .with(Indicator::AsksForRestructure, 1.0)
        .with(Indicator::ExplainsSituation, 1.0);

    let profile = classify_psychotype(&evidence);

    assert_eq!(profile.psychotype, Psychotype::Unable);
    assert_eq!(profile.confidence, 1.0);
    assert_eq!(
        profile.factors,
        vec!["Low income", "High debt load", "Answers calls"]
    );
    assert_eq!(profile.promises_kept_ratio, Some(0.0));
    assert_eq!(profile.on_time_payment_ratio, Some(0.0));
}

#[test]
fn aggressive_refuser_is_toxic_and_wins_ties_over_cooperative() {
    let mut evidence = BehaviorEvidence::new(ClientId(70));
    evidence.overdue_days = 100;
    let mut hostile = contact(Channel::Phone, InterventionStatus::Refuse);
    hostile.aggression_detected = true;
    evidence.contacts = vec![hostile; 3];
    evidence.observed = IndicatorSet::new().with(Indicator::Threats, 1.0);

    let profile = classify_psychotype(&evidence);

    let cooperative = profile
        .scores
        .iter()
        .find(|score| score.psychotype == Psychotype::Cooperative)
        .expect("cooperative scored");
    assert_eq!(cooperative.score, 1.0);
    assert_eq!(profile.psychotype, Psychotype::Toxic);
    assert_eq!(profile.confidence, 1.0);
}

#[test]
fn missing_indicators_are_excluded_rather_than_zero() {
    let only_answers = IndicatorSet::new().with(Indicator::AnswersCalls, 1.0);
    let assessment = score_psychotypes(&only_answers);

    assert_eq!(assessment.psychotype, Psychotype::Forgetful);
    assert_eq!(assessment.confidence, 1.0);
    let unwilling = assessment
        .scores
        .iter()
        .find(|score| score.psychotype == Psychotype::Unwilling)
        .expect("unwilling scored");
    assert_eq!(unwilling.score, 0.0);
}

#[test]
fn empty_indicators_default_to_first_psychotype() {
    let assessment = score_psychotypes(&IndicatorSet::new());
    assert_eq!(assessment.psychotype, Psychotype::Forgetful);
    assert_eq!(assessment.confidence, 0.0);
    assert!(assessment.factors.is_empty());
    assert_eq!(assessment.scores.len(), 5);
}

#[test]
fn factors_keep_only_strong_signals() {
    let indicators = IndicatorSet::new()
        .with(Indicator::SmallOverdueDays, 0.5)
        .with(Indicator::AnswersCalls, 0.2)
        .with(Indicator::MakesPromises, 0.9);
    let assessment = score_psychotypes(&indicators);

    assert_eq!(assessment.psychotype, Psychotype::Forgetful);
    assert_eq!(
        assessment.factors,
        vec!["Makes promises", "Short overdue period"]
    );
}

#[test]
fn no_history_marks_absence_and_assumes_worst_affordability() {
    let evidence = BehaviorEvidence::new(ClientId(70));
    let indicators = IndicatorSet::from_evidence(&evidence);

    assert_eq!(indicators.get(Indicator::NoPayments), Some(1.0));
    assert_eq!(indicators.get(Indicator::NoContactHistory), Some(1.0));
    assert_eq!(indicators.get(Indicator::LowIncome), Some(0.8));
    assert_eq!(indicators.get(Indicator::HighDebtToIncome), Some(0.8));
    assert_eq!(indicators.get(Indicator::SmallOverdueDays), Some(1.0));
    assert_eq!(indicators.get(Indicator::AnswersCalls), None);
    assert_eq!(indicators.get(Indicator::KeepsPromises), None);
}

#[test]
fn indicator_values_are_clamped() {
    let indicators = IndicatorSet::new()
        .with(Indicator::Aggression, 3.0)
        .with(Indicator::Threats, -1.0)
        .with(Indicator::Excuses, f64::NAN);
    assert_eq!(indicators.get(Indicator::Aggression), Some(1.0));
    assert_eq!(indicators.get(Indicator::Threats), Some(0.0));
    assert_eq!(indicators.get(Indicator::Excuses), None);
}

const SAMPLED: [Indicator; 10] = [
    Indicator::SmallOverdueDays,
    Indicator::AnswersCalls,
    Indicator::HasIncome,
    Indicator::HighDebtToIncome,
    Indicator::Aggression,
    Indicator::KeepsPromises,
    Indicator::RegularPayments,
    Indicator::IgnoresContacts,
    Indicator::PartialPayments,
    Indicator::Threats,
];

proptest! {
    #[test]
    fn scores_and_confidence_stay_in_unit_interval(
        values in proptest::collection::vec((0usize..SAMPLED.len(), -2.0f64..3.0), 0..12),
    ) {
        let indicators: IndicatorSet = values
            .into_iter()
            .map(|(index, value)| (SAMPLED[index], value))
            .collect();
        let assessment = score_psychotypes(&indicators);

        prop_assert!((0.0..=1.0).contains(&assessment.confidence));
        for score in &assessment.scores {
            prop_assert!((0.0..=1.0).contains(&score.score));
        }
    }
}
