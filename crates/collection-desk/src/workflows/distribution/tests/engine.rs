use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::common::*;
use crate::config::DistributionConfig;
use crate::domain::{CreditId, CreditStatus, OperatorId, OperatorRole, RiskSegment};
use crate::workflows::distribution::{distribute, EmptyDistribution, PriorityTier};

#[test]
fn ten_credits_three_operators_cap_two_assigns_six() {
    let outcome = distribute(
        &three_operators(0),
        &mixed_book(),
        &DistributionConfig::with_max_load(2),
        run_date(),
    );

    assert_eq!(outcome.assigned_count(), 6);
    assert_eq!(outcome.skipped_count(), 4);
    assert!(outcome.empty.is_none());

    let mut per_operator: BTreeMap<OperatorId, u32> = BTreeMap::new();
    for assignment in &outcome.assignments {
        *per_operator.entry(assignment.operator_id).or_default() += 1;
    }
    assert!(per_operator.values().all(|count| *count <= 2));
}

#[test]
fn high_tier_goes_to_most_experienced_operator() {
    let outcome = distribute(
        &three_operators(0),
        &mixed_book(),
        &DistributionConfig::with_max_load(10),
        run_date(),
    );

    let high: Vec<_> = outcome
        .assignments
        .iter()
        .filter(|assignment| assignment.tier == PriorityTier::High)
        .collect();
    assert_eq!(high.len(), 3);
    assert!(high
        .iter()
        .all(|assignment| assignment.operator_id == OperatorId(1) && assignment.priority == 5));
    let credit_ids: Vec<CreditId> = high.iter().map(|assignment| assignment.credit_id).collect();
    assert_eq!(credit_ids, vec![CreditId(1), CreditId(2), CreditId(3)]);

    let medium_operators: Vec<OperatorId> = outcome
        .assignments
        .iter()
        .filter(|assignment| assignment.tier == PriorityTier::Medium)
        .map(|assignment| assignment.operator_id)
        .collect();
    assert_eq!(medium_operators, vec![OperatorId(2); 4]);
}

#[test]
fn low_tier_balances_on_lowest_load_then_id() {
    let operators = vec![
        operator(1, OperatorRole::Manager, 6, 5),
        operator(2, OperatorRole::SeniorOperator, 3, 1),
        operator(3, OperatorRole::Operator, 0, 1),
    ];
    let config = DistributionConfig {
        max_load: 10,
        high_tier_percent: 0,
        medium_tier_percent: 0,
    };
    let outcome = distribute(&operators, &mixed_book()[5..], &config, run_date());

    let picked: Vec<OperatorId> = outcome
        .assignments
        .iter()
        .map(|assignment| assignment.operator_id)
        .collect();
    assert_eq!(
        picked,
        vec![
            OperatorId(2),
            OperatorId(3),
            OperatorId(2),
            OperatorId(3),
            OperatorId(2)
        ]
    );
    assert!(outcome
        .assignments
        .iter()
        .all(|assignment| assignment.priority == 1));
}

#[test]
fn closed_credits_are_not_distributed() {
    let mut credits = mixed_book();
    credits[0].status = CreditStatus::Closed;
    let outcome = distribute(
        &three_operators(0),
        &credits,
        &DistributionConfig::default(),
        run_date(),
    );

    assert_eq!(outcome.ineligible, vec![CreditId(1)]);
    assert!(outcome
        .assignments
        .iter()
        .all(|assignment| assignment.credit_id != CreditId(1)));
    assert_eq!(outcome.assigned_count(), 9);
}

#[test]
fn only_delinquent_credits_are_ranked() {
    let mut credits = mixed_book();
    credits[1].status = CreditStatus::Active;
    credits[6].status = CreditStatus::Restructured;
    let outcome = distribute(
        &three_operators(0),
        &credits,
        &DistributionConfig::default(),
        run_date(),
    );

    assert_eq!(outcome.ineligible, vec![CreditId(2), CreditId(7)]);
    assert_eq!(outcome.assigned_count(), 8);
    assert!(outcome.assignments.iter().all(|assignment| {
        assignment.credit_id != CreditId(2) && assignment.credit_id != CreditId(7)
    }));

    let none_delinquent: Vec<_> = mixed_book()
        .into_iter()
        .map(|mut credit| {
            credit.status = CreditStatus::Active;
            credit
        })
        .collect();
    let idle = distribute(
        &three_operators(0),
        &none_delinquent,
        &DistributionConfig::default(),
        run_date(),
    );
    assert_eq!(idle.empty, Some(EmptyDistribution::NoEligibleCredits));
    assert_eq!(idle.ineligible.len(), 10);
}

#[test]
fn empty_inputs_are_reported_distinctly_from_capacity_skips() {
    let no_operators = distribute(&[], &mixed_book(), &DistributionConfig::default(), run_date());
    assert_eq!(no_operators.empty, Some(EmptyDistribution::NoOperators));
    assert!(no_operators.assignments.is_empty());
    assert_eq!(no_operators.skipped_count(), 0);

    let no_credits = distribute(
        &three_operators(0),
        &[],
        &DistributionConfig::default(),
        run_date(),
    );
    assert_eq!(no_credits.empty, Some(EmptyDistribution::NoEligibleCredits));
    assert_eq!(no_credits.loads.len(), 3);

    let saturated = distribute(
        &three_operators(2),
        &mixed_book(),
        &DistributionConfig::with_max_load(2),
        run_date(),
    );
    assert!(saturated.empty.is_none());
    assert_eq!(saturated.skipped_count(), 10);
}

#[test]
fn assignment_carries_rounded_amount_and_loads_are_reported() {
    let mut credits = vec![credit(
        7,
        CreditStatus::Overdue,
        0,
        10_000,
        Some(RiskSegment::Medium),
        1,
    )];
    if let Some(state) = credits[0].latest_state.as_mut() {
        state.overdue_principal = Decimal::new(1_234_567, 3);
    }
    let outcome = distribute(
        &three_operators(0),
        &credits,
        &DistributionConfig::default(),
        run_date(),
    );

    let assignment = &outcome.assignments[0];
    assert_eq!(assignment.overdue_amount, Decimal::new(123_457, 2));
    assert_eq!(assignment.overdue_days, 3);
    assert_eq!(assignment.assignment_date, run_date());

    let changed: Vec<_> = outcome.changed_loads().collect();
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].operator_id, OperatorId(1));
    assert_eq!(changed[0].assigned(), 1);
}

proptest! {
    #[test]
    fn loads_never_exceed_cap_and_runs_are_deterministic(
        loads in proptest::collection::vec(0u32..6, 0..7),
        amounts in proptest::collection::vec((0i64..900_000, 0u32..8), 0..25),
        max_load in 1u32..6,
    ) {
        let operators: Vec<_> = loads
            .iter()
            .enumerate()
            .map(|(index, load)| operator(index as u64 + 1, OperatorRole::Operator, index as i64, *load))
            .collect();
        let credits: Vec<_> = amounts
            .iter()
            .enumerate()
            .map(|(index, (amount, failed))| {
                credit(index as u64 + 1, CreditStatus::Overdue, *amount, 20_000, None, *failed)
            })
            .collect();
        let config = DistributionConfig::with_max_load(max_load);

        let first = distribute(&operators, &credits, &config, run_date());
        let second = distribute(&operators, &credits, &config, run_date());
        prop_assert_eq!(&first, &second);

        for snapshot in &operators {
            let assigned = first
                .assignments
                .iter()
                .filter(|assignment| assignment.operator_id == snapshot.id)
                .count() as u32;
            if assigned > 0 {
                prop_assert!(snapshot.current_load + assigned <= max_load);
            }
        }
        prop_assert_eq!(
            first.assigned_count() + first.skipped_count(),
            if operators.is_empty() { 0 } else { credits.len() }
        );
    }
}
