use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::scoring::{score_operator, score_priority, ExperienceScore, PriorityScore};
use super::tiers::{credit_bands, operator_pools, PriorityTier};
use crate::config::DistributionConfig;
use crate::domain::{
    ClientId, CreditId, CreditSnapshot, OperatorId, OperatorSnapshot,
};

/// A credit handed to an operator for the assignment date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub operator_id: OperatorId,
    pub credit_id: CreditId,
    pub client_id: ClientId,
    pub debtor_name: String,
    pub overdue_amount: Decimal,
    pub overdue_days: u32,
    pub priority: u8,
    pub tier: PriorityTier,
    pub priority_score: f64,
    pub assignment_date: NaiveDate,
}

/// Load of one operator before and after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorLoad {
    pub operator_id: OperatorId,
    pub initial_load: u32,
    pub final_load: u32,
}

impl OperatorLoad {
    pub fn assigned(&self) -> u32 {
        self.final_load.saturating_sub(self.initial_load)
    }
}

/// Why a run produced nothing, as opposed to running out of capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDistribution {
    NoOperators,
    NoEligibleCredits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionOutcome {
    pub assignment_date: NaiveDate,
    pub assignments: Vec<Assignment>,
    pub skipped_for_capacity: Vec<CreditId>,
    /// Credits that are not overdue or in default, left out of ranking.
    pub ineligible: Vec<CreditId>,
    pub loads: Vec<OperatorLoad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<EmptyDistribution>,
}

impl DistributionOutcome {
    fn empty(
        assignment_date: NaiveDate,
        reason: EmptyDistribution,
        ineligible: Vec<CreditId>,
        loads: Vec<OperatorLoad>,
    ) -> Self {
        Self {
            assignment_date,
            assignments: Vec::new(),
            skipped_for_capacity: Vec::new(),
            ineligible,
            loads,
            empty: Some(reason),
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_for_capacity.len()
    }

    /// Operators whose load changed during the run.
    pub fn changed_loads(&self) -> impl Iterator<Item = &OperatorLoad> {
        self.loads.iter().filter(|load| load.final_load != load.initial_load)
    }
}

/// Tiered greedy matcher of ranked credits to ranked operators.
#[derive(Debug, Clone)]
pub struct DistributionEngine {
    config: DistributionConfig,
}

impl DistributionEngine {
    pub fn new(config: DistributionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    pub fn run(
        &self,
        operators: &[OperatorSnapshot],
        credits: &[CreditSnapshot],
        assignment_date: NaiveDate,
    ) -> DistributionOutcome {
        let (eligible, ineligible): (Vec<&CreditSnapshot>, Vec<&CreditSnapshot>) = credits
            .iter()
            .partition(|credit| credit.status.is_delinquent());
        let ineligible: Vec<CreditId> = ineligible.iter().map(|credit| credit.id).collect();

        let mut loads: BTreeMap<OperatorId, u32> = BTreeMap::new();
        for operator in operators {
            loads.entry(operator.id).or_insert(operator.current_load);
        }
        let initial = loads.clone();

        if operators.is_empty() {
            info!(credits = credits.len(), "distribution skipped: no operators");
            return DistributionOutcome::empty(
                assignment_date,
                EmptyDistribution::NoOperators,
                ineligible,
                Vec::new(),
            );
        }
        if eligible.is_empty() {
            info!(
                operators = operators.len(),
                "distribution skipped: no eligible credits"
            );
            return DistributionOutcome::empty(
                assignment_date,
                EmptyDistribution::NoEligibleCredits,
                ineligible,
                collect_loads(&initial, &loads),
            );
        }

        let ranked_credits = rank_credits(&eligible);
        let ranked_operators = rank_operators(operators, assignment_date);

        let bands = credit_bands(ranked_credits.len(), &self.config);
        let pools = operator_pools(ranked_operators.len());

        let mut assignments = Vec::with_capacity(ranked_credits.len());
        let mut skipped_for_capacity = Vec::new();

        for tier in PriorityTier::ALL {
            let pool = &ranked_operators[pools.range(tier)];
            for (score, credit) in &ranked_credits[bands.range(tier)] {
                match self.least_loaded(pool, &loads) {
                    Some(operator_id) => {
                        if let Some(load) = loads.get_mut(&operator_id) {
                            *load += 1;
                        }
                        assignments.push(Assignment {
                            operator_id,
                            credit_id: credit.id,
                            client_id: credit.client_id,
                            debtor_name: credit.debtor_name.clone(),
                            overdue_amount: score.overdue_amount.round_dp(2),
                            overdue_days: credit.overdue_days(),
                            priority: tier.base_priority(),
                            tier,
                            priority_score: score.total,
                            assignment_date,
                        });
                    }
                    None => {
                        debug!(
                            credit_id = %credit.id,
                            tier = tier.label(),
                            "no operator capacity left in tier pool"
                        );
                        skipped_for_capacity.push(credit.id);
                    }
                }
            }
        }

        info!(
            date = %assignment_date,
            assigned = assignments.len(),
            skipped = skipped_for_capacity.len(),
            ineligible = ineligible.len(),
            operators = ranked_operators.len(),
            "distribution run complete"
        );

        DistributionOutcome {
            assignment_date,
            assignments,
            skipped_for_capacity,
            ineligible,
            loads: collect_loads(&initial, &loads),
            empty: None,
        }
    }

    fn least_loaded(
        &self,
        pool: &[(ExperienceScore, &OperatorSnapshot)],
        loads: &BTreeMap<OperatorId, u32>,
    ) -> Option<OperatorId> {
        pool.iter()
            .filter_map(|(_, operator)| {
                let load = loads.get(&operator.id).copied()?;
                (load < self.config.max_load).then_some((load, operator.id))
            })
            .min()
            .map(|(_, operator_id)| operator_id)
    }
}

fn rank_credits<'a>(credits: &[&'a CreditSnapshot]) -> Vec<(PriorityScore, &'a CreditSnapshot)> {
    let mut ranked: Vec<(PriorityScore, &CreditSnapshot)> = credits
        .iter()
        .map(|credit| (score_priority(credit), *credit))
        .collect();
    ranked.sort_by(|(left, _), (right, _)| {
        descending(left.total, right.total).then_with(|| left.credit_id.cmp(&right.credit_id))
    });
    ranked
}

fn rank_operators(
    operators: &[OperatorSnapshot],
    today: NaiveDate,
) -> Vec<(ExperienceScore, &OperatorSnapshot)> {
    let mut ranked: Vec<(ExperienceScore, &OperatorSnapshot)> = operators
        .iter()
        .map(|operator| (score_operator(operator, today), operator))
        .collect();
    ranked.sort_by(|(left, _), (right, _)| {
        descending(left.total, right.total)
            .then_with(|| left.operator_id.cmp(&right.operator_id))
    });
    ranked
}

fn descending(left: f64, right: f64) -> Ordering {
    right.total_cmp(&left)
}

fn collect_loads(
    initial: &BTreeMap<OperatorId, u32>,
    current: &BTreeMap<OperatorId, u32>,
) -> Vec<OperatorLoad> {
    initial
        .iter()
        .map(|(operator_id, initial_load)| OperatorLoad {
            operator_id: *operator_id,
            initial_load: *initial_load,
            final_load: current.get(operator_id).copied().unwrap_or(*initial_load),
        })
        .collect()
}
