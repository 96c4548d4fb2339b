use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::engine::Assignment;
use crate::domain::OperatorId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityCount {
    pub priority: u8,
    pub assignments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorWorkload {
    pub operator_id: OperatorId,
    pub assignments: usize,
    pub total_overdue: Decimal,
}

/// Aggregate view of one day's assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub date: NaiveDate,
    pub total_assignments: usize,
    /// Highest priority first.
    pub by_priority: Vec<PriorityCount>,
    /// Ordered by operator id.
    pub by_operator: Vec<OperatorWorkload>,
}

impl DistributionStats {
    /// Summarise the assignments dated `date`; assignments for other dates are ignored.
    pub fn from_assignments(date: NaiveDate, assignments: &[Assignment]) -> Self {
        let mut by_priority: BTreeMap<u8, usize> = BTreeMap::new();
        let mut by_operator: BTreeMap<OperatorId, (usize, Decimal)> = BTreeMap::new();

        let todays = assignments
            .iter()
            .filter(|assignment| assignment.assignment_date == date);
        let mut total_assignments = 0;
        for assignment in todays {
            total_assignments += 1;
            *by_priority.entry(assignment.priority).or_default() += 1;
            let entry = by_operator
                .entry(assignment.operator_id)
                .or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += assignment.overdue_amount;
        }

        Self {
            date,
            total_assignments,
            by_priority: by_priority
                .into_iter()
                .rev()
                .map(|(priority, assignments)| PriorityCount {
                    priority,
                    assignments,
                })
                .collect(),
            by_operator: by_operator
                .into_iter()
                .map(|(operator_id, (assignments, total_overdue))| OperatorWorkload {
                    operator_id,
                    assignments,
                    total_overdue: total_overdue.round_dp(2),
                })
                .collect(),
        }
    }
}
