//! Immutable entity snapshots shared by every workflow.
//!
//! Enumerations parsed from storage are lenient: an unrecognised value falls
//! back to the variant carrying the lowest scoring weight instead of failing.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a collection operator.
    OperatorId
);
numeric_id!(
    /// Identifier of a credit agreement.
    CreditId
);
numeric_id!(
    /// Identifier of a borrower.
    ClientId
);

/// Seniority bucket of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum OperatorRole {
    Operator,
    SeniorOperator,
    Supervisor,
    Manager,
}

impl OperatorRole {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "senior_operator" | "senior" => Self::SeniorOperator,
            "supervisor" => Self::Supervisor,
            "manager" => Self::Manager,
            _ => Self::Operator,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::SeniorOperator => "senior_operator",
            Self::Supervisor => "supervisor",
            Self::Manager => "manager",
        }
    }
}

impl From<String> for OperatorRole {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Presence state of an operator on the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum OperatorStatus {
    Active,
    OnCall,
    Break,
    Offline,
}

impl OperatorStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "on_call" => Self::OnCall,
            "break" => Self::Break,
            _ => Self::Offline,
        }
    }

    /// Operators on a break or a call still receive work for the day.
    pub const fn is_dispatchable(self) -> bool {
        !matches!(self, Self::Offline)
    }
}

impl From<String> for OperatorStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Outcome recorded for a single operator-client interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum InterventionStatus {
    Completed,
    NoAnswer,
    Promise,
    Refuse,
    Callback,
}

impl InterventionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "no_answer" => Self::NoAnswer,
            "promise" => Self::Promise,
            "refuse" => Self::Refuse,
            _ => Self::Callback,
        }
    }

    pub const fn is_successful(self) -> bool {
        matches!(self, Self::Promise | Self::Completed)
    }

    pub const fn is_failed_contact(self) -> bool {
        matches!(self, Self::NoAnswer | Self::Refuse)
    }
}

impl From<String> for InterventionStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Aggregated intervention outcomes for an operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionTally {
    pub total: u32,
    pub successful: u32,
}

impl InterventionTally {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = InterventionStatus>,
    {
        statuses
            .into_iter()
            .fold(Self::default(), |mut tally, status| {
                tally.total += 1;
                if status.is_successful() {
                    tally.successful += 1;
                }
                tally
            })
    }

    /// Share of successful interventions, `None` while the operator has no history.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(f64::from(self.successful.min(self.total)) / f64::from(self.total))
        }
    }
}

/// Point-in-time view of an operator used for scoring and matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorSnapshot {
    pub id: OperatorId,
    pub full_name: String,
    pub role: OperatorRole,
    pub status: OperatorStatus,
    pub hire_date: Option<NaiveDate>,
    pub current_load: u32,
    pub interventions: InterventionTally,
}

/// Lifecycle state of a credit agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum CreditStatus {
    Active,
    Closed,
    Overdue,
    Default,
    Restructured,
}

impl CreditStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "closed" => Self::Closed,
            "overdue" => Self::Overdue,
            "default" => Self::Default,
            "restructured" => Self::Restructured,
            _ => Self::Active,
        }
    }

    pub const fn is_delinquent(self) -> bool {
        matches!(self, Self::Overdue | Self::Default)
    }
}

impl From<String> for CreditStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Coarse default-risk bucket produced by the scoring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RiskSegment {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskSegment {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Low,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl From<String> for RiskSegment {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Latest ledger balances of a credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditState {
    pub state_date: NaiveDate,
    pub principal_debt: Decimal,
    pub overdue_principal: Decimal,
}

/// Point-in-time view of a credit with its latest state and scoring attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSnapshot {
    pub id: CreditId,
    pub client_id: ClientId,
    pub debtor_name: String,
    pub status: CreditStatus,
    pub monthly_payment: Decimal,
    pub latest_state: Option<CreditState>,
    pub risk_segment: Option<RiskSegment>,
    pub failed_contacts: u32,
    /// Ledger overdue length when the payment schedule is known.
    #[serde(default)]
    pub overdue_days: Option<u32>,
}

/// Ceiling applied to the overdue-days heuristic.
pub const MAX_ESTIMATED_OVERDUE_DAYS: u32 = 180;

impl CreditSnapshot {
    pub fn overdue_principal(&self) -> Decimal {
        self.latest_state
            .as_ref()
            .map(|state| state.overdue_principal.max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn principal_debt(&self) -> Decimal {
        self.latest_state
            .as_ref()
            .map(|state| state.principal_debt.max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO)
    }

    /// Overdue length approximated from how many monthly payments the overdue
    /// principal covers. Only delinquent credits are considered overdue.
    pub fn estimated_days_overdue(&self) -> u32 {
        if !self.status.is_delinquent() {
            return 0;
        }

        let monthly = money_to_f64(self.monthly_payment).max(1.0);
        let days = (money_to_f64(self.overdue_principal()) / monthly * 30.0).floor();
        if days.is_finite() && days > 0.0 {
            days.min(f64::from(MAX_ESTIMATED_OVERDUE_DAYS)) as u32
        } else {
            0
        }
    }

    /// Ledger overdue days when known, otherwise the heuristic estimate.
    pub fn overdue_days(&self) -> u32 {
        self.overdue_days
            .unwrap_or_else(|| self.estimated_days_overdue())
    }
}

/// Employment situation declared by a borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Employment {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
    Student,
    Unknown,
}

impl Employment {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "employed" => Self::Employed,
            "self_employed" | "business_owner" | "freelance" => Self::SelfEmployed,
            "unemployed" => Self::Unemployed,
            "retired" => Self::Retired,
            "student" => Self::Student,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for Employment {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

pub(crate) fn money_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

pub(crate) fn money_from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Round a score or probability to `places` decimal places.
pub(crate) fn round_places(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
