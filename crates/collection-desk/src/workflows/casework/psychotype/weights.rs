use serde::{Deserialize, Serialize};

use crate::workflows::casework::domain::Psychotype;

/// Normalised behavioral signal in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    SmallOverdueDays,
    RandomPaymentPattern,
    RegularPayments,
    PartialPayments,
    NoPayments,
    HasIncome,
    LowIncome,
    LowDebtToIncome,
    HighDebtToIncome,
    AnswersCalls,
    IgnoresContacts,
    MakesPromises,
    NoPromises,
    RefusesContact,
    Aggression,
    NoConflict,
    NoContactHistory,
    KeepsPromises,
    PartialPromiseKept,
    Excuses,
    SelectivePayment,
    ExplainsSituation,
    AsksForRestructure,
    Threats,
    DisputesDebt,
    MultipleComplaints,
    ProactiveContact,
    ConstructiveDialog,
}

impl Indicator {
    /// Human-readable label used in explanations.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SmallOverdueDays => "Short overdue period",
            Self::RandomPaymentPattern => "Irregular payments",
            Self::RegularPayments => "Regular payments",
            Self::PartialPayments => "Makes partial payments",
            Self::NoPayments => "No payment history",
            Self::HasIncome => "Has income",
            Self::LowIncome => "Low income",
            Self::LowDebtToIncome => "Affordable debt load",
            Self::HighDebtToIncome => "High debt load",
            Self::AnswersCalls => "Answers calls",
            Self::IgnoresContacts => "Ignores contacts",
            Self::MakesPromises => "Makes promises",
            Self::NoPromises => "Avoids promises",
            Self::RefusesContact => "Refuses contact",
            Self::Aggression => "Aggressive behavior",
            Self::NoConflict => "No conflicts",
            Self::NoContactHistory => "No contact history",
            Self::KeepsPromises => "Keeps promises",
            Self::PartialPromiseKept => "Partially keeps promises",
            Self::Excuses => "Makes excuses",
            Self::SelectivePayment => "Pays selectively",
            Self::ExplainsSituation => "Explains situation",
            Self::AsksForRestructure => "Asks for restructuring",
            Self::Threats => "Threatens complaints",
            Self::DisputesDebt => "Disputes the debt",
            Self::MultipleComplaints => "Files multiple complaints",
            Self::ProactiveContact => "Reaches out proactively",
            Self::ConstructiveDialog => "Constructive dialog",
        }
    }
}

/// Indicator weights per psychotype. Each table sums to 1.0.
pub(crate) fn weight_table(psychotype: Psychotype) -> &'static [(Indicator, f64)] {
    use Indicator::*;

    match psychotype {
        Psychotype::Forgetful => &[
            (SmallOverdueDays, 0.25),
            (RandomPaymentPattern, 0.20),
            (AnswersCalls, 0.15),
            (MakesPromises, 0.15),
            (PartialPromiseKept, 0.15),
            (NoConflict, 0.10),
        ],
        Psychotype::Unwilling => &[
            (HasIncome, 0.25),
            (LowDebtToIncome, 0.20),
            (IgnoresContacts, 0.20),
            (NoPromises, 0.15),
            (Excuses, 0.10),
            (SelectivePayment, 0.10),
        ],
        Psychotype::Unable => &[
            (LowIncome, 0.20),
            (HighDebtToIncome, 0.25),
            (AnswersCalls, 0.15),
            (ExplainsSituation, 0.15),
            (AsksForRestructure, 0.15),
            (PartialPayments, 0.10),
        ],
        Psychotype::Toxic => &[
            (Aggression, 0.30),
            (Threats, 0.25),
            (RefusesContact, 0.15),
            (DisputesDebt, 0.15),
            (MultipleComplaints, 0.15),
        ],
        Psychotype::Cooperative => &[
            (AnswersCalls, 0.20),
            (KeepsPromises, 0.25),
            (ProactiveContact, 0.20),
            (RegularPayments, 0.20),
            (ConstructiveDialog, 0.15),
        ],
    }
}
