use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::weights::Indicator;
use crate::domain::{money_to_f64, ClientId, InterventionStatus};
use crate::workflows::casework::domain::{
    ContactPreferences, ContactRecord, PaymentRecord, PromiseRecord,
};

const LOW_INCOME_THRESHOLD: f64 = 30_000.0;
const MODEST_INCOME_THRESHOLD: f64 = 50_000.0;

/// Observed indicator values. Absent indicators are unknown, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSet {
    values: BTreeMap<Indicator, f64>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value, clamped into `[0, 1]`. Non-finite values are ignored.
    pub fn insert(&mut self, indicator: Indicator, value: f64) {
        if value.is_finite() {
            self.values.insert(indicator, value.clamp(0.0, 1.0));
        }
    }

    pub fn with(mut self, indicator: Indicator, value: f64) -> Self {
        self.insert(indicator, value);
        self
    }

    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.values.get(&indicator).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        self.values.iter().map(|(indicator, value)| (*indicator, *value))
    }

    /// Overlay `other` on top of `self`; values in `other` win.
    pub fn merge(&mut self, other: &IndicatorSet) {
        for (indicator, value) in other.iter() {
            self.insert(indicator, value);
        }
    }

    /// Derive indicators from raw payment, contact, and promise history.
    pub fn from_evidence(evidence: &BehaviorEvidence) -> Self {
        let mut set = Self::new();
        set.add_payment_signals(&evidence.payments);
        set.add_income_signals(evidence.monthly_income, evidence.total_debt);
        set.add_contact_signals(&evidence.contacts);
        set.add_promise_signals(&evidence.promises);

        let small_overdue = match evidence.overdue_days {
            0..=14 => 1.0,
            15..=30 => 0.5,
            _ => 0.0,
        };
        set.insert(Indicator::SmallOverdueDays, small_overdue);

        set.merge(&evidence.observed);
        set
    }

    fn add_payment_signals(&mut self, payments: &[PaymentRecord]) {
        let Some(on_time) = on_time_ratio(payments) else {
            self.insert(Indicator::NoPayments, 1.0);
            return;
        };

        self.insert(Indicator::RegularPayments, on_time);
        let random = if on_time < 0.7 { 1.0 - on_time } else { 0.0 };
        self.insert(Indicator::RandomPaymentPattern, random);

        let partial = payments.iter().filter(|payment| payment.is_partial()).count();
        self.insert(
            Indicator::PartialPayments,
            partial as f64 / payments.len() as f64,
        );
    }

    fn add_income_signals(&mut self, income: Option<Decimal>, total_debt: Decimal) {
        let income = income.map(money_to_f64).unwrap_or(0.0);
        if income > 0.0 {
            let ratio = money_to_f64(total_debt) / income;
            self.insert(Indicator::HighDebtToIncome, (ratio / 6.0).min(1.0));
            self.insert(Indicator::LowDebtToIncome, (1.0 - ratio / 3.0).max(0.0));
            self.insert(Indicator::HasIncome, 1.0);
            let low_income = if income < LOW_INCOME_THRESHOLD {
                1.0
            } else if income < MODEST_INCOME_THRESHOLD {
                0.5
            } else {
                0.0
            };
            self.insert(Indicator::LowIncome, low_income);
        } else {
            self.insert(Indicator::LowIncome, 0.8);
            self.insert(Indicator::HighDebtToIncome, 0.8);
        }
    }

    fn add_contact_signals(&mut self, contacts: &[ContactRecord]) {
        if contacts.is_empty() {
            self.insert(Indicator::NoContactHistory, 1.0);
            return;
        }

        let answered = share(contacts, |contact| {
            contact.result != InterventionStatus::NoAnswer
        });
        let promises = share(contacts, |contact| contact.result == InterventionStatus::Promise);
        let refusals = share(contacts, |contact| contact.result == InterventionStatus::Refuse);
        let aggression = share(contacts, |contact| contact.aggression_detected);

        self.insert(Indicator::AnswersCalls, answered);
        self.insert(Indicator::IgnoresContacts, 1.0 - answered);
        self.insert(Indicator::MakesPromises, promises);
        self.insert(Indicator::NoPromises, 1.0 - promises);
        self.insert(Indicator::RefusesContact, refusals);
        self.insert(Indicator::Aggression, aggression);
        self.insert(
            Indicator::NoConflict,
            (1.0 - aggression - refusals / 2.0).max(0.0),
        );
    }

    fn add_promise_signals(&mut self, promises: &[PromiseRecord]) {
        if promises.is_empty() {
            return;
        }
        let total = promises.len() as f64;
        let kept = promises.iter().filter(|promise| promise.kept).count() as f64;
        let partial = promises.iter().filter(|promise| promise.partial).count() as f64;
        self.insert(Indicator::KeepsPromises, kept / total);
        self.insert(Indicator::PartialPromiseKept, partial / total);
    }
}

impl FromIterator<(Indicator, f64)> for IndicatorSet {
    fn from_iter<T: IntoIterator<Item = (Indicator, f64)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (indicator, value) in iter {
            set.insert(indicator, value);
        }
        set
    }
}

/// Raw history a behavior profile is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvidence {
    pub client_id: ClientId,
    #[serde(default)]
    pub monthly_income: Option<Decimal>,
    #[serde(default)]
    pub total_debt: Decimal,
    #[serde(default)]
    pub overdue_days: u32,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub contacts: Vec<ContactRecord>,
    #[serde(default)]
    pub promises: Vec<PromiseRecord>,
    #[serde(default)]
    pub preferences: ContactPreferences,
    /// Signals captured by operators or conversation analysis, such as excuses
    /// or restructuring requests. These override derived values.
    #[serde(default)]
    pub observed: IndicatorSet,
}

impl BehaviorEvidence {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            monthly_income: None,
            total_debt: Decimal::ZERO,
            overdue_days: 0,
            payments: Vec::new(),
            contacts: Vec::new(),
            promises: Vec::new(),
            preferences: ContactPreferences::default(),
            observed: IndicatorSet::new(),
        }
    }

    pub fn on_time_payment_ratio(&self) -> Option<f64> {
        on_time_ratio(&self.payments)
    }

    pub fn promises_kept_ratio(&self) -> Option<f64> {
        if self.promises.is_empty() {
            return None;
        }
        let kept = self.promises.iter().filter(|promise| promise.kept).count();
        Some(kept as f64 / self.promises.len() as f64)
    }

    /// Share of contacts the client picked up.
    pub fn contact_rate(&self) -> Option<f64> {
        if self.contacts.is_empty() {
            return None;
        }
        Some(share(&self.contacts, |contact| {
            contact.result != InterventionStatus::NoAnswer
        }))
    }
}

fn share<F>(contacts: &[ContactRecord], predicate: F) -> f64
where
    F: Fn(&ContactRecord) -> bool,
{
    let matching = contacts.iter().filter(|contact| predicate(contact)).count();
    matching as f64 / contacts.len() as f64
}

fn on_time_ratio(payments: &[PaymentRecord]) -> Option<f64> {
    if payments.is_empty() {
        return None;
    }
    let on_time = payments.iter().filter(|payment| payment.is_on_time()).count();
    Some(on_time as f64 / payments.len() as f64)
}
