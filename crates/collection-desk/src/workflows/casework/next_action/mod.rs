//! Next-best-action: when to contact a debtor, over which channel, with
//! which script, and what to offer. The four decisions are independent and
//! combined into one recommendation.

mod channel;
mod offer;
mod scenario;
mod timing;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{Channel, ContactPreferences, ContactRecord, Offer, Psychotype, Scenario};
use super::psychotype::BehaviorProfile;
use crate::domain::{round_places, ClientId, CreditId, CreditSnapshot, RiskSegment};

const FAILED_CHANNEL_WINDOW: usize = 3;
const NEUTRAL_PROMISES_KEPT: f64 = 0.5;
const BASELINE_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NbaRecommendation {
    pub client_id: ClientId,
    pub credit_id: CreditId,
    pub recommended_at: NaiveDateTime,
    pub urgency: u8,
    pub channel: Channel,
    pub scenario: Scenario,
    pub offer: Offer,
    pub max_discount_percent: u8,
    pub reasoning: String,
    pub confidence: f64,
}

/// Channels of the most recent contacts that went unanswered or were refused.
fn failed_channels(history: &[ContactRecord]) -> Vec<Channel> {
    history[history.len().saturating_sub(FAILED_CHANNEL_WINDOW)..]
        .iter()
        .filter(|contact| contact.result.is_failed_contact())
        .map(|contact| contact.channel)
        .collect()
}

/// Recommend the next contact for a credit. `history` is oldest first. Without
/// a profile the client is treated as forgetful with default preferences.
pub fn recommend_next_action(
    profile: Option<&BehaviorProfile>,
    credit: &CreditSnapshot,
    history: &[ContactRecord],
    monthly_income: Option<Decimal>,
    now: NaiveDateTime,
) -> NbaRecommendation {
    let psychotype = profile
        .map(|profile| profile.psychotype)
        .unwrap_or(Psychotype::Forgetful);
    let preferences = profile
        .map(|profile| profile.preferences)
        .unwrap_or_else(ContactPreferences::default);
    let promises_kept_ratio = profile
        .and_then(|profile| profile.promises_kept_ratio)
        .unwrap_or(NEUTRAL_PROMISES_KEPT);
    let segment = credit.risk_segment.unwrap_or(RiskSegment::Medium);
    let overdue_days = credit.overdue_days();
    let overdue_amount = credit.overdue_principal();

    let urgency = timing::urgency(overdue_days);
    let recommended_at = timing::recommended_contact_time(now, urgency, &preferences);

    let failed = failed_channels(history);
    let (channel, channel_confidence) =
        channel::best_channel(&preferences, psychotype, overdue_amount, &failed);

    let (scenario, mut reasoning) =
        scenario::best_scenario(psychotype, overdue_days, history, promises_kept_ratio);

    let offer = offer::best_offer(segment, credit.principal_debt(), psychotype, monthly_income);
    reasoning.extend(offer.reasoning);

    NbaRecommendation {
        client_id: credit.client_id,
        credit_id: credit.id,
        recommended_at,
        urgency,
        channel,
        scenario,
        offer: offer.offer,
        max_discount_percent: offer.max_discount_percent,
        reasoning: reasoning.join(". "),
        confidence: round_places((channel_confidence + BASELINE_CONFIDENCE) / 2.0, 2),
    }
}
