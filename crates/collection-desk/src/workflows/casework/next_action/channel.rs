use rust_decimal::Decimal;

use crate::workflows::casework::domain::{Channel, ContactPreferences, Psychotype};

const PREFERRED_BONUS: f64 = 0.25;
const FALLBACK_CONFIDENCE: f64 = 0.3;
const LARGE_DEBT: i64 = 100_000;
const SMALL_DEBT: i64 = 10_000;

const fn base_weight(channel: Channel) -> f64 {
    match channel {
        Channel::Phone => 0.5,
        Channel::Whatsapp => 0.6,
        Channel::Sms => 0.4,
        Channel::Email => 0.3,
        Channel::Push => 0.35,
    }
}

fn psychotype_adjustment(psychotype: Psychotype, channel: Channel) -> f64 {
    match (psychotype, channel) {
        (Psychotype::Toxic, Channel::Phone) => -0.2,
        (Psychotype::Forgetful, channel) if channel.is_lightweight() => 0.15,
        (Psychotype::Unwilling, Channel::Phone) => 0.1,
        _ => 0.0,
    }
}

fn amount_adjustment(overdue_amount: Decimal, channel: Channel) -> f64 {
    if overdue_amount > Decimal::from(LARGE_DEBT) {
        if channel == Channel::Phone {
            return 0.2;
        }
    } else if overdue_amount < Decimal::from(SMALL_DEBT) && channel.is_lightweight() {
        return 0.15;
    }
    0.0
}

/// Best channel with its score as confidence. Failed channels are excluded;
/// when nothing is left the phone is returned at a low confidence.
pub(crate) fn best_channel(
    preferences: &ContactPreferences,
    psychotype: Psychotype,
    overdue_amount: Decimal,
    failed: &[Channel],
) -> (Channel, f64) {
    let mut best: Option<(Channel, f64)> = None;
    for channel in Channel::ALL {
        if failed.contains(&channel) {
            continue;
        }

        let mut score = base_weight(channel);
        if channel == preferences.preferred_channel {
            score += PREFERRED_BONUS;
        }
        score += psychotype_adjustment(psychotype, channel);
        score += amount_adjustment(overdue_amount, channel);
        let score = score.min(1.0);

        if best.map_or(true, |(_, current)| score > current) {
            best = Some((channel, score));
        }
    }

    best.unwrap_or((Channel::Phone, FALLBACK_CONFIDENCE))
}
