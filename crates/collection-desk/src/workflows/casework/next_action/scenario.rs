use crate::workflows::casework::domain::{ContactRecord, Psychotype, Scenario};

const ESCALATION_WINDOW: usize = 5;
const SOFT_REMINDER_LIMIT: usize = 2;
const PROMISE_KEPT_FLOOR: f64 = 0.3;
const RESTRUCTURE_AFTER_DAYS: u32 = 60;

fn candidates(psychotype: Psychotype) -> Vec<Scenario> {
    use Scenario::*;

    match psychotype {
        Psychotype::Forgetful => vec![SoftReminder, Empathy],
        Psychotype::Unwilling => vec![FirmDemand, DiscountOffer, LastWarning],
        Psychotype::Unable => vec![RestructureOffer, PaymentHoliday, Empathy],
        Psychotype::Toxic => vec![FirmDemand, LastWarning],
        Psychotype::Cooperative => vec![SoftReminder, RestructureOffer],
    }
}

fn move_to_front(scenarios: &mut Vec<Scenario>, scenario: Scenario) {
    scenarios.retain(|candidate| *candidate != scenario);
    scenarios.insert(0, scenario);
}

/// Choose the conversation script. Later rules see the result of earlier ones.
pub(crate) fn best_scenario(
    psychotype: Psychotype,
    overdue_days: u32,
    history: &[ContactRecord],
    promises_kept_ratio: f64,
) -> (Scenario, Vec<String>) {
    let mut reasoning = Vec::new();
    let mut scenarios = candidates(psychotype);

    let recent = &history[history.len().saturating_sub(ESCALATION_WINDOW)..];
    let soft_reminders = recent
        .iter()
        .filter(|contact| contact.scenario == Some(Scenario::SoftReminder))
        .count();
    if soft_reminders >= SOFT_REMINDER_LIMIT {
        move_to_front(&mut scenarios, Scenario::FirmDemand);
        reasoning.push("Soft reminders have not produced payment".to_string());
    }

    if promises_kept_ratio < PROMISE_KEPT_FLOOR {
        scenarios = vec![Scenario::FirmDemand, Scenario::LastWarning];
        reasoning.push(format!(
            "Low promise-keeping rate ({:.0}%)",
            promises_kept_ratio * 100.0
        ));
    }

    if overdue_days > RESTRUCTURE_AFTER_DAYS && psychotype != Psychotype::Toxic {
        move_to_front(&mut scenarios, Scenario::RestructureOffer);
        reasoning.push("Long overdue period, offer restructuring".to_string());
    }

    if reasoning.is_empty() {
        reasoning.push(format!(
            "Recommended for psychotype \"{}\"",
            psychotype.label()
        ));
    }

    let scenario = scenarios.first().copied().unwrap_or(Scenario::SoftReminder);
    (scenario, reasoning)
}
