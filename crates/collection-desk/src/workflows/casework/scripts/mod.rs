//! Call scripts for operators: phrase sets per scenario and psychotype,
//! objection handling, and live suggestions from a running transcript.

mod objections;
mod templates;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use objections::{detect_objection, find_objection, Objection};
pub use templates::CallStep;

use super::domain::{Psychotype, Scenario};
use crate::domain::CreditSnapshot;

const MAX_SUGGESTIONS: usize = 5;
const PER_SOURCE: usize = 2;
const GREETING_ONLY_CHARS: usize = 200;

/// Values substituted into `{placeholder}` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptContext {
    pub client_name: String,
    pub operator_name: String,
    pub bank_name: String,
    pub amount: Decimal,
    pub overdue_days: u32,
    /// Promised payment date as it should be spoken, e.g. "пятницы".
    pub date: String,
    pub time: String,
    pub complaint_phone: String,
}

impl Default for ScriptContext {
    fn default() -> Self {
        Self {
            client_name: "клиент".to_string(),
            operator_name: "Оператор".to_string(),
            bank_name: "Банк".to_string(),
            amount: Decimal::ZERO,
            overdue_days: 0,
            date: "пятницы".to_string(),
            time: "10:00".to_string(),
            complaint_phone: "8-800-123-45-67".to_string(),
        }
    }
}

impl ScriptContext {
    /// Context for a credit: the debtor's first name, the overdue principal,
    /// and the overdue days. Other fields keep their defaults.
    pub fn for_credit(credit: &CreditSnapshot) -> Self {
        let defaults = Self::default();
        Self {
            client_name: credit
                .debtor_name
                .split_whitespace()
                .next()
                .map(str::to_string)
                .unwrap_or(defaults.client_name),
            amount: credit.overdue_principal(),
            overdue_days: credit.overdue_days(),
            ..Self::default()
        }
    }

    /// Fill known variables. Unknown placeholders are left as written.
    pub fn fill(&self, template: &str) -> String {
        let amount = group_thousands(self.amount);
        let overdue_days = self.overdue_days.to_string();
        [
            ("{client_name}", self.client_name.as_str()),
            ("{operator_name}", self.operator_name.as_str()),
            ("{bank_name}", self.bank_name.as_str()),
            ("{amount}", amount.as_str()),
            ("{overdue_days}", overdue_days.as_str()),
            ("{date}", self.date.as_str()),
            ("{time}", self.time.as_str()),
            ("{complaint_phone}", self.complaint_phone.as_str()),
        ]
        .into_iter()
        .fold(template.to_string(), |text, (placeholder, value)| {
            text.replace(placeholder, value)
        })
    }

    fn fill_all(&self, templates: &[&str]) -> Vec<String> {
        templates.iter().map(|template| self.fill(template)).collect()
    }
}

/// Whole rubles with a space between thousands, e.g. `150 000`.
fn group_thousands(amount: Decimal) -> String {
    let digits = amount.round_dp(0).abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    if amount.is_sign_negative() && !amount.round_dp(0).is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}

/// A filled call script. `scenario` and `psychotype` name the template that
/// was used, which differs from the request when a fallback applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub scenario: Scenario,
    pub psychotype: Psychotype,
    pub opening: Vec<String>,
    pub key_phrases: Vec<String>,
    pub closing: Vec<String>,
}

/// Script for a client of `psychotype` in `scenario`. Pairs without their own
/// template use the scenario's forgetful template, then the soft reminder.
pub fn script_for(psychotype: Psychotype, scenario: Scenario, context: &ScriptContext) -> Script {
    let template = templates::template_for(psychotype, scenario);
    Script {
        scenario: template.scenario,
        psychotype: template.psychotype,
        opening: context.fill_all(template.opening),
        key_phrases: context.fill_all(template.key_phrases),
        closing: context.fill_all(template.closing),
    }
}

/// Answers to whatever objection `text` contains, or general de-escalation
/// lines when none is recognised.
pub fn objection_response(text: &str, context: &ScriptContext) -> Vec<String> {
    match find_objection(text) {
        Some(objection) => context.fill_all(objection.responses()),
        None => context.fill_all(&objections::FALLBACK_RESPONSES),
    }
}

pub fn step_phrases(step: CallStep, context: &ScriptContext) -> Vec<String> {
    context.fill_all(step.phrases())
}

/// How far a call has progressed, judged from its transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStage {
    InProgress,
    Greeting,
    /// The debt is on the table but no payment date has been asked for.
    NeedsPromise,
    PromiseDiscussed,
    Ended,
}

pub fn detect_stage(transcript: &str) -> CallStage {
    let text = transcript.to_lowercase();
    let has = |needle: &str| text.contains(needle);

    if has("до свидания") || has("всего доброго") {
        return CallStage::Ended;
    }
    if has("когда") && (has("оплат") || has("внес")) {
        return CallStage::PromiseDiscussed;
    }
    if has("задолженност") || has("долг") {
        return CallStage::NeedsPromise;
    }
    if has("здравствуйте") || has("добрый день") {
        if text.chars().count() < GREETING_ONLY_CHARS {
            return CallStage::Greeting;
        }
        return CallStage::NeedsPromise;
    }
    CallStage::InProgress
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Objection,
    PromiseRequest,
    Closing,
    KeyPhrase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSuggestion {
    pub phrase: String,
    /// Why the phrase fits now, for the operator.
    pub context: String,
    pub success_rate: f64,
    pub category: SuggestionCategory,
}

/// Up to five prompts for the operator while a call is running: answers to a
/// fresh objection first, then the next step for the call's stage, then key
/// phrases of the script not yet said.
pub fn live_suggestions(
    transcript: &str,
    psychotype: Psychotype,
    scenario: Scenario,
    context: &ScriptContext,
) -> Vec<ScriptSuggestion> {
    let stage = detect_stage(transcript);
    let objection = detect_objection(transcript);
    let mut suggestions = Vec::new();

    if let Some(objection) = objection {
        suggestions.extend(
            context
                .fill_all(objection.responses())
                .into_iter()
                .take(PER_SOURCE)
                .map(|phrase| ScriptSuggestion {
                    phrase,
                    context: format!("Answer to objection \"{}\"", objection.marker()),
                    success_rate: 0.72,
                    category: SuggestionCategory::Objection,
                }),
        );
    }

    let next_step = match stage {
        CallStage::NeedsPromise => Some((
            CallStep::PromiseRequest,
            "Move on to asking for a payment promise",
            0.68,
            SuggestionCategory::PromiseRequest,
        )),
        CallStage::PromiseDiscussed => Some((
            CallStep::Farewell,
            "Wrap up the call",
            0.85,
            SuggestionCategory::Closing,
        )),
        CallStage::InProgress | CallStage::Greeting | CallStage::Ended => None,
    };
    if let Some((step, hint, success_rate, category)) = next_step {
        suggestions.extend(
            step_phrases(step, context)
                .into_iter()
                .take(PER_SOURCE)
                .map(|phrase| ScriptSuggestion {
                    phrase,
                    context: hint.to_string(),
                    success_rate,
                    category,
                }),
        );
    }

    let said = transcript.to_lowercase();
    let script = script_for(psychotype, scenario, context);
    suggestions.extend(
        script
            .key_phrases
            .into_iter()
            .take(PER_SOURCE)
            .filter(|phrase| !said.contains(&phrase.to_lowercase()))
            .map(|phrase| ScriptSuggestion {
                phrase,
                context: format!("Effective phrase for a {} client", psychotype.label()),
                success_rate: 0.65,
                category: SuggestionCategory::KeyPhrase,
            }),
    );

    suggestions.truncate(MAX_SUGGESTIONS);
    debug!(
        stage = ?stage,
        objection = ?objection,
        suggestions = suggestions.len(),
        "script suggestions prepared"
    );
    suggestions
}
