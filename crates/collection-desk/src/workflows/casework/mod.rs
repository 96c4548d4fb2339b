//! Per-client casework: behavioral segmentation, next-best-action, call
//! scripts, and return forecasting. Every entry point is a pure function over
//! snapshots.

pub mod domain;
mod forecast;
mod next_action;
mod psychotype;
mod scripts;

#[cfg(test)]
mod tests;

pub use domain::{
    Channel, ClientFinancials, ContactPreferences, ContactRecord, Offer, PaymentRecord,
    PromiseRecord, Psychotype, Scenario, Strategy,
};
pub use forecast::{forecast_return, ReturnForecast};
pub use next_action::{recommend_next_action, NbaRecommendation};
pub use psychotype::{
    classify_psychotype, score_psychotypes, BehaviorEvidence, BehaviorProfile, Indicator,
    IndicatorSet, PsychotypeAssessment, PsychotypeScore,
};
pub use scripts::{
    detect_objection, detect_stage, find_objection, live_suggestions, objection_response,
    script_for, step_phrases, CallStage, CallStep, Objection, Script, ScriptContext,
    ScriptSuggestion, SuggestionCategory,
};
