//! Rule-weighted behavioral segmentation.
//!
//! Each psychotype owns a weight table over behavioral indicators. A score is
//! the weighted mean of the indicators actually observed, so missing data
//! neither helps nor hurts a psychotype.

mod indicators;
mod weights;

pub use indicators::{BehaviorEvidence, IndicatorSet};
pub use weights::Indicator;

use serde::{Deserialize, Serialize};

use super::domain::{ContactPreferences, Psychotype};
use crate::domain::{round_places, ClientId};
use weights::weight_table;

const MAX_FACTORS: usize = 3;
const FACTOR_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsychotypeScore {
    pub psychotype: Psychotype,
    pub score: f64,
}

/// Winner and per-psychotype scores for one indicator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychotypeAssessment {
    pub psychotype: Psychotype,
    pub confidence: f64,
    /// In declaration order.
    pub scores: Vec<PsychotypeScore>,
    pub factors: Vec<String>,
}

/// Behavioral profile of a client, recomputed from history on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub client_id: ClientId,
    pub psychotype: Psychotype,
    pub confidence: f64,
    pub scores: Vec<PsychotypeScore>,
    pub factors: Vec<String>,
    pub recommended_approach: String,
    pub preferences: ContactPreferences,
    pub on_time_payment_ratio: Option<f64>,
    pub promises_kept_ratio: Option<f64>,
    pub contact_rate: Option<f64>,
}

fn normalized_score(psychotype: Psychotype, indicators: &IndicatorSet) -> f64 {
    let (weighted, observed_weight) = weight_table(psychotype).iter().fold(
        (0.0, 0.0),
        |(weighted, observed_weight), (indicator, weight)| match indicators.get(*indicator) {
            Some(value) => (weighted + value * weight, observed_weight + weight),
            None => (weighted, observed_weight),
        },
    );

    if observed_weight > 0.0 {
        (weighted / observed_weight).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn contributing_factors(psychotype: Psychotype, indicators: &IndicatorSet) -> Vec<String> {
    let mut present: Vec<(Indicator, f64)> = weight_table(psychotype)
        .iter()
        .filter_map(|(indicator, _)| indicators.get(*indicator).map(|value| (*indicator, value)))
        .collect();
    present.sort_by(|left, right| right.1.total_cmp(&left.1));

    present
        .into_iter()
        .take(MAX_FACTORS)
        .filter(|(_, value)| *value > FACTOR_THRESHOLD)
        .map(|(indicator, _)| indicator.label().to_string())
        .collect()
}

/// Score every psychotype against `indicators` and pick the strongest.
/// Ties go to the psychotype declared first.
pub fn score_psychotypes(indicators: &IndicatorSet) -> PsychotypeAssessment {
    let scores: Vec<PsychotypeScore> = Psychotype::ALL
        .iter()
        .map(|psychotype| PsychotypeScore {
            psychotype: *psychotype,
            score: normalized_score(*psychotype, indicators),
        })
        .collect();

    let mut best = scores[0];
    for candidate in &scores[1..] {
        if candidate.score > best.score {
            best = *candidate;
        }
    }

    PsychotypeAssessment {
        psychotype: best.psychotype,
        confidence: round_places(best.score, 2),
        factors: contributing_factors(best.psychotype, indicators),
        scores,
    }
}

/// Build a client's behavior profile from raw history.
pub fn classify_psychotype(evidence: &BehaviorEvidence) -> BehaviorProfile {
    let indicators = IndicatorSet::from_evidence(evidence);
    let assessment = score_psychotypes(&indicators);

    BehaviorProfile {
        client_id: evidence.client_id,
        psychotype: assessment.psychotype,
        confidence: assessment.confidence,
        scores: assessment.scores,
        factors: assessment.factors,
        recommended_approach: assessment.psychotype.recommended_approach().to_string(),
        preferences: evidence.preferences,
        on_time_payment_ratio: evidence.on_time_payment_ratio(),
        promises_kept_ratio: evidence.promises_kept_ratio(),
        contact_rate: evidence.contact_rate(),
    }
}
