//! Call and message compliance review.
//!
//! A transcript is scanned for prohibited phrasing, the contact time is checked against the
//! permitted window, prior contacts are counted against frequency limits and the script is
//! checked for required elements. Threats, disclosure, timing breaches and a daily frequency
//! breach are violations; everything else is a warning.

mod frequency;
mod patterns;
mod script;
#[cfg(test)]
mod tests;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::round_places;

pub use frequency::{permitted_hours, ContactKind, ContactLimits, RecentContact};
pub use script::{ScriptElement, DEFAULT_REQUIRED_ELEMENTS};

const VIOLATION_PENALTY: f64 = 0.3;
const WARNING_PENALTY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Threats,
    Pressure,
    Disclosure,
    Rudeness,
    Timing,
    Frequency,
    ScriptDeviation,
}

impl FindingCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Threats => "threats",
            Self::Pressure => "pressure",
            Self::Disclosure => "disclosure",
            Self::Rudeness => "rudeness",
            Self::Timing => "timing",
            Self::Frequency => "frequency",
            Self::ScriptDeviation => "script_deviation",
        }
    }

    /// Whether a phrase in this category breaks the rules outright.
    fn is_violation(self) -> bool {
        matches!(self, Self::Threats | Self::Disclosure)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRequest {
    pub text: String,
    pub call_datetime: NaiveDateTime,
    #[serde(default = "default_contact_kind")]
    pub contact_kind: ContactKind,
    #[serde(default)]
    pub recent_contacts: Vec<RecentContact>,
    #[serde(default)]
    pub required_elements: Option<Vec<ScriptElement>>,
}

fn default_contact_kind() -> ContactKind {
    ContactKind::Call
}

impl ComplianceRequest {
    pub fn new(text: impl Into<String>, call_datetime: NaiveDateTime) -> Self {
        Self {
            text: text.into(),
            call_datetime,
            contact_kind: ContactKind::Call,
            recent_contacts: Vec::new(),
            required_elements: None,
        }
    }

    pub fn with_kind(mut self, kind: ContactKind) -> Self {
        self.contact_kind = kind;
        self
    }

    pub fn with_recent_contacts(mut self, contacts: Vec<RecentContact>) -> Self {
        self.recent_contacts = contacts;
        self
    }

    pub fn with_required_elements(mut self, elements: Vec<ScriptElement>) -> Self {
        self.required_elements = Some(elements);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub is_compliant: bool,
    pub score: f64,
    pub violations: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ComplianceResult {
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.violations.iter().chain(self.warnings.iter())
    }

    pub fn count(&self, category: FindingCategory) -> usize {
        self.findings()
            .filter(|finding| finding.category == category)
            .count()
    }
}

/// `max(0, 1 - 0.3 * violations - 0.05 * warnings)`, to two decimal places.
pub fn compliance_score(violations: usize, warnings: usize) -> f64 {
    let raw = 1.0 - VIOLATION_PENALTY * violations as f64 - WARNING_PENALTY * warnings as f64;
    round_places(raw.max(0.0), 2)
}

pub fn check_compliance(request: &ComplianceRequest) -> ComplianceResult {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();

    for finding in patterns::scan(&request.text) {
        if finding.category.is_violation() {
            violations.push(finding);
        } else {
            warnings.push(finding);
        }
    }

    violations.extend(frequency::check_timing(request.call_datetime));

    let (frequency_violations, frequency_warnings) = frequency::check_frequency(
        request.call_datetime,
        request.contact_kind,
        &request.recent_contacts,
    );
    violations.extend(frequency_violations);
    warnings.extend(frequency_warnings);

    let required = request
        .required_elements
        .as_deref()
        .unwrap_or(&DEFAULT_REQUIRED_ELEMENTS);
    warnings.extend(
        script::missing_elements(&request.text, required)
            .into_iter()
            .map(|element| Finding {
                category: FindingCategory::ScriptDeviation,
                message: format!("Script element missing: {}", element.label()),
                matched: None,
                context: None,
            }),
    );

    let score = compliance_score(violations.len(), warnings.len());
    debug!(
        violations = violations.len(),
        warnings = warnings.len(),
        score,
        "compliance check complete"
    );

    ComplianceResult {
        is_compliant: violations.is_empty(),
        score,
        violations,
        warnings,
    }
}
