use crate::infra::{deserialize_datetime, print_json, read_csv};
use chrono::NaiveDateTime;
use clap::Args;
use collection_desk::error::AppError;
use collection_desk::workflows::compliance::{
    check_compliance, ComplianceRequest, ContactKind, RecentContact, ScriptElement,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ComplianceArgs {
    /// Transcript or message text to review (UTF-8)
    #[arg(long)]
    pub(crate) transcript: PathBuf,
    /// Local time of the contact (YYYY-MM-DD HH:MM[:SS])
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) at: NaiveDateTime,
    /// Earlier contacts with the same client (CSV: at, kind)
    #[arg(long)]
    pub(crate) contacts: Option<PathBuf>,
    /// Contact kind being reviewed: call or sms
    #[arg(long, default_value = "call", value_parser = parse_contact_kind)]
    pub(crate) kind: ContactKind,
    /// Script elements that must be present; repeat the flag for several
    #[arg(long = "require", value_parser = parse_script_element)]
    pub(crate) required: Vec<ScriptElement>,
}

#[derive(Debug, Deserialize)]
struct ContactRow {
    #[serde(deserialize_with = "deserialize_datetime")]
    at: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_contact_kind")]
    kind: ContactKind,
}

fn parse_contact_kind(raw: &str) -> Result<ContactKind, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "call" | "phone" => Ok(ContactKind::Call),
        "sms" | "message" => Ok(ContactKind::Sms),
        other => Err(format!("unknown contact kind '{other}', expected call or sms")),
    }
}

fn deserialize_contact_kind<'de, D>(deserializer: D) -> Result<ContactKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_contact_kind(&raw).map_err(serde::de::Error::custom)
}

fn parse_script_element(raw: &str) -> Result<ScriptElement, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "greeting" => Ok(ScriptElement::Greeting),
        "purpose" => Ok(ScriptElement::Purpose),
        "amount" => Ok(ScriptElement::Amount),
        "deadline" => Ok(ScriptElement::Deadline),
        "payment_methods" => Ok(ScriptElement::PaymentMethods),
        "closing" => Ok(ScriptElement::Closing),
        other => Err(format!("unknown script element '{other}'")),
    }
}

pub(crate) fn run_compliance(args: ComplianceArgs) -> Result<(), AppError> {
    let ComplianceArgs {
        transcript,
        at,
        contacts,
        kind,
        required,
    } = args;

    let text = fs::read_to_string(&transcript)?;
    let recent: Vec<RecentContact> = match contacts {
        Some(path) => read_csv::<ContactRow>(&path)?
            .into_iter()
            .map(|row| RecentContact {
                at: row.at,
                kind: row.kind,
            })
            .collect(),
        None => Vec::new(),
    };

    let mut request = ComplianceRequest::new(text, at)
        .with_kind(kind)
        .with_recent_contacts(recent);
    if !required.is_empty() {
        request = request.with_required_elements(required);
    }

    print_json(&check_compliance(&request))
}
