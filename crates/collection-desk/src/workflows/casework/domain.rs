use chrono::{NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ClientId, Employment, InterventionStatus};

/// Behavioral segment describing how a debtor responds to collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Psychotype {
    Forgetful,
    Unwilling,
    Unable,
    Toxic,
    Cooperative,
}

impl Psychotype {
    /// Declaration order doubles as the tie-break order.
    pub const ALL: [Psychotype; 5] = [
        Self::Forgetful,
        Self::Unwilling,
        Self::Unable,
        Self::Toxic,
        Self::Cooperative,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unwilling" => Self::Unwilling,
            "unable" => Self::Unable,
            "toxic" => Self::Toxic,
            "cooperative" => Self::Cooperative,
            _ => Self::Forgetful,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Forgetful => "forgetful",
            Self::Unwilling => "unwilling",
            Self::Unable => "unable",
            Self::Toxic => "toxic",
            Self::Cooperative => "cooperative",
        }
    }

    pub const fn recommended_approach(self) -> &'static str {
        match self {
            Self::Forgetful => {
                "Soft reminders, automatic notifications, convenient payment options"
            }
            Self::Unwilling => "Discounts for quick payment, clear consequences, firm tone",
            Self::Unable => "Restructuring, payment holidays, individual schedule",
            Self::Toxic => "Written contact only, legal route, minimal calls",
            Self::Cooperative => "Standard support, flexible terms",
        }
    }
}

impl From<String> for Psychotype {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Contact channel available to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Channel {
    Phone,
    Whatsapp,
    Sms,
    Email,
    Push,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Self::Phone,
        Self::Whatsapp,
        Self::Sms,
        Self::Email,
        Self::Push,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "whatsapp" => Self::Whatsapp,
            "sms" => Self::Sms,
            "email" => Self::Email,
            "push" => Self::Push,
            _ => Self::Phone,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Whatsapp => "whatsapp",
            Self::Sms => "sms",
            Self::Email => "email",
            Self::Push => "push",
        }
    }

    pub const fn is_lightweight(self) -> bool {
        matches!(self, Self::Sms | Self::Push)
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Conversation script an operator should follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    SoftReminder,
    Empathy,
    FirmDemand,
    DiscountOffer,
    LastWarning,
    RestructureOffer,
    PaymentHoliday,
}

impl Scenario {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoftReminder => "soft_reminder",
            Self::Empathy => "empathy",
            Self::FirmDemand => "firm_demand",
            Self::DiscountOffer => "discount_offer",
            Self::LastWarning => "last_warning",
            Self::RestructureOffer => "restructure_offer",
            Self::PaymentHoliday => "payment_holiday",
        }
    }
}

/// Commercial concession an operator may put on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Offer {
    None,
    #[serde(rename = "discount_10")]
    Discount10,
    #[serde(rename = "discount_20")]
    Discount20,
    #[serde(rename = "discount_50")]
    Discount50,
    #[serde(rename = "restructure_6m")]
    Restructure6m,
    #[serde(rename = "restructure_12m")]
    Restructure12m,
    #[serde(rename = "holiday_1m")]
    Holiday1m,
    #[serde(rename = "holiday_3m")]
    Holiday3m,
    PartialWriteOff,
}

impl Offer {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Discount10 => "discount_10",
            Self::Discount20 => "discount_20",
            Self::Discount50 => "discount_50",
            Self::Restructure6m => "restructure_6m",
            Self::Restructure12m => "restructure_12m",
            Self::Holiday1m => "holiday_1m",
            Self::Holiday3m => "holiday_3m",
            Self::PartialWriteOff => "partial_write_off",
        }
    }

    pub const fn is_discount(self) -> bool {
        matches!(self, Self::Discount10 | Self::Discount20 | Self::Discount50)
    }

    pub const fn is_restructure_or_holiday(self) -> bool {
        matches!(
            self,
            Self::Restructure6m | Self::Restructure12m | Self::Holiday1m | Self::Holiday3m
        )
    }
}

/// Portfolio-level strategy for a delinquent credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ContinueSoft,
    ContinueHard,
    Sell,
    WriteOff,
    Restructure,
    Legal,
}

impl Strategy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ContinueSoft => "continue_soft",
            Self::ContinueHard => "continue_hard",
            Self::Sell => "sell",
            Self::WriteOff => "write_off",
            Self::Restructure => "restructure",
            Self::Legal => "legal",
        }
    }
}

/// One past contact attempt, oldest first when passed as history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default)]
    pub at: Option<NaiveDateTime>,
    pub channel: Channel,
    pub result: InterventionStatus,
    #[serde(default)]
    pub scenario: Option<Scenario>,
    #[serde(default)]
    pub aggression_detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    pub amount: Decimal,
    #[serde(default)]
    pub min_payment: Option<Decimal>,
    #[serde(default)]
    pub overdue_days: u32,
}

impl PaymentRecord {
    /// Paid less than the scheduled minimum.
    pub fn is_partial(&self) -> bool {
        self.min_payment
            .map(|minimum| self.amount < minimum)
            .unwrap_or(false)
    }

    pub fn is_on_time(&self) -> bool {
        self.overdue_days <= 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromiseRecord {
    pub kept: bool,
    #[serde(default)]
    pub partial: bool,
}

/// When and how a client is most reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPreferences {
    pub best_hour: u32,
    pub best_weekday: Weekday,
    pub preferred_channel: Channel,
}

impl Default for ContactPreferences {
    fn default() -> Self {
        Self {
            best_hour: 14,
            best_weekday: Weekday::Wed,
            preferred_channel: Channel::Phone,
        }
    }
}

/// Income and risk triggers known about a borrower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientFinancials {
    pub client_id: ClientId,
    #[serde(default)]
    pub monthly_income: Option<Decimal>,
    #[serde(default = "unknown_employment")]
    pub employment: Employment,
    #[serde(default)]
    pub job_changed_recently: bool,
    #[serde(default)]
    pub income_dropped: bool,
    #[serde(default)]
    pub multiple_credits: bool,
}

fn unknown_employment() -> Employment {
    Employment::Unknown
}
