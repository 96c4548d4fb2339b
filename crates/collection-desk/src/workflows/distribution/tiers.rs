use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::DistributionConfig;

/// Priority band a credit falls into after ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub const ALL: [PriorityTier; 3] = [Self::High, Self::Medium, Self::Low];

    /// Fixed priority label stored on assignments, independent of the raw score.
    pub const fn base_priority(self) -> u8 {
        match self {
            Self::High => 5,
            Self::Medium => 3,
            Self::Low => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Index ranges into a ranked list, one per tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TierBands {
    pub high: Range<usize>,
    pub medium: Range<usize>,
    pub low: Range<usize>,
}

impl TierBands {
    pub(crate) fn range(&self, tier: PriorityTier) -> Range<usize> {
        match tier {
            PriorityTier::High => self.high.clone(),
            PriorityTier::Medium => self.medium.clone(),
            PriorityTier::Low => self.low.clone(),
        }
    }
}

fn percent_ceil(count: usize, percent: u16) -> usize {
    let scaled = count * usize::from(percent);
    scaled.div_ceil(100).min(count)
}

/// Split `count` ranked credits into high/medium/low bands by percentile.
pub(crate) fn credit_bands(count: usize, config: &DistributionConfig) -> TierBands {
    let high_percent = u16::from(config.high_tier_percent);
    let high_end = percent_ceil(count, high_percent);
    let medium_end =
        percent_ceil(count, high_percent + u16::from(config.medium_tier_percent)).max(high_end);

    TierBands {
        high: 0..high_end,
        medium: high_end..medium_end,
        low: medium_end..count,
    }
}

/// Operator pools per tier over an experience-ranked list. The medium pool
/// widens to the full list when the middle third is empty; the low pool is
/// always the full list.
pub(crate) fn operator_pools(count: usize) -> TierBands {
    if count == 0 {
        return TierBands {
            high: 0..0,
            medium: 0..0,
            low: 0..0,
        };
    }

    let top_end = (count / 3).max(1).min(count);
    let middle_end = (count * 2 / 3).max(top_end);
    let medium = if middle_end > top_end {
        top_end..middle_end
    } else {
        0..count
    };

    TierBands {
        high: 0..top_end,
        medium,
        low: 0..count,
    }
}
