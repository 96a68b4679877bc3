use super::rules::FlagSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete risk bucket derived from the number of triggered flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub const fn from_score(score: u8) -> Self {
        match score {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of triggered flags, always within 0..=5.
pub fn score(flags: &FlagSet) -> u8 {
    flags.count() as u8
}

pub fn tier(score: u8) -> RiskTier {
    RiskTier::from_score(score)
}
