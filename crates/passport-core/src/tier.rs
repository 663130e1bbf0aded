//! Passport strength tiers
//!
//! Five ordered buckets over the visa-free destination count. The
//! bucketing is core logic; [`TierAccent`] is the display mapping kept
//! alongside it for renderers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered strength tier (Basic < Low < Medium < High < Premium)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrengthTier {
    Basic,
    Low,
    Medium,
    High,
    Premium,
}

impl StrengthTier {
    /// All tiers, weakest first
    pub const ALL: [StrengthTier; 5] = [
        StrengthTier::Basic,
        StrengthTier::Low,
        StrengthTier::Medium,
        StrengthTier::High,
        StrengthTier::Premium,
    ];

    /// Bucket a visa-free destination count
    pub fn from_visa_free(can_travel_to: u32) -> Self {
        match can_travel_to {
            0..=50 => StrengthTier::Basic,
            51..=100 => StrengthTier::Low,
            101..=150 => StrengthTier::Medium,
            151..=180 => StrengthTier::High,
            _ => StrengthTier::Premium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthTier::Basic => "Basic",
            StrengthTier::Low => "Low",
            StrengthTier::Medium => "Medium",
            StrengthTier::High => "High",
            StrengthTier::Premium => "Premium",
        }
    }

    pub fn accent(&self) -> TierAccent {
        match self {
            StrengthTier::Premium => TierAccent {
                emoji: "🏆",
                text_color: "text-blue-600",
                gradient: "from-blue-600 to-indigo-700",
            },
            StrengthTier::High => TierAccent {
                emoji: "✨",
                text_color: "text-emerald-600",
                gradient: "from-emerald-600 to-teal-700",
            },
            StrengthTier::Medium => TierAccent {
                emoji: "🌟",
                text_color: "text-yellow-600",
                gradient: "from-yellow-500 to-orange-600",
            },
            StrengthTier::Low => TierAccent {
                emoji: "📘",
                text_color: "text-orange-600",
                gradient: "from-orange-500 to-red-600",
            },
            StrengthTier::Basic => TierAccent {
                emoji: "📕",
                text_color: "text-red-600",
                gradient: "from-red-600 to-red-800",
            },
        }
    }
}

impl fmt::Display for StrengthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation accent for a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierAccent {
    pub emoji: &'static str,
    pub text_color: &'static str,
    pub gradient: &'static str,
}
