use std::fmt;

use serde::{Deserialize, Serialize};

/// Achievement band for an accumulated point total, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    Stick,
    Copper,
    Gold,
    Diamond,
}

impl RewardTier {
    pub const ALL: [RewardTier; 4] = [Self::Stick, Self::Copper, Self::Gold, Self::Diamond];

    /// Lowest total that belongs to this tier.
    pub fn lower(self) -> i64 {
        match self {
            Self::Stick => 0,
            Self::Copper => 21,
            Self::Gold => 51,
            Self::Diamond => 91,
        }
    }

    /// Highest total that belongs to this tier; `None` for the open-ended top tier.
    pub fn upper(self) -> Option<i64> {
        match self {
            Self::Stick => Some(20),
            Self::Copper => Some(50),
            Self::Gold => Some(90),
            Self::Diamond => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Stick => Some(Self::Copper),
            Self::Copper => Some(Self::Gold),
            Self::Gold => Some(Self::Diamond),
            Self::Diamond => None,
        }
    }

    /// Tier for a point total; negative totals count as zero.
    pub fn for_points(points: i64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|tier| points >= tier.lower())
            .unwrap_or(Self::Stick)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Stick => "Stick",
            Self::Copper => "Copper",
            Self::Gold => "Gold",
            Self::Diamond => "Diamond",
        }
    }
}

impl fmt::Display for RewardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextTier {
    Threshold { tier: RewardTier, points: i64 },
    MaxLevel,
}

impl fmt::Display for NextTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold { tier, points } => write!(f, "{tier} ({points}+)"),
            Self::MaxLevel => f.write_str("Max level"),
        }
    }
}

/// What the rewards screen shows for a point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierProgress {
    pub tier: RewardTier,
    pub points: i64,
    /// Progress through the current tier, 0..=100.
    pub progress_pct: u8,
    pub next: NextTier,
}

impl TierProgress {
    pub fn evaluate(points: i64) -> Self {
        let tier = RewardTier::for_points(points);
        let (progress_pct, next) = match (tier.upper(), tier.next()) {
            (Some(upper), Some(next_tier)) => {
                let lower = tier.lower();
                let width = (upper - lower).max(1) as f64;
                let raw = (points.min(upper) - lower) as f64 / width * 100.0;
                (
                    raw.round().clamp(0.0, 100.0) as u8,
                    NextTier::Threshold {
                        tier: next_tier,
                        points: next_tier.lower(),
                    },
                )
            }
            _ => (100, NextTier::MaxLevel),
        };

        Self {
            tier,
            points,
            progress_pct,
            next,
        }
    }

    pub fn next_label(&self) -> String {
        self.next.to_string()
    }
}
