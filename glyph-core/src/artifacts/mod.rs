//! Consumable artifacts earned from defeated encounters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Restores a slice of the round clock
    Stabilize,
    /// Re-rolls the glyph bank and target without aging the stage
    Reshuffle,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Stabilize, ArtifactKind::Reshuffle];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stabilize => "stabilize",
            Self::Reshuffle => "reshuffle",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stabilize" => Ok(Self::Stabilize),
            "reshuffle" => Ok(Self::Reshuffle),
            other => Err(format!("unknown artifact: {other}")),
        }
    }
}

/// Per-kind counts. Used both for the player's stock and encounter rewards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactCounts {
    pub stabilize: u32,
    pub reshuffle: u32,
}

impl ArtifactCounts {
    pub fn get(&self, kind: ArtifactKind) -> u32 {
        match kind {
            ArtifactKind::Stabilize => self.stabilize,
            ArtifactKind::Reshuffle => self.reshuffle,
        }
    }

    fn slot_mut(&mut self, kind: ArtifactKind) -> &mut u32 {
        match kind {
            ArtifactKind::Stabilize => &mut self.stabilize,
            ArtifactKind::Reshuffle => &mut self.reshuffle,
        }
    }

    /// Adds every reward count to the stock.
    pub fn grant(&mut self, rewards: &ArtifactCounts) {
        for kind in ArtifactKind::ALL {
            let slot = self.slot_mut(kind);
            *slot = slot.saturating_add(rewards.get(kind));
        }
    }

    /// Spends one charge. Returns false (and changes nothing) when empty.
    pub fn try_consume(&mut self, kind: ArtifactKind) -> bool {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// Clock after a stabilize: `min(limit, remaining + max(5, round(0.35 * limit)))`
pub fn stabilized_time(remaining: f64, limit: f64) -> f64 {
    let restore = round_half_up(limit * STABILIZE_RATIO).max(STABILIZE_MIN_SECS);
    (remaining + restore).min(limit)
}
