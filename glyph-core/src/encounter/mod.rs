//! Encounters: the narrative foes whose stability pool absorbs cast damage.
//!
//! The deck cycles every four stages; each pass scales health further.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifacts::ArtifactCounts;
use crate::constants::*;

/// Static description of an encounter in the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterTemplate {
    pub name: &'static str,
    pub lore: &'static str,
    pub base_health: u32,
    pub rewards: ArtifactCounts,
}

pub const ENCOUNTER_DECK: [EncounterTemplate; 4] = [
    EncounterTemplate {
        name: "Fractal Wisp",
        lore: "A rogue shimmer of numbers coils around the arena, warping simple sums into fractal spirals.",
        base_health: 120,
        rewards: ArtifactCounts {
            stabilize: 1,
            reshuffle: 0,
        },
    },
    EncounterTemplate {
        name: "Vector Hydra",
        lore: "Each successful cast severs one of the hydra's vector heads before it can multiply unchecked.",
        base_health: 150,
        rewards: ArtifactCounts {
            stabilize: 0,
            reshuffle: 1,
        },
    },
    EncounterTemplate {
        name: "Tempo Apparatus",
        lore: "A clockwork obelisk that accelerates time whenever your focus slips.",
        base_health: 170,
        rewards: ArtifactCounts {
            stabilize: 1,
            reshuffle: 1,
        },
    },
    EncounterTemplate {
        name: "Prime Sovereign",
        lore: "The sovereign demands only immaculate results — primes resonate with its crystalline core.",
        base_health: 200,
        rewards: ArtifactCounts {
            stabilize: 2,
            reshuffle: 0,
        },
    },
];

/// Encounter lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterStatus {
    Active,
    Defeated,
}

/// Result of one hit against an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub dealt: u32,
    pub remaining: u32,
    /// True only on the hit that took health to zero
    pub defeated_now: bool,
}

/// A live encounter for one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub name: String,
    pub lore: String,
    pub stage: u32,
    pub health: u32,
    pub max_health: u32,
    pub rewards: ArtifactCounts,
    pub status: EncounterStatus,
}

/// Deck index and pass number for a stage (stages start at 1)
pub fn deck_position(stage: u32) -> (usize, u32) {
    let offset = stage.max(1) - 1;
    let index = offset as usize % ENCOUNTER_DECK.len();
    let cycle = offset / ENCOUNTER_DECK.len() as u32;
    (index, cycle)
}

/// Health multiplier for a stage
pub fn health_scale(stage: u32) -> f64 {
    let (_, cycle) = deck_position(stage);
    1.0 + HEALTH_SCALE_PER_CYCLE * cycle as f64
        + HEALTH_SCALE_PER_STAGE * (stage.max(1) - 1) as f64
}

impl Encounter {
    /// Instantiates the deck entry for `stage` with scaled health.
    pub fn for_stage(stage: u32) -> Self {
        let (index, _) = deck_position(stage);
        let template = &ENCOUNTER_DECK[index];
        let scaled = round_half_up(template.base_health as f64 * health_scale(stage)) as u32;
        let max_health = scaled.max(MIN_ENCOUNTER_HEALTH);

        Self {
            name: template.name.to_string(),
            lore: template.lore.to_string(),
            stage,
            health: max_health,
            max_health,
            rewards: template.rewards,
            status: EncounterStatus::Active,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.status == EncounterStatus::Defeated
    }

    pub fn health_ratio(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        (self.health as f64 / self.max_health as f64).max(0.0)
    }

    /// Health line for the status panel
    pub fn health_label(&self) -> String {
        format!("{} / {} stability", self.health, self.max_health)
    }

    /// Subtracts damage, saturating at zero. A defeated encounter takes no
    /// further damage and never reports a second defeat.
    pub fn apply_damage(&mut self, damage: u32) -> DamageReport {
        if self.is_defeated() {
            return DamageReport {
                dealt: 0,
                remaining: 0,
                defeated_now: false,
            };
        }

        let dealt = damage.min(self.health);
        self.health -= dealt;
        let defeated_now = self.health == 0;
        if defeated_now {
            self.status = EncounterStatus::Defeated;
            info!(encounter = %self.name, stage = self.stage, "Encounter defeated");
        }

        DamageReport {
            dealt,
            remaining: self.health,
            defeated_now,
        }
    }
}

/// Damage dealt by a winning cast.
///
/// `max(12, round(total_gain / 4))` plus `round(sigil_bonus / 3)` when the
/// sigil was honored.
pub fn cast_damage(total_gain: u64, sigil_complete: bool, sigil_bonus: u64) -> u32 {
    let base = round_half_up(total_gain as f64 / DAMAGE_DIVISOR) as u32;
    let base = base.max(MIN_CAST_DAMAGE);
    let sigil = if sigil_complete {
        round_half_up(sigil_bonus as f64 / SIGIL_DAMAGE_DIVISOR) as u32
    } else {
        0
    };
    base.saturating_add(sigil)
}

/// Base round time after reaching `stage`: the configured base minus
/// `min(12, stage / 2)` seconds, never below the configured floor.
pub fn accelerated_base_time(initial_base: f64, min_base: f64, stage: u32) -> f64 {
    let acceleration = (stage / 2).min(MAX_TIME_ACCELERATION) as f64;
    (initial_base - acceleration).max(min_base)
}
