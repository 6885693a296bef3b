//! Sigil conditions: one optional bonus objective per round.
//!
//! A satisfied sigil on a winning cast adds its bonus to the essence gain and
//! a third of it to the encounter damage.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::expression::{is_operator_glyph, POWER};
use crate::generation::GlyphBank;

/// The fixed sigil catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SigilKind {
    ThreeOperators,
    EvenResult,
    Parentheses,
    PowerGlyph,
    HighestGlyph,
    Subtractive,
    Lengthy,
}

/// Catalog in draw order
pub const SIGIL_CATALOG: [SigilKind; 7] = [
    SigilKind::ThreeOperators,
    SigilKind::EvenResult,
    SigilKind::Parentheses,
    SigilKind::PowerGlyph,
    SigilKind::HighestGlyph,
    SigilKind::Subtractive,
    SigilKind::Lengthy,
];

impl SigilKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::ThreeOperators => "threeOperators",
            Self::EvenResult => "evenResult",
            Self::Parentheses => "parentheses",
            Self::PowerGlyph => "powerGlyph",
            Self::HighestGlyph => "highestGlyph",
            Self::Subtractive => "subtractive",
            Self::Lengthy => "lengthy",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::ThreeOperators => "Wield at least three operators in your spell.",
            Self::EvenResult => "Stabilize the rift with an even result.",
            Self::Parentheses => "Bind the energies with at least one set of parentheses.",
            Self::PowerGlyph => "Invoke the power glyph ^ somewhere in the incantation.",
            Self::HighestGlyph => "Channel the highest glyph from the bank at least once.",
            Self::Subtractive => "Temper the spell with a subtraction.",
            Self::Lengthy => "Compose a lengthy chant with at least eight glyphs.",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        SIGIL_CATALOG.iter().copied().find(|kind| kind.id() == id)
    }

    /// Whether a cast satisfies this sigil. Total over every input, including
    /// non-finite results (which never count as even).
    pub fn check(&self, expression: &str, result: f64, glyphs: &GlyphBank) -> bool {
        match self {
            Self::ThreeOperators => {
                expression.chars().filter(|c| is_operator_glyph(*c)).count()
                    >= SIGIL_OPERATOR_COUNT
            }
            Self::EvenResult => (result % 2.0).abs() < TARGET_EPSILON,
            Self::Parentheses => expression.contains('(') && expression.contains(')'),
            Self::PowerGlyph => expression.contains(POWER),
            Self::HighestGlyph => expression.contains(&glyphs.highest().to_string()),
            Self::Subtractive => expression.contains('-'),
            Self::Lengthy => {
                expression.chars().filter(|c| !c.is_whitespace()).count() >= SIGIL_LENGTHY_CHARS
            }
        }
    }
}

/// Bonus essence for satisfying this round's sigil
pub fn sigil_bonus(level: f64, stage: u32) -> u64 {
    round_half_up(
        SIGIL_BASE_BONUS + level * SIGIL_BONUS_PER_LEVEL + stage as f64 * SIGIL_BONUS_PER_STAGE,
    )
    .max(0.0) as u64
}

/// Draws this round's sigil uniformly from the catalog along with its bonus.
pub fn assign_sigil<R: Rng + ?Sized>(level: f64, stage: u32, rng: &mut R) -> (SigilKind, u64) {
    let kind = *SIGIL_CATALOG
        .choose(rng)
        .unwrap_or(&SigilKind::ThreeOperators);
    (kind, sigil_bonus(level, stage))
}

/// Player-facing reward line shown while a sigil is pending
pub fn reward_note(bonus: u64) -> String {
    format!("Bonus: +{} essence & heavy stability damage.", bonus)
}

pub const HONORED_NOTE: &str = "Sigil honored! Bonus delivered.";
