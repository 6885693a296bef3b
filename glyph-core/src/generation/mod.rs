//! Round generation: glyph banks and reachable targets.
//!
//! A target is produced by building a random expression over the bank and
//! evaluating it, so every non-fallback target has at least one solution.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::*;
use crate::expression::{self, Operator};

/// RNG used by a live session
pub type GameRng = Xoshiro256PlusPlus;

/// Builds the session RNG; `None` draws a seed from the OS.
pub fn game_rng(seed: Option<u64>) -> GameRng {
    match seed {
        Some(seed) => GameRng::seed_from_u64(seed),
        None => GameRng::from_entropy(),
    }
}

/// Digits the player may use this round. Unique and sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyphBank(Vec<char>);

impl GlyphBank {
    /// Builds a bank from arbitrary digits, dropping non-digits and duplicates.
    pub fn new(glyphs: impl IntoIterator<Item = char>) -> Self {
        let mut digits: Vec<char> = glyphs.into_iter().filter(|c| c.is_ascii_digit()).collect();
        digits.sort_unstable();
        digits.dedup();
        Self(digits)
    }

    pub fn contains(&self, glyph: char) -> bool {
        self.0.binary_search(&glyph).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.0
    }

    /// Numerically highest glyph, or 0 for an empty bank
    pub fn highest(&self) -> u32 {
        self.0
            .iter()
            .filter_map(|c| c.to_digit(10))
            .max()
            .unwrap_or(0)
    }
}

/// Glyph bank and target for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSpec {
    pub glyphs: GlyphBank,
    pub target: i32,
}

impl RoundSpec {
    pub fn generate<R: Rng + ?Sized>(level: f64, stage: u32, rng: &mut R) -> Self {
        let glyphs = select_glyphs(level, stage, rng);
        let target = craft_target(&glyphs, stage, rng);
        debug!(
            glyphs = ?glyphs.as_slice(),
            target,
            level,
            stage,
            "Generated round"
        );
        Self { glyphs, target }
    }
}

/// Bank size for a level/stage: grows by one every two levels and every two
/// stages past the first, clamped to [MIN_GLYPHS, MAX_GLYPHS].
pub fn glyph_count(level: f64, stage: u32) -> usize {
    let from_level = (level / 2.0).floor().max(0.0) as usize;
    let from_stage = (stage.saturating_sub(1) / 2) as usize;
    (BASE_GLYPHS + from_level + from_stage).clamp(MIN_GLYPHS, MAX_GLYPHS)
}

/// Draws distinct digits without replacement and sorts them.
pub fn select_glyphs<R: Rng + ?Sized>(level: f64, stage: u32, rng: &mut R) -> GlyphBank {
    let count = glyph_count(level, stage);
    let chosen = DIGITS.choose_multiple(rng, count).copied();
    GlyphBank::new(chosen)
}

/// Operators available to the target crafter at a stage
pub fn crafting_operators(stage: u32) -> Vec<Operator> {
    let mut ops = vec![Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];
    if stage >= POWER_GLYPH_STAGE {
        ops.push(Operator::Pow);
    }
    ops
}

/// Builds an alternating digit/operator expression over the bank.
///
/// Token count is `3 + [0, 3 + extra)` with `extra = min(3, stage / 2)`; a
/// trailing operator gets one more digit so the expression always closes on
/// a digit.
pub fn craft_expression<R: Rng + ?Sized>(glyphs: &GlyphBank, stage: u32, rng: &mut R) -> String {
    let ops = crafting_operators(stage);
    let extra = (stage / 2).min(3) as usize;
    let length = CRAFT_BASE_TOKENS + rng.gen_range(0..3 + extra);

    let mut expression = String::new();
    let mut last_was_operator = true;
    for _ in 0..length {
        if last_was_operator {
            if let Some(digit) = glyphs.as_slice().choose(rng) {
                expression.push(*digit);
            }
            last_was_operator = false;
        } else if let Some(op) = ops.choose(rng) {
            expression.push(op.display_glyph());
            last_was_operator = true;
        }
    }
    if last_was_operator {
        if let Some(digit) = glyphs.as_slice().choose(rng) {
            expression.push(*digit);
        }
    }
    expression
}

/// Produces a round target in [TARGET_MIN, TARGET_MAX].
///
/// Degenerate crafts (division by zero, empty bank) fall back to a uniform
/// value in [FALLBACK_TARGET_MIN, FALLBACK_TARGET_MAX], which need not be
/// reachable from the bank.
pub fn craft_target<R: Rng + ?Sized>(glyphs: &GlyphBank, stage: u32, rng: &mut R) -> i32 {
    let crafted = craft_expression(glyphs, stage, rng);
    match expression::evaluate(&crafted) {
        Ok(value) => clamp_target(value),
        Err(err) => {
            debug!(expression = %crafted, %err, "Degenerate target craft, using fallback");
            rng.gen_range(FALLBACK_TARGET_MIN..=FALLBACK_TARGET_MAX)
        }
    }
}

/// Rounds half up and clamps into the target range.
pub fn clamp_target(value: f64) -> i32 {
    round_half_up(value).clamp(TARGET_MIN as f64, TARGET_MAX as f64) as i32
}
