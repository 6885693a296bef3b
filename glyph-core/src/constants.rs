//! Centralized tuning constants for the glyphcast core.
//!
//! Formulas in scoring, encounters and round generation read from here so the
//! balance numbers live in one place. Catalog data (encounter deck, sigil
//! texts) stays in the owning module.

// =====================================================
// Glyph bank & targets
// =====================================================

/// Every digit a glyph bank can draw from, in ascending order
pub const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Smallest glyph bank handed to the player
pub const MIN_GLYPHS: usize = 3;

/// Largest glyph bank handed to the player
pub const MAX_GLYPHS: usize = 9;

/// Bank size before level/stage growth
pub const BASE_GLYPHS: usize = 4;

/// Lowest target a round may carry
pub const TARGET_MIN: i32 = -99;

/// Highest target a round may carry
pub const TARGET_MAX: i32 = 120;

/// Fallback target range when the crafted expression is degenerate (inclusive)
pub const FALLBACK_TARGET_MIN: i32 = 10;
pub const FALLBACK_TARGET_MAX: i32 = 59;

/// Minimum token count of a crafted target expression
pub const CRAFT_BASE_TOKENS: usize = 3;

/// Stage at which the power glyph joins the crafting operator pool
pub const POWER_GLYPH_STAGE: u32 = 3;

/// Tolerance used when comparing a cast result against the target
pub const TARGET_EPSILON: f64 = 1e-9;

// =====================================================
// Scoring
// =====================================================

/// Essence base: BASE_ESSENCE + level * ESSENCE_PER_LEVEL
pub const BASE_ESSENCE: f64 = 140.0;
pub const ESSENCE_PER_LEVEL: f64 = 22.0;

/// Combo multiplier when every glyph is used: COMBO_BASE + level * COMBO_PER_LEVEL
pub const COMBO_BASE: f64 = 1.6;
pub const COMBO_PER_LEVEL: f64 = 0.05;

/// Complexity multiplier: min(COMPLEXITY_CAP, 1 + len / COMPLEXITY_DIVISOR)
pub const COMPLEXITY_CAP: f64 = 3.0;
pub const COMPLEXITY_DIVISOR: f64 = 8.0;

/// Consecutive wins needed for one level
pub const STREAK_PER_LEVEL: u32 = 3;

/// Level lost on each failed cast or timeout
pub const FAILURE_LEVEL_PENALTY: f64 = 0.25;

// =====================================================
// Sigils
// =====================================================

/// Sigil bonus: SIGIL_BASE_BONUS + level * SIGIL_BONUS_PER_LEVEL + stage * SIGIL_BONUS_PER_STAGE
pub const SIGIL_BASE_BONUS: f64 = 120.0;
pub const SIGIL_BONUS_PER_LEVEL: f64 = 25.0;
pub const SIGIL_BONUS_PER_STAGE: f64 = 12.0;

/// Operator glyphs needed for the threeOperators sigil
pub const SIGIL_OPERATOR_COUNT: usize = 3;

/// Non-whitespace characters needed for the lengthy sigil
pub const SIGIL_LENGTHY_CHARS: usize = 8;

// =====================================================
// Encounters
// =====================================================

/// Minimum damage of a successful cast
pub const MIN_CAST_DAMAGE: u32 = 12;

/// Essence-to-damage divisor
pub const DAMAGE_DIVISOR: f64 = 4.0;

/// Sigil-bonus-to-damage divisor
pub const SIGIL_DAMAGE_DIVISOR: f64 = 3.0;

/// Health scaling per full pass through the deck
pub const HEALTH_SCALE_PER_CYCLE: f64 = 0.4;

/// Health scaling per stage
pub const HEALTH_SCALE_PER_STAGE: f64 = 0.08;

/// Lowest max health any encounter can have
pub const MIN_ENCOUNTER_HEALTH: u32 = 80;

/// Largest base-time reduction earned through stages
pub const MAX_TIME_ACCELERATION: u32 = 12;

// =====================================================
// Timer & artifacts
// =====================================================

/// Seconds of base round time at stage 1
pub const DEFAULT_BASE_TIME_SECS: f64 = 35.0;

/// Floor for the base round time after stage acceleration
pub const DEFAULT_MIN_BASE_TIME_SECS: f64 = 20.0;

/// Lowest per-round time limit
pub const MIN_ROUND_TIME_SECS: f64 = 8.0;

/// Round time lost per (fractional) level
pub const TIME_PER_LEVEL: f64 = 1.5;

/// Scheduler tick interval
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Stabilize restores max(STABILIZE_MIN_SECS, round(limit * STABILIZE_RATIO))
pub const STABILIZE_MIN_SECS: f64 = 5.0;
pub const STABILIZE_RATIO: f64 = 0.35;

// =====================================================
// Chronicle
// =====================================================

/// Entries kept in the history log
pub const DEFAULT_HISTORY_CAPACITY: usize = 8;

/// Rounds half away from negative infinity (x.5 goes up), matching how the
/// game has always rounded its scores and targets.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
