//! Essence scoring, streaks and level progression.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::*;

/// Score, streak and (fractional) level of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub score: u64,
    pub streak: u32,
    /// Never below 1. Only the floor is shown to the player.
    pub level: f64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            score: 0,
            streak: 0,
            level: 1.0,
        }
    }
}

/// Everything that went into a winning cast's essence gain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub base: f64,
    pub combo_multiplier: f64,
    pub complexity_multiplier: f64,
    pub all_glyphs_used: bool,
    pub sigil_complete: bool,
    /// round(base * combo * complexity)
    pub gain: u64,
    pub sigil_bonus: u64,
    pub total_gain: u64,
}

impl RewardBreakdown {
    /// Computes the gain for a cast at `level`.
    ///
    /// `expression_len` is the character count of the cast as typed;
    /// `sigil_bonus` only counts when `sigil_complete` is set.
    pub fn compute(
        level: f64,
        all_glyphs_used: bool,
        expression_len: usize,
        sigil_complete: bool,
        sigil_bonus: u64,
    ) -> Self {
        let base = BASE_ESSENCE + ESSENCE_PER_LEVEL * level;
        let combo_multiplier = if all_glyphs_used {
            COMBO_BASE + COMBO_PER_LEVEL * level
        } else {
            1.0
        };
        let complexity_multiplier =
            (1.0 + expression_len as f64 / COMPLEXITY_DIVISOR).min(COMPLEXITY_CAP);
        let gain = round_half_up(base * combo_multiplier * complexity_multiplier).max(0.0) as u64;
        let sigil_bonus = if sigil_complete { sigil_bonus } else { 0 };

        Self {
            base,
            combo_multiplier,
            complexity_multiplier,
            all_glyphs_used,
            sigil_complete,
            gain,
            sigil_bonus,
            total_gain: gain + sigil_bonus,
        }
    }

    /// Bonus labels shown with the cast in the chronicle
    pub fn tags(&self) -> Vec<String> {
        let mut tags = Vec::new();
        if self.all_glyphs_used {
            tags.push(format!("All glyphs ×{:.2}", self.combo_multiplier));
        }
        if self.complexity_multiplier > 1.0 {
            tags.push("Complexity boost".to_string());
        }
        if self.sigil_complete {
            tags.push("Sigil honored".to_string());
        }
        tags
    }

    /// One-line summary for the hint and chronicle
    pub fn summary(&self) -> String {
        let tags = self.tags();
        if tags.is_empty() {
            format!("Spell lands! +{} essence.", self.total_gain)
        } else {
            format!("Spell lands! +{} essence ({}).", self.total_gain, tags.join(", "))
        }
    }
}

impl Progression {
    /// Level as shown to the player
    pub fn display_level(&self) -> u32 {
        self.level.floor().max(1.0) as u32
    }

    /// Banks a win. Returns true when the streak earned a level.
    pub fn apply_reward(&mut self, reward: &RewardBreakdown) -> bool {
        self.score += reward.total_gain;
        self.streak += 1;
        let leveled = self.streak % STREAK_PER_LEVEL == 0;
        if leveled {
            self.level += 1.0;
        }
        debug!(
            score = self.score,
            streak = self.streak,
            level = self.level,
            "Reward applied"
        );
        leveled
    }

    /// Resets the streak and shaves a quarter level (never below 1).
    pub fn apply_penalty(&mut self) {
        self.streak = 0;
        self.level = (self.level - FAILURE_LEVEL_PENALTY).max(1.0);
        debug!(level = self.level, "Penalty applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_cast_gain() {
        // level 1, "2+3+5": not every glyph of a four-glyph bank used
        let r = RewardBreakdown::compute(1.0, false, 5, false, 157);
        assert_eq!(r.base, 162.0);
        assert_eq!(r.combo_multiplier, 1.0);
        assert_eq!(r.complexity_multiplier, 1.625);
        assert_eq!(r.gain, 263);
        assert_eq!(r.sigil_bonus, 0);
        assert_eq!(r.total_gain, 263);
    }

    #[test]
    fn test_all_glyphs_combo() {
        let r = RewardBreakdown::compute(1.0, true, 8, false, 0);
        // 162 * 1.65 * 2.0
        assert_eq!(r.gain, 535);
        assert!(r.tags().contains(&"All glyphs ×1.65".to_string()));
    }

    #[test]
    fn test_complexity_capped() {
        let r = RewardBreakdown::compute(1.0, false, 40, false, 0);
        assert_eq!(r.complexity_multiplier, 3.0);
        assert_eq!(r.gain, 486);
    }

    #[test]
    fn test_sigil_bonus_added() {
        let r = RewardBreakdown::compute(1.0, false, 5, true, 157);
        assert_eq!(r.total_gain, 263 + 157);
        assert_eq!(
            r.summary(),
            "Spell lands! +420 essence (Complexity boost, Sigil honored)."
        );
    }

    #[test]
    fn test_streak_levels_every_third() {
        let mut p = Progression::default();
        let r = RewardBreakdown::compute(1.0, false, 3, false, 0);
        assert!(!p.apply_reward(&r));
        assert!(!p.apply_reward(&r));
        assert!(p.apply_reward(&r));
        assert_eq!(p.level, 2.0);
        assert_eq!(p.streak, 3);
        assert!(!p.apply_reward(&r));
        assert!(!p.apply_reward(&r));
        assert!(p.apply_reward(&r));
        assert_eq!(p.level, 3.0);
    }

    #[test]
    fn test_penalty_floor_and_hidden_fraction() {
        let mut p = Progression {
            score: 500,
            streak: 2,
            level: 2.0,
        };
        p.apply_penalty();
        assert_eq!(p.streak, 0);
        assert_eq!(p.level, 1.75);
        assert_eq!(p.display_level(), 1);
        assert_eq!(p.score, 500);

        for _ in 0..10 {
            p.apply_penalty();
        }
        assert_eq!(p.level, 1.0);
        assert_eq!(p.display_level(), 1);
    }

    #[test]
    fn test_level_up_keeps_fraction() {
        let mut p = Progression {
            score: 0,
            streak: 2,
            level: 1.75,
        };
        let r = RewardBreakdown::compute(p.level, false, 3, false, 0);
        p.apply_reward(&r);
        assert_eq!(p.level, 2.75);
        assert_eq!(p.display_level(), 2);
    }
}
