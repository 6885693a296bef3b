//! Game session: owns the game state and runs every event against it.
//!
//! Flow of a cast:
//!   evaluate → bank check → target match → sigil → scoring → encounter damage
//!   → (victory → next stage) | next round
//!
//! Every handler runs to completion on `&mut self`; the frontend decides when
//! to call [`GameSession::tick`] and when to render [`GameSession::snapshot`].

mod command;
mod outcome;
mod snapshot;

pub use command::Command;
pub use outcome::{CastError, CastOutcome, CastReport};
pub use snapshot::{
    ArtifactView, EncounterView, GlyphView, SessionSnapshot, SessionView, SigilView, TimerView,
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::artifacts::{stabilized_time, ArtifactCounts, ArtifactKind};
use crate::config::SessionConfig;
use crate::constants::TARGET_EPSILON;
use crate::encounter::{accelerated_base_time, cast_damage, DamageReport, Encounter};
use crate::expression::{self, DIVIDE, TIMES};
use crate::generation::{game_rng, GameRng, GlyphBank, RoundSpec};
use crate::history::{Chronicle, HistoryEntry};
use crate::scoring::{Progression, RewardBreakdown};
use crate::sigil::{self, SigilKind};
use crate::timer::{round_time_limit, Countdown, CountdownStatus};

const IDLE_HINT: &str = "Ready when you are. Start casting to begin.";
const ROUND_HINT: &str = "Compose a spell that resolves to the target glyph.";
const EMPTY_CAST_HINT: &str = "Craft an expression before casting.";
const STABILIZE_HINT: &str = "Time stabilizes, granting you a breath.";
const RESHUFFLE_HINT: &str = "You reforge the glyphs into a fresh arrangement.";
const IDLE_SIGIL_TEXT: &str = "Complete a cast to reveal the realm.";
const IDLE_SIGIL_NOTE: &str = "Bonus ready.";

const RITUAL_EVENT: &str = "A new ritual begins.";
const TIMEOUT_EVENT: &str = "The temporal meter collapsed! The rift surges.";
const STABILIZE_EVENT: &str = "Used Stabilize Flow to reclaim a few precious moments.";
const RESHUFFLE_EVENT: &str = "Reforged the glyph bank for a new opportunity.";

/// The whole mutable state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub active: bool,
    pub progression: Progression,
    pub stage: u32,
    /// Round time before level/round deductions
    pub base_time: f64,
    pub countdown: Countdown,
    pub target: i32,
    pub glyphs: GlyphBank,
    pub expression: String,
    /// Digits in `expression`; rebuilt on every edit
    pub digits_used: BTreeSet<char>,
    /// Rounds since the current encounter appeared
    pub round_count: u32,
    pub encounter: Option<Encounter>,
    pub sigil: Option<SigilKind>,
    pub sigil_bonus: u64,
    pub sigil_note: String,
    pub artifacts: ArtifactCounts,
    pub history: Chronicle,
    pub hint: String,
}

impl GameState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            active: false,
            progression: Progression::default(),
            stage: 1,
            base_time: config.base_time_secs,
            countdown: Countdown::default(),
            target: 0,
            glyphs: GlyphBank::default(),
            expression: String::new(),
            digits_used: BTreeSet::new(),
            round_count: 0,
            encounter: None,
            sigil: None,
            sigil_bonus: 0,
            sigil_note: IDLE_SIGIL_NOTE.to_string(),
            artifacts: ArtifactCounts::default(),
            history: Chronicle::with_capacity(config.history_capacity),
            hint: IDLE_HINT.to_string(),
        }
    }

    fn recompute_digits_used(&mut self) {
        self.digits_used = self
            .expression
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
    }

    /// Every glyph in the bank appears in the expression
    pub fn all_glyphs_used(&self) -> bool {
        self.glyphs.iter().all(|g| self.digits_used.contains(&g))
    }
}

pub struct GameSession<R = GameRng> {
    config: SessionConfig,
    state: GameState,
    rng: R,
}

impl GameSession<GameRng> {
    /// Session seeded from `config.seed` (or the OS when unset)
    pub fn new(config: SessionConfig) -> Self {
        let rng = game_rng(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(config: SessionConfig, rng: R) -> Self {
        let state = GameState::new(&config);
        Self { config, state, rng }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    // =====================================================
    // Input events
    // =====================================================

    /// Resets everything and opens the first encounter and round.
    pub fn start(&mut self) {
        self.state = GameState::new(&self.config);
        self.state.active = true;
        self.log_event(RITUAL_EVENT);
        info!(seed = ?self.config.seed, "Session started");
        self.setup_encounter();
        self.next_challenge(true);
    }

    /// Appends one glyph. ASCII `*` and `/` become `×` and `÷`.
    pub fn input(&mut self, token: char) -> bool {
        if !self.state.active {
            return false;
        }
        let token = match token {
            '*' => TIMES,
            '/' => DIVIDE,
            other => other,
        };
        self.state.expression.push(token);
        if token.is_ascii_digit() {
            self.state.digits_used.insert(token);
        }
        true
    }

    pub fn input_str(&mut self, tokens: &str) -> bool {
        tokens.chars().all(|c| self.input(c))
    }

    /// Drops the last glyph and rebuilds the used-digit set.
    pub fn undo(&mut self) -> bool {
        if !self.state.active || self.state.expression.pop().is_none() {
            return false;
        }
        self.state.recompute_digits_used();
        true
    }

    pub fn clear(&mut self) {
        if !self.state.active {
            return;
        }
        self.state.expression.clear();
        self.state.digits_used.clear();
    }

    /// Submits the current expression against the target.
    pub fn cast(&mut self) -> CastOutcome {
        if !self.state.active || self.state.expression.trim().is_empty() {
            self.state.hint = EMPTY_CAST_HINT.to_string();
            return CastOutcome::Ignored;
        }

        let expression = self.state.expression.clone();
        let result = match expression::evaluate(&expression) {
            Ok(value) => value,
            Err(err) => return self.fail_cast(&expression, None, err.into()),
        };

        if let Some(stray) = expression
            .chars()
            .find(|c| c.is_ascii_digit() && !self.state.glyphs.contains(*c))
        {
            return self.fail_cast(&expression, Some(result), CastError::GlyphNotInBank(stray));
        }

        let target = self.state.target;
        if (result - target as f64).abs() >= TARGET_EPSILON {
            return self.fail_cast(
                &expression,
                Some(result),
                CastError::ValueMismatch { result, target },
            );
        }

        let sigil_complete = self.check_sigil(&expression, result);
        CastOutcome::Success(self.reward(expression, result, sigil_complete))
    }

    /// Spends an artifact charge. False (and no change) when inactive or out
    /// of charges.
    pub fn use_artifact(&mut self, kind: ArtifactKind) -> bool {
        if !self.state.active || !self.state.artifacts.try_consume(kind) {
            return false;
        }

        match kind {
            ArtifactKind::Stabilize => {
                let countdown = &mut self.state.countdown;
                let restored = stabilized_time(countdown.remaining(), countdown.limit());
                countdown.set_remaining(restored);
                self.state.hint = STABILIZE_HINT.to_string();
                self.log_event(STABILIZE_EVENT);
            }
            ArtifactKind::Reshuffle => {
                self.state.round_count = self.state.round_count.saturating_sub(1);
                self.next_challenge(false);
                self.state.hint = RESHUFFLE_HINT.to_string();
                self.log_event(RESHUFFLE_EVENT);
            }
        }
        info!(artifact = %kind, left = self.state.artifacts.get(kind), "Artifact used");
        true
    }

    /// Routes a frontend command. Returns the outcome for casts.
    pub fn dispatch(&mut self, command: Command) -> Option<CastOutcome> {
        match command {
            Command::Start => self.start(),
            Command::Input { token } => {
                self.input(token);
            }
            Command::Undo => {
                self.undo();
            }
            Command::Clear => self.clear(),
            Command::Cast => return Some(self.cast()),
            Command::UseArtifact { kind } => {
                self.use_artifact(kind);
            }
        }
        None
    }

    // =====================================================
    // Time
    // =====================================================

    /// Advances the round clock by `dt` seconds. On expiry the round counts
    /// as a failed cast and a new round begins.
    pub fn tick(&mut self, dt: f64) -> CountdownStatus {
        if !self.state.active {
            return CountdownStatus::Idle;
        }
        let status = self.state.countdown.advance(dt);
        if status == CountdownStatus::Expired {
            self.expire_round();
        }
        status
    }

    /// One scheduler tick of the configured interval
    pub fn tick_once(&mut self) -> CountdownStatus {
        self.tick(self.config.tick_slice_secs())
    }

    fn expire_round(&mut self) {
        let expression = self.state.expression.clone();
        self.fail_cast(&expression, None, CastError::Timeout);
        self.log_event(TIMEOUT_EVENT);
        self.next_challenge(true);
    }

    // =====================================================
    // Outcomes
    // =====================================================

    fn check_sigil(&self, expression: &str, result: f64) -> bool {
        self.state
            .sigil
            .is_some_and(|kind| kind.check(expression, result, &self.state.glyphs))
    }

    fn reward(&mut self, expression: String, result: f64, sigil_complete: bool) -> CastReport {
        let reward = RewardBreakdown::compute(
            self.state.progression.level,
            self.state.all_glyphs_used(),
            expression.chars().count(),
            sigil_complete,
            self.state.sigil_bonus,
        );
        let leveled_up = self.state.progression.apply_reward(&reward);

        if sigil_complete {
            self.state.sigil_note = sigil::HONORED_NOTE.to_string();
        }
        let summary = reward.summary();
        self.state.hint = summary.clone();
        self.state.history.push(HistoryEntry::spell(
            expression.clone(),
            Some(result),
            true,
            summary,
            reward.tags(),
        ));
        info!(
            expression = %expression,
            gain = reward.total_gain,
            streak = self.state.progression.streak,
            sigil = sigil_complete,
            "Cast succeeded"
        );

        let damage = self.apply_encounter_damage(reward.total_gain, sigil_complete);
        if damage.is_some_and(|d| d.defeated_now) {
            self.handle_victory();
        } else {
            self.next_challenge(true);
        }

        CastReport {
            expression,
            result,
            reward,
            leveled_up,
            damage,
        }
    }

    fn fail_cast(&mut self, expression: &str, result: Option<f64>, error: CastError) -> CastOutcome {
        self.state.hint = error.to_string();
        self.state.history.push(HistoryEntry::spell(
            expression,
            result,
            false,
            error.chronicle_message(),
            Vec::new(),
        ));
        self.state.progression.apply_penalty();
        info!(expression = %expression, %error, level = self.state.progression.level, "Cast failed");
        CastOutcome::Failure(error)
    }

    fn apply_encounter_damage(&mut self, total_gain: u64, sigil_complete: bool) -> Option<DamageReport> {
        let damage = cast_damage(total_gain, sigil_complete, self.state.sigil_bonus);
        let encounter = self.state.encounter.as_mut()?;
        let report = encounter.apply_damage(damage);
        debug!(
            encounter = %encounter.name,
            dealt = report.dealt,
            remaining = report.remaining,
            "Encounter hit"
        );
        Some(report)
    }

    fn handle_victory(&mut self) {
        let Some(defeated) = self.state.encounter.take() else {
            return;
        };
        self.log_event(&format!("{} stabilized. Spoils resonate!", defeated.name));
        self.state.artifacts.grant(&defeated.rewards);
        self.state.stage += 1;
        self.state.round_count = 0;
        self.state.base_time = accelerated_base_time(
            self.config.base_time_secs,
            self.config.min_base_time_secs,
            self.state.stage,
        );
        info!(
            stage = self.state.stage,
            base_time = self.state.base_time,
            "Stage advanced"
        );
        self.setup_encounter();
        self.next_challenge(true);
        self.state.hint = format!("The realm steadies. Prepare for Stage {}.", self.state.stage);
    }

    // =====================================================
    // Round & stage setup
    // =====================================================

    fn setup_encounter(&mut self) {
        let encounter = Encounter::for_stage(self.state.stage);
        debug!(name = %encounter.name, health = encounter.max_health, "Encounter ready");
        self.state.encounter = Some(encounter);
    }

    /// Generates a fresh bank, target and sigil and re-arms the clock.
    /// `advance_round` is false for reshuffles, which must not age the stage.
    fn next_challenge(&mut self, advance_round: bool) {
        if advance_round {
            self.state.round_count += 1;
        }
        let level = self.state.progression.level;
        let stage = self.state.stage;

        let round = RoundSpec::generate(level, stage, &mut self.rng);
        self.state.glyphs = round.glyphs;
        self.state.target = round.target;
        self.state.expression.clear();
        self.state.digits_used.clear();

        let (kind, bonus) = sigil::assign_sigil(level, stage, &mut self.rng);
        self.state.sigil = Some(kind);
        self.state.sigil_bonus = bonus;
        self.state.sigil_note = sigil::reward_note(bonus);

        self.state.hint = ROUND_HINT.to_string();
        let limit = round_time_limit(self.state.base_time, level, self.state.round_count);
        self.state.countdown.arm(limit);
    }

    fn log_event(&mut self, message: &str) {
        self.state.history.push(HistoryEntry::event(message));
    }

    // =====================================================
    // Read model
    // =====================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = &self.state;
        let countdown = &state.countdown;

        SessionSnapshot {
            active: state.active,
            score: state.progression.score,
            streak: state.progression.streak,
            level: state.progression.display_level(),
            stage: state.stage,
            target: (!state.glyphs.is_empty()).then_some(state.target),
            glyphs: state
                .glyphs
                .iter()
                .map(|glyph| GlyphView {
                    glyph,
                    used: state.digits_used.contains(&glyph),
                })
                .collect(),
            expression: state.expression.clone(),
            timer: TimerView {
                seconds_left: countdown.display_seconds(),
                remaining: countdown.remaining().max(0.0),
                limit: countdown.limit(),
                ratio: countdown.ratio(),
                running: countdown.is_running(),
            },
            encounter: state.encounter.as_ref().map(|e| EncounterView {
                name: e.name.clone(),
                lore: e.lore.clone(),
                stage: state.stage,
                health: e.health,
                max_health: e.max_health,
                health_ratio: e.health_ratio(),
                health_label: e.health_label(),
            }),
            sigil: SigilView {
                id: state.sigil.map(|k| k.id().to_string()),
                text: state
                    .sigil
                    .map(|k| k.text().to_string())
                    .unwrap_or_else(|| IDLE_SIGIL_TEXT.to_string()),
                reward: state.sigil_note.clone(),
            },
            artifacts: ArtifactKind::ALL
                .iter()
                .map(|&kind| {
                    let count = state.artifacts.get(kind);
                    ArtifactView {
                        kind,
                        count,
                        available: state.active && count > 0,
                    }
                })
                .collect(),
            history: state.history.iter().cloned().collect(),
            hint: state.hint.clone(),
        }
    }

    /// Pushes the current snapshot to a view.
    pub fn present_to<V: SessionView + ?Sized>(&self, view: &mut V) {
        view.present(&self.snapshot());
    }
}
