//! Edge case & boundary tests
//!
//! Behavior at system boundaries:
//! - Nesting exactly at and one past the parser limit
//! - Very long, empty and whitespace-only expressions
//! - Overflowing powers, huge stages, huge gains
//! - Degenerate configs (tiny history, zero-length rounds)
//! - Junk input reaching a live session

use glyph_core::constants::*;
use glyph_core::encounter::{accelerated_base_time, cast_damage, Encounter};
use glyph_core::expression::{evaluate, format_number, EvalError, MAX_NESTING};
use glyph_core::generation::{game_rng, glyph_count, select_glyphs, GlyphBank};
use glyph_core::history::{Chronicle, HistoryEntry};
use glyph_core::sigil::SigilKind;
use glyph_core::timer::{round_time_limit, Countdown, CountdownStatus};
use glyph_core::{CastError, CastOutcome, GameSession, SessionConfig};

// ============================================================
// 1. Evaluator limits
// ============================================================

#[test]
fn nesting_at_limit_is_accepted() {
    let text = format!("{}7{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
    assert_eq!(evaluate(&text), Ok(7.0));
}

#[test]
fn nesting_past_limit_is_malformed() {
    let text = format!("{}7{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
    assert_eq!(evaluate(&text), Err(EvalError::Malformed));
}

#[test]
fn unbounded_nesting_never_overflows_stack() {
    let text = "(".repeat(100_000);
    assert_eq!(evaluate(&text), Err(EvalError::Malformed));
    let signs = format!("{}1", "-".repeat(100_000));
    assert_eq!(evaluate(&signs), Err(EvalError::Malformed));
}

#[test]
fn unary_chain_at_limit() {
    let even = format!("{}1", "-".repeat(MAX_NESTING));
    assert_eq!(evaluate(&even), Ok(1.0));
}

#[test]
fn long_flat_sum() {
    let text = vec!["1"; 10_000].join("+");
    assert_eq!(evaluate(&text), Ok(10_000.0));
}

#[test]
fn blank_expressions_are_malformed() {
    assert_eq!(evaluate(""), Err(EvalError::Malformed));
    assert_eq!(evaluate("   "), Err(EvalError::Malformed));
    assert_eq!(evaluate("\t\n"), Err(EvalError::Malformed));
}

#[test]
fn overflowing_power_is_non_finite() {
    assert_eq!(evaluate("9^9^9"), Err(EvalError::NonFinite));
    assert_eq!(evaluate("-(9^9^9)"), Err(EvalError::NonFinite));
}

#[test]
fn tiny_results_still_finite() {
    assert_eq!(evaluate("9^-9^9"), Ok(0.0));
}

#[test]
fn first_illegal_character_is_reported() {
    assert_eq!(evaluate("1+é+#"), Err(EvalError::IllegalGlyph('é')));
    assert_eq!(evaluate("3%2"), Err(EvalError::IllegalGlyph('%')));
}

#[test]
fn format_number_extremes() {
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(120.0), "120");
    assert_eq!(format_number(-2.25), "-2.25");
}

// ============================================================
// 2. Generation & encounter boundaries
// ============================================================

#[test]
fn glyph_count_saturates() {
    assert_eq!(glyph_count(1.0, 1), BASE_GLYPHS);
    assert_eq!(glyph_count(1_000.0, 1_000), MAX_GLYPHS);
}

#[test]
fn max_size_bank_is_distinct() {
    let bank = select_glyphs(1_000.0, 1_000, &mut game_rng(Some(1)));
    assert_eq!(bank.len(), MAX_GLYPHS);
    let mut seen = bank.as_slice().to_vec();
    seen.dedup();
    assert_eq!(seen.len(), MAX_GLYPHS);
}

#[test]
fn empty_bank_highest_is_zero() {
    let bank = GlyphBank::new("abc".chars());
    assert!(bank.is_empty());
    assert_eq!(bank.highest(), 0);
    assert!(SigilKind::HighestGlyph.check("10", 10.0, &bank));
}

#[test]
fn huge_stage_encounter() {
    let encounter = Encounter::for_stage(u32::MAX);
    assert!(encounter.max_health >= MIN_ENCOUNTER_HEALTH);
    assert_eq!(
        accelerated_base_time(DEFAULT_BASE_TIME_SECS, DEFAULT_MIN_BASE_TIME_SECS, u32::MAX),
        DEFAULT_MIN_BASE_TIME_SECS + 3.0
    );
}

#[test]
fn stage_zero_treated_as_first() {
    assert_eq!(Encounter::for_stage(0).name, "Fractal Wisp");
}

#[test]
fn overkill_saturates() {
    let mut encounter = Encounter::for_stage(1);
    let report = encounter.apply_damage(u32::MAX);
    assert_eq!(report.dealt, encounter.max_health);
    assert!(report.defeated_now);

    let again = encounter.apply_damage(50);
    assert_eq!(again.dealt, 0);
    assert!(!again.defeated_now);
}

#[test]
fn huge_gain_damage_saturates() {
    assert_eq!(cast_damage(u64::MAX, true, u64::MAX), u32::MAX);
    assert_eq!(cast_damage(0, false, 999), MIN_CAST_DAMAGE);
}

// ============================================================
// 3. Timer & history boundaries
// ============================================================

#[test]
fn round_limit_floor_with_many_rounds() {
    assert_eq!(round_time_limit(35.0, 1.0, u32::MAX), MIN_ROUND_TIME_SECS);
    assert_eq!(round_time_limit(35.0, 100.0, 0), MIN_ROUND_TIME_SECS);
}

#[test]
fn zero_length_countdown_expires_on_first_tick() {
    let mut countdown = Countdown::default();
    countdown.arm(0.0);
    assert_eq!(countdown.advance(0.0), CountdownStatus::Expired);
    assert_eq!(countdown.advance(1.0), CountdownStatus::Idle);
    assert_eq!(countdown.ratio(), 0.0);
}

#[test]
fn unarmed_countdown_is_idle() {
    let mut countdown = Countdown::default();
    assert_eq!(countdown.advance(10.0), CountdownStatus::Idle);
    assert_eq!(countdown.display_seconds(), 0);
}

#[test]
fn chronicle_of_one() {
    let mut chronicle = Chronicle::with_capacity(1);
    chronicle.push(HistoryEntry::event("first"));
    chronicle.push(HistoryEntry::event("second"));
    assert_eq!(chronicle.len(), 1);
    assert_eq!(chronicle.latest().map(|e| e.message()), Some("second"));
}

#[test]
fn empty_expression_gets_placeholder() {
    match HistoryEntry::spell("", Some(f64::NAN), false, "x", Vec::new()) {
        HistoryEntry::Spell {
            expression, result, ..
        } => {
            assert_eq!(expression, "—");
            assert_eq!(result, None);
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================
// 4. Session boundaries
// ============================================================

#[test]
fn session_history_respects_config() {
    let config = SessionConfig {
        history_capacity: 2,
        ..SessionConfig::with_seed(4)
    };
    let mut session = GameSession::new(config);
    session.start();
    for _ in 0..5 {
        session.input('#');
        session.cast();
        session.clear();
    }
    assert_eq!(session.state().history.len(), 2);
}

#[test]
fn junk_input_surfaces_as_hint() {
    let mut session = GameSession::new(SessionConfig::with_seed(4));
    session.start();
    session.input_str("2é");

    let outcome = session.cast();
    assert_eq!(outcome, CastOutcome::Failure(CastError::IllegalGlyph('é')));
    assert_eq!(session.state().hint, "Unknown glyph detected.");
    assert_eq!(session.state().round_count, 1);
}

#[test]
fn whitespace_cast_is_ignored() {
    let mut session = GameSession::new(SessionConfig::with_seed(4));
    session.start();
    session.input_str("   ");
    let history = session.state().history.len();

    assert_eq!(session.cast(), CastOutcome::Ignored);
    assert_eq!(session.state().history.len(), history);
    assert_eq!(session.state().progression.streak, 0);
}

#[test]
fn huge_tick_expires_exactly_one_round() {
    let mut session = GameSession::new(SessionConfig::with_seed(4));
    session.start();
    assert_eq!(session.tick(1e9), CountdownStatus::Expired);
    assert_eq!(session.state().round_count, 2);
    assert!(session.state().countdown.is_running());
}
