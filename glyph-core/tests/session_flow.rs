//! Whole-session flows driven only through the public API
//!
//! - Start → solve → encounter defeat → next stage
//! - Timeouts age the round and cost level
//! - Artifacts are inert without charges
//! - Config files feed straight into a session
//! - Snapshots serialize for JSON frontends

use glyph_core::artifacts::ArtifactKind;
use glyph_core::expression::evaluate;
use glyph_core::history::HistoryEntry;
use glyph_core::timer::CountdownStatus;
use glyph_core::{CastError, CastOutcome, Command, GameSession, SessionConfig};

// ============================================================
// Helpers
// ============================================================

const OPS: [char; 4] = ['+', '-', '×', '÷'];

/// Brute-forces a short expression over the bank that hits the target.
fn solve(glyphs: &[char], target: i32) -> Option<String> {
    let hits = |candidate: &str| {
        evaluate(candidate).is_ok_and(|v| (v - target as f64).abs() < 1e-9)
    };

    for &a in glyphs {
        let single = a.to_string();
        if hits(&single) {
            return Some(single);
        }
        for &b in glyphs {
            for op1 in OPS {
                let pair = format!("{a}{op1}{b}");
                if hits(&pair) {
                    return Some(pair);
                }
                for &c in glyphs {
                    for op2 in OPS {
                        let triple = format!("{a}{op1}{b}{op2}{c}");
                        if hits(&triple) {
                            return Some(triple);
                        }
                    }
                }
            }
        }
    }
    None
}

fn current_solution(session: &GameSession) -> Option<String> {
    let state = session.state();
    solve(state.glyphs.as_slice(), state.target)
}

/// Burns the clock until the round expires.
fn expire_round(session: &mut GameSession) {
    for _ in 0..10_000 {
        if session.tick_once() == CountdownStatus::Expired {
            return;
        }
    }
    panic!("round never expired");
}

// ============================================================
// Flows
// ============================================================

#[test]
fn flow_play_until_first_encounter_falls() {
    let mut session = GameSession::new(SessionConfig::with_seed(2024));
    session.start();

    let mut wins = 0;
    for _ in 0..300 {
        if session.state().stage > 1 {
            break;
        }
        match current_solution(&session) {
            Some(spell) => {
                session.input_str(&spell);
                let outcome = session.cast();
                assert!(outcome.is_success(), "{spell} should land: {outcome:?}");
                wins += 1;
            }
            None => expire_round(&mut session),
        }
    }

    let state = session.state();
    assert_eq!(state.stage, 2, "first encounter never fell");
    assert!(wins >= 1);
    assert!(state.progression.score > 0);
    assert_eq!(state.artifacts.get(ArtifactKind::Stabilize), 1);
    assert_eq!(state.round_count, 1);
    assert_eq!(state.base_time, 34.0);
    assert_eq!(
        state.encounter.as_ref().map(|e| e.name.as_str()),
        Some("Vector Hydra")
    );
    assert!(state
        .history
        .iter()
        .any(|e| e.message() == "Fractal Wisp stabilized. Spoils resonate!"));
}

#[test]
fn flow_timeouts_shorten_rounds() {
    let mut session = GameSession::new(SessionConfig::with_seed(7));
    session.start();
    let first_limit = session.state().countdown.limit();

    expire_round(&mut session);
    expire_round(&mut session);

    let state = session.state();
    assert_eq!(state.round_count, 3);
    assert_eq!(state.countdown.limit(), first_limit - 2.0);
    assert_eq!(state.progression.level, 1.0);
    assert_eq!(state.progression.streak, 0);

    let timeouts = state
        .history
        .iter()
        .filter(|e| matches!(e, HistoryEntry::Spell { success: false, .. }))
        .count();
    assert_eq!(timeouts, 2);
}

#[test]
fn flow_wrong_answer_then_retry() {
    let mut session = GameSession::new(SessionConfig::with_seed(99));
    session.start();

    let target = session.state().target;
    let round = session.state().round_count;
    let glyph = session.state().glyphs.as_slice()[0];

    // a lone glyph that misses the target
    if glyph.to_digit(10).map(|d| d as i32) != Some(target) {
        session.input(glyph);
        let outcome = session.cast();
        assert!(matches!(
            outcome.error(),
            Some(CastError::ValueMismatch { .. })
        ));
        assert_eq!(session.state().round_count, round);
        assert_eq!(session.state().expression, glyph.to_string());
        session.clear();
    }

    if let Some(spell) = current_solution(&session) {
        session.input_str(&spell);
        assert!(session.cast().is_success());
        assert_eq!(session.state().round_count, round + 1);
    }
}

#[test]
fn flow_artifacts_inert_without_charges() {
    let mut session = GameSession::new(SessionConfig::with_seed(3));
    session.start();
    let before = session.snapshot();

    assert!(session.dispatch(Command::UseArtifact {
        kind: ArtifactKind::Stabilize
    })
    .is_none());
    session.use_artifact(ArtifactKind::Reshuffle);

    assert_eq!(session.snapshot(), before);
}

#[test]
fn flow_commands_from_json() {
    let mut session = GameSession::new(SessionConfig::with_seed(12));
    let script = [
        r#"{"command":"start"}"#,
        r#"{"command":"input","token":"("}"#,
        r#"{"command":"input","token":"*"}"#,
        r#"{"command":"undo"}"#,
        r#"{"command":"cast"}"#,
    ];

    let mut last = None;
    for line in script {
        let command: Command = serde_json::from_str(line).unwrap();
        last = session.dispatch(command);
    }

    assert_eq!(session.state().expression, "(");
    assert!(matches!(
        last,
        Some(CastOutcome::Failure(CastError::Malformed))
    ));
}

#[test]
fn flow_snapshot_json() {
    let mut session = GameSession::new(SessionConfig::with_seed(5));
    session.start();
    let snapshot = session.snapshot();

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["active"], true);
    assert_eq!(value["stage"], 1);
    assert_eq!(value["glyphs"].as_array().unwrap().len(), 4);
    assert_eq!(value["encounter"]["name"], "Fractal Wisp");
    assert_eq!(value["history"][0]["type"], "event");
    assert_eq!(value["artifacts"][0]["kind"], "stabilize");
    assert!(value["sigil"]["id"].is_string());
}

#[test]
fn flow_config_file_drives_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.ron");
    std::fs::write(
        &path,
        "(base_time_secs: 50.0, min_base_time_secs: 30.0, seed: Some(77))",
    )
    .unwrap();

    let config = SessionConfig::load(&path).unwrap();
    let mut session = GameSession::new(config);
    session.start();

    // 50 - 1.5 * level 1 - round 1
    assert_eq!(session.state().countdown.limit(), 47.5);
    assert_eq!(session.config().seed, Some(77));
}

#[test]
fn flow_restart_mid_run() {
    let mut session = GameSession::new(SessionConfig::with_seed(31));
    session.start();
    expire_round(&mut session);
    session.input('1');

    session.dispatch(Command::Start);
    let state = session.state();
    assert_eq!(state.round_count, 1);
    assert_eq!(state.progression.score, 0);
    assert!(state.expression.is_empty());
    assert_eq!(state.history.len(), 1);
}
