//! Glyphcast - Core Game Library
//!
//! This crate holds the complete, frontend-agnostic rules of Glyphcast, a timed
//! arithmetic puzzle game:
//! - Expression evaluator (+ − × ÷ ^ and parentheses, no eval)
//! - Round generation (glyph banks and reachable targets)
//! - Sigil side objectives
//! - Essence scoring, streaks and levels
//! - Encounters, stages and artifact rewards
//! - Round countdown
//! - Game session orchestration and snapshots for views

pub mod artifacts;
pub mod config;
pub mod constants;
pub mod encounter;
pub mod expression;
pub mod generation;
pub mod history;
pub mod logging;
pub mod scoring;
pub mod session;
pub mod sigil;
pub mod timer;

pub use config::{ConfigError, SessionConfig};
pub use expression::{evaluate, EvalError};
pub use session::{CastError, CastOutcome, Command, GameSession, SessionSnapshot, SessionView};
