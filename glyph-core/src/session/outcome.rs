use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encounter::DamageReport;
use crate::expression::{format_number, EvalError};
use crate::scoring::RewardBreakdown;

/// Every way a cast (or a round) can fail. The display text is the hint the
/// player sees; none of these end the session.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum CastError {
    #[error("Unknown glyph detected.")]
    IllegalGlyph(char),
    #[error("The structure of the spell is unstable.")]
    Malformed,
    #[error("The incantation collapsed into infinity.")]
    NonFinite,
    #[error("Only digits from the glyph bank may be summoned.")]
    GlyphNotInBank(char),
    #[error("The spell resolved to {}, not {target}.", shown(.result))]
    ValueMismatch { result: f64, target: i32 },
    #[error("Time unraveled before the incantation completed.")]
    Timeout,
}

fn shown(value: &f64) -> String {
    format_number(*value)
}

impl From<EvalError> for CastError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::IllegalGlyph(c) => CastError::IllegalGlyph(c),
            EvalError::Malformed => CastError::Malformed,
            EvalError::NonFinite => CastError::NonFinite,
        }
    }
}

impl CastError {
    /// Message recorded in the chronicle (differs from the hint only for
    /// out-of-bank digits).
    pub fn chronicle_message(&self) -> String {
        match self {
            CastError::GlyphNotInBank(_) => "Illegal glyph usage.".to_string(),
            other => other.to_string(),
        }
    }
}

/// A winning cast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastReport {
    pub expression: String,
    pub result: f64,
    pub reward: RewardBreakdown,
    pub leveled_up: bool,
    /// `None` when no encounter was active
    pub damage: Option<DamageReport>,
}

impl CastReport {
    pub fn encounter_defeated(&self) -> bool {
        self.damage.is_some_and(|d| d.defeated_now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CastOutcome {
    /// Session inactive or nothing typed; only the hint changed
    Ignored,
    Success(CastReport),
    Failure(CastError),
}

impl CastOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CastOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&CastError> {
        match self {
            CastOutcome::Failure(err) => Some(err),
            _ => None,
        }
    }
}
