use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactKind;

/// Discrete events a frontend sends into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Start, or restart from scratch
    Start,
    /// Append one glyph to the expression
    Input { token: char },
    Undo,
    Clear,
    Cast,
    UseArtifact { kind: ArtifactKind },
}
