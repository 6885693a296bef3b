//! Read model pushed to frontends after every state change.

use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactKind;
use crate::history::HistoryEntry;

/// Anything that can draw a session snapshot
pub trait SessionView {
    fn present(&mut self, snapshot: &SessionSnapshot);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub active: bool,
    pub score: u64,
    pub streak: u32,
    /// Floored level, never below 1
    pub level: u32,
    pub stage: u32,
    /// `None` until the first round is generated
    pub target: Option<i32>,
    pub glyphs: Vec<GlyphView>,
    pub expression: String,
    pub timer: TimerView,
    pub encounter: Option<EncounterView>,
    pub sigil: SigilView,
    pub artifacts: Vec<ArtifactView>,
    /// Newest first
    pub history: Vec<HistoryEntry>,
    pub hint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphView {
    pub glyph: char,
    pub used: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub seconds_left: u32,
    pub remaining: f64,
    pub limit: f64,
    pub ratio: f64,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterView {
    pub name: String,
    pub lore: String,
    pub stage: u32,
    pub health: u32,
    pub max_health: u32,
    pub health_ratio: f64,
    pub health_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigilView {
    pub id: Option<String>,
    pub text: String,
    pub reward: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactView {
    pub kind: ArtifactKind,
    pub count: u32,
    /// Session active and at least one charge left
    pub available: bool,
}
