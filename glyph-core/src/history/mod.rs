//! The chronicle: a short, newest-first log of casts and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::DEFAULT_HISTORY_CAPACITY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryEntry {
    Spell {
        expression: String,
        /// Absent when the cast never produced a number
        result: Option<f64>,
        success: bool,
        message: String,
        tags: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    Event {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl HistoryEntry {
    pub fn spell(
        expression: impl Into<String>,
        result: Option<f64>,
        success: bool,
        message: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let expression = expression.into();
        Self::Spell {
            // empty casts still get a visible row
            expression: if expression.is_empty() {
                "—".to_string()
            } else {
                expression
            },
            result: result.filter(|r| r.is_finite()),
            success,
            message: message.into(),
            tags,
            timestamp: Utc::now(),
        }
    }

    pub fn event(message: impl Into<String>) -> Self {
        Self::Event {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Spell { message, .. } | Self::Event { message, .. } => message,
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, Self::Event { .. })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Spell { timestamp, .. } | Self::Event { timestamp, .. } => *timestamp,
        }
    }
}

/// Bounded log; pushing past capacity drops the oldest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chronicle {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for Chronicle {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl Chronicle {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
