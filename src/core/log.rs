//! Append-only match log.
//!
//! The log is what players read. Every entry is mirrored to `tracing` at
//! debug level so operators see the same stream.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::Phase;
use super::player::SideId;

/// Who may read a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    /// Only the given side sees the message (e.g. insight peeks).
    Private(SideId),
}

impl Visibility {
    #[must_use]
    pub fn visible_to(self, viewer: SideId) -> bool {
        match self {
            Visibility::Public => true,
            Visibility::Private(side) => side == viewer,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub seq: u64,
    pub turn: u32,
    pub phase: Phase,
    pub visibility: Visibility,
    pub message: String,
}

/// Persistent, append-only log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MatchLog {
    entries: Vector<LogEntry>,
}

impl MatchLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a public entry.
    pub fn push(&mut self, turn: u32, phase: Phase, message: impl Into<String>) {
        self.append(turn, phase, Visibility::Public, message.into());
    }

    /// Append an entry only `side` can read.
    pub fn push_private(&mut self, side: SideId, turn: u32, phase: Phase, message: impl Into<String>) {
        self.append(turn, phase, Visibility::Private(side), message.into());
    }

    fn append(&mut self, turn: u32, phase: Phase, visibility: Visibility, message: String) {
        let seq = self.entries.len() as u64;
        tracing::debug!(seq, turn, %phase, ?visibility, "{message}");
        self.entries.push_back(LogEntry {
            seq,
            turn,
            phase,
            visibility,
            message,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// The last `n` entries `viewer` may read, oldest first.
    #[must_use]
    pub fn tail_for(&self, viewer: SideId, n: usize) -> Vec<LogEntry> {
        let mut tail: Vec<LogEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|entry| entry.visibility.visible_to(viewer))
            .take(n)
            .cloned()
            .collect();
        tail.reverse();
        tail
    }
}
