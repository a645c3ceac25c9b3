use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// Bounded history of recent turns.
///
/// Holds at most `2 × memory_limit` turns; the oldest turns are dropped first.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<ConversationTurn>,
    memory_limit: usize,
}

impl ConversationMemory {
    /// Create an empty memory keeping `memory_limit` exchanges
    pub fn new(memory_limit: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(memory_limit.saturating_mul(2)),
            memory_limit,
        }
    }

    /// Append a turn, dropping the oldest turns beyond capacity.
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push_back(ConversationTurn {
            role,
            content: content.into(),
        });
        while self.turns.len() > self.capacity() {
            self.turns.pop_front();
        }
    }

    /// Maximum number of turns retained
    pub fn capacity(&self) -> usize {
        self.memory_limit.saturating_mul(2)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns from oldest to newest
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// Most recent turn
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }
}
