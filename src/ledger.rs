// src/ledger.rs
//! Token ledger state machine.
//!
//! Every token carries two independent used-flags, one per question. The
//! flags only move from unused to used; the single way back is the
//! administrative bulk reset, which clears every token at once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PollError;

/// The two questions a token grants one answer each for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Question {
    Intention,
    Rejection,
}

impl Question {
    pub const ALL: [Question; 2] = [Question::Intention, Question::Rejection];

    pub fn as_str(self) -> &'static str {
        match self {
            Question::Intention => "intention",
            Question::Rejection => "rejection",
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Question {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intention" => Ok(Question::Intention),
            "rejection" => Ok(Question::Rejection),
            other => Err(PollError::UnknownQuestion(other.to_string())),
        }
    }
}

/// Raw flag pair as persisted for one token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenFlags {
    pub used_intention: bool,
    pub used_rejection: bool,
}

impl TokenFlags {
    pub fn is_used(&self, question: Question) -> bool {
        match question {
            Question::Intention => self.used_intention,
            Question::Rejection => self.used_rejection,
        }
    }

    /// Flips the flag for `question` if it is still unused. Returns whether
    /// the flag changed.
    pub fn try_mark(&mut self, question: Question) -> bool {
        if self.is_used(question) {
            return false;
        }
        match question {
            Question::Intention => self.used_intention = true,
            Question::Rejection => self.used_rejection = true,
        }
        true
    }
}

/// The four reachable ledger states. There is no ordering between the two
/// axes: either question may be answered first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    Fresh,
    IntentionOnly,
    RejectionOnly,
    Both,
}

impl TokenState {
    /// Whether `question` can still be answered in this state.
    pub fn is_open(self, question: Question) -> bool {
        match (self, question) {
            (TokenState::Fresh, _) => true,
            (TokenState::IntentionOnly, Question::Rejection) => true,
            (TokenState::RejectionOnly, Question::Intention) => true,
            _ => false,
        }
    }
}

impl From<TokenFlags> for TokenState {
    fn from(flags: TokenFlags) -> Self {
        match (flags.used_intention, flags.used_rejection) {
            (false, false) => TokenState::Fresh,
            (true, false) => TokenState::IntentionOnly,
            (false, true) => TokenState::RejectionOnly,
            (true, true) => TokenState::Both,
        }
    }
}

/// Result of a submission attempt, reported back to the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionOutcome {
    Recorded,
    AlreadyUsed,
    NotFound,
}
