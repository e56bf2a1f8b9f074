// models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PollError;
use crate::ledger::{Question, TokenState};
use crate::tally::{Distribution, Tally};

/// A row of the `tokens` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TokenRecord {
    pub token: String,
    pub used_intention: bool,
    pub used_rejection: bool,
}

/// A row of `intention_votes` or `rejection_votes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct VoteRecord {
    pub id: i64,
    pub candidate: String,
    pub token: String,
}

/// The singleton display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Configuration {
    pub display_real: bool,
    pub favored_candidate: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Configuration {
    /// Used whenever no configuration row exists: real results, nobody
    /// favored.
    fn default() -> Self {
        Configuration {
            display_real: true,
            favored_candidate: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenQuery {
    pub fn token(&self) -> Result<&str, PollError> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(PollError::MissingToken)
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmissionRequest {
    pub token: String,
    pub candidate: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigurationUpdate {
    pub display_real: bool,
    #[serde(default)]
    pub favored_candidate: Option<String>,
}

/// One question as offered to a token holder.
#[derive(Debug, Serialize)]
pub struct QuestionStatus {
    pub question: Question,
    pub open: bool,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BallotResponse {
    pub state: TokenState,
    pub questions: Vec<QuestionStatus>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub question: Question,
    pub candidate: String,
    pub outcome: crate::ledger::SubmissionOutcome,
}

/// Display distributions for the questions a token has answered.
#[derive(Debug, Default, Serialize)]
pub struct ResultsResponse {
    pub intention: Option<Distribution>,
    pub rejection: Option<Distribution>,
}

/// Real and configuration-adjusted views of one question, side by side.
#[derive(Debug, Serialize)]
pub struct ResultComparison {
    pub real: Distribution,
    pub displayed: Distribution,
}

#[derive(Debug, Serialize)]
pub struct AdminResults {
    pub intention: ResultComparison,
    pub rejection: ResultComparison,
}

#[derive(Debug, Serialize)]
pub struct RealTallies {
    pub intention: Tally,
    pub rejection: Tally,
}
