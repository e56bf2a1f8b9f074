// services.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::ballot::Ballot;
use crate::error::PollError;
use crate::ledger::{Question, SubmissionOutcome, TokenState};
use crate::models::{Configuration, ConfigurationUpdate, TokenRecord, VoteRecord};
use crate::present;
use crate::store::PollStore;
use crate::tally::Tally;

/// Request-level entry point: every handler goes through here.
pub struct PollService {
    store: Arc<dyn PollStore>,
    ballot: Ballot,
}

impl PollService {
    pub fn new(store: Arc<dyn PollStore>, ballot: Ballot) -> Self {
        PollService { store, ballot }
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub async fn token_state(&self, token: &str) -> Result<TokenState, PollError> {
        self.store
            .lookup(token)
            .await?
            .map(TokenState::from)
            .ok_or(PollError::TokenNotFound)
    }

    /// Records one answer. The candidate is checked against the question's
    /// options before the ledger is touched.
    pub async fn submit(
        &self,
        question: Question,
        candidate: &str,
        token: &str,
    ) -> Result<SubmissionOutcome, PollError> {
        self.ballot.validate(question, candidate)?;

        let outcome = self.store.submit(question, candidate, token).await?;
        match outcome {
            SubmissionOutcome::Recorded => info!(%question, %candidate, "answer recorded"),
            SubmissionOutcome::AlreadyUsed => {
                warn!(%question, "duplicate submission refused")
            }
            SubmissionOutcome::NotFound => warn!(%question, "submission with unknown token"),
        }
        Ok(outcome)
    }

    /// The active configuration, or the real-results default when none was
    /// ever saved.
    pub async fn configuration(&self) -> Result<Configuration, PollError> {
        match self.store.configuration().await? {
            Some(config) => Ok(config),
            None => {
                warn!("configuration row missing, showing real results");
                Ok(Configuration::default())
            }
        }
    }

    pub async fn save_configuration(
        &self,
        update: ConfigurationUpdate,
    ) -> Result<Configuration, PollError> {
        if let Some(favored) = &update.favored_candidate {
            self.ballot.validate(Question::Rejection, favored)?;
        }
        let config = Configuration {
            display_real: update.display_real,
            favored_candidate: update.favored_candidate,
            updated_at: Some(Utc::now()),
        };
        self.store.save_configuration(&config).await?;
        info!(
            display_real = config.display_real,
            favored = ?config.favored_candidate,
            "configuration saved"
        );
        Ok(config)
    }

    pub async fn real_tally(&self, question: Question) -> Result<Tally, PollError> {
        self.store.tally(question).await
    }

    /// Tally for `question` as it should be shown under the active
    /// configuration.
    pub async fn displayed_tally(&self, question: Question) -> Result<Tally, PollError> {
        let config = self.configuration().await?;
        let tally = self.store.tally(question).await?;
        Ok(present::display(question, &tally, &config))
    }

    /// Real and displayed tallies computed from a single read of the store.
    pub async fn real_and_displayed(&self, question: Question) -> Result<(Tally, Tally), PollError> {
        let config = self.configuration().await?;
        let real = self.store.tally(question).await?;
        let displayed = present::display(question, &real, &config);
        Ok((real, displayed))
    }

    pub async fn tokens(&self) -> Result<Vec<TokenRecord>, PollError> {
        self.store.tokens().await
    }

    pub async fn votes(&self, question: Question) -> Result<Vec<VoteRecord>, PollError> {
        self.store.votes(question).await
    }

    pub async fn reset_tokens(&self) -> Result<u64, PollError> {
        let reset = self.store.reset_tokens().await?;
        info!(reset, "all token flags cleared");
        Ok(reset)
    }

    pub async fn clear_votes(&self, question: Question) -> Result<u64, PollError> {
        let removed = self.store.clear_votes(question).await?;
        info!(%question, removed, "vote table cleared");
        Ok(removed)
    }
}
