// src/store/mod.rs
//! Persistence behind the poll: token ledger, the two vote tables and the
//! configuration singleton.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::error::PollError;
use crate::ledger::{Question, SubmissionOutcome, TokenFlags};
use crate::models::{Configuration, TokenRecord, VoteRecord};
use crate::tally::Tally;

#[async_trait]
pub trait PollStore: Send + Sync {
    /// Current flags for `token`, or `None` if the token is not provisioned.
    async fn lookup(&self, token: &str) -> Result<Option<TokenFlags>, PollError>;

    /// Marks `token` as used for `question` and appends the vote as one
    /// atomic unit. Nothing is written unless the outcome is
    /// [`SubmissionOutcome::Recorded`].
    async fn submit(
        &self,
        question: Question,
        candidate: &str,
        token: &str,
    ) -> Result<SubmissionOutcome, PollError>;

    async fn tally(&self, question: Question) -> Result<Tally, PollError>;

    async fn votes(&self, question: Question) -> Result<Vec<VoteRecord>, PollError>;

    async fn tokens(&self) -> Result<Vec<TokenRecord>, PollError>;

    /// Clears both flags on every token. Vote tables are untouched.
    async fn reset_tokens(&self) -> Result<u64, PollError>;

    /// Deletes every vote of `question`. Token flags are untouched.
    async fn clear_votes(&self, question: Question) -> Result<u64, PollError>;

    /// The configuration row, or `None` if it was never written.
    async fn configuration(&self) -> Result<Option<Configuration>, PollError>;

    async fn save_configuration(&self, config: &Configuration) -> Result<(), PollError>;
}
