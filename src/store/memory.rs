// src/store/memory.rs
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::PollStore;
use crate::error::PollError;
use crate::ledger::{Question, SubmissionOutcome, TokenFlags};
use crate::models::{Configuration, TokenRecord, VoteRecord};
use crate::tally::Tally;

#[derive(Debug, Default)]
struct VoteTable {
    next_id: i64,
    rows: Vec<VoteRecord>,
}

impl VoteTable {
    fn append(&mut self, candidate: &str, token: &str) {
        self.next_id += 1;
        self.rows.push(VoteRecord {
            id: self.next_id,
            candidate: candidate.to_string(),
            token: token.to_string(),
        });
    }
}

#[derive(Debug, Default)]
struct State {
    tokens: BTreeMap<String, TokenFlags>,
    intention: VoteTable,
    rejection: VoteTable,
    configuration: Option<Configuration>,
}

impl State {
    fn table(&mut self, question: Question) -> &mut VoteTable {
        match question {
            Question::Intention => &mut self.intention,
            Question::Rejection => &mut self.rejection,
        }
    }
}

/// In-process store. A single mutex guards all tables, so the check, mark
/// and insert of a submission run under one guard.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// A store with the given tokens provisioned as fresh and the default
    /// configuration row in place.
    pub fn with_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = State {
            tokens: tokens
                .into_iter()
                .map(|t| (t.into(), TokenFlags::default()))
                .collect(),
            configuration: Some(Configuration::default()),
            ..State::default()
        };
        MemoryStore {
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, PollError> {
        self.state
            .lock()
            .map_err(|_| PollError::StorageUnavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn lookup(&self, token: &str) -> Result<Option<TokenFlags>, PollError> {
        Ok(self.state()?.tokens.get(token).copied())
    }

    async fn submit(
        &self,
        question: Question,
        candidate: &str,
        token: &str,
    ) -> Result<SubmissionOutcome, PollError> {
        let mut state = self.state()?;
        let Some(flags) = state.tokens.get_mut(token) else {
            return Ok(SubmissionOutcome::NotFound);
        };
        if !flags.try_mark(question) {
            return Ok(SubmissionOutcome::AlreadyUsed);
        }
        state.table(question).append(candidate, token);
        Ok(SubmissionOutcome::Recorded)
    }

    async fn tally(&self, question: Question) -> Result<Tally, PollError> {
        let mut state = self.state()?;
        Ok(Tally::from_votes(&state.table(question).rows))
    }

    async fn votes(&self, question: Question) -> Result<Vec<VoteRecord>, PollError> {
        let mut state = self.state()?;
        Ok(state.table(question).rows.clone())
    }

    async fn tokens(&self) -> Result<Vec<TokenRecord>, PollError> {
        let state = self.state()?;
        Ok(state
            .tokens
            .iter()
            .map(|(token, flags)| TokenRecord {
                token: token.clone(),
                used_intention: flags.used_intention,
                used_rejection: flags.used_rejection,
            })
            .collect())
    }

    async fn reset_tokens(&self) -> Result<u64, PollError> {
        let mut state = self.state()?;
        for flags in state.tokens.values_mut() {
            *flags = TokenFlags::default();
        }
        Ok(state.tokens.len() as u64)
    }

    async fn clear_votes(&self, question: Question) -> Result<u64, PollError> {
        let mut state = self.state()?;
        let table = state.table(question);
        let removed = table.rows.len() as u64;
        table.rows.clear();
        Ok(removed)
    }

    async fn configuration(&self) -> Result<Option<Configuration>, PollError> {
        Ok(self.state()?.configuration.clone())
    }

    async fn save_configuration(&self, config: &Configuration) -> Result<(), PollError> {
        self.state()?.configuration = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn submission_marks_token_and_appends_vote() {
        let store = MemoryStore::with_tokens(["t1"]);

        let outcome = store.submit(Question::Intention, "A", "t1").await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Recorded);

        let flags = store.lookup("t1").await.unwrap().unwrap();
        assert!(flags.used_intention);
        assert!(!flags.used_rejection);

        let votes = store.votes(Question::Intention).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].id, 1);
        assert_eq!(votes[0].candidate, "A");
        assert_eq!(votes[0].token, "t1");
        assert!(store.votes(Question::Rejection).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_submission_writes_nothing() {
        let store = MemoryStore::with_tokens(["t1"]);
        store.submit(Question::Rejection, "A", "t1").await.unwrap();

        let outcome = store.submit(Question::Rejection, "B", "t1").await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::AlreadyUsed);

        let tally = store.tally(Question::Rejection).await.unwrap();
        assert_eq!(tally.get("A"), Some(1));
        assert_eq!(tally.get("B"), None);
    }

    #[tokio::test]
    async fn unknown_token_writes_nothing() {
        let store = MemoryStore::with_tokens(["t1"]);
        assert_eq!(store.lookup("nope").await.unwrap(), None);

        let outcome = store.submit(Question::Intention, "A", "nope").await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::NotFound);
        assert!(store.votes(Question::Intention).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_admit_exactly_one() {
        let store = Arc::new(MemoryStore::with_tokens(["shared"]));

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let candidate = if i % 2 == 0 { "A" } else { "B" };
                    store
                        .submit(Question::Intention, candidate, "shared")
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut recorded = 0;
        let mut refused = 0;
        for handle in handles {
            match handle.await.unwrap() {
                SubmissionOutcome::Recorded => recorded += 1,
                SubmissionOutcome::AlreadyUsed => refused += 1,
                SubmissionOutcome::NotFound => panic!("token should exist"),
            }
        }
        assert_eq!(recorded, 1);
        assert_eq!(refused, 31);
        assert_eq!(store.votes(Question::Intention).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reset_leaves_votes_alone() {
        let store = MemoryStore::with_tokens(["t1", "t2"]);
        store.submit(Question::Intention, "A", "t1").await.unwrap();
        store.submit(Question::Rejection, "B", "t2").await.unwrap();
        let before = store.tally(Question::Intention).await.unwrap();

        assert_eq!(store.reset_tokens().await.unwrap(), 2);

        for record in store.tokens().await.unwrap() {
            assert!(!record.used_intention && !record.used_rejection);
        }
        assert_eq!(store.tally(Question::Intention).await.unwrap(), before);
        assert_eq!(store.votes(Question::Rejection).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clearing_votes_leaves_tokens_alone() {
        let store = MemoryStore::with_tokens(["t1"]);
        store.submit(Question::Intention, "A", "t1").await.unwrap();

        assert_eq!(store.clear_votes(Question::Intention).await.unwrap(), 1);
        assert_eq!(store.tally(Question::Intention).await.unwrap(), Tally::new());

        let flags = store.lookup("t1").await.unwrap().unwrap();
        assert!(flags.used_intention);

        // Ids keep increasing after a clear.
        store.reset_tokens().await.unwrap();
        store.submit(Question::Intention, "B", "t1").await.unwrap();
        assert_eq!(store.votes(Question::Intention).await.unwrap()[0].id, 2);
    }

    #[tokio::test]
    async fn configuration_round_trips() {
        let store = MemoryStore::default();
        assert_eq!(store.configuration().await.unwrap(), None);

        let config = Configuration {
            display_real: false,
            favored_candidate: Some("A".into()),
            updated_at: None,
        };
        store.save_configuration(&config).await.unwrap();
        assert_eq!(store.configuration().await.unwrap(), Some(config));
    }
}
