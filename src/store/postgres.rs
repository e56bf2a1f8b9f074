// src/store/postgres.rs
use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::PollStore;
use crate::error::PollError;
use crate::ledger::{Question, SubmissionOutcome, TokenFlags};
use crate::models::{Configuration, TokenRecord, VoteRecord};
use crate::tally::Tally;

fn vote_table(question: Question) -> &'static str {
    match question {
        Question::Intention => "intention_votes",
        Question::Rejection => "rejection_votes",
    }
}

fn used_column(question: Question) -> &'static str {
    match question {
        Question::Intention => "used_intention",
        Question::Rejection => "used_rejection",
    }
}

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl PollStore for PgStore {
    async fn lookup(&self, token: &str) -> Result<Option<TokenFlags>, PollError> {
        let record = sqlx::query_as::<_, TokenRecord>(
            "SELECT token, used_intention, used_rejection FROM tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(|r| TokenFlags {
            used_intention: r.used_intention,
            used_rejection: r.used_rejection,
        }))
    }

    async fn submit(
        &self,
        question: Question,
        candidate: &str,
        token: &str,
    ) -> Result<SubmissionOutcome, PollError> {
        let column = used_column(question);
        let mut tx = self.pool.begin().await?;

        // The conditional update takes the row lock; a concurrent submission
        // for the same token re-checks the predicate after we commit and
        // affects zero rows.
        let marked = sqlx::query(&format!(
            "UPDATE tokens SET {column} = TRUE WHERE token = $1 AND {column} = FALSE"
        ))
        .bind(token)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if marked == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tokens WHERE token = $1)")
                    .bind(token)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Ok(if exists {
                SubmissionOutcome::AlreadyUsed
            } else {
                SubmissionOutcome::NotFound
            });
        }

        sqlx::query(&format!(
            "INSERT INTO {} (candidate, token) VALUES ($1, $2)",
            vote_table(question)
        ))
        .bind(candidate)
        .bind(token)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(SubmissionOutcome::Recorded)
    }

    async fn tally(&self, question: Question) -> Result<Tally, PollError> {
        let rows = sqlx::query(&format!(
            "SELECT candidate, COUNT(*) AS vote_count FROM {} GROUP BY candidate ORDER BY candidate",
            vote_table(question)
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let candidate: String = row.try_get("candidate")?;
                let count: i64 = row.try_get("vote_count")?;
                Ok((candidate, count.max(0) as u64))
            })
            .collect()
    }

    async fn votes(&self, question: Question) -> Result<Vec<VoteRecord>, PollError> {
        let votes = sqlx::query_as::<_, VoteRecord>(&format!(
            "SELECT id, candidate, token FROM {} ORDER BY id",
            vote_table(question)
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(votes)
    }

    async fn tokens(&self) -> Result<Vec<TokenRecord>, PollError> {
        let tokens = sqlx::query_as::<_, TokenRecord>(
            "SELECT token, used_intention, used_rejection FROM tokens ORDER BY token",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tokens)
    }

    async fn reset_tokens(&self) -> Result<u64, PollError> {
        let result = sqlx::query("UPDATE tokens SET used_intention = FALSE, used_rejection = FALSE")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn clear_votes(&self, question: Question) -> Result<u64, PollError> {
        let result = sqlx::query(&format!("DELETE FROM {}", vote_table(question)))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn configuration(&self) -> Result<Option<Configuration>, PollError> {
        let config = sqlx::query_as::<_, Configuration>(
            "SELECT display_real, favored_candidate, updated_at FROM configuration WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(config)
    }

    async fn save_configuration(&self, config: &Configuration) -> Result<(), PollError> {
        sqlx::query(
            r#"
            INSERT INTO configuration (id, display_real, favored_candidate, updated_at)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET display_real = EXCLUDED.display_real,
                favored_candidate = EXCLUDED.favored_candidate,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(config.display_real)
        .bind(config.favored_candidate.as_deref())
        .bind(config.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
