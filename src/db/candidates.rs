//! Candidate table operations — seeding, selection scan, attempt upsert.
//!
//! The `UNIQUE (sha256_id, mobile_number)` constraint plus `ON CONFLICT`
//! writes make both the seed insert and the disposition upsert atomic, so
//! concurrent callers cannot create duplicate candidate rows.

use super::{CandidateRow, ContactFields, Database};
use crate::error::CoreResult;
use chrono::{DateTime, Utc};

impl Database {
    /// Insert a candidate if no row exists for `(sha256_id, mobile_number)`.
    ///
    /// Returns `true` if a row was inserted, `false` if the pair was already
    /// known (the existing row is left untouched, including its priority).
    pub async fn insert_candidate_if_absent(
        &self,
        sha256_id: &str,
        mobile_number: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        source: &str,
        priority_order: i32,
    ) -> CoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO phone_candidates
               (sha256_id, mobile_number, first_name, last_name, source, priority_order, status)
             VALUES ($1, $2, $3, $4, $5, $6, 'untested')
             ON CONFLICT (sha256_id, mobile_number) DO NOTHING",
        )
        .bind(sha256_id)
        .bind(mobile_number)
        .bind(first_name)
        .bind(last_name)
        .bind(source)
        .bind(priority_order)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The untested candidate with the smallest `priority_order` for an
    /// identity, or `None` if the pool is exhausted.
    ///
    /// Ties on priority are broken by insertion order (`id`) so repeated
    /// calls are deterministic.
    pub async fn next_untested(&self, sha256_id: &str) -> CoreResult<Option<ContactFields>> {
        let row = sqlx::query_as::<_, ContactFields>(
            "SELECT mobile_number, first_name, last_name
             FROM phone_candidates
             WHERE sha256_id = $1 AND status = 'untested'
             ORDER BY priority_order ASC, id ASC
             LIMIT 1",
        )
        .bind(sha256_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Record a contact attempt: update the candidate's status and attempt
    /// bookkeeping, or materialize a never-seeded candidate with
    /// `priority_order = 0`.
    ///
    /// On the update arm only status, `last_attempted_at`, and
    /// `last_attempted_by` change — name and source metadata on an existing
    /// row are left untouched.
    pub async fn upsert_attempt(
        &self,
        sha256_id: &str,
        mobile_number: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        source: Option<&str>,
        status: &str,
        attempted_at: DateTime<Utc>,
        attempted_by: Option<&str>,
    ) -> CoreResult<()> {
        sqlx::query(
            "INSERT INTO phone_candidates
               (sha256_id, mobile_number, first_name, last_name, source,
                priority_order, status, last_attempted_at, last_attempted_by)
             VALUES ($1, $2, $3, $4, $5, 0, $6, $7, $8)
             ON CONFLICT (sha256_id, mobile_number) DO UPDATE SET
               status = EXCLUDED.status,
               last_attempted_at = EXCLUDED.last_attempted_at,
               last_attempted_by = EXCLUDED.last_attempted_by",
        )
        .bind(sha256_id)
        .bind(mobile_number)
        .bind(first_name)
        .bind(last_name)
        .bind(source)
        .bind(status)
        .bind(attempted_at)
        .bind(attempted_by)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Look up a single candidate by its `(sha256_id, mobile_number)` key.
    pub async fn get_candidate(
        &self,
        sha256_id: &str,
        mobile_number: &str,
    ) -> CoreResult<Option<CandidateRow>> {
        let row = sqlx::query_as::<_, CandidateRow>(
            "SELECT id, sha256_id, mobile_number, first_name, last_name, source,
                    priority_order, status, last_attempted_at, last_attempted_by
             FROM phone_candidates
             WHERE sha256_id = $1 AND mobile_number = $2",
        )
        .bind(sha256_id)
        .bind(mobile_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// All candidates for an identity in trial order.
    pub async fn candidates_for(&self, sha256_id: &str) -> CoreResult<Vec<CandidateRow>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT id, sha256_id, mobile_number, first_name, last_name, source,
                    priority_order, status, last_attempted_at, last_attempted_by
             FROM phone_candidates
             WHERE sha256_id = $1
             ORDER BY priority_order ASC, id ASC",
        )
        .bind(sha256_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
