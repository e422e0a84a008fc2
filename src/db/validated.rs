//! Validated-phone table operations.
//!
//! The table is keyed by `sha256_id` alone, so the upsert implements the
//! most-recent-success-wins policy: a second successful disposition for a
//! different number silently replaces the previously validated one.

use super::{Database, ValidatedPhoneRow};
use crate::error::CoreResult;
use chrono::{DateTime, Utc};

impl Database {
    /// The validated number for an identity, if one has been established.
    pub async fn get_validated(&self, sha256_id: &str) -> CoreResult<Option<ValidatedPhoneRow>> {
        let row = sqlx::query_as::<_, ValidatedPhoneRow>(
            "SELECT sha256_id, mobile_number, first_name, last_name,
                    wrong_number, disconnected, positive_interaction, verified_at
             FROM validated_phones
             WHERE sha256_id = $1",
        )
        .bind(sha256_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Upsert the validated number for an identity, overwriting any previous
    /// one.
    ///
    /// `wrong_number` and `disconnected` are always written `false`; they
    /// exist for schema compatibility only.
    pub async fn upsert_validated(
        &self,
        sha256_id: &str,
        mobile_number: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        positive_interaction: bool,
        verified_at: DateTime<Utc>,
    ) -> CoreResult<()> {
        sqlx::query(
            "INSERT INTO validated_phones
               (sha256_id, mobile_number, first_name, last_name,
                wrong_number, disconnected, positive_interaction, verified_at)
             VALUES ($1, $2, $3, $4, FALSE, FALSE, $5, $6)
             ON CONFLICT (sha256_id) DO UPDATE SET
               mobile_number = EXCLUDED.mobile_number,
               first_name = EXCLUDED.first_name,
               last_name = EXCLUDED.last_name,
               positive_interaction = EXCLUDED.positive_interaction,
               verified_at = EXCLUDED.verified_at",
        )
        .bind(sha256_id)
        .bind(mobile_number)
        .bind(first_name)
        .bind(last_name)
        .bind(positive_interaction)
        .bind(verified_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
