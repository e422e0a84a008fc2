//! Candidate selection and status-transition workflow.
//!
//! Three operations compose around the two tables:
//!
//! 1. [`seed_candidates`] populates the candidate pool in priority order
//! 2. [`select_next`] picks the number to attempt next
//! 3. [`record_disposition`] applies a reported outcome and, on success,
//!    promotes the number into `validated_phones`
//!
//! Each call is an independent request with no in-process coordination;
//! the store's row-level atomicity is the only synchronization. None of
//! the multi-write operations is wrapped in a transaction — a mid-batch
//! or post-candidate-write failure surfaces to the caller, and retrying
//! the whole call is safe because every write is idempotent for the same
//! inputs.

use serde::Deserialize;

use crate::db::Database;
use crate::disposition::{CandidateStatus, Disposition};
use crate::error::{CoreError, CoreResult};

/// Provenance tag applied when a seed call carries no `source`.
pub const DEFAULT_SOURCE: &str = "poc_source";

/// Seed request: an identity plus its candidate numbers in priority order.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRequest {
    #[serde(default)]
    pub sha256_id: String,
    #[serde(default, deserialize_with = "string_list_or_empty")]
    pub numbers: Vec<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub source: Option<String>,
}

/// Accept only a JSON array for `numbers`; any other shape deserializes to
/// an empty list so it falls into the same validation rejection as a
/// missing or empty list.
fn string_list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => Ok(s),
                other => Err(serde::de::Error::custom(format!(
                    "expected a string, got {}",
                    other
                ))),
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Disposition request: the outcome of one contact attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkRequest {
    #[serde(default)]
    pub sha256_id: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub disposition: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub source: Option<String>,
    pub agent_id: Option<String>,
}

/// Selector outcome: either the validated number or the best untested
/// candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextNumber {
    Verified {
        mobile_number: String,
        first_name: Option<String>,
        last_name: Option<String>,
    },
    Candidate {
        mobile_number: String,
        first_name: Option<String>,
        last_name: Option<String>,
    },
}

/// Insert any candidates not already known for the identity, preserving
/// list order as `priority_order`. Returns the count of newly inserted
/// rows; pre-existing pairs (and repeats within the same list) are skipped
/// without error.
///
/// Earlier insertions stay committed if a later one fails — candidates are
/// idempotently skippable, so the caller just retries the whole batch.
pub async fn seed_candidates(db: &Database, req: &SeedRequest) -> CoreResult<u64> {
    if req.sha256_id.is_empty() || req.numbers.is_empty() {
        return Err(CoreError::Validation(
            "Missing sha256_id or numbers array".to_string(),
        ));
    }
    let source = req.source.as_deref().unwrap_or(DEFAULT_SOURCE);

    let mut inserted = 0u64;
    for (index, number) in req.numbers.iter().enumerate() {
        let is_new = db
            .insert_candidate_if_absent(
                &req.sha256_id,
                number,
                req.first_name.as_deref(),
                req.last_name.as_deref(),
                source,
                index as i32,
            )
            .await?;
        if is_new {
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Pick the number to attempt next for an identity.
///
/// Strict two-tier precedence: a validated number, once established,
/// permanently shadows the candidate pool regardless of how many untested
/// candidates remain. With no validated number, the untested candidate
/// with the smallest `priority_order` wins. An empty result on both tiers
/// is `NotFound`, not a store error.
pub async fn select_next(db: &Database, sha256_id: &str) -> CoreResult<NextNumber> {
    if sha256_id.is_empty() {
        return Err(CoreError::Validation(
            "Missing sha256_id parameter".to_string(),
        ));
    }

    if let Some(validated) = db.get_validated(sha256_id).await? {
        return Ok(NextNumber::Verified {
            mobile_number: validated.mobile_number,
            first_name: validated.first_name,
            last_name: validated.last_name,
        });
    }

    if let Some(candidate) = db.next_untested(sha256_id).await? {
        return Ok(NextNumber::Candidate {
            mobile_number: candidate.mobile_number,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
        });
    }

    Err(CoreError::NotFound(
        "No valid or untested numbers available".to_string(),
    ))
}

/// Apply a reported outcome to a candidate and return its new status.
///
/// The disposition is validated and mapped before any store access. The
/// candidate upsert either updates the existing row (status and attempt
/// bookkeeping only) or materializes a never-seeded candidate at priority
/// 0. Success outcomes additionally overwrite the identity's validated
/// number — most recent success wins, even across different numbers.
pub async fn record_disposition(db: &Database, req: &MarkRequest) -> CoreResult<CandidateStatus> {
    if req.sha256_id.is_empty() || req.mobile_number.is_empty() || req.disposition.is_empty() {
        return Err(CoreError::Validation(
            "Missing sha256_id, mobile_number, or disposition".to_string(),
        ));
    }
    let disposition: Disposition = req.disposition.parse()?;
    let status = disposition.outcome();
    let now = chrono::Utc::now();

    db.upsert_attempt(
        &req.sha256_id,
        &req.mobile_number,
        req.first_name.as_deref(),
        req.last_name.as_deref(),
        req.source.as_deref(),
        status.as_str(),
        now,
        req.agent_id.as_deref(),
    )
    .await?;

    if disposition.verifies() {
        db.upsert_validated(
            &req.sha256_id,
            &req.mobile_number,
            req.first_name.as_deref(),
            req.last_name.as_deref(),
            disposition.positive_interaction(),
            now,
        )
        .await?;
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_request_accepts_a_string_array() {
        let req: SeedRequest =
            serde_json::from_str(r#"{"sha256_id":"abc","numbers":["1","2"]}"#).unwrap();
        assert_eq!(req.numbers, vec!["1", "2"]);
        assert!(req.source.is_none());
    }

    #[test]
    fn seed_request_treats_non_list_numbers_as_empty() {
        for body in [
            r#"{"sha256_id":"abc","numbers":"111"}"#,
            r#"{"sha256_id":"abc","numbers":42}"#,
            r#"{"sha256_id":"abc","numbers":null}"#,
            r#"{"sha256_id":"abc"}"#,
        ] {
            let req: SeedRequest = serde_json::from_str(body).unwrap();
            assert!(req.numbers.is_empty(), "{}", body);
        }
    }

    #[test]
    fn seed_request_rejects_non_string_items() {
        let result = serde_json::from_str::<SeedRequest>(r#"{"sha256_id":"a","numbers":[1]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn mark_request_defaults_missing_fields_to_empty() {
        let req: MarkRequest = serde_json::from_str(r#"{"sha256_id":"abc"}"#).unwrap();
        assert!(req.mobile_number.is_empty());
        assert!(req.disposition.is_empty());
        assert!(req.agent_id.is_none());
    }
}
