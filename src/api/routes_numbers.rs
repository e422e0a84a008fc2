//! Number workflow API — seeding, next-number selection, disposition
//! recording.
//!
//! Handlers stay thin: payload extraction, a call into [`crate::workflow`],
//! and response shaping. Malformed JSON bodies are surfaced the way the
//! original service did — a 500 with a generic message plus detail — so
//! existing callers see the same wire behavior.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::AppState;
use crate::error::CoreError;
use crate::workflow::{self, MarkRequest, NextNumber, SeedRequest};

pub(super) async fn handler_seed(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SeedRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(rejection) => return CoreError::Internal(rejection.body_text()).into_response(),
    };

    match workflow::seed_candidates(&state.db, &req).await {
        Ok(inserted) => {
            state.prom_metrics.numbers_seeded.inc_by(inserted);
            info!(sha256_id = %req.sha256_id, inserted, "seeded candidates");
            Json(serde_json::json!({
                "status": "success",
                "inserted_count": inserted,
            }))
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
pub(super) struct NextQuery {
    #[serde(default)]
    sha256_id: Option<String>,
}

pub(super) async fn handler_next(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NextQuery>,
) -> impl IntoResponse {
    let sha256_id = query.sha256_id.unwrap_or_default();

    match workflow::select_next(&state.db, &sha256_id).await {
        Ok(NextNumber::Verified {
            mobile_number,
            first_name,
            last_name,
        }) => Json(serde_json::json!({
            "status": "verified",
            "mobile_number": mobile_number,
            "first_name": first_name,
            "last_name": last_name,
        }))
        .into_response(),
        Ok(NextNumber::Candidate {
            mobile_number,
            first_name,
            last_name,
        }) => Json(serde_json::json!({
            "status": "candidate",
            "mobile_number": mobile_number,
            "first_name": first_name,
            "last_name": last_name,
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub(super) async fn handler_mark(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MarkRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(rejection) => return CoreError::Internal(rejection.body_text()).into_response(),
    };

    match workflow::record_disposition(&state.db, &req).await {
        Ok(status) => {
            state
                .prom_metrics
                .dispositions_recorded
                .get_or_create(&crate::prom_metrics::OutcomeLabel {
                    outcome: status.as_str().to_string(),
                })
                .inc();
            info!(
                sha256_id = %req.sha256_id,
                mobile_number = %req.mobile_number,
                disposition = %req.disposition,
                status = %status,
                "recorded disposition"
            );
            Json(serde_json::json!({
                "status": "success",
                "updated_status": status.as_str(),
            }))
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}
