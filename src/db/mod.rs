//! # Database — PostgreSQL Storage Layer
//!
//! Provides async database operations for the phone verification workflow
//! via `sqlx::PgPool` connecting to Supabase PostgreSQL.
//!
//! ## Schema
//!
//! - `phone_candidates`: one row per `(sha256_id, mobile_number)` pair with
//!   priority order, trial status, and last-attempt bookkeeping
//! - `validated_phones`: at most one row per identity, the confirmed number
//!
//! ## Module Structure
//!
//! Operations are split into submodules by table:
//!
//! - [`candidates`] — candidate seeding, selection scan, attempt upsert
//! - [`validated`] — validated-phone lookup and overwrite-on-conflict upsert
//!
//! All workflow operations return [`CoreError`](crate::error::CoreError) so
//! callers can distinguish store faults from absent rows; absence is modeled
//! as `Option`, never as an error.

mod candidates;
mod validated;

use anyhow::Result;
use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

/// Pool size; kept small because the Supabase pooler multiplexes upstream.
const MAX_CONNECTIONS: u32 = 5;

// ── Row types ───────────────────────────────────────────────────

/// A candidate number under consideration for an identity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub sha256_id: String,
    pub mobile_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub source: Option<String>,
    pub priority_order: i32,
    pub status: String,
    pub last_attempted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_attempted_by: Option<String>,
}

/// The confirmed number for an identity.
///
/// `wrong_number` and `disconnected` are carried for schema compatibility;
/// no code path here ever writes them `true`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ValidatedPhoneRow {
    pub sha256_id: String,
    pub mobile_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub wrong_number: bool,
    pub disconnected: bool,
    pub positive_interaction: bool,
    pub verified_at: chrono::DateTime<chrono::Utc>,
}

/// Projection returned by the selector scan: just the fields the caller
/// needs to place a call.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactFields {
    pub mobile_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// ── Database struct and connection ──────────────────────────────

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL using the provided database URL.
    ///
    /// Manually parses the URL to preserve the full username — sqlx's built-in
    /// parser strips the ".project-ref" suffix that Supabase pooler requires.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let url = url::Url::parse(database_url)?;
        let username = urlencoding::decode(url.username())?.into_owned();
        let password = url
            .password()
            .map(|p| urlencoding::decode(p).map(|s| s.into_owned()))
            .transpose()?;
        let mut opts = PgConnectOptions::new()
            .host(url.host_str().unwrap_or("localhost"))
            .port(url.port().unwrap_or(5432))
            .database(url.path().trim_start_matches('/'))
            .username(&username)
            .statement_cache_capacity(0);
        if let Some(ref pw) = password {
            opts = opts.password(pw);
        }
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(opts)
            .await?;
        Ok(Database { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Maximum pool size, exposed for the pool gauges.
    pub fn max_connections(&self) -> u32 {
        MAX_CONNECTIONS
    }

    /// Health check: execute `SELECT 1` to verify database connectivity.
    ///
    /// Used by the `/readyz` readiness probe. Returns `Ok(())` if the
    /// database responds, or an error if the connection is broken.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
