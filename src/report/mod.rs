//! Canonical stats report and the lookup normalizer
//!
//! A [`StatsReport`] is the single shape the rest of the crate works
//! with: renderer, exporters and the interactive console all consume
//! it. [`fetch_report`] produces one from a sanitized short code,
//! folding the enhanced/basic endpoint split and the error-body
//! variations into one canonical outcome.

pub mod session;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{FetchOutcome, StatsGateway};
use crate::errors::{Result, ShortstatsError};

/// One referrer with its click count, order as the server ranked it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerStat {
    pub referrer: String,
    pub count: u64,
}

impl ReferrerStat {
    /// Display label; an empty referrer is a direct visit
    pub fn label(&self) -> &str {
        if self.referrer.is_empty() {
            "Direct"
        } else {
            &self.referrer
        }
    }
}

/// Canonical per-code statistics
///
/// Breakdown fields are `None` when the lookup fell back to the basic
/// endpoint; map-backed breakdowns are ordered so serialized output is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub original_url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub total_clicks: u64,
    #[serde(default, rename = "unique_ips")]
    pub unique_visitors: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks_by_day: Option<BTreeMap<String, u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_referrers: Option<Vec<ReferrerStat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agents: Option<BTreeMap<String, u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<BTreeMap<String, u64>>,
}

impl StatsReport {
    /// True when the report carries at least one breakdown section
    pub fn has_breakdowns(&self) -> bool {
        self.clicks_by_day.is_some()
            || self.top_referrers.is_some()
            || self.user_agents.is_some()
            || self.countries.is_some()
    }

    fn clear_breakdowns(&mut self) {
        self.clicks_by_day = None;
        self.top_referrers = None;
        self.user_agents = None;
        self.countries = None;
    }
}

/// Canonical user-facing message for transport failures
const NETWORK_MESSAGE: &str = "Network error. Please try again.";

/// Normalize stats for an already-sanitized short code.
///
/// Sanitizing raw user input (trimming, reducing a full short URL to
/// its code) is the lookup entry points' job, not this function's.
/// The enhanced endpoint is tried first; a non-success status there
/// falls back to the basic endpoint, whose reports never carry
/// breakdowns. A transport failure at either step aborts the lookup
/// without falling back.
pub async fn fetch_report(gateway: &dyn StatsGateway, code: &str) -> Result<StatsReport> {
    let enhanced = gateway.enhanced_stats(code).await.map_err(as_lookup_error)?;
    match enhanced {
        FetchOutcome::Success(report) => {
            if report.code.trim().is_empty() {
                warn!(code, "enhanced stats payload missing code field");
                return Err(ShortstatsError::invalid_payload(
                    "Invalid stats data received",
                ));
            }
            Ok(report)
        }
        FetchOutcome::Failure { status, .. } => {
            debug!(code, status, "enhanced stats unavailable, trying basic");
            let basic = gateway.basic_stats(code).await.map_err(as_lookup_error)?;
            match basic {
                FetchOutcome::Success(mut report) => {
                    report.clear_breakdowns();
                    Ok(report)
                }
                FetchOutcome::Failure { status, message } => {
                    debug!(code, status, "basic stats lookup failed");
                    Err(ShortstatsError::not_found(
                        message.unwrap_or_else(|| "Stats not found".to_string()),
                    ))
                }
            }
        }
    }
}

/// Replace transport detail with the canonical lookup message; other
/// error kinds pass through untouched.
fn as_lookup_error(err: ShortstatsError) -> ShortstatsError {
    match err {
        ShortstatsError::Network(detail) => {
            debug!(%detail, "stats lookup transport failure");
            ShortstatsError::network(NETWORK_MESSAGE)
        }
        other => other,
    }
}
