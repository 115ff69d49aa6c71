//! Client session state
//!
//! A [`Session`] owns what a run of the program remembers between
//! operations: the most recent successful report (exports feed on it),
//! and the QR artifact for the most recently shortened code. Lookups
//! carry monotonic tickets so an answer that was overtaken by a newer
//! lookup never overwrites fresher state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::api::StatsGateway;
use crate::artifact::clipboard::ClipboardSurface;
use crate::artifact::{
    self, ArtifactReference, ArtifactStore, CopyOutcome, SaveOutcome,
};
use crate::errors::{Result, ShortstatsError};
use crate::export::{self, ExportFormat};
use crate::utils::sanitize_code;
use super::{StatsReport, fetch_report};

/// Last successful lookup, kept for export
#[derive(Debug, Clone)]
pub struct RetainedReport {
    pub code: String,
    pub report: StatsReport,
}

pub struct Session {
    gateway: Arc<dyn StatsGateway>,
    retained: Mutex<Option<RetainedReport>>,
    tickets: AtomicU64,
    artifacts: Arc<ArtifactStore>,
}

impl Session {
    pub fn new(gateway: Arc<dyn StatsGateway>) -> Self {
        Self {
            gateway,
            retained: Mutex::new(None),
            tickets: AtomicU64::new(0),
            artifacts: Arc::new(ArtifactStore::new()),
        }
    }

    pub fn gateway(&self) -> &dyn StatsGateway {
        self.gateway.as_ref()
    }

    /// Look up stats for a raw user-entered code and retain the result.
    ///
    /// The input is sanitized here (full short URLs are accepted and
    /// reduced to their code); a blank input fails validation before
    /// any request is issued and leaves retained state alone. A
    /// successful lookup replaces the retained report, a failed one
    /// clears it. When a newer lookup was issued while this one was in
    /// flight the result is still returned but leaves retained state
    /// alone.
    pub async fn lookup_stats(&self, raw_code: &str) -> Result<StatsReport> {
        let code = sanitize_code(raw_code)
            .ok_or_else(|| ShortstatsError::validation("Please enter a valid short code"))?;
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = fetch_report(self.gateway.as_ref(), &code).await;

        let mut retained = self.retained.lock();
        if self.tickets.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "lookup overtaken, result not retained");
            return outcome;
        }
        match &outcome {
            Ok(report) => {
                *retained = Some(RetainedReport {
                    code: report.code.clone(),
                    report: report.clone(),
                });
            }
            Err(_) => {
                *retained = None;
            }
        }
        outcome
    }

    pub fn retained(&self) -> Option<RetainedReport> {
        self.retained.lock().clone()
    }

    /// Export the retained report to `dir`; there must be one
    pub fn export_report(&self, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        let retained = self
            .retained
            .lock()
            .clone()
            .ok_or_else(|| ShortstatsError::export_no_data("No stats data to export"))?;
        export::write_export(&retained.report, format, dir)
    }

    /// Point the artifact slot at a code's QR image without fetching;
    /// copy and save will fetch on demand.
    pub fn set_artifact(&self, code: &str, size: u32) {
        self.artifacts.set_reference(ArtifactReference {
            source_url: self.gateway.qr_url(code, size),
            identifier: code.to_string(),
        });
    }

    /// Point the artifact slot at a code's QR image and start fetching
    /// the bytes in the background. Used right after a shorten so the
    /// image is usually ready by the time the user asks for it.
    pub fn track_artifact(&self, code: &str, size: u32) {
        self.set_artifact(code, size);
        artifact::spawn_prefetch(self.artifacts.clone(), self.gateway.clone());
    }

    pub fn artifact_reference(&self) -> Option<ArtifactReference> {
        self.artifacts.reference()
    }

    pub async fn copy_qr(&self, surface: &mut dyn ClipboardSurface) -> Result<CopyOutcome> {
        artifact::copy_artifact(&self.artifacts, self.gateway.as_ref(), surface).await
    }

    pub async fn save_qr(&self, dir: &Path) -> Result<SaveOutcome> {
        artifact::save_artifact(&self.artifacts, self.gateway.as_ref(), dir).await
    }
}
