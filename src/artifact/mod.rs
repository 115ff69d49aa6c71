//! QR artifact lifecycle: prefetch, clipboard copy, file save
//!
//! After a successful shorten the session records an
//! [`ArtifactReference`] and starts a background prefetch of the image
//! bytes. Copy and save then run ordered fallback chains over whatever
//! state the cache is in, so the best available outcome is produced
//! instead of a hard failure: a rich clipboard image when possible, a
//! base64 data URL when not, raw bytes on disk when re-encoding fails.

pub mod clipboard;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use parking_lot::Mutex;
use tracing::debug;

use crate::api::StatsGateway;
use crate::errors::{Result, ShortstatsError};
use clipboard::ClipboardSurface;

/// Where the current QR image lives and which code it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    /// Absolute URL the image bytes are served from
    pub source_url: String,
    /// Short code the image encodes, used in saved file names
    pub identifier: String,
}

#[derive(Debug, Clone, Default)]
enum CacheState {
    #[default]
    Empty,
    Fetching,
    Ready(Vec<u8>),
}

#[derive(Debug, Default)]
struct ArtifactSlot {
    reference: Option<ArtifactReference>,
    cache: CacheState,
}

/// Single-slot artifact cache shared between the session and the
/// prefetch task
#[derive(Debug, Default)]
pub struct ArtifactStore {
    slot: Mutex<ArtifactSlot>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracked artifact; any cached bytes for the previous
    /// one are dropped.
    pub fn set_reference(&self, reference: ArtifactReference) {
        let mut slot = self.slot.lock();
        slot.reference = Some(reference);
        slot.cache = CacheState::Empty;
    }

    pub fn reference(&self) -> Option<ArtifactReference> {
        self.slot.lock().reference.clone()
    }

    fn snapshot(&self) -> (Option<ArtifactReference>, CacheState) {
        let slot = self.slot.lock();
        (slot.reference.clone(), slot.cache.clone())
    }

    /// Mark the cache as fetching; false when the reference changed
    /// since the caller looked.
    fn begin_fetch(&self, identifier: &str) -> bool {
        let mut slot = self.slot.lock();
        match &slot.reference {
            Some(reference) if reference.identifier == identifier => {
                slot.cache = CacheState::Fetching;
                true
            }
            _ => false,
        }
    }

    /// Store fetched bytes unless the reference moved on meanwhile
    fn store_bytes(&self, identifier: &str, bytes: Vec<u8>) {
        let mut slot = self.slot.lock();
        match &slot.reference {
            Some(reference) if reference.identifier == identifier => {
                slot.cache = CacheState::Ready(bytes);
            }
            _ => debug!(identifier, "dropping fetched bytes for replaced artifact"),
        }
    }

    fn clear_fetch(&self, identifier: &str) {
        let mut slot = self.slot.lock();
        if let Some(reference) = &slot.reference
            && reference.identifier == identifier
            && matches!(slot.cache, CacheState::Fetching)
        {
            slot.cache = CacheState::Empty;
        }
    }
}

/// Start fetching the current artifact's bytes in the background.
///
/// Failures only clear the in-flight marker; copy and save fetch on
/// demand when the cache is empty.
pub fn spawn_prefetch(store: Arc<ArtifactStore>, gateway: Arc<dyn StatsGateway>) {
    let Some(reference) = store.reference() else {
        return;
    };
    if !store.begin_fetch(&reference.identifier) {
        return;
    }
    tokio::spawn(async move {
        match gateway.fetch_bytes(&reference.source_url).await {
            Ok(bytes) => {
                debug!(
                    identifier = %reference.identifier,
                    size = bytes.len(),
                    "artifact prefetch complete"
                );
                store.store_bytes(&reference.identifier, bytes);
            }
            Err(err) => {
                debug!(error = %err, "artifact prefetch failed");
                store.clear_fetch(&reference.identifier);
            }
        }
    });
}

/// How a copy attempt ultimately landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Image placed on the clipboard
    Image,
    /// Base64 data URL placed on the clipboard as text
    DataUrlText,
    /// Nothing could be written; the data URL is handed back for
    /// manual use
    ManualPrompt(String),
}

/// How a save attempt ultimately landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Bytes decoded and re-encoded as a clean PNG
    ReencodedPng(PathBuf),
    /// Bytes written exactly as fetched
    RawBytes(PathBuf),
}

/// Copy the current artifact to a clipboard surface.
///
/// Tier order: rich image write, data-URL text write, manual prompt.
/// Each tier is only attempted when the previous one is unsupported or
/// failed; running out of bytes to copy is the only hard failure.
pub async fn copy_artifact(
    store: &ArtifactStore,
    gateway: &dyn StatsGateway,
    surface: &mut dyn ClipboardSurface,
) -> Result<CopyOutcome> {
    let (reference, cache) = store.snapshot();
    let reference = reference
        .ok_or_else(|| ShortstatsError::artifact_unavailable("No QR code available"))?;

    let bytes = match cache {
        CacheState::Ready(bytes) => bytes,
        CacheState::Fetching => {
            return Err(ShortstatsError::artifact_not_ready(
                "Please wait for QR code to load...",
            ));
        }
        CacheState::Empty => {
            let bytes = gateway.fetch_bytes(&reference.source_url).await.map_err(|e| {
                debug!(error = %e, "on-demand artifact fetch failed");
                ShortstatsError::artifact_failed(
                    "Failed to copy QR code. Try downloading instead.",
                )
            })?;
            store.store_bytes(&reference.identifier, bytes.clone());
            bytes
        }
    };

    if surface.supports_images() {
        match image::load_from_memory(&bytes) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                match surface.write_image(width as usize, height as usize, rgba.as_raw()) {
                    Ok(()) => return Ok(CopyOutcome::Image),
                    Err(err) => debug!(error = %err, "rich clipboard write failed"),
                }
            }
            Err(err) => debug!(error = %err, "artifact bytes did not decode as an image"),
        }
    }

    let data_url = png_data_url(&bytes);
    match surface.write_text(&data_url) {
        Ok(()) => Ok(CopyOutcome::DataUrlText),
        Err(err) => {
            debug!(error = %err, "text clipboard write failed");
            Ok(CopyOutcome::ManualPrompt(data_url))
        }
    }
}

/// Save the current artifact under `dir` as `qrcode-<code>.png`.
///
/// Cached bytes are re-encoded through the image codec so the file is
/// a clean PNG regardless of what the server sent; when decoding
/// fails the raw bytes are written as-is. With no cached bytes the
/// image is fetched fresh and written raw, in-flight prefetch or not.
pub async fn save_artifact(
    store: &ArtifactStore,
    gateway: &dyn StatsGateway,
    dir: &Path,
) -> Result<SaveOutcome> {
    let (reference, cache) = store.snapshot();
    let reference = reference
        .ok_or_else(|| ShortstatsError::artifact_unavailable("No QR code available"))?;
    let path = dir.join(format!("qrcode-{}.png", reference.identifier));

    if let CacheState::Ready(bytes) = cache {
        match reencode_png(&bytes) {
            Ok(png) => {
                write_artifact(&path, &png)?;
                return Ok(SaveOutcome::ReencodedPng(path));
            }
            Err(err) => {
                debug!(error = %err, "re-encode failed, writing cached bytes as-is");
                write_artifact(&path, &bytes)?;
                return Ok(SaveOutcome::RawBytes(path));
            }
        }
    }

    let bytes = gateway.fetch_bytes(&reference.source_url).await.map_err(|e| {
        debug!(error = %e, "artifact fetch for save failed");
        ShortstatsError::artifact_failed("Failed to download QR code")
    })?;
    store.store_bytes(&reference.identifier, bytes.clone());
    write_artifact(&path, &bytes)?;
    Ok(SaveOutcome::RawBytes(path))
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| {
        debug!(error = %e, path = %path.display(), "artifact write failed");
        // A failed write may leave a truncated file behind
        let _ = std::fs::remove_file(path);
        ShortstatsError::artifact_failed("Failed to download QR code")
    })
}

/// Wrap PNG bytes in a `data:` URL suitable for pasting into editors
fn png_data_url(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

fn reencode_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ShortstatsError::internal(format!("image decode failed: {}", e)))?;
    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| ShortstatsError::internal(format!("png encode failed: {}", e)))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::api::FetchOutcome;
    use crate::api::payloads::{
        AuthReply, HealthReply, LoginRequest, MessageReply, MyUrlsReply, RegisterRequest,
        ShortenReply, ShortenRequest,
    };
    use crate::report::StatsReport;

    struct ByteGateway {
        bytes: Option<Vec<u8>>,
        fetches: Mutex<u32>,
    }

    impl ByteGateway {
        fn serving(bytes: Vec<u8>) -> Self {
            Self {
                bytes: Some(bytes),
                fetches: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                bytes: None,
                fetches: Mutex::new(0),
            }
        }

        fn fetch_count(&self) -> u32 {
            *self.fetches.lock()
        }
    }

    #[async_trait]
    impl StatsGateway for ByteGateway {
        async fn enhanced_stats(&self, _: &str) -> Result<FetchOutcome<StatsReport>> {
            unreachable!("not scripted")
        }

        async fn basic_stats(&self, _: &str) -> Result<FetchOutcome<StatsReport>> {
            unreachable!("not scripted")
        }

        async fn shorten(
            &self,
            _: ShortenRequest,
            _: Option<String>,
        ) -> Result<FetchOutcome<ShortenReply>> {
            unreachable!("not scripted")
        }

        async fn login(&self, _: LoginRequest) -> Result<FetchOutcome<AuthReply>> {
            unreachable!("not scripted")
        }

        async fn register(&self, _: RegisterRequest) -> Result<FetchOutcome<AuthReply>> {
            unreachable!("not scripted")
        }

        async fn my_urls(&self, _: &str) -> Result<FetchOutcome<MyUrlsReply>> {
            unreachable!("not scripted")
        }

        async fn delete_url(&self, _: &str, _: &str) -> Result<FetchOutcome<MessageReply>> {
            unreachable!("not scripted")
        }

        async fn health(&self) -> Result<FetchOutcome<HealthReply>> {
            unreachable!("not scripted")
        }

        async fn fetch_bytes(&self, _: &str) -> Result<Vec<u8>> {
            *self.fetches.lock() += 1;
            self.bytes
                .clone()
                .ok_or_else(|| ShortstatsError::network("connection refused"))
        }

        fn qr_url(&self, code: &str, size: u32) -> String {
            format!("http://test/api/qr/{}?size={}", code, size)
        }
    }

    /// Scripted surface that records which tiers were attempted
    struct FakeSurface {
        images: bool,
        image_ok: bool,
        text_ok: bool,
        attempts: Vec<&'static str>,
    }

    impl FakeSurface {
        fn new(images: bool, image_ok: bool, text_ok: bool) -> Self {
            Self {
                images,
                image_ok,
                text_ok,
                attempts: Vec::new(),
            }
        }
    }

    impl ClipboardSurface for FakeSurface {
        fn supports_images(&self) -> bool {
            self.images
        }

        fn write_image(&mut self, _: usize, _: usize, _: &[u8]) -> Result<()> {
            self.attempts.push("image");
            if self.image_ok {
                Ok(())
            } else {
                Err(ShortstatsError::internal("image write refused"))
            }
        }

        fn write_text(&mut self, _: &str) -> Result<()> {
            self.attempts.push("text");
            if self.text_ok {
                Ok(())
            } else {
                Err(ShortstatsError::internal("text write refused"))
            }
        }
    }

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn reference() -> ArtifactReference {
        ArtifactReference {
            source_url: "http://test/api/qr/abc123?size=300".to_string(),
            identifier: "abc123".to_string(),
        }
    }

    fn ready_store(bytes: Vec<u8>) -> ArtifactStore {
        let store = ArtifactStore::new();
        store.set_reference(reference());
        store.store_bytes("abc123", bytes);
        store
    }

    #[tokio::test]
    async fn copy_without_reference_is_unavailable() {
        let store = ArtifactStore::new();
        let gateway = ByteGateway::failing();
        let mut surface = FakeSurface::new(true, true, true);
        let err = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap_err();
        assert!(matches!(err, ShortstatsError::ArtifactUnavailable(_)));
        assert_eq!(err.message(), "No QR code available");
        assert!(surface.attempts.is_empty());
    }

    #[tokio::test]
    async fn copy_during_prefetch_asks_caller_to_wait() {
        let store = ArtifactStore::new();
        store.set_reference(reference());
        assert!(store.begin_fetch("abc123"));
        let gateway = ByteGateway::serving(png_bytes());
        let mut surface = FakeSurface::new(true, true, true);
        let err = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap_err();
        assert!(matches!(err, ShortstatsError::ArtifactNotReady(_)));
        assert_eq!(err.message(), "Please wait for QR code to load...");
        assert_eq!(gateway.fetch_count(), 0);
    }

    #[tokio::test]
    async fn cached_png_lands_as_clipboard_image() {
        let store = ready_store(png_bytes());
        let gateway = ByteGateway::failing();
        let mut surface = FakeSurface::new(true, true, true);
        let outcome = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap();
        assert_eq!(outcome, CopyOutcome::Image);
        assert_eq!(surface.attempts, vec!["image"]);
        assert_eq!(gateway.fetch_count(), 0);
    }

    #[tokio::test]
    async fn empty_cache_fetches_on_demand_and_caches() {
        let store = ArtifactStore::new();
        store.set_reference(reference());
        let gateway = ByteGateway::serving(png_bytes());
        let mut surface = FakeSurface::new(true, true, true);
        let outcome = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap();
        assert_eq!(outcome, CopyOutcome::Image);
        assert_eq!(gateway.fetch_count(), 1);
        assert!(matches!(store.snapshot().1, CacheState::Ready(_)));
    }

    #[tokio::test]
    async fn rich_write_failure_falls_to_data_url_text() {
        let store = ready_store(png_bytes());
        let gateway = ByteGateway::failing();
        let mut surface = FakeSurface::new(true, false, true);
        let outcome = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap();
        assert_eq!(outcome, CopyOutcome::DataUrlText);
        assert_eq!(surface.attempts, vec!["image", "text"]);
    }

    #[tokio::test]
    async fn undecodable_bytes_skip_the_image_tier() {
        let store = ready_store(b"definitely not a png".to_vec());
        let gateway = ByteGateway::failing();
        let mut surface = FakeSurface::new(true, true, true);
        let outcome = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap();
        assert_eq!(outcome, CopyOutcome::DataUrlText);
        assert_eq!(surface.attempts, vec!["text"]);
    }

    #[tokio::test]
    async fn text_only_surface_never_sees_image_tier() {
        let store = ready_store(png_bytes());
        let gateway = ByteGateway::failing();
        let mut surface = FakeSurface::new(false, true, true);
        let outcome = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap();
        assert_eq!(outcome, CopyOutcome::DataUrlText);
        assert_eq!(surface.attempts, vec!["text"]);
    }

    #[tokio::test]
    async fn every_write_refused_ends_in_manual_prompt() {
        let store = ready_store(png_bytes());
        let gateway = ByteGateway::failing();
        let mut surface = FakeSurface::new(true, false, false);
        let outcome = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap();
        match outcome {
            CopyOutcome::ManualPrompt(data_url) => {
                assert!(data_url.starts_with("data:image/png;base64,"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(surface.attempts, vec!["image", "text"]);
    }

    #[tokio::test]
    async fn unreachable_bytes_fail_the_whole_copy() {
        let store = ArtifactStore::new();
        store.set_reference(reference());
        let gateway = ByteGateway::failing();
        let mut surface = FakeSurface::new(true, true, true);
        let err = copy_artifact(&store, &gateway, &mut surface)
            .await
            .unwrap_err();
        assert!(matches!(err, ShortstatsError::ArtifactFailed(_)));
        assert_eq!(err.message(), "Failed to copy QR code. Try downloading instead.");
        assert!(surface.attempts.is_empty());
    }

    #[tokio::test]
    async fn save_reencodes_cached_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = ready_store(png_bytes());
        let gateway = ByteGateway::failing();
        let outcome = save_artifact(&store, &gateway, dir.path()).await.unwrap();
        match outcome {
            SaveOutcome::ReencodedPng(path) => {
                assert_eq!(path, dir.path().join("qrcode-abc123.png"));
                let written = std::fs::read(&path).unwrap();
                assert!(image::load_from_memory(&written).is_ok());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(gateway.fetch_count(), 0);
    }

    #[tokio::test]
    async fn save_writes_undecodable_cache_raw() {
        let dir = tempfile::tempdir().unwrap();
        let raw = b"opaque server bytes".to_vec();
        let store = ready_store(raw.clone());
        let gateway = ByteGateway::failing();
        let outcome = save_artifact(&store, &gateway, dir.path()).await.unwrap();
        match outcome {
            SaveOutcome::RawBytes(path) => {
                assert_eq!(std::fs::read(&path).unwrap(), raw);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn save_during_prefetch_fetches_fresh_instead_of_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new();
        store.set_reference(reference());
        assert!(store.begin_fetch("abc123"));
        let gateway = ByteGateway::serving(png_bytes());
        let outcome = save_artifact(&store, &gateway, dir.path()).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::RawBytes(_)));
        assert_eq!(gateway.fetch_count(), 1);
    }

    #[tokio::test]
    async fn save_without_reference_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new();
        let gateway = ByteGateway::failing();
        let err = save_artifact(&store, &gateway, dir.path()).await.unwrap_err();
        assert!(matches!(err, ShortstatsError::ArtifactUnavailable(_)));
    }

    #[tokio::test]
    async fn save_fetch_failure_surfaces_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new();
        store.set_reference(reference());
        let gateway = ByteGateway::failing();
        let err = save_artifact(&store, &gateway, dir.path()).await.unwrap_err();
        assert!(matches!(err, ShortstatsError::ArtifactFailed(_)));
        assert_eq!(err.message(), "Failed to download QR code");
    }

    #[test]
    fn new_reference_drops_previous_cache() {
        let store = ready_store(png_bytes());
        store.set_reference(ArtifactReference {
            source_url: "http://test/api/qr/next?size=300".to_string(),
            identifier: "next".to_string(),
        });
        assert!(matches!(store.snapshot().1, CacheState::Empty));
    }

    #[test]
    fn stale_fetch_result_does_not_overwrite_new_reference() {
        let store = ArtifactStore::new();
        store.set_reference(reference());
        assert!(store.begin_fetch("abc123"));
        store.set_reference(ArtifactReference {
            source_url: "http://test/api/qr/next?size=300".to_string(),
            identifier: "next".to_string(),
        });
        store.store_bytes("abc123", png_bytes());
        assert!(matches!(store.snapshot().1, CacheState::Empty));
    }

    #[tokio::test]
    async fn prefetch_populates_cache() {
        let store = Arc::new(ArtifactStore::new());
        store.set_reference(reference());
        let gateway: Arc<dyn StatsGateway> = Arc::new(ByteGateway::serving(png_bytes()));
        spawn_prefetch(store.clone(), gateway);
        for _ in 0..50 {
            if matches!(store.snapshot().1, CacheState::Ready(_)) {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("prefetch never completed");
    }

    #[tokio::test]
    async fn failed_prefetch_leaves_cache_empty_for_on_demand_fetch() {
        let store = Arc::new(ArtifactStore::new());
        store.set_reference(reference());
        let gateway: Arc<dyn StatsGateway> = Arc::new(ByteGateway::failing());
        spawn_prefetch(store.clone(), gateway);
        for _ in 0..50 {
            if matches!(store.snapshot().1, CacheState::Empty) {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("prefetch marker never cleared");
    }
}
