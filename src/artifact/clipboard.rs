//! Clipboard seam
//!
//! The copy chain talks to [`ClipboardSurface`] so the tier logic can
//! be exercised with a scripted surface. [`system_clipboard`] yields
//! the real `arboard`-backed surface, degrading to a text-less null
//! surface when the platform clipboard cannot be opened (headless
//! sessions, missing display server).

use std::borrow::Cow;

use arboard::{Clipboard, ImageData};
use tracing::warn;

use crate::errors::{Result, ShortstatsError};

/// Destination for copied artifacts
pub trait ClipboardSurface {
    /// Whether the surface can hold raw image data at all
    fn supports_images(&self) -> bool;

    /// Place an RGBA image on the surface
    fn write_image(&mut self, width: usize, height: usize, rgba: &[u8]) -> Result<()>;

    /// Place plain text on the surface
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Operating-system clipboard via `arboard`
pub struct SystemClipboard {
    inner: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = Clipboard::new().map_err(|e| {
            ShortstatsError::internal(format!("clipboard unavailable: {}", e))
        })?;
        Ok(Self { inner })
    }
}

impl ClipboardSurface for SystemClipboard {
    fn supports_images(&self) -> bool {
        true
    }

    fn write_image(&mut self, width: usize, height: usize, rgba: &[u8]) -> Result<()> {
        let image = ImageData {
            width,
            height,
            bytes: Cow::Borrowed(rgba),
        };
        self.inner
            .set_image(image)
            .map_err(|e| ShortstatsError::internal(format!("clipboard image write failed: {}", e)))
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ShortstatsError::internal(format!("clipboard text write failed: {}", e)))
    }
}

/// Surface used when no clipboard could be opened; every write fails
/// so the copy chain runs through its fallbacks uniformly.
pub struct NullClipboard {
    reason: String,
}

impl ClipboardSurface for NullClipboard {
    fn supports_images(&self) -> bool {
        false
    }

    fn write_image(&mut self, _: usize, _: usize, _: &[u8]) -> Result<()> {
        Err(ShortstatsError::internal(self.reason.clone()))
    }

    fn write_text(&mut self, _: &str) -> Result<()> {
        Err(ShortstatsError::internal(self.reason.clone()))
    }
}

/// Open the platform clipboard, falling back to a null surface
pub fn system_clipboard() -> Box<dyn ClipboardSurface> {
    match SystemClipboard::new() {
        Ok(surface) => Box::new(surface),
        Err(err) => {
            warn!(error = %err, "clipboard unavailable, copy will degrade to manual output");
            Box::new(NullClipboard {
                reason: err.message().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_surface_rejects_every_write() {
        let mut surface = NullClipboard {
            reason: "no display".to_string(),
        };
        assert!(!surface.supports_images());
        assert!(surface.write_image(1, 1, &[0, 0, 0, 0]).is_err());
        assert!(surface.write_text("data:image/png;base64,AAAA").is_err());
    }
}
