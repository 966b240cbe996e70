//! Screenshot capture and saving.
//!
//! `save_screenshot` path rules:
//! - blank path: a generated `screenshot-*.png` in the system temp dir
//! - trailing separator: treated as a directory, name generated inside it
//! - anything else: used as-is, with `.png` appended when the path has no
//!   extension

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::WireRequest;
use crate::session::{decode, Session};

impl Session {
    /// Captures the current page as a base64-encoded PNG.
    pub async fn take_screenshot(&self) -> Result<String> {
        decode(
            self.call_value("takeScreenshot", WireRequest::get("/screenshot"))
                .await?,
        )
    }

    /// Captures the current page and writes the decoded PNG to disk.
    ///
    /// Returns the path actually written.
    pub async fn save_screenshot(&self, path: &str) -> Result<PathBuf> {
        let encoded = self.take_screenshot().await?;
        let bytes = BASE64.decode(encoded.as_bytes()).map_err(|_| {
            Error::unexpected_value(
                "screenshot payload is not valid base64",
                serde_json::Value::String(encoded),
            )
        })?;
        let target = resolve_screenshot_path(path)?;
        tokio::fs::write(&target, bytes).await?;
        debug!(path = %target.display(), "screenshot saved");
        Ok(target)
    }
}

// ============================================================================
// Path Resolution
// ============================================================================

fn resolve_screenshot_path(path: &str) -> Result<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return generated_in(&std::env::temp_dir());
    }
    if trimmed.ends_with('/') || trimmed.ends_with(MAIN_SEPARATOR) {
        return generated_in(Path::new(trimmed));
    }
    let mut target = PathBuf::from(trimmed);
    if target.extension().is_none() {
        target.set_extension("png");
    }
    Ok(target)
}

/// Reserves a fresh `screenshot-*.png` inside `dir`.
fn generated_in(dir: &Path) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("screenshot-")
        .suffix(".png")
        .tempfile_in(dir)?;
    let (_, path) = file.keep().map_err(|err| Error::from(err.error))?;
    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;

    use serde_json::json;

    #[test]
    fn test_explicit_path_gains_png_extension() {
        let resolved = resolve_screenshot_path("shots/login").unwrap();
        assert_eq!(resolved, PathBuf::from("shots/login.png"));
    }

    #[test]
    fn test_explicit_path_with_extension_untouched() {
        let resolved = resolve_screenshot_path("shots/login.jpeg").unwrap();
        assert_eq!(resolved, PathBuf::from("shots/login.jpeg"));
    }

    #[test]
    fn test_blank_path_generates_in_temp_dir() {
        let resolved = resolve_screenshot_path("  ").unwrap();
        let name = resolved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("screenshot-"));
        assert!(name.ends_with(".png"));
        assert!(resolved.starts_with(std::env::temp_dir()));
        std::fs::remove_file(&resolved).ok();
    }

    #[test]
    fn test_trailing_separator_generates_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let with_sep = format!("{}/", dir.path().display());
        let resolved = resolve_screenshot_path(&with_sep).unwrap();
        assert!(resolved.starts_with(dir.path()));
        assert!(resolved
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("screenshot-"));
    }

    #[tokio::test]
    async fn test_save_screenshot_writes_decoded_bytes() -> anyhow::Result<()> {
        let transport = MockTransport::new();
        // base64 of "PNG"
        transport.push_value(json!("UE5H"));
        let session = attached_session(transport);

        let dir = tempfile::tempdir()?;
        let target = dir.path().join("page");
        let written = session.save_screenshot(target.to_str().unwrap()).await?;

        assert_eq!(written.extension().unwrap(), "png");
        assert_eq!(std::fs::read(&written)?, b"PNG");
        Ok(())
    }

    #[tokio::test]
    async fn test_save_screenshot_rejects_bad_base64() {
        let transport = MockTransport::new();
        transport.push_value(json!("not base64!!!"));
        let session = attached_session(transport);

        let err = session.save_screenshot("out.png").await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedValue { .. }));
    }
}
