//! Screenshot persistence.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Writes captured screenshots under the scans directory and builds their
/// public URLs.
pub struct ScreenshotStore {
    dir: PathBuf,
    base_url: String,
}

impl ScreenshotStore {
    /// Open (creating if needed) the store at `dir`. `base_url` is the
    /// public origin screenshots are served from; any trailing slash is
    /// dropped.
    pub fn new(dir: impl Into<PathBuf>, base_url: &str) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one capture and return its public URL. Filenames are
    /// timestamped so concurrent scans never collide at second resolution.
    pub async fn save(&self, png: &[u8]) -> io::Result<String> {
        let filename = format!("scan-{}.png", chrono::Utc::now().timestamp_millis());
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, png).await?;
        debug!("Saved screenshot to {}", path.display());
        Ok(format!("{}/scans/{}", self.base_url, filename))
    }
}
