//! The embedded video.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::StartupError;

/// Reads the video at `path` and returns it base64-encoded.
///
/// # Errors
///
/// Returns [`StartupError::MediaMissing`] if the file does not exist and
/// [`StartupError::MediaUnreadable`] if it cannot be read.
pub fn load_video_base64(path: &Path) -> Result<String, StartupError> {
    if !path.is_file() {
        return Err(StartupError::MediaMissing {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|source| StartupError::MediaUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("embedded {} ({} bytes)", path.display(), bytes.len());
    Ok(STANDARD.encode(bytes))
}
