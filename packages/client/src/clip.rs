//! Audio clips as `data:` URLs.
//!
//! The relay treats audio as an opaque string. Clients agree on the shape
//! `data:<mime>;base64,<payload>`, which is what browsers produce from a
//! recorded `Blob`.

use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Why a clip could not be encoded or decoded
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("clip is empty")]
    Empty,
}

/// A decoded clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedClip {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Guess the MIME type from a file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("webm") => "audio/webm",
        Some("ogg" | "oga" | "opus") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a" | "mp4") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// File extension used when saving a clip of the given MIME type
pub fn extension_for(mime: &str) -> &'static str {
    // "audio/webm;codecs=opus" -> "audio/webm"
    match mime.split(';').next().unwrap_or_default() {
        "audio/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/mpeg" => "mp3",
        "audio/mp4" => "m4a",
        _ => "bin",
    }
}

pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn decode(data_url: &str) -> Result<DecodedClip, ClipError> {
    let rest = data_url.strip_prefix("data:").ok_or(ClipError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(ClipError::NotDataUrl)?;
    let mime = header.strip_suffix(";base64").ok_or(ClipError::NotBase64)?;
    let bytes = STANDARD.decode(payload)?;
    Ok(DecodedClip {
        mime: mime.to_string(),
        bytes,
    })
}

/// Read an audio file and turn it into a data URL
pub async fn encode_file(path: &Path) -> Result<String, crate::ClientError> {
    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(ClipError::Empty.into());
    }
    Ok(encode(mime_for_path(path), &bytes))
}

/// Name of the file a received clip is saved under
///
/// Characters that are awkward in file names are replaced with `-`.
pub fn file_name(sender_id: &str, timestamp: &str, clip: &DecodedClip) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '-' })
            .collect()
    };
    format!(
        "{}_{}.{}",
        sanitize(timestamp),
        sanitize(sender_id),
        extension_for(&clip.mime)
    )
}

/// Decode a received data URL and write it into `dir`
pub async fn save(
    dir: &Path,
    sender_id: &str,
    timestamp: &str,
    data_url: &str,
) -> Result<PathBuf, crate::ClientError> {
    let clip = decode(data_url)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(sender_id, timestamp, &clip));
    tokio::fs::write(&path, &clip.bytes).await?;
    Ok(path)
}
