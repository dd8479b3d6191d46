//! Asset downloading with content-type detection and collision-safe
//! naming.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use vwv_models::{DownloadedAsset, MediaKind};

use crate::error::{MediaError, MediaResult};

/// Default timeout for one asset fetch.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Some providers reject requests with default client identifiers.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Maximum sanitized filename stem length.
const MAX_STEM_LEN: usize = 60;

/// What the caller expects the asset to be; drives the last-resort
/// default extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    Auto,
    Image,
    Video,
    Audio,
}

impl ExpectedKind {
    /// Last-resort extension when every detection step fails.
    fn default_extension(&self) -> &'static str {
        match self {
            ExpectedKind::Image => "jpg",
            ExpectedKind::Video => "mp4",
            ExpectedKind::Audio => "mp3",
            ExpectedKind::Auto => "bin",
        }
    }
}

/// Downloads one candidate URL to disk.
///
/// Extension detection runs an ordered fallback chain: response
/// content-type, URL path suffix, magic-byte sniff, kind default. The
/// destination name is derived from the sanitized base name and never
/// silently overwrites a different asset.
pub struct Downloader {
    http: Client,
}

impl Downloader {
    pub fn new(timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http }
    }

    /// Fetch `url` into `target_dir`.
    ///
    /// `base_name` seeds the destination filename; when absent the URL
    /// path stem is used. Any failure (timeout, non-2xx, empty body, I/O)
    /// yields a [`MediaError`] the caller treats as a skipped asset.
    pub async fn download(
        &self,
        url: &str,
        target_dir: &Path,
        expected: ExpectedKind,
        base_name: Option<&str>,
    ) -> MediaResult<DownloadedAsset> {
        let response = self
            .http
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(MediaError::EmptyBody {
                url: url.to_string(),
            });
        }

        let extension = detect_extension(content_type.as_deref(), url, &body, expected);
        let kind = kind_for_extension(&extension, expected);

        let stem = base_name
            .map(sanitize_base_name)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| url_stem(url));

        let (dest, reused) = resolve_destination(target_dir, &stem, &extension, &body).await?;

        let byte_size = tokio::fs::metadata(&dest).await?.len();
        if byte_size == 0 {
            // Zero bytes on disk after a non-empty body means the write
            // went wrong; do not hand the path to the manifest.
            tokio::fs::remove_file(&dest).await.ok();
            return Err(MediaError::download_failed(format!(
                "wrote zero bytes for {}",
                url
            )));
        }

        info!(
            url = url,
            path = %dest.display(),
            extension = extension.as_str(),
            byte_size = byte_size,
            reused = reused,
            "Downloaded asset"
        );

        Ok(DownloadedAsset {
            local_path: dest,
            source_url: url.to_string(),
            extension,
            byte_size,
            kind,
        })
    }
}

/// Ordered extension detection chain.
fn detect_extension(
    content_type: Option<&str>,
    url: &str,
    body: &[u8],
    expected: ExpectedKind,
) -> String {
    if let Some(ext) = content_type.and_then(extension_for_content_type) {
        return ext.to_string();
    }
    if let Some(ext) = extension_from_url(url) {
        return ext;
    }
    if let Some(kind) = infer::get(body) {
        debug!(
            mime = kind.mime_type(),
            "Extension resolved by magic-byte sniff"
        );
        return kind.extension().to_string();
    }
    warn!(url = url, "Extension detection fell through to kind default");
    expected.default_extension().to_string()
}

fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    // Parameters like "; charset=utf-8" are irrelevant here.
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/mp4" => Some("m4a"),
        "audio/ogg" => Some("ogg"),
        "audio/wav" | "audio/x-wav" => Some("wav"),
        _ => None,
    }
}

const KNOWN_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "mp4", "webm", "mov", "mkv", "mp3", "m4a", "ogg", "wav",
];

/// Extension from the URL path suffix, ignoring query strings.
fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let ext = Path::new(parsed.path()).extension()?.to_str()?.to_ascii_lowercase();
    if KNOWN_EXTENSIONS.contains(&ext.as_str()) {
        Some(if ext == "jpeg" { "jpg".to_string() } else { ext })
    } else {
        None
    }
}

fn kind_for_extension(ext: &str, expected: ExpectedKind) -> MediaKind {
    match expected {
        ExpectedKind::Image => return MediaKind::Image,
        ExpectedKind::Video => return MediaKind::Video,
        ExpectedKind::Audio => return MediaKind::Music,
        ExpectedKind::Auto => {}
    }
    match ext {
        "mp4" | "webm" | "mov" | "mkv" => MediaKind::Video,
        "mp3" | "m4a" | "ogg" | "wav" => MediaKind::Music,
        _ => MediaKind::Image,
    }
}

/// Sanitize a filename stem: drop long hex/hash-looking tokens, map
/// non-word runs to underscores, collapse, and bound the length.
pub fn sanitize_base_name(name: &str) -> String {
    static HEX_TOKEN: OnceLock<Regex> = OnceLock::new();
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    static UNDERSCORES: OnceLock<Regex> = OnceLock::new();

    let hex = HEX_TOKEN.get_or_init(|| Regex::new(r"[0-9a-fA-F]{12,}").unwrap());
    let non_word = NON_WORD.get_or_init(|| Regex::new(r"[^\w]+").unwrap());
    let underscores = UNDERSCORES.get_or_init(|| Regex::new(r"_{2,}").unwrap());

    let cleaned = hex.replace_all(name, "");
    let cleaned = non_word.replace_all(&cleaned, "_");
    let cleaned = underscores.replace_all(&cleaned, "_");
    let cleaned = cleaned.trim_matches('_');

    cleaned.chars().take(MAX_STEM_LEN).collect()
}

/// Filename stem derived from the URL path, sanitized the same way.
fn url_stem(url: &str) -> String {
    let stem = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_default();
    let sanitized = sanitize_base_name(&stem);
    if sanitized.is_empty() {
        "asset".to_string()
    } else {
        sanitized
    }
}

/// Write the body under a destination name that does not clobber a
/// different asset.
///
/// Each name is claimed atomically with `create_new`, so concurrent
/// downloads sharing a stem can never both win the same path. Returns
/// `(path, true)` when an existing file already holds exactly these bytes
/// (idempotent re-run); otherwise `(path, false)` after writing to a
/// freshly claimed name, appending `_1`, `_2`, … past collisions.
async fn resolve_destination(
    dir: &Path,
    stem: &str,
    extension: &str,
    body: &[u8],
) -> MediaResult<(PathBuf, bool)> {
    for attempt in 0u32.. {
        let name = if attempt == 0 {
            format!("{}.{}", stem, extension)
        } else {
            format!("{}_{}.{}", stem, attempt, extension)
        };
        let candidate = dir.join(name);

        let open = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await;
        match open {
            Ok(mut file) => {
                file.write_all(body).await?;
                file.flush().await?;
                return Ok((candidate, false));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // Same size is the cheap precondition for "same asset";
                // only then compare content.
                let meta = tokio::fs::metadata(&candidate).await?;
                if meta.len() == body.len() as u64 {
                    let existing = tokio::fs::read(&candidate).await?;
                    if existing == body {
                        return Ok((candidate, true));
                    }
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
    unreachable!("destination resolution loop is unbounded")
}
