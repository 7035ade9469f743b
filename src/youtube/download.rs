// Track downloads
// Saves a playlist track's audio into the download directory

use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;
use crate::player::blob::Blob;
use crate::player::playlist::{Track, TrackKind};

pub struct Downloader {
    client: reqwest::Client,
    dest_dir: PathBuf,
}

impl Downloader {
    pub fn new(dest_dir: PathBuf, timeout: Duration) -> Result<Self, reqwest::Error> {
        // Streams can be large; only the connect phase gets a deadline
        let client = reqwest::Client::builder().connect_timeout(timeout).build()?;
        Ok(Downloader { client, dest_dir })
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    // `local` must hold the blob for local tracks; remote tracks ignore it
    pub async fn download(
        &self,
        track: &Track,
        local: Option<Blob>,
    ) -> Result<PathBuf, DownloadError> {
        tokio::fs::create_dir_all(&self.dest_dir)
            .await
            .map_err(|source| DownloadError::Io {
                path: self.dest_dir.clone(),
                source,
            })?;

        let path = match track.kind {
            TrackKind::Local => {
                let blob = local.ok_or_else(|| DownloadError::MissingBlob(track.name.clone()))?;
                let path = self.target_path(&track.name, &blob.mime);
                tokio::fs::write(&path, &blob.data[..])
                    .await
                    .map_err(|source| DownloadError::Io {
                        path: path.clone(),
                        source,
                    })?;
                path
            }
            TrackKind::Youtube => self.fetch_to_file(track).await?,
        };

        tracing::info!(track = %track.name, path = %path.display(), "track downloaded");
        Ok(path)
    }

    // Whole remote stream in memory, for playback
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status()));
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(DownloadError::EmptyBody);
        }
        Ok(bytes.to_vec())
    }

    async fn fetch_to_file(&self, track: &Track) -> Result<PathBuf, DownloadError> {
        let mut response = self.client.get(&track.url).send().await?;
        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status()));
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();
        let path = self.target_path(&track.name, &mime);

        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|source| DownloadError::Io {
                path: path.clone(),
                source,
            })?;

        // Never leave a partial file behind
        let written = match write_body(&mut response, &mut file, &path).await {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(e);
            }
        };

        if written == 0 {
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(DownloadError::EmptyBody);
        }

        Ok(path)
    }

    fn target_path(&self, name: &str, mime: &str) -> PathBuf {
        unique_path(&self.dest_dir, &sanitize_file_name(name), extension_for_mime(mime))
    }
}

async fn write_body(
    response: &mut reqwest::Response,
    file: &mut tokio::fs::File,
    path: &Path,
) -> Result<usize, DownloadError> {
    let io_err = |source| DownloadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut written = 0usize;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len();
    }
    file.flush().await.map_err(io_err)?;
    Ok(written)
}

// Keeps names portable across filesystems
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "track".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    // Strip parameters like "; codecs=opus"
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match essence.as_str() {
        "audio/mp4" | "audio/x-m4a" | "audio/m4a" => "m4a",
        "audio/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/opus" => "opus",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/aac" => "aac",
        _ => "mp3",
    }
}

// "name.ext", then "name (1).ext", "name (2).ext", ...
pub fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let first = dir.join(format!("{}.{}", stem, ext));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{} ({}).{}", stem, n, ext)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{http_response, serve_once};
    use std::sync::Arc;

    #[test]
    fn sanitizes_reserved_characters() {
        assert_eq!(sanitize_file_name("AC/DC: Live?"), "AC_DC_ Live_");
        assert_eq!(sanitize_file_name("  ..  "), "track");
        assert_eq!(sanitize_file_name("Plain Song"), "Plain Song");
    }

    #[test]
    fn maps_mime_to_extension() {
        assert_eq!(extension_for_mime("audio/webm; codecs=\"opus\""), "webm");
        assert_eq!(extension_for_mime("audio/mp4"), "m4a");
        assert_eq!(extension_for_mime("AUDIO/FLAC"), "flac");
        assert_eq!(extension_for_mime("application/octet-stream"), "mp3");
    }

    #[test]
    fn collisions_get_numbered_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("song.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("song (1).mp3"), b"x").unwrap();

        assert_eq!(unique_path(dir.path(), "song", "mp3"), dir.path().join("song (2).mp3"));
        assert_eq!(unique_path(dir.path(), "other", "mp3"), dir.path().join("other.mp3"));
    }

    #[tokio::test]
    async fn local_track_writes_blob_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(dir.path().join("out"), Duration::from_secs(5)).unwrap();
        let track = Track::local("Demo Tape".to_string(), "blob:tapeflow/1".to_string());
        let blob = Blob {
            data: Arc::from(&b"RIFF....WAVE"[..]),
            mime: "audio/wav".to_string(),
        };

        let path = downloader.download(&track, Some(blob)).await.unwrap();

        assert_eq!(path, dir.path().join("out").join("Demo Tape.wav"));
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....WAVE");
    }

    fn entries(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .map(|entries| entries.map(|e| e.unwrap().path()).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn remote_track_is_saved_with_content_type_extension() {
        let base = serve_once(http_response("200 OK", "audio/webm", b"opus-bytes")).await;
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(dir.path().to_path_buf(), Duration::from_secs(5)).unwrap();
        let track = Track::youtube("Live: Set".to_string(), format!("{}/audio", base));

        let path = downloader.download(&track, None).await.unwrap();

        assert_eq!(path, dir.path().join("Live_ Set.webm"));
        assert_eq!(std::fs::read(&path).unwrap(), b"opus-bytes");
    }

    #[tokio::test]
    async fn truncated_body_leaves_no_file() {
        // Promises far more than it sends, then hangs up
        let mut raw = b"HTTP/1.1 200 OK\r\nContent-Type: audio/mpeg\r\nContent-Length: 100000\r\n\r\n"
            .to_vec();
        raw.extend(std::iter::repeat(7u8).take(5000));
        let base = serve_once(raw).await;

        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(dir.path().to_path_buf(), Duration::from_secs(5)).unwrap();
        let track = Track::youtube("Cut".to_string(), format!("{}/audio", base));

        assert!(downloader.download(&track, None).await.is_err());
        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let base = serve_once(http_response("404 Not Found", "text/plain", b"gone")).await;
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(dir.path().to_path_buf(), Duration::from_secs(5)).unwrap();
        let track = Track::youtube("Missing".to_string(), format!("{}/audio", base));

        let err = downloader.download(&track, None).await.unwrap_err();

        assert!(matches!(err, DownloadError::Status(status) if status.as_u16() == 404));
        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn local_track_without_blob_fails() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(dir.path().to_path_buf(), Duration::from_secs(5)).unwrap();
        let track = Track::local("Gone".to_string(), "blob:tapeflow/9".to_string());

        let err = downloader.download(&track, None).await.unwrap_err();

        assert!(matches!(err, DownloadError::MissingBlob(name) if name == "Gone"));
    }
}
