// Error types shared across the player
// Each concern gets its own enum; the binary edge wraps them in anyhow

use std::path::PathBuf;
use thiserror::Error;

use crate::youtube::api::ApiFamily;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("not a YouTube URL or video id: {0:?}")]
    InvalidInput(String),

    #[error("{endpoint} failed: {reason}")]
    EndpointFailure { endpoint: String, reason: String },

    #[error("no audio stream available from {family} ({attempts} mirrors tried)")]
    NoStreamAvailable { family: ApiFamily, attempts: usize },
}

impl ResolveError {
    pub fn endpoint(endpoint: &str, reason: impl std::fmt::Display) -> Self {
        ResolveError::EndpointFailure {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("download returned no data")]
    EmptyBody,

    #[error("local audio for {0:?} is no longer loaded")]
    MissingBlob(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{} is not an audio file", .0.display())]
    NotAudio(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("could not decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("audio output rejected the stream")]
    Output,
}
