// Piped API response handling
// GET {base}/streams/{video_id} -> { title, audioStreams: [{ url, bitrate, ... }] }

use serde::Deserialize;

use super::api::{StreamInfo, DEFAULT_TITLE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamsResponse {
    pub title: Option<String>,
    #[serde(default)]
    pub audio_streams: Option<Vec<AudioStream>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStream {
    pub url: Option<String>,
    pub bitrate: Option<u64>,
    pub mime_type: Option<String>,
}

pub fn streams_url(base: &str, video_id: &str) -> String {
    format!("{}/streams/{}", base.trim_end_matches('/'), video_id)
}

// Highest declared bitrate wins; a missing bitrate counts as 0.
// Entries without a url are never picked.
pub fn best_audio_stream(streams: &[AudioStream]) -> Option<&AudioStream> {
    streams
        .iter()
        .filter(|stream| stream.url.as_deref().is_some_and(|url| !url.is_empty()))
        .enumerate()
        // Ties keep the earliest entry
        .max_by(|(ia, a), (ib, b)| {
            a.bitrate
                .unwrap_or(0)
                .cmp(&b.bitrate.unwrap_or(0))
                .then(ib.cmp(ia))
        })
        .map(|(_, stream)| stream)
}

pub fn select(response: StreamsResponse) -> Result<StreamInfo, String> {
    let streams = response.audio_streams.unwrap_or_default();
    let stream_url = best_audio_stream(&streams)
        .and_then(|stream| stream.url.clone())
        .ok_or("no audio stream found")?;

    Ok(StreamInfo {
        title: response
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        stream_url,
    })
}
