// ==========================================
// STREAM RESOLVER
// ==========================================
// Turns a YouTube URL or video id into a direct audio stream URL.
//
// How it works:
// 1. Pull the video id out of whatever the user pasted
// 2. Walk the selected family's mirror list in order
// 3. Ask each mirror for the video's formats, one request at a time
// 4. The first mirror that yields an audio stream wins
//
// A failing mirror (network error, bad status, broken JSON, no audio)
// is logged and skipped. Only when every mirror failed does the caller
// see an error.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::api::{ApiFamily, Protocol, StreamInfo};
use super::extractor::require_video_id;
use super::{invidious, piped};
use crate::error::ResolveError;

const USER_AGENT: &str = concat!("tapeflow/", env!("CARGO_PKG_VERSION"));

// ==========================================
// MIRROR CLIENT TRAIT
// ==========================================
// One request against one mirror. The resolver only sees success or
// failure, so tests can script mirrors without a network.
#[async_trait]
pub trait MirrorClient: Send + Sync {
    async fn fetch(
        &self,
        protocol: Protocol,
        endpoint: &str,
        video_id: &str,
    ) -> Result<StreamInfo, ResolveError>;
}

pub struct HttpMirrorClient {
    client: reqwest::Client,
}

impl HttpMirrorClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(HttpMirrorClient { client })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        url: &str,
    ) -> Result<T, ResolveError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::endpoint(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::endpoint(endpoint, format!("HTTP {}", status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ResolveError::endpoint(endpoint, format!("bad response body: {}", e)))
    }
}

#[async_trait]
impl MirrorClient for HttpMirrorClient {
    async fn fetch(
        &self,
        protocol: Protocol,
        endpoint: &str,
        video_id: &str,
    ) -> Result<StreamInfo, ResolveError> {
        let selected = match protocol {
            Protocol::Piped => {
                let url = piped::streams_url(endpoint, video_id);
                let response: piped::StreamsResponse = self.get_json(endpoint, &url).await?;
                piped::select(response)
            }
            Protocol::Invidious => {
                let url = invidious::video_url(endpoint, video_id);
                let response: invidious::VideoResponse = self.get_json(endpoint, &url).await?;
                invidious::select(response)
            }
        };

        selected.map_err(|reason| ResolveError::endpoint(endpoint, reason))
    }
}

// ==========================================
// RESOLVER
// ==========================================
pub struct StreamResolver<C> {
    client: C,
    endpoints: HashMap<ApiFamily, Vec<String>>,
}

impl<C: MirrorClient> StreamResolver<C> {
    pub fn new(client: C, endpoints: HashMap<ApiFamily, Vec<String>>) -> Self {
        StreamResolver { client, endpoints }
    }

    pub fn endpoints(&self, family: ApiFamily) -> &[String] {
        self.endpoints
            .get(&family)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub async fn resolve(
        &self,
        input: &str,
        family: ApiFamily,
    ) -> Result<StreamInfo, ResolveError> {
        let video_id = require_video_id(input)?;
        let endpoints = self.endpoints(family);

        tracing::info!(%video_id, %family, mirrors = endpoints.len(), "resolving stream");

        // Strictly sequential: one in-flight request at a time
        for endpoint in endpoints {
            match self.client.fetch(family.protocol(), endpoint, &video_id).await {
                Ok(info) => {
                    tracing::info!(%endpoint, title = %info.title, "stream resolved");
                    return Ok(info);
                }
                Err(e) => {
                    tracing::warn!(%endpoint, error = %e, "mirror failed, trying next");
                }
            }
        }

        Err(ResolveError::NoStreamAvailable {
            family,
            attempts: endpoints.len(),
        })
    }
}
