// Invidious API response handling
// GET {base}/api/v1/videos/{video_id} -> { title, adaptiveFormats: [{ url, type, ... }] }

use serde::Deserialize;

use super::api::{StreamInfo, DEFAULT_TITLE};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub title: Option<String>,
    #[serde(default)]
    pub adaptive_formats: Option<Vec<AdaptiveFormat>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdaptiveFormat {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

pub fn video_url(base: &str, video_id: &str) -> String {
    format!("{}/api/v1/videos/{}", base.trim_end_matches('/'), video_id)
}

// First format whose declared media type mentions audio and that has a url
pub fn first_audio_format(formats: &[AdaptiveFormat]) -> Option<&AdaptiveFormat> {
    formats.iter().find(|format| {
        format.url.as_deref().is_some_and(|url| !url.is_empty())
            && format
                .media_type
                .as_deref()
                .is_some_and(|kind| kind.contains("audio"))
    })
}

pub fn select(response: VideoResponse) -> Result<StreamInfo, String> {
    let formats = response.adaptive_formats.unwrap_or_default();
    let stream_url = first_audio_format(&formats)
        .and_then(|format| format.url.clone())
        .ok_or("no audio format found")?;

    Ok(StreamInfo {
        title: response
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        stream_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_first_audio_format() {
        let json = r#"{
            "title": "Never Gonna Give You Up",
            "adaptiveFormats": [
                {"url": "https://cdn/video", "type": "video/mp4; codecs=\"avc1.4d401f\"", "bitrate": "1000000"},
                {"url": "https://cdn/audio1", "type": "audio/mp4; codecs=\"mp4a.40.2\"", "bitrate": "130000"},
                {"url": "https://cdn/audio2", "type": "audio/webm; codecs=\"opus\""}
            ]
        }"#;
        let response: VideoResponse = serde_json::from_str(json).unwrap();
        let info = select(response).unwrap();
        assert_eq!(info.title, "Never Gonna Give You Up");
        assert_eq!(info.stream_url, "https://cdn/audio1");
    }

    #[test]
    fn formats_without_type_are_skipped() {
        let formats = vec![
            AdaptiveFormat {
                url: Some("untyped".to_string()),
                media_type: None,
            },
            AdaptiveFormat {
                url: Some("typed".to_string()),
                media_type: Some("audio/webm".to_string()),
            },
        ];
        assert_eq!(first_audio_format(&formats).and_then(|f| f.url.as_deref()), Some("typed"));
    }

    #[test]
    fn empty_title_gets_default() {
        let json = r#"{"title": "", "adaptiveFormats": [{"url": "https://cdn/a", "type": "audio/webm"}]}"#;
        let response: VideoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(select(response).unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn audio_formats_without_url_are_skipped() {
        let json = r#"{
            "title": "Tape",
            "adaptiveFormats": [
                {"type": "audio/mp4; codecs=\"mp4a.40.2\""},
                {"url": "https://cdn/audio2", "type": "audio/webm; codecs=\"opus\""}
            ]
        }"#;
        let response: VideoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(select(response).unwrap().stream_url, "https://cdn/audio2");
    }

    #[test]
    fn video_only_response_fails() {
        let json = r#"{"adaptiveFormats": [{"url": "v", "type": "video/webm"}]}"#;
        let response: VideoResponse = serde_json::from_str(json).unwrap();
        assert!(select(response).is_err());

        let bare: VideoResponse = serde_json::from_str("{}").unwrap();
        assert!(select(bare).is_err());
    }

    #[test]
    fn builds_video_url() {
        assert_eq!(video_url("https://yewtu.be", "abc"), "https://yewtu.be/api/v1/videos/abc");
    }
}
