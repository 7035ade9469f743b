// YouTube video id extraction
// Accepts full watch/share/embed/shorts URLs or a bare 11-character id

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ResolveError;

// Tried in order, first match wins
static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)([^&\n?#]+)",
        )
        .expect("url pattern"),
        Regex::new(r"^([a-zA-Z0-9_-]{11})$").expect("bare id pattern"),
    ]
});

pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

pub fn require_video_id(input: &str) -> Result<String, ResolveError> {
    extract_video_id(input).ok_or_else(|| ResolveError::InvalidInput(input.to_string()))
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn all_url_shapes_yield_same_id() {
        let inputs = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123&index=2",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ#comments",
            "dQw4w9WgXcQ",
            "  dQw4w9WgXcQ  ",
        ];
        for input in inputs {
            assert_eq!(extract_video_id(input).as_deref(), Some(ID), "{input}");
        }
    }

    #[test]
    fn unrecognized_input_is_rejected() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("dQw4w9WgXc"), None);
        assert_eq!(extract_video_id("https://vimeo.com/123456"), None);

        match require_video_id("not a url") {
            Err(ResolveError::InvalidInput(input)) => assert_eq!(input, "not a url"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn watch_url_points_at_youtube() {
        assert_eq!(watch_url(ID), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
