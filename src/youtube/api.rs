// API families and their public mirror lists
// A family is a set of mirrors that all speak the same protocol

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Title used when a mirror answers without one
pub const DEFAULT_TITLE: &str = "YouTube Audio";

const PIPED_MIRRORS: &[&str] = &[
    "https://pipedapi.kavin.rocks",
    "https://pipedapi.tokhmi.xyz",
    "https://pipedapi.moomoo.me",
    "https://pipedapi.syncpundit.io",
    "https://api-piped.mha.fi",
];

const INVIDIOUS_MIRRORS: &[&str] = &[
    "https://iv.ggtyler.dev",
    "https://invidious.protokolla.fi",
    "https://yt.drgnz.club",
];

const INVIDIOUS_ALT_MIRRORS: &[&str] = &[
    "https://invidious.private.coffee",
    "https://iv.nboeck.de",
    "https://yewtu.be",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ApiFamily {
    #[default]
    Piped,
    Invidious,
    Invidious2,
}

// Wire protocol spoken by a family's mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Piped,
    Invidious,
}

impl ApiFamily {
    pub const ALL: [ApiFamily; 3] = [ApiFamily::Piped, ApiFamily::Invidious, ApiFamily::Invidious2];

    pub fn protocol(self) -> Protocol {
        match self {
            ApiFamily::Piped => Protocol::Piped,
            ApiFamily::Invidious | ApiFamily::Invidious2 => Protocol::Invidious,
        }
    }

    pub fn default_mirrors(self) -> Vec<String> {
        let mirrors = match self {
            ApiFamily::Piped => PIPED_MIRRORS,
            ApiFamily::Invidious => INVIDIOUS_MIRRORS,
            ApiFamily::Invidious2 => INVIDIOUS_ALT_MIRRORS,
        };
        mirrors.iter().map(|m| m.to_string()).collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApiFamily::Piped => "piped",
            ApiFamily::Invidious => "invidious",
            ApiFamily::Invidious2 => "invidious2",
        }
    }

    // Human label for the TUI selector
    pub fn label(self) -> &'static str {
        match self {
            ApiFamily::Piped => "Piped (Recommended)",
            ApiFamily::Invidious => "Invidious",
            ApiFamily::Invidious2 => "Invidious (Alt)",
        }
    }

    pub fn cycle(self) -> ApiFamily {
        match self {
            ApiFamily::Piped => ApiFamily::Invidious,
            ApiFamily::Invidious => ApiFamily::Invidious2,
            ApiFamily::Invidious2 => ApiFamily::Piped,
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApiFamily::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown API family: {}", s))
    }
}

// Result of a successful stream resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub title: String,
    pub stream_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invidious_families_share_protocol() {
        assert_eq!(ApiFamily::Piped.protocol(), Protocol::Piped);
        assert_eq!(ApiFamily::Invidious.protocol(), Protocol::Invidious);
        assert_eq!(ApiFamily::Invidious2.protocol(), Protocol::Invidious);
    }

    #[test]
    fn every_family_has_mirrors() {
        for family in ApiFamily::ALL {
            let mirrors = family.default_mirrors();
            assert!((3..=5).contains(&mirrors.len()), "{family}");
        }
        assert_eq!(ApiFamily::Piped.default_mirrors()[0], "https://pipedapi.kavin.rocks");
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Invidious2".parse::<ApiFamily>(), Ok(ApiFamily::Invidious2));
        assert_eq!(" piped ".parse::<ApiFamily>(), Ok(ApiFamily::Piped));
        assert!("yt-dlp".parse::<ApiFamily>().is_err());
    }

    #[test]
    fn cycle_visits_all_families() {
        let mut family = ApiFamily::Piped;
        for _ in 0..3 {
            family = family.cycle();
        }
        assert_eq!(family, ApiFamily::Piped);
    }
}
