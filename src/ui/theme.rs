// Visual themes and the preference store that remembers the chosen one

use ratatui::style::Color;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{config_dir, APP_DIR};
use crate::error::PreferenceError;

pub const THEME_KEY: &str = "tapeflow-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Sunset,
    Ocean,
    Forest,
}

// Colors a theme contributes to the TUI
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub danger: Color,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Dark,
        Theme::Light,
        Theme::Sunset,
        Theme::Ocean,
        Theme::Forest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Sunset => "sunset",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
        }
    }

    // Unknown values fall back to dark
    pub fn from_name(name: &str) -> Theme {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name() == name.trim())
            .unwrap_or_default()
    }

    pub fn cycle(self) -> Theme {
        let index = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(index + 1) % Theme::ALL.len()]
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Rgb(0x18, 0x18, 0x1b),
                foreground: Color::Rgb(0xfa, 0xfa, 0xfa),
                muted: Color::Rgb(0xa1, 0xa1, 0xaa),
                accent: Color::Rgb(0xf5, 0x9e, 0x0b),
                border: Color::Rgb(0x3f, 0x3f, 0x46),
                danger: Color::Rgb(0xef, 0x44, 0x44),
            },
            Theme::Light => Palette {
                background: Color::Rgb(0xfa, 0xfa, 0xfa),
                foreground: Color::Rgb(0x18, 0x18, 0x1b),
                muted: Color::Rgb(0x71, 0x71, 0x7a),
                accent: Color::Rgb(0xd9, 0x77, 0x06),
                border: Color::Rgb(0xe4, 0xe4, 0xe7),
                danger: Color::Rgb(0xdc, 0x26, 0x26),
            },
            Theme::Sunset => Palette {
                background: Color::Rgb(0x1c, 0x10, 0x0b),
                foreground: Color::Rgb(0xff, 0xed, 0xd5),
                muted: Color::Rgb(0xfd, 0xba, 0x74),
                accent: Color::Rgb(0xf9, 0x73, 0x16),
                border: Color::Rgb(0xea, 0x58, 0x0c),
                danger: Color::Rgb(0xef, 0x44, 0x44),
            },
            Theme::Ocean => Palette {
                background: Color::Rgb(0x08, 0x2f, 0x49),
                foreground: Color::Rgb(0xe0, 0xf2, 0xfe),
                muted: Color::Rgb(0x7d, 0xd3, 0xfc),
                accent: Color::Rgb(0x06, 0xb6, 0xd4),
                border: Color::Rgb(0x02, 0x84, 0xc7),
                danger: Color::Rgb(0xf8, 0x71, 0x71),
            },
            Theme::Forest => Palette {
                background: Color::Rgb(0x05, 0x2e, 0x16),
                foreground: Color::Rgb(0xdc, 0xfc, 0xe7),
                muted: Color::Rgb(0x86, 0xef, 0xac),
                accent: Color::Rgb(0x22, 0xc5, 0x5e),
                border: Color::Rgb(0x16, 0xa3, 0x4a),
                danger: Color::Rgb(0xf8, 0x71, 0x71),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==========================================
// PREFERENCE STORE
// ==========================================
// Small string key/value persistence. The app controller calls set()
// whenever a persisted setting changes.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    store
        .get(THEME_KEY)
        .map(|name| Theme::from_name(&name))
        .unwrap_or_default()
}

// Flat JSON object on disk: { "tapeflow-theme": "ocean", ... }
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonPreferenceStore {
    pub fn default_path() -> PathBuf {
        config_dir()
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
            .join("preferences.json")
    }

    // A missing or unreadable file starts empty; the next set() rewrites it
    pub fn open(path: PathBuf) -> Self {
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring preference file");
                Map::new()
            }
        };
        JsonPreferenceStore { path, values }
    }

    fn read(path: &Path) -> Result<Map<String, Value>, PreferenceError> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key)?.as_str().map(str::to_string)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_and_unknown_falls_back() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_name(theme.name()), theme);
        }
        assert_eq!(Theme::from_name("neon"), Theme::Dark);
    }

    #[test]
    fn cycle_order() {
        assert_eq!(Theme::Dark.cycle(), Theme::Light);
        assert_eq!(Theme::Ocean.cycle(), Theme::Forest);
        assert_eq!(Theme::Forest.cycle(), Theme::Dark);
    }

    #[test]
    fn store_persists_theme_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut store = JsonPreferenceStore::open(path.clone());
        assert_eq!(load_theme(&store), Theme::Dark);
        store.set(THEME_KEY, Theme::Sunset.name()).unwrap();

        let reopened = JsonPreferenceStore::open(path.clone());
        assert_eq!(load_theme(&reopened), Theme::Sunset);

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[THEME_KEY], "sunset");
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonPreferenceStore::open(path);
        assert_eq!(store.get(THEME_KEY), None);
    }
}
