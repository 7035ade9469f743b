// ==========================================
// PLAYLIST MANAGEMENT MODULE
// ==========================================
// This module manages the playlist and transport state of the player.
// It handles:
// - Adding and removing tracks
// - Selecting a track and moving between tracks (next/previous)
// - Tracking which track is current and whether it is playing
//
// Key Concept: the playlist never reorders
// - Insertion order is playback order
// - next() and previous() wrap around at either end
// - The current track is an index into the list, or None

use serde::{Deserialize, Serialize};

// ==========================================
// TRACK STRUCT
// ==========================================
// A single playable item.
//
// name: String
//   - What the UI shows ("Never Gonna Give You Up", "demo-take-3")
//
// url: String
//   - Local tracks: a blob url ("blob:tapeflow/4") into the BlobStore
//   - YouTube tracks: the resolved remote audio stream URL
//
// kind: TrackKind
//   - Where the audio came from; decides how it is loaded and downloaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub url: String,
    pub kind: TrackKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Local,
    Youtube,
}

impl Track {
    pub fn local(name: String, url: String) -> Self {
        Track {
            name,
            url,
            kind: TrackKind::Local,
        }
    }

    pub fn youtube(name: String, url: String) -> Self {
        Track {
            name,
            url,
            kind: TrackKind::Youtube,
        }
    }
}

// ==========================================
// PLAYBACK STATE
// ==========================================
// current_index: None means "nothing selected".
// Invariant: is_playing implies current_index is a valid index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: Option<usize>,
    pub is_playing: bool,
}

// ==========================================
// PLAYLIST STRUCT
// ==========================================
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    state: PlaybackState,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================
    // ADDING TRACKS: add_track()
    // ==========================================
    // Appends a track. If nothing is current (including the empty
    // playlist case) the new track becomes current and starts playing.
    //
    // Example:
    // - Playlist: [], current: None
    // - add_track(A)
    // - Playlist: [A], current: Some(0), playing
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);

        if self.state.current_index.is_none() {
            self.state.current_index = Some(self.tracks.len() - 1);
            self.state.is_playing = true;
        }
    }

    // ==========================================
    // REMOVING TRACKS: remove_track()
    // ==========================================
    // Removes the track at `index` and returns it so the caller can
    // release whatever the track held (blob urls).
    //
    // Current index bookkeeping:
    // - Removing the current track stops playback, current becomes None
    // - Removing a track before the current one shifts current down by one
    //   so it keeps pointing at the same logical track
    // - Removing a track after the current one changes nothing
    //
    // Example:
    // - Playlist: [A, B, C], current: Some(2) (C)
    // - remove_track(0)
    // - Playlist: [B, C], current: Some(1) (still C)
    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        let removed = self.tracks.remove(index);

        match self.state.current_index {
            Some(current) if current == index => {
                self.state = PlaybackState::default();
            }
            Some(current) if index < current => {
                self.state.current_index = Some(current - 1);
            }
            _ => {}
        }

        Some(removed)
    }

    // Empties the playlist and resets playback; returns everything removed
    pub fn clear_all(&mut self) -> Vec<Track> {
        self.state = PlaybackState::default();
        std::mem::take(&mut self.tracks)
    }

    // ==========================================
    // NAVIGATION
    // ==========================================
    // select_track(): jump to a track and play it. Invalid index: no-op.
    pub fn select_track(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.state.current_index = Some(index);
        self.state.is_playing = true;
        self.tracks.get(index)
    }

    // next(): one forward, last wraps to 0. With nothing current, starts at 0.
    pub fn next(&mut self) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let next = match self.state.current_index {
            Some(current) if current + 1 < len => current + 1,
            Some(_) => 0,
            None => 0,
        };
        self.select_track(next)
    }

    // previous(): one back, 0 wraps to last. With nothing current, starts at last.
    pub fn previous(&mut self) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let previous = match self.state.current_index {
            Some(current) if current > 0 => current - 1,
            _ => len - 1,
        };
        self.select_track(previous)
    }

    // ==========================================
    // PLAYBACK CONTROL: toggle_play_pause()
    // ==========================================
    // - Nothing current, tracks available: start the first track
    // - Something current: flip playing/paused
    // - Empty playlist: stays stopped
    pub fn toggle_play_pause(&mut self) -> bool {
        match self.state.current_index {
            None if !self.tracks.is_empty() => {
                self.state.current_index = Some(0);
                self.state.is_playing = true;
            }
            None => {}
            Some(_) => self.state.is_playing = !self.state.is_playing,
        }
        self.state.is_playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.state.is_playing = playing && self.state.current_index.is_some();
    }

    // ==========================================
    // ACCESSORS
    // ==========================================
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current(&self) -> Option<&Track> {
        self.state.current_index.and_then(|i| self.tracks.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str) -> Track {
        Track::youtube(name.to_string(), format!("https://cdn/{}", name))
    }

    fn playlist_of(names: &[&str]) -> Playlist {
        let mut playlist = Playlist::new();
        for name in names {
            playlist.add_track(track(name));
        }
        playlist
    }

    fn assert_invariant(playlist: &Playlist) {
        if playlist.is_playing() {
            let index = playlist.current_index().expect("playing without a current track");
            assert!(index < playlist.len());
        }
    }

    #[test]
    fn first_added_track_autoplays() {
        let mut playlist = Playlist::new();
        playlist.add_track(track("a"));

        assert_eq!(playlist.current_index(), Some(0));
        assert!(playlist.is_playing());

        playlist.add_track(track("b"));
        assert_eq!(playlist.current_index(), Some(0));
    }

    #[test]
    fn adding_with_nothing_current_selects_new_track() {
        let mut playlist = playlist_of(&["a", "b"]);
        playlist.remove_track(0);
        assert_eq!(playlist.current_index(), None);

        playlist.add_track(track("c"));
        assert_eq!(playlist.current().map(|t| t.name.as_str()), Some("c"));
        assert!(playlist.is_playing());
    }

    #[test]
    fn next_wraps_to_start() {
        let mut playlist = playlist_of(&["a", "b", "c"]);
        playlist.select_track(2);

        assert_eq!(playlist.next().map(|t| t.name.clone()), Some("a".to_string()));
        assert_eq!(playlist.current_index(), Some(0));
        assert!(playlist.is_playing());
    }

    #[test]
    fn previous_wraps_to_end() {
        let mut playlist = playlist_of(&["a", "b", "c"]);
        playlist.select_track(0);

        playlist.previous();
        assert_eq!(playlist.current_index(), Some(2));
    }

    #[test]
    fn navigation_without_current_track() {
        let mut playlist = playlist_of(&["a", "b", "c"]);
        playlist.remove_track(0);
        assert_eq!(playlist.current_index(), None);

        playlist.next();
        assert_eq!(playlist.current_index(), Some(0));

        playlist.remove_track(0);
        playlist.previous();
        assert_eq!(playlist.current_index(), Some(0));
        assert_eq!(playlist.current().map(|t| t.name.as_str()), Some("c"));
    }

    #[test]
    fn navigation_on_empty_playlist_is_noop() {
        let mut playlist = Playlist::new();
        assert!(playlist.next().is_none());
        assert!(playlist.previous().is_none());
        assert!(!playlist.toggle_play_pause());
        assert_eq!(playlist.state(), PlaybackState::default());
    }

    #[test]
    fn removing_current_track_stops_playback() {
        let mut playlist = playlist_of(&["a", "b", "c"]);
        playlist.select_track(1);

        let removed = playlist.remove_track(1).unwrap();

        assert_eq!(removed.name, "b");
        assert_eq!(playlist.current_index(), None);
        assert!(!playlist.is_playing());
        assert_invariant(&playlist);
    }

    #[test]
    fn removing_last_remaining_track_stops() {
        let mut playlist = playlist_of(&["only"]);
        playlist.remove_track(0);

        assert!(playlist.is_empty());
        assert_eq!(playlist.state(), PlaybackState::default());
    }

    #[test]
    fn removing_earlier_track_keeps_current_track() {
        let mut playlist = playlist_of(&["a", "b", "c"]);
        playlist.select_track(2);

        playlist.remove_track(0);

        assert_eq!(playlist.current_index(), Some(1));
        assert_eq!(playlist.current().map(|t| t.name.as_str()), Some("c"));
        assert!(playlist.is_playing());
    }

    #[test]
    fn removing_later_track_or_bad_index() {
        let mut playlist = playlist_of(&["a", "b", "c"]);

        playlist.remove_track(2);
        assert_eq!(playlist.current_index(), Some(0));
        assert!(playlist.remove_track(7).is_none());
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn toggle_flips_current_track() {
        let mut playlist = playlist_of(&["a"]);
        assert!(playlist.is_playing());

        assert!(!playlist.toggle_play_pause());
        assert_eq!(playlist.current_index(), Some(0));
        assert!(playlist.toggle_play_pause());
    }

    #[test]
    fn toggle_with_nothing_current_starts_at_zero() {
        let mut playlist = playlist_of(&["a", "b"]);
        playlist.remove_track(0);
        assert_eq!(playlist.current_index(), None);

        assert!(playlist.toggle_play_pause());
        assert_eq!(playlist.current_index(), Some(0));
    }

    #[test]
    fn clear_all_returns_tracks_and_resets() {
        let mut playlist = playlist_of(&["a", "b"]);

        let removed = playlist.clear_all();

        assert_eq!(removed.len(), 2);
        assert!(playlist.is_empty());
        assert_eq!(playlist.state(), PlaybackState::default());
    }

    #[test]
    fn select_invalid_index_is_noop() {
        let mut playlist = playlist_of(&["a"]);
        playlist.toggle_play_pause();

        assert!(playlist.select_track(3).is_none());
        assert_eq!(playlist.current_index(), Some(0));
        assert!(!playlist.is_playing());
    }

    #[test]
    fn set_playing_respects_invariant() {
        let mut playlist = Playlist::new();
        playlist.set_playing(true);
        assert!(!playlist.is_playing());
        assert_invariant(&playlist);
    }
}
