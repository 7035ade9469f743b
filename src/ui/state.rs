// Application state owned by the controller
// Everything the screen shows lives here; side effects (audio, disk,
// network) stay in the controller.

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use super::theme::Theme;
use crate::player::playlist::Playlist;
use crate::youtube::api::ApiFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    YoutubeUrl, // Typing a YouTube URL or id
    FilePath,   // Typing a local file or directory path
    About,      // About dialog open
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    pub expires_at: DateTime<Utc>,
}

pub struct AppState {
    pub playlist: Playlist,
    pub theme: Theme,
    pub api_family: ApiFamily,
    pub mode: InputMode,
    pub input: String,
    pub selected: usize,
    pub resolving: bool,
    pub downloading: usize,
    pub notifications: Vec<Notification>,
    pub notification_ttl: ChronoDuration,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(theme: Theme, api_family: ApiFamily, notification_secs: u64) -> Self {
        AppState {
            playlist: Playlist::new(),
            theme,
            api_family,
            mode: InputMode::Normal,
            input: String::new(),
            selected: 0,
            resolving: false,
            downloading: 0,
            notifications: Vec::new(),
            notification_ttl: ChronoDuration::seconds(notification_secs.max(1) as i64),
            should_quit: false,
        }
    }

    // ==========================================
    // NOTIFICATIONS
    // ==========================================
    pub fn notify(&mut self, kind: NotificationKind, title: &str, description: impl Into<String>) {
        self.notify_at(Utc::now(), kind, title, description);
    }

    fn notify_at(
        &mut self,
        now: DateTime<Utc>,
        kind: NotificationKind,
        title: &str,
        description: impl Into<String>,
    ) {
        self.notifications.push(Notification {
            title: title.to_string(),
            description: description.into(),
            kind,
            expires_at: now + self.notification_ttl,
        });
    }

    pub fn prune_notifications(&mut self, now: DateTime<Utc>) {
        self.notifications.retain(|n| n.expires_at > now);
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    // ==========================================
    // PLAYLIST SELECTION (cursor, not the playing track)
    // ==========================================
    pub fn select_next(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_previous(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
        }
    }

    // Keep the cursor on a real row after removals
    pub fn clamp_selection(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn start_input(&mut self, mode: InputMode) {
        self.mode = mode;
        self.input.clear();
    }

    pub fn finish_input(&mut self) -> String {
        self.mode = InputMode::Normal;
        std::mem::take(&mut self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::playlist::Track;

    fn state_with(count: usize) -> AppState {
        let mut state = AppState::new(Theme::Dark, ApiFamily::Piped, 4);
        for i in 0..count {
            state
                .playlist
                .add_track(Track::youtube(format!("t{}", i), format!("https://cdn/{}", i)));
        }
        state
    }

    #[test]
    fn notifications_expire() {
        let mut state = state_with(0);
        let now = Utc::now();
        state.notify_at(now, NotificationKind::Info, "Fetching audio...", "Trying piped API");
        state.notify_at(
            now + ChronoDuration::seconds(2),
            NotificationKind::Success,
            "Success!",
            "Track added to playlist",
        );

        state.prune_notifications(now + ChronoDuration::seconds(5));
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.latest_notification().map(|n| n.title.as_str()), Some("Success!"));

        state.prune_notifications(now + ChronoDuration::seconds(7));
        assert!(state.latest_notification().is_none());
    }

    #[test]
    fn selection_wraps() {
        let mut state = state_with(3);
        state.select_previous();
        assert_eq!(state.selected, 2);
        state.select_next();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn selection_clamps_after_removal() {
        let mut state = state_with(3);
        state.selected = 2;
        state.playlist.remove_track(2);
        state.clamp_selection();
        assert_eq!(state.selected, 1);

        state.playlist.clear_all();
        state.clamp_selection();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn input_buffer_is_taken_on_finish() {
        let mut state = state_with(0);
        state.start_input(InputMode::YoutubeUrl);
        state.input.push_str("dQw4w9WgXcQ");

        assert_eq!(state.finish_input(), "dQw4w9WgXcQ");
        assert_eq!(state.mode, InputMode::Normal);
        assert!(state.input.is_empty());
    }
}
