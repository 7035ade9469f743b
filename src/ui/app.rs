// Main TUI application using ratatui
// Handles the terminal interface, user input, background work and display

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::state::{AppState, InputMode, NotificationKind};
use super::theme::{load_theme, Palette, PreferenceStore, THEME_KEY};
use crate::config::Config;
use crate::error::{DownloadError, ResolveError};
use crate::player::audio::{AudioPlayer, PlayerState};
use crate::player::blob::BlobStore;
use crate::player::ingest::ingest_paths;
use crate::player::playlist::{PlaybackState, Track, TrackKind};
use crate::youtube::api::{ApiFamily, StreamInfo};
use crate::youtube::download::Downloader;
use crate::youtube::extractor::extract_video_id;
use crate::youtube::resolver::{HttpMirrorClient, StreamResolver};

const REEL_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
const VOLUME_STEP: u32 = 5;

// Results coming back from spawned tasks
enum AppEvent {
    Resolved(Result<StreamInfo, ResolveError>),
    StreamLoaded {
        generation: u64,
        title: String,
        result: Result<Vec<u8>, DownloadError>,
    },
    Downloaded {
        name: String,
        result: Result<PathBuf, DownloadError>,
    },
}

pub struct MusicPlayerApp {
    state: AppState,
    player: AudioPlayer,
    blobs: BlobStore,
    preferences: Box<dyn PreferenceStore>,
    resolver: Arc<StreamResolver<HttpMirrorClient>>,
    downloader: Arc<Downloader>,
    seek_step: Duration,
    // Url of the track handed to the player (or being fetched for it)
    loaded_url: Option<String>,
    // Bumped on every load so late stream fetches can be told apart
    load_generation: u64,
    loading: bool,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    tick: usize,
    vu_levels: (u16, u16),
}

impl MusicPlayerApp {
    pub fn new(
        config: &Config,
        api_family: ApiFamily,
        preferences: Box<dyn PreferenceStore>,
    ) -> anyhow::Result<Self> {
        let player = AudioPlayer::new(config.initial_volume);
        Self::with_player(config, api_family, preferences, player)
    }

    fn with_player(
        config: &Config,
        api_family: ApiFamily,
        preferences: Box<dyn PreferenceStore>,
        player: AudioPlayer,
    ) -> anyhow::Result<Self> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let client = HttpMirrorClient::new(config.request_timeout())?;
        let resolver = StreamResolver::new(client, config.mirrors());
        let downloader = Downloader::new(config.download_dir(), config.request_timeout())?;

        let theme = load_theme(preferences.as_ref());
        tracing::info!(%theme, %api_family, "starting player");

        Ok(MusicPlayerApp {
            state: AppState::new(theme, api_family, config.notification_secs),
            player,
            blobs: BlobStore::new(),
            preferences,
            resolver: Arc::new(resolver),
            downloader: Arc::new(downloader),
            seek_step: config.seek_step(),
            loaded_url: None,
            load_generation: 0,
            loading: false,
            events_tx,
            events_rx,
            tick: 0,
            vu_levels: (0, 0),
        })
    }

    // Files and directories given on the command line
    pub fn preload(&mut self, paths: &[PathBuf]) {
        if !paths.is_empty() {
            self.add_local_paths(paths);
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore the terminal even when the loop failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.draw_ui(f))?;

            // Results from background tasks
            while let Ok(app_event) = self.events_rx.try_recv() {
                self.handle_event(app_event);
            }

            self.advance_if_finished();

            self.state.prune_notifications(Utc::now());
            self.animate();

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_input(key.code);
                    }
                }
            }

            if self.state.should_quit {
                break;
            }
        }
        Ok(())
    }

    // ==========================================
    // BACKGROUND RESULTS
    // ==========================================
    fn handle_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Resolved(result) => {
                self.state.resolving = false;
                match result {
                    Ok(info) => {
                        self.state
                            .playlist
                            .add_track(Track::youtube(info.title, info.stream_url));
                        self.state.notify(
                            NotificationKind::Success,
                            "Success!",
                            "Track added to playlist",
                        );
                        self.sync_playback(false);
                    }
                    Err(ResolveError::NoStreamAvailable { family, attempts }) => {
                        tracing::warn!(%family, attempts, "resolution failed on every mirror");
                        self.state.notify(
                            NotificationKind::Error,
                            "Failed to fetch audio",
                            "Try a different API (a) or video",
                        );
                    }
                    Err(e) => {
                        self.state
                            .notify(NotificationKind::Error, "Failed to fetch audio", e.to_string());
                    }
                }
            }
            AppEvent::StreamLoaded {
                generation,
                title,
                result,
            } => {
                if generation != self.load_generation {
                    tracing::debug!(%title, "dropping stale stream");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(bytes) => {
                        let play = self.state.playlist.is_playing();
                        self.start_playback(Arc::from(bytes), &title, play);
                    }
                    Err(e) => {
                        tracing::warn!(%title, error = %e, "stream fetch failed");
                        self.state.playlist.set_playing(false);
                        self.state
                            .notify(NotificationKind::Error, "Could not load stream", e.to_string());
                    }
                }
            }
            AppEvent::Downloaded { name, result } => {
                self.state.downloading = self.state.downloading.saturating_sub(1);
                match result {
                    Ok(path) => self.state.notify(
                        NotificationKind::Success,
                        "Download complete",
                        format!("{} saved to {}", name, path.display()),
                    ),
                    Err(e) => {
                        tracing::warn!(%name, error = %e, "download failed");
                        self.state.notify(
                            NotificationKind::Error,
                            "Download failed",
                            format!("{}: {}", name, e),
                        );
                    }
                }
            }
        }
    }

    // Auto-advance to next track when current finishes
    fn advance_if_finished(&mut self) {
        if self.player.is_finished() {
            tracing::debug!("track finished, advancing");
            if self.state.playlist.next().is_some() {
                self.sync_playback(true);
            }
        }
    }

    // ==========================================
    // PLAYBACK SYNC
    // ==========================================
    // Brings the audio engine in line with the playlist's playback state.
    // `restart` reloads the current track even if it is already loaded.
    fn sync_playback(&mut self, restart: bool) {
        let Some(track) = self.state.playlist.current().cloned() else {
            if self.loaded_url.take().is_some() || self.loading {
                self.load_generation += 1;
                self.loading = false;
                self.player.unload();
            }
            return;
        };

        let playing = self.state.playlist.is_playing();
        if restart || self.loaded_url.as_deref() != Some(track.url.as_str()) {
            self.load_track(track, playing);
            return;
        }

        // The pending load applies the latest play/pause state when it lands
        if self.loading {
            return;
        }

        match self.player.get_state() {
            PlayerState::Stopped if playing => self.load_track(track, true),
            PlayerState::Stopped => {}
            state => {
                if playing != (state == PlayerState::Playing) {
                    self.player.toggle_pause();
                }
            }
        }
    }

    fn load_track(&mut self, track: Track, play: bool) {
        self.load_generation += 1;
        self.player.unload();
        self.loaded_url = Some(track.url.clone());

        match track.kind {
            TrackKind::Local => {
                self.loading = false;
                match self.blobs.get(&track.url) {
                    Some(blob) => self.start_playback(blob.data, &track.name, play),
                    None => {
                        self.state.playlist.set_playing(false);
                        self.state.notify(
                            NotificationKind::Error,
                            "Playback failed",
                            format!("{} is no longer loaded", track.name),
                        );
                    }
                }
            }
            TrackKind::Youtube => {
                self.loading = true;
                let generation = self.load_generation;
                let downloader = Arc::clone(&self.downloader);
                let tx = self.events_tx.clone();

                tokio::spawn(async move {
                    let result = downloader.fetch_bytes(&track.url).await;
                    let _ = tx.send(AppEvent::StreamLoaded {
                        generation,
                        title: track.name,
                        result,
                    });
                });
            }
        }
    }

    fn start_playback(&mut self, data: Arc<[u8]>, title: &str, play: bool) {
        match self.player.play(data, title) {
            Ok(()) => {
                if !play {
                    self.player.pause();
                }
            }
            Err(e) => {
                tracing::warn!(%title, error = %e, "playback failed");
                self.state.playlist.set_playing(false);
                self.state
                    .notify(NotificationKind::Error, "Playback failed", e.to_string());
            }
        }
    }

    // ==========================================
    // INPUT
    // ==========================================
    fn handle_input(&mut self, key: KeyCode) {
        match self.state.mode {
            InputMode::About => {
                if matches!(
                    key,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')
                ) {
                    self.state.mode = InputMode::Normal;
                }
            }
            InputMode::YoutubeUrl | InputMode::FilePath => match key {
                KeyCode::Char(c) => self.state.input.push(c),
                KeyCode::Backspace => {
                    self.state.input.pop();
                }
                KeyCode::Esc => {
                    self.state.finish_input();
                }
                KeyCode::Enter => {
                    let mode = self.state.mode;
                    let input = self.state.finish_input();
                    if mode == InputMode::YoutubeUrl {
                        self.submit_youtube(input.trim());
                    } else {
                        self.submit_path(input.trim());
                    }
                }
                _ => {}
            },
            InputMode::Normal => match key {
                KeyCode::Char('q') => self.state.should_quit = true,
                KeyCode::Char(' ') => {
                    self.state.playlist.toggle_play_pause();
                    self.sync_playback(false);
                }
                KeyCode::Char('n') => {
                    if self.state.playlist.next().is_some() {
                        self.sync_playback(true);
                    }
                }
                KeyCode::Char('p') => {
                    if self.state.playlist.previous().is_some() {
                        self.sync_playback(true);
                    }
                }
                KeyCode::Left => self.seek_by(false),
                KeyCode::Right => self.seek_by(true),
                KeyCode::Up => self.change_volume(true),
                KeyCode::Down => self.change_volume(false),
                KeyCode::Char('j') => self.state.select_next(),
                KeyCode::Char('k') => self.state.select_previous(),
                KeyCode::Enter => {
                    if self.state.playlist.select_track(self.state.selected).is_some() {
                        self.sync_playback(true);
                    }
                }
                KeyCode::Char('x') | KeyCode::Delete => self.remove_selected(),
                KeyCode::Char('c') => self.clear_all(),
                KeyCode::Char('y') | KeyCode::Char('/') => {
                    if self.state.resolving {
                        self.notify_busy();
                    } else {
                        self.state.start_input(InputMode::YoutubeUrl);
                    }
                }
                KeyCode::Char('o') => self.state.start_input(InputMode::FilePath),
                KeyCode::Char('a') => {
                    self.state.api_family = self.state.api_family.cycle();
                    let label = self.state.api_family.label();
                    self.state
                        .notify(NotificationKind::Info, "API switched", label.to_string());
                }
                KeyCode::Char('t') => self.switch_theme(),
                KeyCode::Char('d') => self.download_selected(),
                KeyCode::Char('?') => self.state.mode = InputMode::About,
                _ => {}
            },
        }
    }

    fn submit_youtube(&mut self, input: &str) {
        if input.is_empty() {
            return;
        }
        // One resolution at a time
        if self.state.resolving {
            self.notify_busy();
            return;
        }
        if extract_video_id(input).is_none() {
            self.state.notify(
                NotificationKind::Error,
                "Invalid URL",
                "Please enter a valid YouTube URL",
            );
            return;
        }

        let family = self.state.api_family;
        self.state.resolving = true;
        self.state.notify(
            NotificationKind::Info,
            "Fetching audio...",
            format!("Trying {} API", family),
        );

        let resolver = Arc::clone(&self.resolver);
        let tx = self.events_tx.clone();
        let input = input.to_string();
        tokio::spawn(async move {
            let result = resolver.resolve(&input, family).await;
            let _ = tx.send(AppEvent::Resolved(result));
        });
    }

    fn notify_busy(&mut self) {
        self.state.notify(
            NotificationKind::Info,
            "Still fetching",
            "Wait for the current request to finish",
        );
    }

    fn submit_path(&mut self, input: &str) {
        if input.is_empty() {
            return;
        }
        let path = match input.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(input)),
            None => PathBuf::from(input),
        };
        self.add_local_paths(&[path]);
    }

    fn add_local_paths(&mut self, paths: &[PathBuf]) {
        let (tracks, errors) = ingest_paths(paths, &mut self.blobs);

        for e in &errors {
            tracing::warn!(error = %e, "skipping file");
        }
        if let Some(e) = errors.first() {
            self.state
                .notify(NotificationKind::Error, "Could not add file", e.to_string());
        }

        if !tracks.is_empty() {
            let count = tracks.len();
            for track in tracks {
                self.state.playlist.add_track(track);
            }
            self.state.notify(
                NotificationKind::Success,
                "Files added",
                format!("{} track(s) added to playlist", count),
            );
            self.sync_playback(false);
        }
    }

    fn remove_selected(&mut self) {
        if let Some(track) = self.state.playlist.remove_track(self.state.selected) {
            self.release(&track);
            self.state.clamp_selection();
            self.sync_playback(false);
        }
    }

    fn clear_all(&mut self) {
        for track in self.state.playlist.clear_all() {
            self.release(&track);
        }
        self.state.clamp_selection();
        self.sync_playback(false);
    }

    // Local audio bytes leave memory with their track
    fn release(&mut self, track: &Track) {
        if BlobStore::is_blob_url(&track.url) && self.blobs.revoke(&track.url) {
            tracing::debug!(track = %track.name, remaining = self.blobs.len(), "released local audio");
        }
    }

    fn seek_by(&mut self, forward: bool) {
        let result = if forward {
            self.player.fast_forward(self.seek_step)
        } else {
            self.player.rewind(self.seek_step)
        };
        if let Err(e) = result {
            self.state
                .notify(NotificationKind::Error, "Seek failed", e.to_string());
        }
    }

    fn change_volume(&mut self, up: bool) {
        let current = self.player.get_volume();
        let volume = if up {
            (current + VOLUME_STEP).min(100)
        } else {
            current.saturating_sub(VOLUME_STEP)
        };
        self.player.set_volume(volume);
    }

    fn switch_theme(&mut self) {
        self.state.theme = self.state.theme.cycle();
        if let Err(e) = self.preferences.set(THEME_KEY, self.state.theme.name()) {
            tracing::warn!(error = %e, "could not save theme");
            self.state
                .notify(NotificationKind::Error, "Theme not saved", e.to_string());
        }
    }

    fn download_selected(&mut self) {
        let Some(track) = self.state.playlist.get(self.state.selected).cloned() else {
            return;
        };
        let local = match track.kind {
            TrackKind::Local => self.blobs.get(&track.url),
            TrackKind::Youtube => None,
        };

        self.state.downloading += 1;
        self.state.notify(
            NotificationKind::Info,
            "Downloading...",
            format!("{} -> {}", track.name, self.downloader.dest_dir().display()),
        );

        let downloader = Arc::clone(&self.downloader);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = downloader.download(&track, local).await;
            let _ = tx.send(AppEvent::Downloaded {
                name: track.name,
                result,
            });
        });
    }

    fn animate(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.vu_levels = if self.player.get_state() == PlayerState::Playing {
            let mut rng = rand::rng();
            (rng.random_range(20..80), rng.random_range(20..80))
        } else {
            (0, 0)
        };
    }

    // ==========================================
    // DRAWING
    // ==========================================
    fn draw_ui(&self, frame: &mut Frame) {
        let palette = self.state.theme.palette();
        let base = Style::default().fg(palette.foreground).bg(palette.background);
        frame.render_widget(Block::default().style(base), frame.size());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(9),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.size());

        self.draw_header(frame, chunks[0], &palette);
        self.draw_deck(frame, chunks[1], &palette);
        self.draw_playlist(frame, chunks[2], &palette);

        let hints = "Space play/pause · n/p next/prev · ←/→ seek · ↑/↓ volume · y YouTube · o file · d download · x remove · c clear · a API · t theme · ? about · q quit";
        frame.render_widget(
            Paragraph::new(hints).style(Style::default().fg(palette.muted)),
            chunks[3],
        );

        match self.state.mode {
            InputMode::YoutubeUrl => {
                self.draw_prompt(frame, "Paste YouTube URL here...", &palette)
            }
            InputMode::FilePath => self.draw_prompt(frame, "Audio file or folder path", &palette),
            InputMode::About => self.draw_about(frame, &palette),
            InputMode::Normal => {}
        }
    }

    fn block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(Span::styled(
                title,
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ))
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let line = if self.state.resolving {
            let spinner = SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()];
            Line::from(vec![
                Span::styled(spinner, Style::default().fg(palette.accent)),
                Span::raw(format!(" Fetching audio via {}...", self.state.api_family)),
            ])
        } else if let Some(note) = self.state.latest_notification() {
            let color = match note.kind {
                NotificationKind::Info => palette.foreground,
                NotificationKind::Success => palette.accent,
                NotificationKind::Error => palette.danger,
            };
            Line::from(vec![
                Span::styled(
                    note.title.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(note.description.clone(), Style::default().fg(palette.muted)),
            ])
        } else {
            Line::from(Span::styled(
                "Stream YouTube audio or play local files",
                Style::default().fg(palette.muted),
            ))
        };

        let header = Paragraph::new(line).block(Self::block(" TapeFlow · YouTube Audio Player ", palette));
        frame.render_widget(header, area);
    }

    fn draw_deck(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Self::block(" Deck ", palette);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1); 7])
            .split(inner);

        let playing = self.player.get_state() == PlayerState::Playing;
        let reel = if playing {
            REEL_FRAMES[self.tick % REEL_FRAMES.len()]
        } else {
            REEL_FRAMES[0]
        };
        let title = match self.state.playlist.current() {
            Some(track) if self.loading => format!("Loading {}...", track.name),
            Some(_) if !self.player.current_title().is_empty() => {
                self.player.current_title().to_string()
            }
            Some(track) => track.name.clone(),
            None => "No track loaded".to_string(),
        };
        let reels = Line::from(vec![
            Span::styled(format!("( {} )", reel), Style::default().fg(palette.accent)),
            Span::raw("  "),
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(format!("( {} )", reel), Style::default().fg(palette.accent)),
        ]);
        frame.render_widget(Paragraph::new(reels).alignment(Alignment::Center), rows[0]);

        let elapsed = self.player.elapsed();
        let duration = self.player.duration();
        let time = format!(
            "{} / {}",
            format_time(elapsed),
            duration.map(format_time).unwrap_or_else(|| "0:00".to_string())
        );
        frame.render_widget(
            Paragraph::new(time)
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.muted)),
            rows[1],
        );

        let progress = match duration {
            Some(d) if !d.is_zero() => (elapsed.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0),
            _ => 0.0,
        };
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(palette.accent).bg(palette.border))
                .ratio(progress)
                .label(""),
            rows[2],
        );

        self.draw_meter(frame, rows[3], "L", self.vu_levels.0, palette);
        self.draw_meter(frame, rows[4], "R", self.vu_levels.1, palette);

        let volume = self.player.get_volume();
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(palette.muted).bg(palette.border))
                .ratio(f64::from(volume) / 100.0)
                .label(format!("Volume {}%", volume)),
            rows[5],
        );

        let state = match self.player.get_state() {
            PlayerState::Playing => "▶ Playing",
            PlayerState::Paused => "⏸ Paused",
            PlayerState::Stopped => "⏹ Stopped",
        };
        let output = if self.player.has_output() { "" } else { " · no audio device" };
        let downloads = match self.state.downloading {
            0 => String::new(),
            n => format!(" · ⇣ {} downloading", n),
        };
        let status = format!(
            "{} · API: {} · Theme: {}{}{}",
            state,
            self.state.api_family.label(),
            self.state.theme,
            downloads,
            output
        );
        frame.render_widget(
            Paragraph::new(status)
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.muted)),
            rows[6],
        );
    }

    fn draw_meter(&self, frame: &mut Frame, area: Rect, label: &str, level: u16, palette: &Palette) {
        let color = if level > 70 { palette.danger } else { palette.accent };
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(color).bg(palette.border))
                .percent(level.min(100))
                .label(label.to_string()),
            area,
        );
    }

    fn draw_playlist(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let PlaybackState {
            current_index: current,
            is_playing: playing,
        } = self.state.playlist.state();

        let items: Vec<ListItem> = self
            .state
            .playlist
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let is_current = current == Some(i);
                let marker = match (is_current, playing) {
                    (true, true) => "⏸",
                    _ => "▶",
                };
                let source = match track.kind {
                    TrackKind::Youtube => "YouTube",
                    TrackKind::Local => "Local",
                };
                let style = if is_current {
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", marker), style),
                    Span::styled(track.name.clone(), style),
                    Span::styled(format!("  [{}]", source), Style::default().fg(palette.muted)),
                ]))
            })
            .collect();

        let title = format!(" Playlist ({}) ", self.state.playlist.len());
        let list = List::new(items)
            .block(Self::block(&title, palette))
            .highlight_style(Style::default().bg(palette.border));

        let mut list_state = ListState::default();
        if !self.state.playlist.is_empty() {
            list_state.select(Some(self.state.selected));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_prompt(&self, frame: &mut Frame, title: &str, palette: &Palette) {
        let area = centered_rect(70, 3, frame.size());
        frame.render_widget(Clear, area);
        let block_title = format!(" {} ", title);
        let prompt = Paragraph::new(format!("{}_", self.state.input))
            .style(Style::default().fg(palette.foreground).bg(palette.background))
            .block(Self::block(&block_title, palette));
        frame.render_widget(prompt, area);
    }

    fn draw_about(&self, frame: &mut Frame, palette: &Palette) {
        let area = centered_rect(70, 14, frame.size());
        frame.render_widget(Clear, area);

        let text = vec![
            Line::from(Span::styled(
                "TapeFlow",
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("A retro cassette-style audio player. Stream YouTube audio or play"),
            Line::from("local files (MP3, WAV, OGG, FLAC, M4A)."),
            Line::from(""),
            Line::from("YouTube audio is resolved through free public proxies:"),
            Line::from("  Piped API     privacy-focused YouTube proxy"),
            Line::from("  Invidious API alternative YouTube frontend (several instances)"),
            Line::from("No API keys. If one API fails, switch with 'a' and retry."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to close",
                Style::default().fg(palette.muted),
            )),
        ];

        let about = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(palette.foreground).bg(palette.background))
            .block(Self::block(" About ", palette));
        frame.render_widget(about, area);
    }
}

// "m:ss", like a tape counter
fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
