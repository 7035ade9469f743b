// ==========================================
// AUDIO PLAYBACK ENGINE
// ==========================================
// This module manages playing audio using the rodio library.
// It handles:
// - Connecting to the default audio output device
// - Playing, pausing, resuming, stopping audio
// - Seeking, rewinding and fast-forwarding
// - Volume control
// - Tracking the playback position
//
// Key Concept: rodio's Sink
// - A Sink is a queue of decoded sources feeding the output device
// - It knows play/pause/stop/volume but not "where am I in the track"
// - So the position is tracked here with Instant bookkeeping
//
// The player holds the whole track in memory (Arc<[u8]>). Seeking
// re-decodes those bytes and skips ahead to the target position.

use rodio::{Decoder, OutputStream, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::PlayerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped, // Nothing loaded, or playback was stopped
    Playing, // Audio is coming out of the speakers
    Paused,  // Audio is loaded but held
}

// ==========================================
// AUDIO PLAYER STRUCT
// ==========================================
// sink: Option<Sink>
//   - None when no output device exists (headless machine, CI)
//   - The player still tracks state so the UI behaves the same
//
// track: Option<Arc<[u8]>>
//   - Encoded bytes of the loaded track, kept for seeking
//
// position_base / resumed_at:
//   - position = position_base + time since resumed_at (while playing)
//   - pause folds the running time into position_base
pub struct AudioPlayer {
    sink: Option<Sink>,
    state: PlayerState,
    volume: u32,
    duration: Option<Duration>,
    current_title: String,
    track: Option<Arc<[u8]>>,
    position_base: Duration,
    resumed_at: Option<Instant>,
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.stop();
        }
    }
}

impl AudioPlayer {
    // ==========================================
    // CONSTRUCTOR: new()
    // ==========================================
    // Opens the default output device. Without one the player keeps
    // working as a state machine so the rest of the app is unaffected.
    pub fn new(volume: u32) -> Self {
        let (stream, handle) = match OutputStream::try_default() {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "no audio output device, playback is silent");
                return Self::detached(volume);
            }
        };
        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::warn!(error = %e, "could not create audio sink");
                return Self::detached(volume);
            }
        };

        // The stream must outlive the sink for the whole program;
        // it is not Send, so it cannot ride along in async state
        std::mem::forget(stream);

        let mut player = Self::with_sink(Some(sink), volume);
        player.set_volume(volume);
        player
    }

    // Player without an output device
    pub fn detached(volume: u32) -> Self {
        Self::with_sink(None, volume)
    }

    fn with_sink(sink: Option<Sink>, volume: u32) -> Self {
        AudioPlayer {
            sink,
            state: PlayerState::Stopped,
            volume: volume.min(100),
            duration: None,
            current_title: String::new(),
            track: None,
            position_base: Duration::ZERO,
            resumed_at: None,
        }
    }

    // ==========================================
    // PLAYBACK CONTROL: play()
    // ==========================================
    // Loads encoded audio bytes and starts from the beginning.
    // On a decode error the player ends up Stopped with nothing loaded.
    pub fn play(&mut self, data: Arc<[u8]>, title: &str) -> Result<(), PlayerError> {
        self.stop();
        self.track = None;
        self.current_title.clear();

        let decoder = Decoder::new(Cursor::new(data.clone()))?;
        self.duration = decoder.total_duration();

        self.start_source(decoder, Duration::ZERO, false)?;

        self.track = Some(data);
        self.current_title = title.to_string();
        tracing::debug!(%title, duration = ?self.duration, "playback started");
        Ok(())
    }

    fn start_source<S>(
        &mut self,
        source: S,
        offset: Duration,
        paused: bool,
    ) -> Result<(), PlayerError>
    where
        S: Source<Item = i16> + Send + 'static,
    {
        if let Some(sink) = &self.sink {
            sink.stop();
            // Some decoders panic on malformed frames mid-append
            let appended = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                if paused {
                    sink.pause();
                }
                sink.append(source.skip_duration(offset));
                if !paused {
                    sink.play();
                }
            }));
            if appended.is_err() {
                self.state = PlayerState::Stopped;
                self.resumed_at = None;
                return Err(PlayerError::Output);
            }
        }

        self.position_base = offset;
        if paused {
            self.state = PlayerState::Paused;
            self.resumed_at = None;
        } else {
            self.state = PlayerState::Playing;
            self.resumed_at = Some(Instant::now());
        }
        Ok(())
    }

    // ==========================================
    // PLAYBACK CONTROL: pause() / resume() / toggle_pause()
    // ==========================================
    pub fn pause(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if let Some(resumed_at) = self.resumed_at.take() {
            self.position_base += resumed_at.elapsed();
        }
        self.state = PlayerState::Paused;
    }

    pub fn resume(&mut self) {
        if self.state != PlayerState::Paused {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.resumed_at = Some(Instant::now());
        self.state = PlayerState::Playing;
    }

    // Stopped players stay stopped: there is nothing to resume
    pub fn toggle_pause(&mut self) {
        match self.state {
            PlayerState::Playing => self.pause(),
            PlayerState::Paused => self.resume(),
            PlayerState::Stopped => {}
        }
    }

    // ==========================================
    // PLAYBACK CONTROL: stop()
    // ==========================================
    // Clears the sink and resets the position. The loaded bytes are kept
    // until the next play() so a stopped track can still be seeked into.
    pub fn stop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.stop();
        }
        self.position_base = Duration::ZERO;
        self.resumed_at = None;
        self.state = PlayerState::Stopped;
    }

    // Drops everything loaded; used when the playlist loses the track
    pub fn unload(&mut self) {
        self.stop();
        self.track = None;
        self.duration = None;
        self.current_title.clear();
    }

    // ==========================================
    // SEEKING: seek()
    // ==========================================
    // Jumps to `seconds`, clamped to [0, duration] when the duration is
    // known. Paused playback stays paused at the new position.
    pub fn seek(&mut self, seconds: f64) -> Result<(), PlayerError> {
        let Some(data) = self.track.clone() else {
            return Ok(());
        };

        if seconds.is_nan() {
            return Ok(());
        }
        let requested = Duration::try_from_secs_f64(seconds.max(0.0)).ok();
        let target = match (requested, self.duration) {
            (Some(target), Some(duration)) => target.min(duration),
            (Some(target), None) => target,
            // Out of range (e.g. +inf) lands at the end when the end is known
            (None, Some(duration)) => duration,
            (None, None) => return Ok(()),
        };

        let paused = self.state == PlayerState::Paused;
        let decoder = Decoder::new(Cursor::new(data))?;
        self.start_source(decoder, target, paused)?;
        tracing::debug!(position = ?target, "seeked");
        Ok(())
    }

    pub fn rewind(&mut self, step: Duration) -> Result<(), PlayerError> {
        let target = self.elapsed().saturating_sub(step);
        self.seek(target.as_secs_f64())
    }

    pub fn fast_forward(&mut self, step: Duration) -> Result<(), PlayerError> {
        let target = self.elapsed() + step;
        self.seek(target.as_secs_f64())
    }

    // ==========================================
    // VOLUME
    // ==========================================
    // 0 (mute) to 100 (full); rodio wants 0.0-1.0
    pub fn set_volume(&mut self, volume: u32) {
        self.volume = volume.min(100);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume as f32 / 100.0);
        }
    }

    pub fn get_volume(&self) -> u32 {
        self.volume
    }

    // ==========================================
    // STATUS
    // ==========================================
    pub fn get_state(&self) -> PlayerState {
        self.state
    }

    pub fn current_title(&self) -> &str {
        &self.current_title
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        let running = self
            .resumed_at
            .map(|resumed_at| resumed_at.elapsed())
            .unwrap_or_default();
        let position = self.position_base + running;
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    pub fn has_output(&self) -> bool {
        self.sink.is_some()
    }

    // True once a playing track has run out of audio
    pub fn is_finished(&self) -> bool {
        if self.state != PlayerState::Playing {
            return false;
        }
        match &self.sink {
            Some(sink) => sink.empty(),
            None => self.duration.is_some_and(|d| self.elapsed() >= d),
        }
    }
}
