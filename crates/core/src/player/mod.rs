use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;
use crate::lifecycle::{Generation, ResourceLifecycle};
use crate::notify::NotificationScheduler;
use crate::sink::{Preload, SinkEvent, SinkFactory, SinkSettings};
use crate::volume::VolumeControl;

pub const MSG_MUSIC_MUTED: &str = "Music muted";
pub const MSG_MUSIC_PLAYING: &str = "Music playing";
pub const MSG_RETRY_PROMPT: &str = "Klik tombol musik untuk memulai";
pub const MSG_PLAYBACK_FAILED: &str = "Gagal memutar musik";
pub const MSG_LOADING: &str = "Musik sedang dimuat...";
pub const MSG_INIT_FAILED: &str = "Gagal menginisialisasi audio";

/// Snapshot the render layer consumes to drive the icon, slider, and banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub muted: bool,
    pub playing: bool,
    /// A start was requested and its outcome has not arrived yet.
    pub starting: bool,
    pub volume: f32,
    pub error_message: String,
    pub volume_surface_visible: bool,
    pub notification: Option<String>,
}

impl PlaybackState {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Why a playback start was requested, kept so the deferred outcome can be
/// reported against the interaction that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartReason {
    /// Mount-time attempt driven by the "with music" intent.
    Autoplay,
    /// The rendered mute/play control.
    Toggle,
    /// The host's one-shot `start_music` call.
    External,
}

/// The playback state machine.
///
/// All transitions run on discrete host callbacks: user input arrives through
/// the public methods, deferred sink outcomes through
/// [`handle_sink_event`](AudioPlayer::handle_sink_event), and timer expiry
/// through [`tick`](AudioPlayer::tick). Playback failures never escape as
/// errors; they degrade to state plus a transient notification.
pub struct AudioPlayer {
    config: PlayerConfig,
    lifecycle: ResourceLifecycle,
    volume: VolumeControl,
    notifications: NotificationScheduler,
    muted: bool,
    playing: bool,
    pending_start: Option<StartReason>,
    error_message: String,
}

impl AudioPlayer {
    pub fn new(config: PlayerConfig, factory: SinkFactory) -> Self {
        let volume = VolumeControl::new(config.initial_volume);
        let muted = config.without_music;
        Self {
            config,
            lifecycle: ResourceLifecycle::new(factory),
            volume,
            notifications: NotificationScheduler::new(),
            muted,
            playing: false,
            pending_start: None,
            error_message: String::new(),
        }
    }

    /// Runs the mount-time lifecycle: construct the element, apply the
    /// buffered volume, and attempt autoplay when the intent asks for music.
    /// Construction failure is surfaced as a notification, never an error.
    pub fn mount(&mut self) {
        self.muted = self.config.without_music;
        let settings = self.sink_settings();
        match self.lifecycle.acquire(&settings) {
            Ok(generation) => {
                self.volume.mark_applied();
                tracing::info!(
                    generation = generation.value(),
                    without_music = self.config.without_music,
                    "audio player mounted"
                );
                if !self.config.without_music {
                    self.request_start(StartReason::Autoplay);
                }
            }
            Err(error) => {
                tracing::warn!(%error, "audio element could not be initialised");
                self.raise_error(MSG_INIT_FAILED);
            }
        }
    }

    /// Idempotent teardown: detaches the element, cancels the dismissal
    /// timer, and forgets any start still in flight.
    pub fn unmount(&mut self) {
        self.lifecycle.release();
        self.pending_start = None;
        self.playing = false;
        self.notifications.clear();
        self.error_message.clear();
        self.volume.hide_surface();
    }

    /// Re-runs the mount lifecycle under a new intent. A no-op when the
    /// intent is unchanged and the element is still live.
    pub fn set_intent(&mut self, without_music: bool) {
        if self.config.without_music == without_music && self.lifecycle.is_acquired() {
            return;
        }
        self.unmount();
        self.config.without_music = without_music;
        self.mount();
    }

    /// The rendered control. Starts playback when the transport is stopped,
    /// otherwise flips the muted facet with a short acknowledgement.
    pub fn toggle(&mut self) {
        if !self.lifecycle.is_acquired() {
            self.raise_error(MSG_LOADING);
            return;
        }

        if self.playing {
            let muted = !self.muted;
            if let Some(sink) = self.lifecycle.sink_mut() {
                sink.set_muted(muted);
            }
            self.muted = muted;
            self.error_message.clear();
            let message = if muted { MSG_MUSIC_MUTED } else { MSG_MUSIC_PLAYING };
            self.notifications.notify(message, self.config.ack_duration());
        } else {
            self.request_start(StartReason::Toggle);
        }
    }

    /// The host's one-shot control surface: force unmute and request a
    /// start. Calling it again after a successful start is a no-op.
    pub fn start_music(&mut self) {
        if self.playing && !self.muted {
            return;
        }
        self.request_start(StartReason::External);
    }

    /// Applies a deferred sink outcome or transport event. Events tagged
    /// with a generation that is no longer live are discarded, so a
    /// resolution arriving after teardown cannot touch dead state.
    pub fn handle_sink_event(&mut self, generation: Generation, event: SinkEvent) {
        if !self.lifecycle.accepts(generation) {
            tracing::debug!(
                generation = generation.value(),
                ?event,
                "discarding event for released audio resource"
            );
            return;
        }

        match event {
            SinkEvent::PlayStarted | SinkEvent::Playing => {
                self.playing = true;
                self.pending_start = None;
                self.error_message.clear();
                self.notifications.clear();
            }
            SinkEvent::Paused | SinkEvent::Ended => {
                self.playing = false;
            }
            SinkEvent::PlayRejected => {
                self.playing = false;
                if let Some(reason) = self.pending_start.take() {
                    tracing::debug!(?reason, "playback start rejected by autoplay policy");
                    self.raise_error(MSG_RETRY_PROMPT);
                }
            }
            SinkEvent::PlayFailed => {
                self.playing = false;
                if let Some(reason) = self.pending_start.take() {
                    tracing::warn!(?reason, "playback start failed");
                    self.raise_error(MSG_PLAYBACK_FAILED);
                }
            }
        }
    }

    /// Timer callback from the host's event loop. Clears the transient
    /// error text together with the notification that carried it.
    pub fn tick(&mut self, now: Instant) {
        if self.notifications.tick(now) {
            self.error_message.clear();
        }
    }

    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level, self.lifecycle.sink_mut());
    }

    /// Hover intent over the control cluster reveals the slider surface,
    /// but only once the element exists.
    pub fn pointer_enter(&mut self) {
        if self.lifecycle.is_acquired() {
            self.volume.show_surface();
        }
    }

    pub fn pointer_leave(&mut self) {
        self.volume.hide_surface();
    }

    /// Generation the host should tag incoming sink events with.
    pub fn generation(&self) -> Generation {
        self.lifecycle.generation()
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            muted: self.muted,
            playing: self.playing,
            starting: self.pending_start.is_some(),
            volume: self.volume.level(),
            error_message: self.error_message.clone(),
            volume_surface_visible: self.volume.surface_visible(),
            notification: self.notifications.current().map(str::to_string),
        }
    }

    fn request_start(&mut self, reason: StartReason) {
        match self.lifecycle.sink_mut() {
            Some(sink) => {
                sink.set_muted(false);
                sink.request_play();
            }
            None => {
                self.raise_error(MSG_LOADING);
                return;
            }
        }
        self.muted = false;
        self.pending_start = Some(reason);
        tracing::debug!(?reason, "playback start requested");
    }

    fn raise_error(&mut self, message: &str) {
        self.error_message = message.to_string();
        self.notifications
            .notify(message, self.config.prompt_duration());
    }

    fn sink_settings(&self) -> SinkSettings {
        SinkSettings {
            source: self.config.track_path.clone(),
            loop_playback: true,
            preload: Preload::Eager,
            volume: self.volume.level(),
            muted: self.muted,
        }
    }
}

impl std::fmt::Debug for AudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPlayer")
            .field("lifecycle", &self.lifecycle)
            .field("muted", &self.muted)
            .field("playing", &self.playing)
            .field("pending_start", &self.pending_start)
            .finish()
    }
}
