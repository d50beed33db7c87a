use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Track served from the host's public asset root.
pub const DEFAULT_TRACK_PATH: &str = "/background-music.mp3";

/// Initial playback volume, kept low so the music sits under the page.
pub const DEFAULT_VOLUME: f32 = 0.15;

/// Top-level configuration for the player core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub track_path: String,
    pub initial_volume: f32,
    /// Caller-declared intent supplied at mount time: start muted or not.
    pub without_music: bool,
    /// Display time for mute/unmute acknowledgements, in milliseconds.
    pub ack_notification_ms: u64,
    /// Display time for error and retry prompts, in milliseconds.
    pub prompt_notification_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            track_path: DEFAULT_TRACK_PATH.to_string(),
            initial_volume: DEFAULT_VOLUME,
            without_music: false,
            ack_notification_ms: 2_000,
            prompt_notification_ms: 3_000,
        }
    }
}

impl PlayerConfig {
    /// Default configuration with an explicit mount-time intent.
    pub fn with_intent(without_music: bool) -> Self {
        Self {
            without_music,
            ..Self::default()
        }
    }

    pub fn ack_duration(&self) -> Duration {
        Duration::from_millis(self.ack_notification_ms)
    }

    pub fn prompt_duration(&self) -> Duration {
        Duration::from_millis(self.prompt_notification_ms)
    }

    /// Serializes the configuration for hosts that persist or display it.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
