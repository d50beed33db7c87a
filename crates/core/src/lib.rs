//! Core library for the background-audio player.
//!
//! The crate owns every part of the player that has real behaviour: the
//! lifecycle of the single streaming audio element, the playback state
//! machine that reconciles user intent with deferred start outcomes, the
//! volume controller, and the self-dismissing notification scheduler. The
//! hosting page is a caller: it supplies the platform element behind the
//! [`AudioSink`] seam, feeds events and timer ticks back in, and renders
//! whatever [`PlaybackState`] publishes.

pub mod config;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod player;
pub mod sink;
pub mod volume;

pub use config::{PlayerConfig, DEFAULT_TRACK_PATH, DEFAULT_VOLUME};
pub use control::{SharedPlayer, StartHandle};
pub use error::{AudioCoreError, Result};
pub use lifecycle::{Generation, ResourceLifecycle};
pub use notify::{DismissToken, Notification, NotificationScheduler};
pub use player::{AudioPlayer, PlaybackState};
pub use sink::{
    AudioSink, Preload, ScriptedSink, SinkCommand, SinkEvent, SinkFactory, SinkSettings,
};
pub use volume::VolumeControl;
