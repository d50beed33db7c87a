use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::Result;

/// How eagerly the platform should fetch the bound track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preload {
    Eager,
    Metadata,
    None,
}

/// Everything the platform audio element needs to be configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkSettings {
    pub source: String,
    pub loop_playback: bool,
    pub preload: Preload,
    pub volume: f32,
    pub muted: bool,
}

/// Transport and outcome events reported back by the platform element.
///
/// `PlayRejected` is the autoplay-policy refusal; `PlayFailed` covers every
/// other reason a requested start did not materialise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    PlayStarted,
    Playing,
    Paused,
    Ended,
    PlayRejected,
    PlayFailed,
}

/// Seam between the player core and the platform audio element.
///
/// `request_play` is fire-and-forget: the deferred outcome arrives later as a
/// [`SinkEvent`] on the host's event queue, tagged with the lifecycle
/// generation it was observed under.
pub trait AudioSink: Send {
    /// Binds the source and applies the initial transport flags. Called
    /// exactly once per acquire.
    fn configure(&mut self, settings: &SinkSettings) -> Result<()>;
    fn request_play(&mut self);
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    /// Clears the source binding and drops any platform observers. Must be
    /// safe to call more than once.
    fn detach(&mut self);
}

/// Constructor the lifecycle uses whenever it needs a fresh element.
pub type SinkFactory = Box<dyn FnMut() -> Result<Box<dyn AudioSink>> + Send>;

/// Commands recorded by [`ScriptedSink`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCommand {
    Configure,
    RequestPlay,
    Pause,
    SetVolume(f32),
    SetMuted(bool),
    Detach,
}

#[derive(Debug, Default)]
struct ScriptedInner {
    commands: Vec<SinkCommand>,
    settings: Option<SinkSettings>,
    play_outcomes: VecDeque<SinkEvent>,
    events: Vec<SinkEvent>,
    detached: bool,
    fail_configure: bool,
}

/// Deterministic sink used by the demo app and the tests.
///
/// Clones share state, so a host can hand one clone to the player and keep
/// another as a probe. Each `request_play` consumes the next scripted outcome
/// (defaulting to [`SinkEvent::PlayStarted`]) and parks it until the host
/// drains and re-dispatches it, mirroring how real platform events arrive a
/// tick after the request.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSink {
    inner: Arc<Mutex<ScriptedInner>>,
}

impl ScriptedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome the next `request_play` should produce.
    pub fn queue_play_outcome(&self, outcome: SinkEvent) {
        self.lock().play_outcomes.push_back(outcome);
    }

    /// Makes the next `configure` call fail, simulating a platform that
    /// refuses to construct the element.
    pub fn fail_next_configure(&self) {
        self.lock().fail_configure = true;
    }

    /// Removes and returns the events emitted since the last drain.
    pub fn drain_events(&self) -> Vec<SinkEvent> {
        std::mem::take(&mut self.lock().events)
    }

    pub fn commands(&self) -> Vec<SinkCommand> {
        self.lock().commands.clone()
    }

    pub fn settings(&self) -> Option<SinkSettings> {
        self.lock().settings.clone()
    }

    pub fn is_detached(&self) -> bool {
        self.lock().detached
    }

    fn lock(&self) -> MutexGuard<'_, ScriptedInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioSink for ScriptedSink {
    fn configure(&mut self, settings: &SinkSettings) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_configure {
            inner.fail_configure = false;
            return Err(crate::AudioCoreError::msg(
                "platform refused to construct the audio element",
            ));
        }
        inner.settings = Some(settings.clone());
        inner.detached = false;
        inner.commands.push(SinkCommand::Configure);
        Ok(())
    }

    fn request_play(&mut self) {
        let mut inner = self.lock();
        inner.commands.push(SinkCommand::RequestPlay);
        let outcome = inner
            .play_outcomes
            .pop_front()
            .unwrap_or(SinkEvent::PlayStarted);
        inner.events.push(outcome);
    }

    fn pause(&mut self) {
        let mut inner = self.lock();
        inner.commands.push(SinkCommand::Pause);
        inner.events.push(SinkEvent::Paused);
    }

    fn set_volume(&mut self, volume: f32) {
        let mut inner = self.lock();
        if let Some(settings) = inner.settings.as_mut() {
            settings.volume = volume;
        }
        inner.commands.push(SinkCommand::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        let mut inner = self.lock();
        if let Some(settings) = inner.settings.as_mut() {
            settings.muted = muted;
        }
        inner.commands.push(SinkCommand::SetMuted(muted));
    }

    fn detach(&mut self) {
        let mut inner = self.lock();
        inner.settings = None;
        inner.detached = true;
        inner.commands.push(SinkCommand::Detach);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SinkSettings {
        SinkSettings {
            source: "/background-music.mp3".to_string(),
            loop_playback: true,
            preload: Preload::Eager,
            volume: 0.15,
            muted: false,
        }
    }

    #[test]
    fn play_requests_consume_scripted_outcomes_in_order() {
        let mut sink = ScriptedSink::new();
        sink.queue_play_outcome(SinkEvent::PlayRejected);
        sink.configure(&settings()).unwrap();

        sink.request_play();
        sink.request_play();

        assert_eq!(
            sink.drain_events(),
            vec![SinkEvent::PlayRejected, SinkEvent::PlayStarted]
        );
        assert!(sink.drain_events().is_empty());
    }

    #[test]
    fn transport_flags_update_the_stored_settings() {
        let mut sink = ScriptedSink::new();
        sink.configure(&settings()).unwrap();

        sink.set_volume(0.6);
        sink.set_muted(true);

        let stored = sink.settings().unwrap();
        assert!((stored.volume - 0.6).abs() < f32::EPSILON);
        assert!(stored.muted);
    }

    #[test]
    fn detach_clears_the_source_binding() {
        let mut sink = ScriptedSink::new();
        sink.configure(&settings()).unwrap();
        sink.detach();

        assert!(sink.is_detached());
        assert!(sink.settings().is_none());
    }

    #[test]
    fn configure_failure_fires_once() {
        let mut sink = ScriptedSink::new();
        sink.fail_next_configure();

        assert!(sink.configure(&settings()).is_err());
        assert!(sink.configure(&settings()).is_ok());
    }
}
