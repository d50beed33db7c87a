use std::sync::{Arc, Mutex, MutexGuard};

use crate::{AudioCoreError, AudioPlayer, Result};

/// Shared ownership wrapper the host keeps for the full control surface.
///
/// The host drives the player through [`with`](SharedPlayer::with) from its
/// event callbacks; anything outside the hosting chrome only ever receives a
/// [`StartHandle`].
pub struct SharedPlayer {
    shared: Arc<Mutex<AudioPlayer>>,
}

impl SharedPlayer {
    pub fn new(player: AudioPlayer) -> Self {
        Self {
            shared: Arc::new(Mutex::new(player)),
        }
    }

    /// Hands out the narrow capability for the start-choice screen.
    pub fn start_handle(&self) -> StartHandle {
        StartHandle {
            shared: self.shared.clone(),
        }
    }

    /// Runs `f` against the player under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut AudioPlayer) -> R) -> Result<R> {
        let mut player = self.lock()?;
        Ok(f(&mut player))
    }

    fn lock(&self) -> Result<MutexGuard<'_, AudioPlayer>> {
        self.shared
            .lock()
            .map_err(|_| AudioCoreError::msg("player state has been poisoned"))
    }
}

impl std::fmt::Debug for SharedPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPlayer").finish()
    }
}

/// Narrow capability exposing exactly one operation to components outside
/// the player's own controls: forcing playback to begin after the user made
/// an explicit choice elsewhere.
#[derive(Clone)]
pub struct StartHandle {
    shared: Arc<Mutex<AudioPlayer>>,
}

impl StartHandle {
    pub fn start_music(&self) -> Result<()> {
        let mut player = self
            .shared
            .lock()
            .map_err(|_| AudioCoreError::msg("player state has been poisoned"))?;
        player.start_music();
        Ok(())
    }
}

impl std::fmt::Debug for StartHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartHandle").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::sink::{ScriptedSink, SinkFactory};

    fn shared_player(without_music: bool) -> (SharedPlayer, ScriptedSink) {
        let sink = ScriptedSink::new();
        let probe = sink.clone();
        let factory: SinkFactory = Box::new(move || Ok(Box::new(sink.clone())));
        let player = AudioPlayer::new(PlayerConfig::with_intent(without_music), factory);
        (SharedPlayer::new(player), probe)
    }

    fn pump(player: &SharedPlayer, probe: &ScriptedSink) {
        let generation = player.with(|p| p.generation()).unwrap();
        for event in probe.drain_events() {
            player
                .with(|p| p.handle_sink_event(generation, event))
                .unwrap();
        }
    }

    #[test]
    fn start_handle_starts_playback_through_the_shared_player() {
        let (player, probe) = shared_player(true);
        player.with(|p| p.mount()).unwrap();
        let handle = player.start_handle();

        handle.start_music().unwrap();
        pump(&player, &probe);

        let state = player.with(|p| p.state()).unwrap();
        assert!(state.playing);
        assert!(!state.muted);
    }

    #[test]
    fn handles_stay_valid_across_clones() {
        let (player, probe) = shared_player(true);
        player.with(|p| p.mount()).unwrap();
        let handle = player.start_handle().clone();

        handle.start_music().unwrap();
        pump(&player, &probe);

        assert!(player.with(|p| p.state()).unwrap().playing);
    }
}
