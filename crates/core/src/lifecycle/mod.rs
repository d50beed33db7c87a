use crate::sink::{AudioSink, SinkFactory, SinkSettings};
use crate::Result;

/// Identifier for one acquire/release cycle of the platform resource.
///
/// Sink events are tagged with the generation they were observed under;
/// anything tagged with a released generation is discarded, which is how a
/// playback-start resolution arriving after teardown is kept from touching a
/// dead handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Exclusive owner of the single streaming audio element.
///
/// At most one sink exists per mount. `acquire` tears down any previous
/// element before constructing the next, and `release` is idempotent, so
/// every exit path (intent change, construction failure, unmount) leaves the
/// platform resource detached.
pub struct ResourceLifecycle {
    sink: Option<Box<dyn AudioSink>>,
    generation: Generation,
    factory: SinkFactory,
}

impl ResourceLifecycle {
    pub fn new(factory: SinkFactory) -> Self {
        Self {
            sink: None,
            generation: Generation(0),
            factory,
        }
    }

    /// Constructs and configures a fresh element, returning the generation
    /// the caller should tag subsequent sink events with.
    pub fn acquire(&mut self, settings: &SinkSettings) -> Result<Generation> {
        self.release();

        let mut sink = (self.factory)()?;
        sink.configure(settings)?;
        self.generation = self.generation.next();
        self.sink = Some(sink);
        tracing::debug!(
            generation = self.generation.value(),
            source = %settings.source,
            "audio resource acquired"
        );
        Ok(self.generation)
    }

    /// Stops playback, detaches the observers, and drops the handle. Safe to
    /// call repeatedly and on a lifecycle that never acquired.
    pub fn release(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            sink.pause();
            sink.detach();
            tracing::debug!(generation = self.generation.value(), "audio resource released");
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_acquired(&self) -> bool {
        self.sink.is_some()
    }

    /// Whether an event tagged with `generation` belongs to the live element.
    pub fn accepts(&self, generation: Generation) -> bool {
        self.sink.is_some() && generation == self.generation
    }

    pub fn sink_mut(&mut self) -> Option<&mut (dyn AudioSink + '_)> {
        self.sink
            .as_deref_mut()
            .map(|sink| sink as &mut (dyn AudioSink + '_))
    }
}

impl Drop for ResourceLifecycle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ResourceLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLifecycle")
            .field("generation", &self.generation)
            .field("acquired", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Preload, ScriptedSink, SinkCommand};

    fn settings() -> SinkSettings {
        SinkSettings {
            source: "/background-music.mp3".to_string(),
            loop_playback: true,
            preload: Preload::Eager,
            volume: 0.15,
            muted: true,
        }
    }

    fn lifecycle_with_probe() -> (ResourceLifecycle, ScriptedSink) {
        let sink = ScriptedSink::new();
        let probe = sink.clone();
        let factory: SinkFactory = Box::new(move || Ok(Box::new(sink.clone())));
        (ResourceLifecycle::new(factory), probe)
    }

    #[test]
    fn acquire_configures_the_element_once() {
        let (mut lifecycle, probe) = lifecycle_with_probe();
        let generation = lifecycle.acquire(&settings()).unwrap();

        assert!(lifecycle.is_acquired());
        assert!(lifecycle.accepts(generation));
        assert_eq!(probe.commands(), vec![SinkCommand::Configure]);
    }

    #[test]
    fn release_is_idempotent() {
        let (mut lifecycle, probe) = lifecycle_with_probe();
        lifecycle.acquire(&settings()).unwrap();

        lifecycle.release();
        lifecycle.release();

        assert!(!lifecycle.is_acquired());
        assert!(probe.is_detached());
        let detaches = probe
            .commands()
            .iter()
            .filter(|command| **command == SinkCommand::Detach)
            .count();
        assert_eq!(detaches, 1);
    }

    #[test]
    fn reacquire_bumps_the_generation_and_rejects_stale_events() {
        let (mut lifecycle, _probe) = lifecycle_with_probe();
        let first = lifecycle.acquire(&settings()).unwrap();
        let second = lifecycle.acquire(&settings()).unwrap();

        assert_ne!(first, second);
        assert!(!lifecycle.accepts(first));
        assert!(lifecycle.accepts(second));
    }

    #[test]
    fn released_lifecycle_accepts_nothing() {
        let (mut lifecycle, _probe) = lifecycle_with_probe();
        let generation = lifecycle.acquire(&settings()).unwrap();
        lifecycle.release();

        assert!(!lifecycle.accepts(generation));
    }

    #[test]
    fn construction_failure_leaves_no_resource_behind() {
        let sink = ScriptedSink::new();
        sink.fail_next_configure();
        let factory: SinkFactory = Box::new(move || Ok(Box::new(sink.clone())));
        let mut lifecycle = ResourceLifecycle::new(factory);

        assert!(lifecycle.acquire(&settings()).is_err());
        assert!(!lifecycle.is_acquired());
    }
}
