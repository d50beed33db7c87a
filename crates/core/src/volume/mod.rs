use crate::config::DEFAULT_VOLUME;
use crate::sink::AudioSink;

/// In-memory volume state plus the hover-revealed slider surface.
///
/// Nothing here is persisted across sessions. A level set while no sink is
/// attached is buffered in `level` itself and flows into the element exactly
/// once, through the configure settings of the next acquire.
#[derive(Debug)]
pub struct VolumeControl {
    level: f32,
    surface_visible: bool,
    pending: bool,
}

impl VolumeControl {
    pub fn new(initial: f32) -> Self {
        Self {
            level: initial.clamp(0.0, 1.0),
            surface_visible: false,
            pending: true,
        }
    }

    /// Clamps and stores `level`, applying it to the live element when one is
    /// attached. Writes are last-write-wins.
    pub fn set_level(&mut self, level: f32, sink: Option<&mut dyn AudioSink>) {
        self.level = level.clamp(0.0, 1.0);
        match sink {
            Some(sink) => {
                sink.set_volume(self.level);
                self.pending = false;
            }
            None => self.pending = true,
        }
    }

    /// Called after an acquire whose configure settings carried the current
    /// level, so the buffered write is not replayed.
    pub fn mark_applied(&mut self) {
        self.pending = false;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Whether the stored level has not yet reached a live element.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn show_surface(&mut self) {
        self.surface_visible = true;
    }

    pub fn hide_surface(&mut self) {
        self.surface_visible = false;
    }

    pub fn surface_visible(&self) -> bool {
        self.surface_visible
    }
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}
