use serde::Serialize;

use crate::{
    locate::{Highlight, WordPosition},
    session::Session,
};

/// The host media element, as far as the player core is concerned.
pub trait PlaybackBridge {
    fn seek(&mut self, t: f64);
    fn play(&mut self);
}

/// Result of one time-update tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickUpdate {
    pub highlight: Highlight,
    /// Set only when the active sentence changed to a new sentence; the host
    /// scrolls it into view.
    pub scroll_to: Option<usize>,
    pub changed: bool,
}

/// Wires a [`Session`] to a [`PlaybackBridge`]: clicks become seeks, time
/// updates become highlight changes.
pub struct Player {
    session: Session,
    highlight: Highlight,
}

impl Player {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            highlight: Highlight::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Replace the whole session, as a new upload does.
    pub fn load(&mut self, session: Session) {
        tracing::info!(script = session.script_name.as_str(), "session replaced");
        self.session = session;
        self.highlight = Highlight::default();
    }

    /// Seek to a sentence's start and resume playback. Returns `false` for an
    /// index outside the timeline.
    pub fn seek_to_sentence(&self, index: usize, bridge: &mut impl PlaybackBridge) -> bool {
        let Some(sentence) = self.session.timeline.sentences.get(index) else {
            return false;
        };
        bridge.seek(sentence.start);
        bridge.play();
        true
    }

    pub fn seek_to_word(&self, pos: WordPosition, bridge: &mut impl PlaybackBridge) -> bool {
        let Some(word) = self
            .session
            .timeline
            .sentences
            .get(pos.sentence)
            .and_then(|s| s.words.get(pos.word))
        else {
            return false;
        };
        bridge.seek(word.start);
        bridge.play();
        true
    }

    pub fn on_time_update(&mut self, t: f64) -> TickUpdate {
        let next = Highlight::at(&self.session.timeline.sentences, t);
        let scroll_to = match next.sentence {
            Some(i) if self.highlight.sentence != Some(i) => Some(i),
            _ => None,
        };
        let changed = next != self.highlight;
        self.highlight = next;

        TickUpdate {
            highlight: next,
            scroll_to,
            changed,
        }
    }
}

/// Headless stand-in for a media element: a clock that advances at a fixed
/// tick rate while playing.
#[derive(Debug, Clone)]
pub struct ReplayClock {
    position: f64,
    step: f64,
    playing: bool,
}

impl ReplayClock {
    pub fn new(tick_hz: f64) -> Self {
        let hz = if tick_hz.is_finite() && tick_hz > 0.0 {
            tick_hz
        } else {
            4.0
        };
        Self {
            position: 0.0,
            step: 1.0 / hz,
            playing: false,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance one tick. Returns the new position, or `None` when paused.
    pub fn tick(&mut self) -> Option<f64> {
        if !self.playing {
            return None;
        }
        self.position += self.step;
        Some(self.position)
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }
}

impl PlaybackBridge for ReplayClock {
    fn seek(&mut self, t: f64) {
        self.position = if t.is_finite() { t.max(0.0) } else { 0.0 };
    }

    fn play(&mut self) {
        self.playing = true;
    }
}
