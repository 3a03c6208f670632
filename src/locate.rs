use serde::Serialize;

use crate::model::{Sentence, Token};

/// Anything with a closed playback interval `[start, end]`.
pub trait Timed {
    fn start(&self) -> f64;
    fn end(&self) -> f64;

    fn contains(&self, t: f64) -> bool {
        self.start() <= t && t <= self.end()
    }
}

impl Timed for Sentence {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

impl Timed for Token {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Index of the first unit whose interval contains `t`.
///
/// Returns `None` in gaps, before the first unit, after the last, and for NaN.
/// When intervals overlap the earliest index wins.
pub fn locate<T: Timed>(units: &[T], t: f64) -> Option<usize> {
    units.iter().position(|u| u.contains(t))
}

/// Position of a word inside the timeline: sentence index, then index into
/// that sentence's `words`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordPosition {
    pub sentence: usize,
    pub word: usize,
}

/// Active word at `t`. Spacing tokens are never reported as active.
pub fn locate_word(sentences: &[Sentence], t: f64) -> Option<WordPosition> {
    let sentence = locate(sentences, t)?;
    let word = sentences[sentence]
        .words
        .iter()
        .position(|w| !w.is_spacing() && w.contains(t))?;
    Some(WordPosition { sentence, word })
}

/// What should be marked active at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub sentence: Option<usize>,
    pub word: Option<WordPosition>,
}

impl Highlight {
    pub fn at(sentences: &[Sentence], t: f64) -> Self {
        Self {
            sentence: locate(sentences, t),
            word: locate_word(sentences, t),
        }
    }
}
