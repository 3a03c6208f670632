use serde::Serialize;

use crate::model::{Sentence, SpeakerId};

/// Consecutive sentences sharing one speaker identity. Borrows a contiguous
/// run of the timeline; groups never own or reorder sentences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerGroup<'a> {
    pub speaker: Option<&'a SpeakerId>,
    pub speaker_name: Option<&'a str>,
    pub sentences: &'a [Sentence],
}

impl SpeakerGroup<'_> {
    pub fn start(&self) -> f64 {
        self.sentences.first().map(|s| s.start).unwrap_or(0.0)
    }

    pub fn end(&self) -> f64 {
        self.sentences.last().map(|s| s.end).unwrap_or(0.0)
    }

    /// Label shown above the group: the speaker name, the identifier, or the
    /// group position when the transcript carries no speakers.
    pub fn label(&self, group_index: usize) -> String {
        match (self.speaker_name, self.speaker) {
            (Some(name), _) => name.to_string(),
            (None, Some(id)) => id.to_string(),
            (None, None) => group_index.to_string(),
        }
    }
}

/// Split `sentences` into speaker groups in one pass. A new group starts
/// whenever [`Sentence::speaker_key`] differs from the previous sentence.
pub fn group_by_speaker(sentences: &[Sentence]) -> Vec<SpeakerGroup<'_>> {
    let mut groups = Vec::new();
    let mut group_start = 0;
    let mut current_key: Option<String> = None;

    for (i, sentence) in sentences.iter().enumerate() {
        let key = sentence.speaker_key();
        match &current_key {
            Some(k) if *k == key => {}
            Some(_) => {
                groups.push(make_group(&sentences[group_start..i]));
                group_start = i;
                current_key = Some(key);
            }
            None => current_key = Some(key),
        }
    }

    if group_start < sentences.len() {
        groups.push(make_group(&sentences[group_start..]));
    }

    groups
}

fn make_group(run: &[Sentence]) -> SpeakerGroup<'_> {
    let first = &run[0];
    SpeakerGroup {
        speaker: first.speaker.as_ref(),
        speaker_name: first.speaker_name.as_deref(),
        sentences: run,
    }
}
