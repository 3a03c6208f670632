use serde_json::Value;

use crate::{
    error::{Error, Result},
    formats::time::format_range,
    model::{Sentence, SourceFormat, SpeakerId, Timeline, Token},
};

/// Parse a word-level JSON transcript: either a bare token array or an object
/// carrying the array under `words`.
pub fn parse_word_transcript(input: &str) -> Result<Timeline> {
    let v: Value = serde_json::from_str(input)?;
    let tokens = unwrap_tokens(v)?;
    Ok(Timeline::new(SourceFormat::Json, normalize_tokens(tokens)))
}

fn unwrap_tokens(v: Value) -> Result<Vec<Token>> {
    let items = match v {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("words") {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::format("invalid JSON transcript: missing words array")),
        },
        _ => return Err(Error::format("invalid JSON transcript: missing words array")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Token>(item)
                .map_err(|e| Error::format(format!("invalid token at position {i}: {e}")))
        })
        .collect()
}

fn ends_sentence(text: &str) -> bool {
    text.ends_with(['.', '!', '?'])
}

struct OpenSentence {
    start: f64,
    end: f64,
    speaker: Option<SpeakerId>,
    speaker_name: Option<String>,
    words: Vec<Token>,
    /// Last word token ended in terminal punctuation; the next word opens a
    /// new sentence.
    terminated: bool,
}

impl OpenSentence {
    fn begin(token: Token) -> Self {
        Self {
            start: token.start,
            end: token.end,
            speaker: token.speaker_id.clone(),
            speaker_name: token.speaker_name.clone(),
            terminated: ends_sentence(&token.text),
            words: vec![token],
        }
    }

    fn same_speaker(&self, token: &Token) -> bool {
        self.speaker == token.speaker_id && self.speaker_name == token.speaker_name
    }

    fn push_word(&mut self, token: Token) {
        self.end = token.end;
        self.terminated = ends_sentence(&token.text);
        self.words.push(token);
    }

    fn push_spacing(&mut self, token: Token) {
        self.end = token.end;
        self.words.push(token);
    }

    fn finish(self, index: u32) -> Sentence {
        let content: String = self.words.iter().map(Token::display_text).collect();
        Sentence {
            index,
            start: self.start,
            end: self.end,
            content,
            speaker: self.speaker,
            speaker_name: self.speaker_name,
            raw_time: format_range(self.start, self.end),
            words: self.words,
        }
    }
}

/// Group an ordered token stream into sentences.
///
/// A word token opens a new sentence when none is open, when its
/// `(speaker_id, speaker_name)` differs from the open sentence, or when the
/// previous word ended in `.`, `!` or `?`. A word ending in terminal
/// punctuation therefore closes the sentence it belongs to, and consecutive
/// terminal words each form a sentence of their own.
///
/// Spacing tokens only extend the open sentence; a leading spacing token is
/// dropped.
pub fn normalize_tokens(tokens: Vec<Token>) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut open: Option<OpenSentence> = None;

    for token in tokens {
        if token.is_spacing() {
            if let Some(current) = open.as_mut() {
                current.push_spacing(token);
            }
            continue;
        }

        match open.as_mut() {
            Some(current) if current.same_speaker(&token) && !current.terminated => {
                current.push_word(token);
            }
            _ => {
                if let Some(done) = open.take() {
                    let index = sentences.len() as u32 + 1;
                    sentences.push(done.finish(index));
                }
                open = Some(OpenSentence::begin(token));
            }
        }
    }

    if let Some(done) = open {
        let index = sentences.len() as u32 + 1;
        sentences.push(done.finish(index));
    }

    sentences
}
