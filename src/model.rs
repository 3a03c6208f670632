use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Speaker identifier as it appears in the transcript. Providers emit either
/// numbers or strings; the original kind is kept so `1` and `"1"` stay distinct.
/// Integral floats collapse to integers, so `1.0` and `1` are the same speaker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SpeakerId {
    Number(Number),
    Text(String),
}

impl<'de> Deserialize<'de> for SpeakerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SpeakerIdVisitor;

        impl<'de> serde::de::Visitor<'de> for SpeakerIdVisitor {
            type Value = SpeakerId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a string")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(SpeakerId::Number(v.into()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(SpeakerId::Number(v.into()))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                // Within +/-2^53 an integral f64 converts to i64 exactly.
                if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
                    return Ok(SpeakerId::Number((v as i64).into()));
                }
                Number::from_f64(v)
                    .map(SpeakerId::Number)
                    .ok_or_else(|| E::custom("speaker id is not a finite number"))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(SpeakerId::Text(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(SpeakerId::Text(v))
            }
        }

        deserializer.deserialize_any(SpeakerIdVisitor)
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakerId::Number(n) => write!(f, "{n}"),
            SpeakerId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SpeakerId {
    fn from(n: i64) -> Self {
        SpeakerId::Number(n.into())
    }
}

impl From<&str> for SpeakerId {
    fn from(s: &str) -> Self {
        SpeakerId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    #[default]
    Word,
    Spacing,
    /// Any other provider-specific type (audio events and the like); these
    /// take part in sentence building exactly like words.
    #[serde(other)]
    Other,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// One timed unit of a word-level transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    pub start: f64,
    pub end: f64,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<SpeakerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
}

impl Token {
    pub fn word(text: &str, start: f64, end: f64) -> Self {
        Self {
            text: text.to_string(),
            start,
            end,
            kind: TokenKind::Word,
            speaker_id: None,
            speaker_name: None,
        }
    }

    pub fn spacing(start: f64, end: f64) -> Self {
        Self {
            text: " ".to_string(),
            start,
            end,
            kind: TokenKind::Spacing,
            speaker_id: None,
            speaker_name: None,
        }
    }

    pub fn with_speaker(mut self, id: impl Into<SpeakerId>, name: Option<&str>) -> Self {
        self.speaker_id = Some(id.into());
        self.speaker_name = name.map(str::to_string);
        self
    }

    pub fn is_spacing(&self) -> bool {
        self.kind == TokenKind::Spacing
    }

    /// Text as it contributes to sentence content. Spacing tokens that carry
    /// no text still separate words.
    pub fn display_text(&self) -> &str {
        if self.is_spacing() && self.text.is_empty() {
            " "
        } else {
            &self.text
        }
    }
}

/// A clickable unit with a single time interval: a run of tokens from a word
/// transcript, or one block of a timed script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub index: u32,
    pub start: f64,
    pub end: f64,
    pub content: String,
    pub speaker: Option<SpeakerId>,
    pub speaker_name: Option<String>,
    pub raw_time: String,
    #[serde(default)]
    pub words: Vec<Token>,
}

impl Sentence {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Identity used to decide group membership: speaker and name, empty
    /// string for absent values, joined with `:`.
    pub fn speaker_key(&self) -> String {
        let speaker = self
            .speaker
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let name = self.speaker_name.as_deref().unwrap_or("");
        format!("{speaker}:{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Json,
    Script,
}

/// The ordered sentence sequence produced by one parse pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub source: SourceFormat,
    pub sentences: Vec<Sentence>,
}

impl Timeline {
    pub fn new(source: SourceFormat, sentences: Vec<Sentence>) -> Self {
        Self { source, sentences }
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn duration(&self) -> f64 {
        self.sentences.last().map(|s| s.end).unwrap_or(0.0).max(0.0)
    }

    pub fn word_count(&self) -> usize {
        self.sentences
            .iter()
            .flat_map(|s| &s.words)
            .filter(|w| !w.is_spacing())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_defaults_to_word() {
        let t: Token = serde_json::from_str(r#"{"text":"Hi","start":0,"end":0.5}"#).unwrap();
        assert_eq!(t.kind, TokenKind::Word);
        assert_eq!(t.speaker_id, None);
        assert_eq!(t.start, 0.0);
    }

    #[test]
    fn speaker_id_keeps_its_kind() {
        let a: Token =
            serde_json::from_str(r#"{"text":"a","start":0,"end":1,"speaker_id":1}"#).unwrap();
        let b: Token =
            serde_json::from_str(r#"{"text":"a","start":0,"end":1,"speaker_id":"1"}"#).unwrap();
        assert_eq!(a.speaker_id, Some(SpeakerId::from(1i64)));
        assert_eq!(b.speaker_id, Some(SpeakerId::Text("1".into())));
        assert_ne!(a.speaker_id, b.speaker_id);
    }

    #[test]
    fn numeric_ids_compare_by_value() {
        let ids: Vec<SpeakerId> =
            serde_json::from_str("[1, 1.0, 18446744073709551615, 2.5]").unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[1], SpeakerId::from(1i64));
        assert_eq!(ids[2].to_string(), "18446744073709551615");
        assert_eq!(ids[3].to_string(), "2.5");
        assert_ne!(ids[3], SpeakerId::Text("2.5".into()));
    }

    #[test]
    fn float_speaker_id_in_token() {
        let t: Token =
            serde_json::from_str(r#"{"text":"a","start":0,"end":1,"speaker_id":1.0}"#).unwrap();
        assert_eq!(t.speaker_id, Some(SpeakerId::from(1i64)));
    }

    #[test]
    fn null_text_and_type_fall_back_to_defaults() {
        let t: Token = serde_json::from_str(
            r#"{"text":null,"start":0,"end":1,"type":null,"speaker_id":null,"speaker_name":null}"#,
        )
        .unwrap();
        assert_eq!(t.text, "");
        assert_eq!(t.kind, TokenKind::Word);
        assert_eq!(t.speaker_id, None);

        let gap: Token =
            serde_json::from_str(r#"{"type":"spacing","text":null,"start":0.5,"end":0.6}"#)
                .unwrap();
        assert_eq!(gap.display_text(), " ");
    }

    #[test]
    fn unknown_type_is_other() {
        let t: Token =
            serde_json::from_str(r#"{"text":"(laughs)","start":0,"end":1,"type":"audio_event"}"#)
                .unwrap();
        assert_eq!(t.kind, TokenKind::Other);
        assert!(!t.is_spacing());
    }

    #[test]
    fn spacing_without_text_displays_as_space() {
        let t: Token =
            serde_json::from_str(r#"{"type":"spacing","start":0.5,"end":0.6}"#).unwrap();
        assert_eq!(t.text, "");
        assert_eq!(t.display_text(), " ");
    }

    #[test]
    fn speaker_key_substitutes_empty() {
        let s = Sentence {
            index: 1,
            start: 0.0,
            end: 1.0,
            content: "x".into(),
            speaker: Some(SpeakerId::from(2i64)),
            speaker_name: None,
            raw_time: String::new(),
            words: vec![],
        };
        assert_eq!(s.speaker_key(), "2:");
    }
}
