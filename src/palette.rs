use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::SpeakerId;

/// Speaker display colours. Purely cosmetic: unknown speakers get the
/// fallback colour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub fallback: String,
    pub speakers: BTreeMap<String, String>,
}

impl Default for Palette {
    fn default() -> Self {
        let speakers = [
            ("Narrator", "#ff6b6b"),
            ("Anger", "#e74c3c"),
            ("Sadness", "#3498db"),
            ("Joy", "#f1c40f"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            fallback: "#ff6b6b".to_string(),
            speakers,
        }
    }
}

impl Palette {
    /// Lookup by speaker name first, then by the identifier's string form. A
    /// group without an identifier is keyed by its position in the group list.
    pub fn color_for(
        &self,
        speaker_name: Option<&str>,
        speaker: Option<&SpeakerId>,
        group_index: usize,
    ) -> &str {
        let key = speaker.map_or_else(|| group_index.to_string(), ToString::to_string);
        speaker_name
            .and_then(|name| self.speakers.get(name))
            .or_else(|| self.speakers.get(&key))
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_then_id_then_fallback() {
        let mut p = Palette::default();
        p.speakers.insert("7".into(), "#123456".into());

        assert_eq!(p.color_for(Some("Joy"), None, 0), "#f1c40f");
        assert_eq!(p.color_for(Some("Nobody"), Some(&SpeakerId::from(7i64)), 0), "#123456");
        assert_eq!(p.color_for(None, Some(&SpeakerId::Text("7".into())), 0), "#123456");
        assert_eq!(p.color_for(None, None, 0), "#ff6b6b");
    }

    #[test]
    fn anonymous_group_keyed_by_position() {
        let mut p = Palette::default();
        p.speakers.insert("3".into(), "#abcdef".into());

        assert_eq!(p.color_for(None, None, 3), "#abcdef");
        assert_eq!(p.color_for(None, None, 2), "#ff6b6b");
        assert_eq!(p.color_for(None, Some(&SpeakerId::from(9i64)), 3), "#ff6b6b");
    }
}
