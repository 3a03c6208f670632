pub mod json;
pub mod srt;
pub mod time;

use std::path::Path;

use crate::{error::Result, model::Timeline};

/// How a transcript file should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Word-level JSON; selected by a `.json` extension.
    Json,
    /// SRT-like timed script (`.srt`, `.vtt`, `.txt`, or anything else).
    Script,
}

pub const SCRIPT_EXTENSIONS: &[&str] = &["json", "txt", "srt", "vtt"];

fn extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_known_extension(name: &str) -> bool {
    SCRIPT_EXTENSIONS.contains(&extension(name).as_str())
}

pub fn kind_from_name(name: &str) -> ScriptKind {
    match extension(name).as_str() {
        "json" => ScriptKind::Json,
        _ => ScriptKind::Script,
    }
}

/// Parse transcript text named `name`.
///
/// `.json` always goes through the word-transcript parser and its errors are
/// reported. For other names the content is sniffed: text that looks like
/// JSON is tried as a word transcript first and falls back to the script
/// parser if that fails.
pub fn parse_any(name: &str, raw: &str) -> Result<Timeline> {
    if !is_known_extension(name) {
        tracing::warn!(
            name = name,
            known = ?SCRIPT_EXTENSIONS,
            "unrecognised script extension; reading as a timed script"
        );
    }
    match kind_from_name(name) {
        ScriptKind::Json => json::parse_word_transcript(raw),
        ScriptKind::Script => {
            let trimmed = raw.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                tracing::info!("script looks like JSON; attempting word transcript parse");
                if let Ok(t) = json::parse_word_transcript(raw) {
                    return Ok(t);
                }
            }
            Ok(srt::parse_script(raw))
        }
    }
}
