use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Serialize;
use url::Url;

use crate::{
    config::Defaults,
    error::{Error, Result},
    formats,
    grouping::{SpeakerGroup, group_by_speaker},
    model::Timeline,
};

/// Reference to the audio the transcript belongs to. The core never decodes
/// it; the host hands it to its media element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSource {
    Path(PathBuf),
    Url(String),
}

impl MediaSource {
    pub fn name(&self) -> String {
        match self {
            MediaSource::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            MediaSource::Url(u) => u.rsplit('/').next().unwrap_or(u).to_string(),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Path(p) => write!(f, "{}", p.display()),
            MediaSource::Url(u) => f.write_str(u),
        }
    }
}

/// One loaded script/media pair. Immutable: loading another file produces a
/// new session that replaces this one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub script_name: String,
    pub media: Option<MediaSource>,
    pub timeline: Timeline,
}

impl Session {
    pub fn from_script(script_name: &str, raw: &str, media: Option<MediaSource>) -> Result<Self> {
        let timeline = formats::parse_any(script_name, raw)?;
        tracing::info!(
            script = script_name,
            sentences = timeline.len(),
            words = timeline.word_count(),
            "script parsed"
        );
        Ok(Self {
            script_name: script_name.to_string(),
            media,
            timeline,
        })
    }

    /// Load a script (and optionally its media) picked by the user from disk.
    pub fn load_local(script: &Path, media: Option<&Path>) -> Result<Self> {
        let raw = read_file(script)?;
        let media = media
            .map(|p| {
                fs::metadata(p).map_err(|source| Error::Read {
                    path: p.display().to_string(),
                    source,
                })?;
                Ok::<_, Error>(MediaSource::Path(p.to_path_buf()))
            })
            .transpose()?;

        Self::from_script(&file_name(script), &raw, media)
    }

    /// Load the well-known default pair. Either half failing fails the whole
    /// load; a half-configured session is never returned.
    pub fn load_default(defaults: &Defaults) -> Result<Self> {
        let script_loc = resolve(&defaults.base, &defaults.script)?;
        let media_loc = resolve(&defaults.base, &defaults.media)?;
        tracing::info!(script = %script_loc, media = %media_loc, "loading default resources");

        let raw = match &script_loc {
            MediaSource::Path(p) => read_default(p)?,
            MediaSource::Url(u) => fetch_text(u, Duration::from_secs(defaults.fetch_timeout_secs))?,
        };

        if let MediaSource::Path(p) = &media_loc {
            if !p.exists() {
                return Err(Error::fetch(p.display().to_string(), "not found"));
            }
        }

        Self::from_script(&script_loc.name(), &raw, Some(media_loc))
    }

    pub fn media_name(&self) -> Option<String> {
        self.media.as_ref().map(MediaSource::name)
    }

    pub fn groups(&self) -> Vec<SpeakerGroup<'_>> {
        group_by_speaker(&self.timeline.sentences)
    }
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string())
}

fn read_file(p: &Path) -> Result<String> {
    fs::read_to_string(p).map_err(|source| Error::Read {
        path: p.display().to_string(),
        source,
    })
}

fn read_default(p: &Path) -> Result<String> {
    fs::read_to_string(p).map_err(|e| Error::fetch(p.display().to_string(), e))
}

fn is_remote(base: &str) -> bool {
    base.starts_with("http://") || base.starts_with("https://")
}

/// Resolve `rel` against a directory path or an `http(s)` base URL.
pub fn resolve(base: &str, rel: &str) -> Result<MediaSource> {
    if is_remote(base) {
        let mut base_url = base.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let joined = Url::parse(&base_url)
            .and_then(|b| b.join(rel))
            .map_err(|e| Error::fetch(format!("{base_url}{rel}"), e))?;
        Ok(MediaSource::Url(joined.to_string()))
    } else {
        Ok(MediaSource::Path(Path::new(base).join(rel)))
    }
}

/// Single GET, no retry.
fn fetch_text(url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::fetch(url, e))?;

    let resp = client.get(url).send().map_err(|e| Error::fetch(url, e))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::fetch(url, format!("HTTP status {status}")));
    }

    let body = resp.text().map_err(|e| Error::fetch(url, e))?;
    tracing::info!(url = url, bytes = body.len(), "fetched default script");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceFormat;

    const WORDS: &str = r#"{"words": [
        {"text": "Hello.", "start": 0.0, "end": 0.4, "speaker_id": "Narrator"},
        {"type": "spacing", "text": " ", "start": 0.4, "end": 0.5},
        {"text": "Hi.", "start": 0.5, "end": 0.9, "speaker_id": "Joy"}
    ]}"#;

    fn default_layout(dir: &Path, with_media: bool) -> Defaults {
        fs::create_dir_all(dir.join("scripts")).unwrap();
        fs::write(dir.join("scripts/whole_scripts.json"), WORDS).unwrap();
        if with_media {
            fs::create_dir_all(dir.join("audio")).unwrap();
            fs::write(dir.join("audio/whole_scripts.mp3"), b"ID3").unwrap();
        }
        Defaults {
            base: dir.display().to_string(),
            ..Defaults::default()
        }
    }

    #[test]
    fn loads_default_pair_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let defaults = default_layout(dir.path(), true);

        let session = Session::load_default(&defaults).unwrap();
        assert_eq!(session.script_name, "whole_scripts.json");
        assert_eq!(session.media_name().as_deref(), Some("whole_scripts.mp3"));
        assert_eq!(session.timeline.source, SourceFormat::Json);
        assert_eq!(session.timeline.len(), 2);
        assert_eq!(session.groups().len(), 2);
    }

    #[test]
    fn missing_default_script_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let defaults = Defaults {
            base: dir.path().display().to_string(),
            ..Defaults::default()
        };
        assert!(matches!(
            Session::load_default(&defaults),
            Err(Error::Fetch { .. })
        ));
    }

    #[test]
    fn missing_default_media_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let defaults = default_layout(dir.path(), false);
        assert!(matches!(
            Session::load_default(&defaults),
            Err(Error::Fetch { .. })
        ));
    }

    #[test]
    fn local_script_read_failure_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Session::load_local(&dir.path().join("nope.srt"), None).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.to_string().contains("nope.srt"));
    }

    #[test]
    fn local_media_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("a.srt");
        fs::write(&script, "1\n00:00:01,000 --> 00:00:02,000\nA\n").unwrap();
        assert!(matches!(
            Session::load_local(&script, Some(&dir.path().join("missing.mp3"))),
            Err(Error::Read { .. })
        ));
        let ok = Session::load_local(&script, None).unwrap();
        assert_eq!(ok.timeline.len(), 1);
        assert_eq!(ok.script_name, "a.srt");
    }

    #[test]
    fn invalid_json_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("bad.json");
        fs::write(&script, r#"{"segments": []}"#).unwrap();
        assert!(matches!(
            Session::load_local(&script, None),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn resolves_remote_and_local_bases() {
        assert_eq!(
            resolve("https://example.com/player", "scripts/a.json").unwrap(),
            MediaSource::Url("https://example.com/player/scripts/a.json".into())
        );
        assert_eq!(
            resolve("/srv/player", "audio/a.mp3").unwrap(),
            MediaSource::Path(PathBuf::from("/srv/player/audio/a.mp3"))
        );
        assert_eq!(
            MediaSource::Url("https://example.com/audio/a.mp3".into()).name(),
            "a.mp3"
        );
    }
}
