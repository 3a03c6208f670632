use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::{fs, path::Path};

use scriptsync::{
    PlaybackBridge, Player, ReplayClock, Session, SpeakerGroup,
    config::Config,
    formats::time::{format_range, format_seconds, parse_seconds_or_timestamp},
    locate::{locate, locate_word},
    model::{Sentence, Timeline},
    palette::Palette,
};

use crate::cli::{GroupsCmd, LocateCmd, OutputFormat, ParseCmd, ReplayCmd};

const MANUAL_LOAD_HINT: &str = "pass a script path (and --media for audio) to load files manually";

pub fn run_parse(cmd: ParseCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("parse", input = %cmd.input.display(), format = ?cmd.format);
    let _g = span.enter();

    let session = load_script(&cmd.input)?;
    log_timeline_summary(&session.timeline, cfg);

    let rendered = match cmd.format {
        OutputFormat::Json => serde_json::to_string_pretty(&session.timeline)? + "\n",
        OutputFormat::Text => render_timeline_text(&session.timeline),
    };

    match &cmd.output {
        Some(path) => {
            write_output(path, &rendered, cmd.overwrite)?;
            tracing::info!(path = %path.display(), "wrote output file");
        }
        None => {
            print!("{rendered}");
            tracing::info!(mode = "stdout", "wrote output");
        }
    }

    Ok(())
}

pub fn run_groups(cmd: GroupsCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("groups", input = %cmd.input.display());
    let _g = span.enter();

    let session = load_script(&cmd.input)?;
    log_timeline_summary(&session.timeline, cfg);

    let groups = session.groups();
    tracing::info!(groups = groups.len(), "grouped by speaker");

    let rendered = match cmd.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&group_views(&groups, &cfg.palette))? + "\n"
        }
        OutputFormat::Text => render_groups_text(&groups, &cfg.palette),
    };
    print!("{rendered}");

    Ok(())
}

pub fn run_locate(cmd: LocateCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("locate", input = %cmd.input.display());
    let _g = span.enter();

    let session = load_script(&cmd.input)?;
    log_timeline_summary(&session.timeline, cfg);

    let hits = cmd
        .at
        .iter()
        .map(|raw| {
            let t = parse_seconds_or_timestamp(raw)
                .with_context(|| format!("bad --at value: {raw}"))?;
            Ok(locate_at(&session.timeline.sentences, t))
        })
        .collect::<Result<Vec<_>>>()?;

    let rendered = match cmd.format {
        OutputFormat::Json => serde_json::to_string_pretty(&hits)? + "\n",
        OutputFormat::Text => hits.iter().map(LocateHit::to_line).collect::<String>(),
    };
    print!("{rendered}");

    Ok(())
}

pub fn run_replay(cmd: ReplayCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("replay");
    let _g = span.enter();

    let session = match &cmd.input {
        Some(path) => Session::load_local(path, cmd.media.as_deref())
            .with_context(|| format!("failed loading {}", path.display()))?,
        None => Session::load_default(&cfg.defaults)
            .with_context(|| format!("failed loading default resources; {MANUAL_LOAD_HINT}"))?,
    };
    log_timeline_summary(&session.timeline, cfg);

    let from = cmd
        .from
        .as_deref()
        .map(parse_seconds_or_timestamp)
        .transpose()?
        .unwrap_or(0.0);
    let to = cmd
        .to
        .as_deref()
        .map(parse_seconds_or_timestamp)
        .transpose()?
        .unwrap_or_else(|| session.timeline.duration());
    if to < from {
        return Err(anyhow!("--to ({to}) is before --from ({from})"));
    }

    tracing::info!(
        script = session.script_name.as_str(),
        media = session.media_name().as_deref().unwrap_or("-"),
        from,
        to,
        "replay starting"
    );

    let mut clock = ReplayClock::new(cmd.tick_hz.unwrap_or(cfg.replay.tick_hz));
    let mut player = Player::new(session);
    clock.seek(from);
    clock.play();

    let mut t = clock.position();
    let mut ticks = 0usize;
    let mut changes = 0usize;
    while t <= to && ticks < cfg.replay.max_ticks {
        let update = player.on_time_update(t);
        if update.changed {
            changes += 1;
            println!("{}", replay_line(player.session(), t, update.scroll_to.is_some(), &update));
        }
        ticks += 1;
        match clock.tick() {
            Some(next) => t = next,
            None => break,
        }
    }
    clock.pause();

    tracing::info!(ticks, changes, "replay finished");
    Ok(())
}

fn load_script(path: &Path) -> Result<Session> {
    Session::load_local(path, None).with_context(|| format!("failed loading {}", path.display()))
}

fn log_timeline_summary(t: &Timeline, cfg: &Config) {
    tracing::info!(
        source = ?t.source,
        sentences = t.len(),
        words = t.word_count(),
        duration = t.duration(),
        "timeline summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let n = cfg.logging.debug_unit_samples.min(t.len());
        for s in t.sentences.iter().take(n) {
            tracing::debug!(
                index = s.index,
                start = s.start,
                end = s.end,
                duration = s.duration(),
                words = s.words.len(),
                chars = s.content.chars().count(),
                "sentence sample"
            );
        }
    }
}

fn speaker_label(s: &Sentence) -> Option<String> {
    match (&s.speaker_name, &s.speaker) {
        (Some(name), _) => Some(name.clone()),
        (None, Some(id)) => Some(id.to_string()),
        (None, None) => None,
    }
}

fn render_timeline_text(t: &Timeline) -> String {
    let mut out = String::new();
    for s in &t.sentences {
        out.push_str(&format!("{} [{}]", s.index, format_range(s.start, s.end)));
        if let Some(label) = speaker_label(s) {
            out.push_str(&format!(" {label}:"));
        }
        out.push(' ');
        out.push_str(&s.content.replace('\n', " / "));
        out.push('\n');
    }
    out
}

#[derive(Debug, Serialize)]
struct GroupView<'a> {
    label: String,
    color: &'a str,
    #[serde(flatten)]
    group: &'a SpeakerGroup<'a>,
}

fn group_views<'a>(groups: &'a [SpeakerGroup<'a>], palette: &'a Palette) -> Vec<GroupView<'a>> {
    groups
        .iter()
        .enumerate()
        .map(|(i, g)| GroupView {
            label: g.label(i),
            color: palette.color_for(g.speaker_name, g.speaker, i),
            group: g,
        })
        .collect()
}

fn render_groups_text(groups: &[SpeakerGroup<'_>], palette: &Palette) -> String {
    let mut out = String::new();
    for view in group_views(groups, palette) {
        out.push_str(&format!(
            "== {} ({}) {} · {} sentence(s)\n",
            view.label,
            view.color,
            format_range(view.group.start(), view.group.end()),
            view.group.sentences.len()
        ));
        for s in view.group.sentences {
            out.push_str(&format!(
                "  {} {}\n",
                format_seconds(s.start),
                s.content.replace('\n', " / ")
            ));
        }
    }
    out
}

#[derive(Debug, Serialize)]
struct LocateHit {
    time: f64,
    sentence: Option<u32>,
    content: Option<String>,
    word: Option<String>,
}

impl LocateHit {
    fn to_line(&self) -> String {
        match (&self.sentence, &self.content) {
            (Some(index), Some(content)) => format!(
                "{} #{index} {}{}\n",
                format_seconds(self.time),
                self.word
                    .as_deref()
                    .map(|w| format!("[{}] ", w.trim()))
                    .unwrap_or_default(),
                content.replace('\n', " / ")
            ),
            _ => format!("{} -\n", format_seconds(self.time)),
        }
    }
}

fn locate_at(sentences: &[Sentence], t: f64) -> LocateHit {
    let sentence = locate(sentences, t).map(|i| &sentences[i]);
    let word = locate_word(sentences, t)
        .map(|pos| sentences[pos.sentence].words[pos.word].text.clone());
    LocateHit {
        time: t,
        sentence: sentence.map(|s| s.index),
        content: sentence.map(|s| s.content.clone()),
        word,
    }
}

fn replay_line(
    session: &Session,
    t: f64,
    scrolled: bool,
    update: &scriptsync::TickUpdate,
) -> String {
    let sentences = &session.timeline.sentences;
    let marker = if scrolled { ">" } else { " " };
    match update.highlight.sentence {
        Some(i) => {
            let s = &sentences[i];
            let word = update
                .highlight
                .word
                .map(|pos| sentences[pos.sentence].words[pos.word].text.trim().to_string())
                .unwrap_or_default();
            format!("{} {marker} #{} [{word}] {}", format_seconds(t), s.index, s.content.replace('\n', " / "))
        }
        None => format!("{}   -", format_seconds(t)),
    }
}

fn write_output(path: &Path, data: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(anyhow!(
            "refusing to overwrite existing file (pass --overwrite): {}",
            path.display()
        ));
    }
    fs::write(path, data)?;
    Ok(())
}
