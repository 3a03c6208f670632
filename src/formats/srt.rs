use crate::{
    formats::time::parse_time_range,
    model::{Sentence, SourceFormat, Timeline},
};

/// Parse an SRT-like timed script into a timeline.
///
/// Blocks are separated by blank lines and must look like `index`, a
/// `<time> --> <time>` line, then at least one line of text. Anything else is
/// skipped; a document with no valid block yields an empty timeline.
pub fn parse_script(input: &str) -> Timeline {
    let normalized = input.trim_start_matches('\u{feff}').replace("\r\n", "\n");

    let sentences: Vec<Sentence> = normalized
        .split("\n\n")
        .enumerate()
        .filter_map(|(block_no, block)| {
            let parsed = parse_block(block);
            if parsed.is_none() && !block.trim().is_empty() {
                tracing::debug!(block = block_no, "dropping invalid script block");
            }
            parsed
        })
        .collect();

    Timeline::new(SourceFormat::Script, sentences)
}

fn parse_block(block: &str) -> Option<Sentence> {
    let lines: Vec<&str> = block
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 3 {
        return None;
    }

    let (start, end) = parse_time_range(lines[1]).ok()?;
    let index = lines[0].parse::<u32>().ok()?;

    Some(Sentence {
        index,
        start,
        end,
        content: lines[2..].join("\n"),
        speaker: None,
        speaker_name: None,
        raw_time: lines[1].to_string(),
        words: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_blocks() {
        let input = "1\n00:00:01,000 --> 00:00:02,500\nHello world\n\n2\n00:00:03,000 --> 00:00:04,000\nBye";
        let t = parse_script(input);
        assert_eq!(t.source, SourceFormat::Script);
        assert_eq!(t.len(), 2);

        let a = &t.sentences[0];
        assert_eq!(a.index, 1);
        assert_eq!(a.start, 1.0);
        assert_eq!(a.end, 2.5);
        assert_eq!(a.content, "Hello world");
        assert_eq!(a.raw_time, "00:00:01,000 --> 00:00:02,500");
        assert!(a.words.is_empty());
        assert!(a.speaker.is_none());

        let b = &t.sentences[1];
        assert_eq!((b.index, b.start, b.end), (2, 3.0, 4.0));
        assert_eq!(b.content, "Bye");
    }

    #[test]
    fn crlf_and_multiline_content() {
        let input = "7\r\n00:00:01.000 --> 00:00:02.000\r\nfirst line\r\n  second line  \r\n";
        let t = parse_script(input);
        assert_eq!(t.len(), 1);
        assert_eq!(t.sentences[0].index, 7);
        assert_eq!(t.sentences[0].content, "first line\nsecond line");
    }

    #[test]
    fn malformed_block_is_dropped_and_indices_kept() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\
                     2\nno arrow here\nB\n\n\
                     3\n00:00:05,000 --> 00:00:06,000\nC";
        let t = parse_script(input);
        let indices: Vec<u32> = t.sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(t.sentences[1].content, "C");
    }

    #[test]
    fn unparseable_index_drops_block() {
        let input = "one\n00:00:01,000 --> 00:00:02,000\nA\n\n2\n00:00:03,000 --> 00:00:04,000\nB";
        let t = parse_script(input);
        assert_eq!(t.len(), 1);
        assert_eq!(t.sentences[0].index, 2);
    }

    #[test]
    fn block_without_content_is_dropped() {
        let t = parse_script("1\n00:00:01,000 --> 00:00:02,000\n");
        assert!(t.is_empty());
    }

    #[test]
    fn vtt_header_and_garbage_yield_empty_not_error() {
        assert!(parse_script("WEBVTT").is_empty());
        assert!(parse_script("").is_empty());
        assert!(parse_script("just some prose\nwithout timing").is_empty());
    }

    #[test]
    fn leading_bom_is_ignored() {
        let t = parse_script("\u{feff}1\n00:00:01,000 --> 00:00:02,000\nA");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn reparse_is_identical() {
        let input = "1\n00:00:01,000 --> 00:00:02,500\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nBye";
        assert_eq!(parse_script(input), parse_script(input));
    }
}
