//! Cue-structure removal for subtitle files.
//!
//! The timestamp rules alone leave debris behind on real subtitle files
//! (`00:00:01,000 --> 00:00:04,000` would clean down to `000 --> 000`), so subtitle input goes
//! through this pass first. It drops whole structural lines:
//! - SRT: sequence numbers and cue timing lines
//! - VTT: the `WEBVTT` header block, `NOTE`/`STYLE`/`REGION` blocks, cue identifiers, timing lines
//! - SBV: `H:MM:SS.mmm,H:MM:SS.mmm` timing lines
//!
//! What remains is the cue text, one cue after another with the blank separators dropped.
//! Line endings in the output are `\n`.

use std::sync::LazyLock;

use regex::Regex;

use crate::input_format::InputFormat;
use crate::strip::Cleaned;

/// SRT/VTT timing line. Hours are optional (VTT), `,` or `.` before the milliseconds, and cue
/// settings may follow the end time.
static TIMING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+:)?\d{2}:\d{2}[,.]\d{3}\s*-->\s*(?:\d+:)?\d{2}:\d{2}[,.]\d{3}(?:\s.*)?$")
        .expect("timing pattern must be valid")
});

static SBV_TIMING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d{1,2}:\d{2}:\d{2}\.\d{3},\d{1,2}:\d{2}:\d{2}\.\d{3}\s*$")
        .expect("timing pattern must be valid")
});

/// Timestamps per dropped timing line (start and end).
const TIMESTAMPS_PER_TIMING_LINE: usize = 2;

pub(crate) fn is_timing_line(line: &str) -> bool {
    TIMING_LINE.is_match(line)
}

pub(crate) fn is_sbv_timing_line(line: &str) -> bool {
    SBV_TIMING_LINE.is_match(line)
}

/// Drop cue structure from subtitle input.
///
/// `InputFormat::Text` is passed through untouched. Only structural lines are removed here;
/// timestamps embedded in cue text are left for the stripper.
pub fn strip_cues(input: &str, format: InputFormat) -> Cleaned {
    let characters_processed = input.chars().count();
    if !format.is_subtitle() {
        return Cleaned {
            text: input.to_owned(),
            characters_processed,
            timestamps_removed: 0,
        };
    }

    let body = input.strip_prefix('\u{feff}').unwrap_or(input);
    let is_timing = |line: &str| match format {
        InputFormat::Sbv => is_sbv_timing_line(line),
        _ => is_timing_line(line),
    };

    let mut kept = Vec::new();
    let mut timestamps_removed = 0;

    for (index, block) in blocks(body).iter().enumerate() {
        let mut lines = block.as_slice();
        if format == InputFormat::Vtt {
            if index == 0 && lines.first().is_some_and(|&head| is_vtt_header(head)) {
                // A header glued to the first cue loses only its own line.
                if !lines.iter().any(|&line| is_timing_line(line)) {
                    continue;
                }
                lines = &lines[1..];
            } else if is_vtt_comment_block(lines) {
                continue;
            }
        }

        for (i, &line) in lines.iter().enumerate() {
            if is_timing(line) {
                timestamps_removed += TIMESTAMPS_PER_TIMING_LINE;
                continue;
            }

            let precedes_timing = lines.get(i + 1).is_some_and(|&next| is_timing(next));
            if precedes_timing && is_cue_identifier(line, format) {
                continue;
            }

            kept.push(line);
        }
    }

    let mut text = kept.join("\n");
    if !text.is_empty() && body.ends_with('\n') {
        text.push('\n');
    }

    Cleaned {
        text,
        characters_processed,
        timestamps_removed,
    }
}

/// Split into runs of non-blank lines.
fn blocks(body: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in body.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn is_vtt_comment_block(block: &[&str]) -> bool {
    let Some(head) = block.first().map(|line| line.trim_start()) else {
        return false;
    };

    ["NOTE", "STYLE", "REGION"]
        .into_iter()
        .any(|keyword| keyword_line(head, keyword))
}

/// `keyword` alone on the line or followed by whitespace.
fn keyword_line(line: &str, keyword: &str) -> bool {
    line.strip_prefix(keyword)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// The `WEBVTT` signature line.
fn is_vtt_header(line: &str) -> bool {
    keyword_line(line.trim_start(), "WEBVTT")
}

/// Whether `text` is laid out as a WebVTT file: a signature line, a header block closed by a
/// blank line, and at least one cue timing line after it.
pub(crate) fn is_vtt_document(text: &str) -> bool {
    let mut lines = text.lines().skip_while(|line| line.trim().is_empty());
    if !lines.next().is_some_and(is_vtt_header) {
        return false;
    }

    lines
        .skip_while(|line| !line.trim().is_empty())
        .any(is_timing_line)
}

fn is_cue_identifier(line: &str, format: InputFormat) -> bool {
    match format {
        InputFormat::Srt => {
            let line = line.trim();
            !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
        }
        InputFormat::Vtt => true,
        InputFormat::Sbv | InputFormat::Text => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\n\
00:00:01,000 --> 00:00:04,000\n\
Welcome to the show.\n\
\n\
2\n\
00:00:05,000 --> 00:00:08,500\n\
Today we talk about Rust.\n\
Two lines in this cue.\n";

    #[test]
    fn srt_loses_sequence_numbers_and_timing_lines() {
        let cleaned = strip_cues(SRT, InputFormat::Srt);
        assert_eq!(
            cleaned.text,
            "Welcome to the show.\nToday we talk about Rust.\nTwo lines in this cue.\n"
        );
        assert_eq!(cleaned.timestamps_removed, 4);
        assert_eq!(cleaned.characters_processed, SRT.chars().count());
    }

    #[test]
    fn srt_keeps_numbers_that_are_cue_text() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\n42\n";
        assert_eq!(strip_cues(srt, InputFormat::Srt).text, "42\n");
    }

    #[test]
    fn vtt_drops_header_notes_and_identifiers() {
        let vtt = "WEBVTT - Episode 1\nKind: captions\n\n\
NOTE This is a comment\nspanning two lines\n\n\
STYLE\n::cue { color: yellow }\n\n\
intro\n00:01.000 --> 00:04.000 align:start position:10%\nHello there.\n\n\
00:00:05.000 --> 00:00:06.000\nGeneral Kenobi.\n";

        let cleaned = strip_cues(vtt, InputFormat::Vtt);
        assert_eq!(cleaned.text, "Hello there.\nGeneral Kenobi.\n");
        assert_eq!(cleaned.timestamps_removed, 4);
    }

    #[test]
    fn vtt_header_glued_to_a_cue_keeps_the_cue() {
        let vtt = "WEBVTT\n00:01.000 --> 00:02.000\nHi\n";
        let cleaned = strip_cues(vtt, InputFormat::Vtt);
        assert_eq!(cleaned.text, "Hi\n");
        assert_eq!(cleaned.timestamps_removed, 2);
    }

    #[test]
    fn vtt_document_needs_signature_header_block_and_cues() {
        assert!(is_vtt_document("WEBVTT\n\n00:01.000 --> 00:02.000\nHi\n"));
        assert!(is_vtt_document("\nWEBVTT - Title\nKind: captions\n\n00:01.000 --> 00:02.000\nHi"));
        assert!(!is_vtt_document("WEBVTT is the caption format we use.\nAt 00:05 we start.\n"));
        assert!(!is_vtt_document("WEBVTTX\n\n00:01.000 --> 00:02.000\nHi\n"));
        assert!(!is_vtt_document("WEBVTT\n\nno cues here\n"));
        assert!(!is_vtt_document("WEBVTT\n00:01.000 --> 00:02.000\nHi\n"));
    }

    #[test]
    fn vtt_with_byte_order_mark_is_handled() {
        let vtt = "\u{feff}WEBVTT\n\n00:01.000 --> 00:02.000\nHi\n";
        assert_eq!(strip_cues(vtt, InputFormat::Vtt).text, "Hi\n");
    }

    #[test]
    fn sbv_drops_timing_lines() {
        let sbv = "0:00:00.599,0:00:04.160\nfirst caption\n\n0:00:04.160,0:00:06.770\nsecond caption\n";
        let cleaned = strip_cues(sbv, InputFormat::Sbv);
        assert_eq!(cleaned.text, "first caption\nsecond caption\n");
        assert_eq!(cleaned.timestamps_removed, 4);
    }

    #[test]
    fn crlf_input_is_normalized() {
        let srt = "1\r\n00:00:01,000 --> 00:00:02,000\r\nHi\r\n\r\n";
        assert_eq!(strip_cues(srt, InputFormat::Srt).text, "Hi\n");
    }

    #[test]
    fn text_format_is_passed_through() {
        let cleaned = strip_cues(SRT, InputFormat::Text);
        assert_eq!(cleaned.text, SRT);
        assert_eq!(cleaned.timestamps_removed, 0);
    }

    #[test]
    fn timing_line_matcher_accepts_common_shapes() {
        assert!(is_timing_line("00:00:01,000 --> 00:00:04,000"));
        assert!(is_timing_line("00:01.000 --> 00:04.000 line:0"));
        assert!(is_timing_line("01:00:01.000-->01:00:04.000"));
        assert!(!is_timing_line("00:00:01 --> 00:00:04"));
        assert!(!is_timing_line("see 00:00:01,000 --> 00:00:04,000"));
        assert!(is_sbv_timing_line("0:00:00.599,0:00:04.160"));
        assert!(!is_sbv_timing_line("0:00:00.599, 0:00:04.160 text"));
    }
}
