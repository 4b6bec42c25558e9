//! The timestamp stripper.
//!
//! A timestamp token is 1-2 digits, `:`, 2 digits, optionally `:` and 2 more digits, and
//! optionally `.` followed by 1-3 digits (`0:05`, `00:00:00`, `0:00:00.000`).
//!
//! Five forms are removed, and where two could claim the same token the earlier one wins:
//! 1. bracketed (`[00:00]`)
//! 2. comma-terminated (`0:00:00.000,`)
//! 3. dash-separated (`00:00 - `)
//! 4. line-leading (`00:25 Some text`)
//! 5. standalone after whitespace (`said 12:30 then`)
//!
//! Forms 1-3 take their delimiters with them. Forms 2 and 3 skip tokens glued to a preceding
//! letter, digit or colon, and forms 4 and 5 need boundary context on both sides of the token,
//! so numbers inside words (`12:30pm`, `v2:15-beta`, `123:45,`) are left alone.
//!
//! The input is scanned once, left to right. Kept text goes onto an output stack and every
//! form is recognized as a suffix of that stack, so removing one token can expose another
//! (`[[0:00]0:00]`, `[1:00,2:00]`) and the exposed one goes in the same scan. Nothing
//! removable survives, which makes the transform idempotent, and the work stays linear in the
//! input.

use serde::Serialize;

/// The result of cleaning one transcript.
///
/// Serializes to the same shape the HTTP API returns for a single text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cleaned {
    #[serde(rename = "cleaned_text")]
    pub text: String,

    /// Number of characters (Unicode scalar values) in the input.
    pub characters_processed: usize,

    /// Number of timestamp tokens deleted.
    pub timestamps_removed: usize,
}

/// Remove every recognized timestamp token from `input`.
///
/// This is total over strings: empty input yields an empty string and text without any
/// timestamp-shaped substring comes back unchanged.
pub fn strip_timestamps(input: &str) -> String {
    clean(input).text
}

/// Like [`strip_timestamps`], but also reports how much work was done.
pub fn clean(input: &str) -> Cleaned {
    let mut scanner = Scanner::with_capacity(input.len());
    for c in input.chars() {
        scanner.feed(c);
    }
    let (text, timestamps_removed) = scanner.finish();

    Cleaned {
        text,
        characters_processed: input.chars().count(),
        timestamps_removed,
    }
}

/// A bare (undelimited) token and how it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bare {
    /// Only blanks before it on its line. The blanks after it go too.
    LineLeading,
    /// Right after whitespace. Whitespace on both sides stays.
    Standalone,
}

/// Input dropped right after a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Nothing,
    /// Spaces and tabs, after a bracketed token that followed whitespace.
    Blanks,
    /// Any whitespace, line breaks included, after the dash form.
    Whitespace,
}

struct Scanner {
    out: String,

    /// Byte offsets in `out` of every char that is not a space or tab.
    nonblank: Vec<usize>,

    /// Byte offsets in `out` of every non-whitespace char.
    solid: Vec<usize>,

    /// A bare token ending `out` whose fate depends on the first visible char after the
    /// whitespace in `held`: a dash makes it the dash form, anything else a bare removal.
    pending: Option<(Bare, usize)>,
    held: String,

    skip: Skip,
    removed: usize,
}

impl Scanner {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            nonblank: Vec::new(),
            solid: Vec::new(),
            pending: None,
            held: String::new(),
            skip: Skip::Nothing,
            removed: 0,
        }
    }

    fn feed(&mut self, c: char) {
        match self.skip {
            Skip::Blanks if is_blank(c) => return,
            Skip::Whitespace if c.is_whitespace() => return,
            _ => self.skip = Skip::Nothing,
        }

        if let Some((bare, start)) = self.pending {
            if c.is_whitespace() {
                self.held.push(c);
                return;
            }

            self.pending = None;
            if c == '-' {
                self.held.clear();
                self.remove_tail(start);
                self.skip = Skip::Whitespace;
                return;
            }
            self.remove_bare(bare, start);
        } else if c.is_whitespace() {
            if let Some(token) = self.bare_token() {
                self.pending = Some(token);
                self.held.push(c);
                return;
            }
        }

        self.push(c);
        match c {
            ']' => self.close_bracket(),
            ',' => self.close_comma(),
            '-' => self.close_dash(),
            _ => {}
        }
    }

    fn finish(mut self) -> (String, usize) {
        if let Some((bare, start)) = self.pending.take().or_else(|| self.bare_token()) {
            self.remove_bare(bare, start);
        }
        (self.out, self.removed)
    }

    fn push(&mut self, c: char) {
        let at = self.out.len();
        if !is_blank(c) {
            self.nonblank.push(at);
        }
        if !c.is_whitespace() {
            self.solid.push(at);
        }
        self.out.push(c);
    }

    /// Drop `out[start..]` as one removed token.
    fn remove_tail(&mut self, start: usize) {
        self.out.truncate(start);
        truncate_offsets(&mut self.nonblank, start);
        truncate_offsets(&mut self.solid, start);
        self.removed += 1;
    }

    fn remove_bare(&mut self, bare: Bare, start: usize) {
        self.remove_tail(start);

        let held = std::mem::take(&mut self.held);
        let kept = match bare {
            Bare::LineLeading => held.trim_start_matches(is_blank),
            Bare::Standalone => held.as_str(),
        };
        for c in kept.chars() {
            self.push(c);
        }
    }

    /// The bare token ending `out`, if its left context allows removing it.
    fn bare_token(&self) -> Option<(Bare, usize)> {
        let start = token_starts(self.out.as_bytes()).next()?;
        if self.at_line_start(start) {
            Some((Bare::LineLeading, start))
        } else if self.char_before(start).is_some_and(char::is_whitespace) {
            Some((Bare::Standalone, start))
        } else {
            None
        }
    }

    /// `out` just grew a `]`.
    fn close_bracket(&mut self) {
        let bytes = self.out.as_bytes();
        let close = bytes.len() - 1;
        let Some(open) = token_starts(&bytes[..close])
            .filter_map(|start| start.checked_sub(1))
            .find(|&open| bytes[open] == b'[')
        else {
            return;
        };

        let after_separator = self.char_before(open).is_none_or(char::is_whitespace);
        self.remove_tail(open);
        if after_separator {
            self.skip = Skip::Blanks;
        }
    }

    /// `out` just grew a `,`.
    fn close_comma(&mut self) {
        let comma = self.out.len() - 1;
        if let Some(start) = self.glued_token_start(comma) {
            self.remove_tail(start);
        }
    }

    /// `out` just grew a `-`. Only whitespace may sit between the token and the dash.
    fn close_dash(&mut self) {
        let gap_start = match self.solid.iter().rev().nth(1) {
            Some(&at) => at + self.out[at..].chars().next().map_or(0, char::len_utf8),
            None => 0,
        };
        if let Some(start) = self.glued_token_start(gap_start) {
            self.remove_tail(start);
            self.skip = Skip::Whitespace;
        }
    }

    /// Start of the token ending at `end`, unless it is glued to a preceding letter, digit or
    /// colon.
    fn glued_token_start(&self, end: usize) -> Option<usize> {
        let start = token_starts(&self.out.as_bytes()[..end]).next()?;
        let glued = self
            .char_before(start)
            .is_some_and(|c| c.is_alphanumeric() || c == ':');
        (!glued).then_some(start)
    }

    /// True when only spaces and tabs separate `at` from the start of its line.
    fn at_line_start(&self, at: usize) -> bool {
        let before = self.nonblank.partition_point(|&offset| offset < at);
        match before.checked_sub(1) {
            None => true,
            Some(i) => self.out.as_bytes()[self.nonblank[i]] == b'\n',
        }
    }

    fn char_before(&self, at: usize) -> Option<char> {
        self.out[..at].chars().next_back()
    }
}

fn truncate_offsets(offsets: &mut Vec<usize>, len: usize) {
    while offsets.last().is_some_and(|&at| at >= len) {
        offsets.pop();
    }
}

/// Start offsets of every timestamp token that ends `head`, longest first.
///
/// Token chars are ASCII, so this works on bytes; a multi-byte char never matches.
fn token_starts(head: &[u8]) -> impl Iterator<Item = usize> {
    let digit = |i: usize| head.get(i).is_some_and(u8::is_ascii_digit);
    let colon = |i: usize| head.get(i) == Some(&b':');
    let pair = |end: usize| end >= 2 && digit(end - 2) && digit(end - 1);
    let hours = |end: usize| {
        [
            pair(end).then(|| end - 2),
            (end >= 1 && digit(end - 1)).then(|| end - 1),
        ]
    };

    let len = head.len();
    let fraction = head
        .iter()
        .rev()
        .take(4)
        .take_while(|b| b.is_ascii_digit())
        .count();
    let body_end = if (1..=3).contains(&fraction) && len > fraction && head[len - fraction - 1] == b'.'
    {
        len - fraction - 1
    } else {
        len
    };

    let mut starts = [None; 4];
    if pair(body_end) && body_end >= 3 && colon(body_end - 3) {
        let minutes = body_end - 3;
        if pair(minutes) && minutes >= 3 && colon(minutes - 3) {
            let [two, one] = hours(minutes - 3);
            starts[0] = two;
            starts[1] = one;
        }
        let [two, one] = hours(minutes);
        starts[2] = two;
        starts[3] = one;
    }
    starts.into_iter().flatten()
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}
