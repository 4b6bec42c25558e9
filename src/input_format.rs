use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::subtitle::{is_sbv_timing_line, is_timing_line, is_vtt_document};
use crate::{Error, Result};

/// The kinds of transcript input we accept.
///
/// Subtitle formats (`Srt`, `Vtt`, `Sbv`) get their cue structure removed before timestamps are
/// stripped; `Text` goes straight to the stripper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum InputFormat {
    /// Plain text (`.txt`).
    Text,

    /// SubRip subtitles (`.srt`).
    Srt,

    /// WebVTT subtitles (`.vtt`).
    Vtt,

    /// YouTube SubViewer captions (`.sbv`).
    Sbv,
}

impl InputFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "srt" => Some(Self::Srt),
            "vtt" => Some(Self::Vtt),
            "sbv" => Some(Self::Sbv),
            _ => None,
        }
    }

    /// Pick the format for a transcript file by its extension.
    ///
    /// Files we don't accept are rejected here, before anything is read.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| Error::UnsupportedFile {
                name: path.display().to_string(),
            })
    }

    /// Guess the format from content, for callers that didn't name one.
    pub fn detect(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        if is_vtt_document(text) {
            return Self::Vtt;
        }

        if text.lines().any(is_timing_line) {
            return Self::Srt;
        }

        if text.lines().any(is_sbv_timing_line) {
            return Self::Sbv;
        }

        Self::Text
    }

    /// Whether this format carries cue structure (sequence numbers, timing lines).
    pub fn is_subtitle(self) -> bool {
        !matches!(self, Self::Text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Sbv => "sbv",
        }
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "sbv" => Ok(Self::Sbv),
            other => Err(Error::UnknownFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
