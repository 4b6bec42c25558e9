use crate::input_format::InputFormat;

/// Options that control how a transcript is cleaned.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI and the HTTP server map their own inputs into this type so that
/// other frontends (tests, batch jobs) can construct options programmatically.
#[derive(Debug, Clone)]
pub struct Opts {
    /// The format of the input.
    ///
    /// When `None`, we sniff the content with [`InputFormat::detect`]. File-based entry points
    /// fill this from the file extension unless the caller already set it.
    pub input_format: Option<InputFormat>,

    /// Whether to drop subtitle cue structure (sequence numbers, timing lines, VTT headers)
    /// before stripping timestamps.
    ///
    /// Has no effect on `InputFormat::Text`.
    pub strip_cues: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            input_format: None,
            strip_cues: true,
        }
    }
}

impl Opts {
    /// Resolve the effective format for `text`.
    pub fn format_for(&self, text: &str) -> InputFormat {
        self.input_format
            .unwrap_or_else(|| InputFormat::detect(text))
    }
}
