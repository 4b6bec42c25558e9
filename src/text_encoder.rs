use std::io::Write;

use crate::Result;
use crate::cleaned_encoder::CleanedEncoder;
use crate::strip::Cleaned;

/// A `CleanedEncoder` that writes cleaned text verbatim.
///
/// When several transcripts go through one encoder, each one starts on a fresh line: if the
/// previous text didn't end with a newline, we add one before the next.
pub struct TextEncoder<W: Write> {
    w: W,

    /// Whether the last byte we wrote was something other than `\n`.
    needs_newline: bool,

    closed: bool,
}

impl<W: Write> TextEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            needs_newline: false,
            closed: false,
        }
    }
}

impl<W: Write> CleanedEncoder for TextEncoder<W> {
    fn write_cleaned(&mut self, cleaned: &Cleaned) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write transcript: encoder is already closed",
            ));
        }

        if cleaned.text.is_empty() {
            return Ok(());
        }

        if self.needs_newline {
            self.w.write_all(b"\n")?;
        }

        self.w.write_all(cleaned.text.as_bytes())?;
        self.needs_newline = !cleaned.text.ends_with('\n');

        self.w.flush()?;
        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(text: &str) -> Cleaned {
        Cleaned {
            text: text.to_string(),
            characters_processed: text.chars().count(),
            timestamps_removed: 0,
        }
    }

    #[test]
    fn text_close_without_results_emits_nothing() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "");
        Ok(())
    }

    #[test]
    fn text_writes_single_result_verbatim() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        enc.write_cleaned(&cleaned("  Hello World"))?;
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "  Hello World");
        Ok(())
    }

    #[test]
    fn text_separates_results_with_a_single_newline() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        enc.write_cleaned(&cleaned("first"))?;
        enc.write_cleaned(&cleaned("second\n"))?;
        enc.write_cleaned(&cleaned(""))?;
        enc.write_cleaned(&cleaned("third"))?;
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "first\nsecond\nthird");
        Ok(())
    }

    #[test]
    fn text_write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        enc.close()?;
        let err = enc.write_cleaned(&cleaned("nope")).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
