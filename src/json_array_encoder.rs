use std::io::Write;

use crate::Result;
use crate::cleaned_encoder::CleanedEncoder;
use crate::strip::Cleaned;

/// Streams results as one JSON array, one element per line:
///
/// ```json
/// [
/// {"cleaned_text":"Hello World","characters_processed":27,"timestamps_removed":2},
/// {"cleaned_text":"Intro text","characters_processed":18,"timestamps_removed":1}
/// ]
/// ```
///
/// Each element is written and flushed as soon as it arrives, so a batch never has to be held
/// in memory and a reader on a pipe sees progress. An encoder closed before any element still
/// writes a valid `[]`.
pub struct JsonArrayEncoder<W: Write> {
    w: W,
    state: ArrayState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// Nothing written yet.
    Unopened,
    /// `[` written, followed by this many elements.
    Open(usize),
    Closed,
}

impl<W: Write> JsonArrayEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            state: ArrayState::Unopened,
        }
    }
}

impl<W: Write> CleanedEncoder for JsonArrayEncoder<W> {
    fn write_cleaned(&mut self, cleaned: &Cleaned) -> Result<()> {
        let written = match self.state {
            ArrayState::Closed => {
                return Err(crate::Error::msg(
                    "cannot write transcript: JSON array is already closed",
                ));
            }
            ArrayState::Unopened => {
                self.w.write_all(b"[\n")?;
                0
            }
            ArrayState::Open(written) => {
                self.w.write_all(b",\n")?;
                written
            }
        };

        serde_json::to_writer(&mut self.w, cleaned)?;
        self.state = ArrayState::Open(written + 1);
        self.w.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let tail: &[u8] = match self.state {
            ArrayState::Closed => return Ok(()),
            ArrayState::Unopened => b"[]\n",
            ArrayState::Open(_) => b"\n]\n",
        };

        self.w.write_all(tail)?;
        self.w.flush()?;
        self.state = ArrayState::Closed;
        Ok(())
    }
}
