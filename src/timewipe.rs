//! High-level API for cleaning transcripts.
//!
//! The pure transform lives in [`crate::strip`]. This module wires the pieces around it:
//! reading input → (optional) subtitle cue removal → timestamp stripping → encoding output.
//!
//! Callers choose behavior via [`Opts`]; nothing here holds state between calls, so every
//! function is safe to call concurrently.

use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::Result;
use crate::cleaned_encoder::CleanedEncoder;
use crate::input_format::InputFormat;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::opts::Opts;
use crate::output_type::OutputType;
use crate::strip::{Cleaned, clean};
use crate::subtitle::strip_cues;
use crate::text_encoder::TextEncoder;

/// Clean one transcript held in memory.
///
/// Subtitle input first loses its cue structure (when `opts.strip_cues` is set), then every
/// remaining timestamp is stripped. Counts from both passes are summed;
/// `characters_processed` always refers to `text` as given.
pub fn clean_text(text: &str, opts: &Opts) -> Cleaned {
    let format = opts.format_for(text);

    let cleaned = if opts.strip_cues && format.is_subtitle() {
        let structural = strip_cues(text, format);
        let stripped = clean(&structural.text);
        Cleaned {
            text: stripped.text,
            characters_processed: structural.characters_processed,
            timestamps_removed: structural.timestamps_removed + stripped.timestamps_removed,
        }
    } else {
        clean(text)
    };

    debug!(
        %format,
        characters_processed = cleaned.characters_processed,
        timestamps_removed = cleaned.timestamps_removed,
        "cleaned transcript"
    );

    cleaned
}

/// Read a whole transcript from `r` and clean it.
///
/// We accept any `Read` rather than a filename so callers can pass files, stdin, or request
/// bodies. Input must be UTF-8.
pub fn clean_reader<R: Read>(mut r: R, opts: &Opts) -> Result<Cleaned> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes)?;
    Ok(clean_text(&text, opts))
}

/// Clean a transcript file.
///
/// The extension must be one we accept (`.txt`, `.srt`, `.vtt`, `.sbv`); anything else is
/// rejected before the file is opened. The extension also picks the input format unless
/// `opts.input_format` is already set.
pub fn clean_file(path: impl AsRef<Path>, opts: &Opts) -> Result<Cleaned> {
    let path = path.as_ref();
    let from_extension = InputFormat::from_path(path)?;

    let opts = Opts {
        input_format: opts.input_format.or(Some(from_extension)),
        ..opts.clone()
    };

    debug!(path = %path.display(), format = ?opts.input_format, "reading transcript file");
    let file = std::fs::File::open(path)?;
    clean_reader(file, &opts)
}

/// Clean one transcript from `r` and write it to `w` in the requested output format.
pub fn clean_to_writer<R, W>(r: R, w: W, opts: &Opts, output_type: OutputType) -> Result<Cleaned>
where
    R: Read,
    W: Write,
{
    let cleaned = clean_reader(r, opts)?;
    write_all(std::iter::once(Ok(cleaned.clone())), w, output_type)?;
    Ok(cleaned)
}

/// Stream a sequence of results into `w` through the encoder for `output_type`.
///
/// Results are pulled lazily, so a batch can be cleaned and written one transcript at a time.
/// The first error stops the batch; the encoder is still closed so whatever was written stays
/// well-formed where the format allows it.
pub fn write_all<I, W>(results: I, w: W, output_type: OutputType) -> Result<()>
where
    I: IntoIterator<Item = Result<Cleaned>>,
    W: Write,
{
    let writer = BufWriter::new(w);

    // We keep this explicit (no trait objects) so each encoder is monomorphized.
    match output_type {
        OutputType::Text => {
            let mut encoder = TextEncoder::new(writer);
            let run_res = encode_each(results, &mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
        OutputType::Json => {
            let mut encoder = JsonArrayEncoder::new(writer);
            let run_res = encode_each(results, &mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
    }
}

fn encode_each<I, E>(results: I, encoder: &mut E) -> Result<()>
where
    I: IntoIterator<Item = Result<Cleaned>>,
    E: CleanedEncoder,
{
    for result in results {
        encoder.write_cleaned(&result?)?;
    }
    Ok(())
}

fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), _) => Err(err),
    }
}
