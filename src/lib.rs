//! `timewipe`: remove timestamps from transcripts.
//!
//! This crate provides:
//! - A pure timestamp stripper (`[00:00]`, `00:00:00`, `0:00:00.000,`, `00:00 - `, ...)
//! - Subtitle-aware cleaning for SRT, WebVTT and SBV files
//! - File intake that accepts `.txt`, `.srt`, `.vtt` and `.sbv`
//! - Output encoders (plain text, JSON)
//!
//! The library is used by both the CLI and the HTTP server. The core transform never fails and
//! holds no state, so it can be called from any number of threads at once.

// High-level API (most consumers should start here).
pub mod opts;
pub mod timewipe;

// The timestamp stripper itself.
pub mod strip;

// Input formats and subtitle cue removal.
pub mod input_format;
pub mod subtitle;

// Output selection and encoder interfaces.
pub mod cleaned_encoder;
pub mod output_type;

// Output encoders that serialize cleaned transcripts.
pub mod json_array_encoder;
pub mod text_encoder;

// Logging configuration.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use error::{Error, Result};
pub use input_format::InputFormat;
pub use opts::Opts;
pub use output_type::OutputType;
pub use strip::{Cleaned, clean, strip_timestamps};
pub use timewipe::{clean_file, clean_reader, clean_text, clean_to_writer, write_all};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
