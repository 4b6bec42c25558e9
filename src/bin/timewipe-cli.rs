use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use timewipe::{InputFormat, Opts, OutputType, clean_file, clean_to_writer, write_all};

fn main() {
    timewipe::init_logging();

    if let Err(err) = run() {
        error!(error = ?err, "timewipe-cli failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(name = "timewipe")]
#[command(about = "Remove timestamps from transcripts and subtitle files")]
struct Params {
    /// Transcript files (.txt, .srt, .vtt, .sbv). Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Input format. Defaults to the file extension, or content detection for stdin.
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<InputFormat>,

    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::Text
    )]
    output_type: OutputType,

    /// Keep subtitle sequence numbers and cue timing lines; only strip timestamps.
    #[arg(long = "keep-cues", default_value_t = false)]
    keep_cues: bool,
}

fn run() -> Result<()> {
    let params = Params::parse();

    let opts = Opts {
        input_format: params.format,
        strip_cues: !params.keep_cues,
    };

    let stdout = io::stdout();

    if params.files.is_empty() {
        let stdin = io::stdin();
        let cleaned = clean_to_writer(stdin.lock(), stdout.lock(), &opts, params.output_type)
            .context("failed to clean stdin")?;
        info!(
            timestamps_removed = cleaned.timestamps_removed,
            "cleaned stdin"
        );
        return Ok(());
    }

    // Reject unsupported files up front so we never write partial output for a bad batch.
    for path in &params.files {
        InputFormat::from_path(path)?;
    }

    let results = params.files.iter().map(|path| {
        clean_file(path, &opts).map_err(|err| {
            timewipe::Error::Message(format!("{}: {err}", path.display()))
        })
    });

    write_all(results, stdout.lock(), params.output_type).context("failed to clean files")?;
    info!(files = params.files.len(), "cleaned files");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_to_text_output_and_stdin() {
        let params = Params::parse_from(["timewipe"]);
        assert!(params.files.is_empty());
        assert_eq!(params.output_type, OutputType::Text);
        assert_eq!(params.format, None);
        assert!(!params.keep_cues);
    }

    #[test]
    fn params_accept_format_and_output_flags() {
        let params = Params::parse_from([
            "timewipe",
            "-f",
            "srt",
            "-o",
            "json",
            "--keep-cues",
            "a.srt",
            "b.txt",
        ]);
        assert_eq!(params.format, Some(InputFormat::Srt));
        assert_eq!(params.output_type, OutputType::Json);
        assert!(params.keep_cues);
        assert_eq!(params.files.len(), 2);
    }

    #[test]
    fn params_reject_unknown_output_type() {
        assert!(Params::try_parse_from(["timewipe", "-o", "vtt"]).is_err());
    }
}
