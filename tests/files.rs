use std::fs;

use timewipe::{Error, InputFormat, Opts, OutputType, clean_file, write_all};

const SRT: &str = "1
00:00:01,000 --> 00:00:04,000
[00:01] Welcome to the show.

2
00:00:05,000 --> 00:00:08,000
Let's get started.
";

const VTT: &str = "WEBVTT

NOTE generated by a captioning tool

00:00.000 --> 00:03.500
Welcome to the show.

intro-2
00:03.500 --> 00:06.000 align:start
Let's get started.
";

#[test]
fn srt_file_is_cleaned_to_plain_lines() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("episode.srt");
    fs::write(&path, SRT)?;

    let cleaned = clean_file(&path, &Opts::default())?;
    assert_eq!(cleaned.text, "Welcome to the show.\nLet's get started.\n");
    assert_eq!(cleaned.timestamps_removed, 5);
    Ok(())
}

#[test]
fn vtt_file_is_cleaned_to_plain_lines() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("episode.VTT");
    fs::write(&path, VTT)?;

    let cleaned = clean_file(&path, &Opts::default())?;
    assert_eq!(cleaned.text, "Welcome to the show.\nLet's get started.\n");
    assert_eq!(cleaned.timestamps_removed, 4);
    Ok(())
}

#[test]
fn txt_extension_skips_cue_removal() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("episode.txt");
    fs::write(&path, SRT)?;

    let cleaned = clean_file(&path, &Opts::default())?;
    assert!(cleaned.text.starts_with("1\n000 --> 000\n"));
    Ok(())
}

#[test]
fn explicit_format_overrides_the_extension() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("episode.txt");
    fs::write(&path, SRT)?;

    let opts = Opts {
        input_format: Some(InputFormat::Srt),
        ..Opts::default()
    };
    let cleaned = clean_file(&path, &opts)?;
    assert_eq!(cleaned.text, "Welcome to the show.\nLet's get started.\n");
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected_before_reading() {
    // The file doesn't exist; rejection must come from the extension check, not from I/O.
    let err = clean_file("missing/slides.pdf", &Opts::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFile { .. }));
}

#[test]
fn missing_supported_file_is_an_io_error() {
    let err = clean_file("missing/episode.srt", &Opts::default()).unwrap_err();
    assert!(matches!(err, Error::Other(_)));
}

#[test]
fn non_utf8_file_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("latin1.txt");
    fs::write(&path, [0x63, 0x61, 0x66, 0xe9])?;

    let err = clean_file(&path, &Opts::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidUtf8(_)));
    Ok(())
}

#[test]
fn batch_of_files_streams_as_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("a.srt");
    let second = dir.path().join("b.sbv");
    fs::write(&first, SRT)?;
    fs::write(&second, "0:00:00.599,0:00:04.160\n0:00:01 - caption text\n")?;

    let opts = Opts::default();
    let results = [&first, &second].map(|path| clean_file(path, &opts));

    let mut out = Vec::new();
    write_all(results, &mut out, OutputType::Json)?;

    let parsed: serde_json::Value = serde_json::from_slice(&out)?;
    let arr = parsed.as_array().expect("expected JSON array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[1]["cleaned_text"], "caption text\n");
    assert_eq!(arr[1]["timestamps_removed"], 3);
    Ok(())
}
