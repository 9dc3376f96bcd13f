//! Karaoke conversion command
//!
//! Inverts the left channel of a stereo file, downmixes to mono and writes
//! the result in the requested format.

use anyhow::{bail, Result};
use colored::Colorize;
use karaokify_core::{process, FfmpegConfig, KaraokeError, ProcessOptions, SampleFormat};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{error_codes, JsonError, OutputFile, ProcessOutput};

/// Message shown when no input file is given.
pub const MISSING_INPUT_MESSAGE: &str =
    "Input file is required. For more information, use the -h argument.";

/// Exit code for recoverable failures (input is not stereo).
pub const EXIT_NOT_STEREO: u8 = 2;

/// Arguments for a conversion, as parsed from the command line.
#[derive(Debug, Clone)]
pub struct ProcessArgs<'a> {
    /// Input audio file
    pub input: Option<&'a str>,
    /// Output file name
    pub output: Option<&'a str>,
    /// Output format identifier
    pub format: &'a str,
    /// Explicit ffmpeg executable
    pub ffmpeg: Option<&'a str>,
    /// ffmpeg timeout in seconds
    pub timeout_secs: u64,
    /// Emit machine-readable JSON instead of colored output
    pub json: bool,
}

/// Run the conversion command
///
/// # Returns
/// Exit code: 0 success, 1 fatal error, 2 input is not stereo
pub fn run(args: &ProcessArgs<'_>) -> Result<ExitCode> {
    if args.json {
        run_json(args)
    } else {
        run_human(args)
    }
}

/// Builds the library options from CLI arguments.
pub fn build_options(args: &ProcessArgs<'_>) -> ProcessOptions {
    let mut ffmpeg = FfmpegConfig::default().timeout_secs(args.timeout_secs);
    if let Some(path) = args.ffmpeg {
        ffmpeg = ffmpeg.ffmpeg_path(path);
    }

    let mut options = ProcessOptions::default().format(args.format).ffmpeg(ffmpeg);
    if let Some(output) = args.output {
        options = options.output(output);
    }
    options
}

/// Run with human-readable (colored) output
fn run_human(args: &ProcessArgs<'_>) -> Result<ExitCode> {
    let Some(input) = args.input else {
        bail!(MISSING_INPUT_MESSAGE);
    };

    let start = Instant::now();
    let options = build_options(args);

    println!("{} {}", "Input:".cyan().bold(), input);
    println!("{} {}", "Format:".cyan().bold(), options.format);

    match process(Path::new(input), &options) {
        Ok(result) => {
            let format_desc = match result.sample_format {
                SampleFormat::Int { bits } => format!("{}-bit", bits),
                SampleFormat::Float => "32-bit float".to_string(),
            };
            println!(
                "  {} {} frames, {} Hz, {} ({:.2}s)",
                "->".green(),
                result.frames,
                result.sample_rate,
                format_desc,
                result.duration_seconds()
            );
            println!("  {} {}", "PCM hash:".dimmed(), result.pcm_hash.dimmed());
            println!(
                "{} {}",
                "Processed mono audio saved as:".green().bold(),
                result.output_path.display()
            );
            println!(
                "{} {}ms",
                "Done in".dimmed(),
                start.elapsed().as_millis().to_string().dimmed()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(KaraokeError::InvalidChannelCount { channels }) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                not_stereo_message(input, channels)
            );
            eprintln!("  {}", "No output file was written.".dimmed());
            Ok(ExitCode::from(EXIT_NOT_STEREO))
        }
        Err(err) => Err(err.into()),
    }
}

/// Message for an input that does not have two channels.
pub fn not_stereo_message(input: &str, channels: u16) -> String {
    format!("{input} is not a stereo audio file (channels: {channels})")
}

/// Run with machine-readable JSON output
fn run_json(args: &ProcessArgs<'_>) -> Result<ExitCode> {
    let start = Instant::now();

    let Some(input) = args.input else {
        let error = JsonError::new(error_codes::MISSING_INPUT, MISSING_INPUT_MESSAGE);
        print_json(&ProcessOutput::failure(None, vec![error], 0))?;
        return Ok(ExitCode::from(1));
    };

    let options = build_options(args);
    let result = process(Path::new(input), &options);
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(result) => {
            let output = ProcessOutput::success(input, OutputFile::from(&result), duration_ms);
            print_json(&output)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let code = if err.is_recoverable() {
                ExitCode::from(EXIT_NOT_STEREO)
            } else {
                ExitCode::from(1)
            };
            let output =
                ProcessOutput::failure(Some(input), vec![JsonError::from(&err)], duration_ms);
            print_json(&output)?;
            Ok(code)
        }
    }
}

fn print_json(output: &ProcessOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn args<'a>(input: Option<&'a str>, format: &'a str) -> ProcessArgs<'a> {
        ProcessArgs {
            input,
            output: None,
            format,
            ffmpeg: None,
            timeout_secs: 300,
            json: false,
        }
    }

    fn write_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_build_options() {
        let mut a = args(Some("song.mp3"), "wav");
        a.output = Some("OutputSong");
        a.ffmpeg = Some("/opt/ffmpeg");
        a.timeout_secs = 42;

        let options = build_options(&a);
        assert_eq!(options.format, "wav");
        assert_eq!(options.output, Some(PathBuf::from("OutputSong")));
        assert_eq!(options.ffmpeg.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg")));
        assert_eq!(options.ffmpeg.timeout.as_secs(), 42);
    }

    #[test]
    fn test_missing_input_is_error() {
        let err = run(&args(None, "mp3")).unwrap_err();
        assert_eq!(err.to_string(), MISSING_INPUT_MESSAGE);
    }

    #[test]
    fn test_missing_input_json_exits_one() {
        let mut a = args(None, "mp3");
        a.json = true;
        assert_eq!(run(&a).unwrap(), ExitCode::from(1));
    }

    #[test]
    fn test_stereo_wav_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("song.wav");
        write_wav(&input, 2, &[1000, 1000, 500, 0]);
        let input = input.to_string_lossy().to_string();

        let code = run(&args(Some(&input), "wav")).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(dir.path().join("song_karaoked.wav").exists());
    }

    #[test]
    fn test_mono_wav_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mono.wav");
        write_wav(&input, 1, &[1, 2, 3]);
        let input = input.to_string_lossy().to_string();

        let code = run(&args(Some(&input), "wav")).unwrap();
        assert_eq!(code, ExitCode::from(EXIT_NOT_STEREO));
        assert!(!dir.path().join("mono_karaoked.wav").exists());
    }

    #[test]
    fn test_not_stereo_message_names_channels_once() {
        assert_eq!(
            not_stereo_message("mono.wav", 1),
            "mono.wav is not a stereo audio file (channels: 1)"
        );
        assert_eq!(not_stereo_message("x.wav", 6).matches("stereo").count(), 1);
    }

    #[test]
    fn test_nonexistent_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.wav").to_string_lossy().to_string();

        let err = run(&args(Some(&input), "wav")).unwrap_err();
        assert!(err.to_string().contains("input file not found"));
    }
}
