//! Karaokify CLI - strips center-panned vocals from stereo audio
//!
//! Inverts the left channel, sums it with the right and writes the mono
//! result in the requested format.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;

use karaokify_cli::commands;
use karaokify_cli::commands::process::ProcessArgs;
use karaokify_core::ffmpeg::DEFAULT_TIMEOUT_SECS;
use karaokify_core::output::DEFAULT_FORMAT;

const USAGE_EXAMPLES: &str = "\
Examples:
  karaokify InputSong.mp3
      Writes InputSong_karaoked.mp3 next to the input.

  karaokify InputSong.mp3 --output OutputSong --format wav
      Writes OutputSong.wav.";

/// Karaokify - remove vocals from stereo audio
#[derive(Parser)]
#[command(name = "karaokify")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = USAGE_EXAMPLES)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    process: ConvertArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Check ffmpeg and output directory permissions
    Doctor {
        /// Path to the ffmpeg executable
        #[arg(long)]
        ffmpeg: Option<String>,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Input stereo audio file
    input: Option<String>,

    /// Output file name (extension added if missing)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format (mp3, wav, flac, ogg, ...)
    #[arg(short, long, default_value = DEFAULT_FORMAT)]
    format: String,

    /// Path to the ffmpeg executable
    #[arg(long)]
    ffmpeg: Option<String>,

    /// Timeout in seconds for each ffmpeg run
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Doctor { ffmpeg }) => commands::doctor::run(ffmpeg.as_deref()),
        None => {
            let args = &cli.process;
            commands::process::run(&ProcessArgs {
                input: args.input.as_deref(),
                output: args.output.as_deref(),
                format: &args.format,
                ffmpeg: args.ffmpeg.as_deref(),
                timeout_secs: args.timeout,
                json: args.json,
            })
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parses_input_with_defaults() {
        let cli = Cli::try_parse_from(["karaokify", "InputSong.mp3"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.process.input.as_deref(), Some("InputSong.mp3"));
        assert_eq!(cli.process.output, None);
        assert_eq!(cli.process.format, "mp3");
        assert_eq!(cli.process.ffmpeg, None);
        assert_eq!(cli.process.timeout, 300);
        assert!(!cli.process.json);
    }

    #[test]
    fn test_cli_parses_output_and_format() {
        let cli = Cli::try_parse_from([
            "karaokify",
            "InputSong.mp3",
            "--output",
            "OutputSong",
            "--format",
            "wav",
        ])
        .unwrap();
        assert_eq!(cli.process.output.as_deref(), Some("OutputSong"));
        assert_eq!(cli.process.format, "wav");
    }

    #[test]
    fn test_cli_parses_short_flags() {
        let cli =
            Cli::try_parse_from(["karaokify", "a.flac", "-o", "b", "-f", "ogg", "--json"]).unwrap();
        assert_eq!(cli.process.output.as_deref(), Some("b"));
        assert_eq!(cli.process.format, "ogg");
        assert!(cli.process.json);
    }

    #[test]
    fn test_cli_allows_missing_input() {
        // Reported by the process command with a dedicated message.
        let cli = Cli::try_parse_from(["karaokify"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.process.input, None);
    }

    #[test]
    fn test_cli_parses_doctor() {
        let cli = Cli::try_parse_from(["karaokify", "doctor", "--ffmpeg", "/opt/ffmpeg"]).unwrap();
        match cli.command {
            Some(Commands::Doctor { ffmpeg }) => {
                assert_eq!(ffmpeg.as_deref(), Some("/opt/ffmpeg"));
            }
            None => panic!("expected doctor subcommand"),
        }
    }

    #[test]
    fn test_cli_rejects_invalid_timeout() {
        assert!(Cli::try_parse_from(["karaokify", "a.mp3", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn test_cli_verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
