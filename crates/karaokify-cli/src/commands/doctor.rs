//! Doctor command implementation
//!
//! Checks that ffmpeg is available and the working directory is writable.

use anyhow::Result;
use colored::Colorize;
use karaokify_core::{Ffmpeg, FfmpegConfig, KaraokeError};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// Run the doctor command
///
/// Checks:
/// - Version information
/// - ffmpeg installation
/// - Output directory permissions
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(ffmpeg_path: Option<&str>) -> Result<ExitCode> {
    println!("{}", "Karaokify Doctor".cyan().bold());
    println!("{}", "================".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} karaokify-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );

    println!();

    println!("{}", "Dependencies:".bold());
    match check_ffmpeg(ffmpeg_path) {
        FfmpegStatus::Found { path, version } => {
            println!(
                "  {} ffmpeg {} ({})",
                "ok".green(),
                version,
                path.display()
            );
        }
        FfmpegStatus::NotFound => {
            println!("  {} ffmpeg not found", "!!".red());
            println!(
                "     {}",
                "ffmpeg is required for every format other than WAV.".dimmed()
            );
            println!(
                "     {}",
                "Install from https://ffmpeg.org/download.html or set FFMPEG_PATH.".dimmed()
            );
            all_ok = false;
        }
        FfmpegStatus::Error(e) => {
            println!("  {} ffmpeg check failed: {}", "!!".red(), e);
            all_ok = false;
        }
    }

    println!();

    println!("{}", "Permissions:".bold());
    match env::current_dir() {
        Ok(dir) => {
            let test_file = dir.join(".karaokify_write_test");
            match std::fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = std::fs::remove_file(&test_file);
                    println!(
                        "  {} Current directory is writable ({})",
                        "ok".green(),
                        dir.display()
                    );
                }
                Err(e) => {
                    println!("  {} Cannot write to current directory: {}", "!!".red(), e);
                    all_ok = false;
                }
            }
        }
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }

    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Status of the ffmpeg installation check
#[derive(Debug)]
enum FfmpegStatus {
    Found { path: PathBuf, version: String },
    NotFound,
    Error(String),
}

fn check_ffmpeg(ffmpeg_path: Option<&str>) -> FfmpegStatus {
    let mut config = FfmpegConfig::default();
    if let Some(path) = ffmpeg_path {
        config = config.ffmpeg_path(path);
    }

    let ffmpeg = match Ffmpeg::locate(config) {
        Ok(ffmpeg) => ffmpeg,
        Err(KaraokeError::FfmpegNotFound) => return FfmpegStatus::NotFound,
        Err(e) => return FfmpegStatus::Error(e.to_string()),
    };

    match ffmpeg.version() {
        Ok(version) => FfmpegStatus::Found {
            path: ffmpeg.path().to_path_buf(),
            version,
        },
        Err(e) => FfmpegStatus::Error(e.to_string()),
    }
}
