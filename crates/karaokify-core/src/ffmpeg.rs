//! ffmpeg subprocess runner.
//!
//! Formats other than WAV are decoded and encoded by running `ffmpeg` as a
//! subprocess. Decoding first lists the input's streams to find the source
//! sample format, then converts the input to a PCM WAV file of matching
//! depth that [`crate::wav`] reads; encoding converts a WAV file written by
//! [`crate::wav`] into the requested container.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{KaraokeError, KaraokeResult};

/// Default timeout for a single ffmpeg run (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable that overrides the ffmpeg location.
pub const FFMPEG_PATH_ENV: &str = "FFMPEG_PATH";

/// PCM codec used for decoding when the source sample format is unknown.
pub const DEFAULT_DECODE_PCM_CODEC: &str = "pcm_s16le";

/// Configuration for running ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// Explicit path to the ffmpeg executable.
    pub ffmpeg_path: Option<PathBuf>,
    /// Timeout for each ffmpeg run.
    pub timeout: Duration,
    /// Whether to capture ffmpeg's stderr for error messages.
    pub capture_output: bool,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            capture_output: true,
        }
    }
}

impl FfmpegConfig {
    /// Sets the ffmpeg executable path.
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// A located ffmpeg executable plus its run configuration.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    path: PathBuf,
    config: FfmpegConfig,
}

impl Ffmpeg {
    /// Locates ffmpeg according to `config`.
    ///
    /// # Errors
    /// Returns [`KaraokeError::FfmpegNotFound`] if no executable is found.
    pub fn locate(config: FfmpegConfig) -> KaraokeResult<Self> {
        let path = find_ffmpeg(&config)?;
        Ok(Self { path, config })
    }

    /// Path of the located executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the version string reported by `ffmpeg -version`.
    pub fn version(&self) -> KaraokeResult<String> {
        let output = Command::new(&self.path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map_err(KaraokeError::SpawnFailed)?;

        if !output.status.success() {
            return Err(KaraokeError::process_failed(
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_ffmpeg_version(&stdout).unwrap_or_else(|| "unknown".to_string()))
    }

    /// Returns the sample format of the input's first audio stream as
    /// ffmpeg reports it (e.g. `s16`, `fltp`, `s32 (24 bit)`).
    ///
    /// Runs `ffmpeg -i <input>` without an output, which lists the streams
    /// and exits non-zero. `None` means no audio stream line was found.
    pub fn probe_sample_format(&self, input: &Path) -> KaraokeResult<Option<String>> {
        let mut cmd = Command::new(&self.path);
        cmd.args(["-hide_banner", "-nostdin", "-i"])
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(KaraokeError::SpawnFailed)?;
        let (_status, listing) = wait_with_timeout(child, self.config.timeout)?;
        Ok(parse_audio_sample_format(&listing))
    }

    /// Decodes any ffmpeg-readable input into a PCM WAV file whose sample
    /// format matches the source.
    pub fn decode_to_wav(&self, input: &Path, wav_out: &Path) -> KaraokeResult<()> {
        let codec = self
            .probe_sample_format(input)?
            .map_or(DEFAULT_DECODE_PCM_CODEC, |fmt| pcm_codec_for_sample_format(&fmt));

        let mut cmd = self.base_command();
        cmd.arg("-i")
            .arg(input)
            .arg("-vn")
            .args(["-c:a", codec])
            .args(["-f", "wav"])
            .arg(wav_out);
        self.run(cmd)
    }

    /// Encodes a WAV file into `format`, writing `output`.
    pub fn encode_from_wav(&self, wav_in: &Path, output: &Path, format: &str) -> KaraokeResult<()> {
        let mut cmd = self.base_command();
        cmd.arg("-i")
            .arg(wav_in)
            .arg("-vn")
            .args(["-f", muxer_for_format(format)])
            .arg(output);
        self.run(cmd)
    }

    fn base_command(&self) -> Command {
        // ffmpeg -hide_banner -nostdin -v error -y ...
        let mut cmd = Command::new(&self.path);
        cmd.args(["-hide_banner", "-nostdin", "-v", "error", "-y"]);
        cmd
    }

    fn run(&self, mut cmd: Command) -> KaraokeResult<()> {
        cmd.stdin(Stdio::null());
        if self.config.capture_output {
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        let child = cmd.spawn().map_err(KaraokeError::SpawnFailed)?;
        let (status, stderr) = wait_with_timeout(child, self.config.timeout)?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            return Err(KaraokeError::process_failed(exit_code, stderr.trim()));
        }

        Ok(())
    }
}

/// Finds the ffmpeg executable.
///
/// Search order: the configured path, the `FFMPEG_PATH` environment
/// variable, `PATH`, then common installation locations.
pub fn find_ffmpeg(config: &FfmpegConfig) -> KaraokeResult<PathBuf> {
    // Check config override first
    if let Some(ref path) = config.ffmpeg_path {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    if let Ok(path) = std::env::var(FFMPEG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    let names = if cfg!(windows) {
        vec!["ffmpeg.exe", "ffmpeg"]
    } else {
        vec!["ffmpeg"]
    };

    for name in names {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }

    let common_paths = if cfg!(windows) {
        vec![
            "C:\\ffmpeg\\bin\\ffmpeg.exe",
            "C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe",
        ]
    } else if cfg!(target_os = "macos") {
        vec!["/opt/homebrew/bin/ffmpeg", "/usr/local/bin/ffmpeg"]
    } else {
        vec![
            "/usr/bin/ffmpeg",
            "/usr/local/bin/ffmpeg",
            "/snap/bin/ffmpeg",
        ]
    };

    for path_str in common_paths {
        let path = PathBuf::from(path_str);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(KaraokeError::FfmpegNotFound)
}

/// Maps a file extension to the ffmpeg muxer that writes it.
///
/// Most extensions are also muxer names; the rest are listed here.
pub fn muxer_for_format(format: &str) -> &str {
    match format {
        "m4a" | "m4b" => "ipod",
        "aac" => "adts",
        "mka" => "matroska",
        "oga" => "ogg",
        "aif" | "aiff" => "aiff",
        other => other,
    }
}

/// Parses the version out of `ffmpeg -version` output.
///
/// The first line looks like `ffmpeg version 6.1.1-3ubuntu5 Copyright ...`.
pub fn parse_ffmpeg_version(output: &str) -> Option<String> {
    output
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("ffmpeg version "))
        .and_then(|rest| rest.split_whitespace().next())
        .map(str::to_string)
}

/// Extracts the sample format of the first audio stream from an
/// `ffmpeg -i` stream listing.
///
/// Stream lines look like
/// `Stream #0:0: Audio: flac, 44100 Hz, stereo, s32 (24 bit)`; the sample
/// format is the second field after the sample rate.
pub fn parse_audio_sample_format(listing: &str) -> Option<String> {
    listing
        .lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with("Stream #"))
        .find_map(|line| line.split_once(": Audio: "))
        .and_then(|(_, desc)| {
            let fields: Vec<&str> = desc.split(", ").map(str::trim).collect();
            let rate = fields.iter().position(|f| f.ends_with(" Hz"))?;
            fields.get(rate + 2).map(|f| f.to_string())
        })
}

/// Picks the WAV PCM codec that holds `sample_format` without losing
/// precision.
///
/// Planar variants (`fltp`, `s16p`, ...) map like their packed forms. A
/// `(N bit)` annotation narrows 32-bit containers to the real depth.
/// Double precision and 64-bit integers are narrowed to what the buffer
/// model holds.
pub fn pcm_codec_for_sample_format(sample_format: &str) -> &'static str {
    let (name, bits) = match sample_format.split_once(" (") {
        Some((name, rest)) => (
            name,
            rest.strip_suffix(" bit)")
                .and_then(|b| b.trim().parse::<u16>().ok()),
        ),
        None => (sample_format, None),
    };

    match name.trim_end_matches('p') {
        "u8" => "pcm_u8",
        "s16" => "pcm_s16le",
        "s32" => match bits {
            Some(b) if b <= 16 => "pcm_s16le",
            Some(b) if b <= 24 => "pcm_s24le",
            _ => "pcm_s32le",
        },
        "s64" => "pcm_s32le",
        "flt" | "dbl" => "pcm_f32le",
        _ => DEFAULT_DECODE_PCM_CODEC,
    }
}

/// Waits for `child`, killing it after `timeout`.
///
/// A piped stderr is drained on a separate thread while waiting, so a child
/// that writes more than the pipe buffer keeps running instead of blocking.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> KaraokeResult<(ExitStatus, String)> {
    let stderr_reader: Option<JoinHandle<String>> = child.stderr.take().map(|mut stderr| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    });

    let start = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    // The reader is left to finish on its own: a grandchild
                    // may still hold the pipe open.
                    return Err(KaraokeError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(KaraokeError::SpawnFailed(e)),
        }
    };

    let stderr = stderr_reader
        .and_then(|reader| reader.join().ok())
        .unwrap_or_default();

    Ok((status, stderr))
}

/// Helpers for tests that run stand-in ffmpeg executables.
#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard};

    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests that write or spawn executables. Executing a script
    /// while another thread's forked child still holds it open for writing
    /// fails with `ETXTBSY`.
    pub fn spawn_lock() -> MutexGuard<'static, ()> {
        SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Writes an executable `sh` script with the given body.
    #[cfg(unix)]
    pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join(name);
        std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    /// Writes a stand-in ffmpeg that appends its arguments to `log`.
    ///
    /// Called as `ffmpeg ... -i <input>` with no output, it prints an audio
    /// stream line with `sample_format` and exits 1. Otherwise it copies
    /// `source` (or the `-i` input) to the last argument.
    #[cfg(unix)]
    pub fn write_fake_ffmpeg(
        dir: &Path,
        log: &Path,
        sample_format: &str,
        source: Option<&Path>,
    ) -> PathBuf {
        let copy_from = match source {
            Some(path) => format!("'{}'", path.display()),
            None => "\"$input\"".to_string(),
        };
        let body = format!(
            r#"echo "$*" >> '{log}'
input=""
prev=""
for arg in "$@"; do
    if [ "$prev" = "-i" ]; then input="$arg"; fi
    prev="$arg"
done
if [ "$arg" = "$input" ]; then
    echo "  Stream #0:0: Audio: flac, 48000 Hz, stereo, {sample_format}" 1>&2
    echo "At least one output file must be specified" 1>&2
    exit 1
fi
cp {copy_from} "$arg""#,
            log = log.display(),
        );
        write_script(dir, "ffmpeg", &body)
    }

    /// Reads the argument lines recorded by a fake ffmpeg.
    #[cfg(unix)]
    pub fn read_log(log: &Path) -> Vec<String> {
        std::fs::read_to_string(log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
