//! Argument parsing and dispatch for the three subcommands:
//! `generate_segment`, `export_timeline`, `generate_frames` (spec §6, §7).

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::analyzer::{SignalSource, TimelineAnalyzer, WavAnalyzer};
use crate::config::RunConfig;
use crate::error::{EngineError, EngineResult};
use crate::frame_driver::FrameDriver;
use crate::generator::Generator;
use crate::seed::parse_seed_hex;
use crate::timeline::Timeline;
use crate::wav_io::{read_wav_mono, write_wav};

pub enum Command {
    /// `generate_segment <seed-hex> [out.wav]`
    GenerateSegment { seed: u32, out_wav: PathBuf },
    /// `export_timeline <seed-hex> [out.json]`
    ExportTimeline { seed: u32, out_json: PathBuf },
    /// `generate_frames <audio.wav> <seed-hex> [--pipe-ppm] [--range START END] [--max-frames N]`
    GenerateFrames {
        audio_path: PathBuf,
        seed: u32,
        pipe_ppm: bool,
        range: Option<(u32, u32)>,
        max_frames: Option<u32>,
    },
}

/// Parses `std::env::args()`-shaped argv (argv\[0\] is the binary name and
/// is ignored). Unknown/malformed input maps to `InvalidSeed`/`MissingInput`
/// at the CLI boundary (spec §7); this function never panics on bad input.
pub fn parse_args(args: &[String]) -> EngineResult<Command> {
    if args.len() < 2 {
        return Err(EngineError::InvalidSeed("no subcommand given".to_string()));
    }
    let subcommand = args[1].as_str();
    let rest = &args[2..];

    match subcommand {
        "generate_segment" => {
            let seed_hex = positional(rest, 0)
                .ok_or_else(|| EngineError::InvalidSeed("missing seed-hex".to_string()))?;
            let seed = parse_seed_hex(&seed_hex)?;
            let out_wav = positional(rest, 1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("out.wav"));
            Ok(Command::GenerateSegment { seed, out_wav })
        }
        "export_timeline" => {
            let seed_hex = positional(rest, 0)
                .ok_or_else(|| EngineError::InvalidSeed("missing seed-hex".to_string()))?;
            let seed = parse_seed_hex(&seed_hex)?;
            let out_json = positional(rest, 1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("out.json"));
            Ok(Command::ExportTimeline { seed, out_json })
        }
        "generate_frames" => {
            let positionals: Vec<&String> = rest.iter().filter(|a| !a.starts_with("--")).collect();
            let audio_path = positionals
                .first()
                .map(|s| PathBuf::from(s.as_str()))
                .ok_or_else(|| EngineError::MissingInput("missing audio.wav".to_string()))?;
            let seed_hex = positionals
                .get(1)
                .ok_or_else(|| EngineError::InvalidSeed("missing seed-hex".to_string()))?;
            let seed = parse_seed_hex(seed_hex)?;

            let pipe_ppm = rest.iter().any(|a| a == "--pipe-ppm");
            let range = flag_index(rest, "--range")
                .map(|i| parse_range_pair(rest, i))
                .transpose()?;
            let max_frames = flag_index(rest, "--max-frames")
                .map(|i| parse_u32_arg(rest, i))
                .transpose()?;

            Ok(Command::GenerateFrames {
                audio_path,
                seed,
                pipe_ppm,
                range,
                max_frames,
            })
        }
        other => Err(EngineError::InvalidSeed(format!("unknown subcommand: {other}"))),
    }
}

fn positional(rest: &[String], index: usize) -> Option<String> {
    rest.iter().filter(|a| !a.starts_with("--")).nth(index).cloned()
}

fn flag_index(args: &[String], name: &str) -> Option<usize> {
    args.iter().position(|a| a == name)
}

fn parse_u32_arg(args: &[String], flag_index: usize) -> EngineResult<u32> {
    args.get(flag_index + 1)
        .ok_or_else(|| EngineError::InvalidSeed(format!("{} missing value", args[flag_index])))?
        .parse()
        .map_err(|_| EngineError::InvalidSeed(args[flag_index + 1].clone()))
}

/// `--range START END`: two whitespace-separated positional integers.
fn parse_range_pair(args: &[String], flag_index: usize) -> EngineResult<(u32, u32)> {
    let start = parse_u32_arg(args, flag_index)?;
    let end: u32 = args
        .get(flag_index + 2)
        .ok_or_else(|| EngineError::InvalidSeed("--range missing END".to_string()))?
        .parse()
        .map_err(|_| EngineError::InvalidSeed("--range END not a number".to_string()))?;
    Ok((start, end))
}

pub fn run(command: Command, config: &RunConfig) -> EngineResult<()> {
    match command {
        Command::GenerateSegment { seed, out_wav } => run_generate_segment(seed, &out_wav, config),
        Command::ExportTimeline { seed, out_json } => run_export_timeline(seed, &out_json),
        Command::GenerateFrames {
            audio_path,
            seed,
            pipe_ppm,
            range,
            max_frames,
        } => run_generate_frames(audio_path, seed, pipe_ppm, range, max_frames),
    }
}

fn run_generate_segment(seed: u32, out_wav: &Path, config: &RunConfig) -> EngineResult<()> {
    log::info!("generating segment for seed 0x{seed:08X}");
    let mut generator = Generator::new(seed, config);
    let segment = generator.process_segment();
    write_wav(out_wav, generator.music_time().sample_rate, &segment)?;
    Ok(())
}

fn run_export_timeline(seed: u32, out_json: &Path) -> EngineResult<()> {
    log::info!("exporting timeline for seed 0x{seed:08X}");
    let timeline = Timeline::build(seed);
    let json = timeline
        .to_json()
        .map_err(|e| EngineError::InternalAssert(format!("timeline serialization failed: {e}")))?;
    std::fs::write(out_json, json)?;
    Ok(())
}

/// Sidecar discovery follows the `<audio.wav>.json` convention (spec §6):
/// if it exists, the timeline drives rendering and WAV analysis never runs.
fn sidecar_path_for(audio_path: &Path) -> PathBuf {
    let mut name = audio_path.as_os_str().to_os_string();
    name.push(".json");
    PathBuf::from(name)
}

fn run_generate_frames(
    audio_path: PathBuf,
    seed: u32,
    pipe_ppm: bool,
    range: Option<(u32, u32)>,
    max_frames: Option<u32>,
) -> EngineResult<()> {
    log::info!("generating frames for seed 0x{seed:08X}");
    if !audio_path.exists() {
        return Err(EngineError::MissingInput(audio_path.display().to_string()));
    }

    let mut driver = FrameDriver::new(seed);
    let total_frames = driver.total_frames();

    let (start, end) = match range {
        Some((s, e)) => (s, e.min(total_frames)),
        None => (0, total_frames),
    };
    if start >= total_frames {
        return Err(EngineError::OutOfRange { start, total_frames });
    }
    let end = max_frames.map(|m| end.min(start + m)).unwrap_or(end);

    let sidecar_path = sidecar_path_for(&audio_path);
    let mut fb = crate::visual::framebuffer::FrameBuffer::new();
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();

    if sidecar_path.exists() {
        let json = std::fs::read_to_string(&sidecar_path)?;
        let timeline: Timeline = serde_json::from_str(&json)
            .map_err(|e| EngineError::InternalAssert(format!("bad timeline json: {e}")))?;
        let mut analyzer = TimelineAnalyzer::new(&timeline);
        emit_frames(&mut driver, &mut analyzer, &mut fb, start, end, pipe_ppm, &mut lock)
    } else {
        let decoded = read_wav_mono(&audio_path)?;
        let mut analyzer = WavAnalyzer::new(decoded.mono);
        emit_frames(&mut driver, &mut analyzer, &mut fb, start, end, pipe_ppm, &mut lock)
    }
}

fn emit_frames<S: SignalSource, W: Write>(
    driver: &mut FrameDriver,
    analyzer: &mut S,
    fb: &mut crate::visual::framebuffer::FrameBuffer,
    start: u32,
    end: u32,
    pipe_ppm: bool,
    stdout: &mut W,
) -> EngineResult<()> {
    for frame in start..end {
        driver.render_frame(fb, analyzer, frame);
        if pipe_ppm {
            fb.write_ppm(stdout)?;
        } else {
            let path = PathBuf::from(format!("frame_{frame:06}.ppm"));
            let mut file = std::fs::File::create(path)?;
            fb.write_ppm(&mut file)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_segment_with_defaults() {
        let args: Vec<String> = vec!["seedforge", "generate_segment", "0xCAFEBABE"]
            .into_iter()
            .map(String::from)
            .collect();
        match parse_args(&args).unwrap() {
            Command::GenerateSegment { seed, out_wav } => {
                assert_eq!(seed, 0xCAFE_BABE);
                assert_eq!(out_wav, PathBuf::from("out.wav"));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn parses_generate_frames_with_range_and_max_frames() {
        let args: Vec<String> = vec![
            "seedforge",
            "generate_frames",
            "in.wav",
            "0xDEADBEEF",
            "--range",
            "10",
            "50",
            "--max-frames",
            "20",
            "--pipe-ppm",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        match parse_args(&args).unwrap() {
            Command::GenerateFrames { audio_path, seed, pipe_ppm, range, max_frames } => {
                assert_eq!(audio_path, PathBuf::from("in.wav"));
                assert_eq!(seed, 0xDEAD_BEEF);
                assert!(pipe_ppm);
                assert_eq!(range, Some((10, 50)));
                assert_eq!(max_frames, Some(20));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn rejects_unknown_subcommand() {
        let args: Vec<String> = vec!["seedforge", "bogus"].into_iter().map(String::from).collect();
        assert!(parse_args(&args).is_err());
    }

    #[test]
    fn rejects_missing_audio_path() {
        let args: Vec<String> = vec!["seedforge", "generate_frames"].into_iter().map(String::from).collect();
        assert!(parse_args(&args).is_err());
    }
}
