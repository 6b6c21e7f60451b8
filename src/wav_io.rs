//! WAV boundary: 16-bit PCM stereo at 44.1 kHz (spec §6). Writes go
//! through a temp file and rename so a failing generation never leaves a
//! partial WAV on disk (spec §7).

use std::path::Path;

use crate::error::EngineError;
use crate::generator::StereoSegment;

const BITS_PER_SAMPLE: u16 = 16;

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

pub fn write_wav(path: &Path, sample_rate: u32, segment: &StereoSegment) -> Result<(), EngineError> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let tmp_path = path.with_extension("wav.tmp");
    {
        let mut writer = hound::WavWriter::create(&tmp_path, spec)
            .map_err(|e| EngineError::IoWrite(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        for i in 0..segment.left.len() {
            writer
                .write_sample(to_i16(segment.left[i]))
                .map_err(|e| EngineError::IoWrite(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
            writer
                .write_sample(to_i16(segment.right[i]))
                .map_err(|e| EngineError::IoWrite(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        }
        writer
            .finalize()
            .map_err(|e| EngineError::IoWrite(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// A decoded WAV, downmixed to mono for analysis purposes (spec §4.13's
/// fallback analyzer only needs level/RMS, not stereo imaging).
pub struct DecodedWav {
    pub sample_rate: u32,
    pub mono: Vec<f32>,
}

pub fn read_wav_mono(path: &Path) -> Result<DecodedWav, EngineError> {
    if !path.exists() {
        return Err(EngineError::MissingInput(path.display().to_string()));
    }
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| EngineError::MissingInput(format!("{}: {e}", path.display())))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let io_err = |e: hound::Error| EngineError::IoWrite(std::io::Error::new(std::io::ErrorKind::Other, e));

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<Vec<_>, _>>()
                .map_err(io_err)?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?,
    };

    let mono: Vec<f32> = samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok(DecodedWav {
        sample_rate: spec.sample_rate,
        mono,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn write_then_read_round_trips_sample_count() {
        let segment = StereoSegment {
            left: vec![0.5, -0.5, 0.25, -0.25],
            right: vec![0.5, -0.5, 0.25, -0.25],
        };
        let path = temp_path("seedforge_test_roundtrip.wav");
        write_wav(&path, 44_100, &segment).unwrap();
        let decoded = read_wav_mono(&path).unwrap();
        assert_eq!(decoded.mono.len(), segment.left.len());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_reported() {
        let path = temp_path("seedforge_definitely_missing.wav");
        let _ = std::fs::remove_file(&path);
        let result = read_wav_mono(&path);
        assert!(matches!(result, Err(EngineError::MissingInput(_))));
    }
}
