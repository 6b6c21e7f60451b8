//! Frames and audio samples must stay in lockstep: `total_frames` is a
//! floor-truncation of the segment duration at 60 FPS, never an
//! over-run (spec §4.13, §8).

use seedforge::config::RunConfig;
use seedforge::frame_driver::FrameDriver;
use seedforge::frame_driver::FPS;
use seedforge::generator::Generator;

#[test]
fn total_frames_never_exceeds_audio_duration() {
    let config = RunConfig::default();
    for seed in [0u32, 1, 0xCAFEBABE, 0xFEEDFACE] {
        let mut generator = Generator::new(seed, &config);
        let segment = generator.process_segment();
        let sample_rate = generator.music_time().sample_rate;
        let duration_seconds = segment.left.len() as f64 / sample_rate as f64;

        let driver = FrameDriver::new(seed);
        let total_frames = driver.total_frames();

        assert!(
            (total_frames as f64) <= duration_seconds * FPS as f64 + 1.0,
            "seed {seed:#X}: {total_frames} frames exceeds {duration_seconds}s at {FPS}fps"
        );
    }
}

#[test]
fn frame_sample_index_stays_within_segment_bounds() {
    let config = RunConfig::default();
    let seed = 0x1234_5678;
    let mut generator = Generator::new(seed, &config);
    let segment = generator.process_segment();
    let sample_rate = generator.music_time().sample_rate;

    let driver = FrameDriver::new(seed);
    let total_frames = driver.total_frames();

    for frame in 0..total_frames {
        let sample_index = (frame as u64 * sample_rate as u64) / FPS as u64;
        assert!((sample_index as usize) < segment.left.len());
    }
}
