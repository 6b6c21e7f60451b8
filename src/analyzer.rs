//! Per-frame audio signals for the renderer: sidecar-first (ground
//! truth), with a streaming WAV analyzer as fallback (spec §4.13, §8).

use rustfft::{num_complex::Complex32, FftPlanner};

use crate::event::VoiceKind;
use crate::timeline::Timeline;

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSignals {
    pub level: f32,
    pub beat_now: bool,
    pub bass_energy: f32,
    pub treble_energy: f32,
    pub hue_base: f32,
}

/// A source of per-frame signals. Implementations are stateful and must
/// be queried in increasing frame order (the smoothing formula in spec
/// §4.13 is recursive: `L(f) = 0.8*L(f-1) + 0.2*L_raw(f)`).
pub trait SignalSource {
    fn signals_for_frame(&mut self, frame: u32, sample_rate: u32) -> FrameSignals;
}

fn hue_for_frame(frame: u32) -> f32 {
    (frame as f32 * 0.002).rem_euclid(1.0)
}

/// Sidecar-first analyzer: ground truth, derived directly from the
/// scheduled events rather than a resynthesis of the audio.
pub struct TimelineAnalyzer<'a> {
    timeline: &'a Timeline,
    prev_level: f32,
    frames_since_beat: u32,
}

impl<'a> TimelineAnalyzer<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        TimelineAnalyzer {
            timeline,
            prev_level: 0.0,
            frames_since_beat: u32::MAX / 2,
        }
    }

    fn kind_weight_and_decay(kind: VoiceKind) -> (f32, f32) {
        // (contribution weight, decay rate in 1/seconds), echoing each
        // voice's own envelope shape in generator.rs/voice/*.
        match kind {
            VoiceKind::Kick => (1.0, 7.0),
            VoiceKind::Snare => (0.7, 18.0),
            VoiceKind::Hat => (0.3, 60.0),
            VoiceKind::Melody => (0.2, 1.0 / 0.18),
            VoiceKind::MidFm => (0.4, 12.0),
            VoiceKind::BassFm => (0.8, 3.0),
        }
    }

    fn raw_level_and_bands(&self, sample_index: u32) -> (f32, f32, f32) {
        let mut level = 0.0f32;
        let mut bass = 0.0f32;
        let mut treble = 0.0f32;

        for e in &self.timeline.events {
            if e.t > sample_index {
                continue;
            }
            let kind = match Timeline::kind_from_tag(&e.kind) {
                Some(k) => k,
                None => continue,
            };
            let (weight, decay) = Self::kind_weight_and_decay(kind);
            let dt = (sample_index - e.t) as f32 / self.timeline.sample_rate as f32;
            let contribution = weight * (-dt * decay).exp();
            level = level.max(contribution);

            match kind {
                VoiceKind::Kick | VoiceKind::BassFm => bass += contribution,
                VoiceKind::Hat | VoiceKind::MidFm => treble += contribution,
                _ => {}
            }
        }

        (level.min(1.0), bass.min(1.0), treble.min(1.0))
    }
}

impl<'a> SignalSource for TimelineAnalyzer<'a> {
    fn signals_for_frame(&mut self, frame: u32, sample_rate: u32) -> FrameSignals {
        let sample_index = ((frame as u64 * sample_rate as u64) / 60) as u32;
        let (raw, bass, treble) = self.raw_level_and_bands(sample_index);
        let level = 0.8 * self.prev_level + 0.2 * raw;
        self.prev_level = level;

        let frame_half_window = sample_rate / 60 / 2 + 1;
        let beat_now = self.timeline.events.iter().any(|e| {
            matches!(Timeline::kind_from_tag(&e.kind), Some(VoiceKind::Kick) | Some(VoiceKind::Snare))
                && e.t.abs_diff(sample_index) <= frame_half_window
        });

        if beat_now {
            self.frames_since_beat = 0;
        } else {
            self.frames_since_beat = self.frames_since_beat.saturating_add(1);
        }

        FrameSignals {
            level,
            beat_now,
            bass_energy: bass,
            treble_energy: treble,
            hue_base: hue_for_frame(frame),
        }
    }
}

/// Streaming WAV-derived fallback analyzer (spec §4.13). Onset detection:
/// RMS over a 1024-sample window centered on `f*sample_rate/60`, onset
/// when current RMS exceeds the previous window's RMS by at least 5% AND
/// at least 3 frames have passed since the last beat.
pub struct WavAnalyzer {
    mono: Vec<f32>,
    prev_level: f32,
    prev_rms: f32,
    frames_since_beat: u32,
    fft_planner: FftPlanner<f32>,
}

const RMS_WINDOW: usize = 1024;
const ONSET_RATIO: f32 = 1.05;
const MIN_FRAMES_BETWEEN_BEATS: u32 = 3;

impl WavAnalyzer {
    pub fn new(mono: Vec<f32>) -> Self {
        WavAnalyzer {
            mono,
            prev_level: 0.0,
            prev_rms: 0.0,
            frames_since_beat: u32::MAX / 2,
            fft_planner: FftPlanner::new(),
        }
    }

    fn window_bounds(&self, center: usize, half: usize) -> (usize, usize) {
        let start = center.saturating_sub(half);
        let end = (center + half).min(self.mono.len());
        (start, end.max(start))
    }

    fn rms(&self, start: usize, end: usize) -> f32 {
        if end <= start {
            return 0.0;
        }
        let sum_sq: f32 = self.mono[start..end].iter().map(|s| s * s).sum();
        (sum_sq / (end - start) as f32).sqrt()
    }

    fn band_energies(&mut self, start: usize, end: usize) -> (f32, f32) {
        if end <= start {
            return (0.0, 0.0);
        }
        let n = (end - start).next_power_of_two().max(64);
        let mut buf: Vec<Complex32> = (0..n)
            .map(|i| {
                let idx = start + i;
                let sample = if idx < end { self.mono[idx] } else { 0.0 };
                Complex32::new(sample, 0.0)
            })
            .collect();
        let fft = self.fft_planner.plan_fft_forward(n);
        fft.process(&mut buf);

        let half = n / 2;
        let bass: f32 = buf[1..half / 2].iter().map(|c| c.norm()).sum();
        let treble: f32 = buf[half / 2..half].iter().map(|c| c.norm()).sum();
        let norm = (n as f32).sqrt().max(1.0);
        ((bass / norm).min(1.0), (treble / norm).min(1.0))
    }
}

impl SignalSource for WavAnalyzer {
    fn signals_for_frame(&mut self, frame: u32, sample_rate: u32) -> FrameSignals {
        let center = ((frame as u64 * sample_rate as u64) / 60) as usize;
        let (start, end) = self.window_bounds(center, RMS_WINDOW / 2);
        let rms = self.rms(start, end);

        // Roughly matches the dynamic range a limited mix sits in.
        let raw_level = (rms * 4.0).min(1.0);
        let level = 0.8 * self.prev_level + 0.2 * raw_level;
        self.prev_level = level;

        let beat_now =
            rms > self.prev_rms * ONSET_RATIO && self.frames_since_beat >= MIN_FRAMES_BETWEEN_BEATS;
        if beat_now {
            self.frames_since_beat = 0;
        } else {
            self.frames_since_beat = self.frames_since_beat.saturating_add(1);
        }
        self.prev_rms = rms;

        let (bass_energy, treble_energy) = self.band_energies(start, end);

        FrameSignals {
            level,
            beat_now,
            bass_energy,
            treble_energy,
            hue_base: hue_for_frame(frame),
        }
    }
}
