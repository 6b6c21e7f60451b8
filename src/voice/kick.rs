//! One-pole resonant sinusoid at 70 Hz with an exponential amplitude
//! envelope (spec §4.4). 70 Hz, not 100 Hz, to keep the fundamental above
//! the audible subharmonic.

use super::{sine_approx, Voice};

const FUNDAMENTAL_HZ: f32 = 70.0;
const DURATION_SECONDS: f32 = 0.5;
const PEAK_AMPLITUDE: f32 = 0.9;

pub struct KickVoice {
    sample_rate: u32,
    phase: f32,
    phase_increment: f32,
    remaining_samples: u32,
    len_samples: u32,
    amplitude: f32,
}

impl KickVoice {
    pub fn new() -> Self {
        KickVoice {
            sample_rate: 0,
            phase: 0.0,
            phase_increment: 0.0,
            remaining_samples: 0,
            len_samples: 0,
            amplitude: 0.0,
        }
    }

    /// Resets envelope/oscillator state and starts a new hit. Re-triggering
    /// an already-active voice is a valid reset, not an error.
    pub fn trigger(&mut self) {
        assert!(self.sample_rate != 0, "kick voice triggered before init");
        self.phase = 0.0;
        self.phase_increment = std::f32::consts::TAU * FUNDAMENTAL_HZ / self.sample_rate as f32;
        self.len_samples = (self.sample_rate as f32 * DURATION_SECONDS) as u32;
        self.remaining_samples = self.len_samples;
        self.amplitude = PEAK_AMPLITUDE;
    }
}

impl Voice for KickVoice {
    fn init(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.phase = 0.0;
        self.phase_increment = 0.0;
        self.remaining_samples = 0;
        self.len_samples = 0;
        self.amplitude = 0.0;
    }

    fn is_active(&self) -> bool {
        self.remaining_samples > 0
    }

    fn process(&mut self, ld: &mut [f32], rd: &mut [f32], n: usize) {
        for i in 0..n {
            if self.remaining_samples == 0 {
                break;
            }
            let elapsed = self.len_samples - self.remaining_samples;
            let t = elapsed as f32 / self.sample_rate as f32;
            let env = (-t * 7.0).exp();
            let mut x = self.phase;
            x = ((x + std::f32::consts::PI) % std::f32::consts::TAU) - std::f32::consts::PI;
            let s = (self.amplitude * env * sine_approx(x)).clamp(-1.0, 1.0);
            ld[i] += s;
            rd[i] += s;
            self.phase += self.phase_increment;
            self.remaining_samples -= 1;
        }
    }
}
