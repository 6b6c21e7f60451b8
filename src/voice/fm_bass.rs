//! Low-register 2-operator FM voice: ratio 1.5, index 8.0, duration
//! 1.25 s, amplitude 0.45 (spec §4.4).
//!
//! Length is recomputed at every trigger from `sample_rate`; if
//! `sample_rate` is never initialized this yields `len_samples = 0` and
//! silent, progressively "corrupted" output rather than a crash, which is
//! exactly the historical bug spec §9 calls out. The generator asserts
//! every voice is initialized at construction so this path is never live.

use super::{fm_sample, scale_degree_freq, Voice};

const CARRIER_RATIO: f32 = 1.0;
const MOD_RATIO: f32 = 1.5;
const MOD_INDEX: f32 = 8.0;
const DURATION_SECONDS: f32 = 1.25;
const PEAK_AMPLITUDE: f32 = 0.45;

pub struct FmBassVoice {
    sample_rate: u32,
    carrier_phase: f32,
    carrier_increment: f32,
    mod_phase: f32,
    mod_increment: f32,
    remaining_samples: u32,
    len_samples: u32,
    amplitude: f32,
}

impl FmBassVoice {
    pub fn new() -> Self {
        FmBassVoice {
            sample_rate: 0,
            carrier_phase: 0.0,
            carrier_increment: 0.0,
            mod_phase: 0.0,
            mod_increment: 0.0,
            remaining_samples: 0,
            len_samples: 0,
            amplitude: 0.0,
        }
    }

    pub fn trigger(&mut self, root_freq: f32, step_index: i32) {
        assert!(self.sample_rate != 0, "fm_bass voice triggered before init");
        let note_freq = scale_degree_freq(root_freq / 2.0, step_index);
        self.carrier_phase = 0.0;
        self.mod_phase = 0.0;
        self.carrier_increment = note_freq * CARRIER_RATIO / self.sample_rate as f32;
        self.mod_increment = note_freq * MOD_RATIO / self.sample_rate as f32;
        // Recomputed every trigger, from the live sample_rate, per spec §4.4.
        self.len_samples = (self.sample_rate as f32 * DURATION_SECONDS) as u32;
        self.remaining_samples = self.len_samples;
        self.amplitude = PEAK_AMPLITUDE;
    }
}

impl Voice for FmBassVoice {
    fn init(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.carrier_phase = 0.0;
        self.carrier_increment = 0.0;
        self.mod_phase = 0.0;
        self.mod_increment = 0.0;
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
            let env = (-t * 3.0).exp();

            let s = (self.amplitude * env * fm_sample(self.carrier_phase, self.mod_phase, MOD_INDEX))
                .clamp(-1.0, 1.0);
            ld[i] += s;
            rd[i] += s;
            self.carrier_phase += self.carrier_increment;
            self.mod_phase += self.mod_increment;
            self.remaining_samples -= 1;
        }
    }
}
