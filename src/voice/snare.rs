//! Short band-limited noise burst mixed with a 180 Hz tonal component
//! (spec §4.4). The noise is filtered with a low-pass `biquad` section so
//! it reads as a snare body rather than full-bandwidth hiss.

use biquad::{Biquad, Coefficients, DirectForm1, Q_BUTTERWORTH_F32, ToHertz, Type};

use crate::rng::Lcg;

use super::{sine_approx, Voice};

const TONE_HZ: f32 = 180.0;
const DURATION_SECONDS: f32 = 0.2;
const NOISE_CUTOFF_HZ: f32 = 2_500.0;
const NOISE_MIX: f32 = 0.6;
const TONE_MIX: f32 = 0.4;
const PEAK_AMPLITUDE: f32 = 0.8;

pub struct SnareVoice {
    sample_rate: u32,
    noise_rng: Lcg,
    filter: Option<DirectForm1<f32>>,
    phase: f32,
    phase_increment: f32,
    remaining_samples: u32,
    len_samples: u32,
    amplitude: f32,
}

impl SnareVoice {
    pub fn new(noise_seed: u32) -> Self {
        SnareVoice {
            sample_rate: 0,
            noise_rng: Lcg::seed(noise_seed),
            filter: None,
            phase: 0.0,
            phase_increment: 0.0,
            remaining_samples: 0,
            len_samples: 0,
            amplitude: 0.0,
        }
    }

    pub fn trigger(&mut self) {
        assert!(self.sample_rate != 0, "snare voice triggered before init");
        self.phase = 0.0;
        self.phase_increment = std::f32::consts::TAU * TONE_HZ / self.sample_rate as f32;
        self.len_samples = (self.sample_rate as f32 * DURATION_SECONDS) as u32;
        self.remaining_samples = self.len_samples;
        self.amplitude = PEAK_AMPLITUDE;
    }
}

impl Voice for SnareVoice {
    fn init(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        let coeffs = Coefficients::<f32>::from_params(
            Type::LowPass,
            (sample_rate as f32).hz(),
            NOISE_CUTOFF_HZ.hz(),
            Q_BUTTERWORTH_F32,
        )
        .expect("valid biquad params");
        self.filter = Some(DirectForm1::<f32>::new(coeffs));
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
        let filter = match &mut self.filter {
            Some(f) => f,
            None => return,
        };
        for i in 0..n {
            if self.remaining_samples == 0 {
                break;
            }
            let elapsed = self.len_samples - self.remaining_samples;
            let t = elapsed as f32 / self.sample_rate as f32;
            let env = (-t * 18.0).exp();

            let raw_noise = self.noise_rng.next_range(-1.0, 1.0);
            let filtered_noise = filter.run(raw_noise);

            let mut x = self.phase;
            x = ((x + std::f32::consts::PI) % std::f32::consts::TAU) - std::f32::consts::PI;
            let tone = sine_approx(x);

            let s = (self.amplitude * env * (NOISE_MIX * filtered_noise + TONE_MIX * tone)).clamp(-1.0, 1.0);
            ld[i] += s;
            rd[i] += s;
            self.phase += self.phase_increment;
            self.remaining_samples -= 1;
        }
    }
}
