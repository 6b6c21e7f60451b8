//! High-frequency noise with a fast decay (spec §4.4), band-limited with a
//! high-pass `biquad` section so it reads as a hat rather than a click.

use biquad::{Biquad, Coefficients, DirectForm1, Q_BUTTERWORTH_F32, ToHertz, Type};

use crate::rng::Lcg;

use super::Voice;

const DURATION_SECONDS: f32 = 0.05;
const NOISE_CUTOFF_HZ: f32 = 7_000.0;
const PEAK_AMPLITUDE: f32 = 0.5;

pub struct HatVoice {
    sample_rate: u32,
    noise_rng: Lcg,
    filter: Option<DirectForm1<f32>>,
    remaining_samples: u32,
    len_samples: u32,
    amplitude: f32,
}

impl HatVoice {
    pub fn new(noise_seed: u32) -> Self {
        HatVoice {
            sample_rate: 0,
            noise_rng: Lcg::seed(noise_seed),
            filter: None,
            remaining_samples: 0,
            len_samples: 0,
            amplitude: 0.0,
        }
    }

    pub fn trigger(&mut self) {
        assert!(self.sample_rate != 0, "hat voice triggered before init");
        self.len_samples = (self.sample_rate as f32 * DURATION_SECONDS) as u32;
        self.remaining_samples = self.len_samples;
        self.amplitude = PEAK_AMPLITUDE;
    }
}

impl Voice for HatVoice {
    fn init(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        let coeffs = Coefficients::<f32>::from_params(
            Type::HighPass,
            (sample_rate as f32).hz(),
            NOISE_CUTOFF_HZ.hz(),
            Q_BUTTERWORTH_F32,
        )
        .expect("valid biquad params");
        self.filter = Some(DirectForm1::<f32>::new(coeffs));
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
            let env = (-t * 60.0).exp();

            let raw_noise = self.noise_rng.next_range(-1.0, 1.0);
            let filtered = filter.run(raw_noise);
            let s = (self.amplitude * env * filtered).clamp(-1.0, 1.0);
            ld[i] += s;
            rd[i] += s;
            self.remaining_samples -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_fast() {
        let mut v = HatVoice::new(3);
        v.init(44_100);
        v.trigger();
        let len = (44_100.0 * DURATION_SECONDS) as usize;
        let mut ld = vec![0.0f32; len];
        let mut rd = vec![0.0f32; len];
        v.process(&mut ld, &mut rd, len);
        assert!(!v.is_active());
    }
}
