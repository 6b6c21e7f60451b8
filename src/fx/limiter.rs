//! Single-pole envelope-follower peak limiter: instant attack, release
//! coefficient ~0.9995/sample, ceiling 0.98 (spec §4.5). Guarantees
//! `|y| <= 1.0`.

const CEILING: f32 = 0.98;
const RELEASE: f32 = 0.9995;

pub struct Limiter {
    envelope: f32,
}

impl Limiter {
    pub fn new() -> Self {
        Limiter { envelope: 0.0 }
    }

    pub fn process(&mut self, l: &mut [f32], r: &mut [f32]) {
        for i in 0..l.len() {
            let peak = l[i].abs().max(r[i].abs());
            if peak > self.envelope {
                self.envelope = peak; // instant attack
            } else {
                self.envelope *= RELEASE; // slow release
            }

            let gain = if self.envelope > CEILING {
                CEILING / self.envelope
            } else {
                1.0
            };

            l[i] = (l[i] * gain).clamp(-1.0, 1.0);
            r[i] = (r[i] * gain).clamp(-1.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_hot_signal() {
        let mut lim = Limiter::new();
        let mut l = vec![2.5f32; 1024];
        let mut r = vec![-2.5f32; 1024];
        lim.process(&mut l, &mut r);
        assert!(l.iter().all(|&s| s.abs() <= 1.0));
        assert!(r.iter().all(|&s| s.abs() <= 1.0));
    }

    #[test]
    fn leaves_quiet_signal_untouched() {
        let mut lim = Limiter::new();
        let mut l = vec![0.1f32; 1024];
        let mut r = vec![0.1f32; 1024];
        lim.process(&mut l, &mut r);
        assert!((l[0] - 0.1).abs() < 1e-5);
    }
}
