//! Fixed-capacity particle pool for explosion bursts, with an optional
//! chaos-mode 8-spoke spiral spawn shape and simple gravity (spec §4.11).

use crate::rng::{magic, Lcg};

use super::color::Hsv;
use super::framebuffer::FrameBuffer;
use super::lut::{lut_cos, lut_sin};

pub const POOL_CAPACITY: usize = 256;
const GRAVITY: f32 = 0.15;
const CHAOS_SPOKES: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: i32,
    max_life: i32,
    hue: f32,
    alive: bool,
}

impl Particle {
    fn dead() -> Self {
        Particle {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            life: 0,
            max_life: 1,
            hue: 0.0,
            alive: false,
        }
    }
}

pub struct ParticlePool {
    rng: Lcg,
    slots: [Particle; POOL_CAPACITY],
}

impl ParticlePool {
    pub fn from_seed(seed: u32) -> Self {
        ParticlePool {
            rng: Lcg::named(seed, magic::PARTICLES),
            slots: [Particle::dead(); POOL_CAPACITY],
        }
    }

    /// Explosion spawn count: `5 + floor(level*15)` (spec §4.11).
    fn spawn_count(level: f32) -> usize {
        5 + (level * 15.0).floor() as usize
    }

    pub fn spawn_explosion(&mut self, x: f32, y: f32, level: f32, chaos: bool) {
        let count = Self::spawn_count(level);
        for i in 0..count {
            let angle = if chaos {
                (i % CHAOS_SPOKES) as f32 * std::f32::consts::TAU / CHAOS_SPOKES as f32
                    + self.rng.next_range(-0.1, 0.1)
            } else {
                self.rng.next_range(0.0, std::f32::consts::TAU)
            };
            let speed = self.rng.next_range(1.5, 5.0);
            let max_life = 20 + self.rng.next_below(30) as i32;
            let hue = self.rng.next_unit();
            if let Some(slot) = self.slots.iter_mut().find(|p| !p.alive) {
                *slot = Particle {
                    x,
                    y,
                    vx: lut_cos(angle) * speed,
                    vy: lut_sin(angle) * speed,
                    life: max_life,
                    max_life,
                    hue,
                    alive: true,
                };
            } else {
                break;
            }
        }
    }

    pub fn update(&mut self) {
        for slot in self.slots.iter_mut().filter(|p| p.alive) {
            slot.vy += GRAVITY;
            slot.x += slot.vx;
            slot.y += slot.vy;
            slot.life -= 1;
            if slot.life <= 0 || slot.y > 620.0 {
                slot.alive = false;
            }
        }
    }

    pub fn draw(&self, fb: &mut FrameBuffer) {
        for slot in self.slots.iter().filter(|p| p.alive) {
            let fade = (slot.life as f32 / slot.max_life as f32).clamp(0.0, 1.0);
            let argb = Hsv::new(slot.hue, 0.9, fade).to_argb_u32();
            fb.set_pixel(slot.x as i32, slot.y as i32, argb);
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.alive).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_count_scales_with_level() {
        assert_eq!(ParticlePool::spawn_count(0.0), 5);
        assert_eq!(ParticlePool::spawn_count(1.0), 20);
    }

    #[test]
    fn pool_never_exceeds_capacity() {
        let mut pool = ParticlePool::from_seed(1);
        for _ in 0..50 {
            pool.spawn_explosion(400.0, 300.0, 1.0, true);
        }
        assert!(pool.active_count() <= POOL_CAPACITY);
    }

    #[test]
    fn particles_die_and_fall() {
        let mut pool = ParticlePool::from_seed(2);
        pool.spawn_explosion(400.0, 300.0, 1.0, false);
        let before = pool.active_count();
        assert!(before > 0);
        for _ in 0..200 {
            pool.update();
        }
        assert_eq!(pool.active_count(), 0);
    }
}
