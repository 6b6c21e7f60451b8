//! Fixed-capacity projectile pool: deterministic spawn rate scaled by
//! loudness, simple ballistic update (spec §4.11).

use crate::rng::{magic, Lcg};

use super::color::Hsv;
use super::framebuffer::FrameBuffer;
use super::glyph::draw_glyph_opaque;

pub const POOL_CAPACITY: usize = 64;
const GLYPHS: [char; 9] = ['o', 'x', '-', '0', '*', '+', '>', '=', '~'];

#[derive(Debug, Clone, Copy)]
struct Projectile {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    glyph: char,
    hue: f32,
    alive: bool,
}

impl Projectile {
    fn dead() -> Self {
        Projectile {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            glyph: 'o',
            hue: 0.0,
            alive: false,
        }
    }
}

pub struct ProjectilePool {
    rng: Lcg,
    slots: [Projectile; POOL_CAPACITY],
    spawn_accumulator: f32,
}

impl ProjectilePool {
    pub fn from_seed(seed: u32) -> Self {
        ProjectilePool {
            rng: Lcg::named(seed, magic::PROJECTILES),
            slots: [Projectile::dead(); POOL_CAPACITY],
            spawn_accumulator: 0.0,
        }
    }

    /// Spawn rate per frame: `clip(3, 20 - floor(level*17), 20)` frames
    /// between spawns (spec §4.11) — lower loudness means a slower rate.
    fn frames_between_spawns(level: f32) -> f32 {
        let raw = 20.0 - (level * 17.0).floor();
        raw.clamp(3.0, 20.0)
    }

    fn spawn_one(&mut self, origin_x: f32, origin_y: f32) {
        if let Some(slot) = self.slots.iter_mut().find(|p| !p.alive) {
            let glyph = GLYPHS[self.rng.next_below(GLYPHS.len() as u32) as usize];
            let angle = self.rng.next_range(-0.3, 0.3);
            let speed = self.rng.next_range(4.0, 9.0);
            *slot = Projectile {
                x: origin_x,
                y: origin_y,
                vx: angle.sin() * speed,
                vy: -angle.cos() * speed,
                glyph,
                hue: self.rng.next_unit(),
                alive: true,
            };
        }
    }

    pub fn update(&mut self, level: f32, origin_x: f32, origin_y: f32) {
        let interval = Self::frames_between_spawns(level);
        self.spawn_accumulator += 1.0;
        if self.spawn_accumulator >= interval {
            self.spawn_accumulator -= interval;
            self.spawn_one(origin_x, origin_y);
        }

        for slot in self.slots.iter_mut().filter(|p| p.alive) {
            slot.x += slot.vx;
            slot.y += slot.vy;
            if slot.y < -16.0 || slot.y > 616.0 || slot.x < -16.0 || slot.x > 816.0 {
                slot.alive = false;
            }
        }
    }

    pub fn draw(&self, fb: &mut FrameBuffer, level: f32) {
        for slot in self.slots.iter().filter(|p| p.alive) {
            let argb = Hsv::new(slot.hue, 0.9, (0.8 + level * 0.2).min(1.0)).to_argb_u32();
            draw_glyph_opaque(fb, slot.x as i32, slot.y as i32, slot.glyph, argb);
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
    fn spawn_rate_clips_to_bounds() {
        assert_eq!(ProjectilePool::frames_between_spawns(0.0), 20.0);
        assert_eq!(ProjectilePool::frames_between_spawns(1.0), 3.0);
    }

    #[test]
    fn pool_never_exceeds_capacity() {
        let mut pool = ProjectilePool::from_seed(4);
        for _ in 0..2000 {
            pool.update(1.0, 400.0, 500.0);
        }
        assert!(pool.active_count() <= POOL_CAPACITY);
    }

    #[test]
    fn deterministic_across_runs() {
        let mut a = ProjectilePool::from_seed(8);
        let mut b = ProjectilePool::from_seed(8);
        for _ in 0..100 {
            a.update(0.7, 400.0, 500.0);
            b.update(0.7, 400.0, 500.0);
        }
        assert_eq!(a.active_count(), b.active_count());
    }
}
