//! Fixed-capacity pool of bass-hit shapes triggered on scale-step
//! boundaries, sized by instantaneous bass amplitude (spec §4.11).

use crate::rng::{magic, Lcg};

use super::color::Hsv;
use super::framebuffer::FrameBuffer;

pub const POOL_CAPACITY: usize = 96;

#[derive(Debug, Clone, Copy)]
struct BassHit {
    x: f32,
    y: f32,
    radius: f32,
    life: i32,
    max_life: i32,
    hue: f32,
    alive: bool,
}

impl BassHit {
    fn dead() -> Self {
        BassHit {
            x: 0.0,
            y: 0.0,
            radius: 0.0,
            life: 0,
            max_life: 1,
            hue: 0.0,
            alive: false,
        }
    }
}

pub struct BassHitPool {
    rng: Lcg,
    slots: [BassHit; POOL_CAPACITY],
    last_saw_step: Option<u32>,
}

impl BassHitPool {
    pub fn from_seed(seed: u32) -> Self {
        BassHitPool {
            rng: Lcg::named(seed, magic::SHAPES),
            slots: [BassHit::dead(); POOL_CAPACITY],
            last_saw_step: None,
        }
    }

    /// `life = floor(amplitude * 2000)` frames (spec §4.11).
    fn life_frames(amplitude: f32) -> i32 {
        (amplitude * 2000.0).floor() as i32
    }

    /// Triggers a new shape only on the leading edge of a new 16th-note
    /// step (a "saw step"), so one bass hit shape spawns per step, not
    /// per frame.
    pub fn maybe_trigger(&mut self, step_index: u32, bass_amplitude: f32, x: f32, y: f32) {
        if self.last_saw_step == Some(step_index) {
            return;
        }
        self.last_saw_step = Some(step_index);
        if bass_amplitude <= 0.01 {
            return;
        }
        if let Some(slot) = self.slots.iter_mut().find(|h| !h.alive) {
            let life = Self::life_frames(bass_amplitude).max(1);
            *slot = BassHit {
                x,
                y,
                radius: 6.0 + bass_amplitude * 40.0,
                life,
                max_life: life,
                hue: self.rng.next_unit(),
                alive: true,
            };
        }
    }

    pub fn update(&mut self) {
        for slot in self.slots.iter_mut().filter(|h| h.alive) {
            slot.life -= 1;
            if slot.life <= 0 {
                slot.alive = false;
            }
        }
    }

    pub fn draw(&self, fb: &mut FrameBuffer) {
        for slot in self.slots.iter().filter(|h| h.alive) {
            let fade = (slot.life as f32 / slot.max_life as f32).clamp(0.0, 1.0);
            let argb = Hsv::new(slot.hue, 0.7, fade).to_argb_u32();
            let radius = (slot.radius * fade) as i32;
            fb.fill_circle(slot.x as i32, slot.y as i32, radius, argb);
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|h| h.alive).count()
    }
}
