//! Seed-driven ASCII ship: nose/body/wings/trail components, audio-reactive
//! sway/bob/dodge (spec §4.10).

use crate::rng::{magic, Lcg};

use super::color::Hsv;
use super::framebuffer::FrameBuffer;
use super::glyph::draw_glyph_opaque;
use super::lut::lut_sin;

const NOSE_GLYPHS: [char; 4] = ['^', '/', '#', '*'];
const BODY_GLYPHS: [char; 4] = ['#', '@', '=', '%'];
const WING_GLYPHS: [char; 4] = ['<', '>', '/', '\\'];
const TRAIL_GLYPHS: [char; 4] = ['.', ',', '-', ':'];

pub struct Ship {
    nose: char,
    body: char,
    wings: char,
    trail: char,
    size_mult: i32,
    primary_hue: f32,
    secondary_hue: f32,
}

impl Ship {
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = Lcg::named(seed, magic::SHIP);
        let nose = NOSE_GLYPHS[rng.next_below(4) as usize];
        let body = BODY_GLYPHS[rng.next_below(4) as usize];
        let wings = WING_GLYPHS[rng.next_below(4) as usize];
        let trail = TRAIL_GLYPHS[rng.next_below(4) as usize];
        let size_mult = 1 + rng.next_below(3) as i32;
        let primary_hue = rng.next_unit();
        let secondary_hue = (primary_hue + 0.33 + rng.next_unit() * 0.2).rem_euclid(1.0);
        Ship {
            nose,
            body,
            wings,
            trail,
            size_mult,
            primary_hue,
            secondary_hue,
        }
    }

    /// Draws the ship near its canonical position (~25% from the left),
    /// with sway/bob driven by frame time and dodge driven by `level`
    /// (loudness). `bass` is accepted for signature symmetry with the
    /// other draw calls but does not currently drive ship motion.
    pub fn draw(&self, fb: &mut FrameBuffer, frame: u32, level: f32, _bass: f32) {
        let cell = 8 * self.size_mult;
        let base_x = 200;
        let base_y = 300;

        let sway = (lut_sin(frame as f32 * 0.05) * 40.0) as i32;
        let bob = (lut_sin(frame as f32 * 0.07) * 30.0) as i32;
        let dodge = (35.0 * level) as i32;

        let cx = base_x + sway + dodge;
        let cy = base_y + bob;

        let primary_argb = Hsv::new(self.primary_hue, 0.85, (0.8 + level * 0.2).min(1.0)).to_argb_u32();
        let secondary_argb = Hsv::new(self.secondary_hue, 0.75, 0.8).to_argb_u32();

        draw_glyph_opaque(fb, cx, cy - cell, self.nose, primary_argb);
        draw_glyph_opaque(fb, cx, cy, self.body, primary_argb);
        draw_glyph_opaque(fb, cx - cell, cy, self.wings, secondary_argb);
        draw_glyph_opaque(fb, cx + cell, cy, self.wings, secondary_argb);
        for i in 1..=3 {
            draw_glyph_opaque(fb, cx, cy + cell * i, self.trail, secondary_argb);
        }
    }
}
