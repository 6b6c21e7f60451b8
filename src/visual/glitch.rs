//! Full-frame glitch overlay: character substitution, matrix-cascade, and
//! digital-noise sub-effects, intensity driven by audio and a slow sine
//! drift (spec §4.12).

use crate::rng::{magic, Lcg};

use super::color::{Hsv, Rgba};
use super::framebuffer::FrameBuffer;
use super::glyph::draw_glyph_blended;
use super::lut::lut_sin;

const CELL_PX: i32 = 8;
const SUBSTITUTION_GLYPHS: [char; 6] = ['#', '%', '@', '*', '/', '\\'];
const NOISE_GLYPHS: [char; 4] = ['.', ':', '_', '-'];

/// Per-(x,y,frame) PRNG, independent from every other stream so glitch
/// noise never perturbs simulation state (spec §4.12, §9).
fn pixel_glitch_stream(seed: u32, x: i32, y: i32, frame: u32) -> Lcg {
    let positional = (x as u32).wrapping_mul(92821) ^ (y as u32).wrapping_mul(68917) ^ frame.wrapping_mul(2246822519);
    Lcg::named(seed ^ positional, magic::GLITCH)
}

/// `base 0.1 + audio_level + beat_explosion + slow sine drift` (spec §4.12).
/// `beat_explosion` is 1.0 for 3 frames after any beat, so the scalar
/// ranges over `[0, 3]`.
pub fn glitch_intensity(level: f32, beat_explosion: f32, frame: u32) -> f32 {
    let drift = lut_sin(frame as f32 * 0.01) * 0.05;
    (0.1 + level + beat_explosion + drift).clamp(0.0, 3.0)
}

pub fn draw_overlay(fb: &mut FrameBuffer, seed: u32, frame: u32, level: f32, beat_explosion: f32) {
    let intensity = glitch_intensity(level, beat_explosion, frame);
    if intensity <= 0.02 {
        return;
    }

    let mut y = 0;
    while y < 600 {
        let mut x = 0;
        while x < 800 {
            let mut rng = pixel_glitch_stream(seed, x, y, frame);
            if rng.next_unit() < intensity * 0.15 {
                let roll = rng.next_unit();
                if roll < 0.34 {
                    substitution_glitch(fb, &mut rng, x, y, intensity);
                } else if roll < 0.67 {
                    matrix_cascade_glitch(fb, &mut rng, x, y, frame, intensity);
                } else {
                    digital_noise_glitch(fb, &mut rng, x, y, intensity);
                }
            }
            x += CELL_PX;
        }
        y += CELL_PX;
    }
}

fn substitution_glitch(fb: &mut FrameBuffer, rng: &mut Lcg, x: i32, y: i32, intensity: f32) {
    let ch = SUBSTITUTION_GLYPHS[rng.next_below(SUBSTITUTION_GLYPHS.len() as u32) as usize];
    let hue = rng.next_unit();
    let shade = (intensity / 3.0).clamp(0.0, 1.0);
    let alpha = (120.0 + shade * 135.0) as u8;
    let rgba = Hsv::new(hue, 1.0, 1.0).to_rgba();
    draw_glyph_blended(fb, x, y, ch, Rgba::new(rgba.r, rgba.g, rgba.b, alpha));
}

fn matrix_cascade_glitch(fb: &mut FrameBuffer, rng: &mut Lcg, x: i32, y: i32, frame: u32, intensity: f32) {
    let drop_len = 1 + rng.next_below(6) as i32;
    let shade = (intensity / 3.0).clamp(0.0, 1.0);
    for i in 0..drop_len {
        let cy = y + i * CELL_PX;
        if cy >= 600 {
            break;
        }
        let ch = NOISE_GLYPHS[((frame as i32 + i) as usize) % NOISE_GLYPHS.len()];
        let fade = 1.0 - (i as f32 / drop_len as f32);
        let alpha = (shade * 200.0 * fade) as u8;
        draw_glyph_blended(fb, x, cy, ch, Rgba::new(60, 255, 90, alpha));
    }
}

fn digital_noise_glitch(fb: &mut FrameBuffer, rng: &mut Lcg, x: i32, y: i32, intensity: f32) {
    let shade = (intensity / 3.0).clamp(0.0, 1.0);
    for dy in 0..CELL_PX {
        for dx in 0..CELL_PX {
            if rng.next_unit() < 0.5 {
                let v = rng.next_below(256) as u8;
                let alpha = (shade * 180.0) as u8;
                fb.blend_pixel(x + dx, y + dy, Rgba::new(v, v, v, alpha).to_argb_u32());
            }
        }
    }
}
