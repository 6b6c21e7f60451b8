//! Two simultaneous layers: a bottom ASM-style tile terrain and a top
//! sine-wave band (spec §4.9).

use crate::rng::{magic, Lcg};

use super::color::Hsv;
use super::framebuffer::FrameBuffer;
use super::glyph::draw_glyph_opaque;
use super::lut::lut_sin;

pub const TILE_COUNT: usize = 64;
pub const TILE_SIZE_PX: i32 = 16; // power of two, so offsets use bitwise AND.
const CELL_PX: i32 = 8;
const BOTTOM_BAND_TOP: i32 = 420;
const BOTTOM_BAND_BOTTOM: i32 = 600;
const TOP_BAND_TOP: i32 = 320;
const TOP_BAND_BOTTOM: i32 = 420;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileType {
    Flat,
    Wall,
    SlopeUp,
    SlopeDown,
    Gap,
}

impl TileType {
    /// Weighted choice: FLAT 40%, WALL 20%, SLOPE_UP 15%, SLOPE_DOWN 15%, GAP 10%.
    fn weighted_choice(rng: &mut Lcg) -> TileType {
        let r = rng.next_unit();
        if r < 0.40 {
            TileType::Flat
        } else if r < 0.60 {
            TileType::Wall
        } else if r < 0.75 {
            TileType::SlopeUp
        } else if r < 0.90 {
            TileType::SlopeDown
        } else {
            TileType::Gap
        }
    }

    fn base_hue(self) -> f32 {
        match self {
            TileType::Flat => 0.60,     // blue, rainbow-drifted below
            TileType::Wall => 0.33,     // green -> yellow across tile height
            TileType::SlopeUp => 0.83,  // magenta
            TileType::SlopeDown => 0.50, // cyan
            TileType::Gap => 0.08,      // orange
        }
    }
}

pub struct Terrain {
    tiles: [TileType; TILE_COUNT],
}

impl Terrain {
    /// Builds the fixed 64-tile pattern once per segment using the
    /// terrain PRNG (seed XOR 0x7E44A1), with weighted choice and
    /// variable-length runs (spec §4.9).
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = Lcg::named(seed, magic::TERRAIN);
        let mut tiles = [TileType::Flat; TILE_COUNT];
        let mut i = 0;
        while i < TILE_COUNT {
            let tile_type = TileType::weighted_choice(&mut rng);
            let run_len = (2 + rng.next_below(5)) as usize;
            for slot in tiles.iter_mut().skip(i).take(run_len.min(TILE_COUNT - i)) {
                *slot = tile_type;
            }
            i += run_len;
        }
        Terrain { tiles }
    }

    fn tile_at(&self, tile_index: usize) -> TileType {
        self.tiles[tile_index % TILE_COUNT]
    }

    fn scroll_speed(frame: u32, level: f32) -> i32 {
        (frame as f32 * 2.0 * (1.0 + 3.0 * level)).floor() as i32
    }

    fn char_set(h: u32, level: f32, frame: u32) -> char {
        let dense_threshold = 40.0 + level * 100.0 + (frame / 8) as f32;
        let medium_threshold = dense_threshold + 80.0;
        let hf = h as f32;
        if hf < dense_threshold {
            [ '#', '@', '%', '*' ][(h as usize) % 4]
        } else if hf < medium_threshold {
            [ '=', '+', '~', ':' ][(h as usize) % 4]
        } else {
            [ '-', '.', ',', '_' ][(h as usize) % 4]
        }
    }

    pub fn draw_bottom(&self, fb: &mut FrameBuffer, frame: u32, level: f32) {
        let speed = Self::scroll_speed(frame, level);
        let tile_offset = speed & (TILE_SIZE_PX - 1);
        let scroll_tiles = (speed / TILE_SIZE_PX) as usize;

        let mut screen_x = -tile_offset;
        let mut col_index = 0usize;
        while screen_x < 800 {
            let tile_index = (scroll_tiles + col_index / (TILE_SIZE_PX / CELL_PX) as usize) % TILE_COUNT;
            let tile_type = self.tile_at(tile_index);

            let mut y = BOTTOM_BAND_TOP;
            while y < BOTTOM_BAND_BOTTOM {
                let y_in_tile = (y - BOTTOM_BAND_TOP) as f32 / (BOTTOM_BAND_BOTTOM - BOTTOM_BAND_TOP) as f32;
                let hue = match tile_type {
                    TileType::Flat => (tile_type.base_hue() + screen_x as f32 * 0.0006 + frame as f32 * 0.0009).rem_euclid(1.0),
                    TileType::Wall => {
                        let shifted = tile_type.base_hue() - 0.16 * y_in_tile + level * 0.1;
                        shifted.rem_euclid(1.0)
                    }
                    _ => tile_type.base_hue(),
                };
                let sat = (0.9 + level * 0.1).clamp(0.0, 1.0);
                let val = (0.8 + level * 0.2).clamp(0.0, 1.0);
                let argb = Hsv::new(hue, sat, val).to_argb_u32();

                let hx = (screen_x + scroll_tiles as i32 * TILE_SIZE_PX) as u32;
                let hy = y as u32;
                let h = ((hx.wrapping_mul(13).wrapping_add(hy.wrapping_mul(7))) ^ (hx >> 3)) & 0xFF;
                let ch = Self::char_set(h, level, frame);

                draw_glyph_opaque(fb, screen_x, y, ch, argb);
                y += CELL_PX;
            }

            screen_x += CELL_PX;
            col_index += 1;
        }
    }

    /// Top layer: an ASCII band whose per-column height follows a slow
    /// sine wave in frame and x, hue = base + 0.3, 2x horizontal scroll.
    pub fn draw_top(&self, fb: &mut FrameBuffer, frame: u32, level: f32, hue_base: f32) {
        let scroll = frame as f32 * 2.0 * 0.02;
        let band_chars = ['^', '=', '~', '-', '_'];
        let mut x = 0;
        while x < 800 {
            let angle = x as f32 * 0.02 + scroll;
            let wave = lut_sin(angle);
            let height = ((wave * 0.5 + 0.5) * (TOP_BAND_BOTTOM - TOP_BAND_TOP) as f32) as i32;
            let y = TOP_BAND_BOTTOM - height;

            let intensity = (wave * 0.5 + 0.5 + level * 0.2).clamp(0.0, 1.0);
            let band_index = ((intensity * band_chars.len() as f32) as usize).min(band_chars.len() - 1);
            let ch = band_chars[band_index];

            let hue = (hue_base + 0.3).rem_euclid(1.0);
            let sat = 0.8;
            let val = (0.7 + level * 0.3).clamp(0.0, 1.0);
            let argb = Hsv::new(hue, sat, val).to_argb_u32();

            draw_glyph_opaque(fb, x, y.clamp(TOP_BAND_TOP, TOP_BAND_BOTTOM - CELL_PX), ch, argb);
            x += CELL_PX;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_pattern_is_deterministic() {
        let a = Terrain::from_seed(999);
        let b = Terrain::from_seed(999);
        assert_eq!(a.tiles, b.tiles);
    }

    #[test]
    fn terrain_has_64_tiles_filled() {
        let t = Terrain::from_seed(5);
        assert_eq!(t.tiles.len(), 64);
    }

    #[test]
    fn draw_does_not_panic_across_frames() {
        let t = Terrain::from_seed(42);
        let mut fb = FrameBuffer::new();
        for frame in [0u32, 1, 300, 900] {
            t.draw_bottom(&mut fb, frame, 0.5);
            t.draw_top(&mut fb, frame, 0.5, 0.1);
        }
    }
}
