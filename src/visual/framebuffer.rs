//! 800x600 packed-ARGB pixel buffer: clear, set-pixel, filled circle, and
//! PPM (P6) emission (spec §3, §4.8, §6).

use rayon::prelude::*;

use super::color::Rgba;

pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

pub struct FrameBuffer {
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: vec![0; PIXEL_COUNT],
        }
    }

    /// Fills the whole buffer with `argb`, four pixels at a time per row
    /// (spec §4.8 "SHOULD vectorize 4 pixels at a time"). Rows are
    /// independent, so this is safe to parallelize the way the
    /// work-stealing slice model in spec §5 expects.
    pub fn clear(&mut self, argb: u32) {
        self.pixels
            .par_chunks_mut(WIDTH)
            .for_each(|row| {
                let mut chunks = row.chunks_exact_mut(4);
                for quad in &mut chunks {
                    quad[0] = argb;
                    quad[1] = argb;
                    quad[2] = argb;
                    quad[3] = argb;
                }
                for px in chunks.into_remainder() {
                    *px = argb;
                }
            });
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, argb: u32) {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return; // silent no-op, spec §4.8
        }
        self.pixels[y as usize * WIDTH + x as usize] = argb;
    }

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return None;
        }
        Some(self.pixels[y as usize * WIDTH + x as usize])
    }

    /// Alpha-blends `argb` onto the existing pixel. Opaque writers should
    /// use `set_pixel` instead; this path exists for semi-transparent
    /// overlays (spec §4.8/§9: default alpha is 255, blend is opt-in).
    pub fn blend_pixel(&mut self, x: i32, y: i32, argb: u32) {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return;
        }
        let idx = y as usize * WIDTH + x as usize;
        let src = Rgba::from_argb_u32(argb);
        if src.a == 255 {
            self.pixels[idx] = argb;
            return;
        }
        if src.a == 0 {
            return;
        }
        let dst = Rgba::from_argb_u32(self.pixels[idx]);
        let a = src.a as f32 / 255.0;
        let blend = |s: u8, d: u8| -> u8 { ((s as f32 * a) + (d as f32 * (1.0 - a))).round() as u8 };
        let out = Rgba::new(blend(src.r, dst.r), blend(src.g, dst.g), blend(src.b, dst.b), 255);
        self.pixels[idx] = out.to_argb_u32();
    }

    /// Filled disc: `x*x + y*y <= r*r` relative to center, boundary
    /// inclusive (spec §4.8).
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, argb: u32) {
        if radius < 0 {
            return;
        }
        let r2 = radius * radius;
        for dy in -radius..=radius {
            let row_span = ((r2 - dy * dy).max(0) as f64).sqrt() as i32;
            for dx in -row_span..=row_span {
                self.set_pixel(cx + dx, cy + dy, argb);
            }
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Emits the buffer as a raw P6 PPM (RGB, no alpha), row-major
    /// top-to-bottom (spec §6).
    pub fn write_ppm<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let header = format!("P6\n{WIDTH} {HEIGHT}\n255\n");
        writer.write_all(header.as_bytes())?;
        let mut rgb_bytes = Vec::with_capacity(PIXEL_COUNT * 3);
        for &px in &self.pixels {
            let rgba = Rgba::from_argb_u32(px);
            rgb_bytes.push(rgba.r);
            rgb_bytes.push(rgba.g);
            rgb_bytes.push(rgba.b);
        }
        writer.write_all(&rgb_bytes)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_fills_every_pixel() {
        let mut fb = FrameBuffer::new();
        fb.clear(0xFF10_2030);
        assert!(fb.pixels().iter().all(|&p| p == 0xFF10_2030));
    }

    #[test]
    fn set_pixel_out_of_bounds_is_noop() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(-1, -1, 0xFFFFFFFF);
        fb.set_pixel(9000, 9000, 0xFFFFFFFF);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn circle_is_boundary_inclusive() {
        let mut fb = FrameBuffer::new();
        fb.fill_circle(400, 300, 0, 0xFFFFFFFF);
        assert_eq!(fb.get_pixel(400, 300), Some(0xFFFFFFFF));
    }

    #[test]
    fn ppm_header_matches_spec() {
        let fb = FrameBuffer::new();
        let mut buf = Vec::new();
        fb.write_ppm(&mut buf).unwrap();
        assert!(buf.starts_with(b"P6\n800 600\n255\n"));
        let header_len = b"P6\n800 600\n255\n".len();
        assert_eq!(buf.len(), header_len + PIXEL_COUNT * 3);
    }

    #[test]
    fn blend_pixel_respects_alpha() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(0, 0, Rgba::new(0, 0, 0, 255).to_argb_u32());
        fb.blend_pixel(0, 0, Rgba::new(255, 255, 255, 128).to_argb_u32());
        let out = Rgba::from_argb_u32(fb.get_pixel(0, 0).unwrap());
        assert!(out.r > 100 && out.r < 155);
    }
}
