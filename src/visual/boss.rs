//! Seed-selected boss formation (one of eight) made of rotating polygon
//! shapes (spec §4.10).

use crate::rng::{magic, Lcg};

use super::color::Hsv;
use super::framebuffer::FrameBuffer;
use super::lut::{lut_cos, lut_sin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formation {
    StarBurst,
    Cluster,
    Wing,
    Spiral,
    Grid,
    RandomChaos,
    Layered,
    Pulsing,
}

impl Formation {
    const ALL: [Formation; 8] = [
        Formation::StarBurst,
        Formation::Cluster,
        Formation::Wing,
        Formation::Spiral,
        Formation::Grid,
        Formation::RandomChaos,
        Formation::Layered,
        Formation::Pulsing,
    ];

    fn from_index(i: usize) -> Formation {
        Formation::ALL[i % Formation::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonShape {
    Hexagon,
    Square,
    Triangle,
    Diamond,
    Star,
}

impl PolygonShape {
    fn sides(self) -> usize {
        match self {
            PolygonShape::Hexagon => 6,
            PolygonShape::Square => 4,
            PolygonShape::Triangle => 3,
            PolygonShape::Diamond => 4,
            PolygonShape::Star => 10,
        }
    }

    fn from_index(i: usize) -> PolygonShape {
        match i % 5 {
            0 => PolygonShape::Hexagon,
            1 => PolygonShape::Square,
            2 => PolygonShape::Triangle,
            3 => PolygonShape::Diamond,
            _ => PolygonShape::Star,
        }
    }
}

struct BossUnit {
    shape: PolygonShape,
    offset_x: f32,
    offset_y: f32,
    radius: f32,
    hue: f32,
    phase: f32,
}

pub struct Boss {
    formation: Formation,
    units: Vec<BossUnit>,
}

impl Boss {
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = Lcg::named(seed, magic::BOSS);
        let formation = Formation::from_index(rng.next_below(8) as usize);
        let unit_count = 3 + rng.next_below(10) as usize;

        let mut units = Vec::with_capacity(unit_count);
        for i in 0..unit_count {
            let shape = PolygonShape::from_index(rng.next_below(5) as usize);
            let (offset_x, offset_y) = Self::formation_offset(formation, i, unit_count, &mut rng);
            let radius = 15.0 + rng.next_unit() * 25.0;
            let hue = rng.next_unit();
            let phase = rng.next_unit() * std::f32::consts::TAU;
            units.push(BossUnit {
                shape,
                offset_x,
                offset_y,
                radius,
                hue,
                phase,
            });
        }
        Boss { formation, units }
    }

    fn formation_offset(formation: Formation, index: usize, unit_count: usize, rng: &mut Lcg) -> (f32, f32) {
        let i = index as f32;
        match formation {
            Formation::StarBurst => {
                let angle = i * std::f32::consts::TAU / unit_count as f32;
                (lut_cos(angle) * 80.0, lut_sin(angle) * 80.0)
            }
            Formation::Cluster => (rng.next_range(-40.0, 40.0), rng.next_range(-40.0, 40.0)),
            Formation::Wing => (i * 30.0 - 75.0, (i - 2.5).abs() * 12.0),
            Formation::Spiral => {
                let angle = i * 1.3;
                let r = 10.0 + i * 15.0;
                (lut_cos(angle) * r, lut_sin(angle) * r)
            }
            Formation::Grid => {
                let col = (index % 3) as f32;
                let row = (index / 3) as f32;
                (col * 50.0 - 50.0, row * 50.0 - 25.0)
            }
            Formation::RandomChaos => (rng.next_range(-100.0, 100.0), rng.next_range(-60.0, 60.0)),
            Formation::Layered => (0.0, i * 20.0 - 50.0),
            Formation::Pulsing => {
                let angle = i * std::f32::consts::TAU / unit_count as f32;
                (lut_cos(angle) * 50.0, lut_sin(angle) * 50.0)
            }
        }
    }

    pub fn draw(&self, fb: &mut FrameBuffer, frame: u32, level: f32) {
        let cx = 650.0;
        let cy = 140.0;
        let pulse = if self.formation == Formation::Pulsing {
            1.0 + lut_sin(frame as f32 * 0.08) * 0.3
        } else {
            1.0
        };

        for unit in &self.units {
            let ux = cx + unit.offset_x;
            let uy = cy + unit.offset_y;
            let rotation = unit.phase + frame as f32 * 0.04;
            let radius = unit.radius * pulse * (0.8 + level * 0.2);
            let argb = Hsv::new(unit.hue, 0.8, (0.7 + level * 0.3).min(1.0)).to_argb_u32();
            draw_polygon(fb, ux, uy, radius, unit.shape.sides(), rotation, argb);
        }
    }
}

/// Draws an n-gon outline using the shared sin/cos LUT for rotation, one
/// short line segment per edge.
fn draw_polygon(fb: &mut FrameBuffer, cx: f32, cy: f32, radius: f32, sides: usize, rotation: f32, argb: u32) {
    let mut prev: Option<(f32, f32)> = None;
    for i in 0..=sides {
        let angle = rotation + (i % sides) as f32 * std::f32::consts::TAU / sides as f32;
        let x = cx + lut_cos(angle) * radius;
        let y = cy + lut_sin(angle) * radius;
        if let Some((px, py)) = prev {
            draw_line(fb, px, py, x, y, argb);
        }
        prev = Some((x, y));
    }
}

fn draw_line(fb: &mut FrameBuffer, x0: f32, y0: f32, x1: f32, y1: f32, argb: u32) {
    let steps = ((x1 - x0).abs().max((y1 - y0).abs())) as i32 + 1;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        fb.set_pixel(x.round() as i32, y.round() as i32, argb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boss_is_deterministic() {
        let a = Boss::from_seed(12345);
        let b = Boss::from_seed(12345);
        assert_eq!(a.formation, b.formation);
        assert_eq!(a.units.len(), b.units.len());
    }

    #[test]
    fn unit_count_is_in_declared_range() {
        for seed in 0..50u32 {
            let boss = Boss::from_seed(seed);
            assert!(boss.units.len() >= 3 && boss.units.len() <= 12);
        }
    }

    #[test]
    fn draw_does_not_panic() {
        let boss = Boss::from_seed(9);
        let mut fb = FrameBuffer::new();
        boss.draw(&mut fb, 0, 0.5);
        boss.draw(&mut fb, 5000, 1.0);
    }
}
