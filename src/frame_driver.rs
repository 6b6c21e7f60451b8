//! Per-frame orchestration: clear, draw terrain/ship/boss/particles/
//! projectiles/bass-hits, glitch overlay, emit PPM (spec §4.13).

use crate::analyzer::{FrameSignals, SignalSource};
use crate::music_time::MusicTime;
use crate::visual::bass_hit::BassHitPool;
use crate::visual::boss::Boss;
use crate::visual::color::Hsv;
use crate::visual::framebuffer::FrameBuffer;
use crate::visual::glitch;
use crate::visual::particle::ParticlePool;
use crate::visual::projectile::ProjectilePool;
use crate::visual::ship::Ship;
use crate::visual::terrain::Terrain;

pub const FPS: u32 = 60;

pub struct FrameDriver {
    seed: u32,
    music_time: MusicTime,
    terrain: Terrain,
    ship: Ship,
    boss: Boss,
    projectiles: ProjectilePool,
    particles: ParticlePool,
    bass_hits: BassHitPool,
    prev_beat_now: bool,
    beat_explosion_hold: u32,
}

impl FrameDriver {
    pub fn new(seed: u32) -> Self {
        FrameDriver {
            seed,
            music_time: MusicTime::from_seed(seed),
            terrain: Terrain::from_seed(seed),
            ship: Ship::from_seed(seed),
            boss: Boss::from_seed(seed),
            projectiles: ProjectilePool::from_seed(seed),
            particles: ParticlePool::from_seed(seed),
            bass_hits: BassHitPool::from_seed(seed),
            prev_beat_now: false,
            beat_explosion_hold: 0,
        }
    }

    pub fn total_frames(&self) -> u32 {
        self.music_time.total_frames()
    }

    /// Renders one frame into `fb`, reading `signals` for this frame's
    /// audio state. `fb` is reused across calls by the caller; `clear` at
    /// the top wipes any prior content.
    pub fn render_frame<S: SignalSource>(
        &mut self,
        fb: &mut FrameBuffer,
        signals_source: &mut S,
        frame: u32,
    ) -> FrameSignals {
        let signals = signals_source.signals_for_frame(frame, self.music_time.sample_rate);

        fb.clear(Hsv::new(signals.hue_base, 0.15, 0.08).to_argb_u32());

        self.terrain.draw_bottom(fb, frame, signals.level);
        self.terrain.draw_top(fb, frame, signals.level, signals.hue_base);

        let sample_index = (frame as u64 * self.music_time.sample_rate as u64 / FPS as u64) as u32;
        let step_index = sample_index / self.music_time.step_samples.max(1);
        self.bass_hits
            .maybe_trigger(step_index, signals.bass_energy, 400.0, 300.0);
        self.bass_hits.update();
        self.bass_hits.draw(fb);

        self.particles.update();
        if signals.beat_now && !self.prev_beat_now {
            let chaos = signals.bass_energy > 0.7;
            self.particles
                .spawn_explosion(400.0, 300.0, signals.level, chaos);
        }
        self.particles.draw(fb);

        self.projectiles.update(signals.level, 120.0, 440.0);
        self.projectiles.draw(fb, signals.level);

        self.boss.draw(fb, frame, signals.level);
        self.ship.draw(fb, frame, signals.level, signals.bass_energy);

        if signals.beat_now {
            self.beat_explosion_hold = 3;
        } else if self.beat_explosion_hold > 0 {
            self.beat_explosion_hold -= 1;
        }
        let beat_explosion = if self.beat_explosion_hold > 0 { 1.0 } else { 0.0 };
        glitch::draw_overlay(fb, self.seed, frame, signals.level, beat_explosion);

        self.prev_beat_now = signals.beat_now;
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Timeline;
    use crate::analyzer::TimelineAnalyzer;

    #[test]
    fn renders_requested_frame_range_without_panicking() {
        let seed = 0xABCDEF01;
        let timeline = Timeline::build(seed);
        let mut driver = FrameDriver::new(seed);
        let mut analyzer = TimelineAnalyzer::new(&timeline);
        let mut fb = FrameBuffer::new();
        let total = driver.total_frames();
        assert!(total > 0);
        for frame in 0..total.min(30) {
            driver.render_frame(&mut fb, &mut analyzer, frame);
        }
    }

    struct FakeBeatOnce {
        fired: bool,
    }

    impl SignalSource for FakeBeatOnce {
        fn signals_for_frame(&mut self, _frame: u32, _sample_rate: u32) -> FrameSignals {
            let beat_now = !self.fired;
            self.fired = true;
            FrameSignals {
                level: 0.0,
                beat_now,
                bass_energy: 0.0,
                treble_energy: 0.0,
                hue_base: 0.0,
            }
        }
    }

    #[test]
    fn beat_explosion_holds_for_three_frames_after_a_beat() {
        let mut driver = FrameDriver::new(3);
        let mut fb = FrameBuffer::new();
        let mut source = FakeBeatOnce { fired: false };

        driver.render_frame(&mut fb, &mut source, 0);
        assert_eq!(driver.beat_explosion_hold, 3);
        driver.render_frame(&mut fb, &mut source, 1);
        assert_eq!(driver.beat_explosion_hold, 2);
        driver.render_frame(&mut fb, &mut source, 2);
        assert_eq!(driver.beat_explosion_hold, 1);
        driver.render_frame(&mut fb, &mut source, 3);
        assert_eq!(driver.beat_explosion_hold, 0);
    }

    #[test]
    fn total_frames_matches_music_time() {
        let driver = FrameDriver::new(42);
        assert_eq!(driver.total_frames(), MusicTime::from_seed(42).total_frames());
    }

    #[test]
    fn deterministic_output_for_same_seed() {
        let seed = 17;
        let timeline = Timeline::build(seed);

        let mut fb_a = FrameBuffer::new();
        let mut driver_a = FrameDriver::new(seed);
        let mut analyzer_a = TimelineAnalyzer::new(&timeline);
        driver_a.render_frame(&mut fb_a, &mut analyzer_a, 5);

        let mut fb_b = FrameBuffer::new();
        let mut driver_b = FrameDriver::new(seed);
        let mut analyzer_b = TimelineAnalyzer::new(&timeline);
        driver_b.render_frame(&mut fb_b, &mut analyzer_b, 5);

        assert_eq!(fb_a.pixels(), fb_b.pixels());
    }
}
