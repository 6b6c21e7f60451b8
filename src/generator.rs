//! Drives the event queue, invokes voices into two scratch stereo buses,
//! mixes, applies effects, and emits the final stereo segment (spec §4.6).

use crate::config::{DelayMode, RunConfig};
use crate::event::{Event, EventQueue, VoiceKind};
use crate::fx::delay::DelayLine;
use crate::fx::limiter::Limiter;
use crate::music_time::MusicTime;
use crate::rng::magic;
use crate::voice::fm_bass::FmBassVoice;
use crate::voice::fm_mid::FmMidVoice;
use crate::voice::hat::HatVoice;
use crate::voice::kick::KickVoice;
use crate::voice::melody::MelodyVoice;
use crate::voice::snare::SnareVoice;
use crate::voice::Voice;

/// Blocks are bounded to this size and additionally clipped to the next
/// step boundary so no block ever crosses a step (spec §4.6).
const MAX_BLOCK_SAMPLES: usize = 1024;

pub struct StereoSegment {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

pub struct Generator {
    music_time: MusicTime,
    queue: EventQueue,
    kick: KickVoice,
    snare: SnareVoice,
    hat: HatVoice,
    melody: MelodyVoice,
    mid_fm: FmMidVoice,
    bass_fm: FmBassVoice,
    delay: DelayLine,
    limiter: Limiter,
    delay_mode: DelayMode,
}

impl Generator {
    pub fn new(seed: u32, config: &RunConfig) -> Self {
        let music_time = MusicTime::from_seed(seed);
        let queue = EventQueue::build(&music_time);

        let mut kick = KickVoice::new();
        let mut snare = SnareVoice::new(seed ^ magic::SNARE_NOISE);
        let mut hat = HatVoice::new(seed ^ magic::HAT_NOISE);
        let mut melody = MelodyVoice::new();
        let mut mid_fm = FmMidVoice::new();
        let mut bass_fm = FmBassVoice::new();

        // Every voice is initialized here, at construction, regardless of
        // whether it will ever be triggered (spec §4.6/§9: failing this
        // is the enumerated bass-FM-not-initialized bug).
        kick.init(music_time.sample_rate);
        snare.init(music_time.sample_rate);
        hat.init(music_time.sample_rate);
        melody.init(music_time.sample_rate);
        mid_fm.init(music_time.sample_rate);
        bass_fm.init(music_time.sample_rate);

        assert!(music_time.sample_rate != 0, "generator constructed with sample_rate = 0");

        let delay_samples = DelayLine::eighth_note_samples(music_time.step_samples);
        let delay = DelayLine::new(music_time.sample_rate, delay_samples);
        let limiter = Limiter::new();

        Generator {
            music_time,
            queue,
            kick,
            snare,
            hat,
            melody,
            mid_fm,
            bass_fm,
            delay,
            limiter,
            delay_mode: config.delay_mode,
        }
    }

    pub fn music_time(&self) -> MusicTime {
        self.music_time
    }

    fn fire(&mut self, event: &Event) {
        match event.kind {
            VoiceKind::Kick => self.kick.trigger(),
            VoiceKind::Snare => self.snare.trigger(),
            VoiceKind::Hat => self.hat.trigger(),
            VoiceKind::Melody => self.melody.trigger(self.music_time.root_freq, event.aux),
            VoiceKind::MidFm => self.mid_fm.trigger(self.music_time.root_freq, event.aux),
            VoiceKind::BassFm => self.bass_fm.trigger(self.music_time.root_freq, event.aux),
        }
    }

    /// Renders the entire segment: exactly `total_samples` stereo frames.
    pub fn process_segment(&mut self) -> StereoSegment {
        let total = self.music_time.total_samples as usize;
        let step_samples = self.music_time.step_samples;

        let mut out_l = vec![0.0f32; total];
        let mut out_r = vec![0.0f32; total];

        // Fire all time=0 events before the first block.
        for e in self.queue.pop_due(0).to_vec() {
            self.fire(&e);
        }

        let mut drum_l = vec![0.0f32; MAX_BLOCK_SAMPLES];
        let mut drum_r = vec![0.0f32; MAX_BLOCK_SAMPLES];
        let mut synth_l = vec![0.0f32; MAX_BLOCK_SAMPLES];
        let mut synth_r = vec![0.0f32; MAX_BLOCK_SAMPLES];
        let mut melody_l = vec![0.0f32; MAX_BLOCK_SAMPLES];
        let mut melody_r = vec![0.0f32; MAX_BLOCK_SAMPLES];

        let mut pos_in_step: u32 = 0;
        let mut step: u32 = 0;
        let mut written = 0usize;

        while written < total {
            // Strict less-than is load-bearing here: `<=` terminates the
            // loop after two steps (spec §4.6, §9).
            debug_assert!(pos_in_step < step_samples);

            let remaining_in_step = (step_samples - pos_in_step) as usize;
            let block_len = remaining_in_step.min(MAX_BLOCK_SAMPLES).min(total - written);

            let block_start_sample = written as u32;
            for e in self.queue.pop_due(block_start_sample).to_vec() {
                self.fire(&e);
            }

            drum_l[..block_len].fill(0.0);
            drum_r[..block_len].fill(0.0);
            synth_l[..block_len].fill(0.0);
            synth_r[..block_len].fill(0.0);
            melody_l[..block_len].fill(0.0);
            melody_r[..block_len].fill(0.0);

            self.kick.process(&mut drum_l[..block_len], &mut drum_r[..block_len], block_len);
            self.snare.process(&mut drum_l[..block_len], &mut drum_r[..block_len], block_len);
            self.hat.process(&mut drum_l[..block_len], &mut drum_r[..block_len], block_len);

            self.melody.process(&mut melody_l[..block_len], &mut melody_r[..block_len], block_len);
            self.mid_fm.process(&mut synth_l[..block_len], &mut synth_r[..block_len], block_len);
            self.bass_fm.process(&mut synth_l[..block_len], &mut synth_r[..block_len], block_len);

            match self.delay_mode {
                DelayMode::MelodyOnly => {
                    self.delay.process(&mut melody_l[..block_len], &mut melody_r[..block_len]);
                    for i in 0..block_len {
                        synth_l[i] += melody_l[i];
                        synth_r[i] += melody_r[i];
                    }
                }
                DelayMode::Global => {
                    for i in 0..block_len {
                        synth_l[i] += melody_l[i];
                        synth_r[i] += melody_r[i];
                    }
                    self.delay.process(&mut synth_l[..block_len], &mut synth_r[..block_len]);
                }
            }

            for i in 0..block_len {
                out_l[written + i] = drum_l[i] + synth_l[i];
                out_r[written + i] = drum_r[i] + synth_r[i];
            }

            self.limiter.process(&mut out_l[written..written + block_len], &mut out_r[written..written + block_len]);

            written += block_len;
            pos_in_step += block_len as u32;
            if pos_in_step >= step_samples {
                pos_in_step = 0;
                step += 1;
            }
        }

        StereoSegment { left: out_l, right: out_r }
    }
}
