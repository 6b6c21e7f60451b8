//! Time-ordered per-step event schedule (spec §4.3).

use crate::music_time::MusicTime;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceKind {
    Kick,
    Snare,
    Hat,
    Melody,
    MidFm,
    BassFm,
}

impl VoiceKind {
    pub const ALL: [VoiceKind; 6] = [
        VoiceKind::Kick,
        VoiceKind::Snare,
        VoiceKind::Hat,
        VoiceKind::Melody,
        VoiceKind::MidFm,
        VoiceKind::BassFm,
    ];

    /// Fixed default rhythmic pattern bitmask over one 8-step bar (spec §4.3).
    pub fn pattern_byte(self) -> u8 {
        match self {
            VoiceKind::Kick => 0x91,
            VoiceKind::Snare => 0x44,
            VoiceKind::Hat => 0xAA,
            VoiceKind::Melody => 0x55,
            VoiceKind::MidFm => 0x88,
            VoiceKind::BassFm => 0x11,
        }
    }

    /// The JSON schema's kind tag (spec §6): "kick","snare","hat","melody","mid","fm_bass".
    pub fn schema_tag(self) -> &'static str {
        match self {
            VoiceKind::Kick => "kick",
            VoiceKind::Snare => "snare",
            VoiceKind::Hat => "hat",
            VoiceKind::Melody => "melody",
            VoiceKind::MidFm => "mid",
            VoiceKind::BassFm => "fm_bass",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time_samples: u32,
    pub kind: VoiceKind,
    pub aux: i32,
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.time_samples
            .cmp(&other.time_samples)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

/// Time-ordered schedule, built once per segment during init.
pub struct EventQueue {
    events: Vec<Event>,
    cursor: usize,
}

impl EventQueue {
    /// Builds the fixed schedule for one segment from the music timing.
    /// Melody/mid_fm/bass_fm auxes encode a scale-degree step index used
    /// later by the voice to look up a note (the ascending pentatonic
    /// scale, spec §4.4/§9).
    pub fn build(mt: &MusicTime) -> Self {
        let mut events = Vec::new();
        for step in 0..mt.steps_per_segment {
            let bit = step % 8;
            let time_samples = step * mt.step_samples;
            for kind in VoiceKind::ALL {
                if kind.pattern_byte() & (1 << bit) != 0 {
                    events.push(Event {
                        time_samples,
                        kind,
                        aux: step as i32,
                    });
                }
            }
        }
        events.sort();
        EventQueue { events, cursor: 0 }
    }

    /// Returns all events due at or before `now_samples`, advancing the
    /// cursor. Only valid during init/build-out; not used mid-process
    /// beyond sequential scanning (events never repeat, cursor is
    /// monotonic).
    pub fn pop_due(&mut self, now_samples: u32) -> &[Event] {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].time_samples <= now_samples {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn is_sorted_and_in_range(&self, total_samples: u32) -> bool {
        self.events
            .iter()
            .tuple_windows()
            .all(|(a, b)| a <= b)
            && self.events.iter().all(|e| e.time_samples < total_samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_sorted_by_time_then_kind() {
        let mt = MusicTime::from_seed(7);
        let q = EventQueue::build(&mt);
        for pair in q.all().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn all_events_before_segment_end() {
        let mt = MusicTime::from_seed(123);
        let q = EventQueue::build(&mt);
        assert!(q.is_sorted_and_in_range(mt.total_samples));
    }

    #[test]
    fn pop_due_is_monotonic_and_covers_all_events() {
        let mt = MusicTime::from_seed(55);
        let mut q = EventQueue::build(&mt);
        let mut seen = 0;
        for step in 0..mt.steps_per_segment {
            let now = step * mt.step_samples;
            seen += q.pop_due(now).len();
        }
        seen += q.pop_due(mt.total_samples).len();
        let total_built = EventQueue::build(&mt).all().len();
        assert_eq!(seen, total_built);
    }

    #[test]
    fn mid_fm_fires_on_every_fourth_step_starting_at_three() {
        let mt = MusicTime::from_seed(0xDEADBEEF);
        let q = EventQueue::build(&mt);
        let steps: Vec<i32> = q
            .all()
            .iter()
            .filter(|e| e.kind == VoiceKind::MidFm)
            .map(|e| e.aux)
            .collect();
        assert_eq!(steps, vec![3, 7, 11, 15, 19, 23, 27, 31]);
    }
}
