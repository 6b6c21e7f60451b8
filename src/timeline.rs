//! Sidecar record: scheduled events as sample timestamps, serialized to
//! the JSON schema in spec §6. This is the primary source of truth for
//! the visual renderer; `analyzer.rs` is only a fallback.

use serde::{Deserialize, Serialize};

use crate::event::{EventQueue, VoiceKind};
use crate::music_time::MusicTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub t: u32,
    pub kind: String,
    pub aux: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub seed: String,
    pub sample_rate: u32,
    pub bpm: f32,
    pub step_samples: u32,
    pub total_samples: u32,
    pub steps: Vec<u32>,
    pub beats: Vec<u32>,
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn build(seed: u32) -> Self {
        let mt = MusicTime::from_seed(seed);
        let queue = EventQueue::build(&mt);

        let steps: Vec<u32> = (0..mt.steps_per_segment).map(|s| s * mt.step_samples).collect();
        let beats: Vec<u32> = steps.iter().step_by(4).copied().collect();

        let events: Vec<TimelineEvent> = queue
            .all()
            .iter()
            .map(|e| TimelineEvent {
                t: e.time_samples,
                kind: e.kind.schema_tag().to_string(),
                aux: e.aux,
            })
            .collect();

        Timeline {
            seed: format!("0x{seed:08X}"),
            sample_rate: mt.sample_rate,
            bpm: mt.bpm as f32,
            step_samples: mt.step_samples,
            total_samples: mt.total_samples,
            steps,
            beats,
            events,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Indices of steps at which a "saw step" bass-hit may spawn: every
    /// 8th step, plus the terminal boundary (spec §4.12, §4.3 pattern).
    pub fn saw_step_sample_times(&self) -> Vec<u32> {
        self.steps.iter().step_by(8).copied().collect()
    }

    pub fn kind_from_tag(tag: &str) -> Option<VoiceKind> {
        VoiceKind::ALL.into_iter().find(|k| k.schema_tag() == tag)
    }
}
