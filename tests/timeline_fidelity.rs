//! The exported timeline must describe the same schedule the generator
//! actually plays, and must round-trip through JSON unchanged (spec §6, §8).

use seedforge::config::RunConfig;
use seedforge::event::EventQueue;
use seedforge::generator::Generator;
use seedforge::music_time::MusicTime;
use seedforge::timeline::Timeline;

#[test]
fn timeline_event_count_matches_generator_schedule() {
    let seed = 0x5EED_0001;
    let mt = MusicTime::from_seed(seed);
    let queue = EventQueue::build(&mt);
    let timeline = Timeline::build(seed);
    assert_eq!(queue.all().len(), timeline.events.len());
}

#[test]
fn timeline_total_samples_matches_generator_output_length() {
    let seed = 0x5EED_0002;
    let config = RunConfig::default();
    let mut generator = Generator::new(seed, &config);
    let segment = generator.process_segment();
    let timeline = Timeline::build(seed);
    assert_eq!(segment.left.len(), timeline.total_samples as usize);
}

#[test]
fn timeline_json_round_trip_preserves_every_event() {
    let seed = 0x5EED_0003;
    let timeline = Timeline::build(seed);
    let json = timeline.to_json().unwrap();
    let reloaded = Timeline::from_json(&json).unwrap();
    assert_eq!(timeline.events.len(), reloaded.events.len());
    for (a, b) in timeline.events.iter().zip(reloaded.events.iter()) {
        assert_eq!(a.t, b.t);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.aux, b.aux);
    }
}

#[test]
fn saw_step_sample_times_are_a_subset_of_declared_steps() {
    let timeline = Timeline::build(0x5EED_0004);
    let saw_times = timeline.saw_step_sample_times();
    for t in saw_times {
        assert!(timeline.steps.contains(&t));
    }
}
