//! Each voice contributes silence until triggered, and never panics when
//! driven directly through the shared `Voice` contract (spec §4.4, §8).

use seedforge::voice::fm_bass::FmBassVoice;
use seedforge::voice::fm_mid::FmMidVoice;
use seedforge::voice::hat::HatVoice;
use seedforge::voice::kick::KickVoice;
use seedforge::voice::melody::MelodyVoice;
use seedforge::voice::snare::SnareVoice;
use seedforge::voice::Voice;

const SAMPLE_RATE: u32 = 44_100;
const BLOCK: usize = 512;

fn silent_until_triggered<V: Voice>(mut voice: V) {
    voice.init(SAMPLE_RATE);
    assert!(!voice.is_active());

    let mut l = vec![0.0f32; BLOCK];
    let mut r = vec![0.0f32; BLOCK];
    voice.process(&mut l, &mut r, BLOCK);
    assert!(l.iter().all(|&s| s == 0.0));
    assert!(r.iter().all(|&s| s == 0.0));
}

#[test]
fn kick_is_silent_before_trigger() {
    silent_until_triggered(KickVoice::new());
}

#[test]
fn snare_is_silent_before_trigger() {
    silent_until_triggered(SnareVoice::new(7));
}

#[test]
fn hat_is_silent_before_trigger() {
    silent_until_triggered(HatVoice::new(11));
}

#[test]
fn melody_is_silent_before_trigger() {
    silent_until_triggered(MelodyVoice::new());
}

#[test]
fn mid_fm_is_silent_before_trigger() {
    silent_until_triggered(FmMidVoice::new());
}

#[test]
fn bass_fm_is_silent_before_trigger() {
    silent_until_triggered(FmBassVoice::new());
}

#[test]
fn triggered_kick_becomes_active_and_eventually_decays() {
    let mut kick = KickVoice::new();
    kick.init(SAMPLE_RATE);
    kick.trigger();
    assert!(kick.is_active());

    let mut l = vec![0.0f32; SAMPLE_RATE as usize];
    let mut r = vec![0.0f32; SAMPLE_RATE as usize];
    kick.process(&mut l, &mut r, l.len());
    assert!(!kick.is_active(), "kick's 0.5s envelope should have fully decayed within one second");
}

#[test]
fn triggered_bass_fm_produces_nonzero_signal() {
    let mut bass = FmBassVoice::new();
    bass.init(SAMPLE_RATE);
    bass.trigger(220.0, 0);
    let mut l = vec![0.0f32; 2048];
    let mut r = vec![0.0f32; 2048];
    bass.process(&mut l, &mut r, l.len());
    assert!(l.iter().any(|&s| s != 0.0));
}
