//! A written WAV's bytes must be stable across runs for a fixed seed:
//! hashing catches any accidental nondeterminism the sample-value
//! comparisons in other tests might not (spec §8 scenario 3).

use sha2::{Digest, Sha256};

use seedforge::config::RunConfig;
use seedforge::generator::Generator;
use seedforge::wav_io::write_wav;

fn hash_file(path: &std::path::Path) -> String {
    let bytes = std::fs::read(path).unwrap();
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    format!("{:x}", hasher.finalize())
}

#[test]
fn wav_bytes_are_identical_across_runs_for_the_same_seed() {
    let seed = 0xC0FF_EE01;
    let config = RunConfig::default();

    let path_a = std::env::temp_dir().join("seedforge_hash_a.wav");
    let path_b = std::env::temp_dir().join("seedforge_hash_b.wav");

    let mut gen_a = Generator::new(seed, &config);
    let seg_a = gen_a.process_segment();
    write_wav(&path_a, gen_a.music_time().sample_rate, &seg_a).unwrap();

    let mut gen_b = Generator::new(seed, &config);
    let seg_b = gen_b.process_segment();
    write_wav(&path_b, gen_b.music_time().sample_rate, &seg_b).unwrap();

    assert_eq!(hash_file(&path_a), hash_file(&path_b));

    let _ = std::fs::remove_file(&path_a);
    let _ = std::fs::remove_file(&path_b);
}

#[test]
fn different_seeds_produce_different_wav_hashes() {
    let config = RunConfig::default();

    let path_a = std::env::temp_dir().join("seedforge_hash_diff_a.wav");
    let path_b = std::env::temp_dir().join("seedforge_hash_diff_b.wav");

    let mut gen_a = Generator::new(1, &config);
    let seg_a = gen_a.process_segment();
    write_wav(&path_a, gen_a.music_time().sample_rate, &seg_a).unwrap();

    let mut gen_b = Generator::new(2, &config);
    let seg_b = gen_b.process_segment();
    write_wav(&path_b, gen_b.music_time().sample_rate, &seg_b).unwrap();

    assert_ne!(hash_file(&path_a), hash_file(&path_b));

    let _ = std::fs::remove_file(&path_a);
    let _ = std::fs::remove_file(&path_b);
}
