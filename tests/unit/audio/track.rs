use super::*;

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "heartfield_{name}_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

/// One second of constant stereo `(1.0, -1.0)`.
fn one_second() -> Vec<f32> {
    [1.0f32, -1.0].repeat(SOUNDTRACK_SAMPLE_RATE as usize)
}

#[test]
fn nothing_to_mix_before_play() {
    let track = Soundtrack::from_samples(one_second());
    assert!(track.mix_range(0.0, 1.0).is_none());
    assert_eq!(track.started_at(), None);
}

#[test]
fn play_without_source_is_rejected() {
    let mut track = Soundtrack::new(None);
    assert!(track.play().is_err());
    assert_eq!(track.started_at(), None);
}

#[test]
fn play_pins_to_the_clock() {
    let mut track = Soundtrack::from_samples(one_second());
    track.set_clock(2.5);
    track.play().unwrap();
    track.set_clock(4.0);
    track.play().unwrap();
    assert_eq!(track.started_at(), Some(2.5));
}

#[test]
fn mix_delays_and_scales_by_volume() {
    let mut track = Soundtrack::from_samples(one_second());
    track.set_volume(0.4);
    track.set_clock(0.5);
    track.play().unwrap();

    let mix = track.mix_range(0.0, 2.0).unwrap();
    assert_eq!(mix.len(), 2 * 2 * 48_000);
    let frame = |secs: f64| {
        let i = (secs * 48_000.0) as usize * 2;
        (mix[i], mix[i + 1])
    };
    assert_eq!(frame(0.25), (0.0, 0.0));
    assert_eq!(frame(0.75), (0.4, -0.4));
    assert_eq!(frame(1.75), (0.0, 0.0));
}

#[test]
fn range_starting_after_play_skips_into_the_source() {
    let mut samples = vec![0.0f32; 2 * 48_000];
    samples[2 * 24_000] = 1.0;
    let mut track = Soundtrack::from_samples(samples);
    track.set_volume(1.0);
    track.play().unwrap();
    let mix = track.mix_range(0.25, 0.5).unwrap();
    assert_eq!(mix[2 * 12_000], 1.0);
}

#[test]
fn write_range_emits_f32le_and_config() {
    let mut track = Soundtrack::from_samples(one_second());
    track.play().unwrap();
    let path = temp_file("track");
    let cfg = track.write_range(0.0, 0.5, &path).unwrap().unwrap();
    assert_eq!(cfg.sample_rate, 48_000);
    assert_eq!(cfg.channels, 2);
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 24_000 * 2 * 4);
    assert_eq!(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0.4);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn write_range_before_play_writes_nothing() {
    let track = Soundtrack::from_samples(one_second());
    let path = temp_file("silent");
    assert!(track.write_range(0.0, 1.0, &path).unwrap().is_none());
    assert!(!path.exists());
}
