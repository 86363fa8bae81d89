use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::default(),
        audio: None,
    }
}

#[test]
fn video_validation_rejects_odd_and_empty_sizes() {
    assert!(validate_video(&cfg(0, 10)).is_err());
    assert!(validate_video(&cfg(11, 10)).is_err());
    assert!(validate_video(&cfg(10, 10)).is_ok());
    let mut bad_fps = cfg(10, 10);
    bad_fps.fps = Fps { num: 0, den: 1 };
    assert!(validate_video(&bad_fps).is_err());
}

#[test]
fn flatten_premul_alpha_0_gives_background() {
    let mut dst = vec![0u8; 4];
    flatten_over_background(&mut dst, &[0, 0, 0, 0], true, Rgba8::rgb(10, 20, 30)).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_is_identity() {
    let mut dst = vec![0u8; 4];
    flatten_over_background(&mut dst, &[1, 2, 3, 255], true, Rgba8::rgb(10, 20, 30)).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn flatten_straight_half_red_over_black() {
    let mut dst = vec![0u8; 4];
    flatten_over_background(&mut dst, &[255, 0, 0, 128], false, Rgba8::rgb(0, 0, 0)).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_rejects_length_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_over_background(&mut dst, &[0; 4], true, Rgba8::rgb(0, 0, 0)).is_err());
}

#[test]
fn command_carries_audio_input_when_configured() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("out/show.mp4"));
    let mut c = cfg(64, 64);
    c.audio = Some(AudioInputConfig {
        path: PathBuf::from("out/show.f32le"),
        sample_rate: 48_000,
        channels: 2,
    });
    let args: Vec<String> = sink
        .command(&c)
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert!(args.windows(2).any(|w| w == ["-f", "f32le"]));
    assert!(args.windows(2).any(|w| w == ["-c:a", "aac"]));
    assert!(args.contains(&"-shortest".to_owned()));
    assert!(!args.contains(&"-an".to_owned()));
    assert!(args.windows(2).any(|w| w == ["-r", "60/1"]));

    let silent: Vec<String> = sink
        .command(&cfg(64, 64))
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert!(silent.contains(&"-an".to_owned()));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("out/never.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}
