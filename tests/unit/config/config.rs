use super::*;

#[test]
fn defaults_match_classic_clip() {
    let cfg = FlagConfig::default();
    assert_eq!(cfg.image_path, PathBuf::from("american_flag.png"));
    assert_eq!(cfg.output_path, PathBuf::from("patriot_flex.mp4"));
    assert_eq!(cfg.frame_count, 90);
    assert_eq!(cfg.canvas, Canvas::new(1280, 720).unwrap());
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());
    assert_eq!(cfg.codec, VideoCodec::Mpeg4);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = FlagConfig::from_json_str(
        r#"{ "image_path": "flag.jpg", "frame_count": 12, "canvas": { "width": 64, "height": 32 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.image_path, PathBuf::from("flag.jpg"));
    assert_eq!(cfg.frame_count, 12);
    assert_eq!(cfg.canvas.width, 64);
    assert_eq!(cfg.fps, Fps::default());
    assert_eq!(cfg.threading, RenderThreading::default());
}

#[test]
fn border_and_codec_parse_from_json() {
    let cfg = FlagConfig::from_json_str(
        r#"{ "border": "replicate", "codec": "h264", "threading": { "parallel": true } }"#,
    )
    .unwrap();
    assert_eq!(cfg.border, BorderMode::Replicate);
    assert_eq!(cfg.codec, VideoCodec::H264);
    assert!(cfg.threading.parallel);

    let cfg = FlagConfig::from_json_str(r#"{ "border": { "constant": [255, 255, 255] } }"#)
        .unwrap();
    assert_eq!(cfg.border, BorderMode::Constant([255, 255, 255]));
}

#[test]
fn invalid_values_are_rejected() {
    assert!(FlagConfig::from_json_str(r#"{ "frame_count": 0 }"#).is_err());
    assert!(FlagConfig::from_json_str(r#"{ "canvas": { "width": 0, "height": 4 } }"#).is_err());
    assert!(FlagConfig::from_json_str(r#"{ "fps": { "num": 30, "den": 0 } }"#).is_err());
    assert!(FlagConfig::from_json_str(r#"{ "threading": { "threads": 0 } }"#).is_err());
    assert!(FlagConfig::from_json_str(r#"{ "unknown": 1 }"#).is_err());
}

#[test]
fn missing_config_file_is_an_error() {
    let err = FlagConfig::from_path("target/does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("read config"));
}

#[test]
fn video_output_needs_even_dimensions() {
    let mut cfg = FlagConfig::default();
    assert!(cfg.validate_video().is_ok());

    cfg.canvas = Canvas::new(31, 20).unwrap();
    assert!(cfg.validate().is_ok());
    let err = cfg.validate_video().unwrap_err();
    assert!(matches!(err, FlagwaveError::Validation(_)));
    assert!(err.to_string().contains("31x20"));

    cfg.canvas = Canvas::new(32, 21).unwrap();
    assert!(cfg.validate_video().is_err());
}

#[test]
fn ffmpeg_program_is_configurable() {
    assert_eq!(FlagConfig::default().ffmpeg, PathBuf::from("ffmpeg"));
    let cfg = FlagConfig::from_json_str(r#"{ "ffmpeg": "/opt/ffmpeg/bin/ffmpeg" }"#).unwrap();
    assert_eq!(cfg.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
}
