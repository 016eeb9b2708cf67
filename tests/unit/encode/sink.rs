use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        canvas: Canvas::new(2, 2).unwrap(),
        fps: Fps::default(),
    }
}

fn frame(width: u32, height: u32) -> FrameRGB {
    FrameRGB {
        width,
        height,
        data: vec![0; (width * height * 3) as usize],
    }
}

#[test]
fn in_memory_sink_records_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 2)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2, 2)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg()));
    assert_eq!(sink.frames().len(), 2);
    assert!(sink.is_ended());
    assert!(!sink.is_aborted());
}

#[test]
fn in_memory_sink_rejects_out_of_order_and_missized_frames() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(2, 2)).is_err());

    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame(2, 2)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame(2, 2)).is_err());
    assert!(sink.push_frame(FrameIndex(1), &frame(2, 2)).is_err());
    assert!(matches!(
        sink.push_frame(FrameIndex(4), &frame(4, 2)),
        Err(FlagwaveError::DimensionMismatch { .. })
    ));
}
