use super::*;

fn checker(canvas: Canvas) -> BaseImage {
    let data = (0..canvas.height)
        .flat_map(|y| {
            (0..canvas.width).flat_map(move |x| {
                if (x / 4 + y / 4) % 2 == 0 {
                    [230, 30, 40]
                } else {
                    [20, 40, 160]
                }
            })
        })
        .collect();
    BaseImage::from_rgb8(canvas.width, canvas.height, data).unwrap()
}

#[test]
fn synthesize_is_deterministic() {
    let canvas = Canvas::new(32, 24).unwrap();
    let base = checker(canvas);
    for f in [0u64, 7, 29] {
        let a = synthesize(&base, FrameIndex(f), 30, canvas, BorderMode::default()).unwrap();
        let b = synthesize(&base, FrameIndex(f), 30, canvas, BorderMode::default()).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn frames_keep_base_dimensions() {
    for (w, h) in [(1u32, 1u32), (4, 4), (17, 5), (64, 36)] {
        let canvas = Canvas::new(w, h).unwrap();
        let base = checker(canvas);
        for f in 0..6u64 {
            let frame = synthesize(&base, FrameIndex(f), 6, canvas, BorderMode::Replicate).unwrap();
            assert_eq!(frame.canvas(), canvas);
            assert_eq!(frame.data.len(), canvas.rgb_len());
        }
    }
}

#[test]
fn frame_order_does_not_matter() {
    let canvas = Canvas::new(20, 12).unwrap();
    let base = checker(canvas);
    let forward: Vec<_> = (0..10u64)
        .map(|f| synthesize(&base, FrameIndex(f), 10, canvas, BorderMode::default()).unwrap())
        .collect();
    for f in (0..10u64).rev() {
        let again = synthesize(&base, FrameIndex(f), 10, canvas, BorderMode::default()).unwrap();
        assert_eq!(again, forward[f as usize]);
    }
}

#[test]
fn zero_displacement_without_shimmer_is_identity() {
    let canvas = Canvas::new(16, 9).unwrap();
    let base = checker(canvas);
    let params = FrameParams {
        phase: 1.1,
        flex_intensity: 0.0,
        shimmer: 0,
    };
    for border in [BorderMode::default(), BorderMode::Replicate] {
        let frame = synthesize_with(&base, params, canvas, border).unwrap();
        assert_eq!(frame.data, base.as_raw());
    }
}

#[test]
fn zero_displacement_only_adds_shimmer() {
    let canvas = Canvas::new(8, 8).unwrap();
    let base = checker(canvas);
    let params = FrameParams::from_phase(0.0).with_intensity(0.0);
    assert_eq!(params.shimmer, 3);
    let frame = synthesize_with(&base, params, canvas, BorderMode::default()).unwrap();
    for (out, src) in frame.data.iter().zip(base.as_raw()) {
        assert_eq!(*out, src + 3);
    }
}

#[test]
fn shimmer_saturates_instead_of_wrapping() {
    let mut frame = FrameRGB {
        width: 2,
        height: 1,
        data: vec![255, 254, 250, 0, 1, 2],
    };
    apply_shimmer(&mut frame, 6);
    assert_eq!(frame.data, vec![255, 255, 255, 6, 7, 8]);

    let canvas = Canvas::new(6, 6).unwrap();
    let white = BaseImage::solid(canvas, [255, 255, 255]);
    let frame = synthesize(&white, FrameIndex(5), 24, canvas, BorderMode::Replicate).unwrap();
    assert!(frame.data.iter().all(|c| *c == 255));
}

#[test]
fn solid_red_single_frame_clip() {
    let canvas = Canvas::new(4, 4).unwrap();
    let red = BaseImage::solid(canvas, [255, 0, 0]);
    let frame = synthesize(&red, FrameIndex(0), 1, canvas, BorderMode::Replicate).unwrap();
    assert_eq!(frame.canvas(), canvas);
    assert_eq!(frame.data.len(), 4 * 4 * 3);
    // Replicated red stays red; phase 0 shimmer lifts green and blue by 3.
    assert!(frame.data.chunks_exact(3).all(|px| px == [255, 3, 3]));
}

#[test]
fn mismatched_base_fails_fast() {
    let base = checker(Canvas::new(8, 8).unwrap());
    let err = synthesize(
        &base,
        FrameIndex(0),
        1,
        Canvas::new(8, 4).unwrap(),
        BorderMode::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FlagwaveError::DimensionMismatch { .. }));
}

#[test]
fn out_of_range_frame_is_rejected() {
    let canvas = Canvas::new(4, 4).unwrap();
    let base = checker(canvas);
    assert!(synthesize(&base, FrameIndex(3), 3, canvas, BorderMode::default()).is_err());
}
