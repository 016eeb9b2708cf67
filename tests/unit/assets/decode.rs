use super::*;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_decode").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn from_rgb8_checks_buffer_length() {
    assert!(BaseImage::from_rgb8(2, 2, vec![0; 12]).is_ok());
    assert!(BaseImage::from_rgb8(2, 2, vec![0; 11]).is_err());
    assert!(BaseImage::from_rgb8(0, 2, vec![]).is_err());
}

#[test]
fn solid_fills_every_pixel() {
    let img = BaseImage::solid(Canvas::new(3, 2).unwrap(), [255, 0, 0]);
    assert_eq!(img.canvas(), Canvas::new(3, 2).unwrap());
    assert!(img.as_raw().chunks_exact(3).all(|px| px == [255, 0, 0]));
}

#[test]
fn missing_file_is_input_not_found() {
    let err = load_base_image("target/unit_decode/nope.png", Canvas::new(4, 4).unwrap())
        .unwrap_err();
    assert!(matches!(err, FlagwaveError::InputNotFound(_)));
}

#[test]
fn load_resizes_to_canvas_and_drops_alpha() {
    let dir = scratch_dir("resize");
    let path = dir.join("flag.png");
    let src = image::RgbaImage::from_pixel(10, 6, image::Rgba([0, 0, 255, 128]));
    src.save(&path).unwrap();

    let img = load_base_image(&path, Canvas::new(4, 4).unwrap()).unwrap();
    assert_eq!(img.width(), 4);
    assert_eq!(img.height(), 4);
    assert_eq!(img.pixel(0, 0), [0, 0, 255]);
    assert_eq!(img.pixel(3, 3), [0, 0, 255]);
}

#[test]
fn load_keeps_matching_size_untouched() {
    let dir = scratch_dir("same_size");
    let path = dir.join("grad.png");
    let src = image::RgbImage::from_fn(4, 4, |x, y| image::Rgb([x as u8 * 10, y as u8 * 20, 7]));
    src.save(&path).unwrap();

    let img = load_base_image(&path, Canvas::new(4, 4).unwrap()).unwrap();
    assert_eq!(img.as_raw(), src.as_raw().as_slice());
}

#[test]
fn undecodable_file_is_decode_error() {
    let dir = scratch_dir("garbage");
    let path = dir.join("not_an_image.png");
    std::fs::write(&path, b"definitely not png").unwrap();
    let err = load_base_image(&path, Canvas::new(4, 4).unwrap()).unwrap_err();
    assert!(matches!(err, FlagwaveError::Decode(_)));
}
