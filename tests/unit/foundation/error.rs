use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FlagwaveError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FlagwaveError::stream_open("x")
            .to_string()
            .contains("stream open error:")
    );
    assert!(
        FlagwaveError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        FlagwaveError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        FlagwaveError::InputNotFound(PathBuf::from("flag.png"))
            .to_string()
            .contains("'flag.png'")
    );
}

#[test]
fn dimension_mismatch_names_both_sizes() {
    let err = FlagwaveError::DimensionMismatch {
        expected: Canvas {
            width: 4,
            height: 4,
        },
        actual: Canvas {
            width: 8,
            height: 2,
        },
    };
    let msg = err.to_string();
    assert!(msg.contains("4x4"));
    assert!(msg.contains("8x2"));
}

#[test]
fn exit_codes_distinguish_failures() {
    assert_eq!(FlagwaveError::InputNotFound(PathBuf::new()).exit_code(), 2);
    assert_eq!(FlagwaveError::stream_open("x").exit_code(), 3);
    assert_eq!(FlagwaveError::validation("x").exit_code(), 1);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlagwaveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
