//! Engine-level guarantees: round-trip, determinism, passthrough sizing,
//! literal atomicity, escape handling, and corrupt stream rejection.
use proptest::prelude::*;

use srcz_core::{
    compress, decompress, CompressedStream, CorruptStreamError, Engine, LanguageProfile, Mode,
};

/// Source-like text: keywords, identifiers, literals, comments and indentation.
fn source_like() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        Just("int ".to_string()),
        Just("struct ".to_string()),
        Just("return ".to_string()),
        Just("printf(\"%d\\n\", x);".to_string()),
        Just("/* { \"struct\" } */".to_string()),
        Just("// trailing comment".to_string()),
        Just("'\\''".to_string()),
        Just("\n    ".to_string()),
        Just("\n\t".to_string()),
        "[a-z_]{1,8}",
        "[{}();,=*+-]",
        "[0-9]{1,4}",
    ];
    prop::collection::vec(token, 0..200).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn prop_round_trip_arbitrary_bytes(input in prop::collection::vec(any::<u8>(), 0..2048)) {
        let packed = compress(&input);
        prop_assert_eq!(decompress(&packed).unwrap(), input);
    }

    #[test]
    fn prop_round_trip_source_like(text in source_like()) {
        for profile in LanguageProfile::ALL {
            let engine = Engine::with_profile(profile);
            let packed = engine.compress(text.as_bytes());
            prop_assert!(packed.len() <= text.len() + 1);
            prop_assert_eq!(engine.decompress(&packed).unwrap(), text.as_bytes());
        }
    }

    #[test]
    fn prop_deterministic(text in source_like()) {
        prop_assert_eq!(compress(text.as_bytes()), compress(text.as_bytes()));
    }

    #[test]
    fn prop_decompress_never_panics(garbage in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decompress(&garbage);
    }
}

#[test]
fn test_no_repeats_is_passthrough_of_len_plus_one() {
    for input in [&b""[..], &b"q"[..], &b"xyz"[..], &b"k7#Lp!w2"[..], &b"int x;"[..]] {
        let packed = compress(input);
        assert_eq!(packed.len(), input.len() + 1);
        assert_eq!(packed[0], 0x00);
        assert_eq!(&packed[1..], input);
    }
}

#[test]
fn test_same_input_same_bytes() {
    let src = include_bytes!("../testdata/example.go");
    let first = compress(src);
    for _ in 0..3 {
        assert_eq!(compress(src), first);
    }
}

#[test]
fn test_struct_inside_block_comment_is_kept_literal() {
    let src = "/* a comment about \"struct\" */\nstruct a;\nstruct b;\nstruct c;\nstruct d;\nstruct e;\n";
    let packed = compress(src.as_bytes());
    let CompressedStream::Dictionary { dictionary, payload } =
        CompressedStream::from_bytes(&packed).unwrap()
    else {
        panic!("expected dictionary mode");
    };
    assert!(dictionary
        .entries()
        .iter()
        .any(|e| e.text == b"struct"));
    let comment = b"/* a comment about \"struct\" */";
    assert!(payload.starts_with(comment));
    let out = decompress(&packed).unwrap();
    assert_eq!(out, src.as_bytes());
}

#[test]
fn test_escape_byte_inside_literal_text_round_trips() {
    // Every byte value occurs in the string literal, so the least frequent
    // one (the escape byte) is itself part of the literal text.
    let mut src = b"char table[] = \"".to_vec();
    src.extend((0..=255u8).filter(|&b| b != b'"' && b != b'\\'));
    src.extend_from_slice(b"\\\\");
    src.extend_from_slice(b"\";\n");
    for _ in 0..12 {
        src.extend_from_slice(b"    unsigned counter = counter + 1;\n");
    }

    let packed = compress(&src);
    let stream = CompressedStream::from_bytes(&packed).unwrap();
    assert_eq!(stream.mode(), Mode::Dictionary);
    let CompressedStream::Dictionary { dictionary, .. } = &stream else {
        unreachable!()
    };
    assert!(src.contains(&dictionary.escape()));
    assert_eq!(decompress(&packed).unwrap(), src);
}

#[test]
fn test_corrupt_streams_are_errors() {
    let good = compress(include_bytes!("../testdata/example.c"));
    assert_eq!(good[0], 0x01);

    assert_eq!(decompress(&[]), Err(CorruptStreamError::Empty));
    assert_eq!(decompress(&[0x02, b'a']), Err(CorruptStreamError::UnknownMode(0x02)));

    // One keyword entry, escape 0x00, then a code for entry 4.
    let out_of_range = [0x01, 0x00, 0x01, 0x01, 0x03, b'i', b'n', b't', 0x00, 0x05];
    assert!(matches!(
        decompress(&out_of_range),
        Err(CorruptStreamError::IndexOutOfRange { index: 4, len: 1, .. })
    ));

    // Entry 1 written as a two-byte varint; only the shortest form is valid.
    let padded = [0x01, 0x00, 0x01, 0x01, 0x03, b'i', b'n', b't', 0x00, 0x81, 0x00];
    assert_eq!(
        decompress(&padded),
        Err(CorruptStreamError::InvalidEscape { offset: 0 })
    );

    let dangling =[0x01, 0x00, 0x01, 0x01, 0x03, b'i', b'n', b't', b'x', 0x00];
    assert!(matches!(
        decompress(&dangling),
        Err(CorruptStreamError::DanglingEscape { offset: 1 })
    ));

    // Cutting the header mid-entry must not decode to anything.
    assert!(matches!(
        decompress(&good[..6]),
        Err(CorruptStreamError::Truncated { .. })
    ));
}
