use super::*;

#[test]
fn test_empty_tuple() {
    let t = Tuple::new();
    assert!(t.is_empty());
    assert_eq!(t.len(), 0);

    let packed = t.pack();
    assert!(packed.is_empty());

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(t, unpacked);
}

#[test]
fn test_null_element() {
    let t = Tuple::new().push(());
    let packed = t.pack();
    assert_eq!(packed, vec![NULL_CODE]);

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(unpacked.get(0), Some(&Element::Null));
}

#[test]
fn test_string_element() {
    let t = Tuple::new().push("hello");
    let packed = t.pack();

    assert_eq!(packed, b"\x02hello\x00".to_vec());

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(unpacked.get(0), Some(&Element::String("hello".to_string())));
}

#[test]
fn test_string_with_null_bytes() {
    let t = Tuple::new().push("foo\x00bar");
    let packed = t.pack();

    assert_eq!(packed, b"\x02foo\x00\xFFbar\x00".to_vec());

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(unpacked.get(0), Some(&Element::String("foo\x00bar".to_string())));
}

#[test]
fn test_bytes_element() {
    let t = Tuple::new().push(vec![1u8, 0, 3, 0]);
    let packed = t.pack();

    assert_eq!(packed, vec![BYTES_CODE, 1, 0x00, NULL_ESCAPE, 3, 0x00, NULL_ESCAPE, 0x00]);

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(unpacked.get(0), Some(&Element::Bytes(vec![1, 0, 3, 0])));
}

#[test]
fn test_byte_array_literal_is_bytes() {
    let t = Tuple::new().push(b"layer");
    assert_eq!(t.pack(), b"\x01layer\x00".to_vec());
}

#[test]
fn test_integer_zero() {
    let t = Tuple::new().push(0i64);
    let packed = t.pack();
    assert_eq!(packed, vec![INT_ZERO_CODE]);

    let unpacked = Tuple::unpack(&packed).unwrap();
    assert_eq!(unpacked.get(0), Some(&Element::Int(0)));
}

#[test]
fn test_known_integer_encodings() {
    let cases: [(i64, &[u8]); 8] = [
        (1, &[0x15, 0x01]),
        (255, &[0x15, 0xFF]),
        (256, &[0x16, 0x01, 0x00]),
        (-1, &[0x13, 0xFE]),
        (-255, &[0x13, 0x00]),
        (-256, &[0x12, 0xFE, 0xFF]),
        (i64::MAX, &[0x1C, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
        (i64::MIN, &[0x0C, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
    ];

    for (n, expected) in cases {
        let packed = Tuple::new().push(n).pack();
        assert_eq!(packed, expected.to_vec(), "encoding mismatch for n={}", n);
        assert_eq!(Tuple::unpack(&packed).unwrap().get(0), Some(&Element::Int(n)));
    }
}

#[test]
fn test_integer_ordering() {
    let values = [i64::MIN, -65536, -256, -255, -1, 0, 1, 255, 256, 65536, i64::MAX];
    for pair in values.windows(2) {
        let a = Tuple::new().push(pair[0]).pack();
        let b = Tuple::new().push(pair[1]).pack();
        assert!(a < b, "{} should sort before {}", pair[0], pair[1]);
    }
}

#[test]
fn test_positive_integer_overflow() {
    // 8-byte magnitude above i64::MAX
    let data = [0x1C, 0x80, 0, 0, 0, 0, 0, 0, 0];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::IntegerOverflow { offset: 0 })));
}

#[test]
fn test_negative_integer_overflow() {
    // magnitude 2^63 + 1
    let data = [0x0C, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::IntegerOverflow { offset: 0 })));
}

#[test]
fn test_truncated_integer() {
    let data = [0x16, 0x01];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::UnexpectedEnd { offset: 0 })));
}

#[test]
fn test_unknown_type_code() {
    let data = [0x02, b'a', 0x00, 0x33];
    assert!(matches!(
        Tuple::unpack(&data),
        Err(TupleError::UnknownTypeCode { code: 0x33, offset: 3 })
    ));
}

#[test]
fn test_missing_terminator() {
    let data = [BYTES_CODE, b'a', b'b'];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::MissingTerminator { offset: 0 })));
}

#[test]
fn test_trailing_escape_without_terminator() {
    let data = [BYTES_CODE, b'a', 0x00, NULL_ESCAPE];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::MissingTerminator { .. })));
}

#[test]
fn test_invalid_utf8() {
    let data = [STRING_CODE, 0xC3, 0x28, 0x00];
    assert!(matches!(Tuple::unpack(&data), Err(TupleError::InvalidUtf8 { offset: 0, .. })));
}

#[test]
fn test_mixed_tuple_roundtrip() {
    let t = Tuple::new()
        .push(())
        .push(-42i64)
        .push(b"\x00\x01".as_slice())
        .push("name")
        .push(0i64)
        .push(1_000_000i64);

    let unpacked = Tuple::unpack(&t.pack()).unwrap();
    assert_eq!(t, unpacked);
}

#[test]
fn test_type_ordering() {
    let null = Tuple::new().push(()).pack();
    let bytes = Tuple::new().push(b"zzz").pack();
    let string = Tuple::new().push("aaa").pack();
    let int = Tuple::new().push(i64::MIN).pack();

    assert!(null < bytes);
    assert!(bytes < string);
    assert!(string < int);
}

#[test]
fn test_prefix_tuple_sorts_first() {
    let short = Tuple::new().push("a");
    let long = Tuple::new().push("a").push(());
    assert!(short < long);
    assert!(short.pack() < long.pack());
}

#[test]
fn test_range() {
    let (begin, end) = Tuple::new().push("users").range();
    assert_eq!(begin, b"\x02users\x00\x00".to_vec());
    assert_eq!(end, b"\x02users\x00\xFF".to_vec());

    let inner = Tuple::new().push("users").push(7i64).pack();
    assert!(begin <= inner && inner < end);
}

#[test]
fn test_strinc() {
    assert_eq!(strinc(b"abc"), Some(b"abd".to_vec()));
    assert_eq!(strinc(&[0x01, 0xFF, 0xFF]), Some(vec![0x02]));
    assert_eq!(strinc(&[0xFF, 0xFF]), None);
    assert_eq!(strinc(&[]), None);
}

#[test]
fn test_element_accessors() {
    assert_eq!(Element::from("x").as_str(), Some("x"));
    assert_eq!(Element::from(vec![1u8]).as_bytes(), Some(&[1u8][..]));
    assert_eq!(Element::from(5i32).as_int(), Some(5));
    assert_eq!(Element::Null.as_int(), None);
    assert_eq!(Element::from("x").into_bytes(), None);
}
