use culler_codec::{Codec, DecodeError};

#[test]
fn numeric_round_trip() {
    let mut buf = Vec::new();
    42u32.encode(&mut buf);
    (-7i16).encode(&mut buf);
    0.9f32.encode(&mut buf);

    let mut pos = 0;
    assert_eq!(u32::decode(&buf, &mut pos).unwrap(), 42);
    assert_eq!(i16::decode(&buf, &mut pos).unwrap(), -7);
    assert_eq!(f32::decode(&buf, &mut pos).unwrap(), 0.9);
    assert_eq!(pos, buf.len());
}

#[test]
fn u32_is_little_endian() {
    assert_eq!(0x0102_0304u32.to_bytes(), vec![0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn string_round_trip() {
    let s = "conveyor-3".to_string();
    assert_eq!(String::from_bytes(&s.to_bytes()).unwrap(), s);
}

#[test]
fn string_rejects_invalid_utf8() {
    let mut buf = Vec::new();
    2u32.encode(&mut buf);
    buf.extend_from_slice(&[0xff, 0xfe]);
    assert_eq!(String::from_bytes(&buf), Err(DecodeError::InvalidUtf8));
}

#[test]
fn bool_rejects_other_bytes() {
    assert_eq!(bool::from_bytes(&[2]), Err(DecodeError::InvalidBool(2)));
}

#[test]
fn vec_round_trip() {
    let v = vec![1u16, 2, 3];
    assert_eq!(Vec::<u16>::from_bytes(&v.to_bytes()).unwrap(), v);
}

#[test]
fn option_round_trip() {
    let some: Option<u32> = Some(9);
    let none: Option<u32> = None;
    assert_eq!(Option::<u32>::from_bytes(&some.to_bytes()).unwrap(), some);
    assert_eq!(Option::<u32>::from_bytes(&none.to_bytes()).unwrap(), none);
}

#[test]
fn truncated_buffer_is_eof_not_panic() {
    let buf = 1234u64.to_bytes();
    assert_eq!(u64::from_bytes(&buf[..5]), Err(DecodeError::UnexpectedEof));
}

#[test]
fn corrupt_vec_length_does_not_overallocate() {
    // Length claims u32::MAX elements but the buffer only has 2 bytes.
    let mut buf = Vec::new();
    u32::MAX.encode(&mut buf);
    buf.extend_from_slice(&[0, 0]);
    assert_eq!(Vec::<u8>::from_bytes(&buf), Err(DecodeError::UnexpectedEof));
}
