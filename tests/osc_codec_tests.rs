//! OSC wire codec tests

use analog_osc_bridge::osc::{decode_message, decode_packet, encode, encode_bundle, OscArg, OscError, OscMessage};

#[test]
fn test_encode_led_message_layout() {
    let msg = OscMessage::new("/analogOutputs/0").with_float(0.5).with_float(2.0);
    let bytes = encode(&msg);

    let mut expected = Vec::new();
    expected.extend_from_slice(b"/analogOutputs/0\0\0\0\0");
    expected.extend_from_slice(b",ff\0");
    expected.extend_from_slice(&0.5f32.to_be_bytes());
    expected.extend_from_slice(&2.0f32.to_be_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn test_encode_setup_has_empty_tag_string() {
    let bytes = encode(&OscMessage::new("/setup"));
    assert_eq!(bytes, b"/setup\0\0,\0\0\0");
}

#[test]
fn test_decode_sensor_message() {
    let msg = OscMessage::new("/analogInputs/0").with_float(0.125);
    let decoded = decode_message(&encode(&msg)).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_decode_every_argument_type() {
    let msg = OscMessage::with_args(
        "/all",
        vec![
            OscArg::Int(-7),
            OscArg::Float(1.5),
            OscArg::Str("hello".to_string()),
            OscArg::Blob(vec![1, 2, 3, 4, 5]),
            OscArg::Long(1 << 40),
            OscArg::Double(-0.25),
            OscArg::Bool(true),
            OscArg::Bool(false),
        ],
    );
    let bytes = encode(&msg);
    assert_eq!(bytes.len() % 4, 0);
    assert_eq!(decode_message(&bytes).unwrap(), msg);
}

#[test]
fn test_missing_type_tags_means_no_arguments() {
    let decoded = decode_message(b"/setup-reply\0\0\0\0").unwrap();
    assert_eq!(decoded.address(), "/setup-reply");
    assert!(decoded.args().is_empty());
}

#[test]
fn test_bundle_is_flattened_in_order() {
    let a = OscMessage::new("/analogOutputs/0").with_float(1.0).with_float(3.0);
    let b = OscMessage::new("/analogOutputs/1").with_float(0.0).with_float(3.0);
    let packet = encode_bundle(&[a.clone(), b.clone()]);

    assert_eq!(decode_packet(&packet).unwrap(), vec![a, b]);
}

/// Wrap `inner` in a bundle `levels` times.
fn nest(inner: Vec<u8>, levels: usize) -> Vec<u8> {
    let mut packet = inner;
    for _ in 0..levels {
        let mut outer = Vec::new();
        outer.extend_from_slice(b"#bundle\0");
        outer.extend_from_slice(&1u64.to_be_bytes());
        outer.extend_from_slice(&(packet.len() as i32).to_be_bytes());
        outer.extend_from_slice(&packet);
        packet = outer;
    }
    packet
}

#[test]
fn test_nested_bundles() {
    let msg = OscMessage::new("/osc-test").with_int(1).with_float(2.0);
    let packet = nest(encode(&msg), 3);
    assert_eq!(decode_packet(&packet).unwrap(), vec![msg]);
}

#[test]
fn test_bundle_depth_limit() {
    let msg = OscMessage::new("/x");
    assert!(decode_packet(&nest(encode(&msg), 8)).is_ok());
    assert_eq!(
        decode_packet(&nest(encode(&msg), 9)),
        Err(OscError::BundleTooDeep)
    );
}

#[test]
fn test_truncated_argument() {
    let mut bytes = encode(&OscMessage::new("/analogInputs/0").with_float(0.5));
    bytes.truncate(bytes.len() - 4);
    assert!(matches!(decode_message(&bytes), Err(OscError::Truncated(_))));
}

#[test]
fn test_misaligned_packet() {
    let mut bytes = encode(&OscMessage::new("/a").with_int(1));
    bytes.push(0);
    assert_eq!(decode_message(&bytes), Err(OscError::Misaligned(bytes.len())));
}

#[test]
fn test_unsupported_type() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"/a\0\0");
    bytes.extend_from_slice(b",x\0\0");
    assert_eq!(decode_message(&bytes), Err(OscError::UnsupportedType('x')));
}

#[test]
fn test_address_must_start_with_slash() {
    assert!(matches!(
        decode_message(b"abc\0,\0\0\0"),
        Err(OscError::InvalidAddress(_))
    ));
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = encode(&OscMessage::new("/a").with_int(1));
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    assert_eq!(decode_message(&bytes), Err(OscError::TrailingBytes(4)));
}

#[test]
fn test_bad_bundle_element_size() {
    let mut packet = Vec::new();
    packet.extend_from_slice(b"#bundle\0");
    packet.extend_from_slice(&1u64.to_be_bytes());
    packet.extend_from_slice(&6i32.to_be_bytes());
    packet.extend_from_slice(&[0; 8]);
    assert_eq!(decode_packet(&packet), Err(OscError::InvalidElementSize(6)));
}
