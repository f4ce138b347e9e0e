//! Decoding of the compressed position blob.

#[path = "../common/mod.rs"]
mod common;

use common::{raw_deflate, zlib};
use rstest::rstest;
use tabbridge::services::position_decoder::{decode_position, inflate, sort_value_from_json};

#[rstest]
#[case(r#"{"sortValues":[{"sortValue":0}]}"#, Some(0))]
#[case(r#"{"sortValues":[{"sortValue":123456789}]}"#, Some(123456789))]
#[case(r#"{"sortValues":[{"sortValue":-5},{"sortValue":9}]}"#, Some(-5))]
#[case(r#"{"sortValues":[]}"#, None)]
#[case(r#"{"sortValues":[{"other":1}]}"#, None)]
#[case(r#"{"sortValues":[{"sortValue":"12"}]}"#, None)]
#[case(r#"{"sortValues":[{"sortValue":1.5}]}"#, None)]
#[case(r#"[1,2,3]"#, None)]
fn test_raw_deflate_payloads(#[case] json: &str, #[case] expected: Option<i64>) {
    assert_eq!(decode_position(&raw_deflate(json.as_bytes())), expected);
}

#[rstest]
#[case(r#"{"sortValues":[{"sortValue":77}]}"#, Some(77))]
#[case(r#"{"nothing":true}"#, None)]
fn test_zlib_payloads(#[case] json: &str, #[case] expected: Option<i64>) {
    assert_eq!(decode_position(&zlib(json.as_bytes())), expected);
}

#[rstest]
#[case(&[])]
#[case(&[0x00])]
#[case(&[0xff, 0xfe, 0xfd])]
fn test_garbage_yields_none(#[case] blob: &[u8]) {
    assert_eq!(decode_position(blob), None);
}

#[test]
fn test_inflate_recovers_payload_from_both_framings() {
    let payload = b"hello cloud tabs";
    assert_eq!(inflate(&zlib(payload)).as_deref(), Some(&payload[..]));
    assert_eq!(inflate(&raw_deflate(payload)).as_deref(), Some(&payload[..]));
}

#[test]
fn test_uncompressed_json_is_not_accepted() {
    let json = br#"{"sortValues":[{"sortValue":1}]}"#;
    assert_eq!(decode_position(json), None);
    assert_eq!(sort_value_from_json(json), Some(1));
}
