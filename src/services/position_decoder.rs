//! Decoder for the `cloud_tabs.position` blob.
//!
//! The blob is a compressed JSON document of the form
//! `{"sortValues": [{"sortValue": 42, ...}, ...]}`. Only the first entry's
//! `sortValue` is used. Every failure mode yields `None`: a tab with an
//! unreadable position is still a valid tab.

use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};
use serde_json::Value;

/// Upper bound on the inflated payload; real blobs are a few hundred bytes.
const MAX_INFLATED_LEN: u64 = 1 << 20;

/// Extracts the sort value from a compressed position blob.
pub fn decode_position(blob: &[u8]) -> Option<i64> {
    if blob.is_empty() {
        return None;
    }
    let inflated = inflate(blob)?;
    sort_value_from_json(&inflated)
}

/// Inflates either a zlib stream or a raw deflate stream.
///
/// The browser writes raw deflate (no zlib header); zlib is accepted too.
pub fn inflate(blob: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let zlib = ZlibDecoder::new(blob)
        .take(MAX_INFLATED_LEN)
        .read_to_end(&mut out);
    if zlib.is_ok() && !out.is_empty() {
        return Some(out);
    }

    out.clear();
    match DeflateDecoder::new(blob)
        .take(MAX_INFLATED_LEN)
        .read_to_end(&mut out)
    {
        Ok(_) if !out.is_empty() => Some(out),
        _ => None,
    }
}

/// Reads `sortValues[0].sortValue` from an inflated JSON payload.
pub fn sort_value_from_json(payload: &[u8]) -> Option<i64> {
    let json: Value = serde_json::from_slice(payload).ok()?;
    json.get("sortValues")?
        .as_array()?
        .first()?
        .get("sortValue")?
        .as_i64()
}
