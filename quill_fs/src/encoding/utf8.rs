use std::str::Utf8Error;

use super::Encoding;
use crate::buffer::try_alloc;
use crate::{Error, Result};

fn describe(err: &Utf8Error) -> &'static str {
    match err.error_len() {
        Some(_) => "malformed byte sequence",
        None => "truncated sequence at end of input",
    }
}

/// Number of UTF-16 units needed for `text`
pub fn measure_utf16(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Number of UTF-8 bytes needed for `units`.
///
/// Unpaired surrogates are measured as U+FFFD, which is what `encode_units`
/// writes in their place.
pub fn measure_utf8(units: &[u16]) -> usize {
    char::decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER).len_utf8())
        .sum()
}

/// Strictly decode UTF-8 into an exactly sized buffer of UTF-16 units.
pub fn decode_to_units(bytes: &[u8]) -> Result<Vec<u16>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::invalid(Encoding::Utf8, Some(e.valid_up_to()), describe(&e)))?;

    let needed = measure_utf16(text);
    let mut units = try_alloc(needed)?;
    units.extend(text.encode_utf16());

    if units.len() != needed {
        return Err(Error::invalid(
            Encoding::Utf8,
            None,
            format!("measured {needed} units but produced {}", units.len()),
        ));
    }
    Ok(units)
}

/// Append the UTF-8 form of `units` to `out`, returning the bytes written.
pub fn encode_units(units: &[u16], out: &mut Vec<u8>) -> usize {
    let start = out.len();
    let mut scratch = [0u8; 4];
    for decoded in char::decode_utf16(units.iter().copied()) {
        let ch = decoded.unwrap_or(char::REPLACEMENT_CHARACTER);
        out.extend_from_slice(ch.encode_utf8(&mut scratch).as_bytes());
    }
    out.len() - start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_utf16() {
        assert_eq!(measure_utf16("abc"), 3);
        assert_eq!(measure_utf16("é"), 1);
        assert_eq!(measure_utf16("🌍"), 2);
        assert_eq!(measure_utf16(""), 0);
    }

    #[test]
    fn test_measure_utf8() {
        let units: Vec<u16> = "a€🌍".encode_utf16().collect();
        assert_eq!(measure_utf8(&units), 1 + 3 + 4);
        assert_eq!(measure_utf8(&[0xD800]), 3);
    }

    #[test]
    fn test_decode_to_units() {
        let units = decode_to_units("Hello! 🌍".as_bytes()).unwrap();
        assert_eq!(units, "Hello! 🌍".encode_utf16().collect::<Vec<_>>());
        assert!(units.capacity() >= units.len());
    }

    #[test]
    fn test_lone_continuation_byte() {
        let err = decode_to_units(&[b'a', 0x80, b'b']).unwrap_err();
        match err {
            Error::InvalidEncoding { encoding, offset, .. } => {
                assert_eq!(encoding, Encoding::Utf8);
                assert_eq!(offset, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_sequence() {
        let err = decode_to_units(&[b'a', 0xE2, 0x82]).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_encode_units() {
        let units: Vec<u16> = "line\r\n€".encode_utf16().collect();
        let mut out = vec![0xEF, 0xBB, 0xBF];
        let written = encode_units(&units, &mut out);
        assert_eq!(written, measure_utf8(&units));
        assert_eq!(&out[3..], "line\r\n€".as_bytes());
    }

    #[test]
    fn test_encode_lone_surrogate_as_replacement() {
        let mut out = Vec::new();
        encode_units(&[0x61, 0xDC00], &mut out);
        assert_eq!(out, "a\u{FFFD}".as_bytes());
    }
}
