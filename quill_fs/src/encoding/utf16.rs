use super::DetectionConfig;

/// Little-endian UTF-16 byte-order mark as a code unit
pub const BOM_UNIT: u16 = 0xFEFF;

/// Iterate over the little-endian code units of `bytes`.
///
/// A trailing odd byte is ignored.
pub fn units_le(bytes: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
}

fn is_text_byte(b: u8) -> bool {
    (0x20..=0x7E).contains(&b) || matches!(b, b'\t' | b'\r' | b'\n')
}

/// Guess whether `bytes` hold little-endian UTF-16 text.
///
/// This is a heuristic, not a validator: short or ASCII-only buffers are
/// inherently ambiguous. The checks, in order:
/// - an `FF FE` signature wins outright, while a reversed `FE FF` or a UTF-8
///   signature rules UTF-16 out, as does an odd length
/// - a `0x0000` unit in the sample means binary data, not text
/// - mostly ASCII-compatible units (zero high byte, printable low byte)
/// - failing that, valid UTF-8 is left as UTF-8
/// - finally, few distinct high bytes against many distinct low bytes
///   points at text from a single non-Latin script block
pub fn looks_like_utf16(bytes: &[u8], config: &DetectionConfig) -> bool {
    if bytes.len() < 2 {
        return false;
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return true;
    }
    if bytes.starts_with(&[0xFE, 0xFF]) || bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return false;
    }
    if bytes.len() % 2 != 0 {
        return false;
    }

    let units = (bytes.len() / 2).min(config.sample_units.max(1));
    let sample = &bytes[..units * 2];

    let mut ascii = 0usize;
    let mut reversed = 0usize;
    let mut high_seen = [false; 256];
    let mut low_seen = [false; 256];

    for pair in sample.chunks_exact(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if lo == 0 && hi == 0 {
            return false;
        }
        if hi == 0 && is_text_byte(lo) {
            ascii += 1;
        } else if lo == 0 && is_text_byte(hi) {
            reversed += 1;
        }
        high_seen[hi as usize] = true;
        low_seen[lo as usize] = true;
    }

    if ascii > reversed && ascii as f64 >= units as f64 * config.ascii_ratio {
        return true;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return false;
    }

    let distinct_high = high_seen.iter().filter(|&&seen| seen).count();
    let distinct_low = low_seen.iter().filter(|&&seen| seen).count();
    units >= 8 && distinct_high * 3 < distinct_low
}
