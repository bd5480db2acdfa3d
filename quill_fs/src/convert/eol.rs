//! Line-ending rewriting on canonical UTF-16 text.
//!
//! The source style is never consulted; only the target matters. Each
//! direction pre-counts the exact output length and leaves the buffer
//! untouched when there is nothing to rewrite.

use std::borrow::Cow;

use crate::Result;
use crate::buffer::try_alloc;
use crate::format::LineEnding;

pub const CR: u16 = 0x000D;
pub const LF: u16 = 0x000A;

/// Line feeds that are at the very start or not preceded by a carriage return
pub fn count_bare_lf(units: &[u16]) -> usize {
    units
        .iter()
        .enumerate()
        .filter(|&(i, &u)| u == LF && (i == 0 || units[i - 1] != CR))
        .count()
}

pub fn count_crlf(units: &[u16]) -> usize {
    units.windows(2).filter(|w| w[0] == CR && w[1] == LF).count()
}

/// Rewrite line endings of `units` to `target`.
///
/// Returns the input unchanged (and unallocated) when no rewrite is needed,
/// along with whether a rewrite happened.
pub fn normalize(units: Cow<'_, [u16]>, target: LineEnding) -> Result<(Cow<'_, [u16]>, bool)> {
    let rewritten = match target {
        LineEnding::Windows => match count_bare_lf(&units) {
            0 => return Ok((units, false)),
            bare_lf => insert_cr(&units, bare_lf)?,
        },
        LineEnding::Unix => match count_crlf(&units) {
            0 => return Ok((units, false)),
            pairs => drop_cr(&units, pairs)?,
        },
    };
    Ok((Cow::Owned(rewritten), true))
}

/// Insert a carriage return before every bare line feed.
///
/// Text that already uses CRLF throughout, or has no line feed at all, is
/// left as is. Any bare line feed makes every bare line feed CRLF.
pub fn to_windows(units: Cow<'_, [u16]>) -> Result<Cow<'_, [u16]>> {
    normalize(units, LineEnding::Windows).map(|(units, _)| units)
}

/// Drop the carriage return of every CRLF pair. Lone carriage returns stay.
pub fn to_unix(units: Cow<'_, [u16]>) -> Result<Cow<'_, [u16]>> {
    normalize(units, LineEnding::Unix).map(|(units, _)| units)
}

fn insert_cr(units: &[u16], bare_lf: usize) -> Result<Vec<u16>> {
    let mut out = try_alloc(units.len() + bare_lf)?;
    let mut prev: Option<u16> = None;
    for &unit in units.iter() {
        if unit == LF && prev != Some(CR) {
            out.push(CR);
        }
        out.push(unit);
        prev = Some(unit);
    }
    Ok(out)
}

fn drop_cr(units: &[u16], pairs: usize) -> Result<Vec<u16>> {
    let mut out = try_alloc(units.len() - pairs)?;
    for (i, &unit) in units.iter().enumerate() {
        if unit == CR && units.get(i + 1) == Some(&LF) {
            continue;
        }
        out.push(unit);
    }
    Ok(out)
}
