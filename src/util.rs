//! Byte-level helpers shared by insertion and lookup.

use crate::Error;

/// The byte that terminates a string. It is never stored and never used as an index.
pub const SENTINEL: u8 = 0;

/// Returns the content of `bytes` up to (not including) the first sentinel.
pub fn content(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == SENTINEL) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Maps a byte to its slot position within a level.
///
/// Always goes through `u8`, so values 128..=255 land in the upper half of the
/// level instead of wrapping negative.
#[inline]
pub fn slot_index(byte: u8) -> usize {
    usize::from(byte)
}

/// Reserves room for exactly `additional` more elements in `vec`.
///
/// `what` names the allocation in the returned error.
pub fn reserve<T>(vec: &mut Vec<T>, additional: usize, what: &'static str) -> Result<(), Error> {
    vec.try_reserve_exact(additional)
        .map_err(|source| Error::Allocation { what, source })
}

/// Makes an owned copy of `bytes`, reporting allocation failure instead of aborting.
pub fn try_copy(bytes: &[u8], what: &'static str) -> Result<Vec<u8>, Error> {
    let mut copy = Vec::new();
    reserve(&mut copy, bytes.len(), what)?;
    copy.extend_from_slice(bytes);
    Ok(copy)
}
