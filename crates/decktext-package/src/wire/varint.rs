use crate::error::{Error, Result};

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7f;

/// Decode a little-endian base-128 varint starting at `pos`.
///
/// Returns the value and the position just past its last byte. Bits beyond
/// the 64th are discarded; the length of the encoding is not bounded.
pub fn read_varint(buf: &[u8], pos: usize) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;
    let mut cursor = pos;

    loop {
        let Some(&byte) = buf.get(cursor) else {
            return Err(Error::TruncatedVarint { position: pos });
        };
        cursor += 1;

        let chunk = u64::from(byte & PAYLOAD);
        value |= chunk.checked_shl(shift).unwrap_or(0);

        if byte & CONTINUATION == 0 {
            return Ok((value, cursor));
        }
        shift = shift.saturating_add(7);
    }
}

/// Append the varint encoding of `value` to `out`.
pub fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= u64::from(CONTINUATION) {
        out.push((value as u8 & PAYLOAD) | CONTINUATION);
        value >>= 7;
    }
    out.push(value as u8);
}
