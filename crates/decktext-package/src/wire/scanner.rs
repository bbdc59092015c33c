use super::varint::read_varint;
use crate::error::{Error, Result};
use tracing::debug;

/// Wire type carried in the low three bits of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
    /// Group markers and reserved values. Not skippable without a schema.
    Unknown(u8),
}

impl WireType {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => WireType::Varint,
            1 => WireType::Fixed64,
            2 => WireType::LengthDelimited,
            5 => WireType::Fixed32,
            other => WireType::Unknown(other),
        }
    }
}

/// A decoded field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub field_number: u64,
    pub wire_type: WireType,
}

impl Tag {
    pub fn from_raw(raw: u64) -> Self {
        Self {
            field_number: raw >> 3,
            wire_type: WireType::from_bits((raw & 0x07) as u8),
        }
    }
}

/// Skip one value of `wire_type` starting at `pos`; returns the position after
/// it.
///
/// Unknown wire types are returned unchanged: the caller decides how to treat
/// a position that did not move.
pub fn skip(wire_type: WireType, buf: &[u8], pos: usize) -> Result<usize> {
    match wire_type {
        WireType::Varint => read_varint(buf, pos).map(|(_, next)| next),
        WireType::Fixed64 => advance(buf, pos, 8),
        WireType::Fixed32 => advance(buf, pos, 4),
        WireType::LengthDelimited => {
            let (len, start) = read_varint(buf, pos)?;
            advance(buf, start, to_len(len))
        }
        WireType::Unknown(_) => Ok(pos),
    }
}

fn advance(buf: &[u8], pos: usize, len: usize) -> Result<usize> {
    let available = buf.len().saturating_sub(pos);
    if len > available {
        return Err(Error::TruncatedPayload {
            position: pos,
            needed: len - available,
        });
    }
    Ok(pos + len)
}

fn to_len(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Cursor over a wire-format buffer.
#[derive(Debug)]
pub struct WireScanner<'a> {
    buf: &'a [u8],
    pos: usize,
    ignored_fields: usize,
}

impl<'a> WireScanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            ignored_fields: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Fields of unknown wire type passed over so far.
    pub fn ignored_fields(&self) -> usize {
        self.ignored_fields
    }

    pub fn read_tag(&mut self) -> Result<Tag> {
        self.read_varint().map(Tag::from_raw)
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let (value, next) = read_varint(self.buf, self.pos)?;
        self.pos = next;
        Ok(value)
    }

    /// Read a length prefix and return the bytes it covers.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let (len, start) = read_varint(self.buf, self.pos)?;
        let end = advance(self.buf, start, to_len(len))?;
        self.pos = end;
        Ok(&self.buf[start..end])
    }

    /// Skip the value belonging to `tag`.
    ///
    /// A field of unknown wire type is counted and left in place; the cursor
    /// already sits past its tag.
    pub fn skip(&mut self, tag: Tag) -> Result<()> {
        if let WireType::Unknown(bits) = tag.wire_type {
            debug!(
                field = tag.field_number,
                wire_type = bits,
                position = self.pos,
                "unknown field ignored"
            );
            self.ignored_fields += 1;
            return Ok(());
        }
        self.pos = skip(tag.wire_type, self.buf, self.pos)?;
        Ok(())
    }

    /// Fail unless the cursor moved past `since`.
    pub fn ensure_progress(&self, since: usize) -> Result<()> {
        if self.pos <= since {
            return Err(Error::ScanStalled { position: since });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_decoding() {
        let tag = Tag::from_raw(0x0a);
        assert_eq!(tag.field_number, 1);
        assert_eq!(tag.wire_type, WireType::LengthDelimited);

        let tag = Tag::from_raw(0x13);
        assert_eq!(tag.field_number, 2);
        assert_eq!(tag.wire_type, WireType::Unknown(3));
    }

    #[test]
    fn test_skip_each_known_type() {
        let buf = [0x96, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x02, b'h', b'i'];
        assert_eq!(skip(WireType::Varint, &buf, 0).unwrap(), 2);
        assert_eq!(skip(WireType::Fixed64, &buf, 2).unwrap(), 10);
        assert_eq!(skip(WireType::Fixed32, &buf, 10).unwrap(), 14);
        assert_eq!(skip(WireType::LengthDelimited, &buf, 14).unwrap(), 17);
    }

    #[test]
    fn test_skip_unknown_type_does_not_move() {
        assert_eq!(skip(WireType::Unknown(6), &[1, 2, 3], 1).unwrap(), 1);
    }

    #[test]
    fn test_skip_past_end_is_truncated_payload() {
        match skip(WireType::LengthDelimited, &[0x05, b'a'], 0) {
            Err(Error::TruncatedPayload { position, needed }) => {
                assert_eq!(position, 1);
                assert_eq!(needed, 4);
            }
            other => panic!("expected TruncatedPayload, got {:?}", other),
        }
        assert!(matches!(
            skip(WireType::Fixed32, &[0, 0], 0),
            Err(Error::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn test_scanner_reads_fields_in_order() {
        // field 1 "ab", field 2 varint 7
        let buf = [0x0a, 0x02, b'a', b'b', 0x10, 0x07];
        let mut scanner = WireScanner::new(&buf);

        let tag = scanner.read_tag().unwrap();
        assert_eq!(tag.field_number, 1);
        assert_eq!(scanner.read_length_delimited().unwrap(), b"ab");

        let tag = scanner.read_tag().unwrap();
        assert_eq!(tag.field_number, 2);
        assert_eq!(scanner.read_varint().unwrap(), 7);
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_scanner_counts_unknown_fields() {
        let buf = [0x0b, 0x08, 0x01];
        let mut scanner = WireScanner::new(&buf);

        let tag = scanner.read_tag().unwrap();
        scanner.skip(tag).unwrap();
        assert_eq!(scanner.ignored_fields(), 1);
        assert_eq!(scanner.position(), 1);

        let tag = scanner.read_tag().unwrap();
        scanner.skip(tag).unwrap();
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_ensure_progress() {
        let buf = [0x08, 0x01];
        let mut scanner = WireScanner::new(&buf);
        assert!(matches!(
            scanner.ensure_progress(0),
            Err(Error::ScanStalled { position: 0 })
        ));
        scanner.read_tag().unwrap();
        assert!(scanner.ensure_progress(0).is_ok());
    }
}
