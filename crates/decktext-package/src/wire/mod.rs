//! Minimal reader for protobuf-style wire data.
//!
//! Only what the media index needs: varints, tags, length-delimited slices and
//! skipping. No schema, no nested message types.

pub mod scanner;
pub mod varint;

pub use scanner::{Tag, WireScanner, WireType, skip};
pub use varint::{read_varint, write_varint};
