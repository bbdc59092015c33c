use crate::registry;
use decktext_types::{Family, Guid};
use sha2::{Digest, Sha256};

/// Version tag of the key derivation below.
///
/// Any change to `guid_for` silently re-keys every card that was generated
/// without an explicit key. Bump this and keep the old scheme reachable if the
/// derivation ever has to change.
pub const GUID_SCHEME: &str = "v1";

/// Anki's 91-symbol alphabet for rendering note guids.
const BASE91_TABLE: &[u8; 91] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

/// Hash `values` into a note guid.
///
/// The values are joined with `__`, hashed with SHA-256, and the first 8 bytes
/// of the digest are read as a big-endian integer and rendered in base 91,
/// most significant digit first.
pub fn guid_for(values: &[&str]) -> Guid {
    let joined = values.join("__");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    Guid::new(base91(u64::from_be_bytes(prefix)))
}

/// Derive the key of a card that carries no explicit key.
///
/// `content` is the whole card body for cloze cards and the first field for
/// basic cards. The family salt keeps the two namespaces apart.
pub fn derive_key(family: Family, content: &str) -> Guid {
    let salt = registry::salt(family).to_string();
    guid_for(&[content, salt.as_str()])
}

fn base91(mut value: u64) -> String {
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE91_TABLE[(value % 91) as usize]);
        value /= 91;
    }
    digits.reverse();
    // The table is pure ASCII.
    digits.into_iter().map(char::from).collect()
}
