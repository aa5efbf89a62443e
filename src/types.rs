//! Shared wire-level types carried inside subpacket values.

mod compression;
mod fingerprint;
mod key_id;
mod revocation_key;

pub use self::compression::CompressionAlgorithm;
pub use self::fingerprint::{Fingerprint, KeyVersion};
pub use self::key_id::KeyId;
pub use self::revocation_key::RevocationKey;
