use bytes::Bytes;
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::{Error, Result};

/// OpenPGP key versions.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum KeyVersion {
    V2 = 2,
    V3 = 3,
    V4 = 4,
    V5 = 5,
    V6 = 6,

    #[num_enum(catch_all)]
    Other(u8),
}

impl KeyVersion {
    /// Size of an OpenPGP fingerprint in bytes
    /// (returns `None` for unknown versions)
    pub const fn fingerprint_len(&self) -> Option<usize> {
        match self {
            KeyVersion::V2 | KeyVersion::V3 => Some(16), // MD5
            KeyVersion::V4 => Some(20),                  // SHA1
            KeyVersion::V5 | KeyVersion::V6 => Some(32), // SHA256
            KeyVersion::Other(_) => None,
        }
    }
}

/// Represents a Fingerprint.
///
/// Fingerprints for unknown key versions keep both the version octet and
/// the payload verbatim, so they survive re-serialization untouched.
#[derive(Clone, Eq, PartialEq, derive_more::Debug)]
pub enum Fingerprint {
    #[debug("{}", hex::encode(_0))]
    V2([u8; 16]),
    #[debug("{}", hex::encode(_0))]
    V3([u8; 16]),
    #[debug("{}", hex::encode(_0))]
    V4([u8; 20]),
    #[debug("{}", hex::encode(_0))]
    V5([u8; 32]),
    #[debug("{}", hex::encode(_0))]
    V6([u8; 32]),
    #[debug("v{version} {}", hex::encode(bytes))]
    Unknown { version: u8, bytes: Bytes },
}

impl Fingerprint {
    /// Constructs a fingerprint for the given key version, enforcing the
    /// version's fingerprint width for the versions that define one.
    pub fn new(version: KeyVersion, fp: Bytes) -> Result<Self> {
        let mismatch = |len: usize| {
            Error::malformed(format!("invalid {version:?} fingerprint length {len}"))
        };

        let fp = match version {
            KeyVersion::V2 => {
                Fingerprint::V2(fp.as_ref().try_into().map_err(|_| mismatch(fp.len()))?)
            }
            KeyVersion::V3 => {
                Fingerprint::V3(fp.as_ref().try_into().map_err(|_| mismatch(fp.len()))?)
            }
            KeyVersion::V4 => {
                Fingerprint::V4(fp.as_ref().try_into().map_err(|_| mismatch(fp.len()))?)
            }
            KeyVersion::V5 => {
                Fingerprint::V5(fp.as_ref().try_into().map_err(|_| mismatch(fp.len()))?)
            }
            KeyVersion::V6 => {
                Fingerprint::V6(fp.as_ref().try_into().map_err(|_| mismatch(fp.len()))?)
            }
            KeyVersion::Other(v) => Fingerprint::Unknown {
                version: v,
                bytes: fp,
            },
        };

        Ok(fp)
    }

    pub fn version(&self) -> KeyVersion {
        match self {
            Self::V2(_) => KeyVersion::V2,
            Self::V3(_) => KeyVersion::V3,
            Self::V4(_) => KeyVersion::V4,
            Self::V5(_) => KeyVersion::V5,
            Self::V6(_) => KeyVersion::V6,
            Self::Unknown { version, .. } => KeyVersion::from(*version),
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Self::V2(_) | Self::V3(_) => 16,
            Self::V4(_) => 20,
            Self::V5(_) | Self::V6(_) => 32,
            Self::Unknown { bytes, .. } => bytes.len(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::V2(fp) | Self::V3(fp) => &fp[..],
            Self::V4(fp) => &fp[..],
            Self::V5(fp) | Self::V6(fp) => &fp[..],
            Self::Unknown { bytes, .. } => bytes,
        }
    }
}
