//! Codec for OpenPGP signature subpackets.
//!
//! Signature subpackets are the self-describing, length-prefixed metadata
//! records embedded in every OpenPGP signature packet: creation time, key
//! flags, preferred algorithms, notation data, issuer identifiers and so
//! on. This crate decodes a subpacket's header and body bytes into a
//! typed [`subpacket::Subpacket`] and serializes it back byte for byte,
//! including subpacket types it does not recognize. It deliberately does
//! not interpret what any of those values mean for trust decisions; the
//! type tag and the critical flag are surfaced for the caller to act on.
//!
//! ```
//! use pgp_subpacket::ser::Serialize;
//! use pgp_subpacket::subpacket::{Subpacket, SubpacketData};
//!
//! // signature expiration time of 1024 seconds
//! let raw = [0x05, 0x03, 0x00, 0x00, 0x04, 0x00];
//! let subpacket = Subpacket::from_buf(&raw[..]).unwrap();
//! assert!(!subpacket.is_critical);
//! assert!(matches!(
//!     subpacket.data,
//!     SubpacketData::SignatureExpirationTime(_)
//! ));
//! assert_eq!(subpacket.to_bytes().unwrap(), raw);
//! ```

#![forbid(unsafe_code)]

pub mod crypto;
pub mod errors;
pub mod parsing;
pub mod ser;
pub mod subpacket;
pub mod types;
