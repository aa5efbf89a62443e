//! Codec for OpenPGP signature subpackets.
//!
//! A subpacket is one length-prefixed, typed metadata record inside the
//! hashed or unhashed region of a signature packet:
//!
//! ```text
//! [length prefix: 1, 2 or 5 octets][type octet: bit 7 critical][body]
//! ```
//!
//! The declared length counts the type octet plus the body, not the
//! prefix itself. Decoding turns header + body bytes into a typed
//! [`Subpacket`]; serializing a [`Subpacket`] reproduces the original
//! bytes exactly, including non-minimal length prefixes seen on the wire
//! and the bodies of subpacket types this crate does not recognize.

mod de;
mod ser;
mod types;

pub use self::types::{
    Notation, RevocationCode, Subpacket, SubpacketData, SubpacketHeader, SubpacketLength,
    SubpacketType,
};
