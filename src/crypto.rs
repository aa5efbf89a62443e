//! Algorithm identifier registries referenced by subpacket values.
//!
//! These are pure wire-level registries: every octet value maps to a
//! variant (via the catch-all `Other`), so preference lists survive a
//! decode/encode round trip even when they carry identifiers this crate
//! does not recognize.

pub mod aead;
pub mod hash;
pub mod public_key;
pub mod sym;
