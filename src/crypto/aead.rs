use num_enum::{FromPrimitive, IntoPrimitive};

/// Available AEAD algorithms.
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-aead-algorithms>
#[derive(Debug, PartialEq, Eq, Copy, Clone, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[non_exhaustive]
pub enum AeadAlgorithm {
    /// None
    None = 0,
    Eax = 1,
    Ocb = 2,
    Gcm = 3,

    #[num_enum(catch_all)]
    Other(u8),
}
