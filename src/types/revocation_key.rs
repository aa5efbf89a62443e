use crate::crypto::public_key::PublicKeyAlgorithm;

/// Designated revoker for a key.
/// Ref: <https://tools.ietf.org/html/rfc4880.html#section-5.2.3.15>
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct RevocationKey {
    pub class: u8,
    pub algorithm: PublicKeyAlgorithm,
    // TODO: V5 keys carry a 32-octet fingerprint here
    pub fingerprint: [u8; 20],
}

impl RevocationKey {
    pub fn new(class: u8, algorithm: PublicKeyAlgorithm, fingerprint: [u8; 20]) -> Self {
        RevocationKey {
            class,
            algorithm,
            fingerprint,
        }
    }
}
