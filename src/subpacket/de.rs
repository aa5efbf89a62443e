use bstr::BString;
use bytes::{Buf, Bytes};
use chrono::{DateTime, Duration};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::crypto::{
    aead::AeadAlgorithm, hash::HashAlgorithm, public_key::PublicKeyAlgorithm,
    sym::SymmetricKeyAlgorithm,
};
use crate::errors::{bail, ensure, Error, Result};
use crate::parsing::BufParsing;
use crate::types::{CompressionAlgorithm, Fingerprint, KeyId, KeyVersion, RevocationKey};

use super::types::{
    Notation, RevocationCode, Subpacket, SubpacketData, SubpacketHeader, SubpacketLength,
    SubpacketType,
};

impl SubpacketLength {
    /// Parses a subpacket length from the given buffer.
    ///
    /// The encoding form is preserved, so a non-minimal length received
    /// off the wire re-serializes identically.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let olen = i.read_u8()?;
        let len = match olen {
            // One-Octet Lengths
            0..=191 => Self::One(olen),
            // Two-Octet Lengths
            192..=254 => {
                let a = i.read_u8()?;
                let l = ((olen as u16 - 192) << 8) + 192 + a as u16;
                Self::Two(l)
            }
            255 => {
                let len = i.read_be_u32()?;
                Self::Five(len)
            }
        };
        Ok(len)
    }
}

impl SubpacketHeader {
    /// Parses a subpacket header: the length prefix followed by the type
    /// octet, which is the first octet of the declared region.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let length = SubpacketLength::from_buf(&mut i)?;
        // at minimum the type octet must be present
        ensure!(!length.is_empty(), "subpacket with a declared length of zero");
        let (typ, is_critical) = SubpacketType::from_u8(i.read_u8()?);

        Ok(SubpacketHeader {
            length,
            typ,
            is_critical,
        })
    }
}

impl Subpacket {
    /// Parses a single complete subpacket, consuming exactly its bytes.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let header = SubpacketHeader::from_buf(&mut i)?;
        Self::from_header_and_body(header, i)
    }

    /// Parses the subpacket body described by an already parsed header.
    ///
    /// Fails with a truncation error if fewer bytes are supplied than the
    /// header declared; exactly `header.body_len()` bytes are consumed.
    pub fn from_header_and_body<B: Buf>(header: SubpacketHeader, mut body: B) -> Result<Self> {
        let body = body.take_bytes(header.body_len())?;
        let data = SubpacketData::from_buf(header.typ, body)?;

        Ok(Subpacket {
            is_critical: header.is_critical,
            data,
            len: header.length,
        })
    }
}

fn algo_list<T: From<u8>, A: smallvec::Array<Item = T>>(mut i: Bytes) -> SmallVec<A> {
    let mut list = SmallVec::new();
    while i.has_remaining() {
        list.push(T::from(i.get_u8()));
    }
    list
}

fn read_bool(i: &mut Bytes) -> Result<bool> {
    let v = i.read_u8()?;
    match v {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(Error::malformed(format!("invalid boolean octet {v:#04x}"))),
    }
}

impl SubpacketData {
    /// Decodes the body of a subpacket of the given type.
    ///
    /// `body` must be exactly the subpacket body, without the length
    /// prefix or the type octet. Bodies of unrecognized types are
    /// captured verbatim and never rejected; errors are reserved for
    /// bytes that do not fit the shape a known type requires.
    pub fn from_buf(typ: SubpacketType, body: Bytes) -> Result<Self> {
        debug!("parsing subpacket {:?} {}", typ, hex::encode(&body));
        let res = Self::body_from_buf(typ, body);
        if let Err(ref err) = res {
            warn!("invalid subpacket {:?}: {:?}", typ, err);
        }
        res
    }

    fn body_from_buf(typ: SubpacketType, mut i: Bytes) -> Result<Self> {
        let data = match typ {
            SubpacketType::SignatureCreationTime => {
                // 4-octet time field
                ensure!(i.remaining() == 4, "signature creation time must be 4 bytes, got {}", i.remaining());
                let ts = i.read_be_u32()?;
                let time = DateTime::from_timestamp(i64::from(ts), 0)
                    .ok_or_else(|| Error::malformed(format!("invalid timestamp {ts}")))?;
                SubpacketData::SignatureCreationTime(time)
            }
            SubpacketType::SignatureExpirationTime => {
                ensure!(i.remaining() == 4, "signature expiration time must be 4 bytes, got {}", i.remaining());
                let d = Duration::seconds(i64::from(i.read_be_u32()?));
                SubpacketData::SignatureExpirationTime(d)
            }
            SubpacketType::KeyExpirationTime => {
                ensure!(i.remaining() == 4, "key expiration time must be 4 bytes, got {}", i.remaining());
                let d = Duration::seconds(i64::from(i.read_be_u32()?));
                SubpacketData::KeyExpirationTime(d)
            }
            SubpacketType::ExportableCertification => {
                ensure!(i.remaining() == 1, "exportable certification must be 1 byte, got {}", i.remaining());
                SubpacketData::ExportableCertification(read_bool(&mut i)?)
            }
            SubpacketType::TrustSignature => {
                ensure!(i.remaining() == 2, "trust signature must be 2 bytes, got {}", i.remaining());
                let depth = i.read_u8()?;
                let value = i.read_u8()?;
                SubpacketData::TrustSignature(depth, value)
            }
            SubpacketType::RegularExpression => {
                SubpacketData::RegularExpression(BString::new(i.rest().to_vec()))
            }
            SubpacketType::Revocable => {
                ensure!(i.remaining() == 1, "revocable must be 1 byte, got {}", i.remaining());
                SubpacketData::Revocable(read_bool(&mut i)?)
            }
            SubpacketType::PreferredSymmetricAlgorithms => {
                // zero or more octets, one per algorithm; empty means no preference
                SubpacketData::PreferredSymmetricAlgorithms(algo_list::<
                    SymmetricKeyAlgorithm,
                    [SymmetricKeyAlgorithm; 8],
                >(i.rest()))
            }
            SubpacketType::RevocationKey => {
                ensure!(i.remaining() == 22, "revocation key must be 22 bytes, got {}", i.remaining());
                let class = i.read_u8()?;
                let algorithm = PublicKeyAlgorithm::from(i.read_u8()?);
                let fingerprint = i.read_array::<20>()?;
                SubpacketData::RevocationKey(RevocationKey::new(class, algorithm, fingerprint))
            }
            SubpacketType::Issuer => {
                ensure!(i.remaining() == 8, "issuer key id must be 8 bytes, got {}", i.remaining());
                SubpacketData::Issuer(KeyId::from_slice(&i.rest())?)
            }
            SubpacketType::Notation => {
                ensure!(i.remaining() >= 8, "notation data too short: {} bytes", i.remaining());
                let flags = i.read_array::<4>()?;
                let name_len = usize::from(i.read_be_u16()?);
                let value_len = usize::from(i.read_be_u16()?);
                ensure!(
                    i.remaining() == name_len + value_len,
                    "notation name ({}) and value ({}) lengths do not match body: {} bytes remain",
                    name_len,
                    value_len,
                    i.remaining()
                );
                let name = i.take_bytes(name_len)?;
                let name = std::str::from_utf8(&name)
                    .map_err(|_| Error::malformed("notation name is not valid utf-8"))?
                    .to_string();
                let value = BString::new(i.take_bytes(value_len)?.to_vec());
                SubpacketData::Notation(Notation { flags, name, value })
            }
            SubpacketType::PreferredHashAlgorithms => SubpacketData::PreferredHashAlgorithms(
                algo_list::<HashAlgorithm, [HashAlgorithm; 8]>(i.rest()),
            ),
            SubpacketType::PreferredCompressionAlgorithms => {
                SubpacketData::PreferredCompressionAlgorithms(algo_list::<
                    CompressionAlgorithm,
                    [CompressionAlgorithm; 8],
                >(i.rest()))
            }
            SubpacketType::KeyServerPreferences => {
                SubpacketData::KeyServerPreferences(SmallVec::from_slice(&i.rest()))
            }
            SubpacketType::PreferredKeyServer => {
                let body = i.rest();
                let uri = std::str::from_utf8(&body)
                    .map_err(|_| Error::malformed("preferred key server is not valid utf-8"))?;
                SubpacketData::PreferredKeyServer(uri.to_string())
            }
            SubpacketType::PrimaryUserId => {
                ensure!(i.remaining() == 1, "primary user id must be 1 byte, got {}", i.remaining());
                SubpacketData::IsPrimary(read_bool(&mut i)?)
            }
            SubpacketType::PolicyURI => {
                let body = i.rest();
                let uri = std::str::from_utf8(&body)
                    .map_err(|_| Error::malformed("policy uri is not valid utf-8"))?;
                SubpacketData::PolicyURI(uri.to_string())
            }
            SubpacketType::KeyFlags => SubpacketData::KeyFlags(SmallVec::from_slice(&i.rest())),
            SubpacketType::SignersUserID => {
                SubpacketData::SignersUserID(BString::new(i.rest().to_vec()))
            }
            SubpacketType::RevocationReason => {
                ensure!(i.remaining() >= 1, "revocation reason must have a code octet");
                let code = RevocationCode::from(i.read_u8()?);
                let reason = BString::new(i.rest().to_vec());
                SubpacketData::RevocationReason(code, reason)
            }
            SubpacketType::Features => SubpacketData::Features(SmallVec::from_slice(&i.rest())),
            SubpacketType::SignatureTarget => {
                ensure!(i.remaining() >= 2, "signature target too short: {} bytes", i.remaining());
                let pub_alg = PublicKeyAlgorithm::from(i.read_u8()?);
                let hash_alg = HashAlgorithm::from(i.read_u8()?);
                SubpacketData::SignatureTarget(pub_alg, hash_alg, i.rest())
            }
            SubpacketType::EmbeddedSignature => {
                // kept opaque, the caller recurses if it wants to
                SubpacketData::EmbeddedSignature(i.rest())
            }
            SubpacketType::IssuerFingerprint => {
                ensure!(i.remaining() >= 1, "issuer fingerprint must have a version octet");
                let version = KeyVersion::from(i.read_u8()?);
                SubpacketData::IssuerFingerprint(Fingerprint::new(version, i.rest())?)
            }
            SubpacketType::IntendedRecipientFingerprint => {
                ensure!(i.remaining() >= 1, "intended recipient fingerprint must have a version octet");
                let version = KeyVersion::from(i.read_u8()?);
                SubpacketData::IntendedRecipientFingerprint(Fingerprint::new(version, i.rest())?)
            }
            SubpacketType::PreferredEncryptionModes => SubpacketData::PreferredEncryptionModes(
                algo_list::<AeadAlgorithm, [AeadAlgorithm; 2]>(i.rest()),
            ),
            SubpacketType::PreferredAead => {
                ensure!(
                    i.remaining() % 2 == 0,
                    "preferred aead ciphersuites must be pairs, got {} bytes",
                    i.remaining()
                );
                let mut suites = SmallVec::new();
                while i.has_remaining() {
                    let sym = SymmetricKeyAlgorithm::from(i.read_u8()?);
                    let aead = AeadAlgorithm::from(i.read_u8()?);
                    suites.push((sym, aead));
                }
                SubpacketData::PreferredAeadAlgorithms(suites)
            }
            SubpacketType::Experimental(n) => SubpacketData::Experimental(n, i.rest()),
            SubpacketType::Other(n) => SubpacketData::Other(n, i.rest()),
        };

        if i.has_remaining() {
            bail!("{} trailing bytes after {:?} body", i.remaining(), typ);
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use hex_literal::hex;

    fn decode(typ_octet: u8, body: &'static [u8]) -> Result<SubpacketData> {
        let (typ, _) = SubpacketType::from_u8(typ_octet);
        SubpacketData::from_buf(typ, Bytes::from_static(body))
    }

    #[test]
    fn fixed_width_mismatch_is_malformed() {
        for (typ, body) in [
            (2u8, &b"\x00\x00\x00"[..]),      // creation time, 3 bytes
            (3, &b"\x00\x00\x00\x00\x00"[..]), // expiration, 5 bytes
            (16, &b"\x01\x02\x03"[..]),        // issuer, 3 bytes
            (5, &b"\x01"[..]),                 // trust sig, 1 byte
            (12, &b"\x80\x01"[..]),            // revocation key, 2 bytes
        ] {
            let (typ, _) = SubpacketType::from_u8(typ);
            let err = SubpacketData::from_buf(typ, Bytes::copy_from_slice(body)).unwrap_err();
            assert!(
                matches!(err, Error::MalformedSubpacket { .. }),
                "{typ:?}: {err:?}"
            );
        }
    }

    #[test]
    fn boolean_octets_are_strict() {
        assert_eq!(
            decode(7, b"\x01").unwrap(),
            SubpacketData::Revocable(true)
        );
        assert_eq!(
            decode(7, b"\x00").unwrap(),
            SubpacketData::Revocable(false)
        );
        let err = decode(7, b"\x02").unwrap_err();
        assert!(matches!(err, Error::MalformedSubpacket { .. }));
    }

    #[test]
    fn empty_preference_list_is_legal() {
        assert_eq!(
            decode(11, b"").unwrap(),
            SubpacketData::PreferredSymmetricAlgorithms(SmallVec::new())
        );
    }

    #[test]
    fn preference_list_keeps_unknown_identifiers() {
        let data = decode(11, &[9, 8, 7, 0xFE]).unwrap();
        assert_eq!(
            data,
            SubpacketData::PreferredSymmetricAlgorithms(smallvec::smallvec![
                SymmetricKeyAlgorithm::AES256,
                SymmetricKeyAlgorithm::AES192,
                SymmetricKeyAlgorithm::AES128,
                SymmetricKeyAlgorithm::Other(0xFE),
            ])
        );
    }

    #[test]
    fn notation_lengths_must_match_body() {
        // declared 5-byte name + 4-byte value, only 3 bytes supplied
        let body = hex!("80000000 0005 0004 616263");
        let (typ, _) = SubpacketType::from_u8(20);
        let err = SubpacketData::from_buf(typ, Bytes::copy_from_slice(&body)).unwrap_err();
        assert!(matches!(err, Error::MalformedSubpacket { .. }));
    }

    #[test]
    fn notation_decodes() {
        let body = hex!("80000000 0004 0005 74657374 76616c7565");
        let (typ, _) = SubpacketType::from_u8(20);
        let data = SubpacketData::from_buf(typ, Bytes::copy_from_slice(&body)).unwrap();
        match data {
            SubpacketData::Notation(n) => {
                assert!(n.human_readable());
                assert_eq!(n.name, "test");
                assert_eq!(n.value, BString::from("value"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn notation_name_must_be_text() {
        let body = hex!("80000000 0002 0000 fffe");
        let (typ, _) = SubpacketType::from_u8(20);
        let err = SubpacketData::from_buf(typ, Bytes::copy_from_slice(&body)).unwrap_err();
        assert!(matches!(err, Error::MalformedSubpacket { .. }));
    }

    #[test]
    fn uri_subpackets_must_be_text() {
        // preferred key server and policy uri both require utf-8 bodies
        for typ_octet in [24u8, 26] {
            let err = decode(typ_octet, b"\xff\xfe").unwrap_err();
            assert!(
                matches!(err, Error::MalformedSubpacket { .. }),
                "type {typ_octet}: {err:?}"
            );
        }
        assert_eq!(
            decode(26, b"https://example.com/policy").unwrap(),
            SubpacketData::PolicyURI("https://example.com/policy".to_string())
        );
    }

    #[test]
    fn unknown_type_never_fails() {
        let (typ, is_critical) = SubpacketType::from_u8(95);
        assert_eq!(typ, SubpacketType::Other(95));
        assert!(!is_critical);

        let data = SubpacketData::from_buf(typ, Bytes::from_static(&[1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(
            data,
            SubpacketData::Other(95, Bytes::from_static(&[1, 2, 3, 4, 5, 6]))
        );
    }

    #[test]
    fn five_octet_prefix_truncated() {
        // 0xFF marker with only two of the four length octets
        let err = SubpacketLength::from_buf(&mut &hex!("ff 0001")[..]).unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn body_shorter_than_declared_is_truncated() {
        // declared length 5 (type octet + 4 body bytes), body has 2
        let raw = hex!("05 02 0102");
        let err = Subpacket::from_buf(&mut &raw[..]).unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn zero_length_is_malformed() {
        let err = SubpacketHeader::from_buf(&mut &hex!("00 02")[..]).unwrap_err();
        assert!(matches!(err, Error::MalformedSubpacket { .. }));
    }

    #[test]
    fn aead_suites_must_be_pairs() {
        let err = decode(39, &[9, 2, 9]).unwrap_err();
        assert!(matches!(err, Error::MalformedSubpacket { .. }));
    }
}
