use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use chrono::{DateTime, Duration, Utc};

use crate::errors::{unsupported_err, Error, Result};
use crate::ser::Serialize;

use super::types::{Subpacket, SubpacketData, SubpacketLength};

impl Serialize for SubpacketLength {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        // Each form only carries part of the value range. The variants are
        // public, so a caller-assembled value may fall outside its form.
        match self {
            Self::One(l) => {
                if *l > 191 {
                    unsupported_err!("one-octet length form cannot carry {}", l);
                }
                writer.write_u8(*l)?;
            }
            Self::Two(l) => {
                if !(192..=16319).contains(l) {
                    unsupported_err!("two-octet length form cannot carry {}", l);
                }
                writer.write_u8((((l - 192) >> 8) + 192) as u8)?;
                writer.write_u8(((l - 192) & 0xFF) as u8)?;
            }
            Self::Five(l) => {
                writer.write_u8(0xFF)?;
                writer.write_u32::<BigEndian>(*l)?
            }
        }
        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Two(_) => 2,
            Self::Five(_) => 5,
        }
    }
}

/// Convert an OpenPGP timestamp to its 4-octet wire form.
fn time_to_u32(t: &DateTime<Utc>) -> Result<u32> {
    u32::try_from(t.timestamp())
        .map_err(|_| Error::unsupported(format!("timestamp out of range: {}", t.timestamp())))
}

/// Convert an expiration `Duration` to its 4-octet wire form.
fn duration_to_u32(d: &Duration) -> Result<u32> {
    u32::try_from(d.num_seconds())
        .map_err(|_| Error::unsupported(format!("duration out of range: {}s", d.num_seconds())))
}

fn u16_len(len: usize, what: &str) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::unsupported(format!("{what} too long: {len} bytes")))
}

impl Serialize for Subpacket {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        // The stored length must still describe the value. A subpacket
        // assembled with a stale length field is refused rather than
        // silently repaired; the encoding form itself may be non-minimal
        // when it was preserved from parsing.
        let body_len = self.data.write_len();
        if self.len.len() != body_len + 1 {
            unsupported_err!(
                "subpacket length {} does not match value: {} body bytes",
                self.len.len(),
                body_len
            );
        }

        self.len.to_writer(writer)?;
        writer.write_u8(self.typ().as_u8(self.is_critical))?;
        self.data.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        self.len.write_len() + self.len.len()
    }
}

impl Serialize for SubpacketData {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            SubpacketData::SignatureCreationTime(t) => {
                writer.write_u32::<BigEndian>(time_to_u32(t)?)?;
            }
            SubpacketData::SignatureExpirationTime(d) => {
                writer.write_u32::<BigEndian>(duration_to_u32(d)?)?;
            }
            SubpacketData::KeyExpirationTime(d) => {
                writer.write_u32::<BigEndian>(duration_to_u32(d)?)?;
            }
            SubpacketData::Issuer(id) => {
                writer.write_all(id.as_ref())?;
            }
            SubpacketData::PreferredSymmetricAlgorithms(algs) => {
                for alg in algs {
                    writer.write_u8((*alg).into())?;
                }
            }
            SubpacketData::PreferredHashAlgorithms(algs) => {
                for alg in algs {
                    writer.write_u8((*alg).into())?;
                }
            }
            SubpacketData::PreferredCompressionAlgorithms(algs) => {
                for alg in algs {
                    writer.write_u8((*alg).into())?;
                }
            }
            SubpacketData::KeyServerPreferences(prefs) => {
                writer.write_all(prefs)?;
            }
            SubpacketData::KeyFlags(flags) => {
                writer.write_all(flags)?;
            }
            SubpacketData::Features(features) => {
                writer.write_all(features)?;
            }
            SubpacketData::RevocationReason(code, reason) => {
                writer.write_u8((*code).into())?;
                writer.write_all(reason.as_ref())?;
            }
            SubpacketData::IsPrimary(is_primary) => {
                writer.write_u8(u8::from(*is_primary))?;
            }
            SubpacketData::Revocable(revocable) => {
                writer.write_u8(u8::from(*revocable))?;
            }
            SubpacketData::EmbeddedSignature(sig) => {
                // opaque bytes, re-emitted untouched
                writer.write_all(sig)?;
            }
            SubpacketData::PreferredKeyServer(uri) => {
                writer.write_all(uri.as_bytes())?;
            }
            SubpacketData::Notation(notation) => {
                writer.write_all(&notation.flags)?;
                writer.write_u16::<BigEndian>(u16_len(notation.name.len(), "notation name")?)?;
                writer.write_u16::<BigEndian>(u16_len(notation.value.len(), "notation value")?)?;
                writer.write_all(notation.name.as_bytes())?;
                writer.write_all(notation.value.as_ref())?;
            }
            SubpacketData::RevocationKey(rev_key) => {
                writer.write_u8(rev_key.class)?;
                writer.write_u8(rev_key.algorithm.into())?;
                writer.write_all(&rev_key.fingerprint)?;
            }
            SubpacketData::SignersUserID(body) => {
                writer.write_all(body.as_ref())?;
            }
            SubpacketData::PolicyURI(uri) => {
                writer.write_all(uri.as_bytes())?;
            }
            SubpacketData::TrustSignature(depth, value) => {
                writer.write_u8(*depth)?;
                writer.write_u8(*value)?;
            }
            SubpacketData::RegularExpression(regexp) => {
                writer.write_all(regexp.as_ref())?;
            }
            SubpacketData::ExportableCertification(exportable) => {
                writer.write_u8(u8::from(*exportable))?;
            }
            SubpacketData::IssuerFingerprint(fp) => {
                writer.write_u8(fp.version().into())?;
                writer.write_all(fp.as_bytes())?;
            }
            SubpacketData::PreferredEncryptionModes(modes) => {
                for mode in modes {
                    writer.write_u8((*mode).into())?;
                }
            }
            SubpacketData::IntendedRecipientFingerprint(fp) => {
                writer.write_u8(fp.version().into())?;
                writer.write_all(fp.as_bytes())?;
            }
            SubpacketData::PreferredAeadAlgorithms(suites) => {
                for (sym, aead) in suites {
                    writer.write_u8((*sym).into())?;
                    writer.write_u8((*aead).into())?;
                }
            }
            SubpacketData::Experimental(_, body) => {
                writer.write_all(body)?;
            }
            SubpacketData::Other(_, body) => {
                writer.write_all(body)?;
            }
            SubpacketData::SignatureTarget(pub_alg, hash_alg, hash) => {
                writer.write_u8((*pub_alg).into())?;
                writer.write_u8((*hash_alg).into())?;
                writer.write_all(hash)?;
            }
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        match self {
            SubpacketData::SignatureCreationTime(_) => 4,
            SubpacketData::SignatureExpirationTime(_) => 4,
            SubpacketData::KeyExpirationTime(_) => 4,
            SubpacketData::Issuer(_) => 8,
            SubpacketData::PreferredSymmetricAlgorithms(algs) => algs.len(),
            SubpacketData::PreferredHashAlgorithms(algs) => algs.len(),
            SubpacketData::PreferredCompressionAlgorithms(algs) => algs.len(),
            SubpacketData::KeyServerPreferences(prefs) => prefs.len(),
            SubpacketData::KeyFlags(flags) => flags.len(),
            SubpacketData::Features(features) => features.len(),
            SubpacketData::RevocationReason(_, reason) => 1 + reason.len(),
            SubpacketData::IsPrimary(_) => 1,
            SubpacketData::Revocable(_) => 1,
            SubpacketData::EmbeddedSignature(sig) => sig.len(),
            SubpacketData::PreferredKeyServer(uri) => uri.len(),
            SubpacketData::Notation(n) => 4 + 2 + 2 + n.name.len() + n.value.len(),
            SubpacketData::RevocationKey(_) => 22,
            SubpacketData::SignersUserID(body) => body.len(),
            SubpacketData::PolicyURI(uri) => uri.len(),
            SubpacketData::TrustSignature(_, _) => 2,
            SubpacketData::RegularExpression(regexp) => regexp.len(),
            SubpacketData::ExportableCertification(_) => 1,
            SubpacketData::IssuerFingerprint(fp) => 1 + fp.len(),
            SubpacketData::PreferredEncryptionModes(modes) => modes.len(),
            SubpacketData::IntendedRecipientFingerprint(fp) => 1 + fp.len(),
            SubpacketData::PreferredAeadAlgorithms(suites) => 2 * suites.len(),
            SubpacketData::Experimental(_, body) => body.len(),
            SubpacketData::Other(_, body) => body.len(),
            SubpacketData::SignatureTarget(_, _, hash) => 2 + hash.len(),
        }
    }
}
