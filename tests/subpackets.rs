use bytes::{Buf, Bytes};
use chrono::Duration;
use hex_literal::hex;

use pgp_subpacket::errors::Error;
use pgp_subpacket::ser::Serialize;
use pgp_subpacket::subpacket::{
    Subpacket, SubpacketData, SubpacketHeader, SubpacketLength, SubpacketType,
};
use pgp_subpacket::types::KeyVersion;

#[test]
fn expiration_time_roundtrip() {
    // length 5, type 3 (signature expiration), 1024 seconds
    let raw = hex!("05 03 00000400");
    let sp = Subpacket::from_buf(&mut &raw[..]).unwrap();

    assert!(!sp.is_critical);
    assert_eq!(sp.typ(), SubpacketType::SignatureExpirationTime);
    assert_eq!(
        sp.data,
        SubpacketData::SignatureExpirationTime(Duration::seconds(1024))
    );
    assert_eq!(sp.to_bytes().unwrap(), raw);
}

#[test]
fn critical_bit_independence() {
    // same subpacket, type octet 0x03 vs 0x83
    let plain = hex!("05 03 00000400");
    let critical = hex!("05 83 00000400");

    let a = Subpacket::from_buf(&mut &plain[..]).unwrap();
    let b = Subpacket::from_buf(&mut &critical[..]).unwrap();

    assert!(!a.is_critical);
    assert!(b.is_critical);
    assert_eq!(a.typ(), b.typ());
    assert_eq!(a.data, b.data);

    let a_bytes = a.to_bytes().unwrap();
    let b_bytes = b.to_bytes().unwrap();
    assert_eq!(a_bytes, plain);
    assert_eq!(b_bytes, critical);
    // the encodings differ only in bit 7 of the type octet
    assert_eq!(a_bytes[1] | 0x80, b_bytes[1]);
    assert_eq!(&a_bytes[2..], &b_bytes[2..]);
}

#[test]
fn truncated_five_octet_length() {
    let raw = hex!("ff 000001");
    let err = SubpacketHeader::from_buf(&mut &raw[..]).unwrap_err();
    assert!(err.is_incomplete());
}

#[test]
fn body_shorter_than_declared() {
    // declares 9 octets of type + body, supplies 3
    let raw = hex!("09 10 010203");
    let err = Subpacket::from_buf(&mut &raw[..]).unwrap_err();
    assert!(err.is_incomplete());
}

#[test]
fn unknown_type_roundtrip_verbatim() {
    // type code 0x5F is unassigned; 6 arbitrary body bytes
    let raw = hex!("07 5f 0ddc0ffeebad");
    let sp = Subpacket::from_buf(&mut &raw[..]).unwrap();

    assert_eq!(sp.typ(), SubpacketType::Other(0x5F));
    assert_eq!(
        sp.data,
        SubpacketData::Other(0x5F, Bytes::from_static(&hex!("0ddc0ffeebad")))
    );
    assert_eq!(sp.to_bytes().unwrap(), raw);
}

#[test]
fn unknown_critical_type_is_surfaced_not_rejected() {
    let raw = hex!("03 ea beef");
    let sp = Subpacket::from_buf(&mut &raw[..]).unwrap();

    // 0xEA & 0x7F = 0x6A = 106, experimental range
    assert!(sp.is_critical);
    assert_eq!(sp.typ(), SubpacketType::Experimental(106));
    assert_eq!(sp.to_bytes().unwrap(), raw);
}

#[test]
fn non_minimal_length_prefix_is_preserved() {
    // the same 6-byte unknown subpacket, length 7 encoded in 5 octets
    let raw = hex!("ff 00000007 5f 0ddc0ffeebad");
    let sp = Subpacket::from_buf(&mut &raw[..]).unwrap();

    assert_eq!(sp.len, SubpacketLength::Five(7));
    assert_eq!(sp.to_bytes().unwrap(), raw);

    // a freshly built subpacket with the same value uses the minimal form
    let rebuilt = Subpacket::regular(sp.data.clone()).unwrap();
    assert_eq!(rebuilt.len, SubpacketLength::One(7));
    assert_eq!(rebuilt.to_bytes().unwrap(), hex!("07 5f 0ddc0ffeebad"));
}

#[test]
fn notation_with_inconsistent_lengths() {
    // flags + name-len 16 + value-len 16, but only 4 bytes of payload
    let raw = hex!("0d 14 80000000 0010 0010 74657374");
    let err = Subpacket::from_buf(&mut &raw[..]).unwrap_err();
    assert!(matches!(err, Error::MalformedSubpacket { .. }));
}

#[test]
fn duplicate_is_independent_and_equal() {
    let raw = hex!("07 5f 0ddc0ffeebad");
    let sp = Subpacket::from_buf(&mut &raw[..]).unwrap();
    let copy = sp.clone();

    assert_eq!(sp, copy);
    assert_eq!(copy.to_bytes().unwrap(), sp.to_bytes().unwrap());
    drop(sp);
    // the clone owns its payload
    assert_eq!(copy.to_bytes().unwrap(), raw);
}

/// Slices a subpacket region the way the outer signature packet parser
/// would: one header + body at a time until the region is exhausted.
#[test]
fn hashed_region_scan() {
    // creation time, issuer fingerprint (v4), key flags, pref. hash algos,
    // and a critical experimental subpacket
    let region: Vec<u8> = [
        &hex!("05 02 65000000")[..],
        &hex!("16 21 04 42f2b2b9e1b6aec62d9bba1a3e5b2fe876e57d2b")[..],
        &hex!("02 1b 03")[..],
        &hex!("04 15 0a080b")[..],
        &hex!("03 e5 0102")[..],
    ]
    .concat();

    let mut buf = &region[..];
    let mut subpackets = Vec::new();
    while buf.has_remaining() {
        subpackets.push(Subpacket::from_buf(&mut buf).unwrap());
    }

    assert_eq!(subpackets.len(), 5);
    assert_eq!(subpackets[0].typ(), SubpacketType::SignatureCreationTime);
    assert_eq!(subpackets[1].typ(), SubpacketType::IssuerFingerprint);
    match &subpackets[1].data {
        SubpacketData::IssuerFingerprint(fp) => {
            assert_eq!(fp.version(), KeyVersion::V4);
            assert_eq!(fp.len(), 20);
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(subpackets[2].typ(), SubpacketType::KeyFlags);
    assert_eq!(subpackets[3].typ(), SubpacketType::PreferredHashAlgorithms);
    assert_eq!(subpackets[4].typ(), SubpacketType::Experimental(0x65));
    assert!(subpackets[4].is_critical);

    // re-serializing the whole region reproduces it byte for byte
    assert_eq!(subpackets.as_slice().write_len(), region.len());
    assert_eq!(subpackets.to_bytes().unwrap(), region);
}

#[test]
fn header_exposes_lengths() {
    let raw = hex!("c0 40 21 04");
    let header = SubpacketHeader::from_buf(&mut &raw[..]).unwrap();

    // two-octet encoding: ((0xC0 - 192) << 8) + 0x40 + 192 = 256
    assert_eq!(header.len(), 256);
    assert_eq!(header.prefix_len(), 2);
    assert_eq!(header.body_len(), 255);
    assert_eq!(header.typ(), SubpacketType::IssuerFingerprint);
    assert!(!header.is_critical());
}
