#![allow(dead_code)]

use jictool::TagKind;

/// Assemble container bytes from a root tag and (type_code, payload) records.
pub fn build_container(root: &[u8; 12], pages: &[(u16, Vec<u8>)]) -> Vec<u8> {
    let mut out = root.to_vec();
    for (type_code, payload) in pages {
        out.extend_from_slice(&type_code.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
    }
    out
}

pub fn jic(pages: &[(u16, Vec<u8>)]) -> Vec<u8> {
    build_container(&TagKind::JicHeader.encoding(), pages)
}

pub fn firmware_payload(image: &[u8]) -> Vec<u8> {
    let mut out = TagKind::RawFirmware.encoding().to_vec();
    out.extend_from_slice(image);
    out
}

/// A container shaped like a Quartus output: strings, checksum, firmware.
pub fn typical_jic(image: &[u8]) -> Vec<u8> {
    jic(&[
        (1,  b"Quartus Prime 18.1\0".to_vec()),
        (2,  b"EP4CE22F17\0".to_vec()),
        (3,  b"design\0".to_vec()),
        (27, b"EPCS16\0".to_vec()),
        (26, vec![0x01, 0x00, b'x', b'y', 0x00]),
        (28, firmware_payload(image)),
        (8,  vec![0xde, 0xad, 0xbe, 0xef]),
    ])
}
