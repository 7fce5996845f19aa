//! 12-byte structural tags found at the start of a container and at the
//! front of some page payloads.
//!
//! # Layout
//! ```text
//! offset  size  field
//!      0     4  signature (ASCII, NUL-padded on the right)
//!      4     4  field_a   (u32 LE)
//!      8     4  field_b   (u32 LE)
//! ```
//!
//! Classification is an exact byte-for-byte lookup in [`KNOWN_TAGS`].  Any
//! other pattern is simply unclassified; it is never an error on its own.

use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::Cursor;

use crate::error::{JicError, Result};

pub const TAG_SIZE:      usize = 12;
pub const SIGNATURE_LEN: usize = 4;

// ── Known classes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    JicHeader,
    SofHeader,
    PofHeader,
    RawFirmware,
}

impl TagKind {
    pub const ALL: [TagKind; 4] = [
        TagKind::JicHeader,
        TagKind::PofHeader,
        TagKind::RawFirmware,
        TagKind::SofHeader,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TagKind::JicHeader   => "JIC_HEADER",
            TagKind::SofHeader   => "SOF_HEADER",
            TagKind::PofHeader   => "POF_HEADER",
            TagKind::RawFirmware => "RAW_FIRMWARE",
        }
    }

    /// The exact 12-byte encoding of this class.
    pub fn encoding(&self) -> [u8; TAG_SIZE] {
        KNOWN_TAGS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(bytes, _)| *bytes)
            .unwrap_or([0u8; TAG_SIZE])
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const fn pack(signature: &[u8], field_a: u32, field_b: u32) -> [u8; TAG_SIZE] {
    let mut out = [0u8; TAG_SIZE];
    let mut i = 0;
    while i < signature.len() && i < SIGNATURE_LEN {
        out[i] = signature[i];
        i += 1;
    }
    let a = field_a.to_le_bytes();
    let b = field_b.to_le_bytes();
    let mut j = 0;
    while j < 4 {
        out[SIGNATURE_LEN + j]     = a[j];
        out[SIGNATURE_LEN + 4 + j] = b[j];
        j += 1;
    }
    out
}

pub const KNOWN_TAGS: [([u8; TAG_SIZE], TagKind); 4] = [
    (pack(b"JIC", 0,        0x08),     TagKind::JicHeader),
    (pack(b"SOF", 0,        0x0B),     TagKind::SofHeader),
    (pack(b"POF", 0x010000, 0x07),     TagKind::PofHeader),
    (pack(b"",    0,        0x010800), TagKind::RawFirmware),
];

// ── Tag ──────────────────────────────────────────────────────────────────────

/// Decoded view of a tag, independent of classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFields {
    /// Signature with trailing NULs stripped.
    pub signature: Vec<u8>,
    pub field_a:   u32,
    pub field_b:   u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    bytes: [u8; TAG_SIZE],
}

impl Tag {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; TAG_SIZE] = bytes
            .try_into()
            .map_err(|_| JicError::MalformedTag(bytes.len()))?;
        Ok(Self { bytes })
    }

    /// Build a tag from its fields.  The signature may be at most 4 bytes.
    pub fn new(signature: &[u8], field_a: u32, field_b: u32) -> Result<Self> {
        if signature.len() > SIGNATURE_LEN {
            return Err(JicError::MalformedTag(signature.len() + 8));
        }
        Ok(Self { bytes: pack(signature, field_a, field_b) })
    }

    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.bytes
    }

    /// Exact lookup against [`KNOWN_TAGS`]; `None` means unknown.
    pub fn classify(&self) -> Option<TagKind> {
        KNOWN_TAGS
            .iter()
            .find(|(bytes, _)| *bytes == self.bytes)
            .map(|(_, kind)| *kind)
    }

    pub fn is(&self, kind: TagKind) -> bool {
        self.classify() == Some(kind)
    }

    /// Compares only the first `signature.len()` bytes.
    pub fn matches_prefix(&self, signature: &[u8]) -> bool {
        self.bytes.starts_with(signature)
    }

    pub fn decode_fields(&self) -> TagFields {
        let raw = &self.bytes[..SIGNATURE_LEN];
        let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let mut cur = Cursor::new(&self.bytes[SIGNATURE_LEN..]);
        // 8 bytes are always available after the signature.
        let field_a = cur.read_u32::<LittleEndian>().unwrap_or_default();
        let field_b = cur.read_u32::<LittleEndian>().unwrap_or_default();
        TagFields { signature: raw[..end].to_vec(), field_a, field_b }
    }

    /// `4a 49 43 00  00 00 00 00  08 00 00 00`
    pub fn hexdump(&self) -> String {
        self.bytes
            .chunks(4)
            .map(|group| {
                group.iter().map(|b| hex::encode([*b])).collect::<Vec<_>>().join(" ")
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.classify() {
            Some(kind) => write!(f, "{kind}"),
            None       => write!(f, "unknown ({})", self.hexdump()),
        }
    }
}
