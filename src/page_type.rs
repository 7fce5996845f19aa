//! Descriptive table of known page type codes.
//!
//! Purely informational: nothing in the parser branches on these entries.

use serde::Serialize;
use std::fmt;

/// Page type carrying the firmware image (12-byte tag + raw image).
pub const FIRMWARE_PAGE_TYPE: u16 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Binary,
    /// NUL-terminated text.
    String,
    Unknown,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayloadKind::Binary  => "BIN",
            PayloadKind::String  => "STR",
            PayloadKind::Unknown => "???",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageTypeInfo {
    pub type_code: u16,
    pub kind:      PayloadKind,
    pub label:     &'static str,
}

const PAGE_TYPES: &[(u16, PayloadKind, &str)] = &[
    (1,  PayloadKind::String, "Software version"),
    (2,  PayloadKind::String, "Chip name"),
    (3,  PayloadKind::String, "Title"),
    (8,  PayloadKind::Binary, "Small binary, likely checksum"),
    (26, PayloadKind::Binary, "Binary struct with embedded string"),
    (27, PayloadKind::String, "Configuration device name"),
    (FIRMWARE_PAGE_TYPE, PayloadKind::Binary, "Firmware (12-byte tag + raw image)"),
    (30, PayloadKind::Binary, "Unknown binary"),
];

pub fn describe(type_code: u16) -> PageTypeInfo {
    PAGE_TYPES
        .iter()
        .find(|(code, _, _)| *code == type_code)
        .map(|&(type_code, kind, label)| PageTypeInfo { type_code, kind, label })
        .unwrap_or(PageTypeInfo { type_code, kind: PayloadKind::Unknown, label: "Unknown type" })
}

impl fmt::Display for PageTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.label)
    }
}
