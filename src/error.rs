use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JicError {
    #[error("Tag must be exactly 12 bytes, got {0}")]
    MalformedTag(usize),
    #[error("Bad root tag: expected {expected}, found [{found}]")]
    BadRootTag { expected: &'static str, found: String },
    #[error("Stray bytes at the end of file: {0}-byte partial page header")]
    TruncatedHeader(usize),
    #[error("Page records end {0} bytes past the end of file")]
    TrailingOrMissingBytes(i64),
    #[error("Short read of page at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead { offset: u64, expected: u32, actual: usize },
    #[error("Page index {index} out of range ({count} pages)")]
    PageIndexOutOfRange { index: usize, count: usize },
    #[error("Expected {expected} firmware page(s) of type {type_code}, found {found}")]
    UnexpectedFirmwarePageCount { type_code: u16, expected: &'static str, found: usize },
    #[error("Firmware page tag mismatch: expected RAW_FIRMWARE, found [{found}]")]
    TagMismatch { found: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, JicError>;
