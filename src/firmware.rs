//! Firmware extraction from the type-28 page.
//!
//! The page payload is a 12-byte tag (expected `RAW_FIRMWARE`) followed by
//! the full configuration-device image, equivalent to an `.rpd` file.
//!
//! The image is returned untouched, trailing 0xFF padding included.  Erased
//! flash reads as 0xFF, and the real boot-image length cannot be known
//! without the device's block-allocation map, which the container does not
//! carry.

use crc32fast::Hasher;
use std::io::{Read, Seek};

use crate::container::Container;
use crate::error::{JicError, Result};
use crate::page_type::FIRMWARE_PAGE_TYPE;
use crate::tag::{Tag, TagKind, TAG_SIZE};

#[derive(Debug, Clone)]
pub struct FirmwareImage {
    /// Inner tag stripped from the payload.
    pub tag:         Tag,
    /// Offset of the page payload (the tag) in the container.
    pub page_offset: u64,
    pub data:        Vec<u8>,
}

impl FirmwareImage {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn crc32(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&self.data);
        hasher.finalize()
    }

    /// Number of trailing erased (0xFF) bytes.  Informational only.
    pub fn trailing_erased_len(&self) -> usize {
        self.data.iter().rev().take_while(|&&b| b == 0xFF).count()
    }
}

/// Locate the firmware page, validate its tag, and return the image.
///
/// Strict mode wants exactly one firmware page tagged `RAW_FIRMWARE`.
/// Lenient mode takes the first of one or more pages and skips the tag check.
pub fn read_firmware<R: Read + Seek>(container: &mut Container<R>) -> Result<FirmwareImage> {
    let strict = container.is_strict();
    let found  = container.index().count_of(FIRMWARE_PAGE_TYPE);

    let count_ok = if strict { found == 1 } else { found >= 1 };
    if !count_ok {
        return Err(JicError::UnexpectedFirmwarePageCount {
            type_code: FIRMWARE_PAGE_TYPE,
            expected:  if strict { "exactly 1" } else { "at least 1" },
            found,
        });
    }
    if found > 1 {
        log::warn!("{} firmware pages found, using the first", found);
    }

    let header = container.index().pages_of(FIRMWARE_PAGE_TYPE).next().copied();
    let Some(header) = header else {
        return Err(JicError::UnexpectedFirmwarePageCount {
            type_code: FIRMWARE_PAGE_TYPE,
            expected:  "at least 1",
            found,
        });
    };
    let mut payload = container.read_page(&header)?;
    if payload.len() < TAG_SIZE {
        return Err(JicError::MalformedTag(payload.len()));
    }
    let tag = Tag::parse(&payload[..TAG_SIZE])?;

    if !tag.is(TagKind::RawFirmware) {
        if strict {
            return Err(JicError::TagMismatch { found: tag.hexdump() });
        }
        log::warn!("firmware page tag {} is not {}", tag, TagKind::RawFirmware);
    }

    let data = payload.split_off(TAG_SIZE);
    log::debug!("firmware image: {} bytes at offset {}", data.len(), header.byte_offset + TAG_SIZE as u64);

    Ok(FirmwareImage { tag, page_offset: header.byte_offset, data })
}

/// Raw image bytes of the firmware page, tag stripped.
pub fn extract_firmware<R: Read + Seek>(container: &mut Container<R>) -> Result<Vec<u8>> {
    read_firmware(container).map(|fw| fw.data)
}
