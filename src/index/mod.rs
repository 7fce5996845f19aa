//! Page index — a single forward pass over the record-header stream.
//!
//! # Record layout
//! ```text
//! offset  size  field
//!      0     2  type_code (u16 LE)
//!      2     4  size      (u32 LE)
//!      6  size  payload
//! ```
//! Records repeat until the source is exhausted.  The scan never reads
//! payload bytes; it seeks past them, so the cost is one header read per page.
//!
//! After the last record the cursor must sit exactly at end-of-source.  A
//! partial header (1–5 bytes) or a payload that runs past the end is corruption.

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::error::{JicError, Result};

pub const PAGE_HEADER_SIZE: usize = 6;

// ── PageHeader ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageHeader {
    pub type_code:   u16,
    /// Absolute position of the first payload byte.
    pub byte_offset: u64,
    pub size:        u32,
}

impl PageHeader {
    pub fn end_offset(&self) -> u64 {
        self.byte_offset + self.size as u64
    }
}

// ── PageIndex ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIndex {
    pages:   Vec<PageHeader>,
    /// type_code → positions in `pages`, in file order.
    by_type: BTreeMap<u16, Vec<usize>>,
}

impl PageIndex {
    /// Walk the record stream starting at the reader's current position.
    ///
    /// The reader is expected to sit just behind the root tag.  On success
    /// the reader is left at end-of-source.
    pub fn scan<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let mut index = PageIndex::default();
        let mut hdr_buf = [0u8; PAGE_HEADER_SIZE];

        loop {
            let got = read_up_to(reader, &mut hdr_buf)?;
            if got == 0 {
                break;
            }
            if got < PAGE_HEADER_SIZE {
                return Err(JicError::TruncatedHeader(got));
            }

            let mut cur   = Cursor::new(&hdr_buf[..]);
            let type_code = cur.read_u16::<LittleEndian>()?;
            let size      = cur.read_u32::<LittleEndian>()?;

            let byte_offset = reader.stream_position()?;
            reader.seek(SeekFrom::Start(byte_offset + size as u64))?;

            let header = PageHeader { type_code, byte_offset, size };
            log::trace!(
                "page {}: type={} offset={} size={}",
                index.pages.len(), type_code, byte_offset, size
            );
            index.push(header);
        }

        // Must land exactly on end-of-source.
        let our_pos = reader.stream_position()?;
        let eof_pos = reader.seek(SeekFrom::End(0))?;
        if our_pos != eof_pos {
            return Err(JicError::TrailingOrMissingBytes(our_pos as i64 - eof_pos as i64));
        }

        log::debug!(
            "indexed {} page(s) of {} type(s), {} payload bytes",
            index.len(), index.by_type.len(), index.payload_bytes()
        );
        Ok(index)
    }

    fn push(&mut self, header: PageHeader) {
        let i = self.pages.len();
        self.pages.push(header);
        self.by_type.entry(header.type_code).or_default().push(i);
    }

    pub fn pages(&self) -> &[PageHeader] {
        &self.pages
    }

    pub fn get(&self, i: usize) -> Option<&PageHeader> {
        self.pages.get(i)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Positions of every page of `type_code`, first occurrence first.
    pub fn indices_of(&self, type_code: u16) -> &[usize] {
        self.by_type.get(&type_code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pages_of(&self, type_code: u16) -> impl Iterator<Item = &PageHeader> + '_ {
        self.indices_of(type_code).iter().map(move |&i| &self.pages[i])
    }

    pub fn count_of(&self, type_code: u16) -> usize {
        self.indices_of(type_code).len()
    }

    /// Distinct type codes, ascending.
    pub fn types(&self) -> Vec<u16> {
        self.by_type.keys().copied().collect()
    }

    pub fn payload_bytes(&self) -> u64 {
        self.pages.iter().map(|p| p.size as u64).sum()
    }
}

/// Fill `buf` as far as the source allows.  Returns the byte count read;
/// anything short of `buf.len()` means end-of-source was hit.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
