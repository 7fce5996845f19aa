//! High-level [`Container`] API — the primary embedding surface.
//!
//! ```no_run
//! use jictool::container::{Container, ReaderOptions};
//! use jictool::firmware::extract_firmware;
//!
//! let mut jic = Container::open_path("design.jic", ReaderOptions::default())?;
//! println!("{}", jic.listing());
//! let image = extract_firmware(&mut jic)?;
//! std::fs::write("design.rpd", image)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The container is parsed once at open time; afterwards every query is
//! answered from the in-memory [`PageIndex`] and page payloads are read on
//! demand.

use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{JicError, Result};
use crate::index::{read_up_to, PageHeader, PageIndex};
use crate::page_type::{self, PageTypeInfo, PayloadKind};
use crate::tag::{Tag, TagKind, TAG_SIZE};

/// Signature checked by lenient root validation.
pub const ROOT_SIGNATURE: &[u8] = b"JIC";

// ── ReaderOptions ────────────────────────────────────────────────────────────

/// Configuration for [`Container::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Strict: root must be exactly `JIC_HEADER`, exactly one firmware page,
    /// firmware tag must be `RAW_FIRMWARE`.  Lenient relaxes each check.
    pub strict: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl ReaderOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

// ── PageInfo ─────────────────────────────────────────────────────────────────

/// Serialisable descriptor returned by [`Container::page_infos`].
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub index:       usize,
    pub type_code:   u16,
    pub byte_offset: u64,
    pub size:        u32,
    pub kind:        PayloadKind,
    pub label:       &'static str,
}

// ── Container ────────────────────────────────────────────────────────────────

pub struct Container<R> {
    source:  R,
    name:    Option<PathBuf>,
    options: ReaderOptions,
    root:    Tag,
    index:   PageIndex,
    len:     u64,
}

impl Container<BufReader<File>> {
    pub fn open_path<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut jic = Container::open(BufReader::new(File::open(path)?), options)?;
        jic.name = Some(path.to_owned());
        Ok(jic)
    }
}

impl<R: Read + Seek> Container<R> {
    /// Validate the root tag and index every page.
    ///
    /// The source is rewound first, so it may be positioned anywhere.
    pub fn open(mut source: R, options: ReaderOptions) -> Result<Self> {
        source.seek(SeekFrom::Start(0))?;

        let mut buf = [0u8; TAG_SIZE];
        let got  = read_up_to(&mut source, &mut buf)?;
        let root = Tag::parse(&buf[..got])?;
        check_root(&root, options.strict)?;

        let index = PageIndex::scan(&mut source)?;
        let len   = source.stream_position()?;

        Ok(Self { source, name: None, options, root, index, len })
    }

    // ── Page access ──────────────────────────────────────────────────────────

    pub fn read_page(&mut self, header: &PageHeader) -> Result<Vec<u8>> {
        self.source.seek(SeekFrom::Start(header.byte_offset))?;
        let mut data = Vec::with_capacity(header.size as usize);
        (&mut self.source).take(header.size as u64).read_to_end(&mut data)?;
        if data.len() < header.size as usize {
            return Err(JicError::ShortRead {
                offset:   header.byte_offset,
                expected: header.size,
                actual:   data.len(),
            });
        }
        Ok(data)
    }

    pub fn read_page_by_index(&mut self, i: usize) -> Result<Vec<u8>> {
        let header = *self.page(i)?;
        self.read_page(&header)
    }

    /// Payloads of every page of `type_code`, in file order.  Empty when the
    /// type is absent.
    pub fn read_pages_by_type(&mut self, type_code: u16) -> Result<Vec<Vec<u8>>> {
        let headers: Vec<PageHeader> = self.index.pages_of(type_code).copied().collect();
        headers.iter().map(|h| self.read_page(h)).collect()
    }

    /// Decode a string-kind page as NUL-terminated text.  `None` for pages
    /// whose type is not known to hold a string.
    pub fn read_string_page(&mut self, i: usize) -> Result<Option<String>> {
        let header = *self.page(i)?;
        if page_type::describe(header.type_code).kind != PayloadKind::String {
            return Ok(None);
        }
        let data = self.read_page(&header)?;
        let end  = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        Ok(Some(String::from_utf8_lossy(&data[..end]).into_owned()))
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R> Container<R> {
    // ── Metadata ─────────────────────────────────────────────────────────────

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    pub fn is_strict(&self) -> bool {
        self.options.strict
    }

    pub fn root_tag(&self) -> &Tag {
        &self.root
    }

    pub fn index(&self) -> &PageIndex {
        &self.index
    }

    pub fn pages(&self) -> &[PageHeader] {
        self.index.pages()
    }

    /// Total byte length of the source, as measured at open time.
    pub fn source_len(&self) -> u64 {
        self.len
    }

    pub fn name(&self) -> Option<&Path> {
        self.name.as_deref()
    }

    pub fn page(&self, i: usize) -> Result<&PageHeader> {
        self.index.get(i).ok_or(JicError::PageIndexOutOfRange { index: i, count: self.index.len() })
    }

    pub fn page_offset(&self, i: usize) -> Option<u64> {
        self.index.get(i).map(|h| h.byte_offset)
    }

    /// Distinct type codes present, ascending.
    pub fn list_types(&self) -> Vec<u16> {
        self.index.types()
    }

    pub fn describe_type(type_code: u16) -> PageTypeInfo {
        page_type::describe(type_code)
    }

    pub fn page_infos(&self) -> Vec<PageInfo> {
        self.pages()
            .iter()
            .enumerate()
            .map(|(index, h)| {
                let info = page_type::describe(h.type_code);
                PageInfo {
                    index,
                    type_code:   h.type_code,
                    byte_offset: h.byte_offset,
                    size:        h.size,
                    kind:        info.kind,
                    label:       info.label,
                }
            })
            .collect()
    }

    /// Human-readable page report, one line per page.
    pub fn listing(&self) -> String {
        let name = self
            .name
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stream>".into());
        let mut out = format!("JIC container {} ({} bytes), {} page(s):\n", name, self.len, self.index.len());
        out.push_str(&format!(
            "{:>5} {:>10} {:>10} {:>5}  {}\n",
            "#", "Offset", "Size", "Type", "Description"
        ));
        for info in self.page_infos() {
            out.push_str(&format!(
                "{:>5} {:>10} {:>10} {:>5}  [{}] {}\n",
                info.index, info.byte_offset, info.size, info.type_code, info.kind, info.label
            ));
        }
        out
    }
}

fn check_root(root: &Tag, strict: bool) -> Result<()> {
    if strict {
        if !root.is(TagKind::JicHeader) {
            return Err(JicError::BadRootTag {
                expected: TagKind::JicHeader.name(),
                found:    root.hexdump(),
            });
        }
        log::debug!("root tag: {}", TagKind::JicHeader);
        return Ok(());
    }

    if !root.matches_prefix(ROOT_SIGNATURE) {
        return Err(JicError::BadRootTag { expected: "'JIC' signature", found: root.hexdump() });
    }
    if !root.is(TagKind::JicHeader) {
        log::warn!("root tag {} accepted by signature only", root);
    } else {
        log::debug!("root tag: {}", TagKind::JicHeader);
    }
    Ok(())
}
