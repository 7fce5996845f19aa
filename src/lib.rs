pub mod error;
pub mod tag;
pub mod index;
pub mod page_type;
pub mod container;
pub mod firmware;

pub use error::{JicError, Result};
pub use tag::{Tag, TagFields, TagKind, TAG_SIZE};
pub use index::{PageHeader, PageIndex, PAGE_HEADER_SIZE};
pub use page_type::{PageTypeInfo, PayloadKind, FIRMWARE_PAGE_TYPE};
pub use container::{Container, PageInfo, ReaderOptions};
pub use firmware::{extract_firmware, read_firmware, FirmwareImage};
