//! Byte layout of the on-disk page format.
//!
//! ```text
//! +--------------------------------+ 0
//! | header (64 bytes)              |
//! |   page id    u32 LE @ 0        |
//! |   slot count u16 LE @ 8        |
//! |   free start u16 LE @ 10       |
//! +--------------------------------+ 64
//! | record data, grows forward     |
//! +--------------------------------+ free start
//! | unused                         |
//! +--------------------------------+ 8192 - slot count * 5
//! | slot directory, grows backward |
//! +--------------------------------+ 8192
//! ```

/// Total size of an on-disk page.
pub const PAGE_SIZE: usize = 8192;

/// Bytes reserved at the front of every page for the header.
pub const PAGE_HEADER_SIZE: usize = 64;

pub const PAGE_ID_OFFSET: usize = 0;
pub const PAGE_ID_SIZE: usize = 4;

pub const SLOT_COUNT_OFFSET: usize = 8;
pub const SLOT_COUNT_SIZE: usize = 2;

pub const FREE_SPACE_START_OFFSET: usize = 10;
pub const FREE_SPACE_START_SIZE: usize = 2;

/// One slot directory entry: active flag, record length, record offset.
pub const SLOT_ENTRY_SIZE: usize = 5;

pub const SLOT_ACTIVE_OFFSET: usize = 0;
pub const SLOT_ACTIVE_SIZE: usize = 1;

pub const SLOT_LENGTH_OFFSET: usize = 1;
pub const SLOT_LENGTH_SIZE: usize = 2;

pub const SLOT_OFFSET_OFFSET: usize = 3;
pub const SLOT_OFFSET_SIZE: usize = 2;
