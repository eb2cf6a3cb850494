mod storage;

pub use storage::engine::StorageEngine;
pub use storage::error::StorageError;
pub use storage::page::Page;
pub use storage::pager::Pager;
pub use storage::record::{Record, Value};
pub use storage::schema::{Column, ColumnType};
pub use storage::table::StructureType;
pub use storage::{AvlTree, Bst, HashTable};

macro_rules! calculate_offsets {
    ($start:ident, $size:ident) => {{
        let start = $start;
        let end = start + $size;
        (start, end)
    }};
}

pub(crate) use calculate_offsets;
