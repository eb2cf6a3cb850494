pub mod avl;
pub mod bst;
pub mod engine;
pub mod error;
pub mod hash;
pub(crate) mod layout;
pub mod page;
pub mod pager;
pub mod record;
pub mod schema;
pub mod table;

pub use avl::AvlTree;
pub use bst::Bst;
pub use hash::HashTable;

use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
