use std::collections::HashMap;
use std::path::PathBuf;

use log::debug;

use super::avl::AvlTree;
use super::bst::Bst;
use super::error::StorageError;
use super::hash::HashTable;
use super::pager::Pager;
use super::record::Record;
use super::schema::{self, Column};
use super::table::{StructureType, TableStructure};
use super::Result;

/// Table store facade: lifecycle, record CRUD and structure dispatch,
/// addressed by table name.
///
/// Heap tables live in page files under the storage directory; index
/// tables live in resident structures that do not survive the process.
/// Every table's schema is persisted to its meta file either way.
pub struct StorageEngine {
    pager: Pager,
    tables: HashMap<String, TableStructure>,
}

impl StorageEngine {
    /// Opens an engine over a storage directory, creating it if needed.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            pager: Pager::new(storage_dir)?,
            tables: HashMap::new(),
        })
    }

    /// Creates a table, writing its schema and registering its structure.
    ///
    /// The structure type name is normalized case-insensitively, falling
    /// back to heap. The meta file is written even for an empty column
    /// list; heap tables additionally get a data file holding one empty
    /// page.
    pub fn create_table(
        &mut self,
        table: &str,
        columns: &[Column],
        structure_type: &str,
    ) -> Result<()> {
        if self.tables.contains_key(table) || self.pager.meta_exists(table) {
            return Err(StorageError::TableExists(table.to_string()));
        }

        let kind = StructureType::parse(structure_type);
        self.pager.write_meta(table, columns)?;
        if kind == StructureType::Heap {
            self.pager.create_data_file(table)?;
        }
        self.tables.insert(table.to_string(), TableStructure::new(kind));

        debug!("created table {} as {}", table, kind);
        Ok(())
    }

    /// Inserts a record, dispatching on the table's structure.
    ///
    /// Heap tables upsert: an existing record with the same key is
    /// replaced. Index tables apply their own duplicate policy.
    pub fn insert_record(&mut self, table: &str, record: Record) -> Result<()> {
        if !self.ensure_registered(table) {
            return Err(StorageError::TableNotFound(table.to_string()));
        }

        let columns = match self.pager.read_meta(table)? {
            Some(columns) => columns,
            None => return Err(StorageError::TableNotFound(table.to_string())),
        };
        schema::validate_record(&columns, &record)?;

        if let Some(entry) = self.tables.get_mut(table) {
            match entry {
                TableStructure::Avl(tree) => return tree.insert(record),
                TableStructure::Bst(tree) => return tree.insert(record),
                TableStructure::Hash(map) => return map.insert(record),
                TableStructure::Heap => {}
            }
        }

        let mut records = self.pager.load_all_records(table)?;
        if let Some(id) = record.primary_key() {
            records.retain(|r| r.primary_key() != Some(id));
        }
        records.push(record);

        self.pager.rewrite_all(table, &records)
    }

    /// Returns every record of a table.
    ///
    /// Tree tables come back in ascending key order, hash tables in
    /// bucket order and heap tables in page then slot order.
    pub fn select_all(&mut self, table: &str) -> Result<Vec<Record>> {
        if !self.ensure_registered(table) {
            return Err(StorageError::TableNotFound(table.to_string()));
        }

        if let Some(entry) = self.tables.get(table) {
            match entry {
                TableStructure::Avl(tree) => return Ok(tree.get_all_sorted()),
                TableStructure::Bst(tree) => return Ok(tree.get_all_sorted()),
                TableStructure::Hash(map) => return Ok(map.get_all()),
                TableStructure::Heap => {}
            }
        }

        let mut records = Vec::new();
        for index in 0..self.pager.page_count(table)? {
            let page = self.pager.read_page(table, index)?;
            for slot in 0..page.slot_count() {
                let raw = match page.read_raw_record(slot) {
                    Some(raw) => raw,
                    None => continue,
                };
                if let Some(record) = Record::decode(&raw) {
                    records.push(record);
                }
            }
        }

        Ok(records)
    }

    /// Replaces the record with the given key. Heap semantics only:
    /// index tables have no data file, so the key is never found there.
    pub fn update_record(&mut self, table: &str, id: i32, record: Record) -> Result<()> {
        let columns = match self.pager.read_meta(table)? {
            Some(columns) => columns,
            None => return Err(StorageError::TableNotFound(table.to_string())),
        };
        schema::validate_record(&columns, &record)?;

        let mut records = self.pager.load_all_records(table)?;
        let target = records
            .iter_mut()
            .find(|r| r.primary_key() == Some(id))
            .ok_or(StorageError::KeyNotFound(id))?;
        *target = record;

        self.pager.rewrite_all(table, &records)
    }

    /// Removes every record with the given key. Heap semantics only,
    /// like [`StorageEngine::update_record`].
    pub fn delete_record(&mut self, table: &str, id: i32) -> Result<()> {
        let mut records = self.pager.load_all_records(table)?;

        let before = records.len();
        records.retain(|r| r.primary_key() != Some(id));
        if records.len() == before {
            return Err(StorageError::KeyNotFound(id));
        }

        self.pager.rewrite_all(table, &records)
    }

    /// The table's declared columns, empty when it has no meta file.
    pub fn table_columns(&self, table: &str) -> Result<Vec<Column>> {
        Ok(self.pager.read_meta(table)?.unwrap_or_default())
    }

    /// The table's registered structure type, heap when unregistered.
    pub fn structure_type(&self, table: &str) -> StructureType {
        self.tables
            .get(table)
            .map(TableStructure::kind)
            .unwrap_or(StructureType::Heap)
    }

    /// Direct access to a table's resident balanced tree.
    pub fn avl_table(&self, table: &str) -> Option<&AvlTree> {
        match self.tables.get(table) {
            Some(TableStructure::Avl(tree)) => Some(tree),
            _ => None,
        }
    }

    /// Direct access to a table's resident unbalanced tree, for the
    /// instrumented breadth- and depth-first searches.
    pub fn bst_table(&self, table: &str) -> Option<&Bst> {
        match self.tables.get(table) {
            Some(TableStructure::Bst(tree)) => Some(tree),
            _ => None,
        }
    }

    /// Direct access to a table's resident hash table.
    pub fn hash_table(&self, table: &str) -> Option<&HashTable> {
        match self.tables.get(table) {
            Some(TableStructure::Hash(map)) => Some(map),
            _ => None,
        }
    }

    /// Registers a table found on disk after a restart.
    ///
    /// Index tables do not survive the process, so any table adopted
    /// through its meta file comes back as heap.
    fn ensure_registered(&mut self, table: &str) -> bool {
        if self.tables.contains_key(table) {
            return true;
        }

        if self.pager.meta_exists(table) {
            debug!("adopting table {} from its meta file as heap", table);
            self.tables.insert(table.to_string(), TableStructure::Heap);
            return true;
        }

        false
    }
}
