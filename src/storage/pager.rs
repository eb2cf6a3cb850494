use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write},
    path::PathBuf,
};

use log::debug;

use super::error::StorageError;
use super::layout::PAGE_SIZE;
use super::page::Page;
use super::record::Record;
use super::schema::{self, Column};
use super::Result;

/// File I/O layer for heap tables.
///
/// Maps a table name to a `<name>.tbl` data file of concatenated pages
/// and a `<name>.meta` schema file inside the storage directory. File
/// handles are opened and closed inside each call.
pub struct Pager {
    storage_dir: PathBuf,
}

impl Pager {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage_dir = storage_dir.into();
        fs::create_dir_all(&storage_dir)?;

        Ok(Self { storage_dir })
    }

    fn data_path(&self, table: &str) -> PathBuf {
        self.storage_dir.join(format!("{}.tbl", table))
    }

    fn meta_path(&self, table: &str) -> PathBuf {
        self.storage_dir.join(format!("{}.meta", table))
    }

    pub fn meta_exists(&self, table: &str) -> bool {
        self.meta_path(table).exists()
    }

    /// Number of pages in the table's data file, zero when absent.
    pub fn page_count(&self, table: &str) -> Result<u32> {
        let path = self.data_path(table);
        if !path.exists() {
            return Ok(0);
        }

        let len = fs::metadata(path)?.len();
        Ok(((len + PAGE_SIZE as u64 - 1) / PAGE_SIZE as u64) as u32)
    }

    pub fn read_page(&self, table: &str, index: u32) -> Result<Page> {
        let file = File::open(self.data_path(table))?;
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(index as u64 * PAGE_SIZE as u64))?;

        let mut buffer = [0x0; PAGE_SIZE];
        reader.read_exact(&mut buffer)?;

        Ok(Page::from_bytes(&buffer))
    }

    pub fn write_page(&self, table: &str, index: u32, page: &Page) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(self.data_path(table))?;
        file.seek(SeekFrom::Start(index as u64 * PAGE_SIZE as u64))?;
        file.write_all(&page.to_bytes())?;

        Ok(())
    }

    /// Creates the table's data file holding a single empty page.
    pub fn create_data_file(&self, table: &str) -> Result<()> {
        let mut file = File::create(self.data_path(table))?;
        file.write_all(&Page::new(0).to_bytes())?;

        Ok(())
    }

    /// Collects every active record, reading pages sequentially until a
    /// page with zero slots (the end-of-data sentinel) or EOF.
    ///
    /// Records that fail to decode are skipped. An absent data file
    /// yields no records.
    pub fn load_all_records(&self, table: &str) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        let file = match File::open(self.data_path(table)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(records),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);

        loop {
            let mut buffer = [0x0; PAGE_SIZE];
            match reader.read_exact(&mut buffer) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }

            let page = Page::from_bytes(&buffer);
            if page.slot_count() == 0 {
                break;
            }

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

    /// Replaces the table's data file with `records` packed into fresh
    /// pages with incrementing ids.
    ///
    /// Every page is built in memory first; the file is only touched
    /// once packing has succeeded as a whole.
    pub fn rewrite_all(&self, table: &str, records: &[Record]) -> Result<()> {
        let mut pages = Vec::new();
        let mut page = Page::new(0);

        for record in records {
            let bytes = record.encode();
            if page.insert_raw_record(&bytes).is_none() {
                let next_id = page.id + 1;
                pages.push(page);
                page = Page::new(next_id);

                if page.insert_raw_record(&bytes).is_none() {
                    return Err(StorageError::RecordTooLarge(bytes.len()));
                }
            }
        }
        pages.push(page);

        debug!(
            "rewriting table {}: {} records across {} pages",
            table,
            records.len(),
            pages.len()
        );

        let file = File::create(self.data_path(table))?;
        let mut writer = BufWriter::new(file);
        for page in &pages {
            writer.write_all(&page.to_bytes())?;
        }
        writer.flush()?;

        Ok(())
    }

    pub fn write_meta(&self, table: &str, columns: &[Column]) -> Result<()> {
        let mut file = File::create(self.meta_path(table))?;
        writeln!(file, "table={}", table)?;
        writeln!(file, "columns={}", schema::columns_to_line(columns))?;

        Ok(())
    }

    /// Reads the table's schema, `None` when no meta file exists.
    pub fn read_meta(&self, table: &str) -> Result<Option<Vec<Column>>> {
        let contents = match fs::read_to_string(self.meta_path(table)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut columns = Vec::new();
        for line in contents.lines() {
            if let Some(rest) = line.strip_prefix("columns=") {
                columns.extend(schema::columns_from_line(rest));
            }
        }

        Ok(Some(columns))
    }
}
