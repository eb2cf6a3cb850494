use super::error::StorageError;
use super::record::Record;
use super::Result;

/// Prime bucket count, for probe distribution.
pub const BUCKET_COUNT: usize = 1009;

#[derive(Debug, Clone)]
struct HashEntry {
    id: i32,
    data: Record,
}

/// Fixed-bucket chained hash table keyed by a record's integer key.
///
/// Chains are append-only and duplicates are never detected: a repeated
/// key adds another entry, reachable through [`HashTable::get_all`] but
/// shadowed in [`HashTable::search`] by the first match.
#[derive(Debug)]
pub struct HashTable {
    buckets: Vec<Vec<HashEntry>>,
}

impl HashTable {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKET_COUNT],
        }
    }

    fn bucket_index(&self, id: i32) -> usize {
        id.rem_euclid(BUCKET_COUNT as i32) as usize
    }

    /// Appends a record keyed by its first field to its bucket's chain.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let id = record.primary_key().ok_or(StorageError::NonIntegerKey)?;
        let index = self.bucket_index(id);
        self.buckets[index].push(HashEntry { id, data: record });

        Ok(())
    }

    /// Scans the key's bucket chain and returns the first match.
    pub fn search(&self, id: i32) -> Option<&Record> {
        self.buckets[self.bucket_index(id)]
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.data)
    }

    /// Every record, bucket by bucket, chain order within each bucket.
    pub fn get_all(&self) -> Vec<Record> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|entry| entry.data.clone()))
            .collect()
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::super::record::Value;
    use super::*;

    fn rec(id: i32) -> Record {
        Record::new(vec![Value::Int(id), Value::Text(format!("row{}", id))])
    }

    #[test]
    fn colliding_keys_share_a_bucket_chain() {
        let mut table = HashTable::new();
        table.insert(rec(0)).unwrap();
        table.insert(rec(1009)).unwrap();

        assert_eq!(table.search(0), Some(&rec(0)));
        assert_eq!(table.search(1009), Some(&rec(1009)));
        assert_eq!(table.search(2018), None);
        assert_eq!(table.get_all().len(), 2);
    }

    #[test]
    fn duplicate_keys_append_and_shadow() {
        let mut table = HashTable::new();
        table
            .insert(Record::new(vec![
                Value::Int(1),
                Value::Text("first".to_string()),
            ]))
            .unwrap();
        table
            .insert(Record::new(vec![
                Value::Int(1),
                Value::Text("second".to_string()),
            ]))
            .unwrap();

        assert_eq!(table.get_all().len(), 2, "both entries stay in the chain");
        assert_eq!(
            table.search(1).unwrap().values[1],
            Value::Text("first".to_string()),
            "search returns the first chain match"
        );
    }

    #[test]
    fn negative_keys_map_into_range() {
        let mut table = HashTable::new();
        table.insert(rec(-1)).unwrap();
        table.insert(rec(-1009)).unwrap();

        assert_eq!(table.search(-1), Some(&rec(-1)));
        assert_eq!(table.search(-1009), Some(&rec(-1009)));
        assert_eq!(table.search(1), None);
    }

    #[test]
    fn get_all_walks_buckets_in_order() {
        let mut table = HashTable::new();
        // Buckets 5, 3 and 2 in insertion order.
        table.insert(rec(5)).unwrap();
        table.insert(rec(3)).unwrap();
        table.insert(rec(2020)).unwrap();

        let keys: Vec<_> = table
            .get_all()
            .iter()
            .filter_map(|r| r.primary_key())
            .collect();
        assert_eq!(keys, vec![2020, 3, 5]);
    }

    #[test]
    fn rejects_records_without_an_integer_key() {
        let mut table = HashTable::new();

        let err = table
            .insert(Record::new(vec![Value::Text("no key".to_string())]))
            .unwrap_err();
        assert!(matches!(err, StorageError::NonIntegerKey));
        assert!(table.get_all().is_empty());
    }
}
