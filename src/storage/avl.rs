use log::debug;

use super::error::StorageError;
use super::record::Record;
use super::Result;

#[derive(Debug)]
struct AvlNode {
    id: i32,
    data: Record,
    left: Option<Box<AvlNode>>,
    right: Option<Box<AvlNode>>,
    height: i32,
}

impl AvlNode {
    fn new(id: i32, data: Record) -> Self {
        Self {
            id,
            data,
            left: None,
            right: None,
            height: 1,
        }
    }
}

/// Self-balancing binary search tree keyed by a record's integer key.
///
/// Duplicate keys are ignored on insert: the first record stays.
#[derive(Debug, Default)]
pub struct AvlTree {
    root: Option<Box<AvlNode>>,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record keyed by its first field.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let id = record.primary_key().ok_or(StorageError::NonIntegerKey)?;
        self.root = Some(insert_node(self.root.take(), id, record));

        Ok(())
    }

    /// Iterative descent to the record with the given key.
    pub fn search(&self, id: i32) -> Option<&Record> {
        let mut current = self.root.as_deref();

        while let Some(node) = current {
            if id == node.id {
                return Some(&node.data);
            } else if id < node.id {
                current = node.left.as_deref();
            } else {
                current = node.right.as_deref();
            }
        }

        None
    }

    /// All records in ascending key order.
    pub fn get_all_sorted(&self) -> Vec<Record> {
        let mut results = Vec::new();
        collect_in_order(&self.root, &mut results);
        results
    }
}

fn height(node: &Option<Box<AvlNode>>) -> i32 {
    node.as_ref().map_or(0, |n| n.height)
}

fn update_height(node: &mut AvlNode) {
    node.height = 1 + height(&node.left).max(height(&node.right));
}

fn balance_factor(node: &AvlNode) -> i32 {
    height(&node.left) - height(&node.right)
}

fn rotate_right(mut y: Box<AvlNode>) -> Box<AvlNode> {
    let mut x = y.left.take().expect("right rotation requires a left child");
    y.left = x.right.take();
    update_height(&mut y);
    x.right = Some(y);
    update_height(&mut x);
    x
}

fn rotate_left(mut x: Box<AvlNode>) -> Box<AvlNode> {
    let mut y = x.right.take().expect("left rotation requires a right child");
    x.right = y.left.take();
    update_height(&mut x);
    y.left = Some(x);
    update_height(&mut y);
    y
}

fn insert_node(node: Option<Box<AvlNode>>, id: i32, record: Record) -> Box<AvlNode> {
    let mut node = match node {
        None => return Box::new(AvlNode::new(id, record)),
        Some(node) => node,
    };

    if id < node.id {
        node.left = Some(insert_node(node.left.take(), id, record));
    } else if id > node.id {
        node.right = Some(insert_node(node.right.take(), id, record));
    } else {
        debug!("avl insert ignored duplicate key {}", id);
        return node;
    }

    update_height(&mut node);
    let balance = balance_factor(&node);

    // Left left case
    if balance > 1 && node.left.as_ref().is_some_and(|l| id < l.id) {
        return rotate_right(node);
    }

    // Right right case
    if balance < -1 && node.right.as_ref().is_some_and(|r| id > r.id) {
        return rotate_left(node);
    }

    // Left right case
    if balance > 1 && node.left.as_ref().is_some_and(|l| id > l.id) {
        let left = node.left.take().expect("left-heavy node has a left child");
        node.left = Some(rotate_left(left));
        return rotate_right(node);
    }

    // Right left case
    if balance < -1 && node.right.as_ref().is_some_and(|r| id < r.id) {
        let right = node
            .right
            .take()
            .expect("right-heavy node has a right child");
        node.right = Some(rotate_right(right));
        return rotate_left(node);
    }

    node
}

fn collect_in_order(node: &Option<Box<AvlNode>>, results: &mut Vec<Record>) {
    if let Some(node) = node {
        collect_in_order(&node.left, results);
        results.push(node.data.clone());
        collect_in_order(&node.right, results);
    }
}

#[cfg(test)]
mod test {
    use super::super::record::Value;
    use super::*;

    fn rec(id: i32) -> Record {
        Record::new(vec![Value::Int(id), Value::Text(format!("row{}", id))])
    }

    fn keys(records: &[Record]) -> Vec<i32> {
        records.iter().filter_map(|r| r.primary_key()).collect()
    }

    impl AvlTree {
        fn root_height(&self) -> i32 {
            height(&self.root)
        }
    }

    #[test]
    fn sorts_out_of_order_inserts() {
        let mut tree = AvlTree::new();
        for id in [5, 3, 8, 1] {
            tree.insert(rec(id)).unwrap();
        }

        assert_eq!(keys(&tree.get_all_sorted()), vec![1, 3, 5, 8]);
        assert_eq!(tree.search(8), Some(&rec(8)));
        assert_eq!(tree.search(7), None);
    }

    #[test]
    fn every_imbalance_case_rebalances() {
        for order in [[3, 2, 1], [1, 2, 3], [3, 1, 2], [1, 3, 2]] {
            let mut tree = AvlTree::new();
            for id in order {
                tree.insert(rec(id)).unwrap();
            }

            assert_eq!(tree.root_height(), 2, "insert order {:?}", order);
            assert_eq!(keys(&tree.get_all_sorted()), vec![1, 2, 3]);
        }
    }

    #[test]
    fn stays_balanced_under_ascending_inserts() {
        let mut tree = AvlTree::new();
        for id in 0..100 {
            tree.insert(rec(id)).unwrap();
        }

        // Worst-case AVL height for 100 nodes.
        assert!(tree.root_height() <= 9);
        assert_eq!(keys(&tree.get_all_sorted()), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_key_keeps_the_first_record() {
        let mut tree = AvlTree::new();
        tree.insert(Record::new(vec![
            Value::Int(1),
            Value::Text("first".to_string()),
        ]))
        .unwrap();
        tree.insert(Record::new(vec![
            Value::Int(1),
            Value::Text("second".to_string()),
        ]))
        .unwrap();

        let all = tree.get_all_sorted();
        assert_eq!(all.len(), 1);
        assert_eq!(
            all[0].values[1],
            Value::Text("first".to_string()),
            "duplicate insert must not replace the stored record"
        );
    }

    #[test]
    fn rejects_records_without_an_integer_key() {
        let mut tree = AvlTree::new();

        let err = tree
            .insert(Record::new(vec![Value::Text("no key".to_string())]))
            .unwrap_err();
        assert!(matches!(err, StorageError::NonIntegerKey));
        assert!(tree.insert(Record::default()).is_err());
        assert!(tree.get_all_sorted().is_empty());
    }
}
