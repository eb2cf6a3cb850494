use std::collections::VecDeque;

use log::debug;

use super::error::StorageError;
use super::record::Record;
use super::Result;

#[derive(Debug)]
struct BstNode {
    id: i32,
    data: Record,
    left: Option<Box<BstNode>>,
    right: Option<Box<BstNode>>,
}

impl BstNode {
    fn new(id: i32, data: Record) -> Self {
        Self {
            id,
            data,
            left: None,
            right: None,
        }
    }
}

/// Plain, unbalanced binary search tree keyed by a record's integer key.
///
/// Shares the duplicate-key policy of [`super::AvlTree`]: inserting an
/// existing key is a no-op. On top of the ordinary descent search it
/// offers two instrumented whole-tree searches that report every
/// visited key to a caller-supplied sink.
#[derive(Debug, Default)]
pub struct Bst {
    root: Option<Box<BstNode>>,
}

impl Bst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record keyed by its first field.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let id = record.primary_key().ok_or(StorageError::NonIntegerKey)?;
        insert_node(&mut self.root, id, record);

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

    /// Level-order search, reporting every visited key to `visit`.
    ///
    /// The matching node is reported too; the scan stops on match. Key
    /// ordering is not used for pruning, so this is O(n).
    pub fn search_breadth_first(&self, id: i32, mut visit: impl FnMut(i32)) -> Option<&Record> {
        let mut queue = VecDeque::new();
        if let Some(root) = self.root.as_deref() {
            queue.push_back(root);
        }

        while let Some(node) = queue.pop_front() {
            visit(node.id);
            if node.id == id {
                return Some(&node.data);
            }

            if let Some(left) = node.left.as_deref() {
                queue.push_back(left);
            }
            if let Some(right) = node.right.as_deref() {
                queue.push_back(right);
            }
        }

        None
    }

    /// Pre-order search over an explicit stack, reporting every visited
    /// key to `visit`.
    ///
    /// Same contract as [`Bst::search_breadth_first`], different order.
    pub fn search_depth_first(&self, id: i32, mut visit: impl FnMut(i32)) -> Option<&Record> {
        let mut stack = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push(root);
        }

        while let Some(node) = stack.pop() {
            visit(node.id);
            if node.id == id {
                return Some(&node.data);
            }

            // Right pushed first so the left subtree is explored first.
            if let Some(right) = node.right.as_deref() {
                stack.push(right);
            }
            if let Some(left) = node.left.as_deref() {
                stack.push(left);
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

fn insert_node(node: &mut Option<Box<BstNode>>, id: i32, record: Record) {
    match node {
        None => *node = Some(Box::new(BstNode::new(id, record))),
        Some(n) => {
            if id < n.id {
                insert_node(&mut n.left, id, record);
            } else if id > n.id {
                insert_node(&mut n.right, id, record);
            } else {
                debug!("bst insert ignored duplicate key {}", id);
            }
        }
    }
}

fn collect_in_order(node: &Option<Box<BstNode>>, results: &mut Vec<Record>) {
    if let Some(node) = node {
        collect_in_order(&node.left, results);
        results.push(node.data.clone());
        collect_in_order(&node.right, results);
    }
}
