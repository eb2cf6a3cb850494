use std::fmt;

use super::avl::AvlTree;
use super::bst::Bst;
use super::hash::HashTable;

/// Record organization backing a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureType {
    Heap,
    Avl,
    Bst,
    Hash,
}

impl StructureType {
    /// Normalizes a structure type name, case-insensitively.
    ///
    /// Unrecognized names fall back to heap.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVL" => StructureType::Avl,
            "BST" => StructureType::Bst,
            "HASH" => StructureType::Hash,
            _ => StructureType::Heap,
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureType::Heap => "HEAP",
            StructureType::Avl => "AVL",
            StructureType::Bst => "BST",
            StructureType::Hash => "HASH",
        };
        f.write_str(name)
    }
}

/// A registered table's organization, holding the resident structure
/// for index tables. Heap tables live on disk and carry no state here.
#[derive(Debug)]
pub enum TableStructure {
    Heap,
    Avl(AvlTree),
    Bst(Bst),
    Hash(HashTable),
}

impl TableStructure {
    /// Fresh structure for a newly created table.
    pub fn new(kind: StructureType) -> Self {
        match kind {
            StructureType::Heap => TableStructure::Heap,
            StructureType::Avl => TableStructure::Avl(AvlTree::new()),
            StructureType::Bst => TableStructure::Bst(Bst::new()),
            StructureType::Hash => TableStructure::Hash(HashTable::new()),
        }
    }

    pub fn kind(&self) -> StructureType {
        match self {
            TableStructure::Heap => StructureType::Heap,
            TableStructure::Avl(_) => StructureType::Avl,
            TableStructure::Bst(_) => StructureType::Bst,
            TableStructure::Hash(_) => StructureType::Hash,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(StructureType::parse("avl"), StructureType::Avl);
        assert_eq!(StructureType::parse(" Bst "), StructureType::Bst);
        assert_eq!(StructureType::parse("HASH"), StructureType::Hash);
        assert_eq!(StructureType::parse("HEAP"), StructureType::Heap);
    }

    #[test]
    fn parse_defaults_unrecognized_names_to_heap() {
        assert_eq!(StructureType::parse(""), StructureType::Heap);
        assert_eq!(StructureType::parse("BTREE"), StructureType::Heap);
    }

    #[test]
    fn structure_reports_its_kind() {
        for kind in [
            StructureType::Heap,
            StructureType::Avl,
            StructureType::Bst,
            StructureType::Hash,
        ] {
            assert_eq!(TableStructure::new(kind).kind(), kind);
        }
    }

    #[test]
    fn display_matches_canonical_names() {
        assert_eq!(StructureType::Avl.to_string(), "AVL");
        assert_eq!(StructureType::Heap.to_string(), "HEAP");
    }
}
