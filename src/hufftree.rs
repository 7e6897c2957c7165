use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::{MinHeap, PriorityQueue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    /// Build a tree from raw bytes. Fails with `EmptyTree` on empty input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::build(&FrequencyTable::analyze(bytes))
    }

    /// Merge the two lightest nodes until a single root remains.
    ///
    /// Leaves are seeded in ascending symbol order and equal weights leave the
    /// heap first-in first-out, so the same table always yields the same tree.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyTree);
        }

        let mut heap = MinHeap::with_capacity(frequencies.len());
        for (byte, count) in frequencies.iter() {
            heap.insert(HuffNode::new(byte, count), count);
        }

        let tree = HuffmanTree::build_from_heap(heap)?;
        debug!(
            "tree built: root weight {}, {} leaves, depth {}",
            tree.weight(),
            tree.leaf_count(),
            tree.depth()
        );
        Ok(tree)
    }

    fn build_from_heap(mut heap: MinHeap<HuffNode, u64>) -> Result<Self> {
        let n = heap.len().saturating_sub(1);
        for _ in 0..n {
            let x = heap.extract_min().ok_or(HuffmanError::EmptyTree)?;
            let y = heap.extract_min().ok_or(HuffmanError::EmptyTree)?;

            let z = HuffNode::merge(x, y);
            let weight = z.weight();
            heap.insert(z, weight);
        }
        let root = heap.extract_min().ok_or(HuffmanError::EmptyTree)?;

        Ok(HuffmanTree { root })
    }

    /// Root weight, equal to the length of the input the tree was built from.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// `(byte, weight)` for every leaf, left to right.
    pub fn leaves(&self) -> Vec<(u8, u64)> {
        let mut leaves = Vec::with_capacity(self.leaf_count());
        self.root.collect_leaves(&mut leaves);
        leaves
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        byte: u8,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(b: u8, f: u64) -> Self {
        HuffNode::Leaf { weight: f, byte: b }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn merge(a: Self, b: Self) -> Self {
        // a is the lighter node and goes left
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_leaves(&self, leaves: &mut Vec<(u8, u64)>) {
        match self {
            HuffNode::Leaf { byte, weight } => leaves.push((*byte, *weight)),
            HuffNode::Internal { left, right, .. } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_weights_consistent(node: &HuffNode) {
        if let HuffNode::Internal { weight, left, right } = node {
            assert_eq!(*weight, left.weight() + right.weight());
            assert_weights_consistent(left);
            assert_weights_consistent(right);
        }
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(matches!(
            HuffmanTree::build(&FrequencyTable::default()),
            Err(HuffmanError::EmptyTree)
        ));
        assert!(matches!(
            HuffmanTree::from_bytes(b""),
            Err(HuffmanError::EmptyTree)
        ));
    }

    #[test]
    fn test_single_symbol_is_a_lone_leaf() {
        let tree = HuffmanTree::from_bytes(b"aaaaaaaaaa").unwrap();
        assert_eq!(tree.root, HuffNode::new(b'a', 10));
        assert!(tree.root.is_leaf());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_weight_invariant() {
        let text = b"the quick brown fox jumps over the lazy dog";
        let tree = HuffmanTree::from_bytes(text).unwrap();
        assert_eq!(tree.weight(), text.len() as u64);
        let leaf_sum: u64 = tree.leaves().iter().map(|(_, w)| w).sum();
        assert_eq!(leaf_sum, text.len() as u64);
        assert_eq!(tree.leaf_count(), FrequencyTable::analyze(text).len());
        assert_weights_consistent(&tree.root);
    }

    #[test]
    fn test_two_symbols_lighter_goes_left() {
        let tree = HuffmanTree::from_bytes(b"AAAAB").unwrap();
        match &tree.root {
            HuffNode::Internal { weight, left, right } => {
                assert_eq!(*weight, 5);
                assert_eq!(**left, HuffNode::new(b'B', 1));
                assert_eq!(**right, HuffNode::new(b'A', 4));
            }
            leaf => panic!("expected internal root, got {:?}", leaf),
        }
    }

    #[test]
    fn test_equal_weights_merge_in_symbol_order() {
        // four symbols of equal weight: (a,b) then (c,d) then the two pairs
        let tree = HuffmanTree::from_bytes(b"abcd").unwrap();
        assert_eq!(
            tree.leaves(),
            vec![(b'a', 1), (b'b', 1), (b'c', 1), (b'd', 1)]
        );
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let text = b"mississippi river banks";
        let a = HuffmanTree::from_bytes(text).unwrap();
        let b = HuffmanTree::from_bytes(text).unwrap();
        assert_eq!(a, b);
    }
}
