use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// A non-empty Huffman code, most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    /// Parse a string of `'0'`/`'1'` characters. Empty or non-binary input gives `None`.
    pub fn from_bit_str(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        let bits = s
            .bytes()
            .map(|c| match c {
                b'0' => Some(false),
                b'1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()?;
        Some(Code { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Prefix-free mapping from byte to code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Walk the tree depth first, left edge 0 and right edge 1.
    /// A tree that is a single leaf gets the code `0`.
    pub fn generate(tree: &HuffmanTree) -> Result<Self> {
        let mut codes = BTreeMap::new();
        match &tree.root {
            HuffNode::Leaf { byte, .. } => {
                codes.insert(*byte, Code { bits: vec![false] });
            }
            root => {
                let mut path = Vec::with_capacity(tree.depth());
                collect_codes(root, &mut path, &mut codes);
            }
        }

        let table = CodeTable::from_codes(codes)?;
        debug!("generated {} codes", table.len());
        Ok(table)
    }

    /// Like [`CodeTable::generate`], for callers that may not have a tree at all.
    pub fn generate_from(tree: Option<&HuffmanTree>) -> Result<Self> {
        CodeTable::generate(tree.ok_or(HuffmanError::EmptyTree)?)
    }

    /// Wrap an existing mapping after checking it is prefix-free.
    pub fn from_codes(codes: BTreeMap<u8, Code>) -> Result<Self> {
        let table = CodeTable { codes };
        CodeTrie::build(&table)?;
        Ok(table)
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Number of payload bits needed to encode input with these frequencies.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .map(|(symbol, count)| count * self.get(symbol).map_or(0, |c| c.len() as u64))
            .sum()
    }
}

fn collect_codes(node: &HuffNode, path: &mut Vec<bool>, codes: &mut BTreeMap<u8, Code>) {
    match node {
        HuffNode::Leaf { byte, .. } => {
            codes.insert(*byte, Code { bits: path.clone() });
        }
        HuffNode::Internal { left, right, .. } => {
            path.push(false);
            collect_codes(left, path, codes);
            path.pop();
            path.push(true);
            collect_codes(right, path, codes);
            path.pop();
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: [Option<usize>; 2],
    symbol: Option<u8>,
}

/// Binary trie over a code table. Building it checks prefix-freeness in one
/// pass; walking it decodes a bit stream.
#[derive(Debug, Clone)]
pub(crate) struct CodeTrie {
    nodes: Vec<TrieNode>,
}

impl CodeTrie {
    pub(crate) const ROOT: usize = 0;

    pub(crate) fn build(table: &CodeTable) -> Result<Self> {
        let mut trie = CodeTrie {
            nodes: vec![TrieNode::default()],
        };
        for (symbol, code) in table.iter() {
            trie.insert(symbol, code, table)?;
        }
        Ok(trie)
    }

    fn insert(&mut self, symbol: u8, code: &Code, table: &CodeTable) -> Result<()> {
        let mut node = Self::ROOT;
        for &bit in code.bits() {
            if let Some(existing) = self.nodes[node].symbol {
                return Err(collision(table, existing, code));
            }
            node = match self.nodes[node].children[bit as usize] {
                Some(child) => child,
                None => {
                    self.nodes.push(TrieNode::default());
                    let child = self.nodes.len() - 1;
                    self.nodes[node].children[bit as usize] = Some(child);
                    child
                }
            };
        }

        if let Some(existing) = self.nodes[node].symbol {
            return Err(collision(table, existing, code));
        }
        if let Some(longer) = self.first_symbol_below(node) {
            return Err(HuffmanError::PrefixCollision {
                prefix: code.to_string(),
                code: table.get(longer).map(Code::to_string).unwrap_or_default(),
            });
        }
        self.nodes[node].symbol = Some(symbol);
        Ok(())
    }

    fn first_symbol_below(&self, mut node: usize) -> Option<u8> {
        loop {
            if let Some(symbol) = self.nodes[node].symbol {
                return Some(symbol);
            }
            let [zero, one] = self.nodes[node].children;
            node = zero.or(one)?;
        }
    }

    pub(crate) fn child(&self, node: usize, bit: bool) -> Option<usize> {
        self.nodes[node].children[bit as usize]
    }

    pub(crate) fn symbol(&self, node: usize) -> Option<u8> {
        self.nodes[node].symbol
    }
}

fn collision(table: &CodeTable, existing: u8, code: &Code) -> HuffmanError {
    HuffmanError::PrefixCollision {
        prefix: table.get(existing).map(Code::to_string).unwrap_or_default(),
        code: code.to_string(),
    }
}
