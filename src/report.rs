//! Human-readable views of the pipeline's intermediate values.
//!
//! Nothing here prints. Each view implements `Display` and the caller decides
//! where the text goes.

use std::fmt;

use crate::code_table::CodeTable;
use crate::frequency::FrequencyTable;
use crate::huffman_codec::CompressionStats;
use crate::hufftree::{HuffNode, HuffmanTree};

const BAR_WIDTH: u64 = 20;

/// Printable name for a byte: whitespace spelled out, other
/// non-printable bytes in hex.
pub fn symbol_name(symbol: u8) -> String {
    match symbol {
        b' ' => "SPACE".to_string(),
        b'\n' => "NEWLINE".to_string(),
        b'\t' => "TAB".to_string(),
        b'\r' => "RETURN".to_string(),
        c if c.is_ascii_graphic() => format!("'{}'", c as char),
        c => format!("0x{:02x}", c),
    }
}

/// Frequencies, most common first, with a proportional bar.
pub struct FrequencyReport<'a>(pub &'a FrequencyTable);

impl fmt::Display for FrequencyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;
        let mut rows: Vec<(u8, u64)> = table.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        writeln!(f, "Frequency Table:")?;
        for (symbol, count) in rows {
            let bar = "█".repeat((count * BAR_WIDTH / table.total() + 1) as usize);
            writeln!(f, "  {} -> {} times {}", symbol_name(symbol), count, bar)?;
        }
        Ok(())
    }
}

/// Codes, shortest first.
pub struct CodeReport<'a>(pub &'a CodeTable);

impl fmt::Display for CodeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows: Vec<_> = self.0.iter().collect();
        rows.sort_by_key(|(symbol, code)| (code.len(), *symbol));

        writeln!(f, "Huffman Codes:")?;
        for (symbol, code) in rows {
            writeln!(f, "  {} -> {} ({} bits)", symbol_name(symbol), code, code.len())?;
        }
        Ok(())
    }
}

/// Box-drawing rendering of a tree, left child above right child.
pub struct TreeDiagram<'a>(pub &'a HuffmanTree);

impl TreeDiagram<'_> {
    fn write_node(f: &mut fmt::Formatter<'_>, node: &HuffNode, prefix: &str, is_tail: bool) -> fmt::Result {
        let connector = if is_tail { "└── " } else { "├── " };
        let extension = if is_tail { "    " } else { "│   " };

        match node {
            HuffNode::Leaf { byte, weight } => {
                writeln!(f, "{}{}{} ({})", prefix, connector, symbol_name(*byte), weight)
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{}{}[{}]", prefix, connector, weight)?;
                let child_prefix = format!("{}{}", prefix, extension);
                Self::write_node(f, left, &child_prefix, false)?;
                Self::write_node(f, right, &child_prefix, true)
            }
        }
    }
}

impl fmt::Display for TreeDiagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tree Structure:")?;
        Self::write_node(f, &self.0.root, "", true)
    }
}

pub struct StatsReport<'a>(pub &'a CompressionStats);

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "Compression Stats:")?;
        writeln!(
            f,
            "  original: {} bits ({} bytes x 8)",
            stats.original_bits(),
            stats.original_bytes
        )?;
        writeln!(f, "  compressed: {} bits", stats.compressed_bits)?;
        match (stats.ratio(), stats.savings()) {
            (Some(ratio), Some(saved)) => {
                writeln!(f, "  ratio: {:.2}%", ratio)?;
                writeln!(f, "  saved: {:.2}%", saved)?;
            }
            _ => writeln!(f, "  ratio: n/a")?,
        }
        writeln!(f, "  artifact: {} bytes", stats.artifact_bytes)
    }
}
