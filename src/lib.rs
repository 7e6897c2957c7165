//! # huffman_toolkit
//!
//! Huffman compression for byte streams, stored with a small text header
//! that carries the code table.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffman_toolkit::{compress, decompress};
//!
//! let artifact = compress(b"abracadabra")?;
//! assert!(artifact.starts_with(b"5\n"));
//! assert_eq!(decompress(&artifact)?, b"abracadabra");
//! # Ok::<(), huffman_toolkit::HuffmanError>(())
//! ```
//!
//! The pipeline stages are public for callers that want the intermediate
//! values:
//!
//! ```rust
//! use huffman_toolkit::{CodeTable, FrequencyTable, HuffmanTree};
//!
//! let frequencies = FrequencyTable::analyze(b"AAAAB");
//! let tree = HuffmanTree::build(&frequencies)?;
//! let codes = CodeTable::generate(&tree)?;
//! assert_eq!(codes.get(b'A').map(|c| c.to_string()), Some("1".to_string()));
//! # Ok::<(), huffman_toolkit::HuffmanError>(())
//! ```

pub mod bit_vec;
pub mod code_table;
pub mod compressed_data;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod min_heap;
pub mod report;

// Re-export main types for convenience
pub use code_table::{Code, CodeTable};
pub use compressed_data::CompressedData;
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{
    compress, compress_file, compress_with_stats, decompress, decompress_file, CompressionStats,
    HuffmanCodec,
};
pub use hufftree::{HuffNode, HuffmanTree};
