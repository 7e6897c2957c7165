//! Error types for the compression pipeline.

use thiserror::Error;

/// Result type alias for Huffman operations.
pub type Result<T> = core::result::Result<T, HuffmanError>;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// The artifact header could not be parsed.
    #[error("malformed header at line {line}: {reason}")]
    HeaderMalformed { line: usize, reason: String },

    /// A byte in the input has no entry in the code table.
    #[error("no code for symbol {symbol}")]
    UnknownSymbol { symbol: u8 },

    /// The payload ended in the middle of a code, or a bit path matched nothing.
    #[error("incomplete code at bit {bit_offset}: pending bits \"{pending}\"")]
    IncompleteCode { bit_offset: usize, pending: String },

    /// One generated code is a prefix of another.
    #[error("prefix collision: {prefix} is a prefix of {code}")]
    PrefixCollision { prefix: String, code: String },

    /// Codes were requested from an absent tree.
    #[error("cannot generate codes from an empty tree")]
    EmptyTree,

    /// I/O error from the byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    /// Create a malformed header error for a 1-based header line.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        HuffmanError::HeaderMalformed {
            line,
            reason: reason.into(),
        }
    }

    /// Create an incomplete code error.
    pub fn incomplete(bit_offset: usize, pending: impl Into<String>) -> Self {
        HuffmanError::IncompleteCode {
            bit_offset,
            pending: pending.into(),
        }
    }

    /// Errors that point at a damaged artifact rather than a bug in this crate.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            HuffmanError::HeaderMalformed { .. } | HuffmanError::IncompleteCode { .. }
        )
    }
}
