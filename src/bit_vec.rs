use crate::code_table::Code;
use crate::error::{HuffmanError, Result};

/// Bits packed most significant first. The last byte is zero padded and
/// `bit_count` records how many bits are meaningful.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        BitVec {
            bits: Vec::with_capacity(bit_capacity.div_ceil(8)),
            bit_count: 0,
        }
    }

    /// Rebuild a stream from packed bytes, keeping only the first `bit_count` bits.
    pub fn from_bytes(bytes: &[u8], bit_count: usize) -> Result<Self> {
        let available = bytes.len() * 8;
        if bit_count > available {
            return Err(HuffmanError::incomplete(
                available,
                format!("{} declared bits missing", bit_count - available),
            ));
        }
        let mut bits = bytes[..bit_count.div_ceil(8)].to_vec();
        // clear anything past the logical end
        let tail = bit_count % 8;
        if tail != 0 {
            if let Some(last) = bits.last_mut() {
                *last &= 0xFFu8 << (8 - tail);
            }
        }
        Ok(BitVec { bits, bit_count })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn push_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.push_bit(bit);
        }
    }

    /// Bit at `index`, or `None` past the logical end.
    pub fn read_bit(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some(self.bits[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).map(move |i| self.bits[i / 8] & (1 << (7 - i % 8)) != 0)
    }
}
