use std::collections::BTreeMap;
use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::bit_vec::BitVec;
use crate::code_table::{Code, CodeTable, CodeTrie};
use crate::error::{HuffmanError, Result};

/// Line that closes the code table in the header.
pub const END_HEADER: &str = "END_HEADER";

/// The complete artifact for empty input.
pub const EMPTY_ARTIFACT: &[u8] = b"0\nEND_HEADER\n0\n";

// one entry per possible byte value
const MAX_TABLE_SIZE: usize = 256;

/// A code table plus the packed bit stream it produced.
///
/// On disk:
///
/// ```text
/// <table size>\n
/// <symbol>:<code>\n      (table size times)
/// END_HEADER\n
/// <bit count>\n
/// <payload bytes>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    pub code_table: CodeTable,
    pub bit_count: usize,
    pub compressed_bits: Vec<u8>,
}

impl CompressedData {
    pub fn new(code_table: CodeTable, bits: BitVec) -> Self {
        CompressedData {
            code_table,
            bit_count: bits.bit_count(),
            compressed_bits: bits.into_bytes(),
        }
    }

    /// The artifact for empty input: no codes, no bits.
    pub fn empty() -> Self {
        CompressedData {
            code_table: CodeTable::default(),
            bit_count: 0,
            compressed_bits: Vec::new(),
        }
    }

    fn header(&self) -> String {
        let mut header = format!("{}\n", self.code_table.len());
        for (symbol, code) in self.code_table.iter() {
            header.push_str(&format!("{}:{}\n", symbol, code));
        }
        header.push_str(END_HEADER);
        header.push('\n');
        header.push_str(&format!("{}\n", self.bit_count));
        header
    }

    /// Size of the text header in bytes.
    pub fn header_len(&self) -> usize {
        self.header().len()
    }

    /// Header followed by the payload.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.header().as_bytes())?;
        writer.write_all(&self.compressed_bits)?;
        Ok(())
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.header_len() + self.compressed_bits.len());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::deserialize(&bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut header = HeaderReader::new(bytes);

        let table_size = header.read_number()?;
        if table_size > MAX_TABLE_SIZE {
            return Err(HuffmanError::malformed(
                header.line,
                format!("table size {} exceeds {}", table_size, MAX_TABLE_SIZE),
            ));
        }

        let mut codes = BTreeMap::new();
        for _ in 0..table_size {
            let (symbol, code) = header.read_entry()?;
            if codes.insert(symbol, code).is_some() {
                return Err(HuffmanError::malformed(
                    header.line,
                    format!("duplicate symbol {}", symbol),
                ));
            }
        }

        let terminator = header.read_line()?;
        if terminator != END_HEADER {
            return Err(HuffmanError::malformed(
                header.line,
                format!("expected {}, found {:?}", END_HEADER, terminator),
            ));
        }

        let bit_count = header.read_number()?;
        let code_table = CodeTable::from_codes(codes)?;
        let compressed_bits = bytes[header.pos..].to_vec();
        trace!(
            "parsed header: {} codes, {} bits, {} payload bytes",
            code_table.len(),
            bit_count,
            compressed_bits.len()
        );

        Ok(CompressedData {
            code_table,
            bit_count,
            compressed_bits,
        })
    }

    /// Walk the payload bit by bit, emitting a symbol whenever the bits read
    /// so far spell exactly one code.
    pub fn decode(&self) -> Result<Vec<u8>> {
        if self.bit_count == 0 {
            return Ok(Vec::new());
        }

        let bits = BitVec::from_bytes(&self.compressed_bits, self.bit_count)?;
        let used = self.bit_count.div_ceil(8);
        if self.compressed_bits.len() > used {
            debug!(
                "ignoring {} payload bytes past the declared bit count",
                self.compressed_bits.len() - used
            );
        }

        let trie = CodeTrie::build(&self.code_table)?;
        let mut result = Vec::new();
        let mut node = CodeTrie::ROOT;
        let mut code_start = 0;

        for (i, bit) in bits.iter().enumerate() {
            node = match trie.child(node, bit) {
                Some(next) => next,
                None => {
                    return Err(HuffmanError::incomplete(
                        code_start,
                        pending_bits(&bits, code_start, i + 1),
                    ))
                }
            };
            if let Some(symbol) = trie.symbol(node) {
                result.push(symbol);
                node = CodeTrie::ROOT;
                code_start = i + 1;
            }
        }

        if node != CodeTrie::ROOT {
            return Err(HuffmanError::incomplete(
                code_start,
                pending_bits(&bits, code_start, self.bit_count),
            ));
        }

        Ok(result)
    }
}

fn pending_bits(bits: &BitVec, start: usize, end: usize) -> String {
    (start..end)
        .filter_map(|i| bits.read_bit(i))
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}

struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    // 1-based number of the line last read
    line: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        HeaderReader {
            bytes,
            pos: 0,
            line: 0,
        }
    }

    fn read_line(&mut self) -> Result<&'a str> {
        self.line += 1;
        let bytes: &'a [u8] = self.bytes;
        let rest = &bytes[self.pos..];
        if rest.is_empty() {
            return Err(HuffmanError::malformed(self.line, "unexpected end of header"));
        }
        let end = rest
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| HuffmanError::malformed(self.line, "unterminated header line"))?;
        let line = std::str::from_utf8(&rest[..end])
            .map_err(|_| HuffmanError::malformed(self.line, "header line is not valid UTF-8"))?;
        self.pos += end + 1;
        Ok(line)
    }

    fn read_number(&mut self) -> Result<usize> {
        let line = self.read_line()?;
        line.trim().parse().map_err(|_| {
            HuffmanError::malformed(self.line, format!("expected integer, found {:?}", line))
        })
    }

    fn read_entry(&mut self) -> Result<(u8, Code)> {
        let line = self.read_line()?;
        let (symbol, code) = line.split_once(':').ok_or_else(|| {
            HuffmanError::malformed(self.line, format!("expected symbol:code, found {:?}", line))
        })?;
        let symbol = symbol.trim().parse::<u8>().map_err(|_| {
            HuffmanError::malformed(self.line, format!("symbol {:?} is not in 0..=255", symbol))
        })?;
        let code = Code::from_bit_str(code).ok_or_else(|| {
            HuffmanError::malformed(self.line, format!("invalid code {:?}", code))
        })?;
        Ok((symbol, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hufftree::HuffmanTree;

    fn encode(text: &[u8]) -> CompressedData {
        let table = CodeTable::generate(&HuffmanTree::from_bytes(text).unwrap()).unwrap();
        let mut bits = BitVec::new();
        for &b in text {
            bits.push_code(table.get(b).unwrap());
        }
        CompressedData::new(table, bits)
    }

    #[test]
    fn test_empty_artifact() {
        let empty = CompressedData::empty();
        assert_eq!(empty.serialize().unwrap(), EMPTY_ARTIFACT);
        let parsed = CompressedData::deserialize(EMPTY_ARTIFACT).unwrap();
        assert_eq!(parsed, empty);
        assert!(parsed.decode().unwrap().is_empty());
    }

    #[test]
    fn test_header_layout() {
        let data = encode(b"AAAAB");
        let bytes = data.serialize().unwrap();
        let expected_header = b"2\n65:1\n66:0\nEND_HEADER\n5\n";
        assert_eq!(&bytes[..expected_header.len()], expected_header);
        // 1 1 1 1 0 -> 11110000
        assert_eq!(&bytes[expected_header.len()..], &[0b1111_0000]);
        assert_eq!(data.header_len(), expected_header.len());
    }

    #[test]
    fn test_parse_and_decode() {
        let text = b"abracadabra\n\0\xff binary too";
        let bytes = encode(text).serialize().unwrap();
        let parsed = CompressedData::deserialize(&bytes).unwrap();
        assert_eq!(parsed.decode().unwrap(), text);

        let mut cursor = std::io::Cursor::new(bytes);
        let read = CompressedData::read_from(&mut cursor).unwrap();
        assert_eq!(read, parsed);
    }

    #[test]
    fn test_zero_bit_length_skips_payload() {
        let parsed = CompressedData::deserialize(b"1\n97:0\nEND_HEADER\n0\ngarbage").unwrap();
        assert!(parsed.decode().unwrap().is_empty());
    }

    #[test]
    fn test_missing_terminator() {
        let err = CompressedData::deserialize(b"1\n97:0\n3\n\x00").unwrap_err();
        assert!(matches!(err, HuffmanError::HeaderMalformed { line: 3, .. }), "{:?}", err);

        let err = CompressedData::deserialize(b"1\n97:0\n").unwrap_err();
        assert!(matches!(err, HuffmanError::HeaderMalformed { line: 3, .. }), "{:?}", err);
    }

    #[test]
    fn test_malformed_fields() {
        let cases: &[&[u8]] = &[
            b"",
            b"x\nEND_HEADER\n0\n",
            b"1\n97-0\nEND_HEADER\n1\n\x00",
            b"1\n300:0\nEND_HEADER\n1\n\x00",
            b"1\n97:\nEND_HEADER\n1\n\x00",
            b"1\n97:012\nEND_HEADER\n1\n\x00",
            b"2\n97:0\n97:1\nEND_HEADER\n1\n\x00",
            b"0\nEND_HEADER\nten\n",
            b"0\nEND_HEADER\n0",
            b"257\n",
        ];
        for case in cases {
            let err = CompressedData::deserialize(case).unwrap_err();
            assert!(
                matches!(err, HuffmanError::HeaderMalformed { .. }),
                "{:?} -> {:?}",
                String::from_utf8_lossy(case),
                err
            );
        }
    }

    #[test]
    fn test_colliding_header_codes() {
        let err = CompressedData::deserialize(b"2\n97:0\n98:01\nEND_HEADER\n2\n\x40").unwrap_err();
        assert!(matches!(err, HuffmanError::PrefixCollision { .. }));
    }

    #[test]
    fn test_declared_length_beyond_payload() {
        let mut data = encode(b"hello world");
        data.bit_count = data.compressed_bits.len() * 8 + 3;
        let bytes = data.serialize().unwrap();
        let err = CompressedData::deserialize(&bytes).unwrap().decode().unwrap_err();
        assert!(matches!(err, HuffmanError::IncompleteCode { .. }));
    }

    #[test]
    fn test_leftover_bits_are_an_error() {
        // a=0, b=10, c=11; "0 1" leaves a dangling 1
        let bytes = b"3\n97:0\n98:10\n99:11\nEND_HEADER\n2\n\x40";
        let err = CompressedData::deserialize(bytes).unwrap().decode().unwrap_err();
        match err {
            HuffmanError::IncompleteCode { bit_offset, pending } => {
                assert_eq!(bit_offset, 1);
                assert_eq!(pending, "1");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unmatched_path_is_an_error() {
        // only "0" is a code, so a 1 bit can never match
        let bytes = b"1\n97:0\nEND_HEADER\n3\n\x20";
        let err = CompressedData::deserialize(bytes).unwrap().decode().unwrap_err();
        assert!(matches!(err, HuffmanError::IncompleteCode { bit_offset: 2, .. }));
    }
}
