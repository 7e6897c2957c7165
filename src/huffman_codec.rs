use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::bit_vec::BitVec;
use crate::code_table::CodeTable;
use crate::compressed_data::CompressedData;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;

/// Everything derived from one input: its frequencies, tree and codes.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    frequencies: FrequencyTable,
    tree: HuffmanTree,
    code_table: CodeTable,
}

impl HuffmanCodec {
    /// Analyze `data` and build its tree and code table.
    /// Fails with `EmptyTree` for empty input.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let frequencies = FrequencyTable::analyze(data);
        let tree = HuffmanTree::build(&frequencies)?;
        let code_table = CodeTable::generate(&tree)?;
        Ok(HuffmanCodec {
            frequencies,
            tree,
            code_table,
        })
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.code_table
    }

    pub fn encode(&self, data: &[u8]) -> Result<CompressedData> {
        let expected_bits = self.code_table.encoded_bit_len(&self.frequencies) as usize;
        let mut bit_vec = BitVec::with_capacity(expected_bits);
        for &byte in data {
            let code = self
                .code_table
                .get(byte)
                .ok_or(HuffmanError::UnknownSymbol { symbol: byte })?;
            bit_vec.push_code(code);
        }
        Ok(CompressedData::new(self.code_table.clone(), bit_vec))
    }

    pub fn decode(compressed: &CompressedData) -> Result<Vec<u8>> {
        compressed.decode()
    }

    /// Statistics for compressing the input this codec was built from.
    pub fn stats(&self) -> CompressionStats {
        let compressed_bits = self.code_table.encoded_bit_len(&self.frequencies);
        let payload_bytes = compressed_bits.div_ceil(8);
        let header_len = CompressedData {
            code_table: self.code_table.clone(),
            bit_count: compressed_bits as usize,
            compressed_bits: Vec::new(),
        }
        .header_len() as u64;
        CompressionStats {
            original_bytes: self.frequencies.total(),
            compressed_bits,
            payload_bytes,
            artifact_bytes: header_len + payload_bytes,
        }
    }

    /// Read all of `input`, write the artifact to `output`.
    pub fn encode_from_file<R: Read, W: Write>(mut input: R, mut output: W) -> Result<CompressionStats> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        let (artifact, stats) = compress_with_stats(&data)?;
        output.write_all(&artifact)?;
        output.flush()?;
        Ok(stats)
    }

    /// Read a whole artifact from `input`, write the decoded bytes to `output`.
    pub fn decode_from_file<R: Read, W: Write>(mut input: R, mut output: W) -> Result<usize> {
        let compressed = CompressedData::read_from(&mut input)?;
        let decoded = Self::decode(&compressed)?;
        output.write_all(&decoded)?;
        output.flush()?;
        Ok(decoded.len())
    }
}

/// Sizes before and after compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionStats {
    pub original_bytes: u64,
    pub compressed_bits: u64,
    pub payload_bytes: u64,
    pub artifact_bytes: u64,
}

impl CompressionStats {
    pub fn original_bits(&self) -> u64 {
        self.original_bytes * 8
    }

    /// Payload bits as a percentage of the original bits, `None` for empty input.
    pub fn ratio(&self) -> Option<f64> {
        if self.original_bytes == 0 {
            return None;
        }
        Some(self.compressed_bits as f64 / self.original_bits() as f64 * 100.0)
    }

    pub fn savings(&self) -> Option<f64> {
        self.ratio().map(|r| 100.0 - r)
    }
}

/// Compress `data` into a self-describing artifact.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_stats(data).map(|(artifact, _)| artifact)
}

pub fn compress_with_stats(data: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
    if data.is_empty() {
        debug!("empty input, writing empty artifact");
        let artifact = CompressedData::empty().serialize()?;
        let stats = CompressionStats {
            artifact_bytes: artifact.len() as u64,
            ..CompressionStats::default()
        };
        return Ok((artifact, stats));
    }

    let codec = HuffmanCodec::from_bytes(data)?;
    let compressed = codec.encode(data)?;
    let artifact = compressed.serialize()?;
    let stats = CompressionStats {
        original_bytes: data.len() as u64,
        compressed_bits: compressed.bit_count as u64,
        payload_bytes: compressed.compressed_bits.len() as u64,
        artifact_bytes: artifact.len() as u64,
    };
    info!(
        "encoded {} bytes -> {} bytes ({:.2}%)",
        data.len(),
        stats.payload_bytes,
        stats.payload_bytes as f64 / data.len() as f64 * 100.0
    );
    Ok((artifact, stats))
}

/// Decode an artifact produced by [`compress`].
pub fn decompress(artifact: &[u8]) -> Result<Vec<u8>> {
    let compressed = CompressedData::deserialize(artifact)?;
    let decoded = HuffmanCodec::decode(&compressed)?;
    info!(
        "decoded {} bytes -> {} bytes",
        compressed.compressed_bits.len(),
        decoded.len()
    );
    Ok(decoded)
}

/// Compress the file at `input` into `output`.
///
/// The artifact is built in memory first, so nothing is written if encoding fails.
pub fn compress_file(input: &Path, output: &Path) -> Result<CompressionStats> {
    let data = std::fs::read(input)?;
    let (artifact, stats) = compress_with_stats(&data)?;
    let mut writer = BufWriter::new(File::create(output)?);
    writer.write_all(&artifact)?;
    writer.flush()?;
    Ok(stats)
}

/// Decompress the artifact at `input` into `output`, returning the decoded length.
pub fn decompress_file(input: &Path, output: &Path) -> Result<usize> {
    let mut reader = BufReader::new(File::open(input)?);
    let compressed = CompressedData::read_from(&mut reader)?;
    let decoded = HuffmanCodec::decode(&compressed)?;
    std::fs::write(output, &decoded)?;
    Ok(decoded.len())
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;
    use crate::compressed_data::EMPTY_ARTIFACT;

    #[test]
    fn test_roundtrip() {
        let text = b"Huffman encoding is a greedy algorithm that builds optimal prefix codes.";
        let artifact = compress(text).unwrap();
        assert_eq!(decompress(&artifact).unwrap(), text);
    }

    #[test]
    fn test_empty_input() {
        let artifact = compress(b"").unwrap();
        assert_eq!(artifact, EMPTY_ARTIFACT);
        assert!(decompress(&artifact).unwrap().is_empty());
        assert!(matches!(
            HuffmanCodec::from_bytes(b""),
            Err(HuffmanError::EmptyTree)
        ));
    }

    #[test]
    fn test_single_symbol() {
        let text = b"aaaaaaaaaa";
        let codec = HuffmanCodec::from_bytes(text).unwrap();
        let compressed = codec.encode(text).unwrap();
        assert_eq!(compressed.bit_count, 10);
        assert_eq!(compressed.code_table.len(), 1);
        assert_eq!(compressed.code_table.get(b'a').unwrap().to_string(), "0");

        let artifact = compress(text).unwrap();
        assert!(artifact.starts_with(b"1\n97:0\nEND_HEADER\n10\n"));
        assert_eq!(decompress(&artifact).unwrap(), text);
    }

    #[test]
    fn test_unknown_symbol() {
        let codec = HuffmanCodec::from_bytes(b"abc").unwrap();
        let err = codec.encode(b"abcd").unwrap_err();
        assert!(matches!(err, HuffmanError::UnknownSymbol { symbol: b'd' }));
    }

    #[test]
    fn test_deterministic_output() {
        let text = b"she sells sea shells by the sea shore";
        assert_eq!(compress(text).unwrap(), compress(text).unwrap());
    }

    #[test]
    fn test_truncated_payload_detected() {
        let text = b"the rain in spain stays mainly in the plain";
        let mut artifact = compress(text).unwrap();
        artifact.pop();
        let err = decompress(&artifact).unwrap_err();
        assert!(matches!(err, HuffmanError::IncompleteCode { .. }), "{:?}", err);
    }

    #[test]
    fn test_stats() {
        let text = b"AAAAABBC";
        let codec = HuffmanCodec::from_bytes(text).unwrap();
        let stats = codec.stats();
        // A=1 bit, B=2 bits, C=2 bits
        assert_eq!(stats.original_bits(), 64);
        assert_eq!(stats.compressed_bits, 5 + 4 + 2);
        assert_eq!(stats.payload_bytes, 2);

        let (artifact, measured) = compress_with_stats(text).unwrap();
        assert_eq!(measured, stats);
        assert_eq!(measured.artifact_bytes, artifact.len() as u64);
        let ratio = stats.ratio().unwrap();
        assert!((ratio - 11.0 / 64.0 * 100.0).abs() < 1e-9);
        assert!((stats.savings().unwrap() + ratio - 100.0).abs() < 1e-9);

        let (_, empty) = compress_with_stats(b"").unwrap();
        assert_eq!(empty.ratio(), None);
        assert_eq!(empty.artifact_bytes, EMPTY_ARTIFACT.len() as u64);
    }

    #[test]
    fn test_stream_roundtrip() {
        let text = b"streams in, streams out";
        let mut compressed = Vec::new();
        let stats = HuffmanCodec::encode_from_file(Cursor::new(&text[..]), &mut compressed).unwrap();
        assert_eq!(stats.artifact_bytes, compressed.len() as u64);

        let mut decoded = Vec::new();
        let n = HuffmanCodec::decode_from_file(Cursor::new(compressed), &mut decoded).unwrap();
        assert_eq!(n, text.len());
        assert_eq!(decoded, text);
    }
}
