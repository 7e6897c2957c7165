use tracing::debug;

/// Occurrence count of every byte value seen in an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    distinct: usize,
    total: u64,
}

impl FrequencyTable {
    pub fn analyze(bytes: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in bytes {
            counts[byte as usize] += 1;
        }
        let distinct = counts.iter().filter(|&&c| c > 0).count();
        let table = FrequencyTable {
            counts,
            distinct,
            total: bytes.len() as u64,
        };
        debug_assert_eq!(table.iter().map(|(_, c)| c).sum::<u64>(), table.total);
        debug!(
            "frequency analysis done: {} unique, {} total",
            table.distinct, table.total
        );
        table
    }

    /// Count for `symbol`, zero if it never occurred.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Sum of all counts, equal to the analyzed input length.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(symbol, count)` pairs for symbols that occurred, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        FrequencyTable::analyze(&[])
    }
}

impl From<&[u8]> for FrequencyTable {
    fn from(bytes: &[u8]) -> Self {
        FrequencyTable::analyze(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::analyze(b"");
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.total(), 0);
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table, FrequencyTable::default());
    }

    #[test]
    fn test_counts_sum_to_length() {
        let text = b"hello world";
        let table = FrequencyTable::from(&text[..]);
        assert_eq!(table.total(), text.len() as u64);
        assert_eq!(table.iter().map(|(_, c)| c).sum::<u64>(), 11);
        assert_eq!(table.get(b'l'), 3);
        assert_eq!(table.get(b'o'), 2);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_iter_is_ascending_and_covers_full_byte_range() {
        let bytes = [255u8, 0, 128, 0, 255, 255];
        let table = FrequencyTable::analyze(&bytes);
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![(0, 2), (128, 1), (255, 3)]);
    }
}
