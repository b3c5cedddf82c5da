//! Square ECC 200 symbol geometry and codeword capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolSize {
    pub version: u8,
    pub data_codewords: usize,
    pub ecc_per_block: usize,
    /// Edge of one data region in modules
    pub region_edge: usize,
    /// Data regions along one side
    pub regions_per_side: usize,
    pub blocks: usize,
}

impl SymbolSize {
    /// Side length in modules, finder and timing borders included
    pub fn size(&self) -> usize {
        self.regions_per_side * (self.region_edge + 2)
    }

    pub fn ecc_codewords(&self) -> usize {
        self.ecc_per_block * self.blocks
    }

    pub fn total_codewords(&self) -> usize {
        self.data_codewords + self.ecc_codewords()
    }
}

const fn size(
    version: u8,
    data_codewords: usize,
    ecc_per_block: usize,
    region_edge: usize,
    regions_per_side: usize,
    blocks: usize,
) -> SymbolSize {
    SymbolSize {
        version,
        data_codewords,
        ecc_per_block,
        region_edge,
        regions_per_side,
        blocks,
    }
}

// 10x10 through 132x132, smallest first
pub const SYMBOL_SIZES: [SymbolSize; 23] = [
    size(1, 3, 5, 8, 1, 1),
    size(2, 5, 7, 10, 1, 1),
    size(3, 8, 10, 12, 1, 1),
    size(4, 12, 12, 14, 1, 1),
    size(5, 18, 14, 16, 1, 1),
    size(6, 22, 18, 18, 1, 1),
    size(7, 30, 20, 20, 1, 1),
    size(8, 36, 24, 22, 1, 1),
    size(9, 44, 28, 24, 1, 1),
    size(10, 62, 36, 14, 2, 1),
    size(11, 86, 42, 16, 2, 1),
    size(12, 114, 48, 18, 2, 1),
    size(13, 144, 56, 20, 2, 1),
    size(14, 174, 68, 22, 2, 1),
    size(15, 204, 42, 24, 2, 2),
    size(16, 280, 56, 14, 4, 2),
    size(17, 368, 36, 16, 4, 4),
    size(18, 456, 48, 18, 4, 4),
    size(19, 576, 56, 20, 4, 4),
    size(20, 696, 68, 22, 4, 4),
    size(21, 816, 56, 24, 4, 6),
    size(22, 1050, 68, 18, 6, 6),
    size(23, 1304, 62, 20, 6, 8),
];

/// Smallest symbol holding `data_len` data codewords
pub fn smallest_fitting(data_len: usize) -> Option<&'static SymbolSize> {
    SYMBOL_SIZES.iter().find(|s| s.data_codewords >= data_len)
}
