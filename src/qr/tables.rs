use crate::models::ECLevel;

pub const MIN_VERSION: u8 = 1;
pub const MAX_VERSION: u8 = 40;

/// Block layout of one version / level pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    pub num_blocks: usize,
    pub ecc_per_block: usize,
    /// Data codewords across all blocks
    pub data_codewords: usize,
}

impl EcBlockInfo {
    pub fn total_codewords(&self) -> usize {
        self.data_codewords + self.ecc_per_block * self.num_blocks
    }

    /// Blocks carrying one data codeword less than the rest; they come first
    pub fn short_blocks(&self) -> usize {
        self.num_blocks - self.total_codewords() % self.num_blocks
    }

    pub fn short_block_data_len(&self) -> usize {
        self.total_codewords() / self.num_blocks - self.ecc_per_block
    }

    /// Data length of block `index`
    pub fn block_data_len(&self, index: usize) -> usize {
        self.short_block_data_len() + usize::from(index >= self.short_blocks())
    }
}

// ISO/IEC 18004 (Model 2) block tables, as tabulated by the Nayuki QR Code generator.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Modules available for data and parity after function patterns and
/// format / version information
pub fn raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let alignment = v / 7 + 2;
        result -= (25 * alignment - 10) * alignment - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

pub fn ec_block_info(version: u8, ec_level: ECLevel) -> Option<EcBlockInfo> {
    if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
        return None;
    }
    let idx = ec_level.index();
    let ecc = ECC_CODEWORDS_PER_BLOCK[idx][version as usize];
    let blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][version as usize];
    if ecc <= 0 || blocks <= 0 {
        return None;
    }
    let (num_blocks, ecc_per_block) = (blocks as usize, ecc as usize);
    let total = raw_data_modules(version) / 8;
    Some(EcBlockInfo {
        num_blocks,
        ecc_per_block,
        data_codewords: total - num_blocks * ecc_per_block,
    })
}

/// Side length in modules
pub fn symbol_size(version: u8) -> usize {
    4 * version as usize + 17
}
