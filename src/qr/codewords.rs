//! QR data codeword generation
//!
//! Segments are written as mode indicator, character count and packed
//! characters. The bit sequence is closed with a terminator, aligned to a
//! byte and filled with alternating pad bytes, then split into RS blocks and
//! interleaved column by column: data first, parity after.
use super::tables::{EcBlockInfo, MAX_VERSION, MIN_VERSION, ec_block_info, symbol_size};
use crate::aztec::bitstream::{BitStream, Stuffing};
use crate::config;
use crate::error::EncodeError;
use crate::models::ECLevel;
use crate::reed_solomon::{EncoderCache, StandardField};
use log::debug;

const ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

pub fn alphanumeric_value(byte: u8) -> Option<u8> {
    ALPHANUMERIC_CHARSET
        .iter()
        .position(|&c| c == byte)
        .map(|p| p as u8)
}

/// Segment modes, from most to least compact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QrMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl QrMode {
    /// Most compact mode able to carry every byte of `text`
    pub fn for_text(text: &[u8]) -> QrMode {
        if text.iter().all(u8::is_ascii_digit) {
            QrMode::Numeric
        } else if text.iter().all(|&b| alphanumeric_value(b).is_some()) {
            QrMode::Alphanumeric
        } else {
            QrMode::Byte
        }
    }

    pub fn indicator(self) -> u32 {
        match self {
            QrMode::Numeric => 0b0001,
            QrMode::Alphanumeric => 0b0010,
            QrMode::Byte => 0b0100,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QrMode::Numeric => "numeric",
            QrMode::Alphanumeric => "alphanumeric",
            QrMode::Byte => "byte",
        }
    }

    /// Width of the character count field
    pub fn count_bits(self, version: u8) -> u32 {
        let column = match version {
            0..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            QrMode::Numeric => [10, 12, 14][column],
            QrMode::Alphanumeric => [9, 11, 13][column],
            QrMode::Byte => [8, 16, 16][column],
        }
    }

    /// Bits of a whole segment holding `len` characters
    pub fn segment_bits(self, len: usize, version: u8) -> usize {
        let payload = match self {
            QrMode::Numeric => 10 * (len / 3) + [0, 4, 7][len % 3],
            QrMode::Alphanumeric => 11 * (len / 2) + 6 * (len % 2),
            QrMode::Byte => 8 * len,
        };
        4 + self.count_bits(version) as usize + payload
    }
}

/// Bit-level builder for the data codewords of one version
#[derive(Debug, Clone)]
pub struct QrCodewordEncoder {
    version: u8,
    bits: BitStream,
}

impl QrCodewordEncoder {
    pub fn new(version: u8) -> Result<Self, EncodeError> {
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(EncodeError::VersionOutOfRange(version));
        }
        Ok(Self {
            version,
            bits: BitStream::with_stuffing(8, Stuffing::Disabled)?,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn bit_len(&self) -> usize {
        self.bits.bit_len()
    }

    pub fn append_segment(&mut self, text: &[u8], mode: QrMode) -> Result<&mut Self, EncodeError> {
        let count_bits = mode.count_bits(self.version);
        if text.len() >= 1 << count_bits {
            return Err(EncodeError::PayloadTooLarge {
                required: text.len(),
                capacity: (1 << count_bits) - 1,
            });
        }

        self.bits.append(mode.indicator(), 4);
        self.bits.append(text.len() as u32, count_bits);

        match mode {
            QrMode::Numeric => {
                for group in text.chunks(3) {
                    let mut value = 0u32;
                    for &byte in group {
                        if !byte.is_ascii_digit() {
                            return Err(EncodeError::UnsupportedCharacter { byte, mode: mode.name() });
                        }
                        value = value * 10 + u32::from(byte - b'0');
                    }
                    self.bits.append(value, [0, 4, 7, 10][group.len()]);
                }
            }
            QrMode::Alphanumeric => {
                for pair in text.chunks(2) {
                    let mut value = 0u32;
                    for &byte in pair {
                        let Some(index) = alphanumeric_value(byte) else {
                            return Err(EncodeError::UnsupportedCharacter { byte, mode: mode.name() });
                        };
                        value = value * 45 + u32::from(index);
                    }
                    self.bits.append(value, if pair.len() == 2 { 11 } else { 6 });
                }
            }
            QrMode::Byte => {
                for &byte in text {
                    self.bits.append(u32::from(byte), 8);
                }
            }
        }

        Ok(self)
    }

    /// Terminated, byte-aligned and padded data codewords
    pub fn data_codewords(&self, capacity: usize) -> Result<Vec<u8>, EncodeError> {
        let capacity_bits = capacity * 8;
        if self.bits.bit_len() > capacity_bits {
            return Err(EncodeError::PayloadTooLarge {
                required: self.bits.bit_len().div_ceil(8),
                capacity,
            });
        }

        let mut bits = self.bits.clone();
        let terminator = (capacity_bits - bits.bit_len()).min(4) as u32;
        bits.append(0, terminator);
        let align = ((8 - bits.bit_len() % 8) % 8) as u32;
        bits.append(0, align);

        let mut codewords: Vec<u8> = bits.words().iter().map(|&w| w as u8).collect();
        let used = codewords.len();
        codewords.extend(PAD_BYTES.iter().cycle().take(capacity - used));
        Ok(codewords)
    }

    /// Protected and interleaved codeword sequence for `ec_level`
    pub fn finish(&self, ec_level: ECLevel, cache: &mut EncoderCache<'_>) -> Result<Vec<u8>, EncodeError> {
        let info = ec_block_info(self.version, ec_level).ok_or(EncodeError::VersionOutOfRange(self.version))?;
        let data = self.data_codewords(info.data_codewords)?;
        Ok(protect_blocks(&data, &info, cache))
    }
}

/// Split `data` into RS blocks, append parity and interleave
fn protect_blocks(data: &[u8], info: &EcBlockInfo, cache: &mut EncoderCache<'_>) -> Vec<u8> {
    let mut blocks = Vec::with_capacity(info.num_blocks);
    let mut offset = 0;
    for index in 0..info.num_blocks {
        let len = info.block_data_len(index);
        blocks.push(data[offset..offset + len].iter().map(|&b| u16::from(b)).collect::<Vec<u16>>());
        offset += len;
    }

    let encoder = cache.get(info.ecc_per_block);
    let encoded = if info.num_blocks >= config::parallel_block_threshold() {
        encoder.encode_blocks_parallel(&blocks)
    } else {
        encoder.encode_blocks(&blocks)
    };

    let mut output = Vec::with_capacity(info.total_codewords());
    for column in 0..=info.short_block_data_len() {
        for (index, block) in encoded.iter().enumerate() {
            if column < info.block_data_len(index) {
                output.push(block[column] as u8);
            }
        }
    }
    for column in 0..info.ecc_per_block {
        for (index, block) in encoded.iter().enumerate() {
            output.push(block[info.block_data_len(index) + column] as u8);
        }
    }
    output
}

/// Protected QR codeword sequence with the parameters that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    pub version: u8,
    pub ec_level: ECLevel,
    pub mode: QrMode,
    /// Data codewords before interleaving
    pub data_codewords: usize,
    /// Interleaved data and parity codewords
    pub codewords: Vec<u8>,
}

impl QrCode {
    /// Encode `text` in the most compact mode and the smallest version that fits
    pub fn encode(text: &[u8], ec_level: ECLevel) -> Result<Self, EncodeError> {
        QrEncoder::new().encode(text, ec_level)
    }

    pub fn encode_with_version(text: &[u8], version: u8, ec_level: ECLevel) -> Result<Self, EncodeError> {
        QrEncoder::new().encode_with_version(text, version, ec_level)
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        symbol_size(self.version)
    }
}

/// QR encoder owning its parity generators
#[derive(Debug)]
pub struct QrEncoder {
    cache: EncoderCache<'static>,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QrEncoder {
    pub fn new() -> Self {
        Self {
            cache: EncoderCache::new(StandardField::Qr.field()),
        }
    }

    pub fn encode(&mut self, text: &[u8], ec_level: ECLevel) -> Result<QrCode, EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::EmptyPayload);
        }
        let mode = QrMode::for_text(text);

        let fits = |version: u8| {
            ec_block_info(version, ec_level).is_some_and(|info| {
                text.len() < 1 << mode.count_bits(version)
                    && mode.segment_bits(text.len(), version) <= info.data_codewords * 8
            })
        };
        let Some(version) = (MIN_VERSION..=MAX_VERSION).find(|&v| fits(v)) else {
            let capacity = ec_block_info(MAX_VERSION, ec_level).map_or(0, |info| info.data_codewords);
            return Err(EncodeError::PayloadTooLarge {
                required: mode.segment_bits(text.len(), MAX_VERSION).div_ceil(8),
                capacity,
            });
        };

        self.encode_segment(text, version, ec_level, mode)
    }

    pub fn encode_with_version(&mut self, text: &[u8], version: u8, ec_level: ECLevel) -> Result<QrCode, EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::EmptyPayload);
        }
        self.encode_segment(text, version, ec_level, QrMode::for_text(text))
    }

    fn encode_segment(&mut self, text: &[u8], version: u8, ec_level: ECLevel, mode: QrMode) -> Result<QrCode, EncodeError> {
        let mut encoder = QrCodewordEncoder::new(version)?;
        encoder.append_segment(text, mode)?;
        let codewords = encoder.finish(ec_level, &mut self.cache)?;
        let data_codewords = ec_block_info(version, ec_level).map_or(0, |info| info.data_codewords);

        debug!(
            "qr: {} bytes as {} in version {}-{} ({} codewords)",
            text.len(),
            mode.name(),
            version,
            ec_level,
            codewords.len()
        );

        Ok(QrCode {
            version,
            ec_level,
            mode,
            data_codewords,
            codewords,
        })
    }
}
