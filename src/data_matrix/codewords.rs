//! Data Matrix (ECC 200) data codeword generation
//!
//! Segments are written in one of the ASCII, C40, Text or X12 encodations.
//! The three triplet encodations pack three values as
//! `1600 a + 40 b + c + 1` into two codewords. After the last segment the
//! stream unlatches back to ASCII, writes the end-of-message codeword and
//! fills the symbol with 253-state randomised pads.
use super::tables::{SYMBOL_SIZES, SymbolSize, smallest_fitting};
use crate::config;
use crate::error::EncodeError;
use crate::reed_solomon::{EncoderCache, StandardField};
use log::debug;

pub const UNLATCH: u8 = 0xFE;
pub const END_OF_MESSAGE: u8 = 0x81;
/// ASCII prefix for bytes 128..=255
pub const UPPER_SHIFT: u8 = 0xEB;

const UPPER_SHIFT_VALUE: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encodation {
    Ascii,
    #[default]
    C40,
    Text,
    X12,
}

impl Encodation {
    /// Codeword switching from ASCII into this encodation
    pub fn latch(self) -> Option<u8> {
        match self {
            Encodation::Ascii => None,
            Encodation::C40 => Some(0xE6),
            Encodation::Text => Some(0xEF),
            Encodation::X12 => Some(0xEE),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encodation::Ascii => "ascii",
            Encodation::C40 => "c40",
            Encodation::Text => "text",
            Encodation::X12 => "x12",
        }
    }
}

/// C40 / Text values of one byte, shift prefixes included
fn triplet_values(byte: u8, encodation: Encodation, out: &mut Vec<u8>) {
    if byte >= 0x80 {
        out.extend([1, UPPER_SHIFT_VALUE]);
        triplet_values(byte - 0x80, encodation, out);
        return;
    }

    let text = encodation == Encodation::Text;
    match byte {
        b' ' => out.push(3),
        b'0'..=b'9' => out.push(byte - b'0' + 4),
        b'A'..=b'Z' if !text => out.push(byte - b'A' + 14),
        b'a'..=b'z' if text => out.push(byte - b'a' + 14),
        0x00..=0x1F => out.extend([0, byte]),
        0x21..=0x2F => out.extend([1, byte - 0x21]),
        0x3A..=0x40 => out.extend([1, byte - 0x3A + 15]),
        0x5B..=0x5F => out.extend([1, byte - 0x5B + 22]),
        b'A'..=b'Z' => out.extend([2, byte - b'A' + 1]),
        _ => out.extend([2, byte - 0x60]),
    }
}

/// Values for the longest prefix of `text` that packs into whole triplets,
/// allowing a final `[a, b, Shift 1]`, and the number of bytes it covers
fn c40_prefix(text: &[u8], encodation: Encodation) -> (Vec<u8>, usize) {
    let mut values = Vec::with_capacity(text.len() * 2);
    let mut end = (0, 0);
    for (i, &byte) in text.iter().enumerate() {
        triplet_values(byte, encodation, &mut values);
        if values.len() % 3 != 1 {
            end = (values.len(), i + 1);
        }
    }
    values.truncate(end.0);
    (values, end.1)
}

fn ascii_codewords(byte: u8, out: &mut Vec<u8>) {
    if byte >= 0x80 {
        out.extend([UPPER_SHIFT, byte - 0x80 + 1]);
    } else {
        out.push(byte + 1);
    }
}

fn x12_value(byte: u8) -> Option<u8> {
    match byte {
        b'\r' => Some(0),
        b'*' => Some(1),
        b'>' => Some(2),
        b' ' => Some(3),
        b'0'..=b'9' => Some(byte - b'0' + 4),
        b'A'..=b'Z' => Some(byte - b'A' + 14),
        _ => None,
    }
}

/// Pad codeword for 1-based stream position `position`
pub fn randomize_253(position: usize) -> u8 {
    let pseudo_random = (149 * position) % 253 + 1;
    let value = 0x81 + pseudo_random;
    if value <= 254 { value as u8 } else { (value - 254) as u8 }
}

#[derive(Debug, Clone)]
pub struct DataMatrixCodewordEncoder {
    codewords: Vec<u8>,
    encodation: Encodation,
}

impl Default for DataMatrixCodewordEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DataMatrixCodewordEncoder {
    pub fn new() -> Self {
        Self {
            codewords: Vec::new(),
            encodation: Encodation::Ascii,
        }
    }

    /// Encodation the stream is currently latched into
    pub fn encodation(&self) -> Encodation {
        self.encodation
    }

    pub fn len(&self) -> usize {
        self.codewords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codewords.is_empty()
    }

    /// Append `text` in `encodation`. Characters that do not complete a
    /// triplet at the end of the segment are written in ASCII after an unlatch.
    pub fn append_segment(&mut self, text: &[u8], encodation: Encodation) -> Result<&mut Self, EncodeError> {
        let (values, packed) = match encodation {
            Encodation::Ascii => (Vec::new(), 0),
            Encodation::C40 | Encodation::Text => c40_prefix(text, encodation),
            Encodation::X12 => {
                let mut values = text
                    .iter()
                    .map(|&byte| {
                        x12_value(byte).ok_or(EncodeError::UnsupportedCharacter {
                            byte,
                            mode: encodation.name(),
                        })
                    })
                    .collect::<Result<Vec<u8>, _>>()?;
                values.truncate(values.len() - values.len() % 3);
                let packed = values.len();
                (values, packed)
            }
        };

        if packed > 0 {
            self.switch_to(encodation);
            for triplet in values.chunks(3) {
                // A two-value tail is completed with Shift 1, which decoders drop
                let packed = 1600 * u16::from(triplet[0])
                    + 40 * u16::from(triplet[1])
                    + u16::from(triplet.get(2).copied().unwrap_or(0))
                    + 1;
                self.codewords.extend(packed.to_be_bytes());
            }
            if values.len() % 3 != 0 {
                self.switch_to(Encodation::Ascii);
            }
        }

        let rest = &text[packed..];
        if !rest.is_empty() {
            self.switch_to(Encodation::Ascii);
            for &byte in rest {
                ascii_codewords(byte, &mut self.codewords);
            }
        }

        Ok(self)
    }

    fn switch_to(&mut self, encodation: Encodation) {
        if self.encodation == encodation {
            return;
        }
        if self.encodation != Encodation::Ascii {
            self.codewords.push(UNLATCH);
        }
        if let Some(latch) = encodation.latch() {
            self.codewords.push(latch);
        }
        self.encodation = encodation;
    }

    /// Unlatched, terminated and padded data codewords
    pub fn data_codewords(&self, capacity: usize) -> Result<Vec<u8>, EncodeError> {
        if self.codewords.len() > capacity {
            return Err(EncodeError::PayloadTooLarge {
                required: self.codewords.len(),
                capacity,
            });
        }

        let mut codewords = self.codewords.clone();
        if codewords.len() < capacity && self.encodation != Encodation::Ascii {
            codewords.push(UNLATCH);
        }
        if codewords.len() < capacity {
            codewords.push(END_OF_MESSAGE);
        }
        while codewords.len() < capacity {
            codewords.push(randomize_253(codewords.len() + 1));
        }
        Ok(codewords)
    }

    /// Data codewords followed by the (interleaved) parity codewords
    pub fn finish(&self, symbol: &SymbolSize, cache: &mut EncoderCache<'_>) -> Result<Vec<u8>, EncodeError> {
        let data = self.data_codewords(symbol.data_codewords)?;
        Ok(protect_blocks(&data, symbol, cache))
    }
}

/// Codeword `i` belongs to block `i % blocks`; parity is interleaved the same way
fn protect_blocks(data: &[u8], symbol: &SymbolSize, cache: &mut EncoderCache<'_>) -> Vec<u8> {
    let mut blocks: Vec<Vec<u16>> = vec![Vec::new(); symbol.blocks];
    for (i, &codeword) in data.iter().enumerate() {
        blocks[i % symbol.blocks].push(u16::from(codeword));
    }

    let encoder = cache.get(symbol.ecc_per_block);
    let encoded = if symbol.blocks >= config::parallel_block_threshold() {
        encoder.encode_blocks_parallel(&blocks)
    } else {
        encoder.encode_blocks(&blocks)
    };
    let parity: Vec<Vec<u16>> = encoded
        .into_iter()
        .zip(&blocks)
        .map(|(encoded, block)| encoded[block.len()..].to_vec())
        .collect();

    let mut output = Vec::with_capacity(symbol.total_codewords());
    output.extend_from_slice(data);
    for j in 0..symbol.ecc_per_block {
        for block in &parity {
            output.push(block[j] as u8);
        }
    }
    output
}

/// Protected Data Matrix codeword sequence and its symbol size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMatrix {
    pub symbol: SymbolSize,
    pub encodation: Encodation,
    pub codewords: Vec<u8>,
}

impl DataMatrix {
    /// Encode `text` in one segment into the smallest fitting symbol
    pub fn encode(text: &[u8], encodation: Encodation) -> Result<Self, EncodeError> {
        DataMatrixEncoder::new().encode(text, encodation)
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.symbol.size()
    }

    pub fn data_codewords(&self) -> &[u8] {
        &self.codewords[..self.symbol.data_codewords]
    }
}

/// Data Matrix encoder owning its parity generators
#[derive(Debug)]
pub struct DataMatrixEncoder {
    cache: EncoderCache<'static>,
}

impl Default for DataMatrixEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DataMatrixEncoder {
    pub fn new() -> Self {
        Self {
            cache: EncoderCache::new(StandardField::DataMatrix.field()),
        }
    }

    pub fn encode(&mut self, text: &[u8], encodation: Encodation) -> Result<DataMatrix, EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::EmptyPayload);
        }

        let mut encoder = DataMatrixCodewordEncoder::new();
        encoder.append_segment(text, encodation)?;

        let Some(symbol) = smallest_fitting(encoder.len()) else {
            return Err(EncodeError::PayloadTooLarge {
                required: encoder.len(),
                capacity: SYMBOL_SIZES.last().map_or(0, |s| s.data_codewords),
            });
        };
        let codewords = encoder.finish(symbol, &mut self.cache)?;

        debug!(
            "datamatrix: {} bytes as {} in {}x{} ({} data + {} parity codewords)",
            text.len(),
            encodation.name(),
            symbol.size(),
            symbol.size(),
            symbol.data_codewords,
            symbol.ecc_codewords()
        );

        Ok(DataMatrix {
            symbol: *symbol,
            encodation,
            codewords,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reed_solomon::{ReedSolomonDecoder, ReedSolomonEncoder};

    #[test]
    fn test_ascii_codewords_and_padding() {
        let dm = DataMatrix::encode(b"123456", Encodation::Ascii).unwrap();
        assert_eq!(dm.size(), 14);
        assert_eq!(dm.data_codewords(), &[50, 51, 52, 53, 54, 55, 129, 56]);
        assert_eq!(dm.codewords.len(), 18);
    }

    #[test]
    fn test_c40_triplets() {
        let dm = DataMatrix::encode(b"AIMAIMAIM", Encodation::C40).unwrap();
        assert_eq!(dm.size(), 14);
        assert_eq!(dm.data_codewords(), &[230, 91, 11, 91, 11, 91, 11, 254]);
    }

    #[test]
    fn test_reference_parity() {
        // Digit pairs "12" "34" "56" as ASCII codewords 130 + value
        let encoder = ReedSolomonEncoder::new(StandardField::DataMatrix.field(), 5);
        assert_eq!(encoder.parity_words(&[142, 164, 186]), vec![114, 25, 5, 88, 102]);
    }

    #[test]
    fn test_text_and_shift_values() {
        let mut values = Vec::new();
        triplet_values(b'a', Encodation::Text, &mut values);
        triplet_values(b'A', Encodation::Text, &mut values);
        triplet_values(b'{', Encodation::Text, &mut values);
        triplet_values(b'a', Encodation::C40, &mut values);
        triplet_values(b'!', Encodation::C40, &mut values);
        triplet_values(0xC1, Encodation::C40, &mut values);
        assert_eq!(values, vec![14, 2, 1, 2, 27, 2, 1, 1, 0, 1, 30, 14]);
    }

    #[test]
    fn test_switching_encodations() {
        let mut encoder = DataMatrixCodewordEncoder::new();
        encoder.append_segment(b"AB", Encodation::Ascii).unwrap();
        encoder.append_segment(b"ABC", Encodation::X12).unwrap();
        encoder.append_segment(b"abc", Encodation::Text).unwrap();
        encoder.append_segment(b"x", Encodation::Ascii).unwrap();
        let data = encoder.data_codewords(16).unwrap();
        // 66 67 | X12 latch, ABC | unlatch, Text latch, abc | unlatch, x | EOM
        let abc = 1600 * 14 + 40 * 15 + 16 + 1;
        assert_eq!(
            &data[..13],
            &[
                66,
                67,
                0xEE,
                (abc >> 8) as u8,
                abc as u8,
                0xFE,
                0xEF,
                (abc >> 8) as u8,
                abc as u8,
                0xFE,
                b'x' + 1,
                129,
                randomize_253(13),
            ]
        );
    }

    #[test]
    fn test_lone_c40_value_falls_back_to_ascii() {
        let dm = DataMatrix::encode(b"A", Encodation::C40).unwrap();
        assert_eq!(dm.size(), 10);
        assert_eq!(dm.data_codewords(), &[66, 129, randomize_253(3)]);

        let dm = DataMatrix::encode(b"AIMA", Encodation::C40).unwrap();
        assert_eq!(dm.size(), 12);
        assert_eq!(dm.data_codewords(), &[230, 91, 11, 254, 66]);
    }

    #[test]
    fn test_two_c40_values_pad_with_shift() {
        // A B Shift1 packs to 1600*14 + 40*15 + 0 + 1
        let dm = DataMatrix::encode(b"AB", Encodation::C40).unwrap();
        assert_eq!(dm.data_codewords(), &[230, 89, 217, 254, 129]);

        // The shift pair of '!' is never split across the ASCII fallback
        let dm = DataMatrix::encode(b"AB!", Encodation::C40).unwrap();
        assert_eq!(dm.data_codewords(), &[230, 89, 217, 254, b'!' + 1]);
    }

    #[test]
    fn test_x12_remainder_is_ascii() {
        let dm = DataMatrix::encode(b"AB", Encodation::X12).unwrap();
        assert_eq!(dm.size(), 10);
        assert_eq!(dm.data_codewords(), &[66, 67, 129]);

        // ABC packs to 1600*14 + 40*15 + 16 + 1 = 0x59E9
        let dm = DataMatrix::encode(b"ABCD", Encodation::X12).unwrap();
        assert_eq!(dm.size(), 12);
        assert_eq!(dm.data_codewords(), &[238, 0x59, 0xE9, 254, 68 + 1]);
    }

    #[test]
    fn test_high_bytes_use_upper_shift() {
        let dm = DataMatrix::encode(b"AIMA\xC1", Encodation::C40).unwrap();
        assert_eq!(&dm.data_codewords()[..7], &[230, 91, 11, 254, 66, UPPER_SHIFT, 66]);

        let mut encoder = DataMatrixCodewordEncoder::new();
        encoder.append_segment(&[0xE9, b'a'], Encodation::Ascii).unwrap();
        assert_eq!(encoder.data_codewords(3).unwrap(), vec![UPPER_SHIFT, 0x6A, b'a' + 1]);
    }

    #[test]
    fn test_x12_rejects_lowercase() {
        let mut encoder = DataMatrixCodewordEncoder::new();
        let err = encoder.append_segment(b"Ab", Encodation::X12).unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedCharacter { byte: b'b', mode: "x12" });
    }

    #[test]
    fn test_randomized_pads() {
        assert_eq!(randomize_253(8), 56);
        for position in 1..2000 {
            let pad = randomize_253(position);
            assert!((1..=254).contains(&pad));
        }
    }

    #[test]
    fn test_multi_block_interleaving() {
        let text = vec![b'7'; 800];
        let dm = DataMatrix::encode(&text, Encodation::Ascii).unwrap();
        let symbol = dm.symbol;
        assert_eq!(symbol.size(), 104);
        assert_eq!(dm.codewords.len(), symbol.total_codewords());

        let decoder = ReedSolomonDecoder::new(StandardField::DataMatrix.field(), symbol.ecc_per_block);
        for block in 0..symbol.blocks {
            let column = |codewords: &[u8]| -> Vec<u16> {
                codewords
                    .iter()
                    .skip(block)
                    .step_by(symbol.blocks)
                    .map(|&c| u16::from(c))
                    .collect()
            };
            let mut word = column(dm.data_codewords());
            word.extend(column(&dm.codewords[symbol.data_codewords..]));
            assert!(decoder.is_codeword(&word));
        }
    }

    #[test]
    fn test_too_large() {
        let text = vec![b'x'; SYMBOL_SIZES[22].data_codewords + 1];
        let err = DataMatrix::encode(&text, Encodation::Ascii).unwrap_err();
        assert!(matches!(err, EncodeError::PayloadTooLarge { required: 1305, capacity: 1304 }));
    }
}
