//! Aztec symbol parameters and protected codewords
//!
//! The codeword width depends on the encoded length and the encoded length
//! depends on the width (stuffing overhead), so the mode search is repeated
//! with growing widths until the width stops changing. Layer count, finder
//! size, parity count and the mode message follow from the final pass.
use super::bitstream::{BitStream, Stuffing};
use super::mode_encoder::ModeEncoder;
use super::modes::Mode;
use crate::config;
use crate::error::EncodeError;
use crate::reed_solomon::{EncoderCache, StandardField};
use log::{debug, warn};

/// Largest data word count any Aztec symbol carries
pub const MAX_DATA_WORDS: usize = 1660;

pub const MAX_LAYERS: u8 = 32;

const COMPACT_FINDER: usize = 11;
const FULL_FINDER: usize = 14;

/// Per-call encoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AztecOptions {
    /// Share of the symbol reserved for parity, clamped to 0..=90
    pub error_correction_percent: u8,
    /// Minimum layer count (1..=32)
    pub layers: Option<u8>,
}

impl Default for AztecOptions {
    fn default() -> Self {
        Self {
            error_correction_percent: config::aztec_ec_percent(),
            layers: None,
        }
    }
}

/// RS-protected layer count and data word count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeMessage {
    /// Data nibbles followed by parity nibbles (7 compact, 10 full)
    pub nibbles: Vec<u8>,
    /// The nibbles repacked into one word per symbol side
    pub words: [u16; 4],
    /// Width of each entry of `words`
    pub word_width: u32,
}

#[derive(Debug, Clone)]
pub struct AztecSymbol {
    pub compact: bool,
    pub layers: usize,
    /// Finder pattern size in modules (11 compact, 14 full)
    pub finder_size: usize,
    pub bits_per_word: u32,
    pub data_words: usize,
    pub parity_words: usize,
    /// Data words followed by parity words
    pub codewords: Vec<u16>,
    pub mode_message: ModeMessage,
    /// Side length in modules
    pub size: usize,
    /// Mode the encoder ended in
    pub final_mode: Mode,
}

impl AztecSymbol {
    pub fn data_codewords(&self) -> &[u16] {
        &self.codewords[..self.data_words]
    }

    pub fn parity_codewords(&self) -> &[u16] {
        &self.codewords[self.data_words..]
    }
}

struct Pass {
    bits_per_word: u32,
    final_mode: Mode,
    words: Vec<u16>,
}

/// Aztec encoder owning the parity generators for every Aztec field
#[derive(Debug)]
pub struct AztecEncoder {
    data: [EncoderCache<'static>; 4],
    mode_message: EncoderCache<'static>,
}

impl Default for AztecEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AztecEncoder {
    pub fn new() -> Self {
        Self {
            data: [
                StandardField::AztecData6,
                StandardField::AztecData8,
                StandardField::AztecData10,
                StandardField::AztecData12,
            ]
            .map(|standard| EncoderCache::new(standard.field())),
            mode_message: EncoderCache::new(StandardField::AztecParam.field()),
        }
    }

    pub fn encode(&mut self, text: &[u8], options: &AztecOptions) -> Result<AztecSymbol, EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::EmptyPayload);
        }
        if let Some(layers) = options.layers {
            if !(1..=MAX_LAYERS).contains(&layers) {
                return Err(EncodeError::LayerCountOutOfRange(layers));
            }
        }

        if options.error_correction_percent > 90 {
            warn!(
                "aztec: error correction {}% clamped to 90%",
                options.error_correction_percent
            );
        }
        let percent = usize::from(options.error_correction_percent.min(90));
        let grow = |estimate: usize, words: usize, width: u32| {
            estimate.max((words * 100 / (100 - percent) + 3) * width as usize)
        };

        let mut estimate = grow(4, text.len(), 4);
        let mut bits_per_word = select_width(estimate, options.layers);
        let pass = loop {
            let encoded = ModeEncoder::new(bits_per_word)?.encode(text);
            let mut stream = encoded.stream;
            stream.pad_to_word_boundary();
            debug!(
                "aztec pass: {} bits per word, {} data words, ends in {} mode",
                bits_per_word,
                stream.bit_len() / bits_per_word as usize,
                encoded.final_mode.name()
            );

            let pass = Pass {
                bits_per_word,
                final_mode: encoded.final_mode,
                words: stream.into_words(),
            };

            estimate = grow(estimate, pass.words.len(), bits_per_word);
            let next = select_width(estimate, options.layers);
            if next <= bits_per_word {
                break pass;
            }
            bits_per_word = next;
        };

        let data_words = pass.words.len();
        if data_words > MAX_DATA_WORDS {
            return Err(EncodeError::PayloadTooLarge {
                required: data_words,
                capacity: MAX_DATA_WORDS,
            });
        }

        let requested = options.layers.map_or(0, usize::from);
        let compact = estimate <= 608 && data_words <= 64 && requested <= 4;
        let finder_size = if compact { COMPACT_FINDER } else { FULL_FINDER };
        let layers = layers_for(estimate, finder_size).max(requested);

        let capacity = 8 * layers * (finder_size + 2 * layers) / pass.bits_per_word as usize;
        if capacity < data_words {
            return Err(EncodeError::PayloadTooLarge {
                required: data_words,
                capacity,
            });
        }
        let parity_words = capacity - data_words;

        let mode_message = self.mode_message(finder_size / 2, layers, data_words)?;

        let index = (pass.bits_per_word / 2 - 3) as usize;
        let codewords = self.data[index].get(parity_words).encode(&pass.words);

        let half = finder_size / 2;
        let mut center = half + 2 * layers;
        center += (center - 1) / 15;
        let size = 2 * center + 1;

        debug!(
            "aztec symbol: {} layers ({}), {}x{} modules, {} data + {} parity words of {} bits",
            layers,
            if compact { "compact" } else { "full" },
            size,
            size,
            data_words,
            parity_words,
            pass.bits_per_word
        );

        Ok(AztecSymbol {
            compact,
            layers,
            finder_size,
            bits_per_word: pass.bits_per_word,
            data_words,
            parity_words,
            codewords,
            mode_message,
            size,
            final_mode: pass.final_mode,
        })
    }

    fn mode_message(&mut self, half: usize, layers: usize, data_words: usize) -> Result<ModeMessage, EncodeError> {
        let value = (layers - 1) * (half * 992 - 4896) + data_words - 1;
        let digits = half - 2;
        let message: Vec<u16> = (0..digits)
            .map(|i| ((value >> (4 * (digits - 1 - i))) & 0x0F) as u16)
            .collect();

        let parity = (half + 5) / 2;
        let encoded = self.mode_message.get(parity).encode(&message);
        // The leading nibble only pads the value out to `digits`
        let nibbles: Vec<u8> = encoded[1..].iter().map(|&n| n as u8).collect();

        let word_width = ((half * 3 - 1) / 2) as u32;
        let mut stream = BitStream::with_stuffing(word_width, Stuffing::Disabled)?;
        for &nibble in &nibbles {
            stream.append(u32::from(nibble), 4);
        }
        let mut words = [0u16; 4];
        for (word, &packed) in words.iter_mut().zip(stream.words()) {
            *word = packed;
        }

        Ok(ModeMessage {
            nibbles,
            words,
            word_width,
        })
    }
}

fn select_width(estimate: usize, layers: Option<u8>) -> u32 {
    let by_estimate = match estimate {
        0..=240 => 6,
        241..=1920 => 8,
        1921..=10208 => 10,
        _ => 12,
    };
    let by_layers = match layers {
        None => 6,
        Some(l) if l < 3 => 6,
        Some(l) if l < 9 => 8,
        Some(l) if l < 23 => 10,
        Some(_) => 12,
    };
    by_estimate.max(by_layers)
}

/// Smallest layer count whose outer edge `4L + f` reaches `sqrt(bits + f^2)`
fn layers_for(bit_estimate: usize, finder_size: usize) -> usize {
    let target = bit_estimate + finder_size * finder_size;
    (1..usize::from(MAX_LAYERS))
        .find(|&layers| (4 * layers + finder_size).pow(2) >= target)
        .unwrap_or(usize::from(MAX_LAYERS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reed_solomon::ReedSolomonDecoder;

    fn options(percent: u8, layers: Option<u8>) -> AztecOptions {
        AztecOptions {
            error_correction_percent: percent,
            layers,
        }
    }

    #[test]
    fn test_hello_compact_symbol() {
        let symbol = AztecEncoder::new().encode(b"HELLO", &options(25, None)).unwrap();
        assert!(symbol.compact);
        assert_eq!(symbol.bits_per_word, 6);
        assert_eq!(symbol.layers, 1);
        assert_eq!(symbol.finder_size, 11);
        assert_eq!(symbol.size, 15);
        assert_eq!(symbol.data_codewords(), &[18, 25, 43, 24, 31]);
        assert_eq!(symbol.parity_words, 12);
        assert_eq!(symbol.codewords.len(), 17);
        assert_eq!(symbol.final_mode, Mode::Upper);
    }

    #[test]
    fn test_codewords_verify() {
        let symbol = AztecEncoder::new()
            .encode(b"Aztec: 2D codes, since 1995.", &options(33, None))
            .unwrap();
        let field = StandardField::aztec_data(symbol.bits_per_word).unwrap().field();
        let decoder = ReedSolomonDecoder::new(field, symbol.parity_words);
        assert!(decoder.is_codeword(&symbol.codewords));
    }

    #[test]
    fn test_mode_message_compact() {
        let symbol = AztecEncoder::new().encode(b"HELLO", &options(25, None)).unwrap();
        let message = &symbol.mode_message;
        assert_eq!(message.word_width, 7);
        assert_eq!(message.nibbles.len(), 7);
        // layers - 1 = 0, data words - 1 = 4
        assert_eq!(&message.nibbles[..2], &[0, 4]);

        let mut word: Vec<u16> = vec![0];
        word.extend(message.nibbles.iter().map(|&n| u16::from(n)));
        let decoder = ReedSolomonDecoder::new(StandardField::AztecParam.field(), 5);
        assert!(decoder.is_codeword(&word));

        let packed: String = message
            .words
            .iter()
            .map(|w| format!("{:07b}", w))
            .collect();
        let nibbles: String = message.nibbles.iter().map(|n| format!("{:04b}", n)).collect();
        assert_eq!(packed, nibbles);
    }

    #[test]
    fn test_requested_layers_force_full_symbol() {
        let symbol = AztecEncoder::new().encode(b"HELLO", &options(25, Some(6))).unwrap();
        assert!(!symbol.compact);
        assert_eq!(symbol.layers, 6);
        assert_eq!(symbol.bits_per_word, 8);
        assert_eq!(symbol.mode_message.nibbles.len(), 10);
        assert_eq!(symbol.mode_message.word_width, 10);
        // 5 * 2048 + 4 - 1
        assert_eq!(&symbol.mode_message.nibbles[..4], &[2, 8, 0, 3]);
        // center 7 + 12 plus one reference grid line
        assert_eq!(symbol.size, 41);
    }

    #[test]
    fn test_zero_percent_is_allowed() {
        let symbol = AztecEncoder::new().encode(b"HELLO", &options(0, None)).unwrap();
        assert_eq!(symbol.data_words, 5);
        assert!(symbol.parity_words > 0);
    }

    #[test]
    fn test_rejects_bad_requests() {
        let mut encoder = AztecEncoder::new();
        assert_eq!(
            encoder.encode(b"", &AztecOptions::default()).unwrap_err(),
            EncodeError::EmptyPayload
        );
        assert_eq!(
            encoder.encode(b"A", &options(25, Some(0))).unwrap_err(),
            EncodeError::LayerCountOutOfRange(0)
        );
        assert_eq!(
            encoder.encode(b"A", &options(25, Some(33))).unwrap_err(),
            EncodeError::LayerCountOutOfRange(33)
        );
    }

    #[test]
    fn test_oversized_payload() {
        let text = vec![0xA5u8; 4000];
        let err = AztecEncoder::new().encode(&text, &options(25, None)).unwrap_err();
        assert!(matches!(err, EncodeError::PayloadTooLarge { .. }));
    }

    #[test]
    fn test_width_grows_with_payload() {
        let mut encoder = AztecEncoder::new();
        let short = encoder.encode(b"HELLO", &options(25, None)).unwrap();
        let text = "LOREM IPSUM DOLOR SIT AMET ".repeat(20);
        let long = encoder.encode(text.as_bytes(), &options(25, None)).unwrap();
        assert!(long.bits_per_word > short.bits_per_word);
        assert!(!long.compact);
    }

    #[test]
    fn test_layer_search() {
        assert_eq!(layers_for(54, 11), 1);
        assert_eq!(layers_for(608, 11), 4);
        assert_eq!(layers_for(100_000, 14), 32);
        assert_eq!(select_width(240, None), 6);
        assert_eq!(select_width(241, None), 8);
        assert_eq!(select_width(10, Some(23)), 12);
    }
}
