//! Minimum-cost Aztec text encoding
//!
//! Dynamic programming over the six modes: after each input position,
//! slot `m` holds the cheapest known bitstream for the prefix that leaves
//! the encoder in mode `m`. Each position first relaxes latches between
//! slots (in place, so chains of latches are possible), then consumes the
//! next character in every slot either directly or through a shift.
//!
//! Binary runs are tracked by start position; their length header is only
//! written once the run ends, while the slot cost already accounts for it.
use super::bitstream::BitStream;
use super::modes::{LATCH_BITS, LATCH_CODES, Mode, SHIFT_BITS, latch_code_width, punct_pair, shift_code};
use crate::error::ConfigurationError;
use log::trace;

/// Longest run a single binary shift can carry (5-bit zero + 11-bit length)
pub const MAX_BINARY_RUN: usize = 31 + 2047;

/// Result of a mode search
#[derive(Debug, Clone)]
pub struct EncodedText {
    /// Mode of the winning slot after the last character
    pub final_mode: Mode,
    /// Unpadded bitstream, stuffing applied
    pub stream: BitStream,
}

#[derive(Debug, Clone)]
struct BinaryRun {
    /// Stream up to and including the binary latch codes
    stream: BitStream,
    start: usize,
    return_mode: Mode,
}

impl BinaryRun {
    fn len_at(&self, position: usize) -> usize {
        position - self.start
    }

    /// Estimated bit cost with `position - start` bytes in the run
    fn cost(&self, position: usize) -> usize {
        let count = self.len_at(position);
        let header = if count > 31 { 16 } else { 5 };
        self.stream.bit_len() + header + 8 * count
    }

    /// Write the length header and the bytes, closing the run
    fn finish(&self, text: &[u8], position: usize) -> BitStream {
        let count = self.len_at(position);
        let mut stream = self.stream.clone();
        if count > 31 {
            stream.append(0, 5);
            stream.append((count - 31) as u32, 11);
        } else {
            stream.append(count as u32, 5);
        }
        for &byte in &text[self.start..position] {
            stream.append(u32::from(byte), 8);
        }
        stream
    }
}

fn improves(cost: usize, current: Option<usize>) -> bool {
    current.is_none_or(|existing| cost < existing)
}

/// Mode search for a fixed codeword width
#[derive(Debug, Clone)]
pub struct ModeEncoder {
    empty: BitStream,
}

impl ModeEncoder {
    /// Fails when `bits_per_word` is outside 2..=16
    pub fn new(bits_per_word: u32) -> Result<Self, ConfigurationError> {
        Ok(Self {
            empty: BitStream::new(bits_per_word)?,
        })
    }

    pub fn bits_per_word(&self) -> u32 {
        self.empty.word_width()
    }

    pub fn encode(&self, text: &[u8]) -> EncodedText {
        let mut slots: [Option<BitStream>; 5] = Default::default();
        slots[Mode::Upper.index()] = Some(self.empty.empty_like());
        let mut binary: Option<BinaryRun> = None;

        let mut position = 0;
        while position < text.len() {
            let pair = text
                .get(position + 1)
                .and_then(|&next| punct_pair(text[position], next));
            let step = if pair.is_some() { 2 } else { 1 };

            // A run that cannot take this step must end here
            if let Some(run) = binary.take_if(|run| run.len_at(position) + step > MAX_BINARY_RUN) {
                let back = run.return_mode.index();
                if improves(run.cost(position), slots[back].as_ref().map(BitStream::bit_len)) {
                    slots[back] = Some(run.finish(text, position));
                }
            }

            Self::relax_latches(&mut slots, &mut binary, text, position);
            slots = Self::consume(&slots, text[position], pair);
            position += step;
        }

        let mut best = None;
        let mut best_cost = usize::MAX;
        let finished = binary.map(|run| (Mode::Binary, run.finish(text, text.len())));
        let candidates = Mode::TEXT
            .into_iter()
            .zip(slots)
            .filter_map(|(mode, slot)| slot.map(|stream| (mode, stream)))
            .chain(finished);
        // Ties go to the later mode
        for (mode, stream) in candidates {
            if stream.bit_len() <= best_cost {
                best_cost = stream.bit_len();
                best = Some((mode, stream));
            }
        }

        let (final_mode, stream) = best.unwrap_or_else(|| (Mode::Upper, self.empty.empty_like()));
        trace!(
            "mode search: {} bytes -> {} bits ending in {} mode",
            text.len(),
            stream.bit_len(),
            final_mode.name()
        );
        EncodedText { final_mode, stream }
    }

    fn relax_latches(
        slots: &mut [Option<BitStream>; 5],
        binary: &mut Option<BinaryRun>,
        text: &[u8],
        position: usize,
    ) {
        for to in Mode::ALL {
            for from in Mode::ALL {
                if from == to {
                    continue;
                }

                if from == Mode::Binary {
                    let Some(run) = binary.as_ref() else {
                        continue;
                    };
                    if run.return_mode != to {
                        continue;
                    }
                    let cost = run.cost(position) + LATCH_BITS[from.index()][to.index()];
                    if improves(cost, slots[to.index()].as_ref().map(BitStream::bit_len)) {
                        slots[to.index()] = Some(run.finish(text, position));
                    }
                    continue;
                }

                let Some(source) = slots[from.index()].as_ref() else {
                    continue;
                };
                let cost = source.bit_len() + LATCH_BITS[from.index()][to.index()];
                let current = match to {
                    Mode::Binary => binary.as_ref().map(|run| run.cost(position)),
                    _ => slots[to.index()].as_ref().map(BitStream::bit_len),
                };
                if !improves(cost, current) {
                    continue;
                }

                let mut stream = source.clone();
                for &code in LATCH_CODES[from.index()][to.index()] {
                    stream.append(u32::from(code), latch_code_width(code));
                }

                if to == Mode::Binary {
                    // B/S from Digit or Punct is reached through U/L
                    let return_mode = match from {
                        Mode::Digit | Mode::Punct => Mode::Upper,
                        other => other,
                    };
                    *binary = Some(BinaryRun {
                        stream,
                        start: position,
                        return_mode,
                    });
                } else {
                    slots[to.index()] = Some(stream);
                }
            }
        }
    }

    /// Encode one character (or punctuation pair) in every text slot. The
    /// persistent mode of each slot is unchanged; shifts revert immediately.
    fn consume(slots: &[Option<BitStream>; 5], byte: u8, pair: Option<u8>) -> [Option<BitStream>; 5] {
        let mut next: [Option<BitStream>; 5] = Default::default();

        for to in Mode::TEXT {
            let index = match pair {
                Some(code) if to == Mode::Punct => code,
                Some(_) => continue,
                None => match to.char_index(byte) {
                    Some(index) => index,
                    None => continue,
                },
            };

            for from in Mode::TEXT {
                let Some(shift_bits) = SHIFT_BITS[from.index()][to.index()] else {
                    continue;
                };
                let Some(source) = slots[from.index()].as_ref() else {
                    continue;
                };

                let cost = source.bit_len() + shift_bits + to.code_width() as usize;
                if !improves(cost, next[from.index()].as_ref().map(BitStream::bit_len)) {
                    continue;
                }

                let mut stream = source.clone();
                if from != to {
                    let (code, width) = shift_code(from, to);
                    stream.append(code, width);
                }
                stream.append(u32::from(index), to.code_width());
                next[from.index()] = Some(stream);
            }
        }

        next
    }
}
