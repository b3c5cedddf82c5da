//! Bit appender packing values into fixed-width codewords
//!
//! Bits are written most significant first. With stuffing enabled, a word
//! whose first `width - 1` bits are all equal gets the complement of those
//! bits as its last bit, and the displaced bit moves on to the next word.
//! That keeps emitted words away from the all-zero and all-one patterns.
//!
//! `bit_len` counts every bit written, stuffing bits included.
use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stuffing {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    words: Vec<u16>,
    bit_len: usize,
    word_width: u32,
    stuffing: Stuffing,
}

impl BitStream {
    /// Stream of `word_width`-bit words with stuffing enabled
    pub fn new(word_width: u32) -> Result<Self, ConfigurationError> {
        Self::with_stuffing(word_width, Stuffing::Enabled)
    }

    pub fn with_stuffing(word_width: u32, stuffing: Stuffing) -> Result<Self, ConfigurationError> {
        if !(2..=16).contains(&word_width) {
            return Err(ConfigurationError::InvalidWordWidth(word_width));
        }
        Ok(Self {
            words: Vec::new(),
            bit_len: 0,
            word_width,
            stuffing,
        })
    }

    /// Empty stream with the same width and stuffing mode
    pub fn empty_like(&self) -> Self {
        Self {
            words: Vec::new(),
            bit_len: 0,
            word_width: self.word_width,
            stuffing: self.stuffing,
        }
    }

    pub fn word_width(&self) -> u32 {
        self.word_width
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Completed words plus the trailing partial word, if any
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u16> {
        self.words
    }

    /// Append the low `num_bits` bits of `value` using the stream's stuffing mode
    pub fn append(&mut self, value: u32, num_bits: u32) {
        self.append_with(value, num_bits, self.stuffing);
    }

    /// Append with an explicit stuffing mode for this call only
    pub fn append_with(&mut self, value: u32, num_bits: u32, stuffing: Stuffing) {
        debug_assert!(num_bits <= 32);
        for shift in (0..num_bits).rev() {
            self.push_bit((value >> shift) & 1 == 1, stuffing);
        }
    }

    fn push_bit(&mut self, bit: bool, stuffing: Stuffing) {
        let width = self.word_width as usize;
        let mut offset = self.bit_len % width;

        if offset == width - 1 && stuffing == Stuffing::Enabled {
            // Word is about to fill: inspect its leading width-1 bits
            let head = self.last_word() >> 1;
            let all_ones = (1u16 << (width - 1)) - 1;
            if head == 0 || head == all_ones {
                self.set_bit(offset, head & 1 == 0);
                self.bit_len += 1;
                offset = 0;
            }
        }

        if offset == 0 {
            self.words.push(0);
        }
        self.set_bit(offset, bit);
        self.bit_len += 1;
    }

    fn last_word(&self) -> u16 {
        self.words.last().copied().unwrap_or(0)
    }

    fn set_bit(&mut self, offset: usize, bit: bool) {
        if !bit {
            return;
        }
        let shift = self.word_width as usize - 1 - offset;
        if let Some(last) = self.words.last_mut() {
            *last |= 1 << shift;
        }
    }

    /// Fill the trailing partial word with ones.
    ///
    /// If stuffing pushes a padding bit into a new word, that word is
    /// dropped, so the stream always ends on a word boundary.
    pub fn pad_to_word_boundary(&mut self) {
        let width = self.word_width as usize;
        let remainder = self.bit_len % width;
        if remainder == 0 {
            return;
        }

        let pad = (width - remainder) as u32;
        self.append((1u32 << pad) - 1, pad);

        let spill = self.bit_len % width;
        if spill != 0 {
            self.words.pop();
            self.bit_len -= spill;
        }
    }

    /// Iterate over the written bits in order, stuffing bits included
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        let width = self.word_width as usize;
        (0..self.bit_len).map(move |i| {
            let word = self.words[i / width];
            (word >> (width - 1 - i % width)) & 1 == 1
        })
    }
}
