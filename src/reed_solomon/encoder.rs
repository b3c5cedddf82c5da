//! Reed-Solomon encoder: appends parity words to a message
//!
//! The generator polynomial has `parity` consecutive roots
//! `base, base*2, base*2^2, ...` of the field. Parity is computed with a
//! shift-register division, O(message * parity).
use super::field::GaloisField;
use super::polynomial::Polynomial;
use rayon::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ReedSolomonEncoder<'f> {
    field: &'f GaloisField,
    /// Generator coefficients below the (implicit, monic) leading term,
    /// highest degree first
    coefficients: Vec<u16>,
}

impl<'f> ReedSolomonEncoder<'f> {
    pub fn new(field: &'f GaloisField, parity: usize) -> Self {
        let mut coefficients = vec![0u16; parity];
        if let Some(last) = coefficients.last_mut() {
            *last = 1;
        }

        // Multiply by (x + root) once per root
        let mut root = field.base();
        for _ in 0..parity {
            for j in 0..parity {
                coefficients[j] = field.multiply(coefficients[j], root);
                if j + 1 < parity {
                    coefficients[j] = GaloisField::add(coefficients[j], coefficients[j + 1]);
                }
            }
            root = field.multiply(root, 2);
        }

        Self {
            field,
            coefficients,
        }
    }

    pub fn field(&self) -> &'f GaloisField {
        self.field
    }

    /// Number of parity words appended by `encode`
    pub fn parity(&self) -> usize {
        self.coefficients.len()
    }

    /// Full monic generator polynomial
    pub fn generator_polynomial(&self) -> Polynomial<'f> {
        let mut coefficients = Vec::with_capacity(self.coefficients.len() + 1);
        coefficients.push(1);
        coefficients.extend_from_slice(&self.coefficients);
        Polynomial::from_coefficients(self.field, coefficients)
    }

    /// Parity words for `message`
    pub fn parity_words(&self, message: &[u16]) -> Vec<u16> {
        let parity = self.coefficients.len();
        let mut remainder = vec![0u16; parity];
        if parity == 0 {
            return remainder;
        }

        for &word in message {
            let factor = GaloisField::add(word, remainder[0]);
            remainder.copy_within(1.., 0);
            remainder[parity - 1] = 0;
            for (r, &g) in remainder.iter_mut().zip(self.coefficients.iter()) {
                *r ^= self.field.multiply(g, factor);
            }
        }

        remainder
    }

    /// `message` followed by its parity words
    pub fn encode(&self, message: &[u16]) -> Vec<u16> {
        let mut output = Vec::with_capacity(message.len() + self.parity());
        output.extend_from_slice(message);
        output.extend(self.parity_words(message));
        output
    }

    /// Encode independent blocks in order
    pub fn encode_blocks(&self, blocks: &[Vec<u16>]) -> Vec<Vec<u16>> {
        blocks.iter().map(|block| self.encode(block)).collect()
    }

    /// Encode independent blocks on the rayon pool
    pub fn encode_blocks_parallel(&self, blocks: &[Vec<u16>]) -> Vec<Vec<u16>> {
        blocks.par_iter().map(|block| self.encode(block)).collect()
    }
}

/// Encoders for one field keyed by parity count, built on first request
#[derive(Debug)]
pub struct EncoderCache<'f> {
    field: &'f GaloisField,
    encoders: HashMap<usize, ReedSolomonEncoder<'f>>,
}

impl<'f> EncoderCache<'f> {
    pub fn new(field: &'f GaloisField) -> Self {
        Self {
            field,
            encoders: HashMap::new(),
        }
    }

    pub fn field(&self) -> &'f GaloisField {
        self.field
    }

    pub fn get(&mut self, parity: usize) -> &ReedSolomonEncoder<'f> {
        let field = self.field;
        self.encoders
            .entry(parity)
            .or_insert_with(|| ReedSolomonEncoder::new(field, parity))
    }

    /// Number of distinct parity counts built so far
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
