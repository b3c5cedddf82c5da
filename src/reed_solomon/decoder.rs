//! Reed-Solomon decoder used to verify protected codewords
//!
//! Syndromes are evaluated at the same roots the encoder uses
//! (`base * 2^i`). The error locator and evaluator come from the extended
//! Euclidean algorithm on `x^parity` and the syndrome polynomial, roots are
//! found by exhaustive search and magnitudes with Forney's formula.
//!
//! When a word carries more than `parity / 2` errors the decoder may leave it
//! corrupted without reporting a failure. Only a zero constant term in the
//! error locator is reported as [`DecodeError::Uncorrectable`].
use super::field::GaloisField;
use super::polynomial::Polynomial;
use crate::error::DecodeError;
use log::trace;

/// Outcome of a successful decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// All syndromes were zero; the word was left untouched
    Clean,
    /// Number of positions rewritten
    Repaired(usize),
}

impl Correction {
    pub fn is_clean(&self) -> bool {
        matches!(self, Correction::Clean)
    }
}

pub struct ReedSolomonDecoder<'f> {
    field: &'f GaloisField,
    num_ecc_codewords: usize,
}

impl<'f> ReedSolomonDecoder<'f> {
    pub fn new(field: &'f GaloisField, num_ecc_codewords: usize) -> Self {
        Self {
            field,
            num_ecc_codewords,
        }
    }

    /// Correct `received` (message followed by parity) in place
    pub fn decode(&self, received: &mut [u16]) -> Result<Correction, DecodeError> {
        let syndrome = self.syndrome_polynomial(received);
        if syndrome.is_zero() {
            return Ok(Correction::Clean);
        }

        let (mut locator, mut evaluator) = self.run_euclidean(syndrome)?;

        let constant = locator.constant_coefficient();
        if constant == 0 {
            return Err(DecodeError::Uncorrectable);
        }

        let inverse = self.field.invert(constant);
        locator.multiply_by_scalar(inverse);
        evaluator.multiply_by_scalar(inverse);

        let zeroes = locator.find_zeroes();
        trace!(
            "rs decode: locator degree {} with {} roots",
            locator.degree(),
            zeroes.len()
        );

        Ok(Correction::Repaired(
            self.apply_corrections(received, &zeroes, &evaluator),
        ))
    }

    /// True when every syndrome of `received` is zero
    pub fn is_codeword(&self, received: &[u16]) -> bool {
        self.syndrome_polynomial(received).is_zero()
    }

    /// `S(x) = sum S_i x^i` with `S_i = r(base * 2^i)`, where `received[0]`
    /// is the highest degree coefficient of `r`
    fn syndrome_polynomial(&self, received: &[u16]) -> Polynomial<'f> {
        let field = self.field;
        let word = Polynomial::from_coefficients(field, received.to_vec());
        let parity = self.num_ecc_codewords;

        let mut coefficients = vec![0u16; parity];
        for i in 0..parity {
            let root = field.multiply(field.base(), field.exp(i));
            coefficients[parity - 1 - i] = word.evaluate_at(root);
        }
        Polynomial::from_coefficients(field, coefficients)
    }

    /// Returns `(t, r)` with `t * S == r (mod x^parity)` and
    /// `deg(r) < parity / 2`
    fn run_euclidean(&self, syndrome: Polynomial<'f>) -> Result<(Polynomial<'f>, Polynomial<'f>), DecodeError> {
        let field = self.field;
        let parity = self.num_ecc_codewords;

        let mut r_last = Polynomial::monomial(field, parity, 1);
        let mut r = syndrome;
        let mut t_last = Polynomial::zero(field);
        let mut t = Polynomial::one(field);

        while !r.is_zero() && 2 * r.degree() >= parity {
            let (quotient, remainder) = r_last.divide(&r)?;

            let mut t_next = quotient.multiply(&t);
            t_next.add(&t_last);

            r_last = std::mem::replace(&mut r, remainder);
            t_last = std::mem::replace(&mut t, t_next);
        }

        Ok((t, r))
    }

    fn apply_corrections(&self, received: &mut [u16], zeroes: &[u16], evaluator: &Polynomial<'_>) -> usize {
        let field = self.field;
        let len = received.len();
        let base_power = field.log(field.base());
        let mut applied = 0;

        for (i, &zero) in zeroes.iter().enumerate() {
            // Locator roots are inverses of 2^(distance from the end)
            let from_end = field.log(field.invert(zero));
            if from_end >= len {
                continue;
            }
            let position = len - 1 - from_end;

            let mut denominator = 1u16;
            for (j, &other) in zeroes.iter().enumerate() {
                if i == j {
                    continue;
                }
                denominator = field.multiply(
                    denominator,
                    GaloisField::add(1, field.divide(zero, other)),
                );
            }

            let mut magnitude = evaluator.evaluate_at(zero);
            if base_power != 0 {
                magnitude = field.multiply(magnitude, field.pow(zero, base_power));
            }

            received[position] ^= field.divide(magnitude, denominator);
            applied += 1;
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reed_solomon::{ReedSolomonEncoder, StandardField};

    /// Reference encoder: long division of `data * x^num_ecc` by the
    /// generator with roots 2^0 .. 2^(num_ecc-1)
    fn rs_encode(data: &[u16], num_ecc: usize) -> Vec<u16> {
        let field = StandardField::Qr.field();
        let mut gpoly = vec![0u16; num_ecc + 1];
        gpoly[0] = 1;
        for i in 0..num_ecc {
            let root = field.exp(i);
            for j in (1..=i + 1).rev() {
                gpoly[j] = gpoly[j - 1] ^ field.multiply(gpoly[j], root);
            }
            gpoly[0] = field.multiply(gpoly[0], root);
        }

        let mut gpoly_div: Vec<u16> = gpoly[0..num_ecc].to_vec();
        gpoly_div.reverse();

        let mut remainder = vec![0u16; num_ecc];
        for &d in data {
            let factor = d ^ remainder[0];
            for j in 0..num_ecc - 1 {
                remainder[j] = remainder[j + 1];
            }
            remainder[num_ecc - 1] = 0;
            for j in 0..num_ecc {
                remainder[j] ^= field.multiply(gpoly_div[j], factor);
            }
        }

        let mut codeword = data.to_vec();
        codeword.extend_from_slice(&remainder);
        codeword
    }

    #[test]
    fn test_matches_reference_encoder() {
        let data = vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60];
        let encoder = ReedSolomonEncoder::new(StandardField::Qr.field(), 10);
        assert_eq!(encoder.encode(&data), rs_encode(&data, 10));
    }

    #[test]
    fn test_rs_encode_decode_no_errors() {
        let data = vec![0x10, 0x20, 0x30, 0x40, 0x50, 0x60];
        let mut codeword = rs_encode(&data, 10);
        let decoder = ReedSolomonDecoder::new(StandardField::Qr.field(), 10);
        assert_eq!(decoder.decode(&mut codeword), Ok(Correction::Clean));
        assert_eq!(&codeword[..data.len()], &data[..]);
    }

    #[test]
    fn test_rs_correct_single_error() {
        let data = vec![0x00; 10];
        let mut codeword = rs_encode(&data, 10);
        codeword[3] ^= 0xAB;

        let decoder = ReedSolomonDecoder::new(StandardField::Qr.field(), 10);
        assert_eq!(decoder.decode(&mut codeword), Ok(Correction::Repaired(1)));
        assert_eq!(&codeword[..data.len()], &data[..]);
    }

    #[test]
    fn test_rs_correct_multiple_errors() {
        let data = vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
        let mut codeword = rs_encode(&data, 10);
        codeword[0] ^= 0xFF;
        codeword[4] ^= 0x42;
        codeword[7] ^= 0x13;

        let decoder = ReedSolomonDecoder::new(StandardField::Qr.field(), 10);
        assert_eq!(decoder.decode(&mut codeword), Ok(Correction::Repaired(3)));
        assert_eq!(&codeword[..data.len()], &data[..]);
        assert!(decoder.is_codeword(&codeword));
    }

    #[test]
    fn test_rs_correct_errors_at_end() {
        let data = vec![0x01, 0x02, 0x03, 0x04, 0x05];
        let mut codeword = rs_encode(&data, 8);
        let original = codeword.clone();
        let total = codeword.len();
        codeword[total - 1] ^= 0xFF;
        codeword[total - 2] ^= 0x33;

        let decoder = ReedSolomonDecoder::new(StandardField::Qr.field(), 8);
        assert!(decoder.decode(&mut codeword).is_ok());
        assert_eq!(codeword, original);
    }

    #[test]
    fn test_base_two_field_corrects_errors() {
        // Data Matrix roots start at 2^1, exercising the base power factor
        let field = StandardField::DataMatrix.field();
        let encoder = ReedSolomonEncoder::new(field, 10);
        let original = encoder.encode(&[0x42, 0x43, 0x44, 0x81, 0x20, 0x7F]);

        let mut received = original.clone();
        received[1] ^= 0x5A;
        received[9] ^= 0x01;
        received[15] ^= 0xC3;

        let decoder = ReedSolomonDecoder::new(field, 10);
        assert_eq!(decoder.decode(&mut received), Ok(Correction::Repaired(3)));
        assert_eq!(received, original);
    }

    #[test]
    fn test_all_zero_word_is_clean() {
        let mut data = vec![0u16; 16];
        let decoder = ReedSolomonDecoder::new(StandardField::Qr.field(), 10);
        assert_eq!(decoder.decode(&mut data), Ok(Correction::Clean));
        assert_eq!(data, vec![0u16; 16]);
    }

    #[test]
    fn test_odd_parity_corrects_floor_half() {
        let field = StandardField::AztecData6.field();
        let encoder = ReedSolomonEncoder::new(field, 5);
        let original = encoder.encode(&[1, 2, 3, 4, 5, 6, 7]);
        let mut received = original.clone();
        received[2] ^= 9;
        received[10] ^= 33;

        let decoder = ReedSolomonDecoder::new(field, 5);
        assert!(decoder.decode(&mut received).is_ok());
        assert_eq!(received, original);
    }
}
