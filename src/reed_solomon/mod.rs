//! Reed-Solomon error correction shared by every symbology
//!
//! - `field`: GF(2^m) arithmetic and the standard symbology fields
//! - `polynomial`: polynomial algebra over a field
//! - `encoder`: parity generation and the per-field encoder cache
//! - `decoder`: syndrome / Euclidean / Forney correction for verification

pub mod decoder;
pub mod encoder;
pub mod field;
pub mod polynomial;

pub use decoder::{Correction, ReedSolomonDecoder};
pub use encoder::{EncoderCache, ReedSolomonEncoder};
pub use field::{GaloisField, StandardField};
pub use polynomial::Polynomial;
