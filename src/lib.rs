//! RustBarcode - Reed-Solomon protected codewords for 2D symbologies
//!
//! Turns text into the protected codeword sequence of an Aztec, QR or Data
//! Matrix symbol, together with the parameters a module-placement stage
//! needs (layer count, version, symbol size). Drawing the symbol is left to
//! the caller.
//!
//! The shared Reed-Solomon engine lives in [`reed_solomon`]; the Aztec
//! minimum-cost text encoder lives in [`aztec`].

/// Environment-backed defaults
mod config;

/// Aztec bit packing, mode search and symbol parameters
pub mod aztec;
/// Data Matrix encodations and block layout
pub mod data_matrix;
/// Error types
pub mod error;
/// Shared value types (ECLevel, Symbology)
pub mod models;
/// QR segments, block tables and interleaving
pub mod qr;
/// Galois fields, polynomials, RS encoder and decoder
pub mod reed_solomon;

pub use aztec::{AztecEncoder, AztecOptions, AztecSymbol};
pub use data_matrix::{DataMatrix, Encodation};
pub use error::{ConfigurationError, DecodeError, EncodeError};
pub use models::{ECLevel, Symbology};
pub use qr::QrCode;
pub use reed_solomon::{
    Correction, EncoderCache, GaloisField, ReedSolomonDecoder, ReedSolomonEncoder, StandardField,
};

/// Encode `text` as an Aztec symbol with default options
///
/// # Example
/// ```
/// let symbol = rust_barcode::encode_aztec(b"HELLO").unwrap();
/// assert_eq!(symbol.layers, 1);
/// assert!(symbol.compact);
/// ```
pub fn encode_aztec(text: &[u8]) -> Result<AztecSymbol, EncodeError> {
    AztecEncoder::new().encode(text, &AztecOptions::default())
}

/// Encode `text` as a QR code in the smallest version for `ec_level`
pub fn encode_qr(text: &[u8], ec_level: ECLevel) -> Result<QrCode, EncodeError> {
    QrCode::encode(text, ec_level)
}

/// Encode `text` as a Data Matrix symbol in a single encodation
pub fn encode_data_matrix(text: &[u8], encodation: Encodation) -> Result<DataMatrix, EncodeError> {
    DataMatrix::encode(text, encodation)
}

/// Protected codewords of `text` for `symbology`, widened to `u16`
pub fn encode_codewords(symbology: Symbology, text: &[u8]) -> Result<Vec<u16>, EncodeError> {
    match symbology {
        Symbology::Aztec => Ok(encode_aztec(text)?.codewords),
        Symbology::Qr => Ok(encode_qr(text, ECLevel::M)?
            .codewords
            .into_iter()
            .map(u16::from)
            .collect()),
        Symbology::DataMatrix => Ok(encode_data_matrix(text, Encodation::default())?
            .codewords
            .into_iter()
            .map(u16::from)
            .collect()),
    }
}
