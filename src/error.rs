//! Error types for field construction, symbol encoding and RS decoding

use thiserror::Error;

/// Invalid Galois field or codeword layout parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Field size must be a power of two between 4 and 65536
    #[error("Field size {0} is not a power of two in 4..=65536")]
    InvalidFieldSize(usize),

    /// Generator polynomial degree does not match the field size
    #[error("Generator polynomial {generator:#x} does not have degree log2({size})")]
    GeneratorDegreeMismatch { size: usize, generator: u32 },

    /// Generator polynomial does not produce every nonzero element
    #[error("Generator polynomial {0:#x} is not primitive")]
    NotPrimitive(u32),

    /// First generator root must be a nonzero field element
    #[error("Base element {base} is not a nonzero element of GF({size})")]
    InvalidBase { base: u16, size: usize },

    /// Codeword width a bit stream cannot pack
    #[error("Codeword width {0} is outside 2..=16")]
    InvalidWordWidth(u32),
}

/// Errors raised while turning a payload into protected codewords
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Field setup failed
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Nothing to encode
    #[error("Payload is empty")]
    EmptyPayload,

    /// Payload does not fit any available symbol size
    #[error("Payload needs {required} codewords but the symbol holds {capacity}")]
    PayloadTooLarge { required: usize, capacity: usize },

    /// QR version outside 1..=40
    #[error("QR version {0} is out of range")]
    VersionOutOfRange(u8),

    /// Aztec layer count outside 1..=32
    #[error("Aztec layer count {0} is out of range")]
    LayerCountOutOfRange(u8),

    /// Byte cannot be represented in the requested segment mode
    #[error("Byte {byte:#04x} cannot be encoded in {mode} mode")]
    UnsupportedCharacter { byte: u8, mode: &'static str },
}

/// Reed-Solomon decoding failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Error locator could not be normalised (constant term is zero)
    #[error("Uncorrectable error")]
    Uncorrectable,

    /// Polynomial division by the zero polynomial
    #[error("Division by the zero polynomial")]
    ZeroDivisor,
}
