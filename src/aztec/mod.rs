//! Aztec codeword generation
//!
//! - `bitstream`: codeword packing with bit stuffing
//! - `modes`: character tables and latch / shift costs
//! - `mode_encoder`: minimum-cost mode search over the input text
//! - `symbol`: width selection, symbol parameters, mode message and parity

pub mod bitstream;
pub mod mode_encoder;
pub mod modes;
pub mod symbol;

pub use bitstream::{BitStream, Stuffing};
pub use mode_encoder::{EncodedText, ModeEncoder};
pub use modes::Mode;
pub use symbol::{AztecEncoder, AztecOptions, AztecSymbol, ModeMessage};
