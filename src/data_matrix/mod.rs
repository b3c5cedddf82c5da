//! Data Matrix (ECC 200) codeword generation

pub mod codewords;
pub mod tables;

pub use codewords::{DataMatrix, DataMatrixCodewordEncoder, DataMatrixEncoder, Encodation};
pub use tables::{SYMBOL_SIZES, SymbolSize};
