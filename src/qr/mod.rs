//! QR codeword generation: segment packing, block tables and interleaving

pub mod codewords;
pub mod tables;

pub use codewords::{QrCode, QrCodewordEncoder, QrEncoder, QrMode};
pub use tables::{EcBlockInfo, ec_block_info};
