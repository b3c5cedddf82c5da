use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

static AZTEC_EC_PERCENT: OnceLock<u8> = OnceLock::new();

/// Default share of an Aztec symbol spent on parity, in percent
pub(crate) fn aztec_ec_percent() -> u8 {
    *AZTEC_EC_PERCENT.get_or_init(|| parse_env_u8("BARCODE_AZTEC_EC_PERCENT", 25).min(90))
}

static PARALLEL_BLOCKS: OnceLock<usize> = OnceLock::new();

/// Block count from which QR and Data Matrix parity is computed on the rayon pool
pub(crate) fn parallel_block_threshold() -> usize {
    *PARALLEL_BLOCKS.get_or_init(|| parse_env_usize("BARCODE_PARALLEL_BLOCKS", 8).max(1))
}
