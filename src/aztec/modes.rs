//! Aztec text encoding modes and their transition tables
//!
//! Code values follow the Aztec character tables. Each mode's index table
//! reserves value 0 (punctuation shift, or FLG(n) in Punct) so lookups for
//! ordinary characters start at 1.

/// Encoder state; `Binary` is only entered through B/S
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Upper = 0,
    Lower = 1,
    Mixed = 2,
    Punct = 3,
    Digit = 4,
    Binary = 5,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Upper,
        Mode::Lower,
        Mode::Mixed,
        Mode::Punct,
        Mode::Digit,
        Mode::Binary,
    ];

    /// Modes that encode characters through a code table
    pub const TEXT: [Mode; 5] = [Mode::Upper, Mode::Lower, Mode::Mixed, Mode::Punct, Mode::Digit];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Bits per character code (Digit uses 4, the others 5)
    pub fn code_width(self) -> u32 {
        match self {
            Mode::Digit => 4,
            _ => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Upper => "upper",
            Mode::Lower => "lower",
            Mode::Mixed => "mixed",
            Mode::Punct => "punct",
            Mode::Digit => "digit",
            Mode::Binary => "binary",
        }
    }

    /// Code of `byte` in this mode's table
    pub fn char_index(self, byte: u8) -> Option<u8> {
        match self {
            Mode::Upper => match byte {
                b' ' => Some(1),
                b'A'..=b'Z' => Some(byte - b'A' + 2),
                _ => None,
            },
            Mode::Lower => match byte {
                b' ' => Some(1),
                b'a'..=b'z' => Some(byte - b'a' + 2),
                _ => None,
            },
            Mode::Mixed => match byte {
                b' ' => Some(1),
                1..=13 => Some(byte + 1),
                27..=31 => Some(byte - 12),
                b'@' => Some(20),
                b'\\' => Some(21),
                b'^' => Some(22),
                b'_' => Some(23),
                b'`' => Some(24),
                b'|' => Some(25),
                b'~' => Some(26),
                127 => Some(27),
                _ => None,
            },
            Mode::Punct => match byte {
                b'\r' => Some(1),
                b'!'..=b'/' => Some(byte - b'!' + 6),
                b':'..=b'?' => Some(byte - b':' + 21),
                b'[' => Some(27),
                b']' => Some(28),
                b'{' => Some(29),
                b'}' => Some(30),
                _ => None,
            },
            Mode::Digit => match byte {
                b' ' => Some(1),
                b'0'..=b'9' => Some(byte - b'0' + 2),
                b',' => Some(12),
                b'.' => Some(13),
                _ => None,
            },
            Mode::Binary => None,
        }
    }
}

/// Two-character sequences with a single Punct code
pub fn punct_pair(first: u8, second: u8) -> Option<u8> {
    match (first, second) {
        (b'\r', b'\n') => Some(2),
        (b'.', b' ') => Some(3),
        (b',', b' ') => Some(4),
        (b':', b' ') => Some(5),
        _ => None,
    }
}

/// Bits spent latching from one mode (row) into another (column).
/// Entries into Binary include the 5-bit length field. Leaving Binary is
/// free because the run length ends it implicitly.
pub const LATCH_BITS: [[usize; 6]; 6] = [
    [0, 5, 5, 10, 5, 10],
    [9, 0, 5, 10, 5, 10],
    [5, 5, 0, 5, 10, 10],
    [5, 10, 10, 0, 10, 15],
    [4, 9, 9, 14, 0, 14],
    [0, 0, 0, 0, 0, 0],
];

/// Latch code sequences from each text mode. Codes below 16 are 4-bit Digit
/// codes, the rest are 5 bits wide.
pub const LATCH_CODES: [[&[u8]; 6]; 5] = [
    // upper
    [&[], &[28], &[29], &[29, 30], &[30], &[31]],
    // lower
    [&[30, 14], &[], &[29], &[29, 30], &[30], &[31]],
    // mixed
    [&[29], &[28], &[], &[30], &[28, 30], &[31]],
    // punct
    [&[31], &[31, 28], &[31, 29], &[], &[31, 30], &[31, 31]],
    // digit
    [&[14], &[14, 28], &[14, 29], &[14, 29, 30], &[], &[14, 31]],
];

/// Bits spent on a one-character shift from a text mode (row) into another
/// (column); `None` where no shift exists. Staying in the same mode costs
/// nothing.
pub const SHIFT_BITS: [[Option<usize>; 5]; 5] = [
    [Some(0), None, None, Some(5), None],
    [Some(5), Some(0), None, Some(5), None],
    [None, None, Some(0), Some(5), None],
    [None, None, None, Some(0), None],
    [Some(4), None, None, Some(4), Some(0)],
];

/// Shift code emitted in `from` to reach `to` for one character
pub fn shift_code(from: Mode, to: Mode) -> (u32, u32) {
    let code = match (from, to) {
        (_, Mode::Punct) => 0,
        (Mode::Digit, _) => 15,
        _ => 28,
    };
    (code, from.code_width())
}

/// Width of a latch code value
pub fn latch_code_width(code: u8) -> u32 {
    if code < 16 { 4 } else { 5 }
}
