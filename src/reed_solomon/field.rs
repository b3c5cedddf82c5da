//! Galois field GF(2^m) arithmetic using log/exp tables
//!
//! Elements are stored as `u16`, so fields up to GF(2^16) are supported.
//! The primitive element is always `2` (the polynomial `x`).
use crate::error::ConfigurationError;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaloisField {
    size: usize,
    generator: u32,
    base: u16,
    exp_table: Vec<u16>,
    log_table: Vec<u16>,
}

impl GaloisField {
    /// Build a field of `size` elements reduced modulo `generator`.
    ///
    /// `base` is the first root of every RS generator polynomial built over
    /// this field (roots are `base * 2^i`).
    pub fn new(size: usize, generator: u32, base: u16) -> Result<Self, ConfigurationError> {
        if !size.is_power_of_two() || !(4..=0x10000).contains(&size) {
            return Err(ConfigurationError::InvalidFieldSize(size));
        }
        if (generator as usize) < size || (generator as usize) >= 2 * size {
            return Err(ConfigurationError::GeneratorDegreeMismatch { size, generator });
        }
        if base == 0 || base as usize >= size {
            return Err(ConfigurationError::InvalidBase { base, size });
        }

        let field = Self::with_tables(size, generator, base);

        // Every nonzero element must appear exactly once in one period
        let mut seen = vec![false; size];
        for &value in &field.exp_table[..size - 1] {
            if value == 0 || seen[value as usize] {
                return Err(ConfigurationError::NotPrimitive(generator));
            }
            seen[value as usize] = true;
        }

        Ok(field)
    }

    fn with_tables(size: usize, generator: u32, base: u16) -> Self {
        let mut exp_table = vec![0u16; size];
        let mut log_table = vec![0u16; size];

        let mut value: u32 = 1;
        for entry in exp_table.iter_mut() {
            *entry = value as u16;
            value <<= 1;
            if value as usize >= size {
                value ^= generator;
            }
        }
        for (i, &element) in exp_table.iter().enumerate().take(size - 1) {
            log_table[element as usize] = i as u16;
        }

        Self {
            size,
            generator,
            base,
            exp_table,
            log_table,
        }
    }

    /// Number of elements in the field
    pub fn size(&self) -> usize {
        self.size
    }

    /// Order of the multiplicative group (`size - 1`)
    pub fn order(&self) -> usize {
        self.size - 1
    }

    pub fn generator(&self) -> u32 {
        self.generator
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    /// Field addition (and subtraction) is XOR
    #[inline]
    pub fn add(x: u16, y: u16) -> u16 {
        x ^ y
    }

    #[inline]
    pub fn multiply(&self, x: u16, y: u16) -> u16 {
        if x == 0 || y == 0 {
            return 0;
        }
        let sum = self.log_table[x as usize] as usize + self.log_table[y as usize] as usize;
        self.exp_table[sum % self.order()]
    }

    /// Multiplicative inverse. `x` must be nonzero.
    #[inline]
    pub fn invert(&self, x: u16) -> u16 {
        debug_assert!(x != 0, "zero has no inverse");
        self.exp_table[self.order() - self.log_table[x as usize] as usize]
    }

    #[inline]
    pub fn divide(&self, x: u16, y: u16) -> u16 {
        self.multiply(x, self.invert(y))
    }

    /// `2^power`, reduced modulo the group order
    #[inline]
    pub fn exp(&self, power: usize) -> u16 {
        self.exp_table[power % self.order()]
    }

    /// Discrete logarithm of a nonzero element
    #[inline]
    pub fn log(&self, x: u16) -> usize {
        self.log_table[x as usize] as usize
    }

    pub fn pow(&self, x: u16, n: usize) -> u16 {
        if n == 0 {
            return 1;
        }
        if x == 0 {
            return 0;
        }
        self.exp(self.log(x) * (n % self.order()))
    }
}

/// Field definitions fixed by the symbology standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardField {
    /// x^8 + x^4 + x^3 + x^2 + 1, roots from 2^0
    Qr,
    /// x^8 + x^5 + x^3 + x^2 + 1, roots from 2^1
    DataMatrix,
    /// x^6 + x + 1
    AztecData6,
    /// x^8 + x^5 + x^3 + x^2 + 1
    AztecData8,
    /// x^10 + x^3 + 1
    AztecData10,
    /// x^12 + x^6 + x^5 + x^3 + 1
    AztecData12,
    /// x^4 + x + 1, used for the mode message
    AztecParam,
}

impl StandardField {
    pub const ALL: [StandardField; 7] = [
        StandardField::Qr,
        StandardField::DataMatrix,
        StandardField::AztecData6,
        StandardField::AztecData8,
        StandardField::AztecData10,
        StandardField::AztecData12,
        StandardField::AztecParam,
    ];

    /// (size, generator, base)
    pub fn params(self) -> (usize, u32, u16) {
        match self {
            StandardField::Qr => (0x100, 0x11D, 1),
            StandardField::DataMatrix => (0x100, 0x12D, 2),
            StandardField::AztecData6 => (0x40, 0x43, 2),
            StandardField::AztecData8 => (0x100, 0x12D, 2),
            StandardField::AztecData10 => (0x400, 0x409, 2),
            StandardField::AztecData12 => (0x1000, 0x1069, 2),
            StandardField::AztecParam => (0x10, 0x13, 2),
        }
    }

    /// Aztec data field for a codeword width of 6, 8, 10 or 12 bits
    pub fn aztec_data(bits_per_word: u32) -> Option<Self> {
        match bits_per_word {
            6 => Some(StandardField::AztecData6),
            8 => Some(StandardField::AztecData8),
            10 => Some(StandardField::AztecData10),
            12 => Some(StandardField::AztecData12),
            _ => None,
        }
    }

    /// Shared field instance, built on first use
    pub fn field(self) -> &'static GaloisField {
        static FIELDS: [OnceLock<GaloisField>; 7] = [
            OnceLock::new(),
            OnceLock::new(),
            OnceLock::new(),
            OnceLock::new(),
            OnceLock::new(),
            OnceLock::new(),
            OnceLock::new(),
        ];
        let (size, generator, base) = self.params();
        FIELDS[self as usize].get_or_init(|| GaloisField::with_tables(size, generator, base))
    }
}
