use std::fmt;

/// Supported 2D symbologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    Aztec,
    Qr,
    DataMatrix,
}

impl Symbology {
    pub fn name(self) -> &'static str {
        match self {
            Symbology::Aztec => "aztec",
            Symbology::Qr => "qr",
            Symbology::DataMatrix => "datamatrix",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
