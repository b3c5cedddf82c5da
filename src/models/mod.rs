pub mod ec_level;
pub mod symbology;

pub use ec_level::ECLevel;
pub use symbology::Symbology;
