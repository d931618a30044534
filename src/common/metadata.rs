use std::fmt::{Display, Formatter};
use std::ops::{Deref, Not};
use std::str::FromStr;

use super::codec::Mode;
use super::error::{QRError, QRResult};

// Version
//------------------------------------------------------------------------------

/// Symbol geometry. Only versions listed in the geometry table can be built.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Version(usize);

/// The one geometry built unless the caller picks another table entry.
pub const DEFAULT_VERSION: Version = Version(4);

impl Version {
    pub fn new(version: usize) -> QRResult<Self> {
        if GEOMETRIES.iter().any(|g| g.version == version) {
            Ok(Self(version))
        } else {
            Err(QRError::InvalidVersion)
        }
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub const fn dark_module(self) -> (i16, i16) {
        ((self.0 * 4 + 9) as i16, 8)
    }

    pub fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        match (self.0, mode) {
            (1..=9, Mode::Numeric) => 10,
            (1..=9, Mode::Alphanumeric) => 9,
            (1..=9, Mode::Byte | Mode::Kanji) => 8,
            (10..=26, Mode::Numeric) => 12,
            (10..=26, Mode::Alphanumeric) => 11,
            (10..=26, Mode::Byte) => 16,
            (10..=26, Mode::Kanji) => 10,
            (_, Mode::Numeric) => 14,
            (_, Mode::Alphanumeric) => 13,
            (_, Mode::Byte) => 16,
            (_, Mode::Kanji) => 12,
        }
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.geometry().data_codewords[ecl as usize]
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn ecc_codewords(self, ecl: ECLevel) -> usize {
        self.geometry().ecc_codewords[ecl as usize]
    }

    pub fn total_codewords(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) + self.ecc_codewords(ecl)
    }

    fn geometry(self) -> &'static Geometry {
        match GEOMETRIES.iter().find(|g| g.version == self.0) {
            Some(g) => g,
            None => unreachable!("Version {} is validated on construction", self.0),
        }
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}


// Geometry table
//------------------------------------------------------------------------------

struct Geometry {
    version: usize,
    // Indexed by ECLevel
    data_codewords: [usize; 4],
    ecc_codewords: [usize; 4],
}

static GEOMETRIES: [Geometry; 1] =
    [Geometry { version: 4, data_codewords: [80, 64, 48, 36], ecc_codewords: [10, 16, 24, 28] }];

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl FromStr for ECLevel {
    type Err = QRError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(Self::L),
            "M" | "m" => Ok(Self::M),
            "Q" | "q" => Ok(Self::Q),
            "H" | "h" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod ec_level_tests {
    use super::ECLevel;
    use crate::common::error::QRError;

    #[test]
    fn test_ordering() {
        assert!(ECLevel::L < ECLevel::M);
        assert!(ECLevel::M < ECLevel::Q);
        assert!(ECLevel::Q < ECLevel::H);
    }

    #[test]
    fn test_parse() {
        assert_eq!("q".parse::<ECLevel>(), Ok(ECLevel::Q));
        assert_eq!(" H ".parse::<ECLevel>(), Ok(ECLevel::H));
        assert_eq!("X".parse::<ECLevel>(), Err(QRError::InvalidECLevel));
        assert_eq!(ECLevel::M.to_string(), "M");
    }
}

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl From<bool> for Color {
    fn from(bit: bool) -> Self {
        if bit {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}
