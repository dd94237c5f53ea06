use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::DoseError;

/// Units a source dose may be typeset in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoseUnit {
    Gram,
    Milligram,
    Microgram,
    InternationalUnit,
}

/// Units a normalized dose is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetUnit {
    Milligram,
    InternationalUnit,
}

impl DoseUnit {
    /// Multiplier taking an amount in this unit to its target unit.
    pub fn factor(self) -> Decimal {
        match self {
            DoseUnit::Gram => Decimal::from(1000),
            DoseUnit::Milligram => Decimal::ONE,
            DoseUnit::Microgram => Decimal::new(1, 3),
            DoseUnit::InternationalUnit => Decimal::ONE,
        }
    }

    pub fn target(self) -> TargetUnit {
        match self {
            DoseUnit::Gram | DoseUnit::Milligram | DoseUnit::Microgram => TargetUnit::Milligram,
            DoseUnit::InternationalUnit => TargetUnit::InternationalUnit,
        }
    }
}

impl FromStr for DoseUnit {
    type Err = DoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(DoseUnit::Gram),
            "mg" => Ok(DoseUnit::Milligram),
            // U+00B5 MICRO SIGN and U+03BC GREEK SMALL LETTER MU
            "\u{00B5}g" | "\u{03BC}g" => Ok(DoseUnit::Microgram),
            "j.m." | "IU" => Ok(DoseUnit::InternationalUnit),
            _ => Err(DoseError::UnknownUnit(s.to_string())),
        }
    }
}

impl fmt::Display for TargetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetUnit::Milligram => write!(f, "mg"),
            TargetUnit::InternationalUnit => write!(f, "IU"),
        }
    }
}
