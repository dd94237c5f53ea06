//! Dose normalization.
//!
//! Source spreadsheets typeset the same strength many ways (`0,5 g`,
//! `500 mg`, `500000 µg`). Everything here maps a dose string to one
//! canonical `<number> <unit>` form so equivalent drugs group together.

pub mod units;

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

pub use units::{DoseUnit, TargetUnit};

/// Separator between the ingredients of a multi-ingredient dose.
const CHUNK_SEPARATOR: &str = ", ";

/// Tokens accepted between the number and the unit, meaning "times 10^6".
const MILLION_TOKENS: [&str; 3] = ["mln", "mln.", "million"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DoseError {
    #[error("Dose string is empty")]
    EmptyInput,

    #[error("Unknown dose unit: {0}")]
    UnknownUnit(String),
}

/// Outcome of normalizing one comma-separated chunk.
///
/// Malformed chunks are kept verbatim so they surface for manual review
/// instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoseChunk {
    Normalized { amount: Decimal, unit: TargetUnit },
    Unparsed(String),
}

impl DoseChunk {
    /// Normalize a single `<number>[ mln] <unit>` chunk.
    pub fn parse(chunk: &str) -> Self {
        Self::try_normalize(chunk).unwrap_or_else(|| DoseChunk::Unparsed(chunk.to_string()))
    }

    fn try_normalize(chunk: &str) -> Option<Self> {
        let tokens: Vec<&str> = chunk.split(' ').collect();
        let (number, multiplier, unit) = match tokens.as_slice() {
            [number, unit] => (*number, None, *unit),
            [number, multiplier, unit] => (*number, Some(*multiplier), *unit),
            _ => return None,
        };

        let unit = DoseUnit::from_str(unit).ok()?;
        let mut amount = Decimal::from_str(&number.replace(',', ".")).ok()?;

        if let Some(multiplier) = multiplier {
            if !MILLION_TOKENS.contains(&multiplier) {
                return None;
            }
            amount = amount.checked_mul(Decimal::from(1_000_000))?;
        }

        let amount = amount.checked_mul(unit.factor())?.normalize();
        Some(DoseChunk::Normalized {
            amount,
            unit: unit.target(),
        })
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, DoseChunk::Normalized { .. })
    }
}

impl fmt::Display for DoseChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseChunk::Normalized { amount, unit } => write!(f, "{} {}", amount, unit),
            DoseChunk::Unparsed(original) => f.write_str(original),
        }
    }
}

/// A full dose: one chunk per active ingredient, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dose {
    chunks: Vec<DoseChunk>,
}

impl Dose {
    /// True when at least one chunk had to be kept verbatim.
    pub fn has_unparsed(&self) -> bool {
        self.chunks.iter().any(|chunk| !chunk.is_normalized())
    }
}

impl FromStr for Dose {
    type Err = DoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DoseError::EmptyInput);
        }

        let chunks = s.split(CHUNK_SEPARATOR).map(DoseChunk::parse).collect();
        Ok(Self { chunks })
    }
}

impl fmt::Display for Dose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                f.write_str(CHUNK_SEPARATOR)?;
            }
            write!(f, "{}", chunk)?;
        }
        Ok(())
    }
}

/// Normalize a dose string into its canonical text form.
pub fn normalize_dose(dose: &str) -> Result<String, DoseError> {
    Ok(dose.parse::<Dose>()?.to_string())
}
