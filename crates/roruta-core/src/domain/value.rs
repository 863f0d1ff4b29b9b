//! Criteria, their value domains and preference directions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Result, RorutaError};
use super::ids::CriterionId;

/// Value domain of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberType {
    Integer,
    Real,
}

impl NumberType {
    /// Infer the value domain from a criterion name.
    ///
    /// Counts (`#doors`), dates (`releaseDate`) and the crash-test rating are
    /// integer-typed; everything else is real-typed.
    pub fn infer(criterion_name: &str) -> Self {
        if criterion_name.contains('#')
            || criterion_name.contains("Date")
            || criterion_name.contains("crashTest")
        {
            NumberType::Integer
        } else {
            NumberType::Real
        }
    }

    /// Convert raw text to a typed value of this domain.
    pub fn parse(self, criterion: &str, raw: &str) -> Result<ScalarValue> {
        let text = raw.trim();
        let invalid = || RorutaError::InvalidValue {
            criterion: criterion.to_string(),
            value: raw.to_string(),
            expected: self,
        };
        match self {
            NumberType::Integer => text
                .parse::<i64>()
                .map(ScalarValue::Integer)
                .map_err(|_| invalid()),
            NumberType::Real => text
                .parse::<f64>()
                .map(ScalarValue::Real)
                .map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberType::Integer => f.write_str("integer"),
            NumberType::Real => f.write_str("real"),
        }
    }
}

/// A performance value after re-typing by its criterion's domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Integer(i64),
    Real(f64),
}

impl ScalarValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            ScalarValue::Integer(v) => v as f64,
            ScalarValue::Real(v) => v,
        }
    }
}

/// Reals always carry a decimal point (`25000.0`), so text written to the
/// performance CSV keeps its `real` tag when serialised to XMCDA.
impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ScalarValue::Integer(v) => write!(f, "{v}"),
            ScalarValue::Real(v) => f.write_str(&format_real(v)),
        }
    }
}

pub(crate) fn format_real(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Preference direction of a criterion, encoded as 0/1 in XMCDA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    /// Larger is better (profit-like).
    Maximize,
    /// Smaller is better (cost-like).
    Minimize,
}

impl Direction {
    pub fn code(self) -> u8 {
        match self {
            Direction::Maximize => 0,
            Direction::Minimize => 1,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::Maximize),
            1 => Ok(Direction::Minimize),
            other => Err(format!("direction must be 0 or 1, got {other}")),
        }
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction.code()
    }
}

/// A criterion of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    pub number_type: NumberType,
}

impl Criterion {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: CriterionId::from_index(index),
            number_type: NumberType::infer(&name),
            name,
        }
    }

    /// Build criteria from names in canonical session order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Vec<Criterion> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Criterion::new(i, name.as_ref()))
            .collect()
    }
}
