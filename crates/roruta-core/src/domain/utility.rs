//! Representative utility function recovered from the workbench.
//!
//! The overall utility of an alternative is the sum over criteria of the
//! ordinate whose abscissa equals the alternative's performance. Lookup is an
//! exact match; no interpolation is performed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::CriterionId;
use super::value::{format_real, ScalarValue};

/// X coordinate of a marginal utility sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Abscissa {
    Integer(i64),
    Real(f64),
    /// Non-numeric abscissa (qualitative scale), kept verbatim.
    Label(String),
}

impl Abscissa {
    /// Type the text of an `<abscissa>` value: integer when it has no decimal
    /// point, float otherwise, raw label when neither parses.
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        let parsed = if text.contains('.') {
            text.parse::<f64>().ok().map(Abscissa::Real)
        } else {
            text.parse::<i64>().ok().map(Abscissa::Integer)
        };
        parsed.unwrap_or_else(|| Abscissa::Label(text.to_string()))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Abscissa::Integer(v) => Some(v as f64),
            Abscissa::Real(v) => Some(v),
            Abscissa::Label(_) => None,
        }
    }

    /// Numeric equality across integer and real (10 matches 10.0).
    pub fn matches(&self, value: &ScalarValue) -> bool {
        match self.as_f64() {
            Some(x) => x == value.as_f64(),
            None => false,
        }
    }

    fn same_key(&self, other: &Abscissa) -> bool {
        match (self, other) {
            (Abscissa::Label(a), Abscissa::Label(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Abscissa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Abscissa::Integer(v) => write!(f, "{v}"),
            Abscissa::Real(v) => f.write_str(&format_real(*v)),
            Abscissa::Label(s) => f.write_str(s),
        }
    }
}

/// One `(abscissa, ordinate)` point of a marginal utility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub abscissa: Abscissa,
    pub ordinate: f64,
}

/// Marginal utility of a single criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalUtility {
    pub criterion: CriterionId,
    pub samples: Vec<Sample>,
}

impl MarginalUtility {
    pub fn new(criterion: CriterionId) -> Self {
        Self {
            criterion,
            samples: Vec::new(),
        }
    }

    /// Add a sample; an equal abscissa replaces the earlier ordinate.
    pub fn insert(&mut self, abscissa: Abscissa, ordinate: f64) {
        if let Some(existing) = self
            .samples
            .iter_mut()
            .find(|s| s.abscissa.same_key(&abscissa))
        {
            existing.ordinate = ordinate;
        } else {
            self.samples.push(Sample { abscissa, ordinate });
        }
    }

    pub fn lookup(&self, value: &ScalarValue) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.abscissa.matches(value))
            .map(|s| s.ordinate)
    }
}

/// Representative utility function: marginals in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilityFunction {
    pub marginals: Vec<MarginalUtility>,
}

impl UtilityFunction {
    pub fn get(&self, criterion: &CriterionId) -> Option<&MarginalUtility> {
        self.marginals.iter().find(|m| &m.criterion == criterion)
    }

    /// Start (or restart) the marginal of `criterion` and return it for filling.
    pub fn begin(&mut self, criterion: CriterionId) -> &mut MarginalUtility {
        if let Some(pos) = self.marginals.iter().position(|m| m.criterion == criterion) {
            self.marginals[pos].samples.clear();
            &mut self.marginals[pos]
        } else {
            self.marginals.push(MarginalUtility::new(criterion));
            let last = self.marginals.len() - 1;
            &mut self.marginals[last]
        }
    }

    pub fn len(&self) -> usize {
        self.marginals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marginals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abscissa_typing_follows_decimal_point() {
        assert_eq!(Abscissa::parse("2015"), Abscissa::Integer(2015));
        assert_eq!(Abscissa::parse("4.5"), Abscissa::Real(4.5));
        assert_eq!(Abscissa::parse("good"), Abscissa::Label("good".into()));
        assert_eq!(Abscissa::parse("1.2.3"), Abscissa::Label("1.2.3".into()));
    }

    #[test]
    fn lookup_matches_integer_against_real() {
        let mut m = MarginalUtility::new(CriterionId::from_index(0));
        m.insert(Abscissa::Real(10.0), 2.0);
        m.insert(Abscissa::Real(20.0), 5.0);
        assert_eq!(m.lookup(&ScalarValue::Integer(10)), Some(2.0));
        assert_eq!(m.lookup(&ScalarValue::Real(20.0)), Some(5.0));
        assert_eq!(m.lookup(&ScalarValue::Real(15.0)), None);
    }

    #[test]
    fn repeated_abscissa_replaces_sample() {
        let mut m = MarginalUtility::new(CriterionId::from_index(1));
        m.insert(Abscissa::Integer(3), 0.1);
        m.insert(Abscissa::Real(3.0), 0.4);
        assert_eq!(m.samples.len(), 1);
        assert_eq!(m.samples[0].ordinate, 0.4);
    }

    #[test]
    fn begin_restarts_existing_marginal() {
        let mut f = UtilityFunction::default();
        f.begin(CriterionId::from_index(0))
            .insert(Abscissa::Integer(1), 1.0);
        f.begin(CriterionId::from_index(0));
        assert_eq!(f.len(), 1);
        assert!(f.marginals[0].samples.is_empty());
    }
}
