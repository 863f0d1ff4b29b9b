//! Positional identifiers used in every XMCDA document.
//!
//! Identifiers are derived from the position of an alternative or criterion in
//! the session order; reordering the session invalidates previously written ids.

use std::fmt;

use serde::{Deserialize, Serialize};

/// External identifier of an alternative, `a<index>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlternativeId(String);

impl AlternativeId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_index(index: usize) -> Self {
        Self(format!("a{index}"))
    }

    /// Zero-based index encoded in the id, or `None` unless the id is exactly
    /// what [`AlternativeId::from_index`] would produce (`a01` is rejected).
    pub fn index(&self) -> Option<usize> {
        parse_prefixed(&self.0, "a")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlternativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlternativeId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// External identifier of a criterion, `cr<index>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionId(String);

impl CriterionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_index(index: usize) -> Self {
        Self(format!("cr{index}"))
    }

    pub fn index(&self) -> Option<usize> {
        parse_prefixed(&self.0, "cr")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CriterionId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

fn parse_prefixed(raw: &str, prefix: &str) -> Option<usize> {
    let digits = raw.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternative_id_roundtrips_index() {
        let id = AlternativeId::from_index(12);
        assert_eq!(id.as_str(), "a12");
        assert_eq!(id.index(), Some(12));
    }

    #[test]
    fn criterion_id_rejects_foreign_prefix() {
        assert_eq!(CriterionId::new("cr3").index(), Some(3));
        assert_eq!(CriterionId::new("a3").index(), None);
        assert_eq!(CriterionId::new("cr").index(), None);
        assert_eq!(CriterionId::new("cr+1").index(), None);
    }

    #[test]
    fn leading_zeros_are_not_canonical() {
        assert_eq!(AlternativeId::new("a0").index(), Some(0));
        assert_eq!(AlternativeId::new("a01").index(), None);
        assert_eq!(AlternativeId::new("a00").index(), None);
        assert_eq!(CriterionId::new("cr007").index(), None);
    }

    #[test]
    fn alternative_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&AlternativeId::from_index(4)).unwrap();
        assert_eq!(json, "\"a4\"");
    }
}
