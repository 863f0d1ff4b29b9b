//! Preference statements between alternatives.

use serde::{Deserialize, Serialize};

use super::ids::AlternativeId;

/// Kind of a pairwise preference statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Strict preference (`>`).
    Strong,
    /// At least as good (`>=`).
    Weak,
    /// Equally preferred (`=`).
    Indifferent,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [
        RelationKind::Strong,
        RelationKind::Weak,
        RelationKind::Indifferent,
    ];

    /// Token used in `<comparisonType>`.
    pub fn xml_token(self) -> &'static str {
        match self {
            RelationKind::Strong => "strong",
            RelationKind::Weak => "weak",
            RelationKind::Indifferent => "indif",
        }
    }

    pub fn from_xml_token(token: &str) -> Option<Self> {
        match token.trim() {
            "strong" => Some(RelationKind::Strong),
            "weak" => Some(RelationKind::Weak),
            "indif" => Some(RelationKind::Indifferent),
            _ => None,
        }
    }
}

/// Kind of a comparison between two utility differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityKind {
    Strict,
    Weak,
    Indifferent,
}

impl IntensityKind {
    pub const ALL: [IntensityKind; 3] = [
        IntensityKind::Strict,
        IntensityKind::Weak,
        IntensityKind::Indifferent,
    ];

    /// Token used in `<comparisonType>`; the workbench expects `strict`, not `strong`.
    pub fn xml_token(self) -> &'static str {
        match self {
            IntensityKind::Strict => "strict",
            IntensityKind::Weak => "weak",
            IntensityKind::Indifferent => "indif",
        }
    }
}

/// Ordered pair `initial R terminal`, written as `["a0", "a1"]` in config and JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[AlternativeId; 2]", into = "[AlternativeId; 2]")]
pub struct AlternativePair {
    pub initial: AlternativeId,
    pub terminal: AlternativeId,
}

impl AlternativePair {
    pub fn new(initial: impl Into<AlternativeId>, terminal: impl Into<AlternativeId>) -> Self {
        Self {
            initial: initial.into(),
            terminal: terminal.into(),
        }
    }

    pub fn from_indices(initial: usize, terminal: usize) -> Self {
        Self {
            initial: AlternativeId::from_index(initial),
            terminal: AlternativeId::from_index(terminal),
        }
    }
}

impl From<[AlternativeId; 2]> for AlternativePair {
    fn from([initial, terminal]: [AlternativeId; 2]) -> Self {
        Self { initial, terminal }
    }
}

impl From<AlternativePair> for [AlternativeId; 2] {
    fn from(pair: AlternativePair) -> Self {
        [pair.initial, pair.terminal]
    }
}

/// Three buckets of pairwise statements, declared by the user or discovered
/// by the workbench.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationSet {
    pub strong: Vec<AlternativePair>,
    pub weak: Vec<AlternativePair>,
    pub indifferent: Vec<AlternativePair>,
}

impl RelationSet {
    pub fn bucket(&self, kind: RelationKind) -> &[AlternativePair] {
        match kind {
            RelationKind::Strong => &self.strong,
            RelationKind::Weak => &self.weak,
            RelationKind::Indifferent => &self.indifferent,
        }
    }

    pub fn bucket_mut(&mut self, kind: RelationKind) -> &mut Vec<AlternativePair> {
        match kind {
            RelationKind::Strong => &mut self.strong,
            RelationKind::Weak => &mut self.weak,
            RelationKind::Indifferent => &mut self.indifferent,
        }
    }

    pub fn push(&mut self, kind: RelationKind, pair: AlternativePair) {
        self.bucket_mut(kind).push(pair);
    }

    /// Membership across all buckets; kinds are not distinguished.
    pub fn contains(&self, pair: &AlternativePair) -> bool {
        RelationKind::ALL
            .iter()
            .any(|kind| self.bucket(*kind).contains(pair))
    }

    pub fn len(&self) -> usize {
        self.strong.len() + self.weak.len() + self.indifferent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (RelationKind, &AlternativePair)> {
        RelationKind::ALL
            .into_iter()
            .flat_map(move |kind| self.bucket(kind).iter().map(move |pair| (kind, pair)))
    }
}

/// `U(initial) - ... R U(terminal) - ...`: a comparison between two utility
/// differences, each side given as an alternatives set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(Vec<AlternativeId>, Vec<AlternativeId>)",
    into = "(Vec<AlternativeId>, Vec<AlternativeId>)"
)]
pub struct IntensityComparison {
    pub initial: Vec<AlternativeId>,
    pub terminal: Vec<AlternativeId>,
}

impl From<(Vec<AlternativeId>, Vec<AlternativeId>)> for IntensityComparison {
    fn from((initial, terminal): (Vec<AlternativeId>, Vec<AlternativeId>)) -> Self {
        Self { initial, terminal }
    }
}

impl From<IntensityComparison> for (Vec<AlternativeId>, Vec<AlternativeId>) {
    fn from(cmp: IntensityComparison) -> Self {
        (cmp.initial, cmp.terminal)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensitySet {
    pub strict: Vec<IntensityComparison>,
    pub weak: Vec<IntensityComparison>,
    pub indifferent: Vec<IntensityComparison>,
}

impl IntensitySet {
    pub fn bucket(&self, kind: IntensityKind) -> &[IntensityComparison] {
        match kind {
            IntensityKind::Strict => &self.strict,
            IntensityKind::Weak => &self.weak,
            IntensityKind::Indifferent => &self.indifferent,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntensityKind, &IntensityComparison)> {
        IntensityKind::ALL
            .into_iter()
            .flat_map(move |kind| self.bucket(kind).iter().map(move |cmp| (kind, cmp)))
    }

    pub fn is_empty(&self) -> bool {
        self.strict.is_empty() && self.weak.is_empty() && self.indifferent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_deserializes_from_two_element_array() {
        let pair: AlternativePair = serde_json::from_str(r#"["a0", "a8"]"#).unwrap();
        assert_eq!(pair, AlternativePair::from_indices(0, 8));
        assert_eq!(serde_json::to_string(&pair).unwrap(), r#"["a0","a8"]"#);
    }

    #[test]
    fn relation_set_membership_ignores_kind() {
        let mut set = RelationSet::default();
        set.push(RelationKind::Indifferent, AlternativePair::from_indices(2, 7));
        assert!(set.contains(&AlternativePair::from_indices(2, 7)));
        assert!(!set.contains(&AlternativePair::from_indices(7, 2)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn relation_kind_tokens() {
        for kind in RelationKind::ALL {
            assert_eq!(RelationKind::from_xml_token(kind.xml_token()), Some(kind));
        }
        assert_eq!(RelationKind::from_xml_token("strict"), None);
        assert_eq!(IntensityKind::Strict.xml_token(), "strict");
    }

    #[test]
    fn intensity_comparison_from_nested_arrays() {
        let cmp: IntensityComparison =
            serde_json::from_str(r#"[["a3", "a4"], ["a7", "a8"]]"#).unwrap();
        assert_eq!(cmp.initial, vec![AlternativeId::from("a3"), "a4".into()]);
        assert_eq!(cmp.terminal.len(), 2);
    }

    #[test]
    fn iter_walks_buckets_in_kind_order() {
        let mut set = RelationSet::default();
        set.push(RelationKind::Weak, AlternativePair::from_indices(0, 1));
        set.push(RelationKind::Strong, AlternativePair::from_indices(1, 2));
        let kinds: Vec<RelationKind> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![RelationKind::Strong, RelationKind::Weak]);
    }
}
