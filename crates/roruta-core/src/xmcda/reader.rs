//! Readers for the documents the workbench produces.
//!
//! Documents are parsed structurally with `roxmltree` and matched on local
//! element names, so indentation and line layout of the workbench output do
//! not matter. Namespaced roots (`xmcda:XMCDA`) are handled transparently.

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{
    Abscissa, AlternativeId, AlternativePair, CriterionId, RelationKind, RelationSet, Result,
    RorutaError, UtilityFunction,
};
use crate::obs;

/// Where a relation file comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationOrigin {
    /// User-declared statements (the preferences echo); kinds are kept apart.
    Declared,
    /// Relations computed by the workbench; a flat list.
    Discovered,
}

impl RelationOrigin {
    fn label(self) -> &'static str {
        match self {
            RelationOrigin::Declared => "declared",
            RelationOrigin::Discovered => "discovered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Relations {
    Declared(RelationSet),
    Discovered(Vec<AlternativePair>),
}

impl Relations {
    pub fn len(&self) -> usize {
        match self {
            Relations::Declared(set) => set.len(),
            Relations::Discovered(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_document<'a>(xml: &'a str, path: &Path) -> Result<Document<'a>> {
    Document::parse(xml).map_err(|source| RorutaError::Xml {
        path: PathBuf::from(path),
        source,
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.has_tag_name(name))
}

fn element_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}

fn first_alternative_id(side: Node<'_, '_>) -> Option<AlternativeId> {
    side.descendants()
        .find(|n| n.has_tag_name("alternativeID"))
        .and_then(element_text)
        .map(AlternativeId::from)
}

/// Read a relation file.
pub fn read_relations(path: &Path, origin: RelationOrigin) -> Result<Relations> {
    let xml = std::fs::read_to_string(path)?;
    let relations = parse_relations(&xml, path, origin)?;
    obs::emit_relations_loaded(path, origin.label(), relations.len());
    Ok(relations)
}

pub fn read_declared_relations(path: &Path) -> Result<RelationSet> {
    let xml = std::fs::read_to_string(path)?;
    let set = parse_declared(&xml, path)?;
    obs::emit_relations_loaded(path, RelationOrigin::Declared.label(), set.len());
    Ok(set)
}

pub fn read_discovered_relations(path: &Path) -> Result<Vec<AlternativePair>> {
    let xml = std::fs::read_to_string(path)?;
    let pairs = parse_discovered(&xml, path)?;
    obs::emit_relations_loaded(path, RelationOrigin::Discovered.label(), pairs.len());
    Ok(pairs)
}

/// Extract every `pair` (`initial` → `terminal`) in document order.
///
/// Declared files are bucketed by the `comparisonType` of the enclosing
/// `alternativesComparisons` element.
pub fn parse_relations(xml: &str, path: &Path, origin: RelationOrigin) -> Result<Relations> {
    match origin {
        RelationOrigin::Declared => parse_declared(xml, path).map(Relations::Declared),
        RelationOrigin::Discovered => parse_discovered(xml, path).map(Relations::Discovered),
    }
}

fn parse_declared(xml: &str, path: &Path) -> Result<RelationSet> {
    let doc = parse_document(xml, path)?;
    let mut declared = RelationSet::default();
    for (node, pair) in pairs(&doc, path) {
        declared.push(comparison_kind(node, path)?, pair);
    }
    debug!(path = %path.display(), pairs = declared.len(), "parsed declared relations");
    Ok(declared)
}

fn parse_discovered(xml: &str, path: &Path) -> Result<Vec<AlternativePair>> {
    let doc = parse_document(xml, path)?;
    let discovered: Vec<AlternativePair> = pairs(&doc, path).map(|(_, pair)| pair).collect();
    debug!(path = %path.display(), pairs = discovered.len(), "parsed discovered relations");
    Ok(discovered)
}

fn pairs<'a, 'input>(
    doc: &'a Document<'input>,
    path: &'a Path,
) -> impl Iterator<Item = (Node<'a, 'input>, AlternativePair)> + 'a {
    doc.descendants()
        .filter(|n| n.has_tag_name("pair"))
        .filter_map(move |node| {
            let initial = child(node, "initial").and_then(first_alternative_id);
            let terminal = child(node, "terminal").and_then(first_alternative_id);
            match (initial, terminal) {
                (Some(initial), Some(terminal)) => {
                    Some((node, AlternativePair { initial, terminal }))
                }
                _ => {
                    warn!(path = %path.display(), "skipping pair without initial/terminal alternativeID");
                    None
                }
            }
        })
}

fn comparison_kind(pair: Node<'_, '_>, path: &Path) -> Result<RelationKind> {
    let token = pair
        .ancestors()
        .find(|n| n.has_tag_name("alternativesComparisons"))
        .and_then(|block| child(block, "comparisonType"))
        .and_then(element_text)
        .ok_or_else(|| RorutaError::MissingComparisonType {
            path: PathBuf::from(path),
        })?;
    RelationKind::from_xml_token(token)
        .ok_or_else(|| RorutaError::UnknownComparisonType(token.to_string()))
}

/// Read `representative-value-function.xml`.
pub fn get_representative_function(path: &Path) -> Result<UtilityFunction> {
    let xml = std::fs::read_to_string(path)?;
    let function = parse_representative_function(&xml, path)?;
    debug!(
        path = %path.display(),
        criteria = function.len(),
        "read representative function"
    );
    Ok(function)
}

/// Text of the value element nested in `<abscissa>`/`<ordinate>`
/// (`<real>`, `<integer>`, `<label>`...), or the node's own text.
fn axis_value<'a>(axis: Node<'a, '_>) -> Option<&'a str> {
    match axis.children().find(|n| n.is_element()) {
        Some(value) => element_text(value),
        None => element_text(axis),
    }
}

/// Collect `(abscissa, ordinate)` samples per criterion from the first
/// `criteria` element. An ordinate commits the most recent abscissa.
pub fn parse_representative_function(xml: &str, path: &Path) -> Result<UtilityFunction> {
    let doc = parse_document(xml, path)?;
    let mut function = UtilityFunction::default();
    let Some(criteria) = doc.descendants().find(|n| n.has_tag_name("criteria")) else {
        warn!(path = %path.display(), "no criteria element in representative function");
        return Ok(function);
    };

    for criterion in criteria
        .descendants()
        .filter(|n| n.has_tag_name("criterion"))
    {
        let Some(id) = criterion.attribute("id") else {
            continue;
        };
        let marginal = function.begin(CriterionId::new(id));
        let mut pending: Option<Abscissa> = None;

        for node in criterion.descendants() {
            if node.has_tag_name("abscissa") {
                pending = axis_value(node).map(Abscissa::parse);
            } else if node.has_tag_name("ordinate") {
                let raw = axis_value(node).unwrap_or_default();
                let ordinate: f64 = raw.parse().map_err(|_| RorutaError::InvalidOrdinate {
                    criterion: id.to_string(),
                    value: raw.to_string(),
                })?;
                if let Some(abscissa) = pending.take() {
                    marginal.insert(abscissa, ordinate);
                }
            }
        }
    }
    Ok(function)
}
