//! XMCDA 2.0 document generators.
//!
//! Each `render_*` function returns one complete document: the shared
//! `<xmcda:XMCDA>` header, the body indented four spaces per level, and the
//! closing tag. [`XmcdaWriter`] writes them into the project directory under
//! fixed file names. Renderers do not check that referenced ids exist; use
//! [`XmcdaWriter::write_session_documents`] to validate first.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{Direction, IntensitySet, RelationKind, RelationSet, Result};
use crate::obs;
use crate::table::PerformanceTable;
use crate::validate::validate_session;

pub const XMCDA_HEADER: &str = r#"<xmcda:XMCDA xmlns:xmcda="http://www.decision-deck.org/2009/XMCDA-2.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.decision-deck.org/2009/XMCDA-2.0.0 file:/home/pat/Documents/currentResearch/DecisionDeck/svn-DecisionDeck/XMCDA/XMCDA-2.0.0.xsd">"#;
pub const XMCDA_FOOTER: &str = "</xmcda:XMCDA>";

pub const ALTERNATIVES_FILE: &str = "alternatives.xml";
pub const CRITERIA_FILE: &str = "criteria.xml";
pub const PERFORMANCE_TABLE_FILE: &str = "performanceTable.xml";
pub const PREFERENCES_FILE: &str = "preferences.xml";
pub const DIRECTIONS_FILE: &str = "criteriaPreferenceDirections.xml";
pub const INTENSITIES_FILE: &str = "intensitiesOfPref.xml";

const INDENT: &str = "    ";

/// Line-by-line builder tracking the nesting depth.
struct XmlEmitter {
    out: String,
    depth: usize,
}

impl XmlEmitter {
    fn document() -> Self {
        let mut out = String::with_capacity(1024);
        out.push_str(XMCDA_HEADER);
        out.push('\n');
        Self { out, depth: 1 }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, tag: &str) {
        self.line(&format!("<{tag}>"));
        self.depth += 1;
    }

    fn open_with(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        let mut text = format!("<{tag}");
        for (name, value) in attrs {
            text.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }
        text.push('>');
        self.line(&text);
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{tag}>"));
    }

    fn leaf(&mut self, tag: &str, text: &str) {
        self.line(&format!("<{tag}>{}</{tag}>", escape(text)));
    }

    fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        let mut text = format!("<{tag}");
        for (name, value) in attrs {
            text.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }
        text.push_str("/>");
        self.line(&text);
    }

    fn title_block(&mut self, title: &str) {
        self.open("description");
        self.leaf("title", title);
        self.close("description");
    }

    fn finish(mut self) -> String {
        self.out.push_str(XMCDA_FOOTER);
        self.out.push('\n');
        self.out
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `real` when the stored text has a decimal point, `integer` otherwise.
pub fn value_tag(raw: &str) -> &'static str {
    if raw.contains('.') {
        "real"
    } else {
        "integer"
    }
}

/// One `<alternative id="a<i>" name="..."/>` per alternative, in list order.
pub fn render_alternatives(names: &[String]) -> String {
    let mut xml = XmlEmitter::document();
    xml.open("alternatives");
    for (i, name) in names.iter().enumerate() {
        let id = format!("a{i}");
        xml.empty("alternative", &[("id", id.as_str()), ("name", name.as_str())]);
    }
    xml.close("alternatives");
    xml.finish()
}

/// Title block followed by one `<criterion id="cr<i>" name="..."/>` per criterion.
pub fn render_criteria(names: &[String]) -> String {
    let mut xml = XmlEmitter::document();
    xml.open("criteria");
    xml.title_block("List of criteria");
    for (i, name) in names.iter().enumerate() {
        let id = format!("cr{i}");
        xml.empty("criterion", &[("id", id.as_str()), ("name", name.as_str())]);
    }
    xml.close("criteria");
    xml.finish()
}

/// Performance of every alternative on every criterion, in table order.
pub fn render_performance_table(table: &PerformanceTable) -> String {
    let mut xml = XmlEmitter::document();
    xml.open("performanceTable");
    xml.title_block("Performance table");
    for (i, alternative) in table.alternatives.iter().enumerate() {
        xml.open("alternativePerformances");
        xml.leaf("alternativeID", &format!("a{i}"));
        for (j, criterion) in table.criteria.iter().enumerate() {
            let raw = table.value(alternative, criterion).unwrap_or_default();
            xml.open("performance");
            xml.leaf("criterionID", &format!("cr{j}"));
            xml.open("value");
            xml.leaf(value_tag(raw), raw);
            xml.close("value");
            xml.close("performance");
        }
        xml.close("alternativePerformances");
    }
    xml.close("performanceTable");
    xml.finish()
}

/// One `alternativesComparisons` block per non-empty relation kind.
pub fn render_preferences(relations: &RelationSet) -> String {
    let mut xml = XmlEmitter::document();
    for kind in RelationKind::ALL {
        let pairs = relations.bucket(kind);
        if pairs.is_empty() {
            continue;
        }
        xml.open("alternativesComparisons");
        xml.leaf("comparisonType", kind.xml_token());
        xml.open("pairs");
        for pair in pairs {
            xml.open("pair");
            xml.open("initial");
            xml.leaf("alternativeID", pair.initial.as_str());
            xml.close("initial");
            xml.open("terminal");
            xml.leaf("alternativeID", pair.terminal.as_str());
            xml.close("terminal");
            xml.close("pair");
        }
        xml.close("pairs");
        xml.close("alternativesComparisons");
    }
    xml.finish()
}

/// 0 (larger is better) or 1 (smaller is better) per criterion.
pub fn render_criteria_directions(directions: &[Direction]) -> String {
    let mut xml = XmlEmitter::document();
    xml.open_with("criteriaValues", &[("mcdaConcept", "preferenceDirection")]);
    for (i, direction) in directions.iter().enumerate() {
        xml.open("criterionValue");
        xml.leaf("criterionID", &format!("cr{i}"));
        xml.open("value");
        xml.leaf("integer", &direction.code().to_string());
        xml.close("value");
        xml.close("criterionValue");
    }
    xml.close("criteriaValues");
    xml.finish()
}

/// Comparisons of utility differences; each side is an `alternativesSet`.
pub fn render_intensities(intensities: &IntensitySet) -> String {
    let mut xml = XmlEmitter::document();
    for kind in crate::domain::IntensityKind::ALL {
        let comparisons = intensities.bucket(kind);
        if comparisons.is_empty() {
            continue;
        }
        xml.open("alternativesComparisons");
        xml.leaf("comparisonType", kind.xml_token());
        xml.open("pairs");
        for cmp in comparisons {
            xml.open("pair");
            for (side, ids) in [("initial", &cmp.initial), ("terminal", &cmp.terminal)] {
                xml.open(side);
                xml.open("alternativesSet");
                for id in ids {
                    xml.open("element");
                    xml.leaf("alternativeID", id.as_str());
                    xml.close("element");
                }
                xml.close("alternativesSet");
                xml.close(side);
            }
            xml.close("pair");
        }
        xml.close("pairs");
        xml.close("alternativesComparisons");
    }
    xml.finish()
}

/// Inputs of one complete session export.
#[derive(Debug, Clone, Copy)]
pub struct SessionDocuments<'a> {
    pub table: &'a PerformanceTable,
    pub directions: &'a [Direction],
    pub preferences: &'a RelationSet,
    pub intensities: &'a IntensitySet,
}

/// Writes XMCDA documents into one project directory.
pub struct XmcdaWriter {
    dir: PathBuf,
}

impl XmcdaWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, file: &str, document: &str, entries: usize) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        std::fs::write(&path, document)?;
        obs::emit_document_written(file, &path, entries);
        Ok(path)
    }

    pub fn write_alternatives(&self, names: &[String]) -> Result<PathBuf> {
        self.write(ALTERNATIVES_FILE, &render_alternatives(names), names.len())
    }

    pub fn write_criteria(&self, names: &[String]) -> Result<PathBuf> {
        self.write(CRITERIA_FILE, &render_criteria(names), names.len())
    }

    pub fn write_performance_table(&self, table: &PerformanceTable) -> Result<PathBuf> {
        self.write(
            PERFORMANCE_TABLE_FILE,
            &render_performance_table(table),
            table.alternatives.len() * table.criteria.len(),
        )
    }

    pub fn write_preferences(&self, relations: &RelationSet) -> Result<PathBuf> {
        self.write(PREFERENCES_FILE, &render_preferences(relations), relations.len())
    }

    pub fn write_criteria_directions(&self, directions: &[Direction]) -> Result<PathBuf> {
        self.write(
            DIRECTIONS_FILE,
            &render_criteria_directions(directions),
            directions.len(),
        )
    }

    pub fn write_intensities(&self, intensities: &IntensitySet) -> Result<PathBuf> {
        self.write(
            INTENSITIES_FILE,
            &render_intensities(intensities),
            intensities.iter().count(),
        )
    }

    /// Validate the session, then write all six documents.
    pub fn write_session_documents(&self, docs: SessionDocuments<'_>) -> Result<Vec<PathBuf>> {
        validate_session(docs.table, docs.directions, docs.preferences, docs.intensities)?;
        debug!(dir = %self.dir.display(), "session validated, writing documents");
        Ok(vec![
            self.write_alternatives(&docs.table.alternatives)?,
            self.write_criteria(&docs.table.criteria)?,
            self.write_performance_table(docs.table)?,
            self.write_preferences(docs.preferences)?,
            self.write_criteria_directions(docs.directions)?,
            self.write_intensities(docs.intensities)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlternativeId, AlternativePair, IntensityComparison};
    use std::collections::BTreeMap;

    fn body(document: &str) -> Vec<&str> {
        let lines: Vec<&str> = document.lines().collect();
        assert_eq!(lines.first(), Some(&XMCDA_HEADER));
        assert_eq!(lines.last(), Some(&XMCDA_FOOTER));
        lines[1..lines.len() - 1].to_vec()
    }

    #[test]
    fn alternatives_get_ids_in_list_order() {
        let names = vec!["Audi".to_string(), "Fiat".to_string(), "Skoda".to_string()];
        let doc = render_alternatives(&names);
        assert_eq!(
            body(&doc),
            vec![
                "    <alternatives>",
                "        <alternative id=\"a0\" name=\"Audi\"/>",
                "        <alternative id=\"a1\" name=\"Fiat\"/>",
                "        <alternative id=\"a2\" name=\"Skoda\"/>",
                "    </alternatives>",
            ]
        );
    }

    #[test]
    fn criteria_have_title_block() {
        let doc = render_criteria(&["price".to_string(), "#doors".to_string()]);
        assert_eq!(
            body(&doc),
            vec![
                "    <criteria>",
                "        <description>",
                "            <title>List of criteria</title>",
                "        </description>",
                "        <criterion id=\"cr0\" name=\"price\"/>",
                "        <criterion id=\"cr1\" name=\"#doors\"/>",
                "    </criteria>",
            ]
        );
    }

    #[test]
    fn performance_tag_is_syntactic() {
        assert_eq!(value_tag("3.5"), "real");
        assert_eq!(value_tag("5"), "integer");

        let mut values = BTreeMap::new();
        values.insert(
            "Audi".to_string(),
            BTreeMap::from([
                ("price".to_string(), "3.5".to_string()),
                ("#doors".to_string(), "5".to_string()),
            ]),
        );
        let table = PerformanceTable {
            alternative_label: "car".into(),
            alternatives: vec!["Audi".into()],
            criteria: vec!["price".into(), "#doors".into()],
            values,
        };
        let doc = render_performance_table(&table);
        assert!(doc.contains("                    <real>3.5</real>\n"));
        assert!(doc.contains("                    <integer>5</integer>\n"));
        assert!(doc.contains("            <alternativeID>a0</alternativeID>\n"));
        assert!(doc.contains("                <criterionID>cr1</criterionID>\n"));
    }

    #[test]
    fn preferences_skip_empty_kinds() {
        let mut relations = RelationSet::default();
        relations.push(RelationKind::Weak, AlternativePair::from_indices(0, 1));
        let doc = render_preferences(&relations);
        assert_eq!(
            body(&doc),
            vec![
                "    <alternativesComparisons>",
                "        <comparisonType>weak</comparisonType>",
                "        <pairs>",
                "            <pair>",
                "                <initial>",
                "                    <alternativeID>a0</alternativeID>",
                "                </initial>",
                "                <terminal>",
                "                    <alternativeID>a1</alternativeID>",
                "                </terminal>",
                "            </pair>",
                "        </pairs>",
                "    </alternativesComparisons>",
            ]
        );
        assert!(!doc.contains("strong"));
    }

    #[test]
    fn empty_preferences_is_header_and_footer() {
        let doc = render_preferences(&RelationSet::default());
        assert_eq!(doc, format!("{XMCDA_HEADER}\n{XMCDA_FOOTER}\n"));
    }

    #[test]
    fn directions_are_integers() {
        let doc = render_criteria_directions(&[Direction::Minimize, Direction::Maximize]);
        assert!(doc.contains("    <criteriaValues mcdaConcept=\"preferenceDirection\">\n"));
        assert!(doc.contains("            <criterionID>cr1</criterionID>\n"));
        assert!(doc.contains("                <integer>1</integer>\n"));
        assert!(doc.contains("                <integer>0</integer>\n"));
    }

    #[test]
    fn intensities_nest_alternative_sets() {
        let intensities = IntensitySet {
            strict: vec![IntensityComparison {
                initial: vec![AlternativeId::from("a3"), AlternativeId::from("a4")],
                terminal: vec![AlternativeId::from("a7"), AlternativeId::from("a8")],
            }],
            ..Default::default()
        };
        let doc = render_intensities(&intensities);
        let lines = body(&doc);
        assert_eq!(lines[1], "        <comparisonType>strict</comparisonType>");
        assert!(lines.contains(&"                    <alternativesSet>"));
        assert!(lines.contains(&"                            <alternativeID>a8</alternativeID>"));
        assert_eq!(lines.last(), Some(&"    </alternativesComparisons>"));
    }

    #[test]
    fn names_are_escaped() {
        let doc = render_alternatives(&["Fish & \"Chips\"".to_string()]);
        assert!(doc.contains("name=\"Fish &amp; &quot;Chips&quot;\""));
    }

    #[test]
    fn invalid_ids_are_written_verbatim() {
        let mut relations = RelationSet::default();
        relations.push(RelationKind::Strong, AlternativePair::new("a99", "b1"));
        let doc = render_preferences(&relations);
        assert!(doc.contains("<alternativeID>a99</alternativeID>"));
        assert!(doc.contains("<alternativeID>b1</alternativeID>"));
    }
}
