//! Session configuration.
//!
//! One [`SessionConfig`] describes a decision problem and where its files
//! live. It is loaded once from TOML and passed explicitly to every operation.
//!
//! ```toml
//! input_folder = "./carsExample/myInputs"
//! workflow_folder = "./carsExample/divizOutputs/rorUtaNecessaryAndPossibleRelations"
//! projects_folder = "myWorkflows"
//! project_name = "rorUtaNecessaryAndPossibleRelations"
//! alternative_label = "car"
//! alternatives = ["Fiat 500 1.2 Naked 2008 - 2009", "Renault Twizy Color 2012 - 2016"]
//! criteria = ["price", "#doors"]
//! directions = [1, 0]
//!
//! [preferences]
//! strong_file = "full.pref"
//! weak = [["a0", "a1"]]
//!
//! [intensities]
//! strict = [[["a0", "a1"], ["a1", "a0"]]]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Criterion, Direction, IntensitySet, RelationSet, Result, RorutaError};
use crate::path::to_slash;

fn default_performance_table() -> String {
    "performances.csv".to_string()
}

fn default_alternative_label() -> String {
    "alternative".to_string()
}

fn default_true() -> bool {
    true
}

/// User-declared pairwise preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// `.pref` file with strong relations, relative to `<input_folder>/preferences`.
    #[serde(default)]
    pub strong_file: Option<String>,

    #[serde(flatten)]
    pub inline: RelationSet,
}

/// File layout of one workbench run directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchLayout {
    pub preferences_echo: String,
    pub relations_folder: String,
    pub necessary_relations: String,
    pub possible_relations: String,
    pub function_folder: String,
    pub representative_function: String,
}

impl Default for WorkbenchLayout {
    fn default() -> Self {
        Self {
            preferences_echo: "preferences.xml".to_string(),
            relations_folder: "RORUTA-NecessaryAndPossiblePreferenceRelations-1".to_string(),
            necessary_relations: "necessary-relations.xml".to_string(),
            possible_relations: "possible-relations.xml".to_string(),
            function_folder: "RORUTA-RepresentativeValueFunction-1".to_string(),
            representative_function: "representative-value-function.xml".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub input_folder: String,
    pub workflow_folder: String,
    pub projects_folder: String,
    pub project_name: String,

    #[serde(default = "default_performance_table")]
    pub performance_table: String,

    #[serde(default = "default_alternative_label")]
    pub alternative_label: String,

    pub alternatives: Vec<String>,

    #[serde(default = "default_true")]
    pub sort_alternatives: bool,

    pub criteria: Vec<String>,

    #[serde(default)]
    pub directions: Vec<Direction>,

    #[serde(default)]
    pub preferences: PreferencesConfig,

    #[serde(default)]
    pub intensities: IntensitySet,

    #[serde(default)]
    pub workbench: WorkbenchLayout,
}

impl SessionConfig {
    /// Load and normalise a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RorutaError::Config(format!("cannot read {path:?}: {e}")))?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            path = %path.display(),
            alternatives = config.alternatives.len(),
            criteria = config.criteria.len(),
            "loaded session config"
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: SessionConfig = toml::from_str(content)?;
        config.input_folder = to_slash(&config.input_folder);
        config.workflow_folder = to_slash(&config.workflow_folder);
        Ok(config)
    }

    /// Alternatives in session order (sorted unless disabled).
    pub fn session_alternatives(&self) -> Vec<String> {
        let mut alternatives = self.alternatives.clone();
        if self.sort_alternatives {
            alternatives.sort();
        }
        alternatives
    }

    pub fn session_criteria(&self) -> Vec<Criterion> {
        Criterion::from_names(&self.criteria)
    }

    pub fn performance_table_path(&self) -> PathBuf {
        Path::new(&self.input_folder).join(&self.performance_table)
    }

    /// Folder the XMCDA documents are written to.
    pub fn project_dir(&self) -> PathBuf {
        Path::new(&self.input_folder)
            .join(&self.projects_folder)
            .join(&self.project_name)
    }

    pub fn preferences_dir(&self) -> PathBuf {
        Path::new(&self.input_folder).join("preferences")
    }

    /// `<input_folder>/preferences/<name>.pref`
    pub fn pref_file(&self, name: &str) -> PathBuf {
        let file = if name.ends_with(".pref") {
            name.to_string()
        } else {
            format!("{name}.pref")
        };
        self.preferences_dir().join(file)
    }

    pub fn workflow_dir(&self) -> PathBuf {
        PathBuf::from(&self.workflow_folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AlternativePair;

    const SAMPLE: &str = r##"
input_folder = 'C:\Users\me\inputs\'
workflow_folder = "./outputs/roruta/"
projects_folder = "myWorkflows"
project_name = "rorUta"
alternative_label = "car"
alternatives = ["Skoda", "Audi", "Mazda"]
criteria = ["price", "#doors"]
directions = [1, 0]

[preferences]
strong_file = "linear"
weak = [["a0", "a1"]]

[intensities]
strict = [[["a0", "a1"], ["a1", "a2"]]]
"##;

    #[test]
    fn parses_and_normalises_paths() {
        let config = SessionConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.input_folder, "C:/Users/me/inputs");
        assert_eq!(config.workflow_folder, "./outputs/roruta");
        assert_eq!(config.performance_table, "performances.csv");
        assert_eq!(config.criteria, vec!["price", "#doors"]);
        assert_eq!(
            config.directions,
            vec![Direction::Minimize, Direction::Maximize]
        );
    }

    #[test]
    fn alternatives_are_sorted_by_default() {
        let config = SessionConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.session_alternatives(), vec!["Audi", "Mazda", "Skoda"]);
    }

    #[test]
    fn inline_preferences_and_intensities() {
        let config = SessionConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.preferences.strong_file.as_deref(), Some("linear"));
        assert_eq!(
            config.preferences.inline.weak,
            vec![AlternativePair::from_indices(0, 1)]
        );
        assert!(config.preferences.inline.strong.is_empty());
        assert_eq!(config.intensities.strict.len(), 1);
        assert_eq!(config.workbench, WorkbenchLayout::default());
    }

    #[test]
    fn derived_paths() {
        let config = SessionConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(
            config.project_dir(),
            Path::new("C:/Users/me/inputs/myWorkflows/rorUta")
        );
        assert_eq!(
            config.pref_file("linear"),
            Path::new("C:/Users/me/inputs/preferences/linear.pref")
        );
    }

    #[test]
    fn invalid_direction_is_rejected() {
        let broken = SAMPLE.replace("directions = [1, 0]", "directions = [2, 0]");
        assert!(matches!(
            SessionConfig::from_toml_str(&broken),
            Err(RorutaError::ConfigParse(_))
        ));
    }
}
