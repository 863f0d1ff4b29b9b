//! Workbench run directories.
//!
//! Every execution of a workflow leaves a folder named after its start time,
//! `<year>-<month>-<day>T<hour>_<minute>_<second>.<millis>+<zone>`, next to a
//! `current` entry. Names sort chronologically, so the latest run is the
//! lexicographic maximum.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::config::WorkbenchLayout;
use crate::domain::{Result, RorutaError};

const EXCLUDED_MARKER: &str = "current";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H_%M_%S";
const TIMESTAMP_LEN: usize = 19;

/// One run directory of a workflow folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEntry {
    pub name: String,
    /// Start time decoded from the name, when it follows the workbench format.
    pub started_at: Option<NaiveDateTime>,
}

impl RunEntry {
    fn from_name(name: String) -> Self {
        let started_at = name
            .get(..TIMESTAMP_LEN)
            .and_then(|prefix| NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).ok());
        Self { name, started_at }
    }
}

/// Run directories of `folder`, oldest first. Entries whose name contains
/// `current` are skipped, as are plain files.
pub fn list_runs(folder: &Path) -> Result<Vec<RunEntry>> {
    let mut runs = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(EXCLUDED_MARKER) {
            continue;
        }
        runs.push(RunEntry::from_name(name));
    }
    runs.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(folder = %folder.display(), runs = runs.len(), "listed workbench runs");
    Ok(runs)
}

/// Name of the most recent run in `folder`.
pub fn latest_run(folder: &Path) -> Result<String> {
    list_runs(folder)?
        .pop()
        .map(|run| run.name)
        .ok_or_else(|| RorutaError::NoRuns(PathBuf::from(folder)))
}

/// Files of one run, resolved from the workbench layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunPaths {
    pub dir: PathBuf,
    pub preferences_echo: PathBuf,
    pub necessary_relations: PathBuf,
    pub possible_relations: PathBuf,
    pub representative_function: PathBuf,
}

impl RunPaths {
    pub fn new(run_dir: impl Into<PathBuf>, layout: &WorkbenchLayout) -> Self {
        let dir = run_dir.into();
        let relations = dir.join(&layout.relations_folder);
        Self {
            preferences_echo: dir.join(&layout.preferences_echo),
            necessary_relations: relations.join(&layout.necessary_relations),
            possible_relations: relations.join(&layout.possible_relations),
            representative_function: dir
                .join(&layout.function_folder)
                .join(&layout.representative_function),
            dir,
        }
    }

    /// Resolve `run` inside `workflow_dir`, or the latest run when `None`.
    pub fn resolve(workflow_dir: &Path, run: Option<&str>, layout: &WorkbenchLayout) -> Result<Self> {
        let name = match run {
            Some(name) => name.to_string(),
            None => latest_run(workflow_dir)?,
        };
        debug!(run = %name, "resolved workbench run");
        Ok(Self::new(workflow_dir.join(name), layout))
    }

    /// Necessary relations when `possible` is false, possible ones otherwise.
    pub fn relations(&self, possible: bool) -> &Path {
        if possible {
            &self.possible_relations
        } else {
            &self.necessary_relations
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn workflow() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "2019-03-01T09_15_00.123+0100",
            "2019-11-20T18_02_44.007+0100",
            "2019-04-12T10_00_00.000+0200",
            "current",
            "current-copy",
        ] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("zz-notes.txt"), "not a run").unwrap();
        dir
    }

    #[test]
    fn test_latest_run_ignores_current_and_files() {
        let dir = workflow();
        assert_eq!(
            latest_run(dir.path()).unwrap(),
            "2019-11-20T18_02_44.007+0100"
        );
    }

    #[test]
    fn test_list_runs_sorted_with_timestamps() {
        let dir = workflow();
        let runs = list_runs(dir.path()).unwrap();
        let names: Vec<&str> = runs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "2019-03-01T09_15_00.123+0100",
                "2019-04-12T10_00_00.000+0200",
                "2019-11-20T18_02_44.007+0100",
            ]
        );
        let started = runs[2].started_at.unwrap();
        assert_eq!((started.month(), started.day()), (11, 20));
        assert_eq!((started.hour(), started.minute(), started.second()), (18, 2, 44));
    }

    #[test]
    fn test_unrecognised_name_has_no_timestamp() {
        assert_eq!(RunEntry::from_name("manual".into()).started_at, None);
    }

    #[test]
    fn test_empty_workflow_has_no_runs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("current")).unwrap();
        assert!(matches!(latest_run(dir.path()), Err(RorutaError::NoRuns(_))));
    }

    #[test]
    fn test_run_paths_follow_layout() {
        let paths = RunPaths::new("/w/run1", &WorkbenchLayout::default());
        assert_eq!(paths.preferences_echo, Path::new("/w/run1/preferences.xml"));
        assert_eq!(
            paths.relations(false),
            Path::new("/w/run1/RORUTA-NecessaryAndPossiblePreferenceRelations-1/necessary-relations.xml")
        );
        assert_eq!(
            paths.relations(true),
            Path::new("/w/run1/RORUTA-NecessaryAndPossiblePreferenceRelations-1/possible-relations.xml")
        );
        assert_eq!(
            paths.representative_function,
            Path::new("/w/run1/RORUTA-RepresentativeValueFunction-1/representative-value-function.xml")
        );
    }

    #[test]
    fn test_resolve_picks_latest_when_unnamed() {
        let dir = workflow();
        let paths = RunPaths::resolve(dir.path(), None, &WorkbenchLayout::default()).unwrap();
        assert_eq!(paths.dir, dir.path().join("2019-11-20T18_02_44.007+0100"));
        let named =
            RunPaths::resolve(dir.path(), Some("manual"), &WorkbenchLayout::default()).unwrap();
        assert_eq!(named.dir, dir.path().join("manual"));
    }
}
