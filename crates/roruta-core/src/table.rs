//! Performance table: alternatives scored against criteria.
//!
//! The CSV form is the only persistent artefact of a session:
//!
//! ```text
//! <alternativeLabel>,<crit1>,...,<critM>
//! <alternative1>,<value11>,...,<value1M>
//! ```
//!
//! No quoting is supported, so names must not contain commas. Values are kept
//! as text; callers re-type them with the criterion's [`NumberType`] when they
//! need numbers.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Criterion, NumberType, Result, RorutaError, ScalarValue};
use crate::obs;

const SEPARATOR: char = ',';

/// Source of the values typed in when a table is built interactively.
pub trait ValuePrompt {
    /// Called once before the criteria of `alternative` are asked for.
    fn begin_alternative(&mut self, alternative: &str) -> Result<()>;

    /// Return the raw text entered for `criterion`.
    fn ask(&mut self, criterion: &str) -> Result<String>;
}

/// Console prompt reading one line per value.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ValuePrompt for ConsolePrompt<R, W> {
    fn begin_alternative(&mut self, alternative: &str) -> Result<()> {
        writeln!(self.output, "Collecting data for {alternative}")?;
        Ok(())
    }

    fn ask(&mut self, criterion: &str) -> Result<String> {
        write!(self.output, "Enter {criterion}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("input closed while asking for {criterion}"),
            )
            .into());
        }
        Ok(line.trim().to_string())
    }
}

/// Outcome of [`create_csv_performance_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCreation {
    Created,
    AlreadyPresent,
}

/// In-memory performance table with raw text values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceTable {
    pub alternative_label: String,
    pub alternatives: Vec<String>,
    pub criteria: Vec<String>,
    pub values: BTreeMap<String, BTreeMap<String, String>>,
}

impl PerformanceTable {
    pub fn value(&self, alternative: &str, criterion: &str) -> Option<&str> {
        self.values
            .get(alternative)
            .and_then(|row| row.get(criterion))
            .map(String::as_str)
    }

    /// Value re-typed by the domain inferred from the criterion name.
    pub fn typed_value(&self, alternative: &str, criterion: &str) -> Option<Result<ScalarValue>> {
        self.value(alternative, criterion)
            .map(|raw| NumberType::infer(criterion).parse(criterion, raw))
    }

    /// Render the CSV text, alternatives and criteria in table order.
    pub fn to_csv(&self) -> String {
        let sep = SEPARATOR.to_string();
        let mut out = String::new();
        out.push_str(&self.alternative_label);
        for criterion in &self.criteria {
            out.push(SEPARATOR);
            out.push_str(criterion);
        }
        out.push('\n');
        for alternative in &self.alternatives {
            let mut line = vec![alternative.as_str()];
            for criterion in &self.criteria {
                line.push(self.value(alternative, criterion).unwrap_or_default());
            }
            out.push_str(&line.join(&sep));
            out.push('\n');
        }
        out
    }
}

/// Build the CSV table by prompting, unless `path` already exists.
///
/// An existing file is never touched. Otherwise every alternative is asked
/// for one value per criterion, each converted to the criterion's type before
/// being written.
pub fn create_csv_performance_table(
    path: &Path,
    alternative_label: &str,
    alternatives: &[String],
    criteria: &[Criterion],
    prompt: &mut dyn ValuePrompt,
) -> Result<TableCreation> {
    if path.is_file() {
        info!(path = %path.display(), "performance table already exists, nothing to do");
        obs::emit_table_skipped(path);
        return Ok(TableCreation::AlreadyPresent);
    }

    let mut table = PerformanceTable {
        alternative_label: alternative_label.to_string(),
        alternatives: alternatives.to_vec(),
        criteria: criteria.iter().map(|c| c.name.clone()).collect(),
        values: BTreeMap::new(),
    };

    for alternative in alternatives {
        prompt.begin_alternative(alternative)?;
        let mut row = BTreeMap::new();
        for criterion in criteria {
            let raw = prompt.ask(&criterion.name)?;
            let value = criterion.number_type.parse(&criterion.name, &raw)?;
            debug!(alternative = %alternative, criterion = %criterion.name, %value, "value entered");
            row.insert(criterion.name.clone(), value.to_string());
        }
        table.values.insert(alternative.clone(), row);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, table.to_csv())?;
    obs::emit_table_created(path, alternatives.len(), criteria.len());
    Ok(TableCreation::Created)
}

/// Read the CSV table. The header fixes the canonical criterion order.
pub fn read_performance_csv(path: &Path) -> Result<PerformanceTable> {
    let content = std::fs::read_to_string(path)?;
    parse_performance_csv(&content, path)
}

fn parse_performance_csv(content: &str, path: &Path) -> Result<PerformanceTable> {
    let mut lines = content.lines().enumerate();
    let header = lines
        .by_ref()
        .find(|(_, line)| !line.trim().is_empty())
        .map(|(_, line)| line.trim())
        .ok_or_else(|| RorutaError::MissingHeader(PathBuf::from(path)))?;

    let mut header_cells = header.split(SEPARATOR);
    let alternative_label = header_cells.next().unwrap_or_default().to_string();
    let criteria: Vec<String> = header_cells.map(str::to_string).collect();

    let mut table = PerformanceTable {
        alternative_label,
        alternatives: Vec::new(),
        criteria,
        values: BTreeMap::new(),
    };

    for (idx, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(SEPARATOR).collect();
        if cells.len() != table.criteria.len() + 1 {
            return Err(RorutaError::MalformedRow {
                path: PathBuf::from(path),
                line: idx + 1,
                expected: table.criteria.len() + 1,
                found: cells.len(),
            });
        }
        let alternative = cells[0].to_string();
        let row = table
            .criteria
            .iter()
            .zip(&cells[1..])
            .map(|(c, v)| (c.clone(), v.to_string()))
            .collect();
        table.alternatives.push(alternative.clone());
        table.values.insert(alternative, row);
    }

    debug!(
        path = %path.display(),
        alternatives = table.alternatives.len(),
        criteria = table.criteria.len(),
        "read performance table"
    );
    Ok(table)
}
