//! Adjacency matrix of declared and discovered relations.
//!
//! Cell `(row, col)` describes the statement `a<row> R a<col>`. Declared
//! statements take precedence over discovered ones, so a pair the user
//! stated is never shown as a workbench discovery.

use std::path::Path;

use serde::Serialize;

use crate::domain::{AlternativeId, AlternativePair, RelationSet, Result};

pub const CANVAS_SIZE: usize = 700;
pub const LABEL_OFFSET: usize = 50;
const LABEL_POSITION: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    /// Stated by the user, in any bucket.
    Declared,
    /// Found by the workbench and not declared.
    Discovered,
    Unrelated,
}

impl CellClass {
    pub fn color(self) -> &'static str {
        match self {
            CellClass::Declared => "red",
            CellClass::Discovered => "green",
            CellClass::Unrelated => "black",
        }
    }

    fn symbol(self) -> char {
        match self {
            CellClass::Declared => 'R',
            CellClass::Discovered => 'G',
            CellClass::Unrelated => '.',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationMatrix {
    /// Row-major; `cells[i][j]` classifies `a<i> R a<j>`.
    pub cells: Vec<Vec<CellClass>>,
}

impl RelationMatrix {
    pub fn build(n: usize, declared: &RelationSet, discovered: &[AlternativePair]) -> Self {
        let cells = (0..n)
            .map(|row| {
                (0..n)
                    .map(|col| {
                        let pair = AlternativePair::from_indices(row, col);
                        if declared.contains(&pair) {
                            CellClass::Declared
                        } else if discovered.contains(&pair) {
                            CellClass::Discovered
                        } else {
                            CellClass::Unrelated
                        }
                    })
                    .collect()
            })
            .collect();
        Self { cells }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<CellClass> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn count(&self, class: CellClass) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == class)
            .count()
    }
}

/// Render the matrix as a square SVG canvas with `a<i>` labels on both axes.
pub fn render_matrix_svg(matrix: &RelationMatrix, title: &str) -> String {
    let n = matrix.size();
    let unit = if n == 0 {
        0
    } else {
        (CANVAS_SIZE - LABEL_OFFSET) / n
    };

    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CANVAS_SIZE}\" height=\"{CANVAS_SIZE}\">\n"
    ));
    out.push_str(&format!("  <title>{title}</title>\n"));
    out.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{CANVAS_SIZE}\" height=\"{CANVAS_SIZE}\" fill=\"black\"/>\n"
    ));

    for i in 0..n {
        let label = AlternativeId::from_index(i);
        let center = LABEL_OFFSET + unit * i + unit / 2;
        out.push_str(&format!(
            "  <text x=\"{center}\" y=\"{LABEL_POSITION}\" fill=\"white\" text-anchor=\"middle\">{label}</text>\n"
        ));
        out.push_str(&format!(
            "  <text x=\"{LABEL_POSITION}\" y=\"{center}\" fill=\"white\" text-anchor=\"middle\" dominant-baseline=\"middle\">{label}</text>\n"
        ));
    }

    for (row, cells) in matrix.cells.iter().enumerate() {
        for (col, class) in cells.iter().enumerate() {
            let x = LABEL_OFFSET + unit * col;
            let y = LABEL_OFFSET + unit * row;
            out.push_str(&format!(
                "  <rect x=\"{x}\" y=\"{y}\" width=\"{unit}\" height=\"{unit}\" fill=\"{}\" stroke=\"black\"/>\n",
                class.color()
            ));
        }
    }
    out.push_str("</svg>\n");
    out
}

/// Write the SVG rendering.
pub fn write_matrix_svg(path: &Path, matrix: &RelationMatrix, title: &str) -> Result<()> {
    std::fs::write(path, render_matrix_svg(matrix, title))?;
    Ok(())
}

/// Plain-text grid: `R` declared, `G` discovered, `.` unrelated.
pub fn render_matrix_text(matrix: &RelationMatrix) -> String {
    let n = matrix.size();
    let labels: Vec<String> = (0..n).map(|i| AlternativeId::from_index(i).to_string()).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0) + 1;

    let mut out = format!("{:width$}", "");
    for label in &labels {
        out.push_str(&format!("{label:>width$}"));
    }
    out.push('\n');
    for (label, cells) in labels.iter().zip(&matrix.cells) {
        out.push_str(&format!("{label:width$}"));
        for class in cells {
            out.push_str(&format!("{:>width$}", class.symbol()));
        }
        out.push('\n');
    }
    out
}
