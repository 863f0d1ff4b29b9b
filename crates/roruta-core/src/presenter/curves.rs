//! Marginal utility curves and their grid rendering.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::value::format_real;
use crate::domain::{CriterionId, MarginalUtility, Result, RorutaError, UtilityFunction};

/// Minimum horizontal gap before the next tick gets its own label.
pub const TICK_LABEL_GAP: f64 = 4.0;
pub const DEFAULT_GRID: (usize, usize) = (3, 3);

const PANEL_WIDTH: f64 = 320.0;
const PANEL_HEIGHT: f64 = 260.0;
const PANEL_MARGIN: f64 = 45.0;
const EMPTY_LABEL: &str = "EMPTY";

/// One plotted marginal, points sorted by ascending utility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityCurve {
    pub criterion: CriterionId,
    pub title: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// One label per point; empty where the tick stays unlabelled.
    pub tick_labels: Vec<String>,
    /// Abscissae were not all numeric and `xs` holds point positions.
    pub positional: bool,
}

/// Build one curve per marginal, in document order.
///
/// Titles come from `criterion_names` by criterion index, falling back to
/// the criterion id.
pub fn utility_curves(function: &UtilityFunction, criterion_names: &[String]) -> Vec<UtilityCurve> {
    function
        .marginals
        .iter()
        .map(|marginal| {
            let title = marginal
                .criterion
                .index()
                .and_then(|i| criterion_names.get(i))
                .cloned()
                .unwrap_or_else(|| marginal.criterion.to_string());
            curve(marginal, title)
        })
        .collect()
}

fn curve(marginal: &MarginalUtility, title: String) -> UtilityCurve {
    let mut points: Vec<_> = marginal.samples.iter().collect();
    points.sort_by(|a, b| a.ordinate.total_cmp(&b.ordinate));
    let ys: Vec<f64> = points.iter().map(|s| s.ordinate).collect();

    let numeric: Option<Vec<f64>> = points.iter().map(|s| s.abscissa.as_f64()).collect();
    let (xs, tick_labels, positional) = match numeric {
        Some(xs) => {
            let labels = sparse_tick_labels(&xs);
            (xs, labels, false)
        }
        None => {
            warn!(
                criterion = %marginal.criterion,
                "non-numeric abscissa, plotting by position"
            );
            let xs: Vec<f64> = (0..points.len()).map(|i| i as f64).collect();
            let labels: Vec<String> = points.iter().map(|s| s.abscissa.to_string()).collect();
            (xs, labels, true)
        }
    };

    UtilityCurve {
        criterion: marginal.criterion.clone(),
        title,
        xs,
        ys,
        tick_labels,
        positional,
    }
}

/// Label a tick only when the next one is more than [`TICK_LABEL_GAP`] away.
/// The last tick is always labelled.
pub fn sparse_tick_labels(xs: &[f64]) -> Vec<String> {
    xs.iter()
        .enumerate()
        .map(|(i, &x)| {
            let spaced = xs
                .get(i + 1)
                .map_or(true, |next| (next - x).abs() > TICK_LABEL_GAP);
            if spaced {
                format_real(x)
            } else {
                String::new()
            }
        })
        .collect()
}

fn span(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max > min {
        (min, max - min)
    } else {
        (min - 0.5, 1.0)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_panel(out: &mut String, curve: &UtilityCurve, left: f64, top: f64) {
    let plot_w = PANEL_WIDTH - 2.0 * PANEL_MARGIN;
    let plot_h = PANEL_HEIGHT - 2.0 * PANEL_MARGIN;
    let (x0, xw) = span(&curve.xs);
    let (y0, yh) = span(&curve.ys);
    let px = |x: f64| left + PANEL_MARGIN + (x - x0) / xw * plot_w;
    let py = |y: f64| top + PANEL_MARGIN + plot_h - (y - y0) / yh * plot_h;

    out.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
        left + PANEL_WIDTH / 2.0,
        top + PANEL_MARGIN / 2.0,
        escape(&curve.title)
    ));
    out.push_str(&format!(
        "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{plot_w:.1}\" height=\"{plot_h:.1}\" fill=\"none\" stroke=\"gray\"/>\n",
        left + PANEL_MARGIN,
        top + PANEL_MARGIN
    ));

    let points: Vec<String> = curve
        .xs
        .iter()
        .zip(&curve.ys)
        .map(|(&x, &y)| format!("{:.1},{:.1}", px(x), py(y)))
        .collect();
    out.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"steelblue\"/>\n",
        points.join(" ")
    ));
    for (&x, &y) in curve.xs.iter().zip(&curve.ys) {
        out.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"red\"/>\n",
            px(x),
            py(y)
        ));
    }

    let baseline = top + PANEL_MARGIN + plot_h + 4.0;
    for (&x, label) in curve.xs.iter().zip(&curve.tick_labels) {
        if label.is_empty() {
            continue;
        }
        let tx = px(x);
        out.push_str(&format!(
            "  <text x=\"{tx:.1}\" y=\"{baseline:.1}\" font-size=\"9\" transform=\"rotate(90 {tx:.1} {baseline:.1})\">{}</text>\n",
            escape(label)
        ));
    }
}

/// Lay curves out on a `rows` × `cols` grid, padding spare cells with an
/// `EMPTY` placeholder.
pub fn render_utility_grid_svg(curves: &[UtilityCurve], rows: usize, cols: usize) -> Result<String> {
    let cells = rows * cols;
    if curves.len() > cells {
        return Err(RorutaError::GridTooSmall {
            rows,
            cols,
            criteria: curves.len(),
        });
    }

    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\">\n",
        PANEL_WIDTH * cols as f64,
        PANEL_HEIGHT * rows as f64
    ));
    for cell in 0..cells {
        let left = PANEL_WIDTH * (cell % cols) as f64;
        let top = PANEL_HEIGHT * (cell / cols) as f64;
        match curves.get(cell) {
            Some(curve) => render_panel(&mut out, curve, left, top),
            None => out.push_str(&format!(
                "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{EMPTY_LABEL}</text>\n",
                left + PANEL_WIDTH / 2.0,
                top + PANEL_HEIGHT / 2.0
            )),
        }
    }
    out.push_str("</svg>\n");
    debug!(panels = curves.len(), rows, cols, "rendered utility grid");
    Ok(out)
}

pub fn write_utility_grid_svg(
    path: &Path,
    curves: &[UtilityCurve],
    rows: usize,
    cols: usize,
) -> Result<()> {
    let svg = render_utility_grid_svg(curves, rows, cols)?;
    std::fs::write(path, svg)?;
    Ok(())
}
