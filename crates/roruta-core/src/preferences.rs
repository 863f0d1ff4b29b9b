//! `.pref` files: user-declared strong relations, one per line.
//!
//! ```text
//! a2 > a4
//! a0 > a2
//! ```
//!
//! Ids are zero-based and used as-is: `a3` is the fourth alternative of the
//! session, written `a3` in every XMCDA document. Blank lines are ignored.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use tracing::{debug, info};

use crate::domain::{AlternativePair, Result, RorutaError};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 12345;

fn pref_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"a([0-9]+) > a([0-9]+)").expect("valid preference pattern"))
}

/// Read a `.pref` file into `[better, worse]` pairs, in file order.
pub fn define_strong_relations(path: &Path) -> Result<Vec<AlternativePair>> {
    let content = std::fs::read_to_string(path)?;
    let pairs = parse_preference_text(&content, path)?;
    info!(path = %path.display(), pairs = pairs.len(), "read strong relations");
    Ok(pairs)
}

/// Parse `.pref` content; `path` is only used for error reporting.
pub fn parse_preference_text(content: &str, path: &Path) -> Result<Vec<AlternativePair>> {
    let mut pairs = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let caps = pref_line()
            .captures(line)
            .ok_or_else(|| RorutaError::UnmatchedPreferenceLine {
                path: PathBuf::from(path),
                line: idx + 1,
                content: line.to_string(),
            })?;
        pairs.push(AlternativePair::new(
            format!("a{}", &caps[1]).as_str(),
            format!("a{}", &caps[2]).as_str(),
        ));
    }
    Ok(pairs)
}

/// Render pairs in `.pref` syntax.
pub fn render_preference_lines(pairs: &[AlternativePair]) -> String {
    let mut out = String::new();
    for pair in pairs {
        out.push_str(&format!("{} > {}\n", pair.initial, pair.terminal));
    }
    out
}

fn write_pref_file(out: &Path, pairs: &[AlternativePair]) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, render_preference_lines(pairs))?;
    Ok(())
}

fn check_order(order: &[usize]) -> Result<()> {
    let mut seen = HashSet::new();
    for &alt in order {
        if !seen.insert(alt) {
            return Err(RorutaError::InvalidOrder(format!(
                "alternative {alt} appears more than once"
            )));
        }
    }
    Ok(())
}

/// Write a uniform random sample of `size` distinct pairs from a total order.
///
/// `order` lists alternative indices from best to worst. Every sampled pair
/// is written as a strong relation from the better-ranked element to the
/// worse-ranked one, sorted by rank. The same seed yields the same file.
///
/// Only `n(n-1)/2` distinct pairs exist, so any larger `size` is rejected.
pub fn create_random_subsample_of_all_relations(
    order: &[usize],
    size: usize,
    out: &Path,
    seed: u64,
) -> Result<Vec<AlternativePair>> {
    check_order(order)?;
    let n = order.len();
    let max = n * n.saturating_sub(1) / 2;
    if size > max {
        return Err(RorutaError::SampleSizeOutOfBounds { size, max });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sample: BTreeSet<(usize, usize)> = BTreeSet::new();
    while sample.len() < size {
        let i = rng.gen_range(0..n);
        let mut j = rng.gen_range(0..n);
        while j == i {
            j = rng.gen_range(0..n);
        }
        sample.insert((i.min(j), i.max(j)));
    }

    let pairs: Vec<AlternativePair> = sample
        .into_iter()
        .map(|(better, worse)| AlternativePair::from_indices(order[better], order[worse]))
        .collect();
    write_pref_file(out, &pairs)?;
    debug!(path = %out.display(), size, seed, "wrote random relation sample");
    Ok(pairs)
}

/// Write the `n - 1` consecutive strong relations of a total order.
pub fn create_linear_relations(order: &[usize], out: &Path) -> Result<Vec<AlternativePair>> {
    check_order(order)?;
    let pairs: Vec<AlternativePair> = order
        .windows(2)
        .map(|w| AlternativePair::from_indices(w[0], w[1]))
        .collect();
    write_pref_file(out, &pairs)?;
    debug!(path = %out.display(), pairs = pairs.len(), "wrote linear relations");
    Ok(pairs)
}
