//! Structured observability hooks for session lifecycle events.
//!
//! This module provides:
//! - A session-scoped tracing span via the `SessionSpan` RAII guard
//! - Emission functions for the files a session reads and writes
//!
//! Events are emitted at `info!` level; set `RUST_LOG` to filter them and
//! pass `--json` to the CLI for JSON lines.

use std::path::Path;

use tracing::info;

/// RAII guard that enters a project-scoped span for the duration of a command.
///
/// # Example
///
/// ```ignore
/// let _span = SessionSpan::enter("rorUtaNecessaryAndPossibleRelations");
/// // every event below is tagged with project = "rorUta..."
/// ```
pub struct SessionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SessionSpan {
    pub fn enter(project: &str) -> Self {
        let span = tracing::info_span!("roruta.session", project = %project);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: an XMCDA document was written.
pub fn emit_document_written(document: &str, path: &Path, entries: usize) {
    info!(
        event = "document.written",
        document = %document,
        path = %path.display(),
        entries = entries,
    );
}

/// Emit event: relations were read from a declared or workbench file.
pub fn emit_relations_loaded(path: &Path, origin: &str, pairs: usize) {
    info!(event = "relations.loaded", path = %path.display(), origin = %origin, pairs = pairs);
}

/// Emit event: a performance table was created by prompting.
pub fn emit_table_created(path: &Path, alternatives: usize, criteria: usize) {
    info!(
        event = "table.created",
        path = %path.display(),
        alternatives = alternatives,
        criteria = criteria,
    );
}

/// Emit event: table creation skipped because the file exists.
pub fn emit_table_skipped(path: &Path) {
    info!(event = "table.skipped", path = %path.display());
}

/// Emit event: alternatives were scored with the representative function.
pub fn emit_evaluation_finished(alternatives: usize, best: Option<&str>) {
    info!(
        event = "evaluation.finished",
        alternatives = alternatives,
        best = best.unwrap_or("-"),
    );
}
