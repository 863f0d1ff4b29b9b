//! ROR-UTA Core Library
//!
//! Prepares XMCDA 2.0 input documents for the decision workbench and reads
//! back the relations and representative utility function it produces.

pub mod config;
pub mod domain;
pub mod obs;
pub mod path;
pub mod preferences;
pub mod presenter;
pub mod runs;
pub mod table;
pub mod telemetry;
pub mod validate;
pub mod xmcda;

pub use config::{PreferencesConfig, SessionConfig, WorkbenchLayout};

pub use domain::{
    Abscissa, AlternativeId, AlternativePair, Criterion, CriterionId, Direction,
    IntensityComparison, IntensityKind, IntensitySet, MarginalUtility, NumberType, RelationKind,
    RelationSet, Result, RorutaError, Sample, ScalarValue, UtilityFunction, ValidationError,
};

pub use preferences::{
    create_linear_relations, create_random_subsample_of_all_relations, define_strong_relations,
    DEFAULT_SEED,
};

pub use presenter::{
    evaluate_alternatives, utility_curves, AlternativeScore, CellClass, EvalOrder, RelationMatrix,
    UtilityCurve,
};

pub use obs::SessionSpan;

pub use runs::{latest_run, list_runs, RunEntry, RunPaths};

pub use table::{
    create_csv_performance_table, read_performance_csv, ConsolePrompt, PerformanceTable,
    TableCreation, ValuePrompt,
};

pub use telemetry::init_tracing;

pub use validate::validate_session;

pub use xmcda::{
    get_representative_function, read_declared_relations, read_discovered_relations,
    read_relations, RelationOrigin, Relations, SessionDocuments, XmcdaWriter,
};

/// Crate version, shown by `roruta --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
