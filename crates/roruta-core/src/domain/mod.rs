//! Domain models for ROR-UTA sessions.
//!
//! Canonical definitions for the entities exchanged with the decision workbench:
//! - `AlternativeId` / `CriterionId`: positional identifiers (`a<i>`, `cr<i>`)
//! - `Criterion`: name, inferred number type and preference direction
//! - `RelationSet` / `IntensitySet`: declared and discovered preference statements
//! - `UtilityFunction`: the recovered piecewise-linear marginal utilities

pub mod error;
pub mod ids;
pub mod relation;
pub mod utility;
pub mod value;

pub use error::{Result, RorutaError, ValidationError};
pub use ids::{AlternativeId, CriterionId};
pub use relation::{
    AlternativePair, IntensityComparison, IntensityKind, IntensitySet, RelationKind, RelationSet,
};
pub use utility::{Abscissa, MarginalUtility, Sample, UtilityFunction};
pub use value::{Criterion, Direction, NumberType, ScalarValue};
