//! Presentation of workbench results.
//!
//! - [`matrix`]: declared vs discovered relations as a coloured adjacency matrix
//! - [`curves`]: marginal utility curves laid out on a grid
//! - [`evaluation`]: alternatives re-scored with the representative function

pub mod curves;
pub mod evaluation;
pub mod matrix;

pub use curves::{
    render_utility_grid_svg, utility_curves, write_utility_grid_svg, UtilityCurve, DEFAULT_GRID,
};
pub use evaluation::{
    evaluate_alternatives, render_evaluation_csv, write_evaluation_csv, AlternativeScore,
    EvalOrder,
};
pub use matrix::{
    render_matrix_svg, render_matrix_text, write_matrix_svg, CellClass, RelationMatrix,
};
