//! Re-scoring alternatives with the representative utility function.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    AlternativeId, CriterionId, NumberType, Result, RorutaError, UtilityFunction, ValidationError,
};
use crate::obs;
use crate::table::PerformanceTable;

pub const EVALUATION_HEADER: &str = "alternative,mostRepresentativeUtilityFunction(alternative)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalOrder {
    /// Best alternative first.
    #[default]
    UtilityDescending,
    UtilityAscending,
    Name,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeScore {
    pub alternative: String,
    pub utility: f64,
}

/// Sum, per alternative, the marginal utilities of its performances.
///
/// `selection` holds indices into the table's alternative list; `None`
/// scores them all. Values are re-typed by the criterion's inferred number
/// type and looked up by exact abscissa match.
///
/// # Errors
///
/// - `MissingCriterionFunction` when the function has no marginal `cr<j>`
///   for some criterion of the table.
/// - `MissingUtilitySample` when a performance has no matching abscissa.
/// - `InvalidValue` when a stored value does not parse as its type.
pub fn evaluate_alternatives(
    table: &PerformanceTable,
    function: &UtilityFunction,
    selection: Option<&[usize]>,
    order: EvalOrder,
) -> Result<Vec<AlternativeScore>> {
    let count = table.alternatives.len();
    let indices: Vec<usize> = match selection {
        Some(indices) => indices.to_vec(),
        None => (0..count).collect(),
    };

    let mut scores = Vec::with_capacity(indices.len());
    for index in indices {
        let alternative = table.alternatives.get(index).ok_or_else(|| {
            ValidationError::UnknownAlternative {
                context: "evaluation".to_string(),
                id: AlternativeId::from_index(index).to_string(),
                count,
            }
        })?;
        let utility = score(table, function, alternative)?;
        debug!(alternative = %alternative, utility, "scored alternative");
        scores.push(AlternativeScore {
            alternative: alternative.clone(),
            utility,
        });
    }

    let best = scores
        .iter()
        .max_by(|a, b| a.utility.total_cmp(&b.utility))
        .map(|s| s.alternative.clone());
    obs::emit_evaluation_finished(scores.len(), best.as_deref());

    match order {
        EvalOrder::UtilityDescending => scores.sort_by(|a, b| b.utility.total_cmp(&a.utility)),
        EvalOrder::UtilityAscending => scores.sort_by(|a, b| a.utility.total_cmp(&b.utility)),
        EvalOrder::Name => scores.sort_by(|a, b| a.alternative.cmp(&b.alternative)),
    }
    Ok(scores)
}

fn score(table: &PerformanceTable, function: &UtilityFunction, alternative: &str) -> Result<f64> {
    let mut total = 0.0;
    for (j, criterion) in table.criteria.iter().enumerate() {
        let id = CriterionId::from_index(j);
        let marginal = function
            .get(&id)
            .ok_or_else(|| RorutaError::MissingCriterionFunction(id.to_string()))?;
        let raw = table.value(alternative, criterion).ok_or_else(|| {
            ValidationError::MissingPerformance {
                alternative: alternative.to_string(),
                criterion: criterion.clone(),
            }
        })?;
        let value = NumberType::infer(criterion).parse(criterion, raw)?;
        total += marginal
            .lookup(&value)
            .ok_or_else(|| RorutaError::MissingUtilitySample {
                alternative: alternative.to_string(),
                criterion: id.to_string(),
                value: value.to_string(),
            })?;
    }
    Ok(total)
}

/// CSV report: header then `alternative,utility` with four decimals.
pub fn render_evaluation_csv(scores: &[AlternativeScore]) -> String {
    let mut out = String::new();
    out.push_str(EVALUATION_HEADER);
    out.push('\n');
    for s in scores {
        out.push_str(&format!("{},{:.4}\n", s.alternative, s.utility));
    }
    out
}

pub fn write_evaluation_csv(path: &Path, scores: &[AlternativeScore]) -> Result<()> {
    std::fs::write(path, render_evaluation_csv(scores))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Abscissa;
    use std::collections::BTreeMap;

    fn table(rows: &[(&str, &str, &str)]) -> PerformanceTable {
        let mut values = BTreeMap::new();
        for (alt, price, doors) in rows {
            let mut row = BTreeMap::new();
            row.insert("price".to_string(), price.to_string());
            row.insert("#doors".to_string(), doors.to_string());
            values.insert(alt.to_string(), row);
        }
        PerformanceTable {
            alternative_label: "car".to_string(),
            alternatives: rows.iter().map(|r| r.0.to_string()).collect(),
            criteria: vec!["price".into(), "#doors".into()],
            values,
        }
    }

    fn function() -> UtilityFunction {
        let mut f = UtilityFunction::default();
        let price = f.begin(CriterionId::from_index(0));
        price.insert(Abscissa::Real(10000.0), 0.5);
        price.insert(Abscissa::Real(20000.0), 0.125);
        let doors = f.begin(CriterionId::from_index(1));
        doors.insert(Abscissa::Integer(3), 0.0);
        doors.insert(Abscissa::Integer(5), 0.25);
        f
    }

    #[test]
    fn test_single_criterion_example() {
        let mut values = BTreeMap::new();
        values.insert(
            "x".to_string(),
            BTreeMap::from([("value".to_string(), "10.0".to_string())]),
        );
        let t = PerformanceTable {
            alternative_label: "alternative".into(),
            alternatives: vec!["x".into()],
            criteria: vec!["value".into()],
            values,
        };
        let mut f = UtilityFunction::default();
        let m = f.begin(CriterionId::from_index(0));
        m.insert(Abscissa::Real(10.0), 2.0);
        m.insert(Abscissa::Real(20.0), 5.0);

        let scores = evaluate_alternatives(&t, &f, None, EvalOrder::default()).unwrap();
        assert_eq!(
            render_evaluation_csv(&scores),
            format!("{EVALUATION_HEADER}\nx,2.0000\n")
        );
    }

    #[test]
    fn test_descending_by_default() {
        let t = table(&[("Audi", "20000.0", "5"), ("Fiat", "10000.0", "3"), ("Kia", "10000.0", "5")]);
        let scores = evaluate_alternatives(&t, &function(), None, EvalOrder::UtilityDescending)
            .unwrap();
        let names: Vec<&str> = scores.iter().map(|s| s.alternative.as_str()).collect();
        assert_eq!(names, vec!["Kia", "Fiat", "Audi"]);
        assert_eq!(scores[0].utility, 0.75);
    }

    #[test]
    fn test_ascending_and_name_orders() {
        let t = table(&[("Kia", "10000.0", "5"), ("Audi", "20000.0", "5")]);
        let asc = evaluate_alternatives(&t, &function(), None, EvalOrder::UtilityAscending).unwrap();
        assert_eq!(asc[0].alternative, "Audi");
        let by_name = evaluate_alternatives(&t, &function(), None, EvalOrder::Name).unwrap();
        assert_eq!(by_name[0].alternative, "Audi");
        assert_eq!(by_name[1].alternative, "Kia");
    }

    #[test]
    fn test_selection_limits_alternatives() {
        let t = table(&[("Audi", "20000.0", "5"), ("Fiat", "10000.0", "3"), ("Kia", "10000.0", "5")]);
        let scores =
            evaluate_alternatives(&t, &function(), Some(&[2, 0]), EvalOrder::Name).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].alternative, "Audi");

        let err = evaluate_alternatives(&t, &function(), Some(&[5]), EvalOrder::Name).unwrap_err();
        assert!(matches!(err, RorutaError::Validation(ValidationError::UnknownAlternative { .. })));
    }

    #[test]
    fn test_integer_performance_matches_real_abscissa() {
        let mut f = function();
        f.begin(CriterionId::from_index(1))
            .insert(Abscissa::Real(5.0), 0.3);
        let t = table(&[("Kia", "10000.0", "5")]);
        let scores = evaluate_alternatives(&t, &f, None, EvalOrder::Name).unwrap();
        assert!((scores[0].utility - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_missing_sample_is_an_error() {
        let t = table(&[("Audi", "15000.0", "5")]);
        let err = evaluate_alternatives(&t, &function(), None, EvalOrder::Name).unwrap_err();
        match err {
            RorutaError::MissingUtilitySample { alternative, criterion, value } => {
                assert_eq!(alternative, "Audi");
                assert_eq!(criterion, "cr0");
                assert_eq!(value, "15000.0");
            }
            other => panic!("expected MissingUtilitySample, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_marginal_is_an_error() {
        let mut f = UtilityFunction::default();
        f.begin(CriterionId::from_index(0))
            .insert(Abscissa::Real(10000.0), 0.5);
        let t = table(&[("Fiat", "10000.0", "3")]);
        let err = evaluate_alternatives(&t, &f, None, EvalOrder::Name).unwrap_err();
        assert!(matches!(err, RorutaError::MissingCriterionFunction(id) if id == "cr1"));
    }
}
