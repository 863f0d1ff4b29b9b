//! Session validation run before any XMCDA document is written.
//!
//! The individual generators in [`crate::xmcda::writer`] write whatever they
//! are given. This pass catches the mistakes that would otherwise only surface
//! inside the workbench.

use crate::domain::{AlternativeId, Direction, IntensitySet, RelationSet, ValidationError};
use crate::table::PerformanceTable;

const SEPARATOR: char = ',';

/// Validate everything that goes into one export.
///
/// Checks, in order:
/// 1. No alternative or criterion name contains a comma.
/// 2. Every (alternative, criterion) cell has a non-empty value.
/// 3. There is exactly one direction per criterion.
/// 4. Every id in `preferences` and `intensities` is one of `a0..a(n-1)`.
/// 5. No intensity comparison has an empty side.
///
/// # Errors
///
/// The first failing check, as a [`ValidationError`].
pub fn validate_session(
    table: &PerformanceTable,
    directions: &[Direction],
    preferences: &RelationSet,
    intensities: &IntensitySet,
) -> Result<(), ValidationError> {
    validate_names(table)?;
    validate_cells(table)?;

    if directions.len() != table.criteria.len() {
        return Err(ValidationError::DirectionCountMismatch {
            expected: table.criteria.len(),
            found: directions.len(),
        });
    }

    let count = table.alternatives.len();
    validate_preferences(preferences, count)?;
    validate_intensities(intensities, count)
}

fn validate_names(table: &PerformanceTable) -> Result<(), ValidationError> {
    let names = std::iter::once(&table.alternative_label)
        .chain(&table.alternatives)
        .chain(&table.criteria);
    for name in names {
        if name.contains(SEPARATOR) {
            return Err(ValidationError::CommaInName(name.clone()));
        }
    }
    Ok(())
}

fn validate_cells(table: &PerformanceTable) -> Result<(), ValidationError> {
    for alternative in &table.alternatives {
        for criterion in &table.criteria {
            let present = table
                .value(alternative, criterion)
                .is_some_and(|v| !v.trim().is_empty());
            if !present {
                return Err(ValidationError::MissingPerformance {
                    alternative: alternative.clone(),
                    criterion: criterion.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_id(id: &AlternativeId, count: usize, context: &str) -> Result<(), ValidationError> {
    match id.index() {
        Some(i) if i < count => Ok(()),
        _ => Err(ValidationError::UnknownAlternative {
            context: context.to_string(),
            id: id.to_string(),
            count,
        }),
    }
}

pub fn validate_preferences(preferences: &RelationSet, count: usize) -> Result<(), ValidationError> {
    for (kind, pair) in preferences.iter() {
        let context = format!("{} preference", kind.xml_token());
        check_id(&pair.initial, count, &context)?;
        check_id(&pair.terminal, count, &context)?;
    }
    Ok(())
}

pub fn validate_intensities(intensities: &IntensitySet, count: usize) -> Result<(), ValidationError> {
    for (kind, cmp) in intensities.iter() {
        let context = format!("{} intensity", kind.xml_token());
        if cmp.initial.is_empty() || cmp.terminal.is_empty() {
            return Err(ValidationError::EmptyAlternativeSet { context });
        }
        for id in cmp.initial.iter().chain(&cmp.terminal) {
            check_id(id, count, &context)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlternativePair, IntensityComparison, RelationKind};
    use crate::preferences::parse_preference_text;
    use std::collections::BTreeMap;
    use std::path::Path;

    fn table() -> PerformanceTable {
        let mut values = BTreeMap::new();
        for (alt, price) in [("Audi", "21000.0"), ("Fiat", "9500.5"), ("Kia", "12000.0")] {
            let mut row = BTreeMap::new();
            row.insert("price".to_string(), price.to_string());
            row.insert("#doors".to_string(), "5".to_string());
            values.insert(alt.to_string(), row);
        }
        PerformanceTable {
            alternative_label: "car".to_string(),
            alternatives: vec!["Audi".into(), "Fiat".into(), "Kia".into()],
            criteria: vec!["price".into(), "#doors".into()],
            values,
        }
    }

    const DIRECTIONS: [Direction; 2] = [Direction::Minimize, Direction::Maximize];

    #[test]
    fn test_valid_session_passes() {
        let mut prefs = RelationSet::default();
        prefs.push(RelationKind::Strong, AlternativePair::from_indices(0, 2));
        let mut intensities = IntensitySet::default();
        intensities.strict.push(IntensityComparison {
            initial: vec![AlternativeId::from_index(0), AlternativeId::from_index(1)],
            terminal: vec![AlternativeId::from_index(1), AlternativeId::from_index(2)],
        });
        assert!(validate_session(&table(), &DIRECTIONS, &prefs, &intensities).is_ok());
    }

    #[test]
    fn test_comma_in_alternative_name_rejected() {
        let mut t = table();
        t.alternatives[1] = "Fiat 500, Naked".to_string();
        let err = validate_session(&t, &DIRECTIONS, &RelationSet::default(), &IntensitySet::default())
            .unwrap_err();
        assert!(matches!(err, ValidationError::CommaInName(name) if name == "Fiat 500, Naked"));
    }

    #[test]
    fn test_missing_cell_rejected() {
        let mut t = table();
        t.values.get_mut("Kia").unwrap().remove("#doors");
        let err = validate_session(&t, &DIRECTIONS, &RelationSet::default(), &IntensitySet::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingPerformance { ref alternative, ref criterion }
                if alternative == "Kia" && criterion == "#doors"
        ));
    }

    #[test]
    fn test_direction_count_mismatch_rejected() {
        let err = validate_session(
            &table(),
            &[Direction::Maximize],
            &RelationSet::default(),
            &IntensitySet::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::DirectionCountMismatch { expected: 2, found: 1 }
        ));
    }

    #[test]
    fn test_out_of_range_preference_rejected() {
        let mut prefs = RelationSet::default();
        prefs.push(RelationKind::Weak, AlternativePair::from_indices(0, 3));
        let err = validate_session(&table(), &DIRECTIONS, &prefs, &IntensitySet::default())
            .unwrap_err();
        match err {
            ValidationError::UnknownAlternative { context, id, count } => {
                assert_eq!(context, "weak preference");
                assert_eq!(id, "a3");
                assert_eq!(count, 3);
            }
            other => panic!("expected UnknownAlternative, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_id_rejected() {
        let mut prefs = RelationSet::default();
        prefs.push(RelationKind::Strong, AlternativePair::new("a0", "Audi"));
        assert!(validate_preferences(&prefs, 3).is_err());
    }

    #[test]
    fn test_zero_padded_preference_id_rejected() {
        let pairs = parse_preference_text("a01 > a2\n", Path::new("padded.pref")).unwrap();
        let mut prefs = RelationSet::default();
        for pair in pairs {
            prefs.push(RelationKind::Strong, pair);
        }
        let err = validate_session(&table(), &DIRECTIONS, &prefs, &IntensitySet::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownAlternative { ref id, .. } if id == "a01"
        ));
    }

    #[test]
    fn test_empty_intensity_side_rejected() {
        let mut intensities = IntensitySet::default();
        intensities.indifferent.push(IntensityComparison {
            initial: vec![AlternativeId::from_index(0)],
            terminal: Vec::new(),
        });
        let err = validate_intensities(&intensities, 3).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyAlternativeSet { .. }));
    }
}
