//! Value validation shared by every write path and by the specialist query path.
//!
//! Every function is pure: it either returns the normalized value or a
//! [`CoreError::Validation`] naming the offending subject. Callers never write
//! anything before these checks pass.

use crate::entities::{Characteristic, CharacteristicDomain, Narrowing, QueryValue};
use crate::errors::CoreError;

/// Trim a name and reject it if blank.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the trimmed name is empty.
pub fn validate_name(entity_type: &str, name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(entity_type, "name must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// Check a global numeric range: both ends finite and `min <= max`.
///
/// # Errors
///
/// Returns `CoreError::Validation` if either bound is NaN/infinite or `min > max`.
pub fn validate_global_range(subject: &str, min: f64, max: f64) -> Result<(), CoreError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(CoreError::validation(
            subject,
            format!("range bounds must be finite numbers, got [{min}, {max}]"),
        ));
    }
    if min > max {
        return Err(CoreError::validation(
            subject,
            format!("minimum {min} is greater than maximum {max}"),
        ));
    }
    Ok(())
}

/// Normalize a global categorical value list: trim every entry, reject blanks
/// and duplicates, require at least one value. Declared order is kept.
///
/// # Errors
///
/// Returns `CoreError::Validation` on an empty list, a blank entry or a duplicate.
pub fn normalize_value_set(subject: &str, values: &[String]) -> Result<Vec<String>, CoreError> {
    if values.is_empty() {
        return Err(CoreError::validation(
            subject,
            "at least one allowed value is required",
        ));
    }
    let mut normalized: Vec<String> = Vec::with_capacity(values.len());
    for (index, raw) in values.iter().enumerate() {
        let value = raw.trim();
        if value.is_empty() {
            return Err(CoreError::validation(
                subject,
                format!("value #{} is blank", index + 1),
            ));
        }
        if normalized.iter().any(|existing| existing == value) {
            return Err(CoreError::validation(
                subject,
                format!("value '{value}' is listed more than once"),
            ));
        }
        normalized.push(value.to_string());
    }
    Ok(normalized)
}

/// Validate and normalize a global definition before it is stored.
///
/// # Errors
///
/// Returns `CoreError::Validation` per [`validate_global_range`] / [`normalize_value_set`].
pub fn validate_domain(
    subject: &str,
    domain: CharacteristicDomain,
) -> Result<CharacteristicDomain, CoreError> {
    match domain {
        CharacteristicDomain::Numeric {
            min_value,
            max_value,
        } => {
            validate_global_range(subject, min_value, max_value)?;
            Ok(CharacteristicDomain::Numeric {
                min_value,
                max_value,
            })
        }
        CharacteristicDomain::Categorical { values } => Ok(CharacteristicDomain::Categorical {
            values: normalize_value_set(subject, &values)?,
        }),
    }
}

/// Check a type-specific numeric narrowing against the global range:
/// `global_min <= min <= max <= global_max`, both bounds present.
///
/// # Errors
///
/// Returns `CoreError::Validation` if a bound is missing or non-finite, `min > max`,
/// or either bound falls outside `[global_min, global_max]`.
pub fn validate_numeric_bounds(
    subject: &str,
    min: Option<f64>,
    max: Option<f64>,
    global_min: f64,
    global_max: f64,
) -> Result<(f64, f64), CoreError> {
    let (Some(min), Some(max)) = (min, max) else {
        return Err(CoreError::validation(
            subject,
            "both minimum and maximum must be set",
        ));
    };
    validate_global_range(subject, min, max)?;
    for bound in [min, max] {
        if bound < global_min || bound > global_max {
            return Err(CoreError::validation(
                subject,
                format!("bound {bound} is outside the global range [{global_min}, {global_max}]"),
            ));
        }
    }
    Ok((min, max))
}

/// Check a type-specific value subset: non-empty and every (trimmed) entry is one
/// of the global values. Duplicates collapse; first-seen order is kept.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the set is empty or has a value outside
/// `global_values`.
pub fn validate_categorical_set(
    subject: &str,
    values: &[String],
    global_values: &[String],
) -> Result<Vec<String>, CoreError> {
    let mut normalized: Vec<String> = Vec::with_capacity(values.len());
    for raw in values {
        let value = raw.trim();
        if !global_values.iter().any(|allowed| allowed == value) {
            return Err(CoreError::validation(
                subject,
                format!("value '{value}' is not one of the allowed values"),
            ));
        }
        if !normalized.iter().any(|existing| existing == value) {
            normalized.push(value.to_string());
        }
    }
    if normalized.is_empty() {
        return Err(CoreError::validation(
            subject,
            "at least one value must be selected",
        ));
    }
    Ok(normalized)
}

/// Validate a narrowing against its characteristic's global definition and
/// return the normalized narrowing.
///
/// # Errors
///
/// Returns `CoreError::Validation` on a kind mismatch or a containment violation.
pub fn validate_narrowing(
    characteristic: &Characteristic,
    narrowing: &Narrowing,
) -> Result<Narrowing, CoreError> {
    let subject = characteristic.subject();
    match (&characteristic.domain, narrowing) {
        (
            CharacteristicDomain::Numeric {
                min_value: global_min,
                max_value: global_max,
            },
            Narrowing::Numeric {
                min_value,
                max_value,
            },
        ) => {
            let (min, max) =
                validate_numeric_bounds(&subject, *min_value, *max_value, *global_min, *global_max)?;
            Ok(Narrowing::numeric(min, max))
        }
        (CharacteristicDomain::Categorical { values: global }, Narrowing::Categorical { values }) => {
            Ok(Narrowing::Categorical {
                values: validate_categorical_set(&subject, values, global)?,
            })
        }
        (domain, narrowing) => Err(CoreError::validation(
            subject,
            format!(
                "a {} narrowing cannot be applied to a {} characteristic",
                narrowing.kind(),
                domain.kind()
            ),
        )),
    }
}

/// Validate one specialist value for a characteristic.
///
/// Numeric values must lie within `[local_min ?? global_min, local_max ?? global_max]`;
/// categorical values must be in the local set when one is given, else the global set.
/// The query path passes `local = None`: no candidate type is chosen yet, so the
/// global definition applies.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the characteristic on a kind mismatch,
/// a non-finite number, or a value outside the applicable range/set.
pub fn validate_single_input(
    characteristic: &Characteristic,
    value: &QueryValue,
    local: Option<&Narrowing>,
) -> Result<(), CoreError> {
    let subject = characteristic.subject();
    match (&characteristic.domain, value) {
        (
            CharacteristicDomain::Numeric {
                min_value,
                max_value,
            },
            QueryValue::Numeric(v),
        ) => {
            if !v.is_finite() {
                return Err(CoreError::validation(subject, format!("{v} is not a finite number")));
            }
            let (local_min, local_max) = match local {
                Some(Narrowing::Numeric {
                    min_value,
                    max_value,
                }) => (*min_value, *max_value),
                _ => (None, None),
            };
            let lo = local_min.unwrap_or(*min_value);
            let hi = local_max.unwrap_or(*max_value);
            if *v < lo || *v > hi {
                return Err(CoreError::validation(
                    subject,
                    format!("{v} is outside the allowed range [{lo}, {hi}]"),
                ));
            }
            Ok(())
        }
        (CharacteristicDomain::Categorical { values }, QueryValue::Categorical(v)) => {
            let allowed = match local {
                Some(Narrowing::Categorical { values: local }) if !local.is_empty() => local,
                _ => values,
            };
            if !allowed.iter().any(|a| a == v) {
                return Err(CoreError::validation(
                    subject,
                    format!("'{v}' is not one of the allowed values"),
                ));
            }
            Ok(())
        }
        (domain, _) => Err(CoreError::validation(
            subject,
            format!("expected a {} value", domain.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn numeric(id: i64, name: &str, min: f64, max: f64) -> Characteristic {
        Characteristic {
            id,
            name: name.into(),
            domain: CharacteristicDomain::Numeric {
                min_value: min,
                max_value: max,
            },
            created_at: Utc::now(),
        }
    }

    fn categorical(id: i64, name: &str, values: &[&str]) -> Characteristic {
        Characteristic {
            id,
            name: name.into(),
            domain: CharacteristicDomain::Categorical {
                values: values.iter().map(ToString::to_string).collect(),
            },
            created_at: Utc::now(),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn name_is_trimmed() {
        assert_eq!(validate_name("coffee type", "  Arabica ").unwrap(), "Arabica");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_name_rejected(#[case] name: &str) {
        let err = validate_name("characteristic", name).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[rstest]
    #[case(0.0, 10.0, true)]
    #[case(5.0, 5.0, true)]
    #[case(5.0, 2.0, false)]
    #[case(f64::NAN, 2.0, false)]
    #[case(0.0, f64::INFINITY, false)]
    fn global_range(#[case] min: f64, #[case] max: f64, #[case] ok: bool) {
        assert_eq!(validate_global_range("acidity", min, max).is_ok(), ok);
    }

    #[test]
    fn value_set_trims_and_keeps_order() {
        let values = normalize_value_set("variety", &strings(&[" Arabica", "Robusta "])).unwrap();
        assert_eq!(values, strings(&["Arabica", "Robusta"]));
    }

    #[rstest]
    #[case(&[])]
    #[case(&["A", " "])]
    #[case(&["A", "B", " A "])]
    fn bad_value_sets_rejected(#[case] values: &[&str]) {
        assert!(normalize_value_set("variety", &strings(values)).is_err());
    }

    #[rstest]
    #[case(Some(3.0), Some(8.0), true)]
    #[case(Some(0.0), Some(10.0), true)]
    #[case(Some(5.0), Some(2.0), false)]
    #[case(None, Some(2.0), false)]
    #[case(Some(1.0), None, false)]
    #[case(Some(-1.0), Some(2.0), false)]
    #[case(Some(1.0), Some(10.5), false)]
    fn numeric_bounds_against_global(
        #[case] min: Option<f64>,
        #[case] max: Option<f64>,
        #[case] ok: bool,
    ) {
        assert_eq!(
            validate_numeric_bounds("acidity", min, max, 0.0, 10.0).is_ok(),
            ok
        );
    }

    #[test]
    fn categorical_subset_accepted_and_deduplicated() {
        let values =
            validate_categorical_set("variety", &strings(&["B", " A", "B"]), &strings(&["A", "B"]))
                .unwrap();
        assert_eq!(values, strings(&["B", "A"]));
    }

    #[test]
    fn categorical_value_outside_global_rejected() {
        let err =
            validate_categorical_set("variety", &strings(&["X"]), &strings(&["A", "B"])).unwrap_err();
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn empty_categorical_set_rejected() {
        assert!(validate_categorical_set("variety", &[], &strings(&["A"])).is_err());
    }

    #[test]
    fn narrowing_kind_mismatch_rejected() {
        let acidity = numeric(1, "acidity", 0.0, 10.0);
        let err = validate_narrowing(&acidity, &Narrowing::categorical(["A"])).unwrap_err();
        assert!(err.to_string().contains("characteristic 1 (acidity)"));
    }

    #[test]
    fn narrowing_is_normalized() {
        let variety = categorical(2, "variety", &["Arabica", "Robusta"]);
        let narrowed =
            validate_narrowing(&variety, &Narrowing::categorical([" Arabica "])).unwrap();
        assert_eq!(narrowed, Narrowing::categorical(["Arabica"]));
    }

    #[test]
    fn single_input_uses_global_range_without_local() {
        let acidity = numeric(1, "acidity", 1.0, 10.0);
        assert!(validate_single_input(&acidity, &QueryValue::Numeric(9.0), None).is_ok());
        assert!(validate_single_input(&acidity, &QueryValue::Numeric(10.5), None).is_err());
    }

    #[test]
    fn single_input_prefers_local_range() {
        let acidity = numeric(1, "acidity", 1.0, 10.0);
        let local = Narrowing::numeric(3.0, 8.0);
        assert!(validate_single_input(&acidity, &QueryValue::Numeric(9.0), Some(&local)).is_err());
        assert!(validate_single_input(&acidity, &QueryValue::Numeric(4.0), Some(&local)).is_ok());
    }

    #[test]
    fn single_input_partial_local_falls_back_to_global() {
        let acidity = numeric(1, "acidity", 1.0, 10.0);
        let local = Narrowing::Numeric {
            min_value: Some(5.0),
            max_value: None,
        };
        assert!(validate_single_input(&acidity, &QueryValue::Numeric(9.5), Some(&local)).is_ok());
        assert!(validate_single_input(&acidity, &QueryValue::Numeric(4.0), Some(&local)).is_err());
    }

    #[test]
    fn single_input_categorical() {
        let variety = categorical(2, "variety", &["Arabica", "Robusta"]);
        let arabica = QueryValue::Categorical("Arabica".into());
        assert!(validate_single_input(&variety, &arabica, None).is_ok());
        let local = Narrowing::categorical(["Robusta"]);
        assert!(validate_single_input(&variety, &arabica, Some(&local)).is_err());
    }

    #[test]
    fn single_input_rejects_nan() {
        let acidity = numeric(1, "acidity", 1.0, 10.0);
        assert!(validate_single_input(&acidity, &QueryValue::Numeric(f64::NAN), None).is_err());
    }
}
