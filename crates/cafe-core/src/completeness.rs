//! Knowledge-base completeness check.
//!
//! A pure function over a pre-fetched snapshot: no hidden state, no I/O, and the
//! same input always yields the same report. The knowledge base is ready for
//! classification iff both report lists are empty.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    Characteristic, CharacteristicBinding, CharacteristicDomain, CoffeeType, Narrowing,
};
use crate::ids::{CharacteristicId, CoffeeTypeId};

/// Names of a coffee type's bindings that are missing or invalid values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteValues {
    pub coffee_type: CoffeeType,
    pub empty_numeric: Vec<String>,
    pub empty_categorical: Vec<String>,
}

/// Result of a completeness check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    /// Coffee types with zero bindings.
    pub no_characteristics: Vec<CoffeeType>,
    /// Coffee types with at least one incomplete or invalid binding.
    pub incomplete_values: Vec<IncompleteValues>,
}

impl CompletenessReport {
    /// Whether classification may run against this knowledge base.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.no_characteristics.is_empty() && self.incomplete_values.is_empty()
    }
}

/// Scan every coffee type and its bindings.
///
/// A numeric binding is reported when a bound is missing, `min > max`, or a bound
/// lies outside the characteristic's current global range. A categorical binding
/// is reported when its value set is empty or holds a value the characteristic no
/// longer allows. A binding whose characteristic is missing or of another kind is
/// reported under its own kind's list.
#[must_use]
pub fn check(
    coffee_types: &[CoffeeType],
    characteristics: &BTreeMap<CharacteristicId, Characteristic>,
    bindings_by_type: &BTreeMap<CoffeeTypeId, Vec<CharacteristicBinding>>,
) -> CompletenessReport {
    let mut report = CompletenessReport::default();

    for coffee_type in coffee_types {
        let bindings = bindings_by_type
            .get(&coffee_type.id)
            .map_or(&[][..], Vec::as_slice);

        if bindings.is_empty() {
            report.no_characteristics.push(coffee_type.clone());
            continue;
        }

        let mut empty_numeric = Vec::new();
        let mut empty_categorical = Vec::new();
        for binding in bindings {
            let characteristic = characteristics.get(&binding.characteristic_id);
            if is_well_formed(binding, characteristic) {
                continue;
            }
            let name = characteristic.map_or_else(
                || format!("#{}", binding.characteristic_id),
                |c| c.name.clone(),
            );
            match binding.narrowing {
                Narrowing::Numeric { .. } => empty_numeric.push(name),
                Narrowing::Categorical { .. } => empty_categorical.push(name),
            }
        }

        if !empty_numeric.is_empty() || !empty_categorical.is_empty() {
            report.incomplete_values.push(IncompleteValues {
                coffee_type: coffee_type.clone(),
                empty_numeric,
                empty_categorical,
            });
        }
    }

    report
}

fn is_well_formed(binding: &CharacteristicBinding, characteristic: Option<&Characteristic>) -> bool {
    let Some(characteristic) = characteristic else {
        return false;
    };
    match (&binding.narrowing, &characteristic.domain) {
        (
            Narrowing::Numeric {
                min_value: Some(min),
                max_value: Some(max),
            },
            CharacteristicDomain::Numeric {
                min_value: global_min,
                max_value: global_max,
            },
        ) => min <= max && *min >= *global_min && *max <= *global_max,
        (Narrowing::Categorical { values }, CharacteristicDomain::Categorical { values: global }) => {
            !values.is_empty() && values.iter().all(|v| global.contains(v))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn coffee(id: i64, name: &str) -> CoffeeType {
        CoffeeType {
            id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    fn registry() -> BTreeMap<CharacteristicId, Characteristic> {
        let now = Utc::now();
        BTreeMap::from([
            (
                1,
                Characteristic {
                    id: 1,
                    name: "acidity".into(),
                    domain: CharacteristicDomain::Numeric {
                        min_value: 0.0,
                        max_value: 10.0,
                    },
                    created_at: now,
                },
            ),
            (
                2,
                Characteristic {
                    id: 2,
                    name: "variety".into(),
                    domain: CharacteristicDomain::Categorical {
                        values: vec!["Arabica".into(), "Robusta".into()],
                    },
                    created_at: now,
                },
            ),
        ])
    }

    fn bind(coffee_type_id: i64, characteristic_id: i64, narrowing: Narrowing) -> CharacteristicBinding {
        CharacteristicBinding {
            coffee_type_id,
            characteristic_id,
            narrowing,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn type_without_bindings_is_only_in_no_characteristics() {
        let types = vec![coffee(1, "Arabica")];
        let report = check(&types, &registry(), &BTreeMap::new());
        assert_eq!(report.no_characteristics, types);
        assert!(report.incomplete_values.is_empty());
        assert!(!report.is_ready());
    }

    #[test]
    fn missing_numeric_bound_is_reported_by_name() {
        let types = vec![coffee(1, "Arabica")];
        let bindings = BTreeMap::from([(
            1,
            vec![bind(
                1,
                1,
                Narrowing::Numeric {
                    min_value: None,
                    max_value: Some(5.0),
                },
            )],
        )]);
        let report = check(&types, &registry(), &bindings);
        assert!(report.no_characteristics.is_empty());
        assert_eq!(report.incomplete_values.len(), 1);
        assert_eq!(report.incomplete_values[0].empty_numeric, vec!["acidity"]);
        assert!(report.incomplete_values[0].empty_categorical.is_empty());
    }

    #[test]
    fn inverted_and_out_of_range_bounds_are_reported() {
        let types = vec![coffee(1, "A"), coffee(2, "B")];
        let bindings = BTreeMap::from([
            (1, vec![bind(1, 1, Narrowing::numeric(5.0, 2.0))]),
            (2, vec![bind(2, 1, Narrowing::numeric(2.0, 12.0))]),
        ]);
        let report = check(&types, &registry(), &bindings);
        assert_eq!(report.incomplete_values.len(), 2);
    }

    #[test]
    fn empty_or_stale_categorical_set_is_reported() {
        let types = vec![coffee(1, "A"), coffee(2, "B")];
        let bindings = BTreeMap::from([
            (1, vec![bind(1, 2, Narrowing::categorical(Vec::<String>::new()))]),
            (2, vec![bind(2, 2, Narrowing::categorical(["Liberica"]))]),
        ]);
        let report = check(&types, &registry(), &bindings);
        assert_eq!(report.incomplete_values[0].empty_categorical, vec!["variety"]);
        assert_eq!(report.incomplete_values[1].empty_categorical, vec!["variety"]);
    }

    #[test]
    fn complete_knowledge_base_is_ready() {
        let types = vec![coffee(1, "Arabica")];
        let bindings = BTreeMap::from([(
            1,
            vec![
                bind(1, 1, Narrowing::numeric(3.0, 8.0)),
                bind(1, 2, Narrowing::categorical(["Arabica"])),
            ],
        )]);
        let report = check(&types, &registry(), &bindings);
        assert!(report.is_ready(), "{report:?}");
    }

    #[test]
    fn unknown_characteristic_is_reported_by_id() {
        let types = vec![coffee(1, "Arabica")];
        let bindings = BTreeMap::from([(1, vec![bind(1, 99, Narrowing::numeric(1.0, 2.0))])]);
        let report = check(&types, &registry(), &bindings);
        assert_eq!(report.incomplete_values[0].empty_numeric, vec!["#99"]);
    }

    #[test]
    fn report_is_deterministic() {
        let types = vec![coffee(1, "A"), coffee(2, "B"), coffee(3, "C")];
        let bindings = BTreeMap::from([
            (1, vec![bind(1, 1, Narrowing::unset(crate::enums::CharacteristicKind::Numeric))]),
            (3, vec![bind(3, 2, Narrowing::categorical(["Arabica"]))]),
        ]);
        let first = check(&types, &registry(), &bindings);
        let second = check(&types, &registry(), &bindings);
        assert_eq!(first, second);
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = check(&[coffee(1, "A")], &registry(), &BTreeMap::new());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("noCharacteristics").is_some());
        assert!(json.get("incompleteValues").is_some());
    }
}
