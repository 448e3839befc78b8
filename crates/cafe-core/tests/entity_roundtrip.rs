//! Serde roundtrip and JsonSchema validation tests for the wire shapes.

use std::collections::BTreeMap;

use cafe_core::completeness::{CompletenessReport, IncompleteValues};
use cafe_core::entities::*;
use cafe_core::responses::*;
use cafe_core::snapshot::KnowledgeSnapshot;
use chrono::Utc;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn acidity() -> Characteristic {
    Characteristic {
        id: 1,
        name: "acidity".into(),
        domain: CharacteristicDomain::Numeric {
            min_value: 0.0,
            max_value: 10.0,
        },
        created_at: Utc::now(),
    }
}

fn variety() -> Characteristic {
    Characteristic {
        id: 2,
        name: "variety".into(),
        domain: CharacteristicDomain::Categorical {
            values: vec!["Arabica".into(), "Robusta".into()],
        },
        created_at: Utc::now(),
    }
}

fn arabica() -> CoffeeType {
    CoffeeType {
        id: 1,
        name: "Arabica".into(),
        created_at: Utc::now(),
    }
}

roundtrip_and_validate!(numeric_characteristic_roundtrip, Characteristic, acidity());

roundtrip_and_validate!(categorical_characteristic_roundtrip, Characteristic, variety());

roundtrip_and_validate!(coffee_type_roundtrip, CoffeeType, arabica());

roundtrip_and_validate!(
    numeric_binding_roundtrip,
    CharacteristicBinding,
    CharacteristicBinding {
        coffee_type_id: 1,
        characteristic_id: 1,
        narrowing: Narrowing::numeric(8.0, 10.0),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    placeholder_binding_roundtrip,
    CharacteristicBinding,
    CharacteristicBinding {
        coffee_type_id: 1,
        characteristic_id: 1,
        narrowing: Narrowing::Numeric {
            min_value: None,
            max_value: None,
        },
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    query_roundtrip,
    ClassificationQuery,
    ClassificationQuery {
        numeric: BTreeMap::from([(1, 9.0)]),
        categorical: BTreeMap::from([(2, "Arabica".to_string())]),
    }
);

roundtrip_and_validate!(
    listing_roundtrip,
    CharacteristicListing,
    CharacteristicListing::partition([acidity(), variety()])
);

roundtrip_and_validate!(
    completeness_report_roundtrip,
    CompletenessReport,
    CompletenessReport {
        no_characteristics: vec![arabica()],
        incomplete_values: vec![IncompleteValues {
            coffee_type: arabica(),
            empty_numeric: vec!["acidity".into()],
            empty_categorical: vec![],
        }],
    }
);

roundtrip_and_validate!(
    snapshot_roundtrip,
    KnowledgeSnapshot,
    KnowledgeSnapshot {
        coffee_types: vec![arabica()],
        characteristics: BTreeMap::from([(1, acidity()), (2, variety())]),
        bindings_by_type: BTreeMap::from([(
            1,
            vec![CharacteristicBinding {
                coffee_type_id: 1,
                characteristic_id: 2,
                narrowing: Narrowing::categorical(["Arabica"]),
                created_at: Utc::now(),
            }],
        )]),
    }
);

#[test]
fn characteristic_serializes_flat() {
    let json = serde_json::to_value(acidity()).unwrap();
    assert_eq!(json["type"], "numeric");
    assert_eq!(json["min_value"], 0.0);
    assert_eq!(json["max_value"], 10.0);

    let json = serde_json::to_value(variety()).unwrap();
    assert_eq!(json["type"], "categorical");
    assert_eq!(json["values"][1], "Robusta");
}

#[test]
fn query_serializes_with_string_keys() {
    let query = ClassificationQuery {
        numeric: BTreeMap::from([(1, 15.0)]),
        categorical: BTreeMap::from([(2, "Arabica".to_string())]),
    };
    let json = serde_json::to_value(&query).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"numeric": {"1": 15.0}, "categorical": {"2": "Arabica"}})
    );
}
