//! Read-side views and engine response shapes.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Characteristic, CharacteristicBinding, CoffeeType, Narrowing};
use crate::enums::CharacteristicKind;
use crate::ids::CharacteristicId;

/// Characteristics partitioned by kind: `{"numeric": [...], "categorical": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CharacteristicListing {
    pub numeric: Vec<Characteristic>,
    pub categorical: Vec<Characteristic>,
}

impl CharacteristicListing {
    /// Partition characteristics, keeping their incoming order within each kind.
    #[must_use]
    pub fn partition(characteristics: impl IntoIterator<Item = Characteristic>) -> Self {
        let (numeric, categorical): (Vec<_>, Vec<_>) = characteristics
            .into_iter()
            .partition(|c| c.kind() == CharacteristicKind::Numeric);
        Self {
            numeric,
            categorical,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty() && self.categorical.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NumericBindingView {
    pub characteristic_id: CharacteristicId,
    pub name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CategoricalBindingView {
    pub characteristic_id: CharacteristicId,
    pub name: String,
    pub values: Vec<String>,
}

/// One coffee type with its bindings joined to characteristic names.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CoffeeTypeProfile {
    pub id: i64,
    pub name: String,
    pub numeric: Vec<NumericBindingView>,
    pub categorical: Vec<CategoricalBindingView>,
}

impl CoffeeTypeProfile {
    /// Join a type's bindings (creation order) against the registry. A binding whose
    /// characteristic is gone is shown as `#<id>`.
    #[must_use]
    pub fn build(
        coffee_type: &CoffeeType,
        bindings: &[CharacteristicBinding],
        characteristics: &BTreeMap<CharacteristicId, Characteristic>,
    ) -> Self {
        let mut numeric = Vec::new();
        let mut categorical = Vec::new();
        for binding in bindings {
            let name = characteristics.get(&binding.characteristic_id).map_or_else(
                || format!("#{}", binding.characteristic_id),
                |c| c.name.clone(),
            );
            match &binding.narrowing {
                Narrowing::Numeric {
                    min_value,
                    max_value,
                } => numeric.push(NumericBindingView {
                    characteristic_id: binding.characteristic_id,
                    name,
                    min_value: *min_value,
                    max_value: *max_value,
                }),
                Narrowing::Categorical { values } => categorical.push(CategoricalBindingView {
                    characteristic_id: binding.characteristic_id,
                    name,
                    values: values.clone(),
                }),
            }
        }
        Self {
            id: coffee_type.id,
            name: coffee_type.name.clone(),
            numeric,
            categorical,
        }
    }
}

/// Response of either classification engine, surfaced verbatim.
///
/// The static engine fills `all_types_analysis`; the ML engine fills
/// `probabilities`. `type` is absent when nothing matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResponse {
    #[serde(rename = "type", default)]
    pub coffee_type: Option<String>,
    #[serde(default)]
    pub explanations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_types_analysis: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f64>>,
}
