use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::CharacteristicId;

/// Normalized specialist input sent to the classification engines.
///
/// Transient, never persisted. Blank form fields are omitted, not defaulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClassificationQuery {
    pub numeric: BTreeMap<CharacteristicId, f64>,
    pub categorical: BTreeMap<CharacteristicId, String>,
}

impl ClassificationQuery {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numeric.is_empty() && self.categorical.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    pub fn insert(&mut self, id: CharacteristicId, value: QueryValue) {
        match value {
            QueryValue::Numeric(v) => {
                self.numeric.insert(id, v);
            }
            QueryValue::Categorical(v) => {
                self.categorical.insert(id, v);
            }
        }
    }
}

/// A single parsed specialist value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Numeric(f64),
    Categorical(String),
}
