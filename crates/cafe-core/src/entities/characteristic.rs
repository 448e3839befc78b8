use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CharacteristicKind;
use crate::ids::CharacteristicId;

/// A named attribute of coffee with its global definition.
///
/// Serializes flat: `{"id", "name", "type": "numeric", "min_value", "max_value", ...}`
/// or `{"id", "name", "type": "categorical", "values": [...], ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Characteristic {
    pub id: CharacteristicId,
    pub name: String,
    #[serde(flatten)]
    pub domain: CharacteristicDomain,
    pub created_at: DateTime<Utc>,
}

/// Global range or value set of a characteristic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CharacteristicDomain {
    Numeric { min_value: f64, max_value: f64 },
    Categorical { values: Vec<String> },
}

impl CharacteristicDomain {
    #[must_use]
    pub const fn kind(&self) -> CharacteristicKind {
        match self {
            Self::Numeric { .. } => CharacteristicKind::Numeric,
            Self::Categorical { .. } => CharacteristicKind::Categorical,
        }
    }
}

impl Characteristic {
    #[must_use]
    pub const fn kind(&self) -> CharacteristicKind {
        self.domain.kind()
    }

    /// Global `(min, max)` for numeric characteristics.
    #[must_use]
    pub const fn global_range(&self) -> Option<(f64, f64)> {
        match self.domain {
            CharacteristicDomain::Numeric {
                min_value,
                max_value,
            } => Some((min_value, max_value)),
            CharacteristicDomain::Categorical { .. } => None,
        }
    }

    /// Global allowed values for categorical characteristics.
    #[must_use]
    pub fn global_values(&self) -> Option<&[String]> {
        match &self.domain {
            CharacteristicDomain::Categorical { values } => Some(values),
            CharacteristicDomain::Numeric { .. } => None,
        }
    }

    /// Human-readable subject used in error messages, e.g. `characteristic 1 (acidity)`.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("characteristic {} ({})", self.id, self.name)
    }
}
