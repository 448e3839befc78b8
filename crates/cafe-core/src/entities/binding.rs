use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CharacteristicKind;
use crate::ids::{CharacteristicId, CoffeeTypeId};

/// Association of a coffee type with a characteristic plus its type-specific narrowing.
///
/// The `(coffee_type_id, characteristic_id)` pair is the binding's identity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CharacteristicBinding {
    pub coffee_type_id: CoffeeTypeId,
    pub characteristic_id: CharacteristicId,
    #[serde(flatten)]
    pub narrowing: Narrowing,
    pub created_at: DateTime<Utc>,
}

/// Type-specific sub-range or sub-set of a characteristic's global definition.
///
/// Missing bounds or an empty value set mean the binding is still in progress.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Narrowing {
    Numeric {
        min_value: Option<f64>,
        max_value: Option<f64>,
    },
    Categorical {
        values: Vec<String>,
    },
}

impl Narrowing {
    /// An attached-but-not-yet-narrowed placeholder of the given kind.
    #[must_use]
    pub const fn unset(kind: CharacteristicKind) -> Self {
        match kind {
            CharacteristicKind::Numeric => Self::Numeric {
                min_value: None,
                max_value: None,
            },
            CharacteristicKind::Categorical => Self::Categorical { values: Vec::new() },
        }
    }

    #[must_use]
    pub const fn numeric(min_value: f64, max_value: f64) -> Self {
        Self::Numeric {
            min_value: Some(min_value),
            max_value: Some(max_value),
        }
    }

    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categorical {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> CharacteristicKind {
        match self {
            Self::Numeric { .. } => CharacteristicKind::Numeric,
            Self::Categorical { .. } => CharacteristicKind::Categorical,
        }
    }
}

impl CharacteristicBinding {
    #[must_use]
    pub const fn kind(&self) -> CharacteristicKind {
        self.narrowing.kind()
    }
}

/// A type's bindings partitioned by kind for display. Each list keeps creation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BindingList {
    pub numeric: Vec<CharacteristicBinding>,
    pub categorical: Vec<CharacteristicBinding>,
}

impl BindingList {
    /// Partition bindings (already in creation order) by kind.
    #[must_use]
    pub fn partition(bindings: Vec<CharacteristicBinding>) -> Self {
        let (numeric, categorical): (Vec<_>, Vec<_>) = bindings
            .into_iter()
            .partition(|b| b.kind() == CharacteristicKind::Numeric);
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
