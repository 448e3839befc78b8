use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::CoffeeTypeId;

/// A coffee variety the classifier can answer with. Owns its bindings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CoffeeType {
    pub id: CoffeeTypeId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
