//! Entity structs for the knowledge base.
//!
//! Each persisted entity maps to a table in the libSQL store (see `cafe-db`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema validation.

mod binding;
mod characteristic;
mod coffee_type;
mod query;

pub use binding::{BindingList, CharacteristicBinding, Narrowing};
pub use characteristic::{Characteristic, CharacteristicDomain};
pub use coffee_type::CoffeeType;
pub use query::{ClassificationQuery, QueryValue};
