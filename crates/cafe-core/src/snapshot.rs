//! The explicit client-side cache of the knowledge base.
//!
//! A snapshot is fetched once from the store and handed to the completeness check
//! and the request builder. It is never mutated in place: after a write the caller
//! fetches a new one.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::completeness::{self, CompletenessReport};
use crate::entities::{Characteristic, CharacteristicBinding, CoffeeType};
use crate::ids::{CharacteristicId, CoffeeTypeId};
use crate::responses::{CharacteristicListing, CoffeeTypeProfile};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct KnowledgeSnapshot {
    /// Ordered by name.
    pub coffee_types: Vec<CoffeeType>,
    pub characteristics: BTreeMap<CharacteristicId, Characteristic>,
    /// Bindings per coffee type in creation order. Types without bindings may be absent.
    pub bindings_by_type: BTreeMap<CoffeeTypeId, Vec<CharacteristicBinding>>,
}

impl KnowledgeSnapshot {
    #[must_use]
    pub fn completeness(&self) -> CompletenessReport {
        completeness::check(
            &self.coffee_types,
            &self.characteristics,
            &self.bindings_by_type,
        )
    }

    /// Every coffee type with its bindings joined to characteristic names.
    #[must_use]
    pub fn knowledge_base(&self) -> Vec<CoffeeTypeProfile> {
        self.coffee_types
            .iter()
            .map(|coffee_type| {
                CoffeeTypeProfile::build(
                    coffee_type,
                    self.bindings_for(coffee_type.id),
                    &self.characteristics,
                )
            })
            .collect()
    }

    /// Characteristics partitioned by kind, ordered by name.
    #[must_use]
    pub fn characteristic_listing(&self) -> CharacteristicListing {
        let mut all: Vec<Characteristic> = self.characteristics.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        CharacteristicListing::partition(all)
    }

    #[must_use]
    pub fn bindings_for(&self, coffee_type_id: CoffeeTypeId) -> &[CharacteristicBinding] {
        self.bindings_by_type
            .get(&coffee_type_id)
            .map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn characteristic_by_name(&self, name: &str) -> Option<&Characteristic> {
        let name = name.trim();
        self.characteristics.values().find(|c| c.name == name)
    }

    #[must_use]
    pub fn coffee_type_by_name(&self, name: &str) -> Option<&CoffeeType> {
        let name = name.trim();
        self.coffee_types.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entities::{CharacteristicDomain, ClassificationQuery, Narrowing};
    use crate::request::{ClassificationRequestBuilder, FormValues};

    /// One type ("Arabica") with acidity [8, 10], acidity globally [0, 10].
    fn ready_snapshot() -> KnowledgeSnapshot {
        let now = Utc::now();
        KnowledgeSnapshot {
            coffee_types: vec![CoffeeType {
                id: 1,
                name: "Arabica".into(),
                created_at: now,
            }],
            characteristics: BTreeMap::from([(
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
            )]),
            bindings_by_type: BTreeMap::from([(
                1,
                vec![CharacteristicBinding {
                    coffee_type_id: 1,
                    characteristic_id: 1,
                    narrowing: Narrowing::numeric(8.0, 10.0),
                    created_at: now,
                }],
            )]),
        }
    }

    #[test]
    fn ready_snapshot_builds_acidity_query() {
        let snapshot = ready_snapshot();
        assert!(snapshot.completeness().is_ready());

        let mut form = FormValues::new();
        form.set_numeric(1, "9");
        let query = ClassificationRequestBuilder::from_snapshot(&snapshot)
            .build(&form)
            .unwrap();
        assert_eq!(
            query,
            ClassificationQuery {
                numeric: BTreeMap::from([(1, 9.0)]),
                categorical: BTreeMap::new(),
            }
        );
    }

    #[test]
    fn knowledge_base_joins_names() {
        let kb = ready_snapshot().knowledge_base();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb[0].name, "Arabica");
        assert_eq!(kb[0].numeric[0].name, "acidity");
        assert_eq!(kb[0].numeric[0].min_value, Some(8.0));
    }

    #[test]
    fn lookup_by_name_trims() {
        let snapshot = ready_snapshot();
        assert_eq!(snapshot.characteristic_by_name(" acidity ").map(|c| c.id), Some(1));
        assert!(snapshot.characteristic_by_name("body").is_none());
        assert_eq!(snapshot.coffee_type_by_name("Arabica").map(|t| t.id), Some(1));
    }

    #[test]
    fn type_without_bindings_has_empty_slice() {
        let snapshot = ready_snapshot();
        assert!(snapshot.bindings_for(42).is_empty());
    }
}
