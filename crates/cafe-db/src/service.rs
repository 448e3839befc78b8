//! Service layer over the knowledge-base store.
//!
//! `CafeService` wraps `CafeDb` and the cached completeness report. All repo
//! methods are implemented as `impl CafeService` under [`crate::repos`].
//!
//! Every mutation method follows this protocol:
//! 1. Load what the core validators need and validate (no write on failure)
//! 2. Begin transaction, execute SQL, commit
//! 3. Drop the cached completeness report and advance its generation

use std::sync::{Mutex, PoisonError};

use cafe_core::completeness::CompletenessReport;
use cafe_core::responses::CoffeeTypeProfile;
use cafe_core::snapshot::KnowledgeSnapshot;

use crate::CafeDb;
use crate::error::DatabaseError;

/// Cached completeness report. `generation` advances on every invalidation, so a
/// report computed from a snapshot read before a mutation is never stored.
#[derive(Debug)]
struct CompletenessCache {
    generation: u64,
    report: Option<CompletenessReport>,
}

pub struct CafeService {
    db: CafeDb,
    completeness: Mutex<CompletenessCache>,
}

impl CafeService {
    /// Open a local store.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = CafeDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    #[must_use]
    pub const fn from_db(db: CafeDb) -> Self {
        Self {
            db,
            completeness: Mutex::new(CompletenessCache {
                generation: 0,
                report: None,
            }),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &CafeDb {
        &self.db
    }

    /// Fetch the whole knowledge base in one pass.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any read fails.
    pub async fn snapshot(&self) -> Result<KnowledgeSnapshot, DatabaseError> {
        let coffee_types = self.list_coffee_types().await?;
        let characteristics = self.characteristics_by_id().await?;
        let bindings_by_type = self.bindings_by_type().await?;
        Ok(KnowledgeSnapshot {
            coffee_types,
            characteristics,
            bindings_by_type,
        })
    }

    /// Every coffee type, ordered by name, with its bindings joined to characteristic names.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any read fails.
    pub async fn knowledge_base(&self) -> Result<Vec<CoffeeTypeProfile>, DatabaseError> {
        Ok(self.snapshot().await?.knowledge_base())
    }

    /// The completeness report, recomputed from a fresh snapshot if no mutation
    /// has happened since the last call.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the snapshot cannot be read.
    pub async fn completeness(&self) -> Result<CompletenessReport, DatabaseError> {
        let (generation, cached) = self.cached_completeness();
        if let Some(report) = cached {
            return Ok(report);
        }
        let report = self.snapshot().await?.completeness();
        tracing::debug!(
            generation,
            no_characteristics = report.no_characteristics.len(),
            incomplete_values = report.incomplete_values.len(),
            "computed completeness report"
        );
        if !self.store_completeness(generation, &report) {
            tracing::debug!(generation, "knowledge base changed while computing; not caching");
        }
        Ok(report)
    }

    /// Whether a completeness report is currently cached.
    #[must_use]
    pub fn has_cached_completeness(&self) -> bool {
        self.cached_completeness().1.is_some()
    }

    /// Current generation and cached report, if any.
    fn cached_completeness(&self) -> (u64, Option<CompletenessReport>) {
        let cache = self
            .completeness
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        (cache.generation, cache.report.clone())
    }

    /// Cache `report` only if no invalidation happened since `generation` was read.
    fn store_completeness(&self, generation: u64, report: &CompletenessReport) -> bool {
        let mut cache = self
            .completeness
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if cache.generation != generation {
            return false;
        }
        cache.report = Some(report.clone());
        true
    }

    /// Drop the cached completeness report. Called after every successful mutation.
    pub(crate) fn invalidate_completeness(&self) {
        let mut cache = self
            .completeness
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cache.generation = cache.generation.wrapping_add(1);
        cache.report = None;
    }
}

#[cfg(test)]
mod tests {
    use cafe_core::entities::{CharacteristicDomain, Narrowing};
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn empty_knowledge_base_is_ready() {
        let svc = test_service().await;
        let report = svc.completeness().await.unwrap();
        assert!(report.is_ready());
    }

    #[tokio::test]
    async fn completeness_is_cached_until_mutation() {
        let svc = test_service().await;
        svc.create_coffee_type("Arabica").await.unwrap();

        let first = svc.completeness().await.unwrap();
        assert_eq!(first.no_characteristics.len(), 1);
        assert!(svc.has_cached_completeness());

        let acidity = svc
            .create_characteristic(
                "acidity",
                CharacteristicDomain::Numeric {
                    min_value: 1.0,
                    max_value: 10.0,
                },
            )
            .await
            .unwrap();
        assert!(!svc.has_cached_completeness());

        let arabica = svc.list_coffee_types().await.unwrap()[0].clone();
        svc.bind(arabica.id, acidity.id, Narrowing::numeric(3.0, 8.0))
            .await
            .unwrap();
        let second = svc.completeness().await.unwrap();
        assert!(second.is_ready(), "{second:?}");
    }

    #[tokio::test]
    async fn failed_mutation_keeps_cache() {
        let svc = test_service().await;
        svc.completeness().await.unwrap();
        assert!(svc.create_coffee_type("  ").await.is_err());
        assert!(svc.has_cached_completeness());
    }

    #[tokio::test]
    async fn report_computed_before_a_mutation_is_not_cached() {
        let svc = test_service().await;
        let (generation, cached) = svc.cached_completeness();
        assert!(cached.is_none());
        let stale = svc.snapshot().await.unwrap().completeness();
        assert!(stale.is_ready());

        svc.create_coffee_type("Arabica").await.unwrap();

        assert!(!svc.store_completeness(generation, &stale));
        assert!(!svc.has_cached_completeness());
        let fresh = svc.completeness().await.unwrap();
        assert_eq!(fresh.no_characteristics.len(), 1);
        assert!(svc.has_cached_completeness());
    }

    #[tokio::test]
    async fn report_is_cached_when_nothing_changed() {
        let svc = test_service().await;
        let (generation, _) = svc.cached_completeness();
        let report = svc.snapshot().await.unwrap().completeness();
        assert!(svc.store_completeness(generation, &report));
        assert_eq!(svc.cached_completeness(), (generation, Some(report)));
    }

    #[tokio::test]
    async fn snapshot_holds_everything() {
        let svc = test_service().await;
        let robusta = svc.create_coffee_type("Robusta").await.unwrap();
        svc.create_coffee_type("Arabica").await.unwrap();
        let variety = svc
            .create_characteristic(
                "variety",
                CharacteristicDomain::Categorical {
                    values: vec!["Arabica".into(), "Robusta".into()],
                },
            )
            .await
            .unwrap();
        svc.attach(robusta.id, variety.id).await.unwrap();

        let snapshot = svc.snapshot().await.unwrap();
        let names: Vec<_> = snapshot.coffee_types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Arabica", "Robusta"]);
        assert_eq!(snapshot.characteristics.len(), 1);
        assert_eq!(snapshot.bindings_for(robusta.id).len(), 1);

        let report = snapshot.completeness();
        assert_eq!(report.no_characteristics[0].name, "Arabica");
        assert_eq!(report.incomplete_values[0].empty_categorical, vec!["variety"]);
    }
}
