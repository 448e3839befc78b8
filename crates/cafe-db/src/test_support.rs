//! Shared test utilities for cafe-db tests.

pub(crate) mod helpers {
    use cafe_core::entities::{Characteristic, CharacteristicDomain, CoffeeType};

    use crate::CafeDb;
    use crate::service::CafeService;

    /// Create an in-memory `CafeService`.
    pub async fn test_service() -> CafeService {
        let db = CafeDb::open_local(":memory:").await.unwrap();
        CafeService::from_db(db)
    }

    /// Numeric characteristic with the given global range.
    pub async fn numeric(svc: &CafeService, name: &str, min: f64, max: f64) -> Characteristic {
        svc.create_characteristic(
            name,
            CharacteristicDomain::Numeric {
                min_value: min,
                max_value: max,
            },
        )
        .await
        .unwrap()
    }

    /// Categorical characteristic with the given global values.
    pub async fn categorical(svc: &CafeService, name: &str, values: &[&str]) -> Characteristic {
        svc.create_characteristic(
            name,
            CharacteristicDomain::Categorical {
                values: values.iter().map(ToString::to_string).collect(),
            },
        )
        .await
        .unwrap()
    }

    pub async fn coffee_type(svc: &CafeService, name: &str) -> CoffeeType {
        svc.create_coffee_type(name).await.unwrap()
    }
}
