//! On-disk store tests: state survives reopening and feeds the request builder.

use cafe_core::entities::{CharacteristicDomain, Narrowing};
use cafe_core::request::{ClassificationRequestBuilder, FormValues};
use cafe_db::service::CafeService;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn knowledge_base_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowledge.db");
    let path = path.to_str().unwrap();

    {
        let svc = CafeService::new_local(path).await.unwrap();
        let arabica = svc.create_coffee_type("Arabica").await.unwrap();
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
        svc.bind(arabica.id, acidity.id, Narrowing::numeric(3.0, 8.0))
            .await
            .unwrap();
    }

    let svc = CafeService::new_local(path).await.unwrap();
    let kb = svc.knowledge_base().await.unwrap();
    assert_eq!(kb.len(), 1);
    assert_eq!(kb[0].name, "Arabica");
    assert_eq!(kb[0].numeric[0].name, "acidity");
    assert_eq!(kb[0].numeric[0].min_value, Some(3.0));
    assert!(svc.completeness().await.unwrap().is_ready());
}

/// A value outside the type's local range but inside the global range is accepted;
/// matching it against a type is the classification engine's job.
#[tokio::test]
async fn query_is_checked_against_global_range() {
    let svc = CafeService::new_local(":memory:").await.unwrap();
    let arabica = svc.create_coffee_type("Arabica").await.unwrap();
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
    svc.bind(arabica.id, acidity.id, Narrowing::numeric(3.0, 8.0))
        .await
        .unwrap();

    let snapshot = svc.snapshot().await.unwrap();
    assert!(snapshot.completeness().is_ready());

    let mut form = FormValues::new();
    form.set_numeric(acidity.id, "9");
    let query = ClassificationRequestBuilder::from_snapshot(&snapshot)
        .build(&form)
        .unwrap();
    assert_eq!(query.numeric.get(&acidity.id), Some(&9.0));

    form.set_numeric(acidity.id, "11");
    assert!(
        ClassificationRequestBuilder::from_snapshot(&snapshot)
            .build(&form)
            .is_err()
    );
}
