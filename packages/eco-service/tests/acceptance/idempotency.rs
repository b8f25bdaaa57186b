use std::sync::{Arc, atomic::AtomicUsize};

use eco_service::ResolveRequest;

use super::{SpySource, fragment, providers_with_sources};

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn second_resolution_is_served_from_cache() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping second_resolution_is_served_from_cache; set ECO_PG_DSN to run.");

		return;
	};
	let calls = Arc::new(AtomicUsize::new(0));
	let mut food = fragment("Open Food Facts", 0.85);

	food.name = "Oat Drink".to_string();
	food.brand = "Oatly".to_string();

	let providers = providers_with_sources(vec![Arc::new(SpySource {
		name: "Open Food Facts",
		fragment: Some(food),
		calls: calls.clone(),
	})]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;
	let request = ResolveRequest { barcode: "7394376616013".to_string(), mode: None };

	let first = service.resolve(request.clone()).await.expect("First resolution failed.");
	let second = service.resolve(request).await.expect("Second resolution failed.");

	assert_eq!(first.product.id, second.product.id);
	assert!(!first.cached);
	assert!(second.cached);
	// The cache hit happened before any fan-out.
	assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
