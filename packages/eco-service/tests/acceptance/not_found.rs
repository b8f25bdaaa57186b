use std::sync::Arc;

use eco_service::{Error, ResolveRequest};

use super::{FailingSource, StubSource, providers_with_sources};

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn all_sources_absent_yields_not_found_and_persists_nothing() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping all_sources_absent_yields_not_found_and_persists_nothing; set ECO_PG_DSN to run.");

		return;
	};
	let providers = providers_with_sources(vec![
		Arc::new(StubSource { name: "Open Food Facts", fragment: None }),
		Arc::new(StubSource { name: "Open Product Data", fragment: None }),
		Arc::new(FailingSource),
	]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;

	let err = service
		.resolve(ResolveRequest { barcode: "0000000000000".to_string(), mode: None })
		.await
		.expect_err("Expected a not-found error.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");
	assert_eq!(super::count_rows(&service.db, "products").await, 0);
	assert_eq!(super::count_rows(&service.db, "scoring_outbox").await, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn malformed_barcode_fails_before_any_io() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping malformed_barcode_fails_before_any_io; set ECO_PG_DSN to run.");

		return;
	};
	let providers = providers_with_sources(vec![Arc::new(FailingSource)]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;

	let err = service
		.resolve(ResolveRequest { barcode: "not a barcode!".to_string(), mode: None })
		.await
		.expect_err("Expected a validation error.");

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
