use std::sync::Arc;

use eco_service::ResolveRequest;

use super::{StubSource, fragment, providers_with_sources};

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn same_brand_across_products_reuses_one_company() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping same_brand_across_products_reuses_one_company; set ECO_PG_DSN to run.");

		return;
	};
	let mut food = fragment("Open Food Facts", 0.85);

	food.name = "Almond Butter".to_string();
	food.brand = "NutWorks".to_string();

	let providers = providers_with_sources(vec![Arc::new(StubSource {
		name: "Open Food Facts",
		fragment: Some(food),
	})]);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;

	let first = service
		.resolve(ResolveRequest { barcode: "1234567890123".to_string(), mode: None })
		.await
		.expect("First resolution failed.");
	let second = service
		.resolve(ResolveRequest { barcode: "3210987654321".to_string(), mode: None })
		.await
		.expect("Second resolution failed.");

	let first_company = first.company.expect("Expected a company.");
	let second_company = second.company.expect("Expected a company.");

	assert_eq!(first_company.id, second_company.id);
	assert_eq!(super::count_rows(&service.db, "companies").await, 1);
	assert_eq!(super::count_rows(&service.db, "products").await, 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
