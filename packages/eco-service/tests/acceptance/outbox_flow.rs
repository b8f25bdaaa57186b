use std::sync::Arc;

use eco_service::{Providers, ResolveRequest};
use eco_worker::worker::process_scoring_outbox_once;

use super::{StubScoring, StubSource, fragment, valid_score_reply};

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn queued_scoring_job_completes_and_attributes() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping queued_scoring_job_completes_and_attributes; set ECO_PG_DSN to run.");

		return;
	};
	let mut food = fragment("Open Food Facts", 0.85);

	food.name = "Rye Crispbread".to_string();

	let providers = Providers::new(
		vec![Arc::new(StubSource { name: "Open Food Facts", fragment: Some(food) })],
		Arc::new(StubScoring { content: valid_score_reply() }),
	);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;

	let response = service
		.resolve(ResolveRequest { barcode: "7300400481595".to_string(), mode: None })
		.await
		.expect("Resolution failed.");

	assert!(response.eco_score.is_none());
	assert_eq!(super::count_rows(&service.db, "scoring_outbox").await, 1);

	let worked =
		process_scoring_outbox_once(&service).await.expect("Outbox processing failed.");

	assert!(worked);

	let polled = service.lookup("7300400481595").await.expect("Lookup failed.");
	let score = polled.eco_score.expect("Expected the queued score to be visible.");

	assert_eq!(score.overall, 56);
	assert_eq!(score.attributions.len(), 1);
	assert_eq!(score.attributions[0].name, "EcoVerify AI Analysis");

	let status: String = sqlx::query_scalar("SELECT status FROM scoring_outbox LIMIT 1")
		.fetch_one(&service.db.pool)
		.await
		.expect("Failed to read outbox status.");

	assert_eq!(status, "DONE");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn failed_scoring_job_backs_off_without_a_partial_write() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping failed_scoring_job_backs_off_without_a_partial_write; set ECO_PG_DSN to run.");

		return;
	};
	let mut food = fragment("Open Food Facts", 0.85);

	food.name = "Rye Crispbread".to_string();

	// A reply with a non-numeric component must skip the write entirely.
	let reply = r#"{"carbon_emissions": "high", "recyclability": 50,
		"ethical_sourcing": 50, "energy_consumption": 50, "overall": 50}"#;
	let providers = Providers::new(
		vec![Arc::new(StubSource { name: "Open Food Facts", fragment: Some(food) })],
		Arc::new(StubScoring { content: reply.to_string() }),
	);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;

	service
		.resolve(ResolveRequest { barcode: "7300400481595".to_string(), mode: None })
		.await
		.expect("Resolution failed.");

	let worked =
		process_scoring_outbox_once(&service).await.expect("Outbox processing failed.");

	assert!(worked);
	assert_eq!(super::count_rows(&service.db, "eco_scores").await, 0);

	let (status, attempts): (String, i32) =
		sqlx::query_as("SELECT status, attempts FROM scoring_outbox LIMIT 1")
			.fetch_one(&service.db.pool)
			.await
			.expect("Failed to read outbox row.");

	assert_eq!(status, "FAILED");
	assert_eq!(attempts, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
