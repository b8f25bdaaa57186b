use std::sync::Arc;

use eco_service::{Providers, ResolveRequest, ScoringMode};

use super::{StubScoring, StubSource, fragment};

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn sync_mode_returns_a_clamped_attributed_score() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping sync_mode_returns_a_clamped_attributed_score; set ECO_PG_DSN to run.");

		return;
	};
	let mut food = fragment("Open Food Facts", 0.85);

	food.name = "Glass Jar Honey".to_string();

	let reply = r#"```json
{
	"carbon_emissions": 150,
	"recyclability": -20,
	"ethical_sourcing": 64,
	"energy_consumption": 58,
	"overall": 61,
	"reasoning": "Glass is widely recyclable."
}
```"#;
	let providers = Providers::new(
		vec![Arc::new(StubSource { name: "Open Food Facts", fragment: Some(food) })],
		Arc::new(StubScoring { content: reply.to_string() }),
	);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;

	let response = service
		.resolve(ResolveRequest {
			barcode: "5901234123457".to_string(),
			mode: Some(ScoringMode::Sync),
		})
		.await
		.expect("Resolution failed.");
	let score = response.eco_score.expect("Sync mode must return a score.");

	assert_eq!(score.carbon_emissions, 100);
	assert_eq!(score.recyclability, 0);
	assert_eq!(score.overall, 61);

	// Exactly one attribution row names the scoring engine.
	assert_eq!(score.attributions.len(), 1);
	assert_eq!(score.attributions[0].name, "EcoVerify AI Analysis");
	assert_eq!(score.attributions[0].reliability_score, 85);

	// Sync mode persisted directly; nothing was queued.
	assert_eq!(super::count_rows(&service.db, "scoring_outbox").await, 0);
	assert_eq!(super::count_rows(&service.db, "eco_scores").await, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set ECO_PG_DSN to run."]
async fn unparsable_reply_degrades_to_no_score() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping unparsable_reply_degrades_to_no_score; set ECO_PG_DSN to run.");

		return;
	};
	let mut food = fragment("Open Food Facts", 0.85);

	food.name = "Mystery Snack".to_string();

	let providers = Providers::new(
		vec![Arc::new(StubSource { name: "Open Food Facts", fragment: Some(food) })],
		Arc::new(StubScoring { content: "I am unable to rate this product.".to_string() }),
	);
	let cfg = super::test_config(test_db.dsn().to_string());
	let service = super::build_service(cfg, providers).await;

	let response = service
		.resolve(ResolveRequest {
			barcode: "1112223334445".to_string(),
			mode: Some(ScoringMode::Sync),
		})
		.await
		.expect("Resolution must still succeed.");

	// The product is resolved; only the score is absent.
	assert!(response.eco_score.is_none());
	assert_eq!(super::count_rows(&service.db, "products").await, 1);
	assert_eq!(super::count_rows(&service.db, "eco_scores").await, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
