use serde_json::Value;
use sqlx::{Postgres, Transaction};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Result, db::Db, models::ScoringOutboxEntry};

/// Enqueued in the same transaction as the product insert, so a persisted
/// product in async mode always has a queued scoring job.
pub async fn enqueue_scoring_tx(
	tx: &mut Transaction<'_, Postgres>,
	outbox_id: Uuid,
	product_id: Uuid,
	facts: &Value,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO scoring_outbox (
	outbox_id,
	product_id,
	facts,
	status,
	created_at,
	updated_at,
	available_at
)
VALUES ($1, $2, $3, 'PENDING', $4, $5, $6)",
	)
	.bind(outbox_id)
	.bind(product_id)
	.bind(facts)
	.bind(now)
	.bind(now)
	.bind(now)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

/// Claims the next due job and pushes its availability out by the lease so
/// other workers skip it while it runs.
pub async fn fetch_next_job(
	db: &Db,
	now: OffsetDateTime,
	lease: Duration,
) -> Result<Option<ScoringOutboxEntry>> {
	let mut tx = db.pool.begin().await?;
	let row = sqlx::query_as::<_, ScoringOutboxEntry>(
		"\
SELECT *
FROM scoring_outbox
WHERE status IN ('PENDING', 'FAILED') AND available_at <= $1
ORDER BY available_at ASC
LIMIT 1
FOR UPDATE SKIP LOCKED",
	)
	.bind(now)
	.fetch_optional(&mut *tx)
	.await?;
	let job = if let Some(mut job) = row {
		let lease_until = now + lease;

		sqlx::query(
			"UPDATE scoring_outbox SET available_at = $1, updated_at = $2 WHERE outbox_id = $3",
		)
		.bind(lease_until)
		.bind(now)
		.bind(job.outbox_id)
		.execute(&mut *tx)
		.await?;

		job.available_at = lease_until;
		job.updated_at = now;

		Some(job)
	} else {
		None
	};

	tx.commit().await?;

	Ok(job)
}

pub async fn mark_done(db: &Db, outbox_id: Uuid, now: OffsetDateTime) -> Result<()> {
	sqlx::query("UPDATE scoring_outbox SET status = 'DONE', updated_at = $1 WHERE outbox_id = $2")
		.bind(now)
		.bind(outbox_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn mark_failed(
	db: &Db,
	outbox_id: Uuid,
	attempts: i32,
	last_error: &str,
	available_at: OffsetDateTime,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE scoring_outbox
SET status = 'FAILED',
	attempts = $1,
	last_error = $2,
	available_at = $3,
	updated_at = $4
WHERE outbox_id = $5",
	)
	.bind(attempts)
	.bind(last_error)
	.bind(available_at)
	.bind(now)
	.bind(outbox_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Terminal failure state. DEAD rows stay visible in the store but are never
/// picked up again.
pub async fn mark_dead(
	db: &Db,
	outbox_id: Uuid,
	attempts: i32,
	last_error: &str,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE scoring_outbox
SET status = 'DEAD',
	attempts = $1,
	last_error = $2,
	updated_at = $3
WHERE outbox_id = $4",
	)
	.bind(attempts)
	.bind(last_error)
	.bind(now)
	.bind(outbox_id)
	.execute(&db.pool)
	.await?;

	Ok(())
}
