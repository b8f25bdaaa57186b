use std::time::Duration as StdDuration;

use color_eyre::Result;
use time::{Duration, OffsetDateTime};
use tokio::time as tokio_time;

use eco_domain::score::ProductFacts;
use eco_service::ScanService;
use eco_storage::{models::ScoringOutboxEntry, outbox};

const POLL_INTERVAL_MS: i64 = 500;
const CLAIM_LEASE_SECONDS: i64 = 60;
const BASE_BACKOFF_MS: i64 = 500;
const MAX_BACKOFF_MS: i64 = 30_000;
const MAX_ATTEMPTS: i32 = 8;
const MAX_ERROR_CHARS: usize = 1_024;

pub struct WorkerState {
	pub service: ScanService,
}

pub async fn run_worker(state: WorkerState) -> Result<()> {
	loop {
		match process_scoring_outbox_once(&state.service).await {
			// Keep draining while jobs are due; only sleep on an empty queue.
			Ok(true) => continue,
			Ok(false) => {},
			Err(err) => {
				tracing::error!(error = %err, "Scoring outbox processing failed.");
			},
		}

		tokio_time::sleep(to_std_duration(Duration::milliseconds(POLL_INTERVAL_MS))).await;
	}
}

/// Claims and runs at most one scoring job. Returns whether a job was
/// claimed, so the loop can distinguish "queue drained" from "worked".
pub async fn process_scoring_outbox_once(service: &ScanService) -> Result<bool> {
	let now = OffsetDateTime::now_utc();
	let job =
		outbox::fetch_next_job(&service.db, now, Duration::seconds(CLAIM_LEASE_SECONDS)).await?;
	let Some(job) = job else {
		return Ok(false);
	};

	match handle_scoring_job(service, &job).await {
		Ok(()) => {
			outbox::mark_done(&service.db, job.outbox_id, OffsetDateTime::now_utc()).await?;
		},
		Err(err) => {
			let next_attempts = job.attempts.saturating_add(1);
			let error_text = sanitize_error(&err.to_string());
			let now = OffsetDateTime::now_utc();

			if next_attempts >= MAX_ATTEMPTS {
				outbox::mark_dead(&service.db, job.outbox_id, next_attempts, &error_text, now)
					.await?;
				tracing::error!(
					outbox_id = %job.outbox_id,
					product_id = %job.product_id,
					attempts = next_attempts,
					error = %err,
					"Scoring job exhausted its retries."
				);
			} else {
				let available_at = now + backoff_for_attempt(next_attempts);

				outbox::mark_failed(
					&service.db,
					job.outbox_id,
					next_attempts,
					&error_text,
					available_at,
					now,
				)
				.await?;
				tracing::warn!(
					outbox_id = %job.outbox_id,
					attempts = next_attempts,
					error = %err,
					"Scoring job failed. Backing off."
				);
			}
		},
	}

	Ok(true)
}

async fn handle_scoring_job(service: &ScanService, job: &ScoringOutboxEntry) -> Result<()> {
	let facts: ProductFacts = serde_json::from_value(job.facts.clone())?;

	service.generate_score(job.product_id, &facts).await?;

	Ok(())
}

fn backoff_for_attempt(attempt: i32) -> Duration {
	let attempts = attempt.max(1) as u32;
	let exp = attempts.saturating_sub(1).min(6);
	let capped = BASE_BACKOFF_MS.saturating_mul(1 << exp).min(MAX_BACKOFF_MS);

	Duration::milliseconds(capped)
}

/// Error text lands in the outbox row where operators read it; keep bearer
/// tokens and key-value secrets out and bound its length.
fn sanitize_error(text: &str) -> String {
	let mut parts = Vec::new();
	let mut redact_next = false;

	for raw in text.split_whitespace() {
		let lowered = raw.to_ascii_lowercase();
		let mut word = raw.to_string();

		if redact_next {
			word = "[REDACTED]".to_string();
			redact_next = false;
		} else if ["api_key", "apikey", "password", "secret", "token"]
			.iter()
			.any(|key| lowered.starts_with(key) && (raw.contains('=') || raw.contains(':')))
		{
			let sep = if raw.contains('=') { '=' } else { ':' };
			let prefix = raw.split(sep).next().unwrap_or(raw);

			word = format!("{prefix}{sep}[REDACTED]");
		}

		if lowered == "bearer" {
			redact_next = true;
		}

		parts.push(word);
	}

	let mut out = parts.join(" ");

	if out.chars().count() > MAX_ERROR_CHARS {
		out = out.chars().take(MAX_ERROR_CHARS).collect();
		out.push_str("...");
	}

	out
}

fn to_std_duration(duration: Duration) -> StdDuration {
	let millis = duration.whole_milliseconds();

	if millis <= 0 {
		return StdDuration::from_millis(0);
	}

	StdDuration::from_millis(millis as u64)
}
