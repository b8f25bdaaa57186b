use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result};
use eco_storage::{db::Db, models::Company, queries};

/// Rating assigned to a company on first sighting, before any evidence.
pub const DEFAULT_SUSTAINABILITY_RATING: i32 = 50;

/// Case-insensitive lookup-or-create keyed on the merged brand string.
///
/// Two concurrent resolutions of an unseen brand must not produce two rows:
/// losing the insert race is recovered by re-reading the winner's row.
pub(crate) async fn resolve_company(
	db: &Db,
	brand: &str,
	now: OffsetDateTime,
) -> Result<Option<Company>> {
	let name = brand.trim();

	if name.is_empty() {
		return Ok(None);
	}
	if let Some(existing) = queries::find_company_by_name(db, name).await? {
		return Ok(Some(existing));
	}

	let company = Company {
		id: Uuid::new_v4(),
		name: name.to_string(),
		sustainability_rating: DEFAULT_SUSTAINABILITY_RATING,
		created_at: now,
		updated_at: now,
	};

	match queries::insert_company(db, &company).await {
		Ok(()) => Ok(Some(company)),
		Err(err) if err.is_conflict() => {
			tracing::info!(company = name, "Lost company insert race. Re-reading winner row.");

			let winner = queries::find_company_by_name(db, name).await?.ok_or_else(|| {
				Error::Storage {
					message: format!("Company {name} conflicted on insert but cannot be read."),
				}
			})?;

			Ok(Some(winner))
		},
		Err(err) => Err(err.into()),
	}
}
