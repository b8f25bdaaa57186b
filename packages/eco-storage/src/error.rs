#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl Error {
	/// True when an insert lost a uniqueness race and the caller should
	/// re-read the winner's row instead of propagating.
	pub fn is_conflict(&self) -> bool {
		matches!(self, Self::Conflict(_))
	}
}
