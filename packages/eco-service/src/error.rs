pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid barcode: {message}")]
	Validation { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Score parse error: {message}")]
	ScoreParse { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<eco_storage::Error> for Error {
	fn from(err: eco_storage::Error) -> Self {
		match err {
			eco_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			eco_storage::Error::NotFound(message) => Self::NotFound { message },
			// Conflicts are recovered by re-read before this conversion runs;
			// one that still propagates is an infrastructure failure.
			eco_storage::Error::Conflict(message) => Self::Storage { message },
		}
	}
}
