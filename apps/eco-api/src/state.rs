use std::sync::Arc;

use eco_service::ScanService;
use eco_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ScanService>,
}
impl AppState {
	pub async fn new(config: eco_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = ScanService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
