pub mod worker;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eco_service::ScanService;

#[derive(Debug, Parser)]
#[command(
	version = eco_cli::VERSION,
	rename_all = "kebab",
	styles = eco_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = eco_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = eco_storage::db::Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let service = ScanService::new(config, db);

	worker::run_worker(worker::WorkerState { service }).await
}
