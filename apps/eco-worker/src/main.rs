use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = eco_worker::Args::parse();

	eco_worker::run(args).await
}
