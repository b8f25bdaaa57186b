use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = eco_api::Args::parse();

	eco_api::run(args).await
}
