//! The `ortho` command line spell checker.

mod check;
mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	match cli.command {
		Command::Check(args) => {
			let found = check::check(&args, &mut std::io::stdout()).await?;
			info!(files = args.paths.len(), misspellings = found, "cli.check.done");
			Ok(if found > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
		}
		Command::Accept { word, personal, config } => {
			if check::accept(&word, personal.as_deref(), config.as_deref())? {
				println!("added {word}");
			} else {
				println!("{word} is already in the personal dictionary");
			}
			Ok(ExitCode::SUCCESS)
		}
	}
}
