use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod browser;
mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
	let parsed = cli::Cli::parse();
	init_tracing(parsed.global.verbose);

	match commands::run(parsed).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("{} {err:#}", "error:".red().bold());
			ExitCode::FAILURE
		}
	}
}

fn init_tracing(verbose: u8) {
	let default = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
