//! Entry point of the `duopack` command.

use std::{io, process::ExitCode, sync::atomic::Ordering};

use duopack_cli::{Cli, HELP};
use pico_args::Arguments;
use tracing::{level_filters::LevelFilter, warn};
// Used through the `duopack_cli` library.
#[cfg(test)]
use expect_test as _;
use {duopack as _, humantime as _, serde as _, serde_json as _};

/// Parse the command line, set up logging and interrupt handling, and run the
/// solver.
fn main() -> ExitCode {
	let mut args = Arguments::from_env();
	if args.contains(["-h", "--help"]) {
		print!("{HELP}");
		return ExitCode::SUCCESS;
	}

	let cli: Result<Cli<io::Stdout>, _> = args.try_into();
	let mut cli = match cli {
		Ok(cli) => cli,
		Err(err) => {
			eprintln!("Error: {err}\n\n{HELP}");
			return ExitCode::FAILURE;
		}
	};

	let level = match cli.verbose() {
		0 => LevelFilter::WARN,
		1 => LevelFilter::INFO,
		2 => LevelFilter::DEBUG,
		_ => LevelFilter::TRACE,
	};
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_writer(io::stderr)
		.init();

	let interrupted = cli.interrupt_flag();
	if let Err(err) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
		warn!(%err, "unable to install interrupt handler");
	}

	match cli.run() {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("Error: {err}");
			ExitCode::FAILURE
		}
	}
}
