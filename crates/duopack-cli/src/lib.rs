//! Command line front end for the duopack solver. It reads a bin-packing
//! instance from a JSON file, searches for a packing, and prints it.

use std::{
	fmt::{self, Display},
	fs,
	io::{self, Write},
	path::PathBuf,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
	time::{Duration, Instant},
};

use duopack::{
	Bin, IntVal, Measure, Model, Object, Packing, SearchConfig, SearchStatistics, SolveResult,
	TerminationSignal,
};
use pico_args::Arguments;
use serde::Deserialize;
use tracing::{debug, info};
// Used by the `duopack` binary only.
use {ctrlc as _, tracing_subscriber as _};

/// Usage message of the `duopack` command.
pub const HELP: &str = "\
USAGE:
  duopack [OPTIONS] <instance.json>

OPTIONS:
  -h, --help                 Print this message
  -s, --statistics           Print search statistics after solving
  -t, --time-limit <DUR>     Stop searching after the given time (e.g. 10s, 1min)
      --node-limit <N>       Stop searching after the given number of decisions
  -v, --verbose              Increase the level of logging (repeatable)
";

/// Line printed after each packing.
const SOLUTION_SEPARATOR: &str = "----------";
/// Line printed when no packing exists.
const UNSATISFIABLE_MSG: &str = "=====UNSATISFIABLE=====";
/// Line printed when the search was stopped before it finished.
const UNKNOWN_MSG: &str = "=====UNKNOWN=====";

#[derive(Debug)]
/// Parsed command line invocation of the `duopack` command.
pub struct Cli<Stdout> {
	/// Path to the JSON instance file.
	path: PathBuf,
	/// Whether to print search statistics.
	statistics: bool,
	/// Number of times the verbose flag was given.
	verbose: u8,
	/// Wall-clock time limit for the search.
	time_limit: Option<Duration>,
	/// Limit on the number of search decisions.
	node_limit: Option<u64>,
	/// Flag set (e.g. by a signal handler) to stop the search.
	interrupted: Arc<AtomicBool>,
	/// Output stream for packings and statistics.
	stdout: Stdout,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
/// JSON representation of an instance.
struct InstanceSpec {
	/// The objects to be placed.
	objects: Vec<MeasuredSpec>,
	/// The available bins.
	bins: Vec<MeasuredSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
/// JSON representation of an object or bin: its size and weight, or the
/// capacities thereof.
struct MeasuredSpec {
	/// Size or size capacity.
	size: IntVal,
	#[serde(default)]
	/// Weight or weight capacity, zero when left out.
	weight: IntVal,
}

/// Statistics line in the format used by MiniZinc.
struct Stat<'a, V: Display>(&'a str, V);

impl<Stdout: Write> Cli<Stdout> {
	/// Replace the output stream of the command.
	pub fn with_stdout<W: Write>(self, stdout: W) -> Cli<W> {
		Cli {
			path: self.path,
			statistics: self.statistics,
			verbose: self.verbose,
			time_limit: self.time_limit,
			node_limit: self.node_limit,
			interrupted: self.interrupted,
			stdout,
		}
	}

	/// Number of times the verbose flag was given.
	pub fn verbose(&self) -> u8 {
		self.verbose
	}

	/// Flag that, once set, stops a running search.
	pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
		Arc::clone(&self.interrupted)
	}

	/// Read, solve, and print the instance.
	pub fn run(&mut self) -> Result<(), String> {
		let text = fs::read_to_string(&self.path)
			.map_err(|err| format!("unable to read {}: {err}", self.path.display()))?;
		self.run_instance(&text)
	}

	/// Solve and print the instance given as JSON text.
	fn run_instance(&mut self, text: &str) -> Result<(), String> {
		let spec: InstanceSpec = serde_json::from_str(text)
			.map_err(|err| format!("unable to parse {}: {err}", self.path.display()))?;
		let model = Model::new(
			spec.objects
				.iter()
				.map(|o| Object::new(o.size, o.weight)),
			spec.bins.iter().map(|b| Bin::new(b.size, b.weight)),
		)
		.map_err(|err| format!("invalid instance {}: {err}", self.path.display()))?;
		debug!(path = %self.path.display(), objects = model.num_objects(), bins = model.num_bins(), "read instance");

		let mut config = SearchConfig::default();
		if let Some(limit) = self.node_limit {
			config = config.with_node_limit(limit);
		}
		if let Some(limit) = self.time_limit {
			config = config.with_time_limit(limit);
		}
		let mut slv = model.to_solver(&config);
		let interrupted = Arc::clone(&self.interrupted);
		slv.set_terminate_callback(Some(move || {
			if interrupted.load(Ordering::SeqCst) {
				TerminationSignal::Terminate
			} else {
				TerminationSignal::Continue
			}
		}));

		let start = Instant::now();
		let result = slv.solve();
		let solve_time = start.elapsed();
		info!(?solve_time, "solver finished");

		self.print_result(&model, &result)
			.and_then(|()| {
				if self.statistics {
					self.print_statistics(&slv.statistics(), solve_time)
				} else {
					Ok(())
				}
			})
			.map_err(|err| format!("unable to write output: {err}"))
	}

	/// Print the outcome of the search.
	fn print_result(&mut self, model: &Model, result: &SolveResult) -> io::Result<()> {
		match result {
			SolveResult::Satisfied(packing) => {
				self.print_packing(model, packing)?;
				writeln!(self.stdout, "{SOLUTION_SEPARATOR}")
			}
			SolveResult::Infeasible => writeln!(self.stdout, "{UNSATISFIABLE_MSG}"),
			SolveResult::Unknown => writeln!(self.stdout, "{UNKNOWN_MSG}"),
		}
	}

	/// Print the content and load of every bin.
	fn print_packing(&mut self, model: &Model, packing: &Packing) -> io::Result<()> {
		for bin in 0..packing.num_bins() {
			write!(self.stdout, "Bin {bin}:")?;
			for obj in packing.objects_in(bin) {
				let o = &model.objects()[obj];
				write!(self.stdout, " {obj}({}/{})", o.size(), o.weight())?;
			}
			writeln!(
				self.stdout,
				" [{}/{}]",
				packing.load(bin, Measure::Size),
				packing.load(bin, Measure::Weight)
			)?;
		}
		Ok(())
	}

	/// Print the statistics of the search.
	fn print_statistics(&mut self, stats: &SearchStatistics, solve_time: Duration) -> io::Result<()> {
		writeln!(self.stdout, "{}", Stat("nodes", stats.nodes()))?;
		writeln!(self.stdout, "{}", Stat("failures", stats.failures()))?;
		writeln!(self.stdout, "{}", Stat("propagations", stats.propagations()))?;
		writeln!(self.stdout, "{}", Stat("peakDepth", stats.peak_depth()))?;
		writeln!(
			self.stdout,
			"{}",
			Stat("solveTime", solve_time.as_secs_f64())
		)?;
		writeln!(self.stdout, "%%%mzn-stat-end")
	}
}

impl TryFrom<Arguments> for Cli<io::Stdout> {
	type Error = String;

	fn try_from(mut args: Arguments) -> Result<Self, Self::Error> {
		let mut verbose = 0;
		while args.contains(["-v", "--verbose"]) {
			verbose += 1;
		}
		let statistics = args.contains(["-s", "--statistics"]);
		let time_limit = args
			.opt_value_from_fn(["-t", "--time-limit"], humantime::parse_duration)
			.map_err(|err| err.to_string())?;
		let node_limit = args
			.opt_value_from_str("--node-limit")
			.map_err(|err| err.to_string())?;
		let path: PathBuf = args.free_from_str().map_err(|err| err.to_string())?;

		let remaining = args.finish();
		if !remaining.is_empty() {
			return Err(format!("unexpected arguments: {remaining:?}"));
		}

		Ok(Self {
			path,
			statistics,
			verbose,
			time_limit,
			node_limit,
			interrupted: Arc::default(),
			stdout: io::stdout(),
		})
	}
}

impl<V: Display> Display for Stat<'_, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "%%%mzn-stat: {}={}", self.0, self.1)
	}
}
