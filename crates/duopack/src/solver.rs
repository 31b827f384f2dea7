//! Module containing the [`Solver`], which decides whether a [`Model`] has a
//! feasible packing and finds one if it does.

pub(crate) mod config;
pub(crate) mod domains;
pub(crate) mod engine;
pub(crate) mod initialization_context;
pub(crate) mod search;
pub(crate) mod solution;
pub(crate) mod statistics;
pub(crate) mod trail;

use std::{fmt, time::Instant};

use tracing::{debug, info};

use crate::{
	actions::InspectionActions,
	solver::{
		config::SearchConfig,
		domains::DomainStore,
		engine::PropagationEngine,
		search::{SearchContext, SearchController, SearchState},
		solution::Packing,
		statistics::SearchStatistics,
		trail::Checkpoint,
	},
	Model,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// The outcome of [`Solver::solve`].
pub enum SolveResult {
	/// A packing that places every object in exactly one bin within all
	/// capacities.
	Satisfied(Packing),
	/// The search space was exhausted; no feasible packing exists.
	Infeasible,
	/// The search was stopped before it could decide whether a feasible
	/// packing exists.
	Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Signal returned by a termination callback to indicate whether the search
/// should continue.
pub enum TerminationSignal {
	/// Continue the search.
	Continue,
	/// Stop the search as soon as possible.
	Terminate,
}

/// A solver for a single [`Model`], created using [`Model::to_solver`].
pub struct Solver<'m> {
	/// The model being solved.
	model: &'m Model,
	/// The current domains of the variables of the model.
	store: DomainStore,
	/// The propagation engine.
	engine: PropagationEngine,
	/// The limits placed on each search.
	config: SearchConfig,
	/// Statistics of the most recent search.
	stats: SearchStatistics,
	/// Callback polled before each search decision.
	terminate_cb: Option<Box<dyn FnMut() -> TerminationSignal + 'm>>,
}

impl<'m> Solver<'m> {
	/// Create a solver for `model` at its root state.
	pub(crate) fn new(model: &'m Model, config: SearchConfig) -> Self {
		Self {
			model,
			store: DomainStore::new(model),
			engine: PropagationEngine::new(model),
			config,
			stats: SearchStatistics::default(),
			terminate_cb: None,
		}
	}

	/// Set a callback that is polled before every search decision. When it
	/// returns [`TerminationSignal::Terminate`] the search stops and
	/// [`Solver::solve`] returns [`SolveResult::Unknown`].
	pub fn set_terminate_callback<F: FnMut() -> TerminationSignal + 'm>(&mut self, cb: Option<F>) {
		self.terminate_cb = cb.map(|f| Box::new(f) as Box<dyn FnMut() -> TerminationSignal + 'm>);
	}

	/// Statistics of the most recent call to [`Solver::solve`].
	pub fn statistics(&self) -> SearchStatistics {
		self.stats
	}

	/// The model that is being solved.
	pub fn model(&self) -> &'m Model {
		self.model
	}

	#[tracing::instrument(name = "solve", level = "debug", skip(self))]
	/// Search for a feasible packing of the model.
	///
	/// Every call starts again from the root, so repeated calls on the same
	/// solver return the same result.
	pub fn solve(&mut self) -> SolveResult {
		self.store.rollback(Checkpoint::ROOT);
		self.stats = SearchStatistics::default();

		let start = Instant::now();
		let node_limit = self.config.node_limit();
		let deadline = self.config.time_limit().map(|limit| start + limit);
		let terminate_cb = &mut self.terminate_cb;
		let should_stop = |stats: &SearchStatistics| {
			node_limit.is_some_and(|limit| stats.nodes >= limit)
				|| deadline.is_some_and(|deadline| Instant::now() >= deadline)
				|| terminate_cb
					.as_mut()
					.is_some_and(|cb| cb() == TerminationSignal::Terminate)
		};

		let mut ctx = SearchContext {
			model: self.model,
			store: &mut self.store,
			engine: &mut self.engine,
			stats: &mut self.stats,
		};
		let state = SearchController::default().run(&mut ctx, should_stop);
		info!(
			?state,
			nodes = self.stats.nodes,
			failures = self.stats.failures,
			propagations = self.stats.propagations,
			elapsed = ?start.elapsed(),
			"search completed"
		);

		match state {
			SearchState::Solved => SolveResult::Satisfied(self.extract_packing()),
			SearchState::Exhausted => SolveResult::Infeasible,
			SearchState::Aborted => SolveResult::Unknown,
			SearchState::Exploring | SearchState::Backtracking => {
				unreachable!("search returned in a non-terminal state")
			}
		}
	}

	/// Read the bin of every object from the fixed assignment variables.
	///
	/// In a solved state exactly one variable per object is 1, and the
	/// variables are ordered object-major, so the chosen variables list the
	/// objects in order.
	fn extract_packing(&self) -> Packing {
		let num_bins = self.model.num_bins();
		let assignment: Vec<usize> = self
			.model
			.assignment_vars()
			.filter(|&x| self.store.get_int_val(x) == Some(1))
			.map(|x| x.index() % num_bins)
			.collect();
		debug_assert_eq!(assignment.len(), self.model.num_objects());
		let packing = Packing::new(self.model, assignment);
		debug!(?packing, "extracted packing");
		packing
	}
}

impl fmt::Debug for Solver<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Solver")
			.field("model", &self.model)
			.field("store", &self.store)
			.field("engine", &self.engine)
			.field("config", &self.config)
			.field("stats", &self.stats)
			.field("terminate_cb", &self.terminate_cb.as_ref().map(|_| "..."))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::{cell::Cell, time::Duration};

	use expect_test::expect;
	use tracing_test::traced_test;

	use crate::{
		tests::{assert_valid_packing, brute_force_feasible, random_instance, XorShift},
		Bin, Measure, Model, Object, SearchConfig, SolveResult, TerminationSignal,
	};

	#[test]
	#[traced_test]
	fn test_trivial_fit() {
		let model = Model::new(
			[Object::new(10, 0), Object::new(20, 0), Object::new(30, 0)],
			[Bin::new(40, 0), Bin::new(30, 0)],
		)
		.unwrap();
		let mut slv = model.to_solver(&SearchConfig::default());
		let SolveResult::Satisfied(packing) = slv.solve() else {
			panic!("expected a packing");
		};
		expect![[r#"
    Packing {
        assignment: [
            0,
            0,
            1,
        ],
        loads: [
            [
                30,
                0,
            ],
            [
                30,
                0,
            ],
        ],
    }
"#]]
		.assert_debug_eq(&packing);
		assert_valid_packing(&model, &packing);
		assert_eq!(slv.statistics().nodes(), 2);
		assert_eq!(slv.statistics().failures(), 0);
	}

	#[test]
	#[traced_test]
	fn test_infeasible_by_capacity() {
		let model = Model::new(
			[Object::new(100, 0), Object::new(100, 0)],
			[Bin::new(10, 0), Bin::new(10, 0)],
		)
		.unwrap();
		let mut slv = model.to_solver(&SearchConfig::default());
		assert_eq!(slv.solve(), SolveResult::Infeasible);
		assert_eq!(slv.statistics().nodes(), 0);
	}

	#[test]
	fn test_exact_fit() {
		let model = Model::new([Object::new(40, 7)], [Bin::new(40, 7)]).unwrap();
		let mut slv = model.to_solver(&SearchConfig::default());
		let SolveResult::Satisfied(packing) = slv.solve() else {
			panic!("expected a packing");
		};
		assert_eq!(packing.assignment(), &[0]);
		assert_eq!(packing.load(0, Measure::Size), 40);
		assert_eq!(packing.load(0, Measure::Weight), 7);
		assert_eq!(slv.statistics().nodes(), 0);
	}

	#[test]
	#[traced_test]
	fn test_two_measure() {
		let model = Model::new(
			[
				Object::new(10, 10),
				Object::new(20, 20),
				Object::new(30, 30),
				Object::new(40, 22),
				Object::new(4, 24),
				Object::new(5, 54),
				Object::new(6, 16),
			],
			[
				Bin::new(40, 60),
				Bin::new(30, 70),
				Bin::new(7, 30),
				Bin::new(40, 80),
				Bin::new(90, 100),
			],
		)
		.unwrap();
		let mut slv = model.to_solver(&SearchConfig::default());
		let SolveResult::Satisfied(packing) = slv.solve() else {
			panic!("expected a packing");
		};
		assert_valid_packing(&model, &packing);
		assert!(slv.statistics().nodes() > 0);
	}

	#[test]
	fn test_packing_uses_every_bin() {
		let model = Model::new(
			[Object::new(5, 1), Object::new(5, 2), Object::new(5, 3)],
			[Bin::new(5, 9), Bin::new(5, 9), Bin::new(5, 9)],
		)
		.unwrap();
		let mut slv = model.to_solver(&SearchConfig::default());
		let SolveResult::Satisfied(packing) = slv.solve() else {
			panic!("expected a packing");
		};
		assert_eq!(packing.assignment(), &[0, 1, 2]);
		assert_eq!(packing.objects_in(2).collect::<Vec<_>>(), vec![2]);
		assert_eq!(packing.load(2, Measure::Weight), 3);
		assert_valid_packing(&model, &packing);
	}

	#[test]
	fn test_deterministic() {
		let model = Model::new(
			[
				Object::new(5, 3),
				Object::new(4, 4),
				Object::new(3, 5),
				Object::new(3, 1),
			],
			[Bin::new(8, 6), Bin::new(7, 7)],
		)
		.unwrap();
		let mut slv = model.to_solver(&SearchConfig::default());
		let first = slv.solve();
		let first_stats = slv.statistics();
		let second = slv.solve();
		assert_eq!(first, second);
		assert_eq!(first_stats, slv.statistics());

		let mut other = model.to_solver(&SearchConfig::default());
		assert_eq!(other.solve(), first);
	}

	#[test]
	fn test_complete_and_sound() {
		let mut rng = XorShift::new(0x5EED_CAFE);
		for _ in 0..200 {
			let model = random_instance(&mut rng, 10, 3);
			let mut slv = model.to_solver(&SearchConfig::default());
			match slv.solve() {
				SolveResult::Satisfied(packing) => assert_valid_packing(&model, &packing),
				SolveResult::Infeasible => assert!(
					!brute_force_feasible(&model),
					"solver missed a packing of {:?} into {:?}",
					model.objects(),
					model.bins()
				),
				SolveResult::Unknown => panic!("unlimited search returned unknown"),
			}
		}
	}

	#[test]
	fn test_node_limit() {
		// Needs at least a couple of decisions before the search can finish.
		let model = Model::new(
			[Object::new(3, 0), Object::new(3, 0), Object::new(2, 0)],
			[Bin::new(4, 0), Bin::new(4, 0)],
		)
		.unwrap();
		let config = SearchConfig::default().with_node_limit(1);
		let mut slv = model.to_solver(&config);
		assert_eq!(slv.solve(), SolveResult::Unknown);
		assert_eq!(slv.statistics().nodes(), 1);

		let mut unlimited = model.to_solver(&SearchConfig::default());
		assert_eq!(unlimited.solve(), SolveResult::Infeasible);
	}

	#[test]
	fn test_time_limit() {
		let model = Model::new(
			[Object::new(3, 0), Object::new(3, 0), Object::new(2, 0)],
			[Bin::new(4, 0), Bin::new(4, 0)],
		)
		.unwrap();
		let config = SearchConfig::default().with_time_limit(Duration::ZERO);
		let mut slv = model.to_solver(&config);
		assert_eq!(slv.solve(), SolveResult::Unknown);
		assert_eq!(slv.statistics().nodes(), 0);
	}

	#[test]
	fn test_terminate_callback() {
		let model = Model::new(
			[Object::new(3, 0), Object::new(3, 0), Object::new(2, 0)],
			[Bin::new(4, 0), Bin::new(4, 0)],
		)
		.unwrap();
		let polled = Cell::new(0);
		let mut slv = model.to_solver(&SearchConfig::default());
		slv.set_terminate_callback(Some(|| {
			polled.set(polled.get() + 1);
			if polled.get() > 1 {
				TerminationSignal::Terminate
			} else {
				TerminationSignal::Continue
			}
		}));
		assert_eq!(slv.solve(), SolveResult::Unknown);
		assert_eq!(slv.statistics().nodes(), 1);
		assert_eq!(polled.get(), 2);
	}

	#[test]
	fn test_statistics() {
		let model = Model::new(
			[Object::new(3, 0), Object::new(3, 0), Object::new(2, 0)],
			[Bin::new(4, 0), Bin::new(4, 0)],
		)
		.unwrap();
		let mut slv = model.to_solver(&SearchConfig::default());
		assert_eq!(slv.solve(), SolveResult::Infeasible);
		let stats = slv.statistics();
		assert!(stats.nodes() >= 2);
		assert!(stats.failures() >= 1);
		assert!(stats.failures() <= stats.nodes());
		assert!(stats.peak_depth() >= 1);
		assert!(stats.propagations() >= model.num_bins() as u64 * 2);
	}
}
