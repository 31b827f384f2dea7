//! Depth-first backtracking search over the assignment variables, with
//! propagation after every decision.

use tracing::{debug, trace};

use crate::{
	actions::InspectionActions,
	model::var::VarRef,
	solver::{
		domains::{Contradiction, DomainStore},
		engine::PropagationEngine,
		statistics::SearchStatistics,
		trail::Checkpoint,
	},
	IntVal, Model,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The states of the search controller.
pub(crate) enum SearchState {
	/// Making a new decision on an undetermined variable.
	Exploring,
	/// Undoing failed decisions until an untried alternative is found.
	Backtracking,
	/// Every assignment variable is fixed; terminal.
	Solved,
	/// Every alternative has failed, no solution exists; terminal.
	Exhausted,
	/// The search was stopped before it could finish; terminal.
	Aborted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A decision on the search stack.
struct ChoicePoint {
	/// The variable that was fixed.
	var: VarRef,
	/// The value the variable was fixed to.
	value: IntVal,
	/// The state of the domains before the decision was made.
	checkpoint: Checkpoint,
}

/// The (mutable) state shared between the components of the solver for the
/// duration of a search.
pub(crate) struct SearchContext<'a> {
	/// The model being solved.
	pub(crate) model: &'a Model,
	/// The current domains.
	pub(crate) store: &'a mut DomainStore,
	/// The propagation engine.
	pub(crate) engine: &'a mut PropagationEngine,
	/// The counters of the search.
	pub(crate) stats: &'a mut SearchStatistics,
}

#[derive(Debug, Default)]
/// Controller for a depth-first search that branches on the assignment
/// variables in a fixed order, trying the value 1 before 0.
pub(crate) struct SearchController {
	/// The decisions leading to the current node, oldest first.
	stack: Vec<ChoicePoint>,
}

impl SearchController {
	/// The order in which values are tried for every decision.
	const VALUE_ORDER: [IntVal; 2] = [1, 0];

	/// Run the search until it reaches a terminal state, which is returned.
	///
	/// `should_stop` is polled before every decision; returning `true` aborts
	/// the search.
	pub(crate) fn run(
		&mut self,
		ctx: &mut SearchContext<'_>,
		mut should_stop: impl FnMut(&SearchStatistics) -> bool,
	) -> SearchState {
		self.stack.clear();
		ctx.engine.enqueue_all(ctx.model);
		let mut state = match ctx.engine.propagate(ctx.model, ctx.store, ctx.stats) {
			Ok(()) => SearchState::Exploring,
			Err(_) => {
				debug!("contradiction at the root");
				SearchState::Exhausted
			}
		};

		loop {
			state = match state {
				SearchState::Exploring => match self.select(ctx) {
					Some(var) => self.descend(ctx, var, Self::VALUE_ORDER[0], &mut should_stop),
					None => SearchState::Solved,
				},
				SearchState::Backtracking => self.backtrack(ctx, &mut should_stop),
				SearchState::Solved | SearchState::Exhausted | SearchState::Aborted => {
					debug!(
						?state,
						nodes = ctx.stats.nodes,
						failures = ctx.stats.failures,
						"search finished"
					);
					return state;
				}
			}
		}
	}

	/// Select the first undetermined assignment variable in object-major
	/// order.
	///
	/// All variables before the most recent decision were fixed when it was
	/// made, so the scan resumes after it.
	fn select(&self, ctx: &SearchContext<'_>) -> Option<VarRef> {
		let start = self.stack.last().map_or(0, |cp| cp.var.index() + 1);
		ctx.model
			.assignment_vars()
			.skip(start)
			.find(|&x| ctx.store.get_int_val(x).is_none())
	}

	/// Make the decision `var = value` under a fresh checkpoint and propagate
	/// it.
	fn descend(
		&mut self,
		ctx: &mut SearchContext<'_>,
		var: VarRef,
		value: IntVal,
		should_stop: &mut impl FnMut(&SearchStatistics) -> bool,
	) -> SearchState {
		if should_stop(ctx.stats) {
			debug!(nodes = ctx.stats.nodes, "search stopped");
			return SearchState::Aborted;
		}
		ctx.stats.nodes += 1;
		let checkpoint = ctx.store.mark();
		self.stack.push(ChoicePoint {
			var,
			value,
			checkpoint,
		});
		ctx.stats.peak_depth = ctx.stats.peak_depth.max(self.stack.len());
		trace!(
			?var,
			value,
			depth = self.stack.len(),
			trail = ctx.store.trail_len(),
			"decide"
		);

		match self.apply(ctx, var, value) {
			Ok(()) => SearchState::Exploring,
			Err(_) => {
				ctx.stats.failures += 1;
				SearchState::Backtracking
			}
		}
	}

	/// Fix `var` to `value` and propagate to a fixpoint.
	fn apply(
		&self,
		ctx: &mut SearchContext<'_>,
		var: VarRef,
		value: IntVal,
	) -> Result<(), Contradiction> {
		if ctx.store.narrow(var, &(value..=value).into())? {
			ctx.engine.notify(ctx.model, var, None);
		}
		ctx.engine.propagate(ctx.model, ctx.store, ctx.stats)
	}

	/// Undo failed decisions until one has an untried value, and try it.
	fn backtrack(
		&mut self,
		ctx: &mut SearchContext<'_>,
		should_stop: &mut impl FnMut(&SearchStatistics) -> bool,
	) -> SearchState {
		while let Some(cp) = self.stack.pop() {
			ctx.store.rollback(cp.checkpoint);
			trace!(var = ?cp.var, value = cp.value, depth = self.stack.len(), "backtrack");
			let next = Self::VALUE_ORDER
				.iter()
				.skip_while(|&&v| v != cp.value)
				.nth(1);
			if let Some(&value) = next {
				return self.descend(ctx, cp.var, value, should_stop);
			}
		}
		SearchState::Exhausted
	}
}
