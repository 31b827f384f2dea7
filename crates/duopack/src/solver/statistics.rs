//! Counters describing the effort spent by a search.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Statistics gathered during a single call to [`crate::Solver::solve`].
pub struct SearchStatistics {
	/// Number of search nodes, i.e. branching decisions tried.
	pub(crate) nodes: u64,
	/// Number of decisions that led to a contradiction.
	pub(crate) failures: u64,
	/// Number of times a constraint was propagated.
	pub(crate) propagations: u64,
	/// The largest number of decisions on the search stack at once.
	pub(crate) peak_depth: usize,
}

impl SearchStatistics {
	/// Number of search nodes, i.e. branching decisions tried.
	pub fn nodes(&self) -> u64 {
		self.nodes
	}

	/// Number of decisions that led to a contradiction.
	pub fn failures(&self) -> u64 {
		self.failures
	}

	/// Number of times a constraint was propagated.
	pub fn propagations(&self) -> u64 {
		self.propagations
	}

	/// The largest number of decisions on the search stack at once.
	pub fn peak_depth(&self) -> usize {
		self.peak_depth
	}
}
