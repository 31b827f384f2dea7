//! Configuration of the search performed by a [`crate::Solver`].

use std::time::Duration;

#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
/// Configuration object for the search process of a [`crate::Solver`].
///
/// By default the search is unlimited, and runs until it finds a solution or
/// proves that none exists.
pub struct SearchConfig {
	/// The maximum number of search nodes to explore.
	node_limit: Option<u64>,
	/// The maximum wall-clock time a single solve may take.
	time_limit: Option<Duration>,
}

impl SearchConfig {
	/// Get the maximum number of search nodes to explore, if any.
	pub fn node_limit(&self) -> Option<u64> {
		self.node_limit
	}

	/// Get the maximum wall-clock time a single solve may take, if any.
	pub fn time_limit(&self) -> Option<Duration> {
		self.time_limit
	}

	/// Change the maximum number of search nodes to explore.
	pub fn with_node_limit(mut self, limit: u64) -> Self {
		self.node_limit = Some(limit);
		self
	}

	/// Change the maximum wall-clock time a single solve may take.
	pub fn with_time_limit(mut self, limit: Duration) -> Self {
		self.time_limit = Some(limit);
		self
	}
}
