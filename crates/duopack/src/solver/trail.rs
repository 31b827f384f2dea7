//! The trail: an undo log of domain changes that allows the solver to restore
//! the exact domains of an earlier point in the search.

use crate::{model::var::VarRef, IntSetVal};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A position on the [`Trail`] to which the domains can later be restored.
pub(crate) struct Checkpoint(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
/// The record of a single domain change: the variable that was narrowed, and
/// the domain it had before.
pub(crate) struct TrailEntry {
	/// The variable that was narrowed.
	pub(crate) var: VarRef,
	/// The domain of the variable before the change.
	pub(crate) prior: IntSetVal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Append-only log of domain changes, truncated only when changes are undone.
pub(crate) struct Trail {
	/// The changes in the order they were made.
	entries: Vec<TrailEntry>,
}

impl Checkpoint {
	/// The checkpoint before any change was made.
	pub(crate) const ROOT: Checkpoint = Checkpoint(0);
}

impl Trail {
	/// Record that `var` is about to be changed from domain `prior`.
	pub(crate) fn push(&mut self, var: VarRef, prior: IntSetVal) {
		self.entries.push(TrailEntry { var, prior });
	}

	/// The current position of the trail.
	pub(crate) fn checkpoint(&self) -> Checkpoint {
		Checkpoint(self.entries.len())
	}

	/// The number of changes recorded.
	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}

	/// Remove all changes made since `checkpoint`, returning them from the most
	/// recent to the oldest.
	///
	/// Restoring the prior domains in the returned order results in the
	/// domains as they were when the checkpoint was taken.
	pub(crate) fn undo(&mut self, checkpoint: Checkpoint) -> impl Iterator<Item = TrailEntry> + '_ {
		debug_assert!(
			checkpoint.0 <= self.entries.len(),
			"checkpoint {} is beyond the trail of length {}",
			checkpoint.0,
			self.entries.len()
		);
		let start = checkpoint.0.min(self.entries.len());
		self.entries.drain(start..).rev()
	}
}
