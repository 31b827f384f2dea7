//! The propagation engine, which applies the constraints of a model to the
//! domain store until no constraint can remove any further values.

use std::collections::VecDeque;

use delegate::delegate;
use index_vec::IndexVec;
use tracing::trace;

use crate::{
	actions::{InspectionActions, PropagationActions},
	model::{constraint::ConstraintRef, var::VarRef},
	solver::{
		domains::{Contradiction, DomainStore},
		statistics::SearchStatistics,
	},
	IntSetVal, IntVal, Model,
};

#[derive(Debug, Clone)]
/// Queue based propagation engine.
///
/// A constraint is (re-)enqueued whenever the domain of one of the variables
/// it watches changes. The queue is empty exactly when the domains are at a
/// fixpoint of all constraints.
pub(crate) struct PropagationEngine {
	/// A queue of constraints that need to be propagated.
	queue: VecDeque<ConstraintRef>,
	/// A flag for each constraint whether it has been enqueued for propagation.
	enqueued: IndexVec<ConstraintRef, bool>,
	/// Variables changed by the constraint that is currently propagated.
	changed: Vec<VarRef>,
}

/// Context in which a single constraint is propagated, recording which
/// variables it changes.
struct PropagationContext<'a> {
	/// The domains that are being narrowed.
	store: &'a mut DomainStore,
	/// The variables whose domain was changed.
	changed: &'a mut Vec<VarRef>,
}

impl PropagationEngine {
	/// Create an engine for the constraints of `model`, with an empty queue.
	pub(crate) fn new(model: &Model) -> Self {
		Self {
			queue: VecDeque::with_capacity(model.constraints.len()),
			enqueued: IndexVec::from_vec(vec![false; model.constraints.len()]),
			changed: Vec::new(),
		}
	}

	/// Enqueue constraint `con` to the propagation queue.
	fn enqueue(&mut self, con: ConstraintRef) {
		if !self.enqueued[con] {
			self.queue.push_back(con);
			self.enqueued[con] = true;
		}
	}

	/// Enqueue every constraint in the model.
	pub(crate) fn enqueue_all(&mut self, model: &Model) {
		for con in model.constraints.indices() {
			self.enqueue(con);
		}
	}

	/// Enqueue the constraints watching `var`, other than `source`.
	pub(crate) fn notify(&mut self, model: &Model, var: VarRef, source: Option<ConstraintRef>) {
		for &con in model.watchers(var) {
			if Some(con) != source {
				self.enqueue(con);
			}
		}
	}

	/// Empty the queue without propagating.
	fn clear(&mut self) {
		for con in self.queue.drain(..) {
			self.enqueued[con] = false;
		}
		self.changed.clear();
	}

	/// Propagate the enqueued constraints until the queue is empty.
	///
	/// If a constraint finds a contradiction, the remaining queue is discarded
	/// and the contradiction is returned. The domains are then left in a
	/// partially propagated state that the caller is expected to roll back.
	pub(crate) fn propagate(
		&mut self,
		model: &Model,
		store: &mut DomainStore,
		stats: &mut SearchStatistics,
	) -> Result<(), Contradiction> {
		while let Some(con) = self.queue.pop_front() {
			self.enqueued[con] = false;
			stats.propagations += 1;

			let mut ctx = PropagationContext {
				store: &mut *store,
				changed: &mut self.changed,
			};
			if let Err(err) = model.constraints[con].propagate(&mut ctx) {
				trace!(?con, var = %model.vars[err.var].kind, "propagation failed");
				self.clear();
				return Err(err);
			}

			let changed = std::mem::take(&mut self.changed);
			for &var in &changed {
				self.notify(model, var, Some(con));
			}
			self.changed = changed;
			self.changed.clear();
		}
		Ok(())
	}
}

impl InspectionActions for PropagationContext<'_> {
	delegate! {
		to self.store {
			fn get_domain(&self, var: VarRef) -> &IntSetVal;
			fn get_int_lower_bound(&self, var: VarRef) -> IntVal;
			fn get_int_upper_bound(&self, var: VarRef) -> IntVal;
		}
	}
}

impl PropagationActions for PropagationContext<'_> {
	fn set_int_in_set(&mut self, var: VarRef, values: &IntSetVal) -> Result<(), Contradiction> {
		if self.store.narrow(var, values)? {
			self.changed.push(var);
		}
		Ok(())
	}
}
