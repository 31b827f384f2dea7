//! The domain store: the current set of possible values of every variable,
//! and the means to restore earlier domains when the search backtracks.

use index_vec::IndexVec;
use rangelist::IntervalIterator;
use thiserror::Error;
use tracing::trace;

use crate::{
	actions::InspectionActions,
	model::var::VarRef,
	solver::trail::{Checkpoint, Trail},
	IntSetVal, IntVal, Model,
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("the domain of variable {var:?} became empty")]
/// Error raised when narrowing would leave a variable without any possible
/// value, proving that the current search branch has no solution.
pub(crate) struct Contradiction {
	/// The variable whose domain would have become empty.
	pub(crate) var: VarRef,
}

#[derive(Debug, Clone)]
/// Owner of the current domains of all variables of a [`Model`].
///
/// Domains only ever shrink through [`DomainStore::narrow`]. The only way to
/// widen a domain is to [`DomainStore::rollback`] to a checkpoint taken before
/// it was narrowed.
pub(crate) struct DomainStore {
	/// The current domain of every variable.
	domains: IndexVec<VarRef, IntSetVal>,
	/// The undo log of all narrowings.
	trail: Trail,
}

impl DomainStore {
	/// Create a domain store with the initial domains of the variables in
	/// `model`.
	pub(crate) fn new(model: &Model) -> Self {
		Self {
			domains: model.vars.iter().map(|v| v.domain.clone()).collect(),
			trail: Trail::default(),
		}
	}

	/// The current domain of `var`.
	pub(crate) fn domain_of(&self, var: VarRef) -> &IntSetVal {
		&self.domains[var]
	}

	/// Restrict the domain of `var` to the values that are also in `domain`.
	///
	/// Returns whether the domain changed. The prior domain is recorded on the
	/// trail for every change.
	pub(crate) fn narrow(&mut self, var: VarRef, domain: &IntSetVal) -> Result<bool, Contradiction> {
		let narrowed: IntSetVal = self.domains[var].intersect(domain);
		if narrowed.is_empty() {
			trace!(?var, "contradiction");
			return Err(Contradiction { var });
		}
		if narrowed == self.domains[var] {
			return Ok(false);
		}
		let prior = std::mem::replace(&mut self.domains[var], narrowed);
		trace!(?var, ?prior, domain = ?self.domains[var], "narrow");
		self.trail.push(var, prior);
		Ok(true)
	}

	/// Take a checkpoint of the current domains.
	pub(crate) fn mark(&self) -> Checkpoint {
		self.trail.checkpoint()
	}

	/// Restore the domains of all variables to their state at `checkpoint`.
	pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
		for entry in self.trail.undo(checkpoint) {
			self.domains[entry.var] = entry.prior;
		}
	}

	/// The number of narrowings since the domains were created.
	pub(crate) fn trail_len(&self) -> usize {
		self.trail.len()
	}
}

impl InspectionActions for DomainStore {
	fn get_domain(&self, var: VarRef) -> &IntSetVal {
		self.domain_of(var)
	}

	fn get_int_lower_bound(&self, var: VarRef) -> IntVal {
		*self.domains[var]
			.lower_bound()
			.expect("domains are never empty")
	}

	fn get_int_upper_bound(&self, var: VarRef) -> IntVal {
		*self.domains[var]
			.upper_bound()
			.expect("domains are never empty")
	}
}

#[cfg(test)]
mod tests {
	use crate::{
		actions::InspectionActions,
		solver::{
			domains::{Contradiction, DomainStore},
			trail::Checkpoint,
		},
		Bin, IntSetVal, Measure, Model, Object,
	};

	fn model() -> Model {
		Model::new([Object::new(3, 4), Object::new(5, 6)], [Bin::new(10, 20)]).unwrap()
	}

	#[test]
	fn test_initial_domains() {
		let model = model();
		let store = DomainStore::new(&model);
		assert_eq!(
			store.domain_of(model.assignment_var(1, 0)),
			&IntSetVal::from(0..=1)
		);
		assert_eq!(
			store.get_int_bounds(model.load_var(0, Measure::Weight)),
			(0, 20)
		);
		assert_eq!(store.trail_len(), 0);
	}

	#[test]
	fn test_narrow_never_widens() {
		let model = model();
		let mut store = DomainStore::new(&model);
		let load = model.load_var(0, Measure::Size);

		assert_eq!(store.narrow(load, &(2..=7).into()), Ok(true));
		// A superset leaves the domain as it is, and records nothing.
		assert_eq!(store.narrow(load, &(0..=100).into()), Ok(false));
		assert_eq!(store.get_int_bounds(load), (2, 7));
		// A partially overlapping set only removes values.
		assert_eq!(store.narrow(load, &(5..=50).into()), Ok(true));
		assert_eq!(store.get_int_bounds(load), (5, 7));
		assert_eq!(store.trail_len(), 2);
	}

	#[test]
	fn test_narrow_to_empty() {
		let model = model();
		let mut store = DomainStore::new(&model);
		let x = model.assignment_var(0, 0);

		assert_eq!(store.narrow(x, &(2..=3).into()), Err(Contradiction { var: x }));
		// A failed narrowing leaves the domain untouched.
		assert_eq!(store.domain_of(x), &IntSetVal::from(0..=1));
		assert_eq!(store.trail_len(), 0);
	}

	#[test]
	fn test_rollback_restores() {
		let model = model();
		let mut store = DomainStore::new(&model);
		let x = model.assignment_var(0, 0);
		let load = model.load_var(0, Measure::Size);

		let _ = store.narrow(load, &(0..=8).into()).unwrap();
		let outer = store.mark();
		let _ = store.narrow(x, &(1..=1).into()).unwrap();
		let inner = store.mark();
		let _ = store.narrow(load, &(3..=8).into()).unwrap();
		let _ = store.narrow(load, &(3..=3).into()).unwrap();

		store.rollback(inner);
		assert_eq!(store.get_int_val(x), Some(1));
		assert_eq!(store.get_int_bounds(load), (0, 8));

		store.rollback(outer);
		assert_eq!(store.get_int_val(x), None);
		assert_eq!(store.get_int_bounds(load), (0, 8));

		store.rollback(Checkpoint::ROOT);
		assert_eq!(store.get_int_bounds(load), (0, 10));
		assert_eq!(store.trail_len(), 0);
	}
}
