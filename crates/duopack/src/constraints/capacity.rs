//! Structures and algorithms for the capacity constraint, which enforces that
//! the load of a bin in one measure equals the weighted sum of the objects
//! placed in it. The capacity itself is the upper bound of the load
//! variable's domain.

use itertools::Itertools;

use crate::{
	actions::{ConstraintInitActions, InspectionActions, PropagationActions},
	constraints::Constraint,
	model::var::VarRef,
	solver::domains::Contradiction,
	IntVal, Measure,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Bounds consistent propagator for the scalar constraint
/// `sum(w[i] * x[i]) = load`, where every `x[i]` is a 0/1 variable.
pub struct Capacity {
	/// Index of the bin the constraint limits.
	pub(crate) bin: usize,
	/// The measure in which the bin is limited.
	pub(crate) measure: Measure,
	/// The 0/1 variables and the (positive) weight each contributes when set
	/// to 1.
	pub(crate) terms: Vec<(VarRef, IntVal)>,
	/// The variable representing the sum.
	pub(crate) load: VarRef,
}

impl Capacity {
	/// Create a new capacity constraint.
	///
	/// Terms with a zero weight can never influence the load and are left
	/// out.
	pub(crate) fn new(
		bin: usize,
		measure: Measure,
		terms: impl IntoIterator<Item = (VarRef, IntVal)>,
		load: VarRef,
	) -> Self {
		let terms = terms.into_iter().filter(|&(_, w)| w != 0).collect_vec();
		debug_assert!(terms.iter().all(|&(_, w)| w > 0));
		Self {
			bin,
			measure,
			terms,
			load,
		}
	}

	/// Compute the smallest and largest sum the terms can still reach.
	fn sum_bounds(&self, actions: &impl InspectionActions) -> (IntVal, IntVal) {
		self.terms
			.iter()
			.fold((0, 0), |(min, max), &(x, w)| {
				let (lb, ub) = actions.get_int_bounds(x);
				(min + w * lb, max + w * ub)
			})
	}
}

impl Constraint for Capacity {
	fn initialize(&self, actions: &mut impl ConstraintInitActions) {
		for &(x, _) in &self.terms {
			actions.enqueue_on_change(x);
		}
		actions.enqueue_on_change(self.load);
	}

	// propagation rules:
	//   load in [sum w[i] * lb(x[i]), sum w[i] * ub(x[i])]
	//   x[i] = 0 if min + w[i] > ub(load)
	//   x[i] = 1 if max - w[i] < lb(load)
	#[tracing::instrument(
		name = "capacity",
		level = "trace",
		skip(self, actions),
		fields(bin = self.bin, measure = %self.measure)
	)]
	fn propagate(&self, actions: &mut impl PropagationActions) -> Result<(), Contradiction> {
		loop {
			let (min, max) = self.sum_bounds(actions);

			// A committed load above the capacity empties the load domain here.
			actions.set_int_lower_bound(self.load, min)?;
			actions.set_int_upper_bound(self.load, max)?;
			let (lo, hi) = actions.get_int_bounds(self.load);

			let mut changed = false;
			for &(x, w) in &self.terms {
				if actions.get_int_val(x).is_some() {
					continue;
				}
				if min + w > hi {
					actions.set_int_val(x, 0)?;
					changed = true;
				} else if max - w < lo {
					actions.set_int_val(x, 1)?;
					changed = true;
				}
			}
			// Fixing terms moves the sum bounds, repeat to stay idempotent.
			if !changed {
				return Ok(());
			}
		}
	}
}
