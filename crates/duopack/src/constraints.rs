//! Module containing the constraints that make up a bin-packing model, and
//! the trait through which the propagation engine uses them.

pub(crate) mod capacity;
pub(crate) mod exactly_one;

use std::fmt::Debug;

use crate::{
	actions::{ConstraintInitActions, PropagationActions},
	solver::domains::Contradiction,
};

/// A trait for a constraint that is called during the search process to filter
/// the domains of the variables it contains, and to detect inconsistencies.
pub(crate) trait Constraint: Debug {
	/// Method called when the constraint is added to a model, to register the
	/// variables whose changes should cause the constraint to be propagated.
	fn initialize(&self, actions: &mut impl ConstraintInitActions);

	/// The propagate method removes values from the domains of the constraint's
	/// variables that cannot be part of any solution given the current domains
	/// of the other variables.
	///
	/// Implementations must be idempotent: directly propagating the constraint
	/// again must not change any domain.
	fn propagate(&self, actions: &mut impl PropagationActions) -> Result<(), Contradiction>;
}
