//! Definitions of constraints that are part of a model.

use index_vec::define_index_type;

use crate::{
	actions::{ConstraintInitActions, PropagationActions},
	constraints::{capacity::Capacity, exactly_one::ExactlyOne, Constraint},
	model::var::VarRef,
	solver::{domains::Contradiction, initialization_context::InitializationContext},
	Model,
};

define_index_type! {
	/// Reference type for the constraints in a [`Model`].
	pub(crate) struct ConstraintRef = u32;
}

#[allow(
	clippy::missing_docs_in_private_items,
	reason = "constraints are generally documented on their own types"
)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// An disambiguation of the different constraints objects that can be used in a
/// [`Model`] object.
///
/// This enum type is used to store the constraints in a [`Model`] and dispatch
/// propagation to them.
pub(crate) enum ConstraintStore {
	Capacity(Capacity),
	ExactlyOne(ExactlyOne),
}

impl ConstraintStore {
	/// Register the variables whose changes should trigger the propagation of
	/// the constraint.
	pub(crate) fn initialize(&self, actions: &mut impl ConstraintInitActions) {
		match self {
			ConstraintStore::Capacity(con) => con.initialize(actions),
			ConstraintStore::ExactlyOne(con) => con.initialize(actions),
		}
	}

	/// Tighten the domains of the variables in the constraint given the
	/// current domains of the others.
	pub(crate) fn propagate(
		&self,
		actions: &mut impl PropagationActions,
	) -> Result<(), Contradiction> {
		match self {
			ConstraintStore::Capacity(con) => con.propagate(actions),
			ConstraintStore::ExactlyOne(con) => con.propagate(actions),
		}
	}
}

impl From<Capacity> for ConstraintStore {
	fn from(value: Capacity) -> Self {
		Self::Capacity(value)
	}
}

impl From<ExactlyOne> for ConstraintStore {
	fn from(value: ExactlyOne) -> Self {
		Self::ExactlyOne(value)
	}
}

impl Model {
	/// Internal method to add a constraint to the model and subscribe it to the
	/// variables it depends on.
	pub(crate) fn add_constraint(&mut self, constraint: impl Into<ConstraintStore>) {
		let con = self.constraints.push(constraint.into());
		self.subscribe(con);
	}

	/// Subscribe the constraint `con` to changes in the variables it depends
	/// on.
	fn subscribe(&mut self, con: ConstraintRef) {
		let mut ctx = InitializationContext {
			con,
			vars: &mut self.vars,
		};
		self.constraints[con].initialize(&mut ctx);
	}

	/// The constraints that have to be reconsidered when the domain of `var`
	/// changes.
	pub(crate) fn watchers(&self, var: VarRef) -> &[ConstraintRef] {
		&self.vars[var].constraints
	}
}
