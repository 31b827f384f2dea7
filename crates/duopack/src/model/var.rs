//! Representation of the decision and auxiliary variables in a [`Model`].

use std::fmt::{self, Display};

use index_vec::define_index_type;

use crate::{model::constraint::ConstraintRef, IntSetVal, IntVal, Measure};

define_index_type! {
	/// Reference type for the variables in a [`crate::Model`].
	pub(crate) struct VarRef = u32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The role a variable plays in the model.
pub(crate) enum VarKind {
	/// A 0/1 decision on whether `object` is placed in `bin`.
	Assign {
		/// Index of the object.
		object: usize,
		/// Index of the bin.
		bin: usize,
	},
	/// The total of `measure` over all objects placed in `bin`.
	Load {
		/// Index of the bin.
		bin: usize,
		/// The measure that is summed.
		measure: Measure,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Definition of a variable in a [`crate::Model`].
pub(crate) struct VarDef {
	/// The role of the variable.
	pub(crate) kind: VarKind,
	/// The set of values the variable can take before any propagation.
	pub(crate) domain: IntSetVal,
	/// The list of (references to) constraints in which the variable appears.
	///
	/// This list is used to enqueue the constraints for propagation when the
	/// domain of the variable changes.
	pub(crate) constraints: Vec<ConstraintRef>,
}

impl Display for VarKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			VarKind::Assign { object, bin } => write!(f, "x[{object}][{bin}]"),
			VarKind::Load { bin, measure } => write!(f, "{measure}_load[{bin}]"),
		}
	}
}

impl VarDef {
	/// Create the definition of the 0/1 variable deciding whether `object` is
	/// placed in `bin`.
	pub(crate) fn assignment(object: usize, bin: usize) -> Self {
		Self::with_domain(VarKind::Assign { object, bin }, (0..=1).into())
	}

	/// Create the definition of the load variable of `bin` in `measure`, which
	/// can take any value up to the given capacity.
	pub(crate) fn load(bin: usize, measure: Measure, capacity: IntVal) -> Self {
		Self::with_domain(VarKind::Load { bin, measure }, (0..=capacity).into())
	}

	/// Create a new variable definition with the given domain.
	fn with_domain(kind: VarKind, domain: IntSetVal) -> Self {
		Self {
			kind,
			domain,
			constraints: Vec::new(),
		}
	}

	/// Whether the variable is a decision made by the search.
	pub(crate) fn is_decision(&self) -> bool {
		matches!(self.kind, VarKind::Assign { .. })
	}
}
