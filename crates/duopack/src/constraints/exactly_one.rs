//! Structures and algorithms for the exactly-one constraint, which enforces
//! that exactly one of a list of 0/1 variables takes the value 1. In a
//! bin-packing model it places each object in exactly one bin.

use crate::{
	actions::{ConstraintInitActions, PropagationActions},
	constraints::Constraint,
	model::var::VarRef,
	solver::domains::Contradiction,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Value consistent propagator for the constraint `sum(x[i]) = 1`, where every
/// `x[i]` is a 0/1 variable.
pub struct ExactlyOne {
	/// Index of the object that has to be placed.
	pub(crate) object: usize,
	/// The variables of which exactly one must be 1.
	pub(crate) vars: Vec<VarRef>,
}

impl Constraint for ExactlyOne {
	fn initialize(&self, actions: &mut impl ConstraintInitActions) {
		for &x in &self.vars {
			actions.enqueue_on_change(x);
		}
	}

	#[tracing::instrument(
		name = "exactly_one",
		level = "trace",
		skip(self, actions),
		fields(object = self.object)
	)]
	fn propagate(&self, actions: &mut impl PropagationActions) -> Result<(), Contradiction> {
		let mut chosen = None;
		let mut open = None;
		let mut num_open = 0;
		for &x in &self.vars {
			match actions.get_int_val(x) {
				Some(1) => {
					if chosen.is_some() {
						// Placed in two bins at once
						return Err(Contradiction { var: x });
					}
					chosen = Some(x);
				}
				Some(_) => {}
				None => {
					num_open += 1;
					open = Some(x);
				}
			}
		}

		match (chosen, open) {
			(Some(x), _) => {
				for &y in self.vars.iter().filter(|&&y| y != x) {
					actions.set_int_val(y, 0)?;
				}
				Ok(())
			}
			(None, Some(x)) if num_open == 1 => actions.set_int_val(x, 1),
			(None, Some(_)) => Ok(()),
			// Every bin has been excluded
			(None, None) => Err(Contradiction { var: self.vars[0] }),
		}
	}
}
