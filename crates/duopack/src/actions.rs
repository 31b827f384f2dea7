//! Traits that define the different actions that constraints can take, and
//! the information they can inspect, at the different stages of their
//! lifetime.

use crate::{model::var::VarRef, solver::domains::Contradiction, IntSetVal, IntVal};

/// Actions that can be performed when a constraint is added to a model.
pub(crate) trait ConstraintInitActions {
	/// Enqueue the constraint for propagation whenever the domain of `var`
	/// changes.
	fn enqueue_on_change(&mut self, var: VarRef);
}

/// Actions that can be used to inspect the current domains of variables.
pub(crate) trait InspectionActions {
	/// Get the current domain of `var`.
	fn get_domain(&self, var: VarRef) -> &IntSetVal;

	/// Get the current lower bound of `var`.
	fn get_int_lower_bound(&self, var: VarRef) -> IntVal;

	/// Get the current upper bound of `var`.
	fn get_int_upper_bound(&self, var: VarRef) -> IntVal;

	/// Get the current lower and upper bound of `var`.
	fn get_int_bounds(&self, var: VarRef) -> (IntVal, IntVal) {
		(self.get_int_lower_bound(var), self.get_int_upper_bound(var))
	}

	/// Get the value of `var`, if it is fixed.
	fn get_int_val(&self, var: VarRef) -> Option<IntVal> {
		let (lb, ub) = self.get_int_bounds(var);
		if lb == ub {
			Some(lb)
		} else {
			None
		}
	}

	/// Check whether `val` is still in the domain of `var`.
	fn check_int_in_domain(&self, var: VarRef, val: IntVal) -> bool {
		self.get_domain(var).contains(&val)
	}
}

/// Actions that can be performed by a constraint during propagation.
///
/// All methods only ever remove values from domains. A method returns a
/// [`Contradiction`] when its change would leave a variable without any
/// possible value.
pub(crate) trait PropagationActions: InspectionActions {
	/// Restrict the domain of `var` to the values in `values`.
	fn set_int_in_set(&mut self, var: VarRef, values: &IntSetVal) -> Result<(), Contradiction>;

	/// Remove all values smaller than `lb` from the domain of `var`.
	fn set_int_lower_bound(&mut self, var: VarRef, lb: IntVal) -> Result<(), Contradiction> {
		let (cur_lb, ub) = self.get_int_bounds(var);
		if lb <= cur_lb {
			Ok(())
		} else if lb > ub {
			Err(Contradiction { var })
		} else {
			self.set_int_in_set(var, &(lb..=ub).into())
		}
	}

	/// Remove all values larger than `ub` from the domain of `var`.
	fn set_int_upper_bound(&mut self, var: VarRef, ub: IntVal) -> Result<(), Contradiction> {
		let (lb, cur_ub) = self.get_int_bounds(var);
		if ub >= cur_ub {
			Ok(())
		} else if ub < lb {
			Err(Contradiction { var })
		} else {
			self.set_int_in_set(var, &(lb..=ub).into())
		}
	}

	/// Fix `var` to take the value `val`.
	fn set_int_val(&mut self, var: VarRef, val: IntVal) -> Result<(), Contradiction> {
		if !self.check_int_in_domain(var, val) {
			return Err(Contradiction { var });
		}
		self.set_int_in_set(var, &(val..=val).into())
	}
}
