use index_vec::IndexVec;

use crate::{
	actions::ConstraintInitActions,
	model::{constraint::ConstraintRef, var::VarDef, var::VarRef},
};

/// Context in which a constraint that is being added to a model registers the
/// variables it watches.
pub(crate) struct InitializationContext<'a> {
	/// The constraint that is being initialized.
	pub(crate) con: ConstraintRef,
	/// The variable definitions, whose watch lists are extended.
	pub(crate) vars: &'a mut IndexVec<VarRef, VarDef>,
}

impl ConstraintInitActions for InitializationContext<'_> {
	fn enqueue_on_change(&mut self, var: VarRef) {
		let watchers = &mut self.vars[var].constraints;
		if watchers.last() != Some(&self.con) {
			watchers.push(self.con);
		}
	}
}
