//! # Duopack - A Propagation Based Two-Measure Bin-Packing Solver
//!
//! Duopack decides whether a set of objects, each with a size and a weight,
//! can be placed into a set of bins such that no bin exceeds its size capacity
//! or its weight capacity. If a placement exists, Duopack finds one.
//!
//! The problem is modelled using a 0/1 decision variable for every pair of
//! object and bin, and a load variable for every bin and measure. Bounds
//! consistent propagators for the capacity and exactly-one constraints remove
//! impossible values, and a deterministic depth-first search decides the
//! remaining variables.
//!
//! ```
//! use duopack::{Bin, Model, Object, SearchConfig, SolveResult};
//!
//! let model = Model::new(
//! 	[Object::new(10, 1), Object::new(20, 2), Object::new(30, 3)],
//! 	[Bin::new(40, 5), Bin::new(30, 5)],
//! )
//! .unwrap();
//! let mut slv = model.to_solver(&SearchConfig::default());
//! let SolveResult::Satisfied(packing) = slv.solve() else {
//! 	panic!("expected a packing");
//! };
//! assert_eq!(packing.assignment(), &[0, 0, 1]);
//! ```

pub(crate) mod actions;
pub(crate) mod constraints;
pub(crate) mod model;
pub(crate) mod solver;
#[cfg(test)]
pub(crate) mod tests;

use index_vec::IndexVec;
use itertools::Itertools;
use rangelist::RangeList;
use tracing::debug;

use crate::{
	constraints::{capacity::Capacity, exactly_one::ExactlyOne},
	model::{
		constraint::{ConstraintRef, ConstraintStore},
		instance::validate,
		var::{VarDef, VarRef},
	},
};
pub use crate::{
	model::instance::{Bin, InvalidInstance, Measure, Object},
	solver::{
		config::SearchConfig, solution::Packing, statistics::SearchStatistics, SolveResult,
		Solver, TerminationSignal,
	},
};

/// Type alias for the integer values used for measures, capacities, and
/// variable domains.
pub type IntVal = i64;

/// Type alias for the set of values a variable can take.
pub(crate) type IntSetVal = RangeList<IntVal>;

#[derive(Debug, Clone)]
/// A formulation of a bin-packing instance in terms of decisions and
/// constraints.
///
/// A model is immutable once created, and any number of [`Solver`] instances
/// can be created from it.
pub struct Model {
	/// The objects to be placed.
	objects: Vec<Object>,
	/// The bins in which the objects are placed.
	bins: Vec<Bin>,
	/// The definitions of all variables: first the assignment variables in
	/// object-major order, then the load variables bin by bin.
	pub(crate) vars: IndexVec<VarRef, VarDef>,
	/// The constraints of the model: first the capacity constraints bin by bin,
	/// then one exactly-one constraint per object.
	pub(crate) constraints: IndexVec<ConstraintRef, ConstraintStore>,
}

impl Model {
	/// Create the model of placing `objects` into `bins`.
	///
	/// An [`InvalidInstance`] error is returned when there are no objects or no
	/// bins, when a measure or capacity is negative, or when the total of a
	/// measure over all objects cannot be represented.
	pub fn new<I, J>(objects: I, bins: J) -> Result<Self, InvalidInstance>
	where
		I: IntoIterator,
		I::Item: Into<Object>,
		J: IntoIterator,
		J::Item: Into<Bin>,
	{
		let objects = objects.into_iter().map_into().collect_vec();
		let bins = bins.into_iter().map_into().collect_vec();
		validate(&objects, &bins)?;

		let mut model = Self {
			vars: IndexVec::with_capacity(objects.len() * bins.len() + bins.len() * Measure::COUNT),
			constraints: IndexVec::with_capacity(bins.len() * Measure::COUNT + objects.len()),
			objects,
			bins,
		};

		for object in 0..model.num_objects() {
			for bin in 0..model.num_bins() {
				let _ = model.vars.push(VarDef::assignment(object, bin));
			}
		}
		for (bin, b) in model.bins.iter().enumerate() {
			for measure in Measure::ALL {
				let _ = model
					.vars
					.push(VarDef::load(bin, measure, b.capacity(measure)));
			}
		}

		for bin in 0..model.num_bins() {
			for measure in Measure::ALL {
				let terms = model
					.bin_vars(bin)
					.zip(&model.objects)
					.map(|(x, o)| (x, o.measure(measure)))
					.collect_vec();
				let load = model.load_var(bin, measure);
				model.add_constraint(Capacity::new(bin, measure, terms, load));
			}
		}
		for object in 0..model.num_objects() {
			let vars = model.object_vars(object).collect_vec();
			model.add_constraint(ExactlyOne { object, vars });
		}

		debug!(
			objects = model.num_objects(),
			bins = model.num_bins(),
			vars = model.vars.len(),
			constraints = model.constraints.len(),
			"created model"
		);
		Ok(model)
	}

	/// The number of objects to be placed.
	pub fn num_objects(&self) -> usize {
		self.objects.len()
	}

	/// The number of bins available.
	pub fn num_bins(&self) -> usize {
		self.bins.len()
	}

	/// The objects to be placed, in the order they were given.
	pub fn objects(&self) -> &[Object] {
		&self.objects
	}

	/// The available bins, in the order they were given.
	pub fn bins(&self) -> &[Bin] {
		&self.bins
	}

	/// The variable deciding whether `object` is placed in `bin`.
	pub(crate) fn assignment_var(&self, object: usize, bin: usize) -> VarRef {
		debug_assert!(object < self.num_objects() && bin < self.num_bins());
		VarRef::new(object * self.num_bins() + bin)
	}

	/// The variable holding the total of `measure` over the objects placed in
	/// `bin`.
	pub(crate) fn load_var(&self, bin: usize, measure: Measure) -> VarRef {
		debug_assert!(bin < self.num_bins());
		VarRef::new(
			self.num_objects() * self.num_bins() + bin * Measure::COUNT + measure.index(),
		)
	}

	/// The assignment variables of `object`, one for each bin in order.
	pub(crate) fn object_vars(&self, object: usize) -> impl Iterator<Item = VarRef> + '_ {
		(0..self.num_bins()).map(move |bin| self.assignment_var(object, bin))
	}

	/// The assignment variables of `bin`, one for each object in order.
	pub(crate) fn bin_vars(&self, bin: usize) -> impl Iterator<Item = VarRef> + '_ {
		(0..self.num_objects()).map(move |object| self.assignment_var(object, bin))
	}

	/// All assignment variables, in the (object-major) order in which the
	/// search decides them.
	pub(crate) fn assignment_vars(&self) -> impl Iterator<Item = VarRef> + '_ {
		self.vars
			.iter_enumerated()
			.take_while(|(_, def)| def.is_decision())
			.map(|(var, _)| var)
	}

	/// Create a [`Solver`] that searches for a packing of the model, within the
	/// limits of the given configuration.
	pub fn to_solver(&self, config: &SearchConfig) -> Solver<'_> {
		Solver::new(self, config.clone())
	}
}
