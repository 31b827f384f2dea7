//! The result of a successful search: the bin of every object and the loads
//! this gives each bin.

use crate::{IntVal, Measure, Model};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// A feasible packing, extracted from the fixed decision variables when the
/// search succeeds.
pub struct Packing {
	/// The bin in which each object is placed, indexed by object.
	assignment: Vec<usize>,
	/// The realized load of each bin, indexed by bin and measure.
	loads: Vec<[IntVal; Measure::COUNT]>,
}

impl Packing {
	/// Create the packing that places object `i` in bin `assignment[i]`.
	pub(crate) fn new(model: &Model, assignment: Vec<usize>) -> Self {
		let mut loads = vec![[0; Measure::COUNT]; model.num_bins()];
		for (obj, &bin) in model.objects().iter().zip(&assignment) {
			for m in Measure::ALL {
				loads[bin][m.index()] += obj.measure(m);
			}
		}
		Self { assignment, loads }
	}

	/// The bin index of every object, indexed by object.
	pub fn assignment(&self) -> &[usize] {
		&self.assignment
	}

	/// The bin in which `object` is placed.
	pub fn bin_of(&self, object: usize) -> usize {
		self.assignment[object]
	}

	/// The objects placed in `bin`, in increasing order.
	pub fn objects_in(&self, bin: usize) -> impl Iterator<Item = usize> + '_ {
		self.assignment
			.iter()
			.enumerate()
			.filter_map(move |(obj, &b)| (b == bin).then_some(obj))
	}

	/// The total of `measure` over the objects placed in `bin`.
	pub fn load(&self, bin: usize, measure: Measure) -> IntVal {
		self.loads[bin][measure.index()]
	}

	/// The number of bins in the packed instance.
	pub fn num_bins(&self) -> usize {
		self.loads.len()
	}
}
