//! Definitions of the problem data: the objects to be packed, the bins they
//! are packed into, and the measures in which both are expressed.

use std::fmt::{self, Display};

use thiserror::Error;

use crate::IntVal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// The (independent) quantities in which objects are measured and bins are
/// limited.
pub enum Measure {
	/// The size (volume) of an object, or the size capacity of a bin.
	Size,
	/// The weight of an object, or the weight capacity of a bin.
	Weight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// An object that has to be placed in exactly one bin.
pub struct Object {
	/// The measures of the object, indexed by [`Measure::index`].
	measures: [IntVal; Measure::COUNT],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A bin that can hold objects up to (and including) its capacities.
pub struct Bin {
	/// The capacities of the bin, indexed by [`Measure::index`].
	capacities: [IntVal; Measure::COUNT],
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type used when the description of a problem instance is malformed,
/// and no [`crate::Model`] can be created for it.
pub enum InvalidInstance {
	#[error("the instance does not contain any objects")]
	/// No objects were given.
	EmptyObjects,
	#[error("the instance does not contain any bins")]
	/// No bins were given.
	EmptyBins,
	#[error("object {object} has negative {measure} {value}")]
	/// An object was given a negative measure.
	NegativeMeasure {
		/// Index of the offending object.
		object: usize,
		/// The measure that is negative.
		measure: Measure,
		/// The negative value.
		value: IntVal,
	},
	#[error("bin {bin} has negative {measure} capacity {value}")]
	/// A bin was given a negative capacity.
	NegativeCapacity {
		/// Index of the offending bin.
		bin: usize,
		/// The measure of which the capacity is negative.
		measure: Measure,
		/// The negative value.
		value: IntVal,
	},
	#[error("the total {measure} of all objects does not fit in a 64-bit integer")]
	/// The sum of a measure over all objects overflows [`IntVal`].
	MeasureOverflow {
		/// The measure whose sum overflows.
		measure: Measure,
	},
}

impl Measure {
	/// All measures, in the order used for indexing.
	pub const ALL: [Measure; Measure::COUNT] = [Measure::Size, Measure::Weight];
	/// The number of measures.
	pub const COUNT: usize = 2;

	/// Position of the measure in measure-indexed arrays.
	pub fn index(self) -> usize {
		match self {
			Measure::Size => 0,
			Measure::Weight => 1,
		}
	}
}

impl Display for Measure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Measure::Size => write!(f, "size"),
			Measure::Weight => write!(f, "weight"),
		}
	}
}

impl Object {
	/// Create a new object with the given size and weight.
	pub fn new(size: IntVal, weight: IntVal) -> Self {
		Self {
			measures: [size, weight],
		}
	}

	/// The value of the given measure for the object.
	pub fn measure(&self, measure: Measure) -> IntVal {
		self.measures[measure.index()]
	}

	/// The size of the object.
	pub fn size(&self) -> IntVal {
		self.measure(Measure::Size)
	}

	/// The weight of the object.
	pub fn weight(&self) -> IntVal {
		self.measure(Measure::Weight)
	}
}

impl From<(IntVal, IntVal)> for Object {
	fn from((size, weight): (IntVal, IntVal)) -> Self {
		Self::new(size, weight)
	}
}

impl Bin {
	/// Create a new bin with the given size and weight capacities.
	pub fn new(size_cap: IntVal, weight_cap: IntVal) -> Self {
		Self {
			capacities: [size_cap, weight_cap],
		}
	}

	/// The capacity of the bin in the given measure.
	pub fn capacity(&self, measure: Measure) -> IntVal {
		self.capacities[measure.index()]
	}

	/// The size capacity of the bin.
	pub fn size_cap(&self) -> IntVal {
		self.capacity(Measure::Size)
	}

	/// The weight capacity of the bin.
	pub fn weight_cap(&self) -> IntVal {
		self.capacity(Measure::Weight)
	}
}

impl From<(IntVal, IntVal)> for Bin {
	fn from((size_cap, weight_cap): (IntVal, IntVal)) -> Self {
		Self::new(size_cap, weight_cap)
	}
}

/// Check that a problem instance can be modelled, i.e. it has at least one
/// object and one bin, no negative values, and no measure whose total would
/// overflow during propagation.
pub(crate) fn validate(objects: &[Object], bins: &[Bin]) -> Result<(), InvalidInstance> {
	if objects.is_empty() {
		return Err(InvalidInstance::EmptyObjects);
	}
	if bins.is_empty() {
		return Err(InvalidInstance::EmptyBins);
	}
	for measure in Measure::ALL {
		let mut total: IntVal = 0;
		for (object, obj) in objects.iter().enumerate() {
			let value = obj.measure(measure);
			if value < 0 {
				return Err(InvalidInstance::NegativeMeasure {
					object,
					measure,
					value,
				});
			}
			total = total
				.checked_add(value)
				.ok_or(InvalidInstance::MeasureOverflow { measure })?;
		}
		for (bin, b) in bins.iter().enumerate() {
			let value = b.capacity(measure);
			if value < 0 {
				return Err(InvalidInstance::NegativeCapacity {
					bin,
					measure,
					value,
				});
			}
		}
	}
	Ok(())
}
