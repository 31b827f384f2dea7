//! Helpers shared by the unit tests of the crate.

use crate::{
	constraints::capacity::Capacity,
	model::{constraint::ConstraintStore, var::VarRef},
	solver::{
		domains::{Contradiction, DomainStore},
		engine::PropagationEngine,
		statistics::SearchStatistics,
	},
	Bin, IntVal, Measure, Model, Object, Packing,
};

impl Model {
	/// The capacity constraint of `bin` in `measure`.
	pub(crate) fn capacity(&self, bin: usize, measure: Measure) -> &Capacity {
		let con = &self.constraints[bin * Measure::COUNT + measure.index()];
		let ConstraintStore::Capacity(con) = con else {
			panic!("constraint {con:?} is not a capacity constraint")
		};
		assert_eq!((con.bin, con.measure), (bin, measure));
		con
	}
}

/// Propagate all constraints of `model` from its initial domains.
pub(crate) fn propagate_root(model: &Model) -> Result<DomainStore, Contradiction> {
	propagate_with(model, &[])
}

/// Propagate all constraints of `model`, then fix each of the given variables
/// in turn and propagate again after every fix.
pub(crate) fn propagate_with(
	model: &Model,
	decisions: &[(VarRef, IntVal)],
) -> Result<DomainStore, Contradiction> {
	let mut store = DomainStore::new(model);
	let mut engine = PropagationEngine::new(model);
	let mut stats = SearchStatistics::default();

	engine.enqueue_all(model);
	engine.propagate(model, &mut store, &mut stats)?;
	for &(var, val) in decisions {
		if store.narrow(var, &(val..=val).into())? {
			engine.notify(model, var, None);
		}
		engine.propagate(model, &mut store, &mut stats)?;
	}
	Ok(store)
}

/// Small deterministic pseudo random number generator for generating test
/// instances.
pub(crate) struct XorShift(u64);

impl XorShift {
	/// Create a generator from a (non-zero) seed.
	pub(crate) fn new(seed: u64) -> Self {
		assert_ne!(seed, 0);
		Self(seed)
	}

	/// Draw a value uniformly from `lo..=hi`.
	pub(crate) fn range(&mut self, lo: IntVal, hi: IntVal) -> IntVal {
		self.0 ^= self.0 << 13;
		self.0 ^= self.0 >> 7;
		self.0 ^= self.0 << 17;
		lo + (self.0 % (hi - lo + 1) as u64) as IntVal
	}
}

/// Create a random instance with 1 to `max_objects` objects and 1 to
/// `max_bins` bins, with capacities that make both outcomes likely.
pub(crate) fn random_instance(rng: &mut XorShift, max_objects: usize, max_bins: usize) -> Model {
	let n = rng.range(1, max_objects as IntVal) as usize;
	let m = rng.range(1, max_bins as IntVal) as usize;
	let objects = (0..n)
		.map(|_| Object::new(rng.range(0, 9), rng.range(0, 9)))
		.collect::<Vec<_>>();
	let bins = (0..m)
		.map(|_| Bin::new(rng.range(0, 20), rng.range(0, 20)))
		.collect::<Vec<_>>();
	Model::new(objects, bins).unwrap()
}

/// Decide by enumerating all assignments whether the instance of `model` has
/// a feasible packing.
pub(crate) fn brute_force_feasible(model: &Model) -> bool {
	fn place(model: &Model, object: usize, loads: &mut [[IntVal; Measure::COUNT]]) -> bool {
		let Some(obj) = model.objects().get(object) else {
			return true;
		};
		for (bin, b) in model.bins().iter().enumerate() {
			if Measure::ALL
				.iter()
				.all(|&m| loads[bin][m.index()] + obj.measure(m) <= b.capacity(m))
			{
				for m in Measure::ALL {
					loads[bin][m.index()] += obj.measure(m);
				}
				let found = place(model, object + 1, loads);
				for m in Measure::ALL {
					loads[bin][m.index()] -= obj.measure(m);
				}
				if found {
					return true;
				}
			}
		}
		false
	}
	place(model, 0, &mut vec![[0; Measure::COUNT]; model.num_bins()])
}

/// Check that `packing` places every object of `model` in one bin, reports
/// the right loads, and respects all capacities.
pub(crate) fn assert_valid_packing(model: &Model, packing: &Packing) {
	assert_eq!(packing.assignment().len(), model.num_objects());
	assert_eq!(packing.num_bins(), model.num_bins());
	for (bin, b) in model.bins().iter().enumerate() {
		for m in Measure::ALL {
			let load: IntVal = packing
				.objects_in(bin)
				.map(|obj| model.objects()[obj].measure(m))
				.sum();
			assert_eq!(packing.load(bin, m), load);
			assert!(
				load <= b.capacity(m),
				"bin {bin} holds {load} {m}, more than its capacity {}",
				b.capacity(m)
			);
		}
	}
	for (obj, &bin) in packing.assignment().iter().enumerate() {
		assert_eq!(packing.bin_of(obj), bin);
		assert!(bin < model.num_bins());
	}
}
