//! Module that defines the main data structures to formulate, i.e. model, a
//! bin-packing instance to be solved.

pub(crate) mod constraint;
pub(crate) mod instance;
pub(crate) mod var;
