//! Probe precomputation.
//!
//! Everything here runs at engine construction: [`generator`] finds the
//! remainder-zero lattice points of the extended shells and expands
//! them into orbits, [`stream`] compresses the resulting probe sequence
//! into an incremental diff transcript, and [`counts`] predicts how
//! many probes there will be so both can allocate exactly and
//! cross-check their output. [`queue`], [`point_set`] and [`cost_set`]
//! are the generator's working structures.

pub mod cost_set;
pub mod counts;
pub mod generator;
pub mod point_set;
pub mod queue;
pub mod stream;

pub use counts::{num_probes, num_zero_probes};
pub use generator::{generate_probes, MAX_ZERO_PROBES_PER_SHELL};
pub use stream::{generate_probe_diffs, size_probe_stream};
