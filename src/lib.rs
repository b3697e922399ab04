//! astral: locality-sensitive hashing via A* lattice quantization.
//!
//! Buckets high-dimensional real vectors by quantizing them onto the
//! A* lattice: two vectors that land in the same bucket — or in
//! neighboring buckets under an extended probe set — are likely to be
//! geometrically close. Unlike random-projection LSH families, the
//! bucket shapes here are the lattice's Voronoi cells, which tile space
//! with near-optimal quantization error.
//!
//! # Queries
//!
//! An [`AStarEngine`] is built once for a fixed dimensionality, packing
//! radius and shell count, then answers three kinds of read-only query,
//! each delivering lattice points to a [`QuerySink`]:
//!
//! | Query | Delivers |
//! |-------|----------|
//! | [`AStarEngine::nearest`] | the closest lattice point |
//! | [`AStarEngine::delaunay`] | the `dim + 1` vertices of the containing Delaunay cell |
//! | [`AStarEngine::extended`] | all probes in the extended shells around the nearest hole |
//!
//! Sinks choose their payload (hash codes, c-vectors, point
//! coordinates) at compile time; ready-made collectors are provided.
//!
//! ```rust
//! use astral::{AStarEngine, HashCollector};
//!
//! # fn main() -> astral::Result<()> {
//! let engine = AStarEngine::new(3, 1.0, 2)?;
//!
//! // Bucket a vector.
//! let bucket = engine.nearest_hash(&[0.1, -0.7, 2.3])?;
//!
//! // Multi-probe: hash codes of every nearby bucket.
//! let mut probes = HashCollector::new();
//! engine.extended(&[0.1, -0.7, 2.3], &mut probes)?;
//! assert_eq!(probes.len(), engine.num_probes());
//! assert!(probes.hashes().contains(&bucket));
//! # Ok(())
//! # }
//! ```
//!
//! Consumers that need a hash → elements multimap wrap this engine and
//! iterate a probe sink per lookup.
//!
//! # References
//!
//! - McKilliam, Clarkson, Smith & Quinn (2008): "An algorithm to compute
//!   the nearest point in the lattice A_n*"
//! - Lv et al. (2007): "Multi-probe LSH: efficient indexing for
//!   high-dimensional similarity search"
//! - Conway & Sloane: "Sphere Packings, Lattices and Groups"

pub mod buffers;
pub mod engine;
pub mod error;
pub mod hash;
pub mod lattice;
pub mod probes;
pub mod scalars;

pub use engine::{
    AStarEngine, CVectorCollector, HashCollector, PointCollector, ProbeCollector, ProbeMatch,
    QuerySink,
};
pub use error::{LatticeError, Result};
pub use lattice::map::rho;
pub use probes::counts::{num_probes, num_zero_probes};
pub use scalars::{CElem, Cost, Distance, HashCode, Order, VElem, K, MAX_NUM_SHELLS};
