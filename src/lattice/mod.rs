//! A* lattice geometry.
//!
//! The A* lattice (the dual of the root lattice A_n) lives in the
//! hyperplane `sum(x) = 0` of R^(n+1). Working-space vectors are carried
//! into that representation space by a scaled rotation ([`map`]), where
//! every lattice point has integer coordinates and a unique c-vector
//! code. [`closest`] finds the nearest lattice point, [`delaunay`] the
//! surrounding Delaunay cell, and [`sort`] supplies the permutation
//! machinery both need.
//!
//! # References
//!
//! - McKilliam, Clarkson, Smith & Quinn (2008): "An algorithm to compute
//!   the nearest point in the lattice A_n*"
//! - Conway & Sloane: "Sphere Packings, Lattices and Groups" (ch. 4,
//!   A_n* geometry)

pub mod closest;
pub mod delaunay;
pub mod map;
pub mod sort;

pub use closest::closest_point;
pub use delaunay::delaunay_cell;
pub use map::{cvector_k_to_point, cvector_to_point, from_lattice_space, rho, to_lattice_space};
pub use sort::sort_order;
