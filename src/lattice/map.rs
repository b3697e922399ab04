//! The isometry between working space and lattice representation space.
//!
//! The representation space is R^(n+1); the image of working space is
//! the hyperplane `sum(x) = 0`, where A* points have integer
//! coordinates. Both directions are implemented directly from the
//! decomposition of the rotation along `(1, ..., 1, 0)` and
//! `(0, ..., 0, 1)`, so no matrix is materialized.

use crate::scalars::{CElem, Distance, K, VElem};

/// The packing radius of the A* lattice in representation space:
/// `rho(n) = sqrt(n(n+1)) / 2`.
pub fn rho(dim: usize) -> Distance {
    (dim as f64 * (dim as f64 + 1.0)).sqrt() / 2.0
}

/// Map a working-space vector into representation space, rescaling by
/// `scale`. `v` has `dim` elements, `out` has `dim + 1`.
pub fn to_lattice_space(scale: Distance, v: &[VElem], out: &mut [VElem]) {
    let dim = v.len();
    debug_assert!(dim >= 1);
    debug_assert_eq!(out.len(), dim + 1);

    let sum: f64 = v.iter().sum();

    // The norm of the vector (1, ..., 1).
    let norm = (dim as f64 + 1.0).sqrt();

    let v_n = -sum / norm;
    let t = (v_n + sum) / dim as f64;

    for (o, &x) in out[..dim].iter_mut().zip(v.iter()) {
        *o = scale * (x - t);
    }
    out[dim] = scale * v_n;
}

/// Map a representation-space vector back to working space, undoing the
/// rescale. `w` has `dim + 1` elements, `out` has `dim`. Exact inverse
/// of [`to_lattice_space`] up to floating-point rounding.
pub fn from_lattice_space(scale: Distance, w: &[VElem], out: &mut [VElem]) {
    let dim = out.len();
    debug_assert!(dim >= 1);
    debug_assert_eq!(w.len(), dim + 1);

    let norm = (dim as f64 + 1.0).sqrt();
    let t = w[dim] * (norm - dim as f64 - 1.0) / dim as f64 / norm;

    for (o, &x) in out.iter_mut().zip(w[..dim].iter()) {
        *o = (x + t) / scale;
    }
}

/// Representation-space coordinates of the lattice point coded by `c`
/// with remainder `k`: `p[i] = -((n+1) * c[i] + k)`.
pub fn cvector_k_to_point(c: &[CElem], k: K, out: &mut [VElem]) {
    let dimp = c.len() as CElem;
    for (o, &ci) in out.iter_mut().zip(c.iter()) {
        *o = -f64::from(ci * dimp + k);
    }
}

/// Representation-space coordinates of the lattice point coded by `c`,
/// deriving the remainder from the code itself (`k = -sum(c)`).
pub fn cvector_to_point(c: &[CElem], out: &mut [VElem]) {
    let k: K = -c.iter().sum::<CElem>();
    cvector_k_to_point(c, k, out);
}
