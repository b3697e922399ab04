//! Closest A* lattice point.
//!
//! A variation on Algorithm 2 of McKilliam, Clarkson, Smith & Quinn
//! (2008). The residuals of the scaled input are bucket-sorted into
//! `dim + 1` singly-linked buckets, then a single walk over the buckets
//! locates the offset count minimizing the squared distance
//! `beta * (n+1) - alpha^2`. Runs in O(n) time and needs three scratch
//! buffers.

use crate::buffers::WorkBuffs;
use crate::error::Result;
use crate::scalars::{round_half_up, CElem, Order, VElem, END, K};

/// Find the c-vector `c` and remainder `k` of the A* point nearest to
/// `v`, a representation-space vector of `dim + 1` elements.
///
/// `c` receives the code; the remainder is returned. Checks out three
/// scratch buffers from `buffs`.
pub fn closest_point(v: &[VElem], c: &mut [CElem], buffs: &mut WorkBuffs<'_>) -> Result<K> {
    let dimp = v.len();
    let dim = dimp - 1;
    let dimpd = dimp as f64;

    let z = buffs.take::<VElem>()?;
    let link = buffs.take::<Order>()?;
    let bucket = buffs.take::<Order>()?;

    bucket[..dimp].fill(END);

    let mut sum: i64 = 0;
    let mut alpha: f64 = 0.0;
    let mut beta: f64 = 0.0;

    for i in 0..dimp {
        let y_i = v[i] / dimpd;
        let r_i = round_half_up(y_i);
        let z_i = y_i - f64::from(r_i); // -0.5 <= z_i < 0.5

        sum += i64::from(r_i);
        c[i] = r_i;
        z[i] = z_i;
        alpha += z_i;
        beta += z_i * z_i;

        // Bucket sort on z. Truncation performs floor, as
        // dimpd * (z_i + 0.5) is in [0, dim + 1).
        let ii = dim - (dimpd * (z_i + 0.5)) as usize;
        link[i] = bucket[ii];
        bucket[ii] = i as Order;
    }

    let mut d_min = beta * dimpd - alpha * alpha;
    let mut min_bucket: Option<usize> = None;

    for b in 0..dimp {
        let mut t = bucket[b];
        if t == END {
            continue;
        }
        loop {
            alpha -= 1.0;
            beta = beta - 2.0 * z[t as usize] + 1.0;
            t = link[t as usize];
            if t == END {
                break;
            }
        }

        let d = beta * dimpd - alpha * alpha;
        if d < d_min {
            d_min = d;
            min_bucket = Some(b);
        }
    }

    // Every element in buckets up to and including the minimizing one
    // gets its coordinate incremented.
    if let Some(m) = min_bucket {
        for b in 0..=m {
            let mut t = bucket[b];
            while t != END {
                c[t as usize] += 1;
                sum += 1;
                t = link[t as usize];
            }
        }
    }

    let dimp_i = dimp as i64;
    let k = ((-sum).rem_euclid(dimp_i)) as K;
    let s_k = ((sum + i64::from(k)) / dimp_i) as CElem;

    // Convert the k-vector into a c-vector in place.
    for ci in c[..dimp].iter_mut() {
        *ci -= s_k;
    }

    Ok(k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::BuffStack;
    use crate::lattice::map::{cvector_k_to_point, rho, to_lattice_space};

    fn nearest(dim: usize, w: &[VElem]) -> (Vec<CElem>, K) {
        let mut stack = BuffStack::new(dim, 4).unwrap();
        let mut buffs = stack.buffs();
        let mut c = vec![0; dim + 1];
        let k = closest_point(w, &mut c, &mut buffs).unwrap();
        (c, k)
    }

    #[test]
    fn origin_maps_to_the_zero_code() {
        let (c, k) = nearest(4, &[0.0; 5]);
        assert_eq!(c, [0, 0, 0, 0, 0]);
        assert_eq!(k, 0);
    }

    #[test]
    fn known_point_dim2() {
        // Worked example: v = (6.1, -0.2) mapped with packing radius 1
        // quantizes to c = (1, -1, -2), k = 2.
        let v = [6.1, -0.2];
        let mut w = [0.0; 3];
        to_lattice_space(rho(2) / 1.0, &v, &mut w);

        let (c, k) = nearest(2, &w);
        assert_eq!(c, [1, -1, -2]);
        assert_eq!(k, 2);
    }

    #[test]
    fn remainder_matches_code_sum() {
        let vs: [&[VElem]; 3] = [
            &[0.3, 1.9, -4.2, 0.01],
            &[7.7, -3.1, 0.4, 5.5],
            &[-0.5, -0.5, 0.5, 0.5],
        ];
        for v in vs {
            let mut w = [0.0; 5];
            to_lattice_space(rho(4) / 0.7, v, &mut w);
            let (c, k) = nearest(4, &w);
            let sum: i64 = c.iter().map(|&x| i64::from(x)).sum();
            assert_eq!(i64::from(k), (-sum).rem_euclid(5));
        }
    }

    /// Squared distance between `w` and the lattice point coded by
    /// `(c, k)`. A code's point sits at `-((n+1)c + k)`, mirrored
    /// through the origin; the quantizer minimizes `|w + p|`.
    fn code_dist(w: &[VElem], c: &[CElem], k: K) -> f64 {
        let mut p = vec![0.0; c.len()];
        cvector_k_to_point(c, k, &mut p);
        w.iter().zip(p.iter()).map(|(a, b)| (a + b) * (a + b)).sum()
    }

    #[test]
    fn returned_point_is_no_farther_than_its_neighbors() {
        // Spot-check optimality: the returned code must be at least as
        // close to w as every code obtained by perturbing it.
        let v = [1.3, -0.8, 2.05];
        let mut w = [0.0; 4];
        to_lattice_space(rho(3) / 1.0, &v, &mut w);

        let (c, k) = nearest(3, &w);
        let best = code_dist(&w, &c, k);

        for i in 0..4 {
            for delta in [-1, 1] {
                let mut c2 = c.clone();
                c2[i] += delta;
                let k2 = -c2.iter().sum::<CElem>();
                let d2 = code_dist(&w, &c2, k2);
                assert!(best <= d2 + 1e-9, "perturbed code is closer: {} < {}", d2, best);
            }
        }
    }
}
