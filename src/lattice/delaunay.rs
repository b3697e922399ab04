//! Delaunay cell location.
//!
//! Finds the remainder-0 lattice point nearest to a representation-space
//! vector together with the permutation of dimensions that enumerates
//! the vertices of the Delaunay cell containing it: starting from the
//! k=0 code and decrementing `c[order[k-1]]` for k = 1..=n walks the
//! cell's vertices in remainder order.

use crate::buffers::WorkBuffs;
use crate::error::Result;
use crate::lattice::sort::sort_order;
use crate::scalars::{round_half_up, CElem, Order, VElem};

/// Locate the Delaunay cell of `v` (a representation-space vector of
/// `dim + 1` elements).
///
/// On return `c` is the c-vector of the nearest k=0 lattice point,
/// `xmod = v - (dim+1) * c` lies in the fundamental region, and `order`
/// is the vertex permutation. `identity` must hold the identity
/// permutation `0..=dim` (owned by the engine). May check out one
/// scratch buffer.
pub fn delaunay_cell(
    v: &[VElem],
    xmod: &mut [VElem],
    c: &mut [CElem],
    order: &mut [Order],
    identity: &[Order],
    buffs: &mut WorkBuffs<'_>,
) -> Result<()> {
    let dimp = v.len();
    let dimpd = dimp as f64;

    // First guess: round each scaled coordinate independently. h is the
    // sum of the code; a remainder-0 point needs h = 0.
    let mut h: i64 = 0;
    for i in 0..dimp {
        let cx = round_half_up(v[i] / dimpd);
        c[i] = cx;
        xmod[i] = v[i] - f64::from(cx) * dimpd;
        h += i64::from(cx);
    }

    if h == 0 {
        order[..dimp].copy_from_slice(&identity[..dimp]);
        sort_order(xmod, &mut order[..dimp]);
        return Ok(());
    }

    // h != 0: adjust the code at the |h| dimensions where the change
    // costs the least residual growth, then rotate the sorted order so
    // the adjusted dimensions move to the far end.
    let sortord = buffs.take::<Order>()?;
    sortord[..dimp].copy_from_slice(&identity[..dimp]);
    sort_order(xmod, &mut sortord[..dimp]);

    if h > 0 {
        let h = h as usize;
        for &idx in &sortord[..h] {
            c[idx as usize] -= 1;
            xmod[idx as usize] += dimpd;
        }
        let part = dimp - h;
        order[..part].copy_from_slice(&sortord[h..dimp]);
        order[part..dimp].copy_from_slice(&sortord[..h]);
    } else {
        let habs = (-h) as usize;
        let part = dimp - habs;
        for &idx in &sortord[part..dimp] {
            c[idx as usize] += 1;
            xmod[idx as usize] -= dimpd;
        }
        order[habs..dimp].copy_from_slice(&sortord[..part]);
        order[..habs].copy_from_slice(&sortord[part..dimp]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::BuffStack;
    use crate::lattice::map::{rho, to_lattice_space};

    fn cell(dim: usize, v: &[VElem]) -> (Vec<CElem>, Vec<VElem>, Vec<Order>) {
        let mut w = vec![0.0; dim + 1];
        to_lattice_space(rho(dim) / 1.0, v, &mut w);

        let mut stack = BuffStack::new(dim, 2).unwrap();
        let mut buffs = stack.buffs();
        let mut c = vec![0; dim + 1];
        let mut xmod = vec![0.0; dim + 1];
        let mut order = vec![0; dim + 1];
        let identity: Vec<Order> = (0..=dim as Order).collect();

        delaunay_cell(&w, &mut xmod, &mut c, &mut order, &identity, &mut buffs).unwrap();
        (c, xmod, order)
    }

    #[test]
    fn k0_code_sums_to_zero() {
        for v in [&[10.1, -0.2][..], &[6.1, -0.2][..], &[-3.7, 8.3][..]] {
            let (c, _, _) = cell(2, v);
            assert_eq!(c.iter().sum::<CElem>(), 0, "c = {:?}", c);
        }
    }

    #[test]
    fn known_cell_dim2() {
        // Worked example: the Delaunay vertices of (10.1, -0.2) at
        // packing radius 1 are (3,-1,-2), (3,-1,-3), (3,-2,-3).
        let (mut c, _, order) = cell(2, &[10.1, -0.2]);
        assert_eq!(c, [3, -1, -2]);

        c[order[0] as usize] -= 1;
        assert_eq!(c, [3, -1, -3]);

        c[order[1] as usize] -= 1;
        assert_eq!(c, [3, -2, -3]);
    }

    #[test]
    fn order_is_a_permutation() {
        for v in [&[0.2, 0.2, 0.2][..], &[5.9, -2.3, 1.1][..]] {
            let (_, _, order) = cell(3, v);
            let mut seen = [false; 4];
            for &o in &order {
                assert!(!seen[o as usize]);
                seen[o as usize] = true;
            }
        }
    }

    #[test]
    fn residuals_match_the_code() {
        let dim = 3;
        let v = [0.2, 0.2, 0.2];
        let mut w = vec![0.0; dim + 1];
        to_lattice_space(rho(dim) / 1.0, &v, &mut w);

        let (c, xmod, _) = cell(dim, &v);
        for i in 0..=dim {
            let expect = w[i] - f64::from(c[i]) * (dim as f64 + 1.0);
            assert!((xmod[i] - expect).abs() < 1e-12);
        }
    }
}
