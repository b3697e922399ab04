//! The query engine.
//!
//! [`AStarEngine`] ties the pieces together: it owns the probe-diff
//! stream, the hash power table and the identity permutation — all
//! built once at construction — and drives the three query kinds
//! against a caller-supplied [`QuerySink`]:
//!
//! - [`nearest`](AStarEngine::nearest): the single closest lattice
//!   point (the containing Voronoi cell),
//! - [`delaunay`](AStarEngine::delaunay): the `dim + 1` vertices of the
//!   containing Delaunay cell,
//! - [`extended`](AStarEngine::extended): every lattice point in the
//!   extended shells around the nearest hole, replayed from the
//!   precomputed diff stream.
//!
//! An engine is immutable after construction and safe to share by
//! reference across threads; per-query scratch lives on a
//! [`BuffStack`] scoped to the call.

pub mod sink;

pub use sink::{CVectorCollector, HashCollector, PointCollector, ProbeCollector, ProbeMatch, QuerySink};

use crate::buffers::{BuffStack, WorkBuffs};
use crate::error::{LatticeError, Result};
use crate::hash::{hash, HashPowers};
use crate::lattice::closest::closest_point;
use crate::lattice::delaunay::delaunay_cell;
use crate::lattice::map::{cvector_k_to_point, cvector_to_point, from_lattice_space, rho, to_lattice_space};
use crate::probes::counts::num_probes;
use crate::probes::generator::generate_probes;
use crate::probes::stream::generate_probe_diffs;
use crate::scalars::{CElem, Distance, HashCode, Order, VElem, K, MAX_NUM_SHELLS, STREAM_MARK};

/// A* lattice hasher with multi-probe queries.
#[derive(Debug)]
pub struct AStarEngine {
    dim: usize,
    packing_radius: Distance,
    num_shells: u32,
    scale: Distance,
    num_probes: usize,
    probe_diff_stream: Box<[Order]>,
    powers: HashPowers,
    identity: Box<[Order]>,
}

impl AStarEngine {
    /// Create an engine for `dim`-dimensional vectors with the given
    /// packing radius and number of extended shells.
    ///
    /// The probe sequence and its diff stream are generated here; all
    /// queries afterwards are read-only.
    pub fn new(dim: usize, packing_radius: Distance, num_shells: u32) -> Result<Self> {
        if dim == 0 || dim + 1 >= usize::from(Order::MAX) {
            return Err(LatticeError::InvalidDim(dim));
        }
        if num_shells > MAX_NUM_SHELLS {
            return Err(LatticeError::InvalidNumShells(num_shells));
        }
        if !packing_radius.is_finite() || packing_radius <= 0.0 {
            return Err(LatticeError::InvalidPackingRadius(packing_radius));
        }

        let scale = rho(dim) / packing_radius;

        let probes = generate_probes(dim, num_shells)?;
        let probe_diff_stream = generate_probe_diffs(dim, &probes)?.into_boxed_slice();
        drop(probes);

        let powers = HashPowers::new(dim)?;

        let mut identity = Vec::new();
        identity.try_reserve_exact(dim + 1)?;
        identity.extend((0..=dim).map(|i| i as Order));

        Ok(Self {
            dim,
            packing_radius,
            num_shells,
            scale,
            num_probes: num_probes(dim, num_shells)?,
            probe_diff_stream,
            powers,
            identity: identity.into_boxed_slice(),
        })
    }

    /// Dimensionality of the working space.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The packing radius the lattice was scaled to.
    pub fn packing_radius(&self) -> Distance {
        self.packing_radius
    }

    /// Internal scaling factor between the requested packing radius and
    /// the lattice's native one.
    pub fn scale(&self) -> Distance {
        self.scale
    }

    /// Number of extended shells used by [`extended`](Self::extended).
    pub fn num_shells(&self) -> u32 {
        self.num_shells
    }

    /// Number of probes an [`extended`](Self::extended) query delivers.
    pub fn num_probes(&self) -> usize {
        self.num_probes
    }

    /// Hash code of the lattice point nearest to `v`.
    pub fn nearest_hash(&self, v: &[VElem]) -> Result<HashCode> {
        let mut collector = HashCollector::with_capacity(1);
        self.nearest(v, &mut collector)?;
        collector
            .hashes()
            .first()
            .copied()
            .ok_or(LatticeError::Internal("nearest query delivered nothing"))
    }

    /// Visit the single lattice point nearest to `v`.
    pub fn nearest<S: QuerySink>(&self, v: &[VElem], sink: &mut S) -> Result<()> {
        self.check_vector(v)?;

        let mut stack = BuffStack::new(self.dim, 6)?;
        let mut buffs = stack.buffs();

        let mut point = self.point_buffer::<S>(&mut buffs)?;
        let mapped = buffs.take::<VElem>()?;
        let c = buffs.take::<CElem>()?;

        to_lattice_space(self.scale, v, mapped);
        sink.begin(mapped)?;

        let k = closest_point(mapped, c, &mut buffs)?;

        let hash_code = if S::WANT_HASH { hash(c) } else { 0 };
        self.deliver(sink, hash_code, k, c, point.as_deref_mut())
    }

    /// Visit the `dim + 1` vertices of the Delaunay cell containing
    /// `v`, in remainder order 0..=dim.
    pub fn delaunay<S: QuerySink>(&self, v: &[VElem], sink: &mut S) -> Result<()> {
        self.check_vector(v)?;

        let mut stack = BuffStack::new(self.dim, 6)?;
        let mut buffs = stack.buffs();

        let mut point = self.point_buffer::<S>(&mut buffs)?;
        let mapped = buffs.take::<VElem>()?;
        let c = buffs.take::<CElem>()?;
        let xmod = buffs.take::<VElem>()?;
        let order = buffs.take::<Order>()?;

        to_lattice_space(self.scale, v, mapped);
        sink.begin(mapped)?;

        delaunay_cell(mapped, xmod, c, order, &self.identity, &mut buffs)?;

        let mut hash_code = if S::WANT_HASH { hash(c) } else { 0 };
        self.deliver(sink, hash_code, 0, c, point.as_deref_mut())?;

        // The remaining vertices, by decrementing along the cell order.
        for k in 1..=self.dim {
            c[order[k - 1] as usize] -= 1;
            if S::WANT_HASH {
                hash_code = hash(c);
            }
            self.deliver(sink, hash_code, k as K, c, point.as_deref_mut())?;
        }
        Ok(())
    }

    /// Visit every probe in the extended shells around the hole nearest
    /// to `v` — exactly [`num_probes`](Self::num_probes) points, the
    /// first being the k=0 Delaunay vertex.
    pub fn extended<S: QuerySink>(&self, v: &[VElem], sink: &mut S) -> Result<()> {
        self.check_vector(v)?;

        let mut stack = BuffStack::new(self.dim, 7)?;
        let mut buffs = stack.buffs();

        let mut point = self.point_buffer::<S>(&mut buffs)?;
        let mapped = buffs.take::<VElem>()?;
        let c = buffs.take::<CElem>()?;
        let xmod = buffs.take::<VElem>()?;
        let order = buffs.take::<Order>()?;
        let ordered_powers: &mut [HashCode] = if S::WANT_HASH {
            buffs.take::<HashCode>()?
        } else {
            &mut []
        };

        to_lattice_space(self.scale, v, mapped);
        sink.begin(mapped)?;

        delaunay_cell(mapped, xmod, c, order, &self.identity, &mut buffs)?;

        // Powers of the radix permuted by the cell order, for
        // incremental hash updates along the walk.
        let mut hash_code = 0;
        if S::WANT_HASH {
            self.powers.ordered(order, ordered_powers);
            hash_code = hash(c);
        }

        self.deliver(sink, hash_code, 0, c, point.as_deref_mut())?;

        // Walk the diff stream. A hash-only sink skips c maintenance
        // entirely; the stream's per-column deltas drive whichever
        // payloads are live.
        let need_c = S::WANT_CVECTOR || S::WANT_POINT;
        let stream = &self.probe_diff_stream;
        let mut idx = 0;

        while idx < stream.len() {
            let k = stream[idx] as K;
            idx += 1;

            loop {
                let col = stream[idx];
                idx += 1;
                if col == STREAM_MARK {
                    break;
                }
                if need_c {
                    c[order[col as usize] as usize] -= 1;
                }
                if S::WANT_HASH {
                    hash_code = hash_code.wrapping_sub(ordered_powers[col as usize]);
                }
            }

            loop {
                let col = stream[idx];
                idx += 1;
                if col == STREAM_MARK {
                    break;
                }
                if need_c {
                    c[order[col as usize] as usize] += 1;
                }
                if S::WANT_HASH {
                    hash_code = hash_code.wrapping_add(ordered_powers[col as usize]);
                }
            }

            self.deliver(sink, hash_code, k, c, point.as_deref_mut())?;
        }
        Ok(())
    }

    /// Representation-space coordinates of the lattice point coded by
    /// `c` with remainder `k`. `c` and `out` have `dim + 1` elements.
    pub fn cvector_k_to_point(&self, c: &[CElem], k: K, out: &mut [VElem]) -> Result<()> {
        self.check_lengths(c.len(), out.len(), self.dim + 1)?;
        cvector_k_to_point(c, k, out);
        Ok(())
    }

    /// Representation-space coordinates of the lattice point coded by
    /// `c`, deriving the remainder from the code.
    pub fn cvector_to_point(&self, c: &[CElem], out: &mut [VElem]) -> Result<()> {
        self.check_lengths(c.len(), out.len(), self.dim + 1)?;
        cvector_to_point(c, out);
        Ok(())
    }

    /// Working-space coordinates of the lattice point coded by `c` with
    /// remainder `k`. `c` has `dim + 1` elements, `out` has `dim`.
    pub fn cvector_k_to_vector(&self, c: &[CElem], k: K, out: &mut [VElem]) -> Result<()> {
        if c.len() != self.dim + 1 {
            return Err(LatticeError::InvalidDim(c.len()));
        }
        if out.len() != self.dim {
            return Err(LatticeError::InvalidDim(out.len()));
        }
        let mut stack = BuffStack::new(self.dim, 1)?;
        let mut buffs = stack.buffs();
        let point = buffs.take::<VElem>()?;
        cvector_k_to_point(c, k, point);
        from_lattice_space(self.scale, point, out);
        Ok(())
    }

    /// Working-space coordinates of the lattice point coded by `c`,
    /// deriving the remainder from the code.
    pub fn cvector_to_vector(&self, c: &[CElem], out: &mut [VElem]) -> Result<()> {
        let k: K = -c.iter().sum::<CElem>();
        self.cvector_k_to_vector(c, k, out)
    }

    fn check_lengths(&self, c_len: usize, out_len: usize, expect: usize) -> Result<()> {
        if c_len != expect {
            return Err(LatticeError::InvalidDim(c_len));
        }
        if out_len != expect {
            return Err(LatticeError::InvalidDim(out_len));
        }
        Ok(())
    }

    fn check_vector(&self, v: &[VElem]) -> Result<()> {
        if v.len() != self.dim {
            return Err(LatticeError::InvalidDim(v.len()));
        }
        Ok(())
    }

    /// Check out a coordinate scratch slot only when the sink wants
    /// point payloads.
    fn point_buffer<'a, S: QuerySink>(
        &self,
        buffs: &mut WorkBuffs<'a>,
    ) -> Result<Option<&'a mut [VElem]>> {
        if S::WANT_POINT {
            Ok(Some(buffs.take::<VElem>()?))
        } else {
            Ok(None)
        }
    }

    #[inline]
    fn deliver<S: QuerySink>(
        &self,
        sink: &mut S,
        hash: HashCode,
        k: K,
        c: &[CElem],
        point: Option<&mut [VElem]>,
    ) -> Result<()> {
        let point: &[VElem] = match point {
            Some(buf) => {
                cvector_k_to_point(c, k, buf);
                buf
            }
            None => &[],
        };

        sink.visit(ProbeMatch {
            hash,
            k,
            c: if S::WANT_CVECTOR { c } else { &[] },
            point,
        })
    }
}
