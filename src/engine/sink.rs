//! Query sinks.
//!
//! A sink receives the lattice points a query visits. Which payloads it
//! wants is declared through associated consts, so the query drivers
//! monomorphize per sink type and skip the work of producing anything
//! unwanted: no hashing for a c-vector-only sink, no c-vector
//! maintenance for a hash-only sink, no coordinate conversion unless
//! asked. There is no dynamic dispatch on the per-probe path.

use crate::error::Result;
use crate::scalars::{CElem, HashCode, K, VElem};

/// One visited lattice point.
///
/// Slices the sink did not request (per its consts) are empty, and
/// `hash` is zero when unrequested.
#[derive(Debug, Clone, Copy)]
pub struct ProbeMatch<'a> {
    /// Hash code of the point (when `WANT_HASH`).
    pub hash: HashCode,
    /// Remainder value of the point.
    pub k: K,
    /// The `dim + 1`-element c-vector (when `WANT_CVECTOR`). Only valid
    /// for the duration of the call.
    pub c: &'a [CElem],
    /// Representation-space coordinates (when `WANT_POINT`). Only valid
    /// for the duration of the call.
    pub point: &'a [VElem],
}

/// Receives lattice points during a query, in emission order.
///
/// Returning an error from either method aborts the query; the engine
/// makes no further calls and surfaces the error to the caller.
pub trait QuerySink {
    /// Whether hash codes must be computed.
    const WANT_HASH: bool;
    /// Whether c-vectors must be maintained and passed.
    const WANT_CVECTOR: bool;
    /// Whether representation-space coordinates must be computed.
    const WANT_POINT: bool;

    /// Called once at the start of a query with the query vector mapped
    /// into representation space. The slice is only valid for the
    /// duration of the call.
    fn begin(&mut self, mapped: &[VElem]) -> Result<()> {
        let _ = mapped;
        Ok(())
    }

    /// Called once per visited lattice point.
    fn visit(&mut self, probe: ProbeMatch<'_>) -> Result<()>;
}

/// Collects hash codes.
#[derive(Debug, Default)]
pub struct HashCollector {
    hashes: Vec<HashCode>,
}

impl HashCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hashes: Vec::with_capacity(capacity),
        }
    }

    pub fn hashes(&self) -> &[HashCode] {
        &self.hashes
    }

    pub fn into_hashes(self) -> Vec<HashCode> {
        self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn clear(&mut self) {
        self.hashes.clear();
    }
}

impl QuerySink for HashCollector {
    const WANT_HASH: bool = true;
    const WANT_CVECTOR: bool = false;
    const WANT_POINT: bool = false;

    fn visit(&mut self, probe: ProbeMatch<'_>) -> Result<()> {
        self.hashes.push(probe.hash);
        Ok(())
    }
}

/// Collects remainders and c-vectors.
#[derive(Debug, Default)]
pub struct CVectorCollector {
    dimp: usize,
    ks: Vec<K>,
    cvectors: Vec<CElem>,
}

impl CVectorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ks.is_empty()
    }

    /// The i-th visited point as `(k, c)`.
    pub fn get(&self, i: usize) -> (K, &[CElem]) {
        (self.ks[i], &self.cvectors[i * self.dimp..(i + 1) * self.dimp])
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &[CElem])> {
        self.ks
            .iter()
            .copied()
            .zip(self.cvectors.chunks_exact(self.dimp))
    }

    pub fn clear(&mut self) {
        self.ks.clear();
        self.cvectors.clear();
    }
}

impl QuerySink for CVectorCollector {
    const WANT_HASH: bool = false;
    const WANT_CVECTOR: bool = true;
    const WANT_POINT: bool = false;

    fn begin(&mut self, mapped: &[VElem]) -> Result<()> {
        self.dimp = mapped.len();
        Ok(())
    }

    fn visit(&mut self, probe: ProbeMatch<'_>) -> Result<()> {
        self.ks.push(probe.k);
        self.cvectors.extend_from_slice(probe.c);
        Ok(())
    }
}

/// Collects hash codes, remainders and c-vectors.
#[derive(Debug, Default)]
pub struct ProbeCollector {
    dimp: usize,
    hashes: Vec<HashCode>,
    ks: Vec<K>,
    cvectors: Vec<CElem>,
}

impl ProbeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn hashes(&self) -> &[HashCode] {
        &self.hashes
    }

    /// The i-th visited point as `(hash, k, c)`.
    pub fn get(&self, i: usize) -> (HashCode, K, &[CElem]) {
        (
            self.hashes[i],
            self.ks[i],
            &self.cvectors[i * self.dimp..(i + 1) * self.dimp],
        )
    }

    pub fn clear(&mut self) {
        self.hashes.clear();
        self.ks.clear();
        self.cvectors.clear();
    }
}

impl QuerySink for ProbeCollector {
    const WANT_HASH: bool = true;
    const WANT_CVECTOR: bool = true;
    const WANT_POINT: bool = false;

    fn begin(&mut self, mapped: &[VElem]) -> Result<()> {
        self.dimp = mapped.len();
        Ok(())
    }

    fn visit(&mut self, probe: ProbeMatch<'_>) -> Result<()> {
        self.hashes.push(probe.hash);
        self.ks.push(probe.k);
        self.cvectors.extend_from_slice(probe.c);
        Ok(())
    }
}

/// Collects representation-space point coordinates.
#[derive(Debug, Default)]
pub struct PointCollector {
    dimp: usize,
    points: Vec<VElem>,
}

impl PointCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        if self.dimp == 0 {
            0
        } else {
            self.points.len() / self.dimp
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The i-th visited point's coordinates.
    pub fn get(&self, i: usize) -> &[VElem] {
        &self.points[i * self.dimp..(i + 1) * self.dimp]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[VElem]> {
        self.points.chunks_exact(self.dimp)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl QuerySink for PointCollector {
    const WANT_HASH: bool = false;
    const WANT_CVECTOR: bool = false;
    const WANT_POINT: bool = true;

    fn begin(&mut self, mapped: &[VElem]) -> Result<()> {
        self.dimp = mapped.len();
        Ok(())
    }

    fn visit(&mut self, probe: ProbeMatch<'_>) -> Result<()> {
        self.points.extend_from_slice(probe.point);
        Ok(())
    }
}
