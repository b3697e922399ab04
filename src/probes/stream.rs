//! Probe-diff stream.
//!
//! The extended-probe walk never materializes probe c-vectors; it
//! replays a compact transcript of instructions describing how each
//! probe differs from its predecessor:
//!
//! ```text
//! |k|C-|...|M|C+|...|M|     repeated for probes 1..P-1
//! ```
//!
//! where `k` is the probe's remainder, each `C-`/`C+` is a column to
//! decrement/increment by one unit, and `M` is the [`STREAM_MARK`]
//! sentinel closing each run. Probe 0 has no entry.
//!
//! Every second orbit is traversed in reverse (the `flip` indexing),
//! which keeps adjacent probes similar and the total instruction count
//! small.

use smallvec::SmallVec;

use crate::error::{LatticeError, Result};
use crate::scalars::{CElem, Order, K, STREAM_MARK};

/// Probe index for diff entry `i`: identity within the first half of
/// each double-orbit window, reflected within the second half.
#[inline]
fn flip_idx(i: usize, dimp: usize, dimp2: usize) -> usize {
    let j = i % dimp2;
    if j < dimp {
        i
    } else {
        i - j - j + dimp2 + dimp - 1
    }
}

/// Remainder of the probe at diff entry `i`.
#[inline]
fn stream_k(i: usize, dim: usize, dimp: usize, dimp2: usize) -> K {
    if i % dimp2 < dimp {
        (i % dimp) as K
    } else {
        (dim - i % dimp) as K
    }
}

/// Number of stream words needed for the given probe sequence. A dry
/// run of [`generate_probe_diffs`], so the stream buffer can be
/// allocated exactly.
pub fn size_probe_stream(dim: usize, probes: &[CElem]) -> usize {
    let dimp = dim + 1;
    let dimp2 = dimp * 2;
    let num_probes = probes.len() / dimp;

    // One k entry and two marks per probe.
    let mut size = 3 * (num_probes - 1);

    for i in 1..num_probes {
        let s = flip_idx(i - 1, dimp, dimp2) * dimp;
        let t = flip_idx(i, dimp, dimp2) * dimp;

        for d in 0..dimp {
            size += (probes[t + d] - probes[s + d]).unsigned_abs() as usize;
        }
    }
    size
}

/// Encode the probe sequence as a diff stream. The output length is
/// checked against [`size_probe_stream`]; a mismatch is an internal
/// error.
pub fn generate_probe_diffs(dim: usize, probes: &[CElem]) -> Result<Vec<Order>> {
    let dimp = dim + 1;
    let dimp2 = dimp * 2;
    let num_probes = probes.len() / dimp;
    let size = size_probe_stream(dim, probes);

    let mut stream: Vec<Order> = Vec::new();
    stream.try_reserve_exact(size)?;

    // Positive columns are staged here and emitted after the negatives.
    let mut pos_cols: SmallVec<[Order; 32]> = SmallVec::new();

    for i in 1..num_probes {
        let s = flip_idx(i - 1, dimp, dimp2) * dimp;
        let t = flip_idx(i, dimp, dimp2) * dimp;

        stream.push(stream_k(i, dim, dimp, dimp2) as Order);

        pos_cols.clear();
        for d in 0..dimp {
            let mut diff = probes[t + d] - probes[s + d];
            while diff < 0 {
                stream.push(d as Order);
                diff += 1;
            }
            while diff > 0 {
                pos_cols.push(d as Order);
                diff -= 1;
            }
        }

        stream.push(STREAM_MARK);
        stream.extend_from_slice(&pos_cols);
        stream.push(STREAM_MARK);
    }

    if stream.len() != size {
        return Err(LatticeError::Internal("probe diff stream size mismatch"));
    }
    Ok(stream)
}
