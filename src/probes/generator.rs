//! Probe generation.
//!
//! Enumerates every remainder-zero c-vector in the first
//! `num_shells + 1` shells in non-decreasing shell-cost order, then
//! expands each into its orbit of `dim + 1` sibling probes. This runs
//! once at engine construction; queries only ever replay the result.
//!
//! # Search
//!
//! A best-first search over c-vectors with `sum(c) = 0`. Each candidate
//! move increments one coordinate and decrements another, keeping the
//! sum invariant; moves are enumerated by a triangular label unranking
//! so that carrying the starting label forward deduplicates move
//! sequences lexicographically. A bounded [`CostSet`] rejects moves
//! whose shell cost cannot fall within the requested shells, and a
//! [`PointSet`] drops duplicate arrivals within a shell.
//!
//! For a remainder-zero point with c-vector `c`:
//!
//! ```text
//! cost = - sum_i ((n+1)/2 * c[i]^2 - i * c[i])
//! ```
//!
//! stored negated so the max-heap pops the cheapest shell first.

use smallvec::SmallVec;

use crate::error::{LatticeError, Result};
use crate::probes::cost_set::CostSet;
use crate::probes::counts::num_probes;
use crate::probes::point_set::PointSet;
use crate::probes::queue::PriorityQueue;
use crate::scalars::{CElem, Cost};

/// Upper bound on remainder-zero probes per shell; sizes the
/// deduplication set. Extraordinarily large — no practical system is
/// expected to reach it.
pub const MAX_ZERO_PROBES_PER_SHELL: usize = 16 * 1024;

/// Unrank a move label into a coordinate pair along the triangular
/// enumeration:
///
/// ```text
/// label   i  j
///   0     0  0
///   1     1  0
///   2     0  1
///   3     2  0
///   4     1  1
///   5     0  2
///         ...
/// ```
#[inline]
fn move_pair(label: usize) -> (usize, usize) {
    // Slack against sqrt rounding pushing the row index one too low.
    const ETA: f64 = 10e-6;

    let k = ((2.0 * label as f64 + 2.25).sqrt() - 1.5 - ETA).ceil() as usize;
    let row = k * (k + 3) / 2;
    let i = row - label;
    (i, k - i)
}

/// A queued candidate: its c-vector lives in the arena at `start`, and
/// move enumeration resumes from `label`.
struct Candidate {
    start: usize,
    label: usize,
}

/// Generate remainder-zero probes in shell order, calling `emit` with
/// `(shell_cost, c)` for each. Stops after `num_shells + 1` shells.
pub(crate) fn generate_zero_probes(
    dim: usize,
    num_shells: u32,
    mut emit: impl FnMut(Cost, &[CElem]) -> Result<()>,
) -> Result<()> {
    let dimp = dim + 1;
    let l_max = dimp * dim;
    let l_swp = l_max / 2;

    let mut points = PointSet::new(dimp, MAX_ZERO_PROBES_PER_SHELL)?;
    let mut queue: PriorityQueue<Cost, Candidate> = PriorityQueue::new();
    let mut seen_costs = CostSet::new(num_shells as usize + 1);

    // Must be signed: it legitimately reaches -1 before the stop test.
    let mut shells_to_go = i64::from(num_shells);

    // All candidate codes live here and are freed in bulk on return.
    let mut arena: Vec<CElem> = Vec::new();
    arena.try_reserve(dimp * 64)?;
    arena.resize(dimp, 0);

    seen_costs.push_unique_small(0);
    queue.add(Candidate { start: 0, label: 0 }, 0);

    // Negated cost of the previous shell. Starting above zero makes the
    // first candidate (cost 0) register as a new shell.
    let mut cost: Cost = 1;

    let mut code: SmallVec<[CElem; 8]> = SmallVec::with_capacity(dimp);

    while let Some((candidate, probe_cost)) = queue.poll() {
        if probe_cost < cost {
            // First candidate of a new shell.
            points.clear();
            cost = probe_cost;
            shells_to_go -= 1;
            if shells_to_go < -1 {
                break;
            }
        }

        // Copy out of the arena: spawning candidates below appends to it.
        code.clear();
        code.extend_from_slice(&arena[candidate.start..candidate.start + dimp]);

        if !points.insert(&code)? {
            continue;
        }

        emit(-cost, &code)?;

        // Spawn successor candidates.
        for l in candidate.label..l_max {
            let (i, j) = if l < l_swp {
                let (a, b) = move_pair(l);
                (dim - a, b)
            } else {
                let (a, b) = move_pair(l_max - 1 - l);
                (a, dim - b)
            };

            let code_i = code[i];
            if code_i < 0 {
                continue;
            }
            let code_j = code[j];
            if code_j > 0 {
                continue;
            }

            // Cost after incrementing dimension i and decrementing j.
            let new_cost = cost
                - (dimp as Cost) * (Cost::from(code_i) - Cost::from(code_j) + 1)
                - j as Cost
                + i as Cost;

            if seen_costs.push_unique_small(-new_cost) {
                let start = arena.len();
                arena.try_reserve(dimp)?;
                arena.extend_from_slice(&code);
                arena[start + i] += 1;
                arena[start + j] -= 1;
                queue.add(Candidate { start, label: l }, new_cost);
            }
        }
    }

    Ok(())
}

/// Generate the full probe sequence: `num_probes(dim, num_shells)`
/// c-vectors, flattened, grouped into orbits of `dim + 1`.
///
/// Each orbit starts with a remainder-zero probe; sibling `k` is
/// obtained from sibling `k - 1` by rotating the coordinates up one
/// dimension and decrementing the new leading coordinate. Orbits appear
/// in non-decreasing shell-cost order, so the first probe is always the
/// origin.
///
/// The output length is checked against the precomputed count table;
/// a mismatch is an internal error.
pub fn generate_probes(dim: usize, num_shells: u32) -> Result<Vec<CElem>> {
    let dimp = dim + 1;
    let expected = num_probes(dim, num_shells)?;
    let total = expected * dimp;

    let mut probes: Vec<CElem> = Vec::new();
    probes.try_reserve_exact(total)?;

    generate_zero_probes(dim, num_shells, |_, zero| {
        if probes.len() + dimp * dimp > total {
            return Err(LatticeError::Internal(
                "probe generation exceeded the precomputed count",
            ));
        }

        probes.extend_from_slice(zero);

        // The rest of the orbit: remainders 1..=dim.
        for _ in 1..dimp {
            let prev = probes.len() - dimp;
            let head = probes[prev + dim] - 1;
            probes.push(head);
            for t in 0..dim {
                let x = probes[prev + t];
                probes.push(x);
            }
        }
        Ok(())
    })?;

    if probes.len() != total {
        return Err(LatticeError::Internal(
            "probe generation fell short of the precomputed count",
        ));
    }

    Ok(probes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::counts::num_zero_probes;

    #[test]
    fn move_pair_unranks_the_triangle() {
        let expect = [(0, 0), (1, 0), (0, 1), (2, 0), (1, 1), (0, 2), (3, 0)];
        for (label, &pair) in expect.iter().enumerate() {
            assert_eq!(move_pair(label), pair, "label {}", label);
        }
    }

    #[test]
    fn smallest_case_is_origin_and_one_neighbor() {
        let probes = generate_probes(1, 0).unwrap();
        assert_eq!(probes, [0, 0, -1, 0]);
    }

    #[test]
    fn dim2_one_shell_matches_reference() {
        // Two orbits: the origin's, then the shell-1 zero probe
        // (1, 0, -1) and its cyclic-shift siblings.
        let probes = generate_probes(2, 1).unwrap();
        assert_eq!(
            probes,
            [
                0, 0, 0, /**/ -1, 0, 0, /**/ -1, -1, 0, // origin orbit
                -1, 0, 1, /**/ 0, -1, 0, /**/ -1, 0, -1, // shell 1 orbit
            ]
        );
    }

    #[test]
    fn zero_probe_sums_are_zero_and_unique() {
        for (dim, shells) in [(3usize, 3u32), (5, 4), (16, 3)] {
            let mut seen = Vec::new();
            let mut last_cost = 0;
            generate_zero_probes(dim, shells, |shell_cost, c| {
                assert_eq!(c.iter().sum::<CElem>(), 0, "c = {:?}", c);
                assert!(shell_cost >= last_cost, "shell costs must not decrease");
                last_cost = shell_cost;
                assert!(!seen.contains(&c.to_vec()), "duplicate probe {:?}", c);
                seen.push(c.to_vec());
                Ok(())
            })
            .unwrap();
            assert_eq!(seen.len(), num_zero_probes(dim, shells).unwrap());
        }
    }

    #[test]
    fn orbit_members_have_ascending_remainders() {
        let probes = generate_probes(3, 2).unwrap();
        let dimp = 4;
        for (j, orbit) in probes.chunks(dimp * dimp).enumerate() {
            for k in 0..dimp {
                let c = &orbit[k * dimp..(k + 1) * dimp];
                let sum: i64 = c.iter().map(|&x| i64::from(x)).sum();
                assert_eq!(
                    (-sum).rem_euclid(dimp as i64),
                    k as i64,
                    "orbit {} member {}",
                    j,
                    k
                );
            }
        }
    }

    #[test]
    fn probe_count_matches_table_for_larger_cases() {
        for (dim, shells) in [(4usize, 2u32), (10, 5), (32, 4)] {
            let probes = generate_probes(dim, shells).unwrap();
            assert_eq!(
                probes.len(),
                (dim + 1) * num_probes(dim, shells).unwrap(),
                "dim {} shells {}",
                dim,
                shells
            );
        }
    }
}
