//! Semantic scalar types shared across the crate.
//!
//! Each alias names a role rather than a representation, so the rest of
//! the code reads in terms of the lattice domain: vector elements,
//! c-vector elements, remainders, permutation indices, hash codes.

/// Element type for vectors in working space and representation space.
pub type VElem = f64;

/// Element type for the integer c-vector representation of lattice points.
pub type CElem = i32;

/// Remainder value of a lattice point: `k = -sum(c) mod (dim + 1)`.
pub type K = i32;

/// Index into dimensions: permutation elements, bucket links, and
/// probe-diff stream words. Must represent `0..=dim + 1` plus an
/// all-bits-on sentinel, so it is kept deliberately narrow.
pub type Order = u16;

/// Packing radii, scales and distances.
pub type Distance = f64;

/// Hash codes of lattice points. Unsigned so that all arithmetic is
/// exact modulo 2^64 (additions, subtractions and multiplications wrap).
pub type HashCode = u64;

/// Negated shell cost used while generating probes. Lower shell cost
/// means higher priority, so costs are stored negated and compared with
/// a max-heap.
pub type Cost = i64;

/// The maximum number of extended shells, limited by the precomputed
/// zero-probe count table.
pub const MAX_NUM_SHELLS: u32 = 30;

/// Sentinel terminating bucket chains in the closest-point search.
pub const END: Order = Order::MAX;

/// Sentinel terminating the decrement and increment runs of each
/// probe-diff stream segment.
pub const STREAM_MARK: Order = Order::MAX;

/// Round `x` to the nearest integer, halves up: `floor(x + 0.5)`.
///
/// Branch-free (the comparison materializes as a flag, not a jump), and
/// deliberately not `f64::round`, which rounds halves away from zero.
/// The bucket index computation in the closest-point search depends on
/// this exact behavior.
#[inline]
pub fn round_half_up(x: VElem) -> CElem {
    let x = x + 0.5;
    let i = x as CElem;
    i - ((x < i as VElem) as CElem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_up_integers() {
        for i in -16..=16 {
            assert_eq!(round_half_up(i as f64), i);
        }
    }

    #[test]
    fn round_half_up_halves_go_up() {
        for i in -16..16 {
            assert_eq!(round_half_up(i as f64 + 0.5), i + 1, "at {}.5", i);
        }
    }

    #[test]
    fn round_half_up_negative_zero() {
        assert_eq!(round_half_up(-0.0), 0);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-16.5), -16);
    }

    #[test]
    fn round_half_up_off_half_values() {
        assert_eq!(round_half_up(0.49), 0);
        assert_eq!(round_half_up(0.51), 1);
        assert_eq!(round_half_up(-1.49), -1);
        assert_eq!(round_half_up(-1.51), -2);
    }
}
