//! Polynomial hashing of c-vectors.
//!
//! A lattice point's hash code is `sum(c[i] * RADIX^i) mod 2^64`. The
//! modulus comes for free from wrapping unsigned arithmetic, and because
//! the hash is linear in `c`, a probe that changes one coordinate by one
//! unit changes the hash by exactly one power of the radix — the
//! extended-probe walk exploits this to update hashes incrementally
//! instead of rehashing each probe.

use crate::error::Result;
use crate::scalars::{CElem, HashCode, Order};

/// The radix of the polynomial hash.
pub const RADIX: HashCode = 31;

/// Compute the hash code of a c-vector.
#[inline]
pub fn hash(c: &[CElem]) -> HashCode {
    let mut code: HashCode = 0;
    let mut mul: HashCode = 1;
    for &ci in c {
        code = code.wrapping_add((ci as i64 as HashCode).wrapping_mul(mul));
        mul = mul.wrapping_mul(RADIX);
    }
    code
}

/// Powers of [`RADIX`], primed once at engine construction for the
/// engine's dimensionality and immutable afterwards.
#[derive(Debug, Clone)]
pub struct HashPowers {
    pow: Box<[HashCode]>,
}

impl HashPowers {
    /// Precompute `RADIX^0 ..= RADIX^dim`.
    pub fn new(dim: usize) -> Result<Self> {
        let mut pow = Vec::new();
        pow.try_reserve_exact(dim + 1)?;
        let mut x: HashCode = 1;
        for _ in 0..=dim {
            pow.push(x);
            x = x.wrapping_mul(RADIX);
        }
        Ok(Self {
            pow: pow.into_boxed_slice(),
        })
    }

    /// The power table in identity order.
    #[inline]
    pub fn powers(&self) -> &[HashCode] {
        &self.pow
    }

    /// Fill `out[i] = RADIX^order[i]`. The extended-probe walk indexes
    /// diff-stream columns through the Delaunay permutation, so hashing
    /// incrementally needs the powers permuted the same way.
    #[inline]
    pub fn ordered(&self, order: &[Order], out: &mut [HashCode]) {
        for (dst, &ord) in out.iter_mut().zip(order.iter()) {
            *dst = self.pow[ord as usize];
        }
    }
}
