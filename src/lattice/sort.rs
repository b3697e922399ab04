//! Permutation sort.
//!
//! Sorts an index array according to the values it points at, leaving
//! the value array untouched. Median-of-three quicksort with an
//! insertion-sort cutoff; recursion only descends into the smaller
//! partition (the larger one is handled by the outer loop), bounding the
//! stack to O(log n).

use crate::scalars::{Order, VElem};

const INSERTION_SORT_THRESHOLD: usize = 6;

/// Reorder `ord` so that `vals[ord[0]] <= vals[ord[1]] <= ...`.
///
/// `ord` can be any subset of indices into `vals` in any initial order;
/// to sort the whole array, seed it with the identity permutation.
pub fn sort_order(vals: &[VElem], ord: &mut [Order]) {
    sort_range(vals, ord, 0, ord.len());
}

/// Ensure `vals[ord[a]] >= vals[ord[b]]`, swapping the indices if needed.
#[inline]
fn swap_less(vals: &[VElem], ord: &mut [Order], a: usize, b: usize) {
    if vals[ord[a] as usize] < vals[ord[b] as usize] {
        ord.swap(a, b);
    }
}

fn insertion_sort(vals: &[VElem], ord: &mut [Order], lo: usize, hi: usize) {
    for i in lo + 1..hi {
        let o = ord[i];
        let val = vals[o as usize];

        let mut j = i;
        while j > lo && val < vals[ord[j - 1] as usize] {
            ord[j] = ord[j - 1];
            j -= 1;
        }
        ord[j] = o;
    }
}

fn sort_range(vals: &[VElem], ord: &mut [Order], mut lo: usize, mut hi: usize) {
    loop {
        let size = hi - lo;
        if size <= INSERTION_SORT_THRESHOLD {
            insertion_sort(vals, ord, lo, hi);
            return;
        }

        let last = hi - 1;
        let mid = lo + size / 2;

        // Median of three. Afterwards: ord[last] carries the largest of
        // the sampled trio, ord[lo] the median, ord[mid] the smallest.
        // The extremes act as sentinels for the scans below.
        swap_less(vals, ord, last, mid);
        swap_less(vals, ord, last, lo);
        swap_less(vals, ord, lo, mid);
        ord.swap(mid, lo + 1);

        // Partition into:
        //
        //   m  s  [   < m    ]     [    >= m   ]  b
        //   ^  ^             ^     ^              ^
        //   lo lo+1         r      l             last
        //
        // where m is the median. The loop ends when l and r cross.
        let pivot = vals[ord[lo] as usize];
        let mut l = lo + 1;
        let mut r = last;

        loop {
            loop {
                l += 1;
                if vals[ord[l] as usize] >= pivot {
                    break;
                }
            }
            loop {
                r -= 1;
                if pivot >= vals[ord[r] as usize] {
                    break;
                }
            }

            if l >= r {
                if l == r {
                    l += 1;
                    r -= 1;
                }
                break;
            }

            ord.swap(l, r);
        }

        // Put the median into its final position.
        ord.swap(l - 1, lo);

        let num_left = l - (lo + 1);
        let num_right = last - r;

        // Recurse on the smaller side, iterate on the bigger one.
        if num_left == 0 {
            if num_right == 0 {
                return;
            }
            lo = r + 1;
        } else if num_right == 0 {
            hi = lo + num_left;
        } else if num_left > num_right {
            sort_range(vals, ord, r + 1, hi);
            hi = lo + num_left;
        } else {
            sort_range(vals, ord, lo, lo + num_left);
            lo = r + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: usize) -> Vec<Order> {
        (0..n as Order).collect()
    }

    fn assert_sorted(vals: &[VElem], ord: &[Order]) {
        for w in ord.windows(2) {
            assert!(
                vals[w[0] as usize] <= vals[w[1] as usize],
                "order {:?} does not sort {:?}",
                ord,
                vals
            );
        }
    }

    fn assert_permutation(n: usize, ord: &[Order]) {
        let mut seen = vec![false; n];
        for &o in ord {
            assert!(!seen[o as usize], "duplicate index {}", o);
            seen[o as usize] = true;
        }
    }

    #[test]
    fn sorts_small_arrays_by_insertion() {
        let vals = [3.0, 1.0, 2.0];
        let mut ord = identity(3);
        sort_order(&vals, &mut ord);
        assert_eq!(ord, [1, 2, 0]);
    }

    #[test]
    fn sorts_larger_arrays() {
        let vals: Vec<VElem> = (0..100).map(|i| ((i * 37) % 100) as f64 - 50.0).collect();
        let mut ord = identity(100);
        sort_order(&vals, &mut ord);
        assert_sorted(&vals, &ord);
        assert_permutation(100, &ord);
    }

    #[test]
    fn handles_duplicates() {
        let vals = [2.0, 1.0, 2.0, 1.0, 0.0, 2.0, 1.0, 0.0, 2.0];
        let mut ord = identity(9);
        sort_order(&vals, &mut ord);
        assert_sorted(&vals, &ord);
        assert_permutation(9, &ord);
    }

    #[test]
    fn already_sorted_and_reversed() {
        let asc: Vec<VElem> = (0..40).map(|i| i as f64).collect();
        let mut ord = identity(40);
        sort_order(&asc, &mut ord);
        assert_sorted(&asc, &ord);

        let desc: Vec<VElem> = (0..40).map(|i| -(i as f64)).collect();
        let mut ord = identity(40);
        sort_order(&desc, &mut ord);
        assert_sorted(&desc, &ord);
        assert_permutation(40, &ord);
    }

    #[test]
    fn values_are_never_reordered() {
        let vals = [5.0, -1.0, 3.0, 0.0, 2.0, 9.0, -4.0, 7.0];
        let copy = vals;
        let mut ord = identity(8);
        sort_order(&vals, &mut ord);
        assert_eq!(vals, copy);
    }
}
