//! Priority queue for probe candidates.
//!
//! A zero-indexed binary max-heap over `(item, priority)` pairs with
//! doubling growth. The tie-breaking of equal priorities is part of the
//! observable probe order within a shell, so the sift logic keeps the
//! exact comparison structure rather than delegating to
//! `std::collections::BinaryHeap`.

struct Entry<P, T> {
    priority: P,
    item: T,
}

/// Max-heap keyed by priority supplied at insertion time.
pub struct PriorityQueue<P, T> {
    data: Vec<Entry<P, T>>,
}

impl<P: PartialOrd + Copy, T> PriorityQueue<P, T> {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Highest priority currently queued.
    pub fn head_priority(&self) -> Option<P> {
        self.data.first().map(|e| e.priority)
    }

    /// Insert an item, sifting it up to its place.
    pub fn add(&mut self, item: T, priority: P) {
        self.data.push(Entry { priority, item });

        let mut i = self.data.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.data[i].priority > self.data[parent].priority {
                self.data.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    /// Remove and return the highest-priority item.
    pub fn poll(&mut self) -> Option<(T, P)> {
        if self.data.is_empty() {
            return None;
        }

        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let Entry { priority, item } = self.data.pop()?;

        // Sift the swapped-in tail back down. On equal child priorities
        // the left child wins, matching insertion-order expectations.
        let n = self.data.len();
        let mut i = 0;
        while i * 2 + 1 < n {
            let left = i * 2 + 1;
            let right = i * 2 + 2;

            let swap_to = if right < n {
                let lp = self.data[left].priority;
                let rp = self.data[right].priority;
                if lp >= rp && lp > self.data[i].priority {
                    Some(left)
                } else if rp >= lp && rp > self.data[i].priority {
                    Some(right)
                } else {
                    None
                }
            } else if self.data[left].priority > self.data[i].priority {
                Some(left)
            } else {
                None
            };

            match swap_to {
                Some(j) => {
                    self.data.swap(i, j);
                    i = j;
                }
                None => break,
            }
        }

        Some((item, priority))
    }
}

impl<P: PartialOrd + Copy, T> Default for PriorityQueue<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polls_in_priority_order() {
        let mut q = PriorityQueue::with_capacity(4);
        for (item, priority) in [("c", -3), ("a", 0), ("d", -7), ("b", -1)] {
            q.add(item, priority);
        }

        let mut out = Vec::new();
        while let Some((item, _)) = q.poll() {
            out.push(item);
        }
        assert_eq!(out, ["a", "b", "c", "d"]);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut q = PriorityQueue::with_capacity(2);
        for i in 0..100 {
            q.add(i, -(i as i64));
        }
        assert_eq!(q.len(), 100);
        assert_eq!(q.head_priority(), Some(0));

        let mut prev = i64::MAX;
        while let Some((_, p)) = q.poll() {
            assert!(p <= prev);
            prev = p;
        }
        assert!(q.is_empty());
    }

    #[test]
    fn empty_queue_polls_none() {
        let mut q: PriorityQueue<i64, ()> = PriorityQueue::new();
        assert!(q.poll().is_none());
        assert_eq!(q.head_priority(), None);
    }
}
