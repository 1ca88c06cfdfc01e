//! Bounded priority queue of nearest-neighbor candidates.
//!
//! [`BoundedQueue`] keeps the `k` best candidates seen so far in a max-heap
//! keyed by squared distance, so the current worst accepted candidate is
//! always at the top and doubles as the eviction threshold.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A candidate point together with its squared distance to the query.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<P> {
    /// The candidate point.
    pub point: P,
    /// Squared Euclidean distance to the query.
    pub distance: f64,
}

impl<P> Neighbor<P> {
    /// Create a new candidate.
    #[inline]
    pub fn new(point: P, distance: f64) -> Self {
        Self { point, distance }
    }

    /// Euclidean (non-squared) distance to the query.
    #[inline]
    pub fn euclidean_distance(&self) -> f64 {
        self.distance.sqrt()
    }
}

// Heap ordering looks at the distance only. BinaryHeap is a max-heap, so
// peek() yields the current worst candidate.
impl<P> PartialEq for Neighbor<P> {
    fn eq(&self, other: &Self) -> bool {
        self.distance.total_cmp(&other.distance) == Ordering::Equal
    }
}

impl<P> Eq for Neighbor<P> {}

impl<P> PartialOrd for Neighbor<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Neighbor<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.total_cmp(&other.distance)
    }
}

/// A max-heap holding at most `capacity` candidates.
///
/// Until the queue first fills up, [`max_dist`](Self::max_dist) is infinite
/// and every push is accepted. Once full, `max_dist` is the largest distance
/// held and only strictly better candidates may be pushed.
#[derive(Debug, Clone)]
pub struct BoundedQueue<P> {
    capacity: usize,
    max_distance: f64,
    candidates: BinaryHeap<Neighbor<P>>,
}

impl<P> BoundedQueue<P> {
    /// Create an empty queue holding at most `capacity` candidates.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedQueue capacity must be greater than 0");
        Self {
            capacity,
            max_distance: f64::INFINITY,
            candidates: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    /// Insert a candidate, evicting the current worst if the queue is full.
    ///
    /// # Panics
    /// Panics if the queue is full and `distance` does not improve on
    /// [`max_dist`](Self::max_dist). Callers filter first; use
    /// [`try_push`](Self::try_push) to do both.
    pub fn push(&mut self, point: P, distance: f64) {
        assert!(
            self.admits(distance),
            "candidate distance {} does not improve on max distance {}",
            distance,
            self.max_distance
        );

        if self.candidates.len() == self.capacity {
            self.candidates.pop();
        }

        self.candidates.push(Neighbor::new(point, distance));

        if self.candidates.len() == self.capacity {
            if let Some(top) = self.candidates.peek() {
                self.max_distance = top.distance;
            }
        }
    }

    /// True if a candidate at `distance` would be inserted.
    ///
    /// A queue that is not yet full takes any candidate, even one at
    /// infinite distance.
    #[inline]
    pub fn admits(&self, distance: f64) -> bool {
        self.not_full() || distance < self.max_distance
    }

    /// Push the candidate if the queue admits it.
    ///
    /// Returns true if the candidate was inserted.
    #[inline]
    pub fn try_push(&mut self, point: P, distance: f64) -> bool {
        if self.admits(distance) {
            self.push(point, distance);
            true
        } else {
            false
        }
    }

    /// The worst candidate currently held.
    #[inline]
    pub fn peek(&self) -> Option<&Neighbor<P>> {
        self.candidates.peek()
    }

    /// Remove and return the worst candidate.
    #[inline]
    pub fn pop(&mut self) -> Option<Neighbor<P>> {
        self.candidates.pop()
    }

    /// Current eviction threshold.
    #[inline]
    pub fn max_dist(&self) -> f64 {
        self.max_distance
    }

    /// Number of candidates held.
    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if no candidate is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Maximum number of candidates.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once `capacity` candidates are held.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.candidates.len() >= self.capacity
    }

    /// True while fewer than `capacity` candidates are held.
    #[inline]
    pub fn not_full(&self) -> bool {
        !self.is_full()
    }

    /// Iterate over the candidates in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Neighbor<P>> {
        self.candidates.iter()
    }

    /// Fold another queue into this one, keeping the best `capacity`.
    pub fn merge(&mut self, other: BoundedQueue<P>) {
        for candidate in other.candidates {
            self.try_push(candidate.point, candidate.distance);
        }
    }

    /// Consume the queue, returning candidates sorted closest first.
    pub fn into_sorted_vec(self) -> Vec<Neighbor<P>> {
        self.candidates.into_sorted_vec()
    }

    /// Squared distances of all candidates, closest first.
    pub fn distances(&self) -> Vec<f64> {
        let mut distances: Vec<f64> = self.candidates.iter().map(|n| n.distance).collect();
        distances.sort_by(|a, b| a.total_cmp(b));
        distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_dist_infinite_until_full() {
        let mut queue = BoundedQueue::new(3);
        queue.push('a', 5.0);
        queue.push('b', 1.0);
        assert_eq!(queue.max_dist(), f64::INFINITY);
        assert!(queue.not_full());

        queue.push('c', 3.0);
        assert!(queue.is_full());
        assert_eq!(queue.max_dist(), 5.0);
    }

    #[test]
    fn test_push_evicts_worst() {
        let mut queue = BoundedQueue::new(2);
        queue.push(1, 4.0);
        queue.push(2, 2.0);
        queue.push(3, 1.0);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.max_dist(), 2.0);
        assert_eq!(queue.peek().map(|n| n.point), Some(2));
        assert_eq!(queue.distances(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_pop_yields_descending() {
        let mut queue = BoundedQueue::new(4);
        for (i, d) in [3.0, 1.0, 4.0, 2.0].into_iter().enumerate() {
            queue.push(i, d);
        }

        let mut popped = Vec::new();
        while let Some(n) = queue.pop() {
            popped.push(n.distance);
        }
        assert_eq!(popped, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_into_sorted_vec_ascending() {
        let mut queue = BoundedQueue::new(3);
        queue.push("far", 9.0);
        queue.push("near", 0.5);
        queue.push("mid", 4.0);

        let sorted = queue.into_sorted_vec();
        let points: Vec<&str> = sorted.iter().map(|n| n.point).collect();
        assert_eq!(points, vec!["near", "mid", "far"]);
        assert_eq!(sorted[1].euclidean_distance(), 2.0);
    }

    #[test]
    fn test_try_push_filters() {
        let mut queue = BoundedQueue::new(1);
        assert!(queue.try_push(0, 2.0));
        assert!(!queue.try_push(1, 2.0));
        assert!(!queue.try_push(2, 3.0));
        assert!(queue.try_push(3, 1.0));
        assert_eq!(queue.peek().map(|n| n.point), Some(3));
    }

    #[test]
    fn test_infinite_distance_fills_open_slots() {
        let mut queue = BoundedQueue::new(2);
        assert!(queue.try_push('a', f64::INFINITY));
        assert!(queue.try_push('b', 0.0));
        assert!(queue.is_full());
        assert_eq!(queue.max_dist(), f64::INFINITY);
        assert!(!queue.try_push('c', f64::INFINITY));
        assert!(queue.try_push('d', 1.0));
        assert_eq!(queue.distances(), vec![0.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "does not improve")]
    fn test_push_non_improving_panics() {
        let mut queue = BoundedQueue::new(1);
        queue.push(0, 1.0);
        queue.push(1, 1.0);
    }

    #[test]
    fn test_merge_keeps_best() {
        let mut a = BoundedQueue::new(3);
        let mut b = BoundedQueue::new(3);
        for d in [1.0, 5.0, 7.0] {
            a.push(d as i32, d);
        }
        for d in [2.0, 3.0, 8.0] {
            b.push(d as i32, d);
        }

        a.merge(b);
        assert_eq!(a.distances(), vec![1.0, 2.0, 3.0]);
        assert_eq!(a.max_dist(), 3.0);
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _queue: BoundedQueue<u8> = BoundedQueue::new(0);
    }
}
