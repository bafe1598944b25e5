//! Bounded top-k selection
//!
//! Keeps the `k` entries with the largest scores seen so far in a min-heap of at most `k`
//! entries. Once the heap is full a newcomer only gets in if its score is *strictly* greater than
//! the current minimum, in which case the minimum is evicted. A newcomer that ties the minimum is
//! discarded, so when scores tie at the boundary the entries seen first are the ones retained.
//!
//! - Time: `O(n log k)`
//! - Memory: `O(k)`

use std::collections::HashMap;
use std::hash::Hash;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::stats::heap::Heap;

/// Streaming selection of the `k` largest `(key, score)` pairs
pub struct BoundedTopK<K, A> {
    capacity: usize,
    heap: Heap<A, K>,
}

impl<K, A> BoundedTopK<K, A>
where
    A: PartialOrd,
{
    /// Creates a selector that retains at most `k` entries
    ///
    /// A capacity of zero is allowed; such a selector rejects every entry. Nothing is reserved
    /// up front, the heap grows with the entries it retains, so `k` may exceed the input length.
    pub fn new(k: usize) -> BoundedTopK<K, A> {
        BoundedTopK {
            capacity: k,
            heap: Heap::new(),
        }
    }

    /// Offers an entry to the selector, returns `true` if it was retained
    pub fn offer(&mut self, key: K, score: A) -> bool {
        if self.heap.len() < self.capacity {
            self.heap.push((score, key));
            return true;
        }

        let evict = match self.heap.peek() {
            Some((min, _)) => score > *min,
            // NB only reachable when `capacity == 0`
            None => false,
        };

        if evict {
            self.heap.pop();
            self.heap.push((score, key));
        }

        evict
    }

    /// Returns the smallest retained entry, the one that the next newcomer has to beat
    pub fn min(&self) -> Option<(&K, &A)> {
        self.heap.peek().map(|(score, key)| (key, score))
    }

    /// Returns the maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of retained entries
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Checks if no entry has been retained
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Consumes the selector, returning the retained entries sorted by descending score
    pub fn into_sorted_vec(mut self) -> Vec<(K, A)> {
        let mut out = Vec::with_capacity(self.heap.len());

        while let Some((score, key)) = self.heap.pop() {
            out.push((key, score));
        }

        out.reverse();
        out
    }
}

impl<K, A> Extend<(K, A)> for BoundedTopK<K, A>
where
    A: PartialOrd,
{
    fn extend<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, A)>,
    {
        for (key, score) in pairs {
            self.offer(key, score);
        }
    }
}

/// Returns the `k` pairs with the largest scores, sorted by descending score
///
/// The result has `min(k, number of pairs)` elements. See the module documentation for the tie
/// policy.
pub fn top_k<K, A, I>(pairs: I, k: usize) -> Vec<(K, A)>
where
    A: PartialOrd,
    I: IntoIterator<Item = (K, A)>,
{
    let mut selector = BoundedTopK::new(k);
    selector.extend(pairs);
    selector.into_sorted_vec()
}

/// Counts the occurrences of each key and returns the `k` most frequent ones
///
/// Keys are counted in first-seen order, so among keys with the same count at the boundary the
/// ones that appeared first in `keys` are retained.
pub fn most_frequent<K, I>(keys: I, k: usize) -> Vec<(K, usize)>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    top_k(counts, k)
}

/// Parallel version of [`top_k`]
///
/// The pairs are split into shards, each shard is reduced with its own selector and the shard
/// results are merged by running the selection again over their union. The returned scores are
/// the same as the ones `top_k` returns; which key is kept when scores tie across shards is
/// unspecified.
#[cfg(feature = "rayon")]
pub fn par_top_k<K, A>(pairs: &[(K, A)], k: usize) -> Vec<(K, A)>
where
    K: Clone + Send + Sync,
    A: PartialOrd + Copy + Send + Sync,
{
    if k == 0 || pairs.is_empty() {
        return Vec::new();
    }

    let shards = rayon::current_num_threads().max(1);
    let per_shard = ((pairs.len() + shards - 1) / shards).max(k);

    pairs
        .par_chunks(per_shard)
        .map(|shard| top_k(shard.iter().cloned(), k))
        .reduce(Vec::new, |a, b| top_k(a.into_iter().chain(b), k))
}
