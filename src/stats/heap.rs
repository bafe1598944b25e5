//! Array-backed binary min-heap
//!
//! Entries are `(score, key)` pairs ordered by `score` alone; the key is carried along as payload
//! and never compared. The heap is stored as an implicit binary tree where the children of index
//! `i` live at `2i + 1` and `2i + 2`.
//!
//! Invariant (holds before and after every public call):
//!
//! ``` ignore
//! for i in 1..heap.len() {
//!     assert!(heap[parent(i)].0 <= heap[i].0);
//! }
//! ```
//!
//! so the root is always an entry with the smallest score currently held.

/// A binary min-heap of `(score, key)` entries
#[derive(Clone, Debug)]
pub struct Heap<A, K> {
    data: Vec<(A, K)>,
}

impl<A, K> Default for Heap<A, K> {
    fn default() -> Heap<A, K> {
        Heap { data: Vec::new() }
    }
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn left(i: usize) -> usize {
    2 * i + 1
}

fn right(i: usize) -> usize {
    2 * i + 2
}

impl<A, K> Heap<A, K>
where
    A: PartialOrd,
{
    /// Creates an empty heap
    pub fn new() -> Heap<A, K> {
        Heap::default()
    }

    /// Creates an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Heap<A, K> {
        Heap {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Inserts an entry
    ///
    /// - Time: `O(log length)`
    pub fn push(&mut self, entry: (A, K)) {
        self.data.push(entry);
        let last = self.data.len() - 1;
        self.sift_up(last);
    }

    /// Removes and returns the entry with the smallest score, or `None` if the heap is empty
    ///
    /// - Time: `O(log length)`
    pub fn pop(&mut self) -> Option<(A, K)> {
        let last = self.data.pop()?;

        if self.data.is_empty() {
            return Some(last);
        }

        let top = std::mem::replace(&mut self.data[0], last);
        self.sift_down(0);
        Some(top)
    }

    /// Returns the entry with the smallest score without removing it
    ///
    /// - Time: `O(1)`
    pub fn peek(&self) -> Option<&(A, K)> {
        self.data.first()
    }

    /// Returns the number of entries in the heap
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the heap holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = parent(i);
            if self.data[i].0 < self.data[p].0 {
                self.data.swap(p, i);
                i = p;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.data.len();

        loop {
            let (l, r) = (left(i), right(i));
            let mut smallest = i;

            if l < n && self.data[l].0 < self.data[smallest].0 {
                smallest = l;
            }
            if r < n && self.data[r].0 < self.data[smallest].0 {
                smallest = r;
            }
            if smallest == i {
                break;
            }

            self.data.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    pub(crate) fn is_valid(&self) -> bool {
        (1..self.data.len()).all(|i| self.data[parent(i)].0 <= self.data[i].0)
    }
}

#[cfg(test)]
mod test {
    use quickcheck::quickcheck;
    use quickcheck::TestResult;

    use super::Heap;

    // `true` pushes the next value, `false` pops
    quickcheck! {
        fn invariant_holds_after_any_operation(values: Vec<i16>, ops: Vec<bool>) -> TestResult {
            let mut heap = Heap::new();
            let mut values = values.into_iter();

            for push in ops {
                if push {
                    match values.next() {
                        Some(v) => heap.push((v, ())),
                        None => break,
                    }
                } else {
                    heap.pop();
                }

                if !heap.is_valid() {
                    return TestResult::from_bool(false);
                }
            }

            TestResult::from_bool(heap.is_valid())
        }
    }

    // Draining the heap yields the scores in ascending order
    quickcheck! {
        fn drains_in_ascending_order(values: Vec<i32>) -> bool {
            let mut heap = Heap::with_capacity(values.len());
            for &v in &values {
                heap.push((v, v));
            }

            let mut drained = Vec::with_capacity(values.len());
            while let Some((score, _)) = heap.pop() {
                drained.push(score);
            }

            let mut expected = values;
            expected.sort_unstable();
            drained == expected
        }
    }

    #[test]
    fn empty() {
        let mut heap: Heap<f64, &str> = Heap::new();

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert!(heap.peek().is_none());
        assert!(heap.pop().is_none());
    }

    #[test]
    fn peek_returns_minimum_without_removing_it() {
        let mut heap = Heap::new();
        for &(score, key) in &[(5.0, "e"), (1.5, "a"), (3.0, "c"), (0.5, "z"), (4.0, "d")] {
            heap.push((score, key));
        }

        assert_eq!(heap.peek(), Some(&(0.5, "z")));
        assert_eq!(heap.len(), 5);
        assert_eq!(heap.pop(), Some((0.5, "z")));
        assert_eq!(heap.peek(), Some(&(1.5, "a")));
        assert_eq!(heap.len(), 4);
    }

    #[test]
    fn keys_are_never_compared() {
        struct Opaque;

        let mut heap = Heap::new();
        heap.push((2, Opaque));
        heap.push((1, Opaque));
        heap.push((2, Opaque));

        assert_eq!(heap.pop().map(|(s, _)| s), Some(1));
        assert_eq!(heap.pop().map(|(s, _)| s), Some(2));
        assert_eq!(heap.pop().map(|(s, _)| s), Some(2));
        assert!(heap.pop().is_none());
    }
}
