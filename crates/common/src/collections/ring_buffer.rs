//! Capacity-bounded FIFO buffer with oldest-first eviction.
//!
//! A [`RingBuffer`] keeps at most `capacity` items in insertion order. Pushing
//! into a full buffer drops the oldest item and reports it back to the caller,
//! which lets owners (such as the event log) account for evictions. Loading a
//! buffer from a longer sequence keeps only its most recent tail.
//!
//! # Panic Safety
//! - Public methods avoid panicking; a zero capacity is clamped to `1`.

use std::collections::VecDeque;

/// A fixed-capacity first-in-first-out buffer.
///
/// # Examples
///
/// ```rust
/// use gymtrack_common::collections::RingBuffer;
///
/// let mut buffer = RingBuffer::new(3);
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
/// assert_eq!(buffer.push(4), Some(1));
///
/// assert_eq!(buffer.to_vec(), vec![2, 3, 4]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` items.
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    /// Builds a buffer from `items`, keeping only the last `capacity` of them.
    #[must_use]
    pub fn from_tail<I>(capacity: usize, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut buffer = Self::new(capacity);
        for item in items {
            let _evicted = buffer.push(item);
        }
        buffer
    }

    /// Appends `item`, returning the evicted oldest item when the buffer was
    /// already full.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() { self.buf.pop_front() } else { None };
        self.buf.push_back(item);
        evicted
    }

    /// Returns the oldest item.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.buf.front()
    }

    /// Returns the newest item.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Number of items currently stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` when the buffer holds no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns `true` once the buffer holds `capacity` items.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Maximum number of items retained.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes every item; the capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Iterates from oldest to newest.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.buf.iter()
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copies the contents, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.buf.iter().cloned().collect()
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}
