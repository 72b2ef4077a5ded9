//! Fixed-capacity ring buffer with heap-allocated slots.
//!
//! # Invariants
//! - `len <= capacity` and `capacity >= 1`.
//! - `head` indexes the logical front; `tail` is the next write slot.
//! - Slots in the logical range `[head, head + len)` (wrapping modulo capacity) are `Some`;
//!   every other slot is `None`.
//!
//! # Threading
//! Not synchronized. [`BoundedQueue`](super::BoundedQueue) always uses it under its lock.

use super::error::QueueError;

/// Fixed-capacity FIFO over a boxed slice of slots.
///
/// Capacity is chosen at runtime (the pipeline reads it from options), so storage lives on the
/// heap and indices wrap with `%` rather than a power-of-two mask.
#[derive(Debug)]
pub struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Allocate an empty buffer holding at most `capacity` items.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity);
        }
        let slots = std::iter::repeat_with(|| None).take(capacity).collect();
        Ok(Self {
            slots,
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append `item` at the tail. Fails with [`QueueError::Full`] when at capacity; the item is
    /// dropped in that case, so callers check [`is_full`](Self::is_full) first.
    pub fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::Full);
        }
        debug_assert!(self.slots[self.tail].is_none(), "tail slot occupied");
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
        debug_assert!(self.len <= self.capacity());
        Ok(())
    }

    /// Remove and return the item at the head. Fails with [`QueueError::Empty`] when empty.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        let item = self.slots[self.head].take().ok_or(QueueError::Empty)?;
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Ok(item)
    }
}
