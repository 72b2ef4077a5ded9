//! Blocking bounded queue with producer-count termination.
//!
//! Consumers learn that no more items will arrive when the buffer is empty **and** every
//! registered producer has unregistered. No sentinel items and no expected-item counts.
//!
//! # Correctness Invariants
//!
//! - **Bounded**: `len() <= capacity()` at all times (enforced by the ring buffer under the lock).
//! - **Single lock**: buffer and producer count change only under `state`.
//! - **Guarded waits**: every wait re-checks its predicate on wake (`Condvar::wait_while`).
//! - **Balanced registration**: stage code registers through [`Producer`], whose `Drop`
//!   unregisters, so the count returns to zero even when a producing thread unwinds.
//!
//! | Operation            | Blocks while                        | Wakes                              |
//! |----------------------|-------------------------------------|------------------------------------|
//! | enqueue()            | buffer full                         | consumers, on empty -> non-empty   |
//! | dequeue()            | buffer empty and producers > 0      | producers, on full -> non-full     |
//! | unregister_producer()| never                               | all consumers                      |

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use super::error::QueueError;
use super::ring_buffer::RingBuffer;

/// Result of [`BoundedQueue::dequeue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dequeued<T> {
    /// Head item of the queue.
    Item(T),
    /// Buffer drained and no producer is registered: nothing will ever arrive.
    Done,
}

impl<T> Dequeued<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Dequeued::Done)
    }

    pub fn into_item(self) -> Option<T> {
        match self {
            Dequeued::Item(item) => Some(item),
            Dequeued::Done => None,
        }
    }
}

/// State protected by the queue mutex.
#[derive(Debug)]
struct State<T> {
    ring: RingBuffer<T>,
    producers: usize,
}

/// Fixed-capacity multi-producer multi-consumer blocking queue.
///
/// Share it between stages as `Arc<BoundedQueue<T>>`.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    /// Signalled when the buffer leaves the full state.
    not_full: Condvar,
    /// Signalled when the buffer leaves the empty state or a producer unregisters.
    available: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        let ring = RingBuffer::new(capacity)?;
        Ok(Self {
            state: Mutex::new(State { ring, producers: 0 }),
            not_full: Condvar::new(),
            available: Condvar::new(),
            capacity,
        })
    }

    /// Lock state with poison recovery.
    ///
    /// Every mutation of `State` completes before the guard is released, so a panic elsewhere
    /// cannot leave it half-updated. Unregister runs from `Drop` and must not panic.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add one live producer. Call before the first `enqueue` of that producer.
    pub fn register_producer(&self) {
        self.lock().producers += 1;
    }

    /// Remove one live producer and wake every waiting consumer so it can re-check for `Done`.
    pub fn unregister_producer(&self) {
        let mut st = self.lock();
        debug_assert!(st.producers > 0, "unregister_producer without register_producer");
        st.producers = st.producers.saturating_sub(1);
        self.available.notify_all();
    }

    /// Register a producer and return a handle that unregisters it on drop.
    pub fn producer(self: &Arc<Self>) -> Producer<T> {
        self.register_producer();
        Producer {
            queue: Arc::clone(self),
        }
    }

    /// Append `item`, blocking while the buffer is full.
    pub fn enqueue(&self, item: T) {
        let guard = self.lock();
        let mut st = self
            .not_full
            .wait_while(guard, |st| st.ring.is_full())
            .unwrap_or_else(PoisonError::into_inner);
        let was_empty = st.ring.is_empty();
        let pushed = st.ring.enqueue(item);
        debug_assert!(pushed.is_ok(), "ring full after waiting for space");
        if was_empty {
            self.available.notify_all();
        }
    }

    /// Take the head item, blocking while the buffer is empty and producers are registered.
    ///
    /// Returns [`Dequeued::Done`] once the buffer is empty and the producer count is zero.
    pub fn dequeue(&self) -> Dequeued<T> {
        let guard = self.lock();
        let mut st = self
            .available
            .wait_while(guard, |st| st.ring.is_empty() && st.producers > 0)
            .unwrap_or_else(PoisonError::into_inner);
        let was_full = st.ring.is_full();
        match st.ring.dequeue() {
            Ok(item) => {
                if was_full {
                    self.not_full.notify_all();
                }
                Dequeued::Item(item)
            }
            // Woken with an empty buffer: the predicate only lets us through when producers == 0.
            Err(_) => Dequeued::Done,
        }
    }

    /// Blocking iterator over items until [`Dequeued::Done`].
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { queue: self }
    }

    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn producer_count(&self) -> usize {
        self.lock().producers
    }
}

/// Iterator returned by [`BoundedQueue::iter`].
pub struct Iter<'a, T> {
    queue: &'a BoundedQueue<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.dequeue().into_item()
    }
}

/// A live producer registration on a [`BoundedQueue`].
///
/// Created by [`BoundedQueue::producer`]; dropping it unregisters. Cloning registers another
/// producer, so each clone must be dropped for consumers to see `Done`.
pub struct Producer<T> {
    queue: Arc<BoundedQueue<T>>,
}

impl<T> Producer<T> {
    /// Append `item` to the queue, blocking while it is full.
    pub fn enqueue(&self, item: T) {
        self.queue.enqueue(item);
    }
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        self.queue.producer()
    }
}

impl<T> Drop for Producer<T> {
    fn drop(&mut self) {
        self.queue.unregister_producer();
    }
}
