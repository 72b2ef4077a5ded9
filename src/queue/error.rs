use thiserror::Error;

/// Errors from the ring buffer and queue constructors.
///
/// `Full` and `Empty` only come out of [`RingBuffer`](super::RingBuffer). The blocking
/// [`BoundedQueue`](super::BoundedQueue) waits instead of reporting them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue capacity must be at least 1")]
    InvalidCapacity,

    #[error("queue is full")]
    Full,

    #[error("queue is empty")]
    Empty,
}
