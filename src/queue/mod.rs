//! Queues connecting the pipeline stages: an unsynchronized ring buffer and the blocking
//! bounded queue built on it.

pub mod bounded;
pub mod error;
pub mod ring_buffer;

pub use bounded::{BoundedQueue, Dequeued, Iter, Producer};
pub use error::QueueError;
pub use ring_buffer::RingBuffer;
