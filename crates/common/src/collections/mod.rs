//! Specialized data structures
//!
//! - **[`ring_buffer`]**: capacity-bounded FIFO buffer used by the event log

pub mod ring_buffer;

pub use ring_buffer::RingBuffer;
