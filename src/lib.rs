#![warn(missing_docs)]
//! Thread-safe experience replay buffers for reinforcement learning.
//!
//! This crate provides fixed-capacity storage for interaction tuples and the
//! sampling machinery training loops need on top of it:
//!
//! - [`RingBuffer`] - a circular store that overwrites its oldest entry once
//!   full, with uniform sampling. Safe to share across threads.
//! - [`SumTree`] - a binary tree of priority weights supporting O(log N)
//!   updates and O(log N) proportional sampling.
//! - [`PrioritizedReplayBuffer`] - the composition of the two: new items are
//!   seeded at the running maximum priority, batches are drawn proportionally
//!   to priority with importance-sampling weight corrections, and priorities
//!   are rewritten from TD errors. Safe to share across threads.
//!
//! Stores treat their payload as an opaque, cloneable value. [`Transition`]
//! is provided as a convenience payload for the common (s, a, r, s', done)
//! case, but any `Clone` type works.
//!
//! ```
//! use replay_buffer::{PrioritizedReplayBuffer, PrioritizedReplayBufferConfig};
//!
//! let config = PrioritizedReplayBufferConfig::default().capacity(1000);
//! let buffer = PrioritizedReplayBuffer::build(&config).unwrap();
//!
//! for i in 0..100 {
//!     buffer.add(i);
//! }
//!
//! let batch = buffer.sample(32).unwrap();
//! let ixs: Vec<_> = batch.iter().map(|s| s.index).collect();
//! let td_errs = vec![0.5; ixs.len()];
//! buffer.update_priorities(&ixs, &td_errs).unwrap();
//! ```
pub mod error;

mod prioritized_replay_buffer;
mod ring_buffer;
mod sum_tree;
mod transition;

pub use error::ReplayError;
pub use prioritized_replay_buffer::{
    PrioritizedReplayBuffer, PrioritizedReplayBufferConfig, PrioritizedSample,
};
pub use ring_buffer::RingBuffer;
pub use sum_tree::SumTree;
pub use transition::Transition;
