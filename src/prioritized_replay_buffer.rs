//! Prioritized experience replay on top of the ring buffer and sum tree.
mod base;
mod config;

pub use base::{PrioritizedReplayBuffer, PrioritizedSample};
pub use config::PrioritizedReplayBufferConfig;
