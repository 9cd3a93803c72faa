//! Configuration of the prioritized replay buffer.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`PrioritizedReplayBuffer`](super::PrioritizedReplayBuffer).
///
/// # Examples
///
/// ```
/// use replay_buffer::PrioritizedReplayBufferConfig;
///
/// let config = PrioritizedReplayBufferConfig::default()
///     .capacity(100_000)
///     .seed(7)
///     .alpha(1.0)
///     .beta(0.0);
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PrioritizedReplayBufferConfig {
    /// Maximum number of items that can be stored. Once the buffer is full,
    /// new items replace the oldest ones.
    pub capacity: usize,

    /// Seed of the random number generator used for sampling. Each buffer
    /// instance owns its own generator, so runs with the same seed are
    /// reproducible.
    pub seed: u64,

    /// Exponent for prioritization. Higher values increase the bias towards
    /// high-priority items; 0 results in uniform sampling. Must be in
    /// `[0, 1]`.
    pub alpha: f32,

    /// Exponent of the importance sampling weight correction. 0 disables the
    /// correction; 1 fully compensates for the non-uniform sampling. Must be
    /// in `[0, 1]`.
    pub beta: f32,

    /// Additive priority floor keeping every stored item sampleable even
    /// when its TD error is zero. Must be non-negative.
    pub epsilon: f32,
}

impl Default for PrioritizedReplayBufferConfig {
    /// Commonly used values: `capacity = 10000`, `seed = 42`, `alpha = 0.6`,
    /// `beta = 0.4`, `epsilon = 1e-6`.
    fn default() -> Self {
        Self {
            capacity: 10000,
            seed: 42,
            alpha: 0.6,
            beta: 0.4,
            epsilon: 1e-6,
        }
    }
}

impl PrioritizedReplayBufferConfig {
    /// Sets the capacity of the buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the prioritization exponent `alpha`.
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the importance sampling exponent `beta`.
    pub fn beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the priority floor `epsilon`.
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Loads the configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
