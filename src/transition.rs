//! A convenience payload type for RL experience.
use serde::{Deserialize, Serialize};

/// A single experience transition `(s, a, r, s', done)`.
///
/// The replay buffers never look inside their payload, so any `Clone` type
/// can be stored; this struct covers the common case. The optional
/// [`priority`](Transition::priority) field is carried for the calling layer
/// (e.g. an actor process precomputing initial priorities) and is ignored by
/// the buffers themselves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition<O, A> {
    /// Observation before the action.
    pub observation: O,

    /// Action taken.
    pub action: A,

    /// Reward received.
    pub reward: f32,

    /// Observation after the action.
    pub next_observation: O,

    /// Whether the episode terminated at this step.
    pub done: bool,

    /// Priority assigned by the caller, if any. Not used by the buffers.
    pub priority: Option<f32>,
}

impl<O, A> Transition<O, A> {
    /// Creates a transition without a caller-assigned priority.
    pub fn new(observation: O, action: A, reward: f32, next_observation: O, done: bool) -> Self {
        Self {
            observation,
            action,
            reward,
            next_observation,
            done,
            priority: None,
        }
    }

    /// Sets the caller-assigned priority.
    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }
}
