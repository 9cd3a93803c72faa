//! Prioritized replay buffer implementation.
use super::PrioritizedReplayBufferConfig;
use crate::error::ReplayError;
use crate::ring_buffer::RingState;
use crate::sum_tree::SumTree;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::RwLock;

/// One element of a prioritized batch.
///
/// The `index` is the physical storage slot the item was drawn from; pass it
/// back to
/// [`update_priorities`](PrioritizedReplayBuffer::update_priorities) after
/// computing the TD error. It is not a logical (oldest-first) position and
/// stays valid until the slot is overwritten by a later add.
#[derive(Clone, Debug, PartialEq)]
pub struct PrioritizedSample<T> {
    /// The stored payload.
    pub item: T,

    /// Importance sampling weight `(len * p / total)^(-beta)` correcting the
    /// bias of non-uniform sampling.
    pub weight: f32,

    /// Physical slot the item was drawn from.
    pub index: usize,
}

/// State behind the buffer's single lock. The ring/tree handoff is only ever
/// mutated through this struct, so no compound operation can be observed
/// half-applied.
struct Inner<T> {
    ring: RingState<T>,
    tree: SumTree,
    max_priority: f32,
    rng: StdRng,
}

/// A thread-safe replay buffer with proportional prioritized sampling.
///
/// Composes a ring buffer and a sum tree of equal capacity. Each stored item
/// occupies one physical slot in both structures: the ring holds the payload,
/// the tree holds its priority weight. New items are seeded at the largest
/// priority seen so far, so they are sampled at least once before their TD
/// error is known; [`sample`](Self::sample) then draws slots proportionally
/// to priority and [`update_priorities`](Self::update_priorities) rewrites
/// the weights from caller-supplied TD errors.
///
/// A single reader/writer lock spans both substructures. `add`, `sample` and
/// `update_priorities` each run as one exclusive critical section, which
/// makes every compound operation linearizable with respect to every other;
/// sampling serializes against inserts by design.
pub struct PrioritizedReplayBuffer<T> {
    capacity: usize,
    alpha: f32,
    beta: f32,
    epsilon: f32,
    inner: RwLock<Inner<T>>,
}

impl<T> PrioritizedReplayBuffer<T> {
    /// Creates a buffer from the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if `capacity` is zero, `alpha` or `beta` is outside `[0, 1]`,
    /// or `epsilon` is negative.
    pub fn build(config: &PrioritizedReplayBufferConfig) -> Result<Self, ReplayError> {
        if !(0f32..=1f32).contains(&config.alpha) {
            return Err(ReplayError::HyperParamOutOfRange {
                name: "alpha",
                value: config.alpha,
            });
        }
        if !(0f32..=1f32).contains(&config.beta) {
            return Err(ReplayError::HyperParamOutOfRange {
                name: "beta",
                value: config.beta,
            });
        }
        if !(config.epsilon >= 0f32) {
            return Err(ReplayError::NegativeEpsilon(config.epsilon));
        }

        let ring = RingState::new(config.capacity)?;
        let tree = SumTree::new(config.capacity)?;
        debug!(
            "create PrioritizedReplayBuffer: capacity={}, alpha={}, beta={}, epsilon={}",
            config.capacity, config.alpha, config.beta, config.epsilon
        );

        Ok(Self {
            capacity: config.capacity,
            alpha: config.alpha,
            beta: config.beta,
            epsilon: config.epsilon,
            inner: RwLock::new(Inner {
                ring,
                tree,
                max_priority: 1.0,
                rng: StdRng::seed_from_u64(config.seed),
            }),
        })
    }

    /// Adds an item, assigning it the running maximum priority.
    ///
    /// When the buffer is full the oldest item is overwritten, and its
    /// priority weight in the tree is replaced along with it.
    pub fn add(&self, item: T) {
        let mut inner = self.inner.write().unwrap();
        let ix = inner.ring.add(item);
        let p = inner.max_priority;
        inner
            .tree
            .set(ix, p)
            .expect("ring returns slots within the shared capacity");
    }

    /// Updates priority weights from TD errors.
    ///
    /// For each pair `(ix, e)`, the weight of physical slot `ix` becomes
    /// `(|e| + epsilon)^alpha`, and the running maximum priority is raised if
    /// exceeded.
    ///
    /// # Errors
    ///
    /// Fails if the slices differ in length or any index is out of range.
    /// Both conditions are checked before the first write, so a failing call
    /// leaves every weight unchanged.
    pub fn update_priorities(&self, indices: &[usize], td_errors: &[f32]) -> Result<(), ReplayError> {
        if indices.len() != td_errors.len() {
            return Err(ReplayError::LengthMismatch {
                indices: indices.len(),
                td_errors: td_errors.len(),
            });
        }
        if let Some(&index) = indices.iter().find(|&&ix| ix >= self.capacity) {
            return Err(ReplayError::IndexOutOfRange {
                index,
                len: self.capacity,
            });
        }

        let mut inner = self.inner.write().unwrap();
        for (&ix, &td_err) in indices.iter().zip(td_errors.iter()) {
            let priority = (td_err.abs() + self.epsilon).powf(self.alpha);
            inner
                .tree
                .set(ix, priority)
                .expect("indices are range-checked above");
            if inner.max_priority < priority {
                inner.max_priority = priority;
            }
        }
        Ok(())
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored items.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().ring.len()
    }

    /// Returns `true` if no items are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().ring.is_empty()
    }

    /// Returns `true` if every slot holds an item.
    pub fn is_full(&self) -> bool {
        self.inner.read().unwrap().ring.is_full()
    }

    /// Returns the prioritization exponent.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Returns the importance sampling exponent.
    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// Returns the priority floor.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Returns the largest priority observed so far (never decreases).
    pub fn max_priority(&self) -> f32 {
        self.inner.read().unwrap().max_priority
    }
}

impl<T: Clone> PrioritizedReplayBuffer<T> {
    /// Draws a batch of `batch_size` items proportionally to their priority
    /// weights, with replacement.
    ///
    /// Each draw picks a threshold uniformly from `[0, total)`, descends the
    /// sum tree to a physical slot and reads the payload at that slot. The
    /// returned weight is `(len * p / total)^(-beta)`.
    ///
    /// # Errors
    ///
    /// Fails if the buffer is empty, or if every stored priority is zero
    /// (possible only with `epsilon = 0`).
    pub fn sample(&self, batch_size: usize) -> Result<Vec<PrioritizedSample<T>>, ReplayError> {
        let mut inner = self.inner.write().unwrap();
        let total = inner.tree.total();
        if inner.ring.is_empty() || !(total > 0f32) {
            return Err(ReplayError::EmptyBuffer);
        }
        let len = inner.ring.len() as f32;

        let mut samples = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            let value = inner.rng.gen_range(0f32..total);
            let index = inner.tree.sample(value)?;
            let priority = inner.tree.get(index)?;
            let weight = (len * priority / total).powf(-self.beta);
            let item = inner.ring.get_physical(index)?.clone();
            samples.push(PrioritizedSample {
                item,
                weight,
                index,
            });
        }
        Ok(samples)
    }
}
