//! Fixed-capacity circular buffer with overwrite-on-full semantics.
use crate::error::ReplayError;
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::RwLock;

/// Unsynchronized circular storage.
///
/// Holds the head/tail/size bookkeeping and the backing vector. [`RingBuffer`]
/// wraps it in a lock for standalone use; the prioritized buffer embeds it
/// directly inside its own critical sections.
pub(crate) struct RingState<T> {
    capacity: usize,
    items: Vec<T>,
    head: usize,
    tail: usize,
    size: usize,
}

impl<T> RingState<T> {
    pub(crate) fn new(capacity: usize) -> Result<Self, ReplayError> {
        if capacity == 0 {
            return Err(ReplayError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            items: Vec::with_capacity(capacity),
            head: 0,
            tail: 0,
            size: 0,
        })
    }

    /// Writes `item` and returns the physical slot it landed in.
    ///
    /// While filling, the write goes to `tail`. Once full, the slot at `tail`
    /// holds the oldest element, so the write overwrites it and the head
    /// advances with the tail.
    pub(crate) fn add(&mut self, item: T) -> usize {
        let stored_index = self.tail;
        if self.size != self.capacity {
            self.items.push(item);
            self.tail = (self.tail + 1) % self.capacity;
            self.size += 1;
        } else {
            self.items[self.tail] = item;
            self.tail = (self.tail + 1) % self.capacity;
            self.head = (self.head + 1) % self.capacity;
        }
        stored_index
    }

    /// Oldest-first access: logical index 0 is the oldest surviving element.
    pub(crate) fn get(&self, index: usize) -> Result<&T, ReplayError> {
        if index >= self.size {
            return Err(ReplayError::IndexOutOfRange {
                index,
                len: self.size,
            });
        }
        Ok(&self.items[(self.head + index) % self.capacity])
    }

    pub(crate) fn set(&mut self, index: usize, item: T) -> Result<(), ReplayError> {
        if index >= self.size {
            return Err(ReplayError::IndexOutOfRange {
                index,
                len: self.size,
            });
        }
        self.items[(self.head + index) % self.capacity] = item;
        Ok(())
    }

    /// Direct slot access, independent of the logical head offset.
    ///
    /// Physical indices are what the prioritized layer hands around; a slot is
    /// addressable once it has been written at least once.
    pub(crate) fn get_physical(&self, index: usize) -> Result<&T, ReplayError> {
        if index >= self.items.len() {
            return Err(ReplayError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(&self.items[index])
    }

    pub(crate) fn len(&self) -> usize {
        self.size
    }

    pub(crate) fn is_full(&self) -> bool {
        self.size == self.capacity
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.head = 0;
        self.tail = 0;
        self.size = 0;
    }
}

struct Inner<T> {
    state: RingState<T>,
    rng: StdRng,
}

/// A thread-safe, fixed-capacity circular buffer.
///
/// Once the buffer is full, each added element overwrites the oldest one.
/// Elements are addressed by logical index, oldest first. All operations are
/// synchronized by an internal reader/writer lock: queries take the shared
/// lock, mutations (including [`sample`](RingBuffer::sample), which advances
/// the instance-owned RNG) take the exclusive lock.
///
/// # Examples
///
/// ```
/// use replay_buffer::RingBuffer;
///
/// let buffer = RingBuffer::new(3).unwrap();
/// for i in 0..5 {
///     buffer.add(i);
/// }
/// // 0 and 1 have been overwritten
/// assert_eq!(buffer.get(0).unwrap(), 2);
/// assert_eq!(buffer.get(2).unwrap(), 4);
/// ```
pub struct RingBuffer<T> {
    capacity: usize,
    inner: RwLock<Inner<T>>,
}

impl<T> RingBuffer<T> {
    /// Creates a buffer with the given capacity, seeding the sampling RNG
    /// from system entropy.
    ///
    /// # Errors
    ///
    /// Fails if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ReplayError> {
        Self::build(capacity, StdRng::from_entropy())
    }

    /// Creates a buffer with a fixed RNG seed, for reproducible sampling.
    ///
    /// # Errors
    ///
    /// Fails if `capacity` is zero.
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self, ReplayError> {
        Self::build(capacity, StdRng::seed_from_u64(seed))
    }

    fn build(capacity: usize, rng: StdRng) -> Result<Self, ReplayError> {
        let state = RingState::new(capacity)?;
        trace!("create RingBuffer with capacity {}", capacity);
        Ok(Self {
            capacity,
            inner: RwLock::new(Inner { state, rng }),
        })
    }

    /// Adds an element, returning the physical slot it was stored in.
    ///
    /// Never fails; when the buffer is full the oldest element is replaced.
    pub fn add(&self, item: T) -> usize {
        self.inner.write().unwrap().state.add(item)
    }

    /// Overwrites the element at the given logical index.
    ///
    /// # Errors
    ///
    /// Fails if `index >= len()`.
    pub fn set(&self, index: usize, item: T) -> Result<(), ReplayError> {
        self.inner.write().unwrap().state.set(index, item)
    }

    /// Returns the number of stored elements.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().state.len()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if every slot holds an element.
    pub fn is_full(&self) -> bool {
        self.inner.read().unwrap().state.is_full()
    }

    /// Returns `true` if no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().state.is_empty()
    }

    /// Resets the buffer to the empty state.
    pub fn clear(&self) {
        trace!("clear RingBuffer");
        self.inner.write().unwrap().state.clear()
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Returns a copy of the element at the given logical index (0 = oldest).
    ///
    /// # Errors
    ///
    /// Fails if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<T, ReplayError> {
        self.inner.read().unwrap().state.get(index).map(T::clone)
    }

    /// Returns a copy of the element at the given physical slot.
    ///
    /// Physical slots are the indices returned by [`add`](RingBuffer::add);
    /// unlike [`get`](RingBuffer::get) they do not shift as old elements are
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Fails if the slot has never been written.
    pub fn get_physical(&self, index: usize) -> Result<T, ReplayError> {
        self.inner
            .read()
            .unwrap()
            .state
            .get_physical(index)
            .map(T::clone)
    }

    /// Draws `batch_size` elements uniformly at random, with replacement.
    ///
    /// # Errors
    ///
    /// Fails if `batch_size` is zero or exceeds the number of stored
    /// elements.
    pub fn sample(&self, batch_size: usize) -> Result<Vec<T>, ReplayError> {
        let mut inner = self.inner.write().unwrap();
        let len = inner.state.len();
        if batch_size == 0 || batch_size > len {
            return Err(ReplayError::InvalidBatchSize { batch_size, len });
        }

        let mut result = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            let ix = inner.rng.gen_range(0..len);
            // checked against len above
            let item = inner.state.get(ix)?.clone();
            result.push(item);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction() {
        let buffer = RingBuffer::<i32>::new(10).unwrap();
        assert_eq!(buffer.capacity(), 10);
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
    }

    #[test]
    fn zero_capacity_fails() {
        assert_eq!(
            RingBuffer::<i32>::new(0).err(),
            Some(ReplayError::ZeroCapacity)
        );
    }

    #[test]
    fn add_while_filling() {
        let buffer = RingBuffer::new(5).unwrap();
        assert_eq!(buffer.add(1), 0);
        assert_eq!(buffer.add(2), 1);
        assert_eq!(buffer.add(3), 2);

        assert_eq!(buffer.len(), 3);
        assert!(!buffer.is_full());
        assert_eq!(buffer.get(0).unwrap(), 1);
        assert_eq!(buffer.get(1).unwrap(), 2);
        assert_eq!(buffer.get(2).unwrap(), 3);
    }

    #[test]
    fn wraps_around_when_full() {
        let buffer = RingBuffer::new(3).unwrap();
        buffer.add(1);
        buffer.add(2);
        buffer.add(3);
        assert!(buffer.is_full());

        // overwrites slot 0, which held the oldest element
        assert_eq!(buffer.add(4), 0);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get(0).unwrap(), 2);
        assert_eq!(buffer.get(1).unwrap(), 3);
        assert_eq!(buffer.get(2).unwrap(), 4);
    }

    #[test]
    fn multiple_wraps() {
        let buffer = RingBuffer::new(3).unwrap();
        for i in 0..10 {
            buffer.add(i + 1);
        }
        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());
        assert_eq!(buffer.get(0).unwrap(), 8);
        assert_eq!(buffer.get(1).unwrap(), 9);
        assert_eq!(buffer.get(2).unwrap(), 10);
    }

    #[test]
    fn physical_indices_are_stable() {
        let buffer = RingBuffer::new(3).unwrap();
        buffer.add(1);
        buffer.add(2);
        buffer.add(3);
        buffer.add(4); // lands in slot 0

        assert_eq!(buffer.get_physical(0).unwrap(), 4);
        assert_eq!(buffer.get_physical(1).unwrap(), 2);
        assert_eq!(buffer.get_physical(2).unwrap(), 3);
    }

    #[test]
    fn get_physical_unwritten_slot_fails() {
        let buffer = RingBuffer::new(3).unwrap();
        buffer.add(1);
        assert!(buffer.get_physical(0).is_ok());
        assert_eq!(
            buffer.get_physical(1).err(),
            Some(ReplayError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn out_of_range_access_fails() {
        let buffer = RingBuffer::new(3).unwrap();
        buffer.add(7);
        buffer.add(8);
        buffer.add(9);
        assert_eq!(
            buffer.get(3).err(),
            Some(ReplayError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(buffer.set(3, 0).is_err());
    }

    #[test]
    fn set_overwrites_logical_index() {
        let buffer = RingBuffer::new(3).unwrap();
        buffer.add(1);
        buffer.add(2);
        buffer.add(3);
        buffer.add(4); // oldest is now 2

        buffer.set(0, 20).unwrap();
        assert_eq!(buffer.get(0).unwrap(), 20);
        assert_eq!(buffer.get(1).unwrap(), 3);
    }

    #[test]
    fn clear_resets_to_empty() {
        let buffer = RingBuffer::new(3).unwrap();
        buffer.add(7);
        buffer.add(8);
        buffer.add(9);
        buffer.clear();

        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
        assert!(buffer.get(0).is_err());

        // refilling after a clear starts from slot 0 again
        assert_eq!(buffer.add(1), 0);
        assert_eq!(buffer.get(0).unwrap(), 1);
    }

    #[test]
    fn sample_draws_stored_elements() {
        let buffer = RingBuffer::with_seed(5, 42).unwrap();
        buffer.add(1);
        buffer.add(2);
        buffer.add(3);

        let samples = buffer.sample(10).err();
        assert_eq!(
            samples,
            Some(ReplayError::InvalidBatchSize {
                batch_size: 10,
                len: 3
            })
        );

        let samples = buffer.sample(3).unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| (1..=3).contains(s)));
    }

    #[test]
    fn sample_invalid_batch_size_fails() {
        let buffer = RingBuffer::<i32>::with_seed(5, 42).unwrap();
        assert!(buffer.sample(0).is_err());
        assert!(buffer.sample(1).is_err());
        buffer.add(1);
        assert!(buffer.sample(0).is_err());
        assert!(buffer.sample(1).is_ok());
        assert!(buffer.sample(2).is_err());
    }

    #[test]
    fn works_with_non_copy_payloads() {
        let buffer = RingBuffer::new(2).unwrap();
        buffer.add("hello".to_string());
        buffer.add("world".to_string());
        buffer.add("!".to_string());
        assert_eq!(buffer.get(0).unwrap(), "world");
        assert_eq!(buffer.get(1).unwrap(), "!");
    }
}
