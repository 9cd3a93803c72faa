//! Errors in the library.
use thiserror::Error;

/// Errors raised by the replay buffers.
///
/// Every variant is a synchronous precondition violation: the failing call
/// returns before mutating any shared state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// Capacity of zero was given at construction.
    #[error("capacity must be greater than 0")]
    ZeroCapacity,

    /// A hyperparameter was outside `[0, 1]`.
    #[error("{name} must be in [0, 1], got {value}")]
    HyperParamOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// Epsilon was negative.
    #[error("epsilon must be non-negative, got {0}")]
    NegativeEpsilon(f32),

    /// An index was past the end of the addressable range.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Number of addressable elements.
        len: usize,
    },

    /// A batch size of zero or larger than the stored element count.
    #[error("batch size {batch_size} invalid for buffer of size {len}")]
    InvalidBatchSize {
        /// The rejected batch size.
        batch_size: usize,
        /// Number of stored elements.
        len: usize,
    },

    /// A sample value outside `[0, total]` was passed to the sum tree.
    #[error("sample value {value} out of range [0, {total}]")]
    SampleValueOutOfRange {
        /// The rejected value.
        value: f32,
        /// Current total of the tree.
        total: f32,
    },

    /// The index and TD-error slices passed to a priority update differ in
    /// length.
    #[error("indices and td_errors must have the same length: {indices} != {td_errors}")]
    LengthMismatch {
        /// Length of the index slice.
        indices: usize,
        /// Length of the TD-error slice.
        td_errors: usize,
    },

    /// A sample was requested from an empty buffer.
    #[error("cannot sample from an empty buffer")]
    EmptyBuffer,
}
