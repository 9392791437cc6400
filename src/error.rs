use thiserror::Error;

/// Errors reported by [`Pool`](crate::Pool) operations.
///
/// No variant leaves the block chain in a modified state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
  /// Requested size was zero or negative.
  #[error("invalid allocation size: {requested}")]
  InvalidSize { requested: isize },

  /// No free block is large enough for the aligned request.
  #[error("out of memory: no free block of {requested} bytes")]
  OutOfMemory { requested: usize },

  #[error("deallocation failed: null pointer")]
  NullDeallocation,

  #[error("deallocation failed: block already free at offset {offset}")]
  DoubleFree { offset: usize },

  /// The handle does not point just past any header in the chain.
  #[error("deallocation failed: no block at offset {offset}")]
  InvalidHandle { offset: usize },
}

pub type Result<T> = std::result::Result<T, PoolError>;
