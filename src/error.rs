use thiserror::Error;

/// Error types for `elemvec` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ElemVecError {
    /// Arguments were rejected before any state was touched
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Description of the rejected argument
        reason: &'static str,
    },
    /// Index is beyond the current element count
    #[error("Key not found: index {index} is beyond element count {length}")]
    KeyNotFound {
        /// Index that was accessed
        index: usize,
        /// Element count at the time of the access
        length: usize,
    },
    /// Removal or peek attempted on a vector without elements
    #[error("Operation on empty vector")]
    Empty,
    /// The memory procs could not provide the requested buffer
    #[error("Not enough memory: failed to obtain {requested} bytes")]
    NotEnoughMemory {
        /// Size of the buffer that was requested
        requested: usize,
    },
}

pub type Result<T> = core::result::Result<T, ElemVecError>;
