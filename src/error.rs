//! Error kinds surfaced at the CLI boundary.
//!
//! The synthesis and rendering cores propagate `Result<_, EngineError>`
//! upward; nothing in a hot loop throws or allocates an error path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    #[error("missing input file: {0}")]
    MissingInput(String),

    #[error("range out of bounds: start {start} >= total_frames {total_frames}")]
    OutOfRange { start: u32, total_frames: u32 },

    #[error("internal invariant violated: {0}")]
    InternalAssert(String),

    #[error("I/O write failed: {0}")]
    IoWrite(#[from] std::io::Error),
}

impl EngineError {
    /// Process exit code for this error kind, used only at the CLI boundary.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::InvalidSeed(_) => 2,
            EngineError::MissingInput(_) => 3,
            EngineError::OutOfRange { .. } => 4,
            EngineError::InternalAssert(_) => 70,
            EngineError::IoWrite(_) => 74,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
