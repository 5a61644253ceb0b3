//! Error type shared by generators, the packer and scene loading

/// Errors surfaced by mesh generation and packing
///
/// All of these are caller errors: there is no transient failure mode, so
/// nothing here is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// A generator received a dimension or subdivision count it cannot mesh
    #[error("invalid {shape} parameter: {reason}")]
    InvalidParameter { shape: &'static str, reason: String },

    /// A caller-owned output buffer is shorter than the generated data
    #[error("{buffer} buffer too small: {required} required, {provided} provided")]
    CapacityMismatch {
        buffer: &'static str,
        required: usize,
        provided: usize,
    },

    /// Two submeshes were registered under the same name
    #[error("submesh '{0}' was already packed")]
    DuplicateSubmesh(String),

    /// A merged buffer grew past what 32-bit offsets can address
    #[error("merged {buffer} buffer needs {required} entries, more than u32 offsets can address")]
    IndexOverflow {
        buffer: &'static str,
        required: usize,
    },

    /// Scene description could not be parsed
    #[error("scene description: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShapeError {
    pub(crate) fn invalid(shape: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            shape,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ShapeError>;
