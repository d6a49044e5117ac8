mod parser;
mod writer;

pub use parser::*;
pub use writer::*;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to read or write the PLY file
    #[error("Failed to read or write the PLY file")]
    Io(#[from] std::io::Error),

    /// Malformed or unsupported PLY header
    #[error("Malformed or unsupported PLY header")]
    InvalidHeader,

    /// Unsupported PLY property layout
    #[error("Unsupported PLY property")]
    UnsupportedProperty,

    /// Vertex data does not match the declared header
    #[error("Vertex data does not match the declared header")]
    InvalidVertex,
}
