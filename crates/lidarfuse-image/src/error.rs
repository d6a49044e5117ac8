/// An error type for the plane sampling module.
#[derive(thiserror::Error, Debug)]
pub enum PlaneError {
    /// Error when the described plane does not fit inside the backing buffer.
    #[error("Plane requires {0} bytes but the buffer holds {1}")]
    PlaneOutOfBounds(usize, usize),

    /// Error when the row stride is smaller than one row of pixels.
    #[error("Row stride ({0}) is smaller than the row size ({1})")]
    InvalidRowStride(usize, usize),
}
