use crate::error::PlaneError;

/// Describes one plane inside a packed multi-plane pixel buffer.
///
/// Capture hardware hands out tightly packed buffers where each plane starts
/// at a byte offset and rows are padded to an alignment boundary, so the row
/// stride can be larger than `width * bytes_per_element`.
///
/// # Examples
///
/// ```
/// use lidarfuse_image::PlaneDesc;
///
/// let desc = PlaneDesc {
///     offset: 0,
///     width: 4,
///     height: 2,
///     bytes_per_row: 16,
///     bytes_per_element: 4,
/// };
///
/// assert_eq!(desc.required_len(), 32);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneDesc {
    /// Byte offset of the plane within the backing buffer.
    pub offset: usize,
    /// Width of the plane in elements.
    pub width: usize,
    /// Height of the plane in rows.
    pub height: usize,
    /// Byte stride between consecutive rows.
    pub bytes_per_row: usize,
    /// Size of one element in bytes.
    pub bytes_per_element: usize,
}

impl PlaneDesc {
    /// Number of bytes of the backing buffer this plane spans, offset included.
    pub fn required_len(&self) -> usize {
        self.offset + self.height * self.bytes_per_row
    }
}

/// A read-only view over one plane of a packed pixel buffer.
///
/// Sampling is stride-addressed and unchecked in release builds; the caller
/// must guarantee `0 <= col < width` and `0 <= row < height`. Bounds are
/// validated once at construction instead of per pixel.
#[derive(Clone, Copy, Debug)]
pub struct PlaneView<'a> {
    data: &'a [u8],
    desc: PlaneDesc,
}

impl<'a> PlaneView<'a> {
    /// Create a view of the plane described by `desc` inside `data`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaneError::PlaneOutOfBounds`] if the plane does not fit in
    /// `data`, or [`PlaneError::InvalidRowStride`] if the row stride is
    /// smaller than one row of elements.
    pub fn new(data: &'a [u8], desc: PlaneDesc) -> Result<Self, PlaneError> {
        let row_size = desc.width * desc.bytes_per_element;
        if desc.bytes_per_row < row_size {
            return Err(PlaneError::InvalidRowStride(desc.bytes_per_row, row_size));
        }
        if desc.required_len() > data.len() {
            return Err(PlaneError::PlaneOutOfBounds(desc.required_len(), data.len()));
        }
        Ok(Self { data, desc })
    }

    /// Width of the plane in elements.
    #[inline]
    pub fn width(&self) -> usize {
        self.desc.width
    }

    /// Height of the plane in rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.desc.height
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> usize {
        self.desc.offset + row * self.desc.bytes_per_row + col * self.desc.bytes_per_element
    }

    /// Sample an 8-bit element at `(col, row)`.
    #[inline]
    pub fn get_u8(&self, col: usize, row: usize) -> u8 {
        debug_assert!(col < self.desc.width && row < self.desc.height);
        self.data[self.index(col, row)]
    }

    /// Sample a little-endian 32-bit float element at `(col, row)`.
    #[inline]
    pub fn get_f32(&self, col: usize, row: usize) -> f32 {
        debug_assert!(col < self.desc.width && row < self.desc.height);
        debug_assert!(self.desc.bytes_per_element == 4);
        let i = self.index(col, row);
        f32::from_le_bytes([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Sample an interleaved chroma pair for the *full-resolution* pixel
    /// `(col, row)` from a 4:2:0 subsampled plane.
    ///
    /// The view must describe the half-resolution chroma plane with `width`
    /// equal to the full image width in bytes (each chroma sample pair spans
    /// two bytes) and `height` equal to half the full image height. The pair
    /// is fetched at `(row / 2, (col / 2) * 2)` within that plane.
    #[inline]
    pub fn get_chroma_pair(&self, col: usize, row: usize) -> (u8, u8) {
        let sub_row = row / 2;
        let sub_col = (col / 2) * 2;
        debug_assert!(sub_col + 1 < self.desc.width && sub_row < self.desc.height);
        let i = self.desc.offset + sub_row * self.desc.bytes_per_row + sub_col;
        (self.data[i], self.data[i + 1])
    }
}
