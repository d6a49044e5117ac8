/// A pixel buffer whose bytes are only safely readable while locked.
///
/// Hardware-backed capture buffers typically require an exclusive read lock
/// around CPU access. Locking returns a [`BufferGuard`] whose `Drop` releases
/// the lock, so every exit path out of a fusion pass (including early skips)
/// releases it.
pub trait LockablePixelBuffer {
    /// Acquire a read lock and expose the raw bytes for its duration.
    fn lock(&self) -> BufferGuard<'_>;
}

/// RAII handle over a locked pixel buffer.
pub struct BufferGuard<'a> {
    bytes: &'a [u8],
    release: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> BufferGuard<'a> {
    /// Create a guard over `bytes` with an optional release action run on drop.
    pub fn new(bytes: &'a [u8], release: Option<Box<dyn FnOnce() + 'a>>) -> Self {
        Self { bytes, release }
    }

    /// The locked bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }
}

impl Drop for BufferGuard<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Plain memory needs no lock.
impl LockablePixelBuffer for [u8] {
    fn lock(&self) -> BufferGuard<'_> {
        BufferGuard::new(self, None)
    }
}

impl LockablePixelBuffer for Vec<u8> {
    fn lock(&self) -> BufferGuard<'_> {
        BufferGuard::new(self.as_slice(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingBuffer {
        data: Vec<u8>,
        releases: Cell<usize>,
    }

    impl LockablePixelBuffer for CountingBuffer {
        fn lock(&self) -> BufferGuard<'_> {
            BufferGuard::new(&self.data, Some(Box::new(|| {
                self.releases.set(self.releases.get() + 1);
            })))
        }
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let buffer = CountingBuffer {
            data: vec![1, 2, 3],
            releases: Cell::new(0),
        };
        {
            let guard = buffer.lock();
            assert_eq!(guard.bytes(), &[1, 2, 3]);
            assert_eq!(buffer.releases.get(), 0);
        }
        assert_eq!(buffer.releases.get(), 1);
    }

    #[test]
    fn test_slice_lock_is_noop() {
        let data = vec![7u8; 4];
        let guard = data.lock();
        assert_eq!(guard.bytes().len(), 4);
    }
}
