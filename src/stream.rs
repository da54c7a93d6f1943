/// The open/closed state of a stream owned by a reader or writer.
///
/// A `Stream` starts out open, holding the handle it was given. [`Stream::close`] moves it to the
/// closed state and hands the handle back; there is no way to reopen it. Once closed, every
/// accessor returns `None`, which the reader and writer report as a `Closed` error.
#[derive(Debug)]
pub struct Stream<T> {
    inner: Option<T>,
}

impl<T> Stream<T> {
    /// Takes ownership of an already-open stream.
    pub fn new(inner: T) -> Self {
        Self { inner: Some(inner) }
    }

    /// Accesses the stream, or returns `None` if it has been closed.
    #[inline(always)]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.inner.as_mut()
    }

    /// Accesses the stream, or returns `None` if it has been closed.
    pub fn get_ref(&self) -> Option<&T> {
        self.inner.as_ref()
    }

    /// Moves to the closed state and returns the stream. Returns `None` if already closed.
    pub fn close(&mut self) -> Option<T> {
        self.inner.take()
    }

    /// Whether [`Stream::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_closed() {
        let mut s = Stream::new(vec![1u8, 2, 3]);
        assert!(!s.is_closed());
        s.get_mut().unwrap().push(4);
        assert_eq!(s.get_ref().map(Vec::len), Some(4));

        assert_eq!(s.close(), Some(vec![1, 2, 3, 4]));
        assert!(s.is_closed());
        assert!(s.get_mut().is_none());
        assert!(s.get_ref().is_none());
    }

    #[test]
    fn close_is_terminal() {
        let mut s = Stream::new(());
        assert_eq!(s.close(), Some(()));
        assert_eq!(s.close(), None);
        assert!(s.is_closed());
    }
}
