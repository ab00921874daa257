//! The [`StreamBuf`] byte stream buffer.

use alloc::{boxed::Box, vec};
use core::fmt;

use bstr::BStr;

/// Capacity allocated by [`StreamBuf::new`].
pub const DEFAULT_CAPACITY: usize = 256;

/// Contiguous memory buffer with read and write position tracking.
///
/// The backing allocation is divided into three regions by two offsets:
/// consumed bytes (before the read cursor, dead space awaiting reuse), the
/// unconsumed region `[read, write)`, and the free region `[write, capacity)`.
/// Whenever the unconsumed region drains empty, both cursors snap back to the
/// start of the allocation so steady-state read/write cycles never creep
/// toward the end of the buffer.
///
/// Writes always succeed: [`write`](StreamBuf::write) grows the allocation
/// geometrically when the free region is too small, relocating only the
/// unconsumed bytes. Reads and erasures are clamped to the bytes actually
/// available rather than erroring.
///
/// `StreamBuf` deliberately does not implement `Clone`: duplicating the
/// buffer would either silently deep-copy the allocation or alias it, and
/// the single-writer/single-reader contract wants exactly one owner. Use
/// [`take`](StreamBuf::take) to transfer the contents out of a slot that
/// must stay valid.
///
/// # Examples
///
/// ```rust
/// use streambuf::StreamBuf;
///
/// let mut buf = StreamBuf::new();
/// buf.write(b"hello world");
///
/// assert_eq!(buf.read_slice(), b"hello world");
/// buf.advance_read(6);
/// assert_eq!(buf.read_slice(), b"world");
///
/// // Draining the rest resets both cursors to the front.
/// buf.advance_read(usize::MAX);
/// assert!(buf.is_empty());
/// assert_eq!(buf.write_remaining(), buf.capacity());
/// ```
pub struct StreamBuf {
    buf: Box<[u8]>,
    read: usize,
    write: usize,
}

impl StreamBuf {
    /// Creates a buffer with [`DEFAULT_CAPACITY`] bytes preallocated.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a buffer with `capacity` bytes preallocated.
    ///
    /// A capacity of zero is allowed; the buffer stays inert until the first
    /// [`write`](StreamBuf::write) or [`reserve_write`](StreamBuf::reserve_write)
    /// grows it.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        StreamBuf {
            buf: vec![0u8; capacity].into_boxed_slice(),
            read: 0,
            write: 0,
        }
    }

    /// Total bytes in the backing allocation.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The unconsumed region: bytes written but not yet read.
    ///
    /// The returned slice borrows the buffer, so it cannot outlive the next
    /// mutating call; re-fetch it after every write, erase, or advance.
    #[inline]
    #[must_use]
    pub fn read_slice(&self) -> &[u8] {
        &self.buf[self.read..self.write]
    }

    /// Number of unconsumed bytes.
    #[inline]
    #[must_use]
    pub fn read_remaining(&self) -> usize {
        self.write - self.read
    }

    /// Whether the unconsumed region is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// Consumes up to `n` bytes from the front of the unconsumed region and
    /// returns the number actually consumed.
    ///
    /// Requests past the end of the region are clamped, not rejected;
    /// `advance_read(usize::MAX)` is the normal "drain everything" idiom.
    /// When the region empties, both cursors reset to the start of the
    /// allocation, reclaiming it all as free space.
    pub fn advance_read(&mut self, n: usize) -> usize {
        let n = n.min(self.read_remaining());
        self.read += n;

        if self.read == self.write {
            self.read = 0;
            self.write = 0;
        }

        n
    }

    /// Removes up to `n` bytes starting `offset` bytes into the unconsumed
    /// region, closing the gap by shifting the tail down in place. Returns
    /// the number of bytes erased.
    ///
    /// An `offset` at or past the end of the unconsumed region is a no-op
    /// returning 0 rather than an error; stale positions into a buffer that
    /// has since been advanced are expected in producer/consumer patterns.
    /// `n` is clamped to the bytes available past `offset`. The read cursor
    /// is unaffected.
    pub fn erase_read(&mut self, offset: usize, n: usize) -> usize {
        if offset >= self.read_remaining() {
            return 0;
        }

        let start = self.read + offset;
        let n = n.min(self.write - start);

        self.buf.copy_within(start + n..self.write, start);
        self.write -= n;

        n
    }

    /// The free region: writable bytes past the write cursor.
    ///
    /// Fill a prefix of this slice, then commit it with
    /// [`advance_write`](StreamBuf::advance_write). The slice borrows the
    /// buffer and is invalidated by any mutating call, in particular by
    /// [`reserve_write`](StreamBuf::reserve_write) relocating the allocation.
    #[inline]
    pub fn write_slice_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.write..]
    }

    /// Number of bytes left in the free region.
    #[inline]
    #[must_use]
    pub fn write_remaining(&self) -> usize {
        self.buf.len() - self.write
    }

    /// Extends the write cursor by up to `n` bytes, clamped to
    /// [`write_remaining`](StreamBuf::write_remaining), and returns the
    /// actual advance. Never moves the cursor past the allocation.
    pub fn advance_write(&mut self, n: usize) -> usize {
        let n = n.min(self.write_remaining());
        self.write += n;
        n
    }

    /// Ensures the free region holds at least `n` bytes, growing the
    /// allocation if it does not.
    ///
    /// Growth allocates `2 * (n + unconsumed)` bytes and relocates only the
    /// unconsumed region to the start of the new allocation; everything
    /// before the read cursor is discarded along with the old allocation.
    /// This is the one operation that invalidates previously obtained
    /// slices, which the borrow checker enforces. Allocation failure aborts
    /// the process; out-of-memory is not surfaced as a recoverable error.
    pub fn reserve_write(&mut self, n: usize) {
        if n <= self.write_remaining() {
            return;
        }

        let used = self.read_remaining();
        let mut next = vec![0u8; 2 * (n + used)].into_boxed_slice();
        next[..used].copy_from_slice(&self.buf[self.read..self.write]);

        self.buf = next;
        self.read = 0;
        self.write = used;
    }

    /// Appends `data`, growing the buffer as needed. Never partially writes.
    pub fn write(&mut self, data: &[u8]) {
        self.reserve_write(data.len());
        self.buf[self.write..self.write + data.len()].copy_from_slice(data);
        self.write += data.len();
    }

    /// Resets both cursors to the start of the allocation without touching
    /// it, dropping any unconsumed data.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
    }

    /// Releases the backing allocation, leaving an empty buffer with zero
    /// capacity. Idempotent. The buffer remains usable: the next
    /// [`write`](StreamBuf::write) grows it from zero.
    pub fn release(&mut self) {
        self.buf = Box::default();
        self.read = 0;
        self.write = 0;
    }

    /// Transfers the allocation, capacity, and both cursors out of `self`,
    /// leaving it in the released state.
    ///
    /// This is the explicit in-place counterpart of an ordinary move for
    /// slots that must remain valid (struct fields, slab entries). The
    /// contents are never duplicated.
    #[must_use]
    pub fn take(&mut self) -> Self {
        StreamBuf {
            buf: core::mem::take(&mut self.buf),
            read: core::mem::replace(&mut self.read, 0),
            write: core::mem::replace(&mut self.write, 0),
        }
    }
}

impl Default for StreamBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StreamBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamBuf")
            .field("capacity", &self.capacity())
            .field("read", &self.read)
            .field("write", &self.write)
            .field("data", &BStr::new(self.read_slice()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CAPACITY, StreamBuf};

    #[test]
    fn write_then_read_round_trips() {
        let mut buf = StreamBuf::new();
        buf.write(b"hello world");

        assert_eq!(buf.read_remaining(), 11);
        assert_eq!(buf.read_slice(), b"hello world");
    }

    #[test]
    fn new_uses_default_capacity() {
        let buf = StreamBuf::new();
        assert_eq!(buf.capacity(), DEFAULT_CAPACITY);
        assert_eq!(buf.write_remaining(), DEFAULT_CAPACITY);
        assert!(buf.is_empty());
    }

    #[test]
    fn drain_resets_cursors() {
        let mut buf = StreamBuf::new();
        buf.write(b"abc");
        buf.advance_read(2);

        // Partially consumed: the free region has shrunk.
        assert_eq!(buf.write_remaining(), DEFAULT_CAPACITY - 3);

        buf.advance_read(1);

        // Fully drained: the whole allocation is free again.
        assert!(buf.is_empty());
        assert_eq!(buf.write_remaining(), DEFAULT_CAPACITY);
    }

    #[test]
    fn advance_read_clamps_and_reports() {
        let mut buf = StreamBuf::new();
        buf.write(b"abcde");

        assert_eq!(buf.advance_read(100), 5);
        assert!(buf.is_empty());
        assert_eq!(buf.advance_read(1), 0);
    }

    #[test]
    fn advance_write_clamps_to_allocation() {
        let mut buf = StreamBuf::with_capacity(8);
        assert_eq!(buf.advance_write(100), 8);
        assert_eq!(buf.write_remaining(), 0);
        assert_eq!(buf.read_remaining(), 8);
    }

    #[test]
    fn fill_free_region_then_commit() {
        let mut buf = StreamBuf::with_capacity(16);
        buf.write_slice_mut()[..4].copy_from_slice(b"abcd");
        assert_eq!(buf.advance_write(4), 4);
        assert_eq!(buf.read_slice(), b"abcd");
    }

    #[test]
    fn reserve_grows_geometrically_and_preserves_data() {
        let mut buf = StreamBuf::with_capacity(8);
        buf.write(b"12345678");
        buf.advance_read(2);

        buf.reserve_write(10);

        assert_eq!(buf.read_slice(), b"345678");
        assert!(buf.write_remaining() >= 10);
        // 2 * (requested + unconsumed)
        assert_eq!(buf.capacity(), 2 * (10 + 6));
    }

    #[test]
    fn reserve_within_free_region_is_noop() {
        let mut buf = StreamBuf::with_capacity(8);
        buf.write(b"ab");
        buf.reserve_write(6);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn write_grows_from_zero_capacity() {
        let mut buf = StreamBuf::with_capacity(0);
        buf.write(b"xyz");
        assert_eq!(buf.read_slice(), b"xyz");
        assert_eq!(buf.capacity(), 6);
    }

    #[test]
    fn erase_read_compacts_in_place() {
        let mut buf = StreamBuf::new();
        buf.write(b"Hello, world");

        assert_eq!(buf.erase_read(2, 3), 3);
        assert_eq!(buf.read_slice(), b"He, world");

        assert_eq!(buf.advance_read(9), 9);
        assert!(buf.is_empty());
    }

    #[test]
    fn erase_read_respects_consumed_prefix() {
        let mut buf = StreamBuf::new();
        buf.write(b"abcdef");
        buf.advance_read(2);

        // Offset 0 is the first *unconsumed* byte.
        assert_eq!(buf.erase_read(0, 2), 2);
        assert_eq!(buf.read_slice(), b"ef");
    }

    #[test]
    fn erase_read_clamps_length_to_tail() {
        let mut buf = StreamBuf::new();
        buf.write(b"abcdef");

        assert_eq!(buf.erase_read(4, 100), 2);
        assert_eq!(buf.read_slice(), b"abcd");
    }

    #[test]
    fn erase_read_out_of_range_is_noop() {
        let mut buf = StreamBuf::new();
        buf.write(b"abc");

        assert_eq!(buf.erase_read(3, 1), 0);
        assert_eq!(buf.erase_read(1000, 1), 0);
        assert_eq!(buf.read_slice(), b"abc");
    }

    #[test]
    fn erase_read_on_empty_is_noop() {
        let mut buf = StreamBuf::new();
        assert_eq!(buf.erase_read(0, 1), 0);
    }

    #[test]
    fn clear_keeps_allocation() {
        let mut buf = StreamBuf::new();
        buf.write(b"abc");
        buf.clear();

        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn release_is_idempotent() {
        let mut buf = StreamBuf::new();
        buf.write(b"abc");

        buf.release();
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());

        buf.release();
        assert_eq!(buf.capacity(), 0);

        // Released buffers grow again on the next write.
        buf.write(b"hi");
        assert_eq!(buf.read_slice(), b"hi");
    }

    #[test]
    fn take_transfers_and_releases_source() {
        let mut a = StreamBuf::new();
        a.write(b"payload");

        let b = a.take();

        assert_eq!(b.read_slice(), b"payload");
        assert_eq!(a.capacity(), 0);
        assert!(a.is_empty());
    }

    #[test]
    fn debug_shows_unconsumed_bytes() {
        let mut buf = StreamBuf::new();
        buf.write(b"abc");

        let rendered = std::format!("{buf:?}");
        assert!(rendered.contains("abc"));
        assert!(rendered.contains("capacity"));
    }
}
