//! Reinterpret contiguous spans of one byte-sized element type as another.
//!
//! [`StreamBuf`](crate::StreamBuf) speaks `&[u8]`; callers working in terms
//! of `i8` (or any future byte-sized element) can adapt a span without
//! copying. Only byte-sized types are admitted, so lengths are preserved and
//! alignment can never be violated.

use bytemuck::Pod;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for i8 {}
}

/// Marker for byte-sized plain-old-data element types a span may be viewed
/// as. Implemented for `u8` and `i8`.
pub trait ByteElem: Pod + sealed::Sealed {}

impl ByteElem for u8 {}
impl ByteElem for i8 {}

/// Reinterprets `v` as a slice of another byte-sized element type.
///
/// Pure and allocation-free; the returned slice covers the same memory and
/// has the same length.
///
/// # Examples
///
/// ```rust
/// let signed: &[i8] = streambuf::view(b"abc".as_slice());
/// assert_eq!(signed, &[97, 98, 99]);
/// ```
#[must_use]
pub fn view<T: ByteElem, F: ByteElem>(v: &[F]) -> &[T] {
    bytemuck::cast_slice(v)
}

/// Mutable counterpart of [`view`].
#[must_use]
pub fn view_mut<T: ByteElem, F: ByteElem>(v: &mut [F]) -> &mut [T] {
    bytemuck::cast_slice_mut(v)
}
