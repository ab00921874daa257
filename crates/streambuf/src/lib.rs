//! A contiguous byte stream buffer with independently advancing read and
//! write cursors.
//!
//! [`StreamBuf`] owns a single heap allocation and tracks two offsets into
//! it: the start of unconsumed data and the start of free space. Producers
//! append at the back ([`StreamBuf::write`], or [`StreamBuf::write_slice_mut`]
//! followed by [`StreamBuf::advance_write`]); consumers drain from the front
//! ([`StreamBuf::read_slice`] followed by [`StreamBuf::advance_read`]) and
//! may erase already-written spans mid-stream ([`StreamBuf::erase_read`]).
//! The buffer grows geometrically on demand and keeps only the unconsumed
//! region across a growth.
//!
//! Boundary conditions never error: over-long advance and erase requests are
//! clamped to what is actually available, which is the natural idiom for
//! "drain as much as exists" streaming consumers. The only failure mode is
//! allocation failure, which aborts.
//!
//! The buffer is not synchronized; share it across threads behind your own
//! lock or not at all.
//!
//! The [`view`]/[`view_mut`] helpers reinterpret spans between byte-sized
//! element types to adapt the byte-oriented API to caller element types.
//! With the default `logger` feature the crate also ships a small timestamped
//! console/file logger for the `log` facade (see the `logger` module).

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "logger"))]
extern crate std;

mod stream_buf;
mod view;

#[cfg(feature = "logger")]
pub mod logger;


pub use stream_buf::{DEFAULT_CAPACITY, StreamBuf};
pub use view::{ByteElem, view, view_mut};
