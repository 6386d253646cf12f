//! Binding to the vendor's `libpoll`.
//!
//! `void poll(char *uid, size_t len)` blocks until a card is presented and
//! writes its UID into `uid` as a NUL-terminated string of at most `len`
//! bytes. Set `LIBPOLL_DIR` at build time if the library is not on the
//! default linker path.

use core::ffi::c_char;

use platform::{decode_uid_buffer, Uid, UidError, UidPoller, UID_BUFFER_LEN};

#[link(name = "poll")]
extern "C" {
    #[link_name = "poll"]
    fn libpoll_poll(uid: *mut c_char, len: usize);
}

/// [`UidPoller`] backed by `libpoll`.
#[derive(Debug)]
pub struct NativePoller {
    buf: [u8; UID_BUFFER_LEN],
}

impl NativePoller {
    /// Create a poller with a zeroed UID buffer.
    pub fn new() -> Self {
        Self {
            buf: [0; UID_BUFFER_LEN],
        }
    }
}

impl Default for NativePoller {
    fn default() -> Self {
        Self::new()
    }
}

impl UidPoller for NativePoller {
    type Error = UidError;

    fn poll_uid(&mut self) -> Result<Uid, Self::Error> {
        // A short write must not leave a previous UID behind the terminator.
        self.buf.fill(0);
        // SAFETY: `buf` is a live, exclusively borrowed allocation of exactly
        // `UID_BUFFER_LEN` bytes, and the library writes at most `len` bytes
        // into it before returning. No pointer is retained after the call.
        unsafe { libpoll_poll(self.buf.as_mut_ptr().cast::<c_char>(), self.buf.len()) };
        decode_uid_buffer(&self.buf)
    }
}
