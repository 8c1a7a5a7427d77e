//! File Service
//!
//! Bindings to the OS file service used by the diagnostic tasks. The service
//! reports an unopenable path by returning an all-ones handle rather than an
//! error code; [`FileHandle::is_valid`] is the one check callers perform.
//! A failed open aborts only the task that attempted it - the rest of the
//! device keeps running.

/// Handle returned by the file service.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct FileHandle(usize);

impl FileHandle {
    /// The all-ones "could not open" sentinel.
    pub const INVALID: Self = Self(usize::MAX);

    /// Wrap a raw handle value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Get the raw handle value.
    #[inline]
    #[must_use]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    /// Check the open succeeded.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

#[cfg(target_arch = "arm")]
extern "C" {
    /// Create (truncate) a file. `path` must be NUL-terminated, e.g.
    /// `b"A:/TRACE.LOG\0"`. Check the result with [`FileHandle::is_valid`].
    #[link_name = "FIO_CreateFile"]
    pub fn fio_create_file(path: *const u8) -> FileHandle;

    /// Append `len` bytes from `buf` to an open file.
    #[link_name = "FIO_WriteFile"]
    pub fn fio_write_file(file: FileHandle, buf: *const u8, len: u32) -> i32;

    /// Close an open file.
    #[link_name = "FIO_CloseFile"]
    pub fn fio_close_file(file: FileHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sentinel() {
        assert!(!FileHandle::INVALID.is_valid());
        assert_eq!(FileHandle::INVALID.as_raw(), usize::MAX);
    }

    #[test]
    fn test_ordinary_handles_valid() {
        assert!(FileHandle::from_raw(0).is_valid());
        assert!(FileHandle::from_raw(0x0003_2F40).is_valid());
    }
}
