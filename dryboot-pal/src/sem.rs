//! Semaphores
//!
//! Thin bindings to the OS counting-semaphore service. Handles are opaque
//! pointers owned by the OS; the shim only stores and passes them.

use core::ffi::c_void;
use core::fmt;

/// Opaque semaphore handle.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Semaphore(*mut c_void);

impl Semaphore {
    /// The null handle, used before a semaphore has been created.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self(core::ptr::null_mut())
    }

    /// Check if this handle has been assigned.
    #[inline]
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Semaphore({:p})", self.0)
    }
}

#[cfg(target_arch = "arm")]
extern "C" {
    /// Create a counting semaphore. `name` may be null.
    pub fn create_named_semaphore(name: *const u8, count: u32) -> Semaphore;

    /// Wait on a semaphore. A `timeout` of zero waits forever.
    ///
    /// Returns zero on success. Several diagnostic tasks deliberately ignore
    /// the result and proceed regardless of the wait outcome.
    pub fn take_semaphore(sem: Semaphore, timeout: u32) -> u32;

    /// Signal a semaphore. Returns zero on success.
    pub fn give_semaphore(sem: Semaphore) -> u32;
}
