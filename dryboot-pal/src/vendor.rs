//! Vendor Startup Routines
//!
//! ROM routines inside the firmware image that the shim either calls or
//! redirects patched call sites at. Their addresses come from the stub table
//! in the firmware link script; their bodies are an opaque black box the shim
//! cooperates with but never reimplements.

#[cfg(target_arch = "arm")]
extern "C" {
    /// Word-granular memory zeroing routine used by `cstart`.
    ///
    /// Patch target for the zeroing call site in the relocated copy; the
    /// relative branch there breaks when the image moves and must be re-aimed
    /// at the ROM routine.
    pub fn bzero32(base: *mut u8, len: u32);

    /// Creates the first task from the pointer slot the relocator rewrote.
    ///
    /// Patch target for the task-creation call site; never called directly.
    pub fn create_init_task();

    /// Factory first-task body: brings up the debug manager, terminal
    /// drivers, stdio and the C library. Called by the replacement init task
    /// so the rest of the firmware finds the services it expects.
    pub fn init_task();
}
