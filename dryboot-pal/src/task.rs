//! Task Descriptors and Task Creation
//!
//! The scheduler owns its task descriptors; the shim only ever sees a pointer
//! to the `context` field *inside* one, passed to the dispatch hook. The
//! enclosing descriptor is recovered by subtracting the field's byte offset -
//! there is no back-reference to follow.
//!
//! # Structural assumption
//!
//! [`Task`] and [`TaskContext`] mirror an external, unversioned layout fixed
//! by the firmware build. [`TASK_CONTEXT_OFFSET`] records where the context
//! field sits in that build; the `const` assertions below check the mirror
//! against it on 32-bit targets. There is no runtime sentinel to probe on
//! this platform, so a layout drift in a new firmware would corrupt memory
//! silently - the assertion at build time is the only tripwire available.

use core::mem::offset_of;

/// Entry point signature for tasks created through the OS.
pub type TaskEntry = unsafe extern "C" fn(usize);

/// Saved execution state of a task.
///
/// The first field is the resumption program counter: for a task that has
/// been created but never dispatched it holds the address of the OS's generic
/// task-entry trampoline.
#[repr(C)]
pub struct TaskContext {
    /// Resumption program counter.
    pub pc: usize,
    /// Saved status register.
    pub cpsr: u32,
    /// Saved general-purpose registers, never inspected here.
    pub regs: [u32; 13],
    /// Banked stack pointer.
    pub sp: u32,
    /// Banked link register.
    pub lr: u32,
}

/// Scheduler task descriptor.
///
/// Only `entry` and `context` are read or written; the leading fields exist
/// to place them at the offsets the firmware uses.
#[repr(C)]
pub struct Task {
    /// Run-queue linkage, owned by the scheduler. Never followed.
    pub queue_next: u32,
    /// Run-queue linkage, owned by the scheduler. Never followed.
    pub queue_prev: u32,
    /// Priority as created.
    pub run_prio: u32,
    /// Scheduler state word.
    pub state: u32,
    /// Entry point recorded at creation; the trampoline jumps here on the
    /// task's first dispatch.
    pub entry: usize,
    /// Argument passed at creation.
    pub arg: usize,
    /// Saved-context block, null until the task has a context at all.
    pub context: *mut TaskContext,
}

/// Byte offset of [`Task::context`] in this firmware build.
pub const TASK_CONTEXT_OFFSET: usize = 0x18;

// Mirror checks. Pointer-sized fields widen on 64-bit hosts, so the absolute
// offsets only hold on the target; `pc`-first holds everywhere.
const _: () = assert!(offset_of!(TaskContext, pc) == 0);

#[cfg(target_pointer_width = "32")]
const _: () = {
    assert!(offset_of!(Task, entry) == 0x10);
    assert!(offset_of!(Task, context) == TASK_CONTEXT_OFFSET);
};

/// Recover the enclosing descriptor from a pointer to its `context` field.
///
/// # Safety
///
/// `field` must point at the `context` field of a live [`Task`].
#[inline]
#[must_use]
pub unsafe fn task_from_context_field(field: *mut *mut TaskContext) -> *mut Task {
    // SAFETY: caller guarantees `field` is the context field of a Task, so
    // stepping back by the field offset lands on the descriptor.
    unsafe { field.byte_sub(offset_of!(Task, context)).cast() }
}

#[cfg(target_arch = "arm")]
extern "C" {
    /// Create a task under the OS scheduler.
    ///
    /// `name` must be NUL-terminated. Returns the OS task identifier.
    pub fn create_task(
        name: *const u8,
        priority: u32,
        stack_size: u32,
        entry: TaskEntry,
        arg: usize,
    ) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr;

    fn blank_task() -> Task {
        Task {
            queue_next: 0,
            queue_prev: 0,
            run_prio: 0,
            state: 0,
            entry: 0,
            arg: 0,
            context: ptr::null_mut(),
        }
    }

    #[test]
    fn test_descriptor_recovery() {
        let mut task = blank_task();
        let field = &mut task.context as *mut *mut TaskContext;
        // SAFETY: `field` is the context field of `task`.
        let recovered = unsafe { task_from_context_field(field) };
        assert_eq!(recovered, &mut task as *mut Task);
    }

    #[test]
    fn test_recovered_fields_readable() {
        let mut task = blank_task();
        task.entry = 0xFF86_CBA8;
        let field = &mut task.context as *mut *mut TaskContext;
        // SAFETY: `field` is the context field of `task`, which outlives the
        // raw access.
        let entry = unsafe { (*task_from_context_field(field)).entry };
        assert_eq!(entry, 0xFF86_CBA8);
    }
}
