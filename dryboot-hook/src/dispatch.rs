//! Task Dispatch Hook
//!
//! The scheduler reads two hook slots before creating or dispatching a task
//! and calls through them with a pointer to the `context` field of the task
//! descriptor it is about to act on. Both slots are aimed at
//! [`task_dispatch_hook`].
//!
//! # Per-event flow
//!
//! 1. Null pointer, or no context yet: not a fresh task start, return.
//! 2. Recover the descriptor from the field pointer by fixed offset.
//! 3. Saved pc != the task-entry trampoline: the task is resuming
//!    mid-execution; neither substituted nor traced.
//! 4. Fresh start whose entry is the factory sound-device task: rewrite the
//!    entry so the trampoline runs the replacement instead.
//! 5. Trace the (possibly substituted) entry point.
//!
//! # Constraints
//!
//! Runs inside the scheduler's own dispatch path. No allocation, no
//! semaphores, no sleeping - blocking here deadlocks the scheduler. The
//! configuration is published once through `spin::Once` before the first
//! task is ever created; the hook reads it wait-free and no-ops until then.
//!
//! Single-core dispatch is assumed, as the firmware guarantees. A multi-core
//! port would need an explicit mutual-exclusion decision here; see DESIGN.md.

use spin::Once;

use dryboot_pal::task::{task_from_context_field, TaskContext};

use crate::trace::TraceBuffer;

/// Addresses the hook compares and substitutes, fixed per firmware build.
#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// The OS's generic task-entry trampoline: the saved pc of every task
    /// that has never run.
    pub trampoline: usize,
    /// Entry point of the factory sound-device task.
    pub factory_entry: usize,
    /// Entry point substituted in its place.
    pub replacement: usize,
}

static CONFIG: Once<DispatchConfig> = Once::new();

/// The process-wide dispatch trace.
pub static TRACE: TraceBuffer = TraceBuffer::new();

/// Publish the dispatch configuration.
///
/// Called once from the boot path, before the scheduler exists. Later calls
/// are ignored.
pub fn install(config: DispatchConfig) {
    CONFIG.call_once(|| config);
}

/// Hook body installed in both scheduler hook slots.
///
/// Invoked by the OS on every task creation and dispatch event for the
/// lifetime of the device.
#[no_mangle]
pub extern "C" fn task_dispatch_hook(context: *mut *mut TaskContext) {
    let Some(config) = CONFIG.get() else {
        return;
    };
    // SAFETY: the scheduler passes a pointer to the context field of the
    // descriptor it is dispatching, or null.
    unsafe { intercept(context, config, &TRACE) }
}

/// Dispatch-event state machine. Separated from the hook so fixtures can
/// drive it against synthetic descriptors.
///
/// # Safety
///
/// `context` must be null or point at the `context` field of a live task
/// descriptor whose context block, if present, is readable.
pub unsafe fn intercept(
    context: *mut *mut TaskContext,
    config: &DispatchConfig,
    trace: &TraceBuffer,
) {
    if context.is_null() {
        return;
    }

    // SAFETY: non-null per check above; points into a live descriptor per
    // the caller contract.
    let task = unsafe { task_from_context_field(context) };
    let ctx = unsafe { *context };
    if ctx.is_null() {
        return;
    }

    // A task part-way through execution resumes at wherever it was
    // preempted; only a never-run task resumes at the trampoline.
    // SAFETY: `ctx` is the descriptor's live context block.
    if unsafe { (*ctx).pc } != config.trampoline {
        return;
    }

    // SAFETY: `task` is the live enclosing descriptor.
    let mut entry = unsafe { (*task).entry };
    if entry == config.factory_entry {
        entry = config.replacement;
        // SAFETY: rewriting the entry before the trampoline reads it; the
        // task has not started yet.
        unsafe {
            (*task).entry = entry;
        }
    }

    trace.record(entry as u32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TRACE_RECORD_LEN;
    use core::ptr;
    use dryboot_pal::task::Task;

    const TRAMPOLINE: usize = 0xFF81_1C64;
    const FACTORY: usize = 0xFF86_CBA8;
    const REPLACEMENT: usize = 0x0006_2000;
    const RESUMED_PC: usize = 0xFF83_1234;

    const CFG: DispatchConfig = DispatchConfig {
        trampoline: TRAMPOLINE,
        factory_entry: FACTORY,
        replacement: REPLACEMENT,
    };

    fn context(pc: usize) -> TaskContext {
        TaskContext {
            pc,
            cpsr: 0,
            regs: [0; 13],
            sp: 0,
            lr: 0,
        }
    }

    fn descriptor(entry: usize, ctx: *mut TaskContext) -> Task {
        Task {
            queue_next: 0,
            queue_prev: 0,
            run_prio: 0,
            state: 0,
            entry,
            arg: 0,
            context: ctx,
        }
    }

    fn dispatch(task: &mut Task, trace: &TraceBuffer) {
        // SAFETY: the field pointer comes from a live descriptor.
        unsafe { intercept(&mut task.context, &CFG, trace) }
    }

    #[test]
    fn test_null_field_pointer_noop() {
        let trace = TraceBuffer::new();
        // SAFETY: null is explicitly allowed.
        unsafe { intercept(ptr::null_mut(), &CFG, &trace) };
        assert_eq!(trace.cursor(), 0);
    }

    #[test]
    fn test_contextless_descriptor_noop() {
        let trace = TraceBuffer::new();
        let mut task = descriptor(FACTORY, ptr::null_mut());
        dispatch(&mut task, &trace);
        assert_eq!(task.entry, FACTORY);
        assert_eq!(trace.cursor(), 0);
    }

    #[test]
    fn test_resumed_task_untouched() {
        let trace = TraceBuffer::new();
        let mut ctx = context(RESUMED_PC);
        let mut task = descriptor(FACTORY, &mut ctx);
        dispatch(&mut task, &trace);
        // Mid-execution resume: not substituted, not traced.
        assert_eq!(task.entry, FACTORY);
        assert_eq!(trace.cursor(), 0);
    }

    #[test]
    fn test_fresh_start_traced() {
        let trace = TraceBuffer::new();
        let mut ctx = context(TRAMPOLINE);
        let mut task = descriptor(0xFF86_0010, &mut ctx);
        dispatch(&mut task, &trace);
        assert_eq!(task.entry, 0xFF86_0010);
        assert_eq!(trace.cursor(), TRACE_RECORD_LEN);
        assert_eq!(trace.entry_at(0), 0xFF86_0010);
    }

    #[test]
    fn test_factory_task_substituted() {
        let trace = TraceBuffer::new();
        let mut ctx = context(TRAMPOLINE);
        let mut task = descriptor(FACTORY, &mut ctx);
        dispatch(&mut task, &trace);
        assert_eq!(task.entry, REPLACEMENT);
        // The post-substitution entry is what gets traced.
        assert_eq!(trace.entry_at(0), REPLACEMENT as u32);
    }

    #[test]
    fn test_hook_without_config_noop() {
        // No test installs the global config, so the exported hook must
        // no-op on any input.
        let mut ctx = context(TRAMPOLINE);
        let mut task = descriptor(FACTORY, &mut ctx);
        task_dispatch_hook(ptr::null_mut());
        task_dispatch_hook(&mut task.context);
        assert_eq!(task.entry, FACTORY);
        assert_eq!(TRACE.cursor(), 0);
    }

    #[test]
    fn test_three_event_sequence() {
        let trace = TraceBuffer::new();
        let mut ctx_a = context(TRAMPOLINE);
        let mut ctx_b = context(TRAMPOLINE);
        let mut ctx_c = context(RESUMED_PC);
        let mut a = descriptor(0xFF86_0010, &mut ctx_a);
        let mut b = descriptor(FACTORY, &mut ctx_b);
        let mut c = descriptor(0xFF86_0020, &mut ctx_c);

        dispatch(&mut a, &trace);
        dispatch(&mut b, &trace);
        dispatch(&mut c, &trace);

        assert_eq!(a.entry, 0xFF86_0010);
        assert_eq!(b.entry, REPLACEMENT);
        assert_eq!(c.entry, 0xFF86_0020);

        assert_eq!(trace.entry_at(0), 0xFF86_0010);
        assert_eq!(trace.entry_at(TRACE_RECORD_LEN), REPLACEMENT as u32);
        assert_eq!(trace.cursor(), 2 * TRACE_RECORD_LEN);
    }
}
