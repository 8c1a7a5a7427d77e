//! Diagnostic Dump Task
//!
//! Periodically writes the dispatch trace buffer and any pending log-ring
//! entries to a file on the storage card. This is the out-of-band window
//! into the device: the trace has no read cursor and the log ring no
//! console, so this task is how either ever leaves RAM on a healthy boot.

use dryboot_hook::dispatch::TRACE;
use dryboot_hook::logging::buffer;
use dryboot_hook::trace::TRACE_BUF_LEN;
use dryboot_pal::file::{fio_close_file, fio_create_file, fio_write_file};
use dryboot_pal::timer::msleep;

/// Number of dump rounds before the file is closed.
const DUMP_ROUNDS: u32 = 6;

/// Task body: sleep, then dump trace + logs a few times.
pub extern "C" fn trace_dump_task(_arg: usize) {
    // Let the OS finish bringing up the storage stack.
    // SAFETY: ordinary task context; sleeping is allowed here.
    unsafe { msleep(1000) };

    // SAFETY: path is NUL-terminated; the handle is checked below.
    let file = unsafe { fio_create_file(b"A:/DRYBOOT.LOG\0".as_ptr()) };
    if !file.is_valid() {
        // Could not open: drop diagnostics for this boot, keep the device
        // running.
        return;
    }

    let mut line_buf = [0u8; 512];
    for _ in 0..DUMP_ROUNDS {
        // SAFETY: the trace buffer is a live static; torn reads against the
        // dispatch path are acceptable in a diagnostic dump.
        unsafe {
            fio_write_file(file, TRACE.as_ptr(), TRACE_BUF_LEN as u32);
        }

        let n = buffer::drain(&mut line_buf);
        if n > 0 {
            // SAFETY: `line_buf` holds `n` formatted bytes.
            unsafe {
                fio_write_file(file, line_buf.as_ptr(), n as u32);
            }
        }

        // SAFETY: ordinary task context.
        unsafe { msleep(1000) };
    }

    // SAFETY: `file` is open and valid.
    unsafe { fio_close_file(file) };
}
