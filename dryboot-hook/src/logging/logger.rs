//! Logger Implementation
//!
//! Hooks the `log` crate facade up to the ring in [`buffer`]. Messages are
//! formatted into a stack buffer first so the push into the lock-free queue
//! copies one finished entry - no locks anywhere on the path.

use core::fmt::Write;
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::logging::buffer::{self, LogEntry};

/// Stack buffer for formatting a message before pushing it to the ring.
struct MessageBuffer {
    data: [u8; buffer::LOG_ENTRY_CONTENT_SIZE],
    len: usize,
}

impl MessageBuffer {
    const fn new() -> Self {
        Self {
            data: [0u8; buffer::LOG_ENTRY_CONTENT_SIZE],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        core::str::from_utf8(&self.data[..self.len]).unwrap_or("<invalid>")
    }
}

impl Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = buffer::LOG_ENTRY_CONTENT_SIZE - self.len;
        let to_copy = bytes.len().min(remaining);
        self.data[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}

/// Shim logger instance.
struct ShimLogger;

impl Log for ShimLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut msg_buf = MessageBuffer::new();
            let _ = write!(msg_buf, "{}", record.args());

            let entry = LogEntry::new(record.level(), record.target(), msg_buf.as_str());
            buffer::push(entry);
        }
    }

    fn flush(&self) {}
}

/// Global logger instance.
static LOGGER: ShimLogger = ShimLogger;

/// Initialise the logging system.
///
/// Called once from the boot path before any other shim code runs; messages
/// logged earlier than the first drain simply wait in the ring.
pub fn init() {
    buffer::enable();

    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Debug))
        .ok();
}
