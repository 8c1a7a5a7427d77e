//! Log Ring Buffer
//!
//! Stores formatted log entries in a lock-free ring for later draining.
//!
//! # Design
//!
//! - Lock-free fixed-slot queue using `thingbuf`
//! - 32 fixed-size entry slots; overflow drops the new message
//! - Safe from any context the shim runs in, including the boot path before
//!   the OS is up
//!
//! Entries carry no timestamp: there is no clock service until the vendor
//! init routine has run, and the drain preserves ordering anyway.

use core::sync::atomic::{AtomicBool, Ordering};

use thingbuf::StaticThingBuf;

/// Maximum size of a single entry's content (target + message).
pub const LOG_ENTRY_CONTENT_SIZE: usize = 120;

/// Number of entry slots in the ring.
pub const LOG_BUFFER_SLOTS: usize = 32;

/// A single log entry with fixed-size storage.
#[derive(Clone)]
pub struct LogEntry {
    /// Log level (0=Error, 1=Warn, 2=Info, 3=Debug, 4=Trace).
    pub level: u8,
    /// Length of the target string.
    pub target_len: u8,
    /// Length of the message.
    pub message_len: u16,
    /// Combined target + message content.
    /// Layout: [target bytes][message bytes]
    pub content: [u8; LOG_ENTRY_CONTENT_SIZE],
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            level: 0,
            target_len: 0,
            message_len: 0,
            content: [0u8; LOG_ENTRY_CONTENT_SIZE],
        }
    }
}

impl LogEntry {
    /// Create a new log entry, truncating target and message to fit.
    pub fn new(level: log::Level, target: &str, message: &str) -> Self {
        let mut entry = Self {
            level: level_to_u8(level),
            ..Self::default()
        };

        let target_bytes = target.as_bytes();
        let target_len = target_bytes.len().min(255).min(LOG_ENTRY_CONTENT_SIZE);
        entry.content[..target_len].copy_from_slice(&target_bytes[..target_len]);
        entry.target_len = target_len as u8;

        let message_bytes = message.as_bytes();
        let remaining = LOG_ENTRY_CONTENT_SIZE - target_len;
        let message_len = message_bytes.len().min(remaining);
        entry.content[target_len..target_len + message_len]
            .copy_from_slice(&message_bytes[..message_len]);
        entry.message_len = message_len as u16;

        entry
    }

    /// Get the target string.
    pub fn target(&self) -> &str {
        let len = self.target_len as usize;
        core::str::from_utf8(&self.content[..len]).unwrap_or("<invalid>")
    }

    /// Get the message string.
    pub fn message(&self) -> &str {
        let target_len = self.target_len as usize;
        let message_len = self.message_len as usize;
        core::str::from_utf8(&self.content[target_len..target_len + message_len])
            .unwrap_or("<invalid>")
    }
}

fn level_to_u8(level: log::Level) -> u8 {
    match level {
        log::Level::Error => 0,
        log::Level::Warn => 1,
        log::Level::Info => 2,
        log::Level::Debug => 3,
        log::Level::Trace => 4,
    }
}

const fn level_str(level: u8) -> &'static str {
    match level {
        0 => "[ERROR]",
        1 => "[WARN ]",
        2 => "[INFO ]",
        3 => "[DEBUG]",
        _ => "[TRACE]",
    }
}

/// Lock-free log ring.
static LOG_BUFFER: StaticThingBuf<LogEntry, LOG_BUFFER_SLOTS> = StaticThingBuf::new();

static BUFFER_ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable the log ring. Entries pushed before this are dropped.
pub fn enable() {
    BUFFER_ENABLED.store(true, Ordering::Release);
}

/// Push a log entry to the ring.
///
/// Returns true if the entry was queued, false if the ring is full or
/// disabled.
pub fn push(entry: LogEntry) -> bool {
    if !BUFFER_ENABLED.load(Ordering::Acquire) {
        return false;
    }

    LOG_BUFFER.push(entry).is_ok()
}

/// Pop the oldest entry from the ring.
pub fn pop() -> Option<LogEntry> {
    LOG_BUFFER.pop()
}

/// Number of entries waiting to be drained.
pub fn available() -> usize {
    LOG_BUFFER.len()
}

/// Format one entry as `"[LEVEL] target: message\n"` into `out`.
///
/// Returns the number of bytes written, or 0 if the entry does not fit.
pub fn format_entry(entry: &LogEntry, out: &mut [u8]) -> usize {
    let level = level_str(entry.level);
    let target = entry.target();
    let message = entry.message();

    let needed = level.len() + 1 + target.len() + 2 + message.len() + 1;
    if needed > out.len() {
        return 0;
    }

    let mut written = 0;
    for piece in [level.as_bytes(), b" ", target.as_bytes(), b": ", message.as_bytes(), b"\n"] {
        out[written..written + piece.len()].copy_from_slice(piece);
        written += piece.len();
    }
    written
}

/// Drain entries into a byte buffer for the file-dump task.
///
/// Stops when `out` cannot hold the next entry; that entry is dropped, which
/// is acceptable for a diagnostic drain.
pub fn drain(out: &mut [u8]) -> usize {
    let mut written = 0;
    while let Some(entry) = LOG_BUFFER.pop() {
        let n = format_entry(&entry, &mut out[written..]);
        if n == 0 {
            break;
        }
        written += n;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_round_trip() {
        let entry = LogEntry::new(log::Level::Info, "boot", "image relocated");
        assert_eq!(entry.target(), "boot");
        assert_eq!(entry.message(), "image relocated");
        assert_eq!(entry.level, 2);
    }

    #[test]
    fn test_entry_truncates_long_message() {
        let raw = [b'x'; 300];
        let long = core::str::from_utf8(&raw).unwrap();
        let entry = LogEntry::new(log::Level::Warn, "diag", long);
        assert_eq!(entry.target(), "diag");
        assert_eq!(entry.message().len(), LOG_ENTRY_CONTENT_SIZE - 4);
    }

    #[test]
    fn test_format_entry() {
        let entry = LogEntry::new(log::Level::Error, "hook", "slot miss");
        let mut out = [0u8; 64];
        let n = format_entry(&entry, &mut out);
        assert_eq!(&out[..n], b"[ERROR] hook: slot miss\n");
    }

    #[test]
    fn test_format_entry_too_small() {
        let entry = LogEntry::new(log::Level::Error, "hook", "slot miss");
        let mut out = [0u8; 8];
        assert_eq!(format_entry(&entry, &mut out), 0);
    }
}
