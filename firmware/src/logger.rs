//! `log` backend for the firmware.
//!
//! The board has no console of its own, so records are formatted into a
//! fixed in-memory buffer (readable from a debugger) until something attaches
//! a sink. Attaching flushes the backlog through the sink, then every later
//! record goes straight to it. The host simulator attaches stderr.
//!
//! Lines look like `[   42] WARN  firmware::control: ...`, where the number
//! is the display frame the record was emitted in.

use conquer_once::spin::OnceCell;
use core::fmt::{self, Write};
use core::sync::atomic::{AtomicU32, Ordering};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

const BUFFER_SIZE: usize = 4096;

/// Longest line handed to a sink; the rest of a longer record is dropped.
const LINE_SIZE: usize = 160;

/// Backlog kept until a sink is attached.
struct LogBuffer {
    buffer: [u8; BUFFER_SIZE],
    position: usize,
}

impl LogBuffer {
    const fn new() -> Self {
        Self {
            buffer: [0; BUFFER_SIZE],
            position: 0,
        }
    }

    fn push(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let needed = bytes.len() + 1;
        if needed > BUFFER_SIZE - self.position {
            // Full: keep what is already there, drop the newcomer.
            return;
        }
        self.buffer[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.buffer[self.position + bytes.len()] = b'\n';
        self.position += needed;
    }

    fn contents(&self) -> &str {
        core::str::from_utf8(&self.buffer[..self.position]).unwrap_or("<invalid UTF-8>")
    }

    fn clear(&mut self) {
        self.position = 0;
    }
}

type Line = heapless::String<LINE_SIZE>;

fn format_line(frame: u32, record: &Record) -> Line {
    let mut line = Line::new();
    // A full line just stops accepting text.
    let _ = write!(
        line,
        "[{:>5}] {:<5} {}: {}",
        frame,
        record.level(),
        record.target(),
        record.args()
    );
    line
}

pub struct FirmwareLogger {
    buffer: Mutex<LogBuffer>,
    sink: OnceCell<fn(&str)>,
    frame: AtomicU32,
}

impl FirmwareLogger {
    pub const fn new() -> Self {
        FirmwareLogger {
            buffer: Mutex::new(LogBuffer::new()),
            sink: OnceCell::uninit(),
            frame: AtomicU32::new(0),
        }
    }

    /// Route output to `sink`, replaying the backlog first.
    ///
    /// Only the first sink sticks; returns `false` if one was already set.
    pub fn attach_sink(&self, sink: fn(&str)) -> bool {
        let mut buffer = self.buffer.lock();
        if self.sink.try_init_once(|| sink).is_err() {
            return false;
        }
        for line in buffer.contents().lines() {
            sink(line);
        }
        buffer.clear();
        true
    }

    pub fn set_frame(&self, frame: u32) {
        self.frame.store(frame, Ordering::Relaxed);
    }

    pub fn frame(&self) -> u32 {
        self.frame.load(Ordering::Relaxed)
    }

    /// True while a record is being buffered. Logging again from that point,
    /// e.g. from a panic raised mid-record, would spin forever on the lock.
    pub fn is_busy(&self) -> bool {
        self.buffer.is_locked()
    }

    /// Inspect the backlog (empty once a sink is attached).
    pub fn with_backlog<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(self.buffer.lock().contents())
    }
}

impl Default for FirmwareLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for FirmwareLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(self.frame(), record);

        // Holding the buffer lock keeps records ordered against a sink being
        // attached and the backlog replayed.
        let mut buffer = self.buffer.lock();
        match self.sink.get() {
            Some(sink) => {
                drop(buffer);
                sink(line.as_str());
            }
            None => buffer.push(&line),
        }
    }

    fn flush(&self) {}
}

impl fmt::Debug for FirmwareLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirmwareLogger")
            .field("frame", &self.frame())
            .field("sink", &self.sink.is_initialized())
            .finish()
    }
}

pub static LOGGER: FirmwareLogger = FirmwareLogger::new();

/// Install [`LOGGER`] as the global logger.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

pub fn attach_sink(sink: fn(&str)) -> bool {
    LOGGER.attach_sink(sink)
}

/// Tag subsequent records with display frame `frame`.
pub fn set_frame(frame: u32) {
    LOGGER.set_frame(frame);
}
