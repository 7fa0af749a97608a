//! Global UART console, the `print` macros and a [`log`] backend
//! that writes to it.

use crate::uart::Uart;
use core::fmt::{self, Arguments, Write};
use spin::{Mutex, MutexGuard};

static CONSOLE: Mutex<Console> = Mutex::new(Console(None));

/// The UART used as the console, if any was installed yet.
pub struct Console(Option<Uart>);

impl fmt::Write for Console {
    /// Writes into the UART, or does nothing if no UART was installed.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.0 {
            Some(ref mut uart) => uart.write_str(s),
            None => Ok(()),
        }
    }
}

/// Install the given UART as the global console.
///
/// Returns the previous console device, if there was one.
pub fn init(uart: Uart) -> Option<Uart> {
    let old = CONSOLE.lock().0.replace(uart);
    log::debug!("console installed");
    old
}

/// Lock the console and return a guard that can write to it.
///
/// Log records emitted while the guard is alive are dropped.
pub fn lock() -> MutexGuard<'static, Console> {
    CONSOLE.lock()
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::print::_print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

#[doc(hidden)]
pub fn _print(args: Arguments<'_>) {
    let _ = CONSOLE.lock().write_fmt(args);
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            log_to(&CONSOLE, record);
        }
    }

    fn flush(&self) {}
}

/// Writes the record into the console, unless the console is locked.
///
/// The lock may be held further up the same call stack (through [`lock`]),
/// so spinning on it could never succeed. The record is dropped instead and
/// `false` is returned.
fn log_to(console: &Mutex<Console>, record: &log::Record<'_>) -> bool {
    let mut guard = match console.try_lock() {
        Some(guard) => guard,
        None => return false,
    };

    let mod_path = record
        .module_path_static()
        .or_else(|| record.module_path())
        .unwrap_or("<n/a>");
    let _ = write_record(&mut *guard, record.level(), mod_path, record.args());
    true
}

fn write_record<W: Write>(
    out: &mut W,
    level: log::Level,
    module: &str,
    args: &Arguments<'_>,
) -> fmt::Result {
    writeln!(out, "[ {:>5} ] [{}] {}", level, module, args)
}

static LOGGER: Logger = Logger;

/// Register the console as the backend of the [`log`] crate, and only let
/// messages up to the given level through.
pub fn init_logging(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
