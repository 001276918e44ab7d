//! Serial console on COM1 and the `log` backend writing to it.
use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;
use uart_16550::SerialPort;

pub const COM1: u16 = 0x3F8;

pub static SERIAL: Mutex<SerialPort> = Mutex::new(unsafe { SerialPort::new(COM1) });

#[macro_export]
macro_rules! println {
    () => {
        $crate::logger::_print(format_args!("\n"))
    };
    ($($arg:tt)*) => {
        $crate::logger::_print(format_args!("{}\n", format_args!($($arg)*)))
    };
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    let _ = SERIAL.lock().write_fmt(args);
}

/// Routes `log` records to the serial console.
pub struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let _ = write_record(&mut *SERIAL.lock(), record);
        }
    }

    fn flush(&self) {}
}

fn write_record(out: &mut impl Write, record: &Record<'_>) -> fmt::Result {
    writeln!(out, "[{:<5} {}] {}", record.level(), record.target(), record.args())
}

/// Brings up COM1 and installs [`SerialLogger`] as the global logger.
pub fn init(level: LevelFilter) -> Result<(), &'static str> {
    SERIAL.lock().init();
    log::set_logger(&LOGGER).map_err(|_| "logger already installed")?;
    log::set_max_level(level);
    Ok(())
}
