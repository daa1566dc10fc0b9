use core::cell::RefCell;
use core::fmt::Write;

use critical_section::Mutex;
use log::{LevelFilter, Metadata, Record};

use crate::Serial0;

static SERIAL: Mutex<RefCell<Option<Serial0>>> = Mutex::new(RefCell::new(None));

struct UartLogger;

static LOGGER: UartLogger = UartLogger;

impl log::Log for UartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        critical_section::with(|cs| {
            if let Some(serial) = SERIAL.borrow_ref_mut(cs).as_mut() {
                writeln!(serial, "[{}] {}", record.level(), record.args()).ok();
            }
        });
    }

    fn flush(&self) {}
}

/// Route `log` output to `serial`.
pub fn logger_init(serial: Serial0) {
    critical_section::with(|cs| {
        SERIAL.borrow_ref_mut(cs).replace(serial);
    });
    log::set_logger(&LOGGER).ok();
    log::set_max_level(LevelFilter::Info);
}
