//! Bridges the `log` facade into tracepoints.
//!
//! Installing the bridge makes every `log::error!`..`log::trace!` call in
//! the process emit a `rust_logging` event, one event per level, carrying
//! the record's file, line, module path, target, and formatted message.
//!
//! ```ignore
//! let (tracer, stream) = tracekit_core::streaming_tracer();
//! tracekit_core::logging::init(tracer);
//! log::info!("hello from the log facade");
//! ```

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::trace::Tracer;

crate::provider! {
    rust_logging {
        error {
            file: string,
            line: u32,
            module_path: string,
            target: string,
            message: string,
        }
        warn {
            file: string,
            line: u32,
            module_path: string,
            target: string,
            message: string,
        }
        info {
            file: string,
            line: u32,
            module_path: string,
            target: string,
            message: string,
        }
        debug {
            file: string,
            line: u32,
            module_path: string,
            target: string,
            message: string,
        }
        trace {
            file: string,
            line: u32,
            module_path: string,
            target: string,
            message: string,
        }
    }
}

struct TracepointLogger {
    tracer: Tracer,
}

impl log::Log for TracepointLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        self.tracer.is_enabled()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let file = record.file().unwrap_or("<unknown>");
        let line = record.line().unwrap_or(0);
        let module_path = record.module_path().unwrap_or("<unknown>");
        let target = record.target();
        let message = format!("{}", record.args());

        use log::Level;
        use rust_logging::*;
        match record.level() {
            Level::Error => error::emit(&self.tracer, file, line, module_path, target, &message),
            Level::Warn => warn::emit(&self.tracer, file, line, module_path, target, &message),
            Level::Info => info::emit(&self.tracer, file, line, module_path, target, &message),
            Level::Debug => debug::emit(&self.tracer, file, line, module_path, target, &message),
            Level::Trace => trace::emit(&self.tracer, file, line, module_path, target, &message),
        }
    }

    fn flush(&self) {}
}

/// Try to install the bridge as the process logger, forwarding log records
/// into the given tracer. Reports an error if a logger is already set.
pub fn try_init(tracer: Tracer) -> Result<(), SetLoggerError> {
    log::set_max_level(LevelFilter::Trace);
    log::set_logger(Box::leak(Box::new(TracepointLogger { tracer })))
}

/// Install the bridge, panicking if a logger is already set.
pub fn init(tracer: Tracer) {
    try_init(tracer).expect("a logger is already installed");
}
