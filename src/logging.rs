use log::{Level, Log, Metadata, Record};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

const TARGET: &str = "piwebapi_client";

/// Logger handle passed explicitly to every component.
///
/// Wraps any [`log::Log`] implementation. [`Logger::global`] forwards to
/// whatever logger the process installed through the `log` facade. Records
/// carry the file and line of the call site.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<dyn Log>,
}

impl Logger {
    /// Inject a specific logger
    pub fn new(inner: impl Log + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Forward to the process-wide logger (e.g. one set up by `env_logger`)
    pub fn global() -> Self {
        Self::new(GlobalLog)
    }

    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args, Location::caller());
    }

    fn emit(&self, level: Level, args: fmt::Arguments<'_>, caller: &'static Location<'static>) {
        let metadata = Metadata::builder().level(level).target(TARGET).build();
        if !self.inner.enabled(&metadata) {
            return;
        }
        self.inner.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .file_static(Some(caller.file()))
                .line(Some(caller.line()))
                .build(),
        );
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

/// Forwards to `log::logger()`, honouring `log::max_level()` like the macros do
struct GlobalLog;

impl Log for GlobalLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        log::logger().log(record);
    }

    fn flush(&self) {
        log::logger().flush();
    }
}
