use log::{LevelFilter, SetLoggerError};

const LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sink {
    Console,
    Syslog,
}

impl Sink {
    pub fn from_flag(syslog: bool) -> Self {
        match syslog {
            true => Sink::Syslog,
            false => Sink::Console,
        }
    }
}

/// Fails if a logger is already installed.
pub fn init(sink: Sink) -> Result<(), SetLoggerError> {
    match sink {
        Sink::Console => console(),
        #[cfg(unix)]
        Sink::Syslog => syslog::init(LEVEL),
        #[cfg(not(unix))]
        Sink::Syslog => {
            console()?;
            log::warn!("No system log on this platform, logging to stderr");
            Ok(())
        }
    }
}

fn console() -> Result<(), SetLoggerError> {
    env_logger::Builder::new().filter_level(LEVEL).try_init()
}

#[cfg(unix)]
mod syslog {
    use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
    use std::ffi::CString;

    struct Syslog;

    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Syslog))?;
        // SAFETY: the ident is a static C string, as openlog keeps the pointer
        unsafe { libc::openlog(c"relay".as_ptr(), libc::LOG_PID, libc::LOG_DAEMON) };
        log::set_max_level(level);
        Ok(())
    }

    pub fn priority(level: Level) -> libc::c_int {
        match level {
            Level::Error => libc::LOG_ERR,
            Level::Warn => libc::LOG_WARNING,
            Level::Info => libc::LOG_INFO,
            Level::Debug | Level::Trace => libc::LOG_DEBUG,
        }
    }

    /// Syslog messages are C strings; interior NULs would truncate them.
    pub fn message(record: &Record) -> CString {
        let text = record.args().to_string().replace('\0', "\u{FFFD}");
        CString::new(text).unwrap_or_default()
    }

    impl Log for Syslog {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = message(record);
            // SAFETY: "%s" consumes exactly the one NUL-terminated argument given
            unsafe { libc::syslog(priority(record.level()), c"%s".as_ptr(), line.as_ptr()) };
        }

        fn flush(&self) {}
    }

}
