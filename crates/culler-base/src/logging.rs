use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Logger writing formatted records to stdout.
pub struct StdoutLogger;

/// Logger writing to date-named files, rolling to a new file at midnight UTC.
pub struct FileLogger {
    state: Mutex<FileLoggerState>,
}

struct FileLoggerState {
    dir: PathBuf,
    current_date: String,
    file: File,
}

fn format_record(record: &Record) -> String {
    format!(
        "{} [{}] {}:{}: {}",
        format_timestamp(),
        record.level(),
        record.file().unwrap_or("?"),
        record.line().unwrap_or(0),
        record.args()
    )
}

impl Log for StdoutLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("{}", format_record(record));
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

impl FileLogger {
    /// Create a logger writing `<dir>/<YYYY-MM-DD>.log`, creating `dir` as needed.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let current_date = format_today();
        let file = open_log_file(&dir, &current_date)?;

        Ok(FileLogger {
            state: Mutex::new(FileLoggerState {
                dir,
                current_date,
                file,
            }),
        })
    }
}

fn open_log_file(dir: &PathBuf, date: &str) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{date}.log")))
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        // Roll over when the UTC date changes; keep the old file on failure.
        let today = format_today();
        if today != state.current_date {
            match open_log_file(&state.dir, &today) {
                Ok(file) => {
                    state.file = file;
                    state.current_date = today;
                }
                Err(e) => {
                    eprintln!("log rollover to {today}.log failed: {e}");
                }
            }
        }

        let line = format_record(record);
        if let Err(e) = writeln!(state.file, "{line}") {
            eprintln!("log write failed: {e}");
            eprintln!("{line}");
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.file.flush().ok();
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    let rem = secs % 86400;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year,
        month,
        day,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn format_today() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    format!("{year:04}-{month:02}-{day:02}")
}

/// Days since Unix epoch to civil (year, month, day).
/// Howard Hinnant's algorithm, http://howardhinnant.github.io/date_algorithms.html
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m, d)
}

fn default_max_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the stdout logger as the global logger.
///
/// Debug builds log at Debug and above, release builds at Info and above.
/// Calling this more than once is a no-op.
pub fn init_stdout_logger() {
    static LOGGER: StdoutLogger = StdoutLogger;

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(default_max_level());
    }
}

/// Install a [`FileLogger`] writing into `dir` as the global logger.
///
/// Same level policy and once-only semantics as [`init_stdout_logger`].
/// Errors only if the log directory or file cannot be created.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> std::io::Result<()> {
    let logger = Box::new(FileLogger::new(dir)?);

    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(default_max_level());
    }

    Ok(())
}

/// Log an unrecoverable error, flush stdout, and exit with status 1.
#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
        {
            use std::io::Write;
            let _ = std::io::stdout().flush();
        }
        std::process::exit(1)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn civil_leap_day() {
        // 2000-02-29
        assert_eq!(civil_from_days(11016), (2000, 2, 29));
    }

    #[test]
    fn timestamp_shape() {
        let ts = format_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[13..14], ":");
    }

    #[test]
    fn file_logger_rolls_over_on_date_change() {
        let dir = std::env::temp_dir().join(format!("culler-log-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let logger = FileLogger::new(&dir).unwrap();

        // Pretend the logger was opened on an old date.
        let stale = open_log_file(&dir, "1999-12-31").unwrap();
        {
            let mut state = logger.state.lock().unwrap();
            state.current_date = "1999-12-31".to_string();
            state.file = stale;
        }

        let record = log::RecordBuilder::new()
            .level(log::Level::Info)
            .file(Some("logging.rs"))
            .line(Some(1))
            .args(format_args!("hello"))
            .build();
        logger.log(&record);

        // The mismatch is noticed before writing, so the message lands in
        // today's file and the state is updated.
        let today = format_today();
        let content = fs::read_to_string(dir.join(format!("{today}.log"))).unwrap();
        assert!(content.contains("hello"));
        assert_eq!(logger.state.lock().unwrap().current_date, today);

        fs::remove_dir_all(&dir).ok();
    }
}
