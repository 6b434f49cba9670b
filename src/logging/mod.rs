use std::error;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io as std_io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use chrono::prelude::*;
pub use slog::FilterLevel as Level;
use slog::{
    Discard, Drain, Duplicate, Fuse, Level as LogLevel, LevelFilter, Logger, OwnedKV,
    SendSyncRefUnwindSafeKV,
};
use slog_async::Async;
use slog_term::{CompactFormat, Decorator, FullFormat, PlainDecorator, TermDecorator};

pub use self::app::AppLogger;

mod app;

#[derive(Debug)]
pub enum Stream {
    StdOut,
    StdErr,
    File(File),
    Null,
}

impl Stream {
    pub fn is_null(&self) -> bool {
        match *self {
            Stream::Null => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Full,
    Compact,
}

#[derive(Debug)]
pub struct LoggerBuilder {
    stream: Stream,
    level: Level,
    format: Format,
}

impl LoggerBuilder {
    pub fn new(stream: Stream) -> Self {
        LoggerBuilder {
            stream: stream,
            level: Level::Debug,
            format: Format::Full,
        }
    }

    pub fn level(mut self, l: Level) -> Self {
        self.level = l;
        self
    }

    pub fn format(mut self, f: Format) -> Self {
        self.format = f;
        self
    }

    pub fn build<T>(self, values: OwnedKV<T>) -> Logger
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        match self.build_drain() {
            Some(drain) => Logger::root(drain.fuse(), values),
            None => Logger::root(Discard, values),
        }
    }

    fn build_drain(self) -> Option<LevelFilter<Fuse<Async>>> {
        let level = LogLevel::from_usize(self.level.as_usize())?;
        let format = self.format;
        match self.stream {
            Stream::StdOut => Some(build_drain_from_decorator(
                TermDecorator::new().stdout().build(),
                format,
                level,
            )),
            Stream::StdErr => Some(build_drain_from_decorator(
                TermDecorator::new().stderr().build(),
                format,
                level,
            )),
            Stream::File(f) => Some(build_drain_from_decorator(
                PlainDecorator::new(f),
                format,
                level,
            )),
            Stream::Null => None,
        }
    }

    pub fn build_with<T>(self, other: LoggerBuilder, values: OwnedKV<T>) -> Logger
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        match (self.build_drain(), other.build_drain()) {
            (Some(d1), Some(d2)) => Logger::root(Duplicate::new(d1, d2).fuse(), values),
            (Some(d1), None) => Logger::root(d1.fuse(), values),
            (None, Some(d2)) => Logger::root(d2.fuse(), values),
            (None, None) => Logger::root(Discard, values),
        }
    }
}

fn build_drain_from_decorator<D: Decorator + Send + 'static>(
    decorator: D,
    format: Format,
    level: LogLevel,
) -> LevelFilter<Fuse<Async>> {
    let drain = match format {
        Format::Compact => {
            let drain = CompactFormat::new(decorator).use_local_timestamp().build();
            Async::new(drain.fuse()).build()
        }
        Format::Full => {
            let drain = FullFormat::new(decorator).use_local_timestamp().build();
            Async::new(drain.fuse()).build()
        }
    };
    LevelFilter::new(drain.fuse(), level)
}

#[derive(Debug)]
pub enum Error {
    InvalidOption,
    Other(std_io::Error),
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::InvalidOption => None,
            Error::Other(ref e) => Some(e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidOption => "invalid option".fmt(f),
            Error::Other(ref err) => err.fmt(f),
        }
    }
}

impl From<std_io::Error> for Error {
    fn from(err: std_io::Error) -> Self {
        Error::Other(err)
    }
}

/// Logger settings: `verbosity` filters the terminal, `level` the log file.
///
/// A log file is written only when `logdir` is set and `level` is not `Off`.
/// `filename` is a `chrono` format string; `filemode` is `a` (append), `w`
/// (truncate) or `n` (a fresh numbered file).
#[derive(Debug, Clone)]
pub struct Config {
    pub level: Level,
    pub verbosity: Level,
    pub logdir: Option<String>,
    pub mkdir: bool,
    pub filename: String,
    pub filemode: char,
    pub fileprefix: Option<String>,
    pub filesuffix: Option<String>,
    pub format: Format,
    pub use_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            level: Level::Debug,
            verbosity: Level::Info,
            logdir: None,
            mkdir: false,
            filename: "%Y%m%d.log".to_string(),
            filemode: 'a',
            fileprefix: None,
            filesuffix: None,
            format: Format::Full,
            use_stderr: false,
        }
    }
}

pub fn create_logger<C: Into<Config>>(config: C) -> Result<Logger, Error> {
    create_logger_with_kv_and_time(config, o!(), &Local::now()).map(|(logger, _)| logger)
}

pub fn create_logger_with_kv<C: Into<Config>, T>(
    config: C,
    values: OwnedKV<T>,
) -> Result<Logger, Error>
where
    T: SendSyncRefUnwindSafeKV + 'static,
{
    create_logger_with_kv_and_time(config, values, &Local::now()).map(|(logger, _)| logger)
}

/// Builds a terminal logger duplicated into a log file, returning the file
/// path when one was opened.
pub fn create_logger_with_kv_and_time<C: Into<Config>, T, Tz: TimeZone>(
    config: C,
    values: OwnedKV<T>,
    datetime: &DateTime<Tz>,
) -> Result<(Logger, Option<PathBuf>), Error>
where
    T: SendSyncRefUnwindSafeKV + 'static,
    Tz::Offset: fmt::Display,
{
    let c = config.into();
    let (fstream, filepath) = match (c.level, c.logdir.as_ref()) {
        (Level::Off, _) | (_, None) => (Stream::Null, None),
        (_, Some(logdir)) => {
            let mut options = OpenOptions::new();
            options.create(true).write(true);
            let mut enable_numbering = false;
            match c.filemode {
                'w' => {
                    options.truncate(true);
                }
                'a' => {
                    options.append(true);
                }
                'n' => {
                    options.truncate(true);
                    enable_numbering = true;
                }
                _ => {
                    return Err(Error::InvalidOption);
                }
            }
            let path = resolve_filepath(
                logdir,
                &c.filename,
                c.fileprefix.as_ref().map(|s| s.as_str()),
                c.filesuffix.as_ref().map(|s| s.as_str()),
                datetime,
                c.mkdir,
                enable_numbering,
            )?;
            let file = options.open(&path)?;
            (Stream::File(file), Some(path))
        }
    };

    let vstream = if c.use_stderr {
        Stream::StdErr
    } else {
        Stream::StdOut
    };
    let logger = LoggerBuilder::new(vstream)
        .level(c.verbosity)
        .format(c.format)
        .build_with(
            LoggerBuilder::new(fstream).level(c.level).format(c.format),
            values,
        );
    Ok((logger, filepath))
}

fn resolve_filepath<P1: AsRef<Path>, P2: AsRef<Path>, Tz: TimeZone>(
    dir: P1,
    filename: P2,
    prefix: Option<&str>,
    suffix: Option<&str>,
    time: &DateTime<Tz>,
    mkdir: bool,
    numbering: bool,
) -> Result<PathBuf, std_io::Error>
where
    Tz::Offset: fmt::Display,
{
    let dir = dir.as_ref();
    if dir.is_dir() {
        // pass
    } else if mkdir {
        fs::create_dir_all(dir)?;
    } else {
        return Err(std_io::Error::new(
            std_io::ErrorKind::NotFound,
            format!("file `{}` is not a directory", dir.display()),
        ));
    }

    let filename = filename.as_ref();
    if filename.to_string_lossy().contains(MAIN_SEPARATOR) {
        return Err(std_io::Error::new(
            std_io::ErrorKind::InvalidInput,
            "filename must not contain the separator",
        ));
    }

    let stem = filename
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| std_io::Error::new(std_io::ErrorKind::InvalidInput, "invalid filename"))?;
    let stem = format!(
        "{}{}{}",
        prefix.unwrap_or(""),
        time.format(stem),
        suffix.unwrap_or("")
    );
    let ext = filename
        .extension()
        .map(|s| format!(".{}", s.to_string_lossy()))
        .unwrap_or_default();

    if numbering {
        let mut number = 0;
        loop {
            let path = dir.join(format!("{}-{}{}", stem, number, ext));
            if !path.exists() {
                return Ok(path);
            }
            number += 1;
        }
    } else {
        Ok(dir.join(format!("{}{}", stem, ext)))
    }
}
