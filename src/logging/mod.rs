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

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Full,
    Compact,
}

type AsyncDrain = LevelFilter<Fuse<Async>>;

#[derive(Debug)]
pub struct LoggerBuilder {
    stream: Stream,
    level: Level,
    format: Format,
}

impl LoggerBuilder {
    pub fn new(stream: Stream) -> Self {
        LoggerBuilder {
            stream,
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

    /// Builds a logger writing to both streams.
    pub fn build_with<T>(self, other: LoggerBuilder, values: OwnedKV<T>) -> Logger
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        match (self.build_drain(), other.build_drain()) {
            (Some(d1), Some(d2)) => Logger::root(Duplicate::new(d1, d2).fuse(), values),
            (Some(d), None) | (None, Some(d)) => Logger::root(d.fuse(), values),
            (None, None) => Logger::root(Discard, values),
        }
    }

    fn build_drain(&self) -> Option<AsyncDrain> {
        let level = match self.level {
            Level::Off => return None,
            l => LogLevel::from_usize(l.as_usize())?,
        };
        match self.stream {
            Stream::StdOut => {
                Some(self.drain_from_decorator(TermDecorator::new().stdout().build(), level))
            }
            Stream::StdErr => {
                Some(self.drain_from_decorator(TermDecorator::new().stderr().build(), level))
            }
            Stream::File(ref f) => {
                let f = f.try_clone().ok()?;
                Some(self.drain_from_decorator(PlainDecorator::new(f), level))
            }
            Stream::Null => None,
        }
    }

    fn drain_from_decorator<D: Decorator + Send + 'static>(
        &self,
        decorator: D,
        level: LogLevel,
    ) -> AsyncDrain {
        let drain = match self.format {
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
}

/// A logger that drops every record.
pub fn null_logger() -> Logger {
    Logger::root(Discard, o!())
}

#[derive(Debug)]
pub enum Error {
    InvalidOption(char),
    Io(std_io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidOption(mode) => write!(f, "invalid file mode `{}`", mode),
            Error::Io(ref err) => err.fmt(f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::InvalidOption(_) => None,
            Error::Io(ref err) => Some(err),
        }
    }
}

impl From<std_io::Error> for Error {
    fn from(err: std_io::Error) -> Self {
        Error::Io(err)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Level of the file log; `Level::Off` disables the file.
    pub level: Level,
    /// Level of the terminal log.
    pub verbosity: Level,
    pub logdir: String,
    pub mkdir: bool,
    /// File name, formatted with `chrono` strftime specifiers.
    pub filename: String,
    /// `'w'` truncates, `'a'` appends, `'n'` picks a fresh numbered file.
    pub filemode: char,
    pub fileprefix: Option<String>,
    pub filesuffix: Option<String>,
    pub format: Format,
    pub use_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            level: Level::Off,
            verbosity: Level::Info,
            logdir: "./".to_string(),
            mkdir: false,
            filename: "dagparse-%Y%m%d.log".to_string(),
            filemode: 'a',
            fileprefix: None,
            filesuffix: None,
            format: Format::Full,
            use_stderr: true,
        }
    }
}

pub fn create_logger<C: Into<Config>>(config: C) -> Result<Logger, Error> {
    create_logger_with_kv_and_time(config, o!(), Local::now()).map(|(logger, _)| logger)
}

pub fn create_logger_with_kv<C: Into<Config>, T>(
    config: C,
    values: OwnedKV<T>,
) -> Result<Logger, Error>
where
    T: SendSyncRefUnwindSafeKV + 'static,
{
    create_logger_with_kv_and_time(config, values, Local::now()).map(|(logger, _)| logger)
}

/// Creates a logger and returns the path of its log file, if one was opened.
pub fn create_logger_with_kv_and_time<C: Into<Config>, T, Tz: TimeZone>(
    config: C,
    values: OwnedKV<T>,
    datetime: DateTime<Tz>,
) -> Result<(Logger, Option<PathBuf>), Error>
where
    T: SendSyncRefUnwindSafeKV + 'static,
    Tz::Offset: fmt::Display,
{
    let c = config.into();
    let (fstream, filepath) = match c.level {
        Level::Off => (Stream::Null, None),
        _ => {
            let mut options = OpenOptions::new();
            options.create(true).write(true);
            let mut numbering = false;
            match c.filemode {
                'w' => {
                    options.truncate(true);
                }
                'a' => {
                    options.append(true);
                }
                'n' => {
                    options.truncate(true);
                    numbering = true;
                }
                mode => return Err(Error::InvalidOption(mode)),
            }
            let path = resolve_filepath(
                &c.logdir,
                &c.filename,
                c.fileprefix.as_ref().map(|s| s.as_str()),
                c.filesuffix.as_ref().map(|s| s.as_str()),
                datetime,
                c.mkdir,
                numbering,
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
    time: DateTime<Tz>,
    mkdir: bool,
    numbering: bool,
) -> Result<PathBuf, std_io::Error>
where
    Tz::Offset: fmt::Display,
{
    let dir = dir.as_ref();
    if !dir.is_dir() {
        if mkdir {
            fs::create_dir_all(dir)?;
        } else {
            return Err(std_io::Error::new(
                std_io::ErrorKind::NotFound,
                format!("`{}` is not a directory", dir.display()),
            ));
        }
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
