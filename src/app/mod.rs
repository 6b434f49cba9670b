use std::env;
use std::error::Error;
use std::fmt;
use std::process;
use std::thread;

use chan::Receiver;
use chan_signal::{self, Signal};
use chrono::{DateTime, Local};
use slog::Logger;

use crate::logging::{AppLogger, Config as LogConfig};

pub use self::main::CommonArgs;
#[doc(hidden)]
pub use structopt::StructOpt;

#[macro_use]
mod main;
pub mod prelude;

pub type MainResult = Result<(), Box<dyn Error + Send + Sync>>;

#[derive(Debug)]
struct AppError {
    code: i32,
    error: Box<dyn Error + Send + Sync>,
}

impl AppError {
    pub fn new<E>(code: i32, error: E) -> AppError
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        AppError {
            code: code,
            error: error.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (code: {})", self.error, self.code)
    }
}

/// Handed to the main function: a logger tagged with the run id.
#[derive(Debug)]
pub struct Context {
    pub logger: Logger,
    pub accessid: String,
    pub accesstime: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub exit_on_finish: bool,
    /// Abort on SIGINT or SIGTERM with code `128 + signal`.
    pub handle_signal: bool,
    pub logging: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exit_on_finish: true,
            handle_signal: true,
            logging: LogConfig::default(),
        }
    }
}

pub struct App {
    config: Config,
    main_fn: Option<Box<dyn FnMut(Context) -> MainResult + Send + 'static>>,
    logger: Option<AppLogger>,
    context: Option<Context>,
}

impl App {
    pub fn new() -> Self {
        App::from_config(Config::default())
    }

    pub fn from_config<C: Into<Config>>(config: C) -> Self {
        App {
            config: config.into(),
            main_fn: None,
            logger: None,
            context: None,
        }
    }

    pub fn main<F>(mut self, f: F) -> Self
    where
        F: FnMut(Context) -> MainResult + Send + 'static,
    {
        self.main_fn = Some(Box::new(f));
        self
    }

    /// Runs the main function and returns the exit code: 0 on success,
    /// `128 + code` on failure, 1 when the app could not start.
    pub fn run(mut self) -> i32 {
        let signal = if self.config.handle_signal {
            // `notify` must be called before any other threads are spawned in the process.
            Some(chan_signal::notify(&[Signal::INT, Signal::TERM]))
        } else {
            None
        };
        // an async logger spawns threads internally.
        let code = match App::initialize(&mut self) {
            Ok(()) => App::exec(&mut self, signal),
            Err(c) => c,
        };
        App::finalize(&mut self); // `finalize` must not fail.
        if self.config.exit_on_finish {
            process::exit(code);
        }
        code
    }

    #[inline]
    fn initialize(&mut self) -> Result<(), i32> {
        if self.main_fn.is_none() {
            eprintln!("`main` must be called before running");
            return Err(1);
        }
        match AppLogger::new(self.config.logging.clone()) {
            Ok(logger) => {
                let context = Context {
                    logger: logger.create(),
                    accessid: logger.accessid().to_string(),
                    accesstime: *logger.accesstime(),
                };
                self.logger = Some(logger);
                self.context = Some(context);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", e);
                Err(1)
            }
        }
    }

    #[inline]
    fn exec(&mut self, signal: Option<Receiver<Signal>>) -> i32 {
        let logger = match self.logger {
            Some(ref logger) => logger.create(),
            None => return 1,
        };
        debug!(
            logger,
            "args: {}",
            env::args().collect::<Vec<String>>().join(" ")
        );
        debug!(logger, "{:?}", self.config);
        info!(logger, "*** [START] ***");
        let code = match self.process(signal) {
            Ok(_) => 0,
            Err(e) => {
                error!(logger, "{}", e);
                128 + e.code()
            }
        };
        info!(logger, "application finished (code: {})", code);
        info!(logger, "*** [DONE] ***");
        code
    }

    #[inline]
    fn process(&mut self, signal: Option<Receiver<Signal>>) -> Result<(), AppError> {
        let (mut main_fn, context) = match (self.main_fn.take(), self.context.take()) {
            (Some(main_fn), Some(context)) => (main_fn, context),
            _ => return Err(AppError::new(1, "app is not initialized")),
        };
        let signal = match signal {
            Some(signal) => signal,
            None => return (*main_fn)(context).map_err(|e| AppError::new(1, e)),
        };
        let (sdone, rdone) = chan::sync(0);
        thread::spawn(move || {
            sdone.send((*main_fn)(context).map_err(|e| AppError::new(1, e)));
        });
        let retval;
        chan_select! {
            signal.recv() -> s => {
                retval = Err(match s {
                    Some(s) => AppError::new(signal_to_i32(s), format!("receive a signal: {:?}", s)),
                    None => AppError::new(1, "failed to receive a signal"),
                });
            },
            rdone.recv() -> r => {
                retval = r.unwrap_or_else(|| Err(AppError::new(1, "failed to receive a result")));
            }
        }
        retval
    }

    #[inline]
    fn finalize(&mut self) {
        self.main_fn = None;
        self.context = None;
        self.logger = None;
    }
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("App").field("config", &self.config).finish()
    }
}

fn signal_to_i32(signal: Signal) -> i32 {
    match signal {
        Signal::HUP => libc::SIGHUP,
        Signal::INT => libc::SIGINT,
        Signal::QUIT => libc::SIGQUIT,
        Signal::TERM => libc::SIGTERM,
        _ => 1,
    }
}
