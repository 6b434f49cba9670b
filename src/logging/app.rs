use chrono::prelude::*;
use slog::Logger;
use uuid::Uuid;

use super::{create_logger_with_kv_and_time, Config, Error};

/// Root logger of one run. Every record carries the run id, and the run's
/// start and end are logged.
#[derive(Debug)]
pub struct AppLogger {
    inner: Logger,
    accessid: String,
    accesstime: DateTime<Local>,
}

impl AppLogger {
    pub fn new<C: Into<Config>>(config: C) -> Result<Self, Error> {
        let accesstime = Local::now();
        let accessid = run_id(&accesstime);
        let (inner, logfile) = create_logger_with_kv_and_time(
            config,
            o!("accessid" => accessid.clone()),
            &accesstime,
        )?;
        match logfile {
            Some(path) => info!(
                inner, "run {} started at {}", accessid, accesstime.to_rfc3339();
                "logfile" => path.display().to_string()
            ),
            None => info!(inner, "run {} started at {}", accessid, accesstime.to_rfc3339()),
        }
        Ok(AppLogger {
            inner: inner,
            accessid: accessid,
            accesstime: accesstime,
        })
    }

    pub fn accessid(&self) -> &str {
        &self.accessid
    }

    pub fn accesstime(&self) -> &DateTime<Local> {
        &self.accesstime
    }

    /// A child logger inheriting the run id.
    pub fn create(&self) -> Logger {
        self.inner.new(o!())
    }
}

impl Drop for AppLogger {
    fn drop(&mut self) {
        let elapsed = Local::now().signed_duration_since(self.accesstime);
        info!(
            self.inner,
            "run {} finished in {:.3}s",
            self.accessid,
            elapsed.num_milliseconds() as f64 * 1e-3
        );
    }
}

/// First eight hex digits of a name-based UUID over the start time.
fn run_id(time: &DateTime<Local>) -> String {
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, time.to_rfc3339().as_bytes());
    let mut id = uuid.simple().to_string();
    id.truncate(8);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Level;

    #[test]
    fn test_run_id() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let id = run_id(&time);
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, run_id(&time));
        assert_ne!(id, run_id(&(time + chrono::Duration::seconds(1))));
    }

    #[test]
    fn test_app_logger() {
        let mut config = Config::default();
        config.verbosity = Level::Off;
        let logger = AppLogger::new(config).unwrap();
        assert_eq!(logger.accessid(), run_id(logger.accesstime()));
        info!(logger.create(), "child record");
    }
}
