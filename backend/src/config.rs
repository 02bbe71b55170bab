use log::{info, warn};
use std::{env, fmt::Display, io, path::PathBuf, str::FromStr};

/// Runtime settings, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Upper bound for JSON request bodies, in bytes.
    pub json_limit: usize,
}

impl Config {
    pub fn load() -> io::Result<Self> {
        Ok(Self {
            host: try_load("HOST", "127.0.0.1")?,
            port: try_load("PORT", "8000")?,
            database_path: try_load("DATABASE_PATH", "demo-tracking.sqlite")?,
            json_limit: try_load("JSON_LIMIT_BYTES", "1048576")?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> io::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid value for {key}: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_for_unset_keys() {
        let port: u16 = try_load("TRACKER_TEST_UNSET_PORT", "8000").unwrap();
        assert_eq!(port, 8000);
    }

    #[test]
    fn rejects_unparseable_defaults() {
        let err = try_load::<u16>("TRACKER_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
