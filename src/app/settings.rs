//! Runtime settings: parse/write `settings.conf`.
//!
//! Holds the seed endpoint and the timings of the two background operations.
//! Command line flags override whatever the file says (see [`crate::cli`]).

use std::time::Duration;

use crate::seed::DEFAULT_ENDPOINT;
use crate::submit::DEFAULT_SUBMIT_DELAY;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Remote collection the seed rows are read from.
    pub endpoint: String,
    /// How long the simulated submission takes.
    pub submit_delay_ms: u64,
    /// Request timeout for the seed fetch.
    pub fetch_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            submit_delay_ms: DEFAULT_SUBMIT_DELAY.as_millis() as u64,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Load `path`; else an existing `settings.conf` in the config dir; else write defaults to `path`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path("settings.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(path) {
            tracing::debug!(path, error = %e, "could not write default settings");
        }
        cfg
    }

    /// Parse `key = value` lines. Unknown keys and unparsable numbers are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for (key, val) in super::conf_pairs(contents) {
            match key {
                "endpoint" => cfg.endpoint = val.to_string(),
                "submit_delay_ms" => {
                    if let Ok(ms) = val.parse() {
                        cfg.submit_delay_ms = ms;
                    }
                }
                "fetch_timeout_secs" => {
                    // A zero timeout fails every request.
                    if let Ok(secs @ 1..) = val.parse::<u64>() {
                        cfg.fetch_timeout_secs = secs;
                    }
                }
                _ => {}
            }
        }
        cfg
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        let buf = format!(
            "# userform settings\n\
             # Remote collection returning [{{\"username\": .., \"email\": ..}}, ..]\n\
             endpoint = {}\n\
             # Simulated submission delay in milliseconds\n\
             submit_delay_ms = {}\n\
             # Seed request timeout in seconds\n\
             fetch_timeout_secs = {}\n",
            self.endpoint, self.submit_delay_ms, self.fetch_timeout_secs
        );
        std::fs::write(path, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_public_collection_and_one_second_delay() {
        let s = Settings::default();
        assert_eq!(s.endpoint, "https://jsonplaceholder.typicode.com/users");
        assert_eq!(s.submit_delay(), Duration::from_secs(1));
    }

    #[test]
    fn parse_skips_bad_values() {
        let s = Settings::parse("submit_delay_ms = soon\nfetch_timeout_secs = 3\nendpoint = http://x/users\n");
        assert_eq!(s.submit_delay_ms, 1000);
        assert_eq!(s.fetch_timeout_secs, 3);
        assert_eq!(s.endpoint, "http://x/users");
    }

    #[test]
    fn parse_rejects_zero_fetch_timeout() {
        let s = Settings::parse("fetch_timeout_secs = 0\n");
        assert_eq!(s.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
    }
}
