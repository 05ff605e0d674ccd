//! Connection settings, read once from configuration.

use std::time::Duration;

/// Key holding the store connection string
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";
/// Key overriding the connect timeout, in whole seconds
pub const CONNECT_TIMEOUT_KEY: &str = "AUTOLOT_CONNECT_TIMEOUT_SECS";
/// Key overriding the liveness ping timeout, in milliseconds
pub const PING_TIMEOUT_KEY: &str = "AUTOLOT_PING_TIMEOUT_MS";

/// Configuration for the connection manager.
///
/// # Example
///
/// ```ignore
/// let settings = ConnectionSettings::new(Some("postgres://localhost/autolot".into()))
///     .with_connect_timeout(Duration::from_secs(20))
///     .with_ping_timeout(Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    database_url: Option<String>,
    pub connect_timeout: Duration,
    pub ping_timeout: Duration,
}

impl ConnectionSettings {
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(2);

    /// Settings with default timeouts. A blank URL is treated as missing.
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            database_url: database_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            ping_timeout: Self::DEFAULT_PING_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, e.g. a secret store with an
    /// environment fallback. Unparseable timeouts fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::new(lookup(DATABASE_URL_KEY));

        if let Some(raw) = lookup(CONNECT_TIMEOUT_KEY) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.connect_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    "⚠️  Ignoring invalid {}={:?}, using {:?}",
                    CONNECT_TIMEOUT_KEY,
                    raw,
                    settings.connect_timeout
                ),
            }
        }

        if let Some(raw) = lookup(PING_TIMEOUT_KEY) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => settings.ping_timeout = Duration::from_millis(ms),
                _ => tracing::warn!(
                    "⚠️  Ignoring invalid {}={:?}, using {:?}",
                    PING_TIMEOUT_KEY,
                    raw,
                    settings.ping_timeout
                ),
            }
        }

        settings
    }

    /// The connection string, if one is configured
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[(
            DATABASE_URL_KEY,
            "postgres://localhost/autolot",
        )]));
        assert_eq!(settings.database_url(), Some("postgres://localhost/autolot"));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.ping_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_blank_url_is_missing() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[(DATABASE_URL_KEY, "   ")]));
        assert_eq!(settings.database_url(), None);
        assert_eq!(ConnectionSettings::from_lookup(lookup_from(&[])).database_url(), None);
    }

    #[test]
    fn test_timeout_overrides() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[
            (CONNECT_TIMEOUT_KEY, "30"),
            (PING_TIMEOUT_KEY, "750"),
        ]));
        assert_eq!(settings.connect_timeout, Duration::from_secs(30));
        assert_eq!(settings.ping_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_invalid_timeouts_keep_defaults() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[
            (CONNECT_TIMEOUT_KEY, "soon"),
            (PING_TIMEOUT_KEY, "0"),
        ]));
        assert_eq!(settings.connect_timeout, ConnectionSettings::DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(settings.ping_timeout, ConnectionSettings::DEFAULT_PING_TIMEOUT);
    }
}
