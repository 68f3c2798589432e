use base64::{engine::general_purpose, Engine as _};
use rand_core::{OsRng, RngCore};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// One year.
const SESSION_TTL_HOURS: RangeInclusive<i64> = 1..=8_760;
/// One day.
const RESET_FLOW_TTL_MINUTES: RangeInclusive<i64> = 1..=1_440;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be valid base64")]
    Base64(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub session_key: Vec<u8>,
    pub session_ttl_hours: i64,
    pub reset_flow_ttl_minutes: i64,
    pub login_attempts_per_minute: usize,
    /// Return generated verification codes in API responses.
    pub echo_reset_codes: bool,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            session_key: random_key(),
            session_ttl_hours: 24,
            reset_flow_ttl_minutes: 30,
            login_attempts_per_minute: 5,
            echo_reset_codes: true,
            secure_cookies: false,
        }
    }
}

fn random_key() -> Vec<u8> {
    let mut key = vec![0u8; 32];
    OsRng.fill_bytes(&mut key);
    key
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn check_range(name: &'static str, value: i64, range: RangeInclusive<i64>) -> Result<i64, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
            format!("0.0.0.0:{}", port)
        });

        let session_key = match std::env::var("SESSION_KEY") {
            Ok(b64) => general_purpose::STANDARD
                .decode(b64.trim())
                .map_err(|_| ConfigError::Base64("SESSION_KEY"))?,
            Err(_) => {
                tracing::warn!("SESSION_KEY not set, using a random key; sessions end on restart");
                defaults.session_key
            }
        };

        Ok(Self {
            bind_addr,
            session_key,
            session_ttl_hours: check_range(
                "SESSION_TTL_HOURS",
                parse_var("SESSION_TTL_HOURS", defaults.session_ttl_hours)?,
                SESSION_TTL_HOURS,
            )?,
            reset_flow_ttl_minutes: check_range(
                "RESET_FLOW_TTL_MINUTES",
                parse_var("RESET_FLOW_TTL_MINUTES", defaults.reset_flow_ttl_minutes)?,
                RESET_FLOW_TTL_MINUTES,
            )?,
            login_attempts_per_minute: parse_var("LOGIN_RATE_LIMIT", defaults.login_attempts_per_minute)?,
            echo_reset_codes: parse_var("ECHO_RESET_CODES", defaults.echo_reset_codes)?,
            secure_cookies: parse_var("SECURE_COOKIES", defaults.secure_cookies)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_ranges() {
        assert_eq!(check_range("SESSION_TTL_HOURS", 24, SESSION_TTL_HOURS).unwrap(), 24);
        assert_eq!(check_range("RESET_FLOW_TTL_MINUTES", 1_440, RESET_FLOW_TTL_MINUTES).unwrap(), 1_440);
        assert!(matches!(
            check_range("SESSION_TTL_HOURS", -1, SESSION_TTL_HOURS),
            Err(ConfigError::Invalid { name: "SESSION_TTL_HOURS", .. })
        ));
        assert!(check_range("SESSION_TTL_HOURS", 0, SESSION_TTL_HOURS).is_err());
        assert!(check_range("RESET_FLOW_TTL_MINUTES", i64::MAX, RESET_FLOW_TTL_MINUTES).is_err());
    }

    #[test]
    fn test_defaults_are_in_range() {
        let config = Config::default();
        assert!(SESSION_TTL_HOURS.contains(&config.session_ttl_hours));
        assert!(RESET_FLOW_TTL_MINUTES.contains(&config.reset_flow_ttl_minutes));
    }
}
