//! Configuration module for the banking client.
//!
//! Provides the base URL, the timeout tiers used by the retry policy, and
//! extra headers. Configuration is an explicit value handed to the client at
//! construction; nothing is read from globals after that point.

use std::time::Duration;
use url::Url;

use crate::errors::{BankError, BankResult};

/// Environment variable holding the backend base URL.
pub const ENV_BASE_URL: &str = "BANK_API_URL";

/// Environment variable overriding the base timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "BANK_API_TIMEOUT_SECS";

/// Environment variable overriding the extended retry timeout (seconds).
pub const ENV_RETRY_TIMEOUT_SECS: &str = "BANK_API_RETRY_TIMEOUT_SECS";

/// Environment variable overriding the transfer retry timeout (seconds).
pub const ENV_TRANSFER_TIMEOUT_SECS: &str = "BANK_API_TRANSFER_TIMEOUT_SECS";

/// Default timeout for every primary attempt (10 seconds).
pub const DEFAULT_BASE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for a retry attempt (15 seconds).
pub const DEFAULT_EXTENDED_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for a transfer retry attempt (20 seconds).
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeout tier an attempt runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutTier {
    /// Tier used by every primary attempt.
    Base,
    /// Tier used by most retries.
    Extended,
    /// Tier reserved for transfer retries.
    Transfer,
}

/// Durations for each [`TimeoutTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Primary attempt budget.
    pub base: Duration,
    /// Retry budget for most operations.
    pub extended: Duration,
    /// Retry budget for transfers.
    pub transfer: Duration,
}

impl TimeoutPolicy {
    /// Returns the duration configured for a tier.
    pub fn duration(&self, tier: TimeoutTier) -> Duration {
        match tier {
            TimeoutTier::Base => self.base,
            TimeoutTier::Extended => self.extended,
            TimeoutTier::Transfer => self.transfer,
        }
    }

    /// Checks that every tier is non-zero and that tiers never shrink.
    pub fn validate(&self) -> BankResult<()> {
        if self.base.is_zero() || self.extended.is_zero() || self.transfer.is_zero() {
            return Err(BankError::configuration("Timeouts must be greater than zero"));
        }
        if self.extended < self.base {
            return Err(BankError::configuration(
                "Extended timeout must not be shorter than the base timeout",
            ));
        }
        if self.transfer < self.extended {
            return Err(BankError::configuration(
                "Transfer timeout must not be shorter than the extended timeout",
            ));
        }
        Ok(())
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_TIMEOUT,
            extended: DEFAULT_EXTENDED_TIMEOUT,
            transfer: DEFAULT_TRANSFER_TIMEOUT,
        }
    }
}

/// Configuration for the banking client.
#[derive(Debug, Clone)]
pub struct BankConfig {
    /// Base URL of the banking backend, without a trailing slash.
    pub base_url: String,
    /// Timeout tiers.
    pub timeouts: TimeoutPolicy,
    /// Custom headers to include in every request.
    pub custom_headers: Vec<(String, String)>,
}

impl BankConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> BankConfigBuilder {
        BankConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BANK_API_URL` (required): backend base URL
    /// - `BANK_API_TIMEOUT_SECS` (optional): base timeout
    /// - `BANK_API_RETRY_TIMEOUT_SECS` (optional): extended retry timeout
    /// - `BANK_API_TRANSFER_TIMEOUT_SECS` (optional): transfer retry timeout
    pub fn from_env() -> BankResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> BankResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL).ok_or_else(|| {
            BankError::configuration(format!("{} environment variable not set", ENV_BASE_URL))
        })?;

        let mut builder = BankConfigBuilder::new().base_url(base_url);

        if let Some(secs) = parse_secs(&lookup, ENV_TIMEOUT_SECS) {
            builder = builder.base_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_secs(&lookup, ENV_RETRY_TIMEOUT_SECS) {
            builder = builder.extended_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_secs(&lookup, ENV_TRANSFER_TIMEOUT_SECS) {
            builder = builder.transfer_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_secs<F>(lookup: &F, name: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparsable timeout override");
            None
        }
    }
}

/// Builder for `BankConfig`.
#[derive(Debug, Default)]
pub struct BankConfigBuilder {
    base_url: Option<String>,
    base_timeout: Option<Duration>,
    extended_timeout: Option<Duration>,
    transfer_timeout: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl BankConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the primary attempt timeout.
    pub fn base_timeout(mut self, timeout: Duration) -> Self {
        self.base_timeout = Some(timeout);
        self
    }

    /// Sets the retry timeout for most operations.
    pub fn extended_timeout(mut self, timeout: Duration) -> Self {
        self.extended_timeout = Some(timeout);
        self
    }

    /// Sets the retry timeout for transfers.
    pub fn transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = Some(timeout);
        self
    }

    /// Sets all timeout tiers at once.
    pub fn timeouts(mut self, timeouts: TimeoutPolicy) -> Self {
        self.base_timeout = Some(timeouts.base);
        self.extended_timeout = Some(timeouts.extended);
        self.transfer_timeout = Some(timeouts.transfer);
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> BankResult<BankConfig> {
        let raw_url = self
            .base_url
            .ok_or_else(|| BankError::configuration("Base URL is required"))?;

        let base_url = raw_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BankError::configuration("Base URL cannot be empty"));
        }

        let parsed = Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BankError::configuration(format!(
                "Unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        let defaults = TimeoutPolicy::default();
        let timeouts = TimeoutPolicy {
            base: self.base_timeout.unwrap_or(defaults.base),
            extended: self.extended_timeout.unwrap_or(defaults.extended),
            transfer: self.transfer_timeout.unwrap_or(defaults.transfer),
        };
        timeouts.validate()?;

        Ok(BankConfig {
            base_url,
            timeouts,
            custom_headers: self.custom_headers,
        })
    }
}
