// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long to keep asking the attestation service before giving up.
///
/// Polling uses a fixed interval with no backoff. The defaults allow five
/// minutes, which covers fast-finality chains; Ethereum-sourced mainnet
/// transfers usually need around 19 minutes, so raise `max_attempts` for
/// those.
///
/// ```rust
/// use cctp_transfer::PollingConfig;
///
/// let config = PollingConfig::default()
///     .with_max_attempts(120)
///     .with_poll_interval_ms(15_000);
/// assert_eq!(config.total_timeout().as_secs(), 119 * 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub max_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for PollingConfig {
    /// 30 attempts, 10 seconds apart.
    fn default() -> Self {
        Self {
            max_attempts: 30,
            poll_interval_ms: 10_000,
        }
    }
}

impl PollingConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Upper bound on time spent sleeping between attempts.
    ///
    /// There is no sleep after the last attempt, so this is
    /// `(max_attempts - 1) * poll_interval`.
    pub fn total_timeout(&self) -> Duration {
        self.poll_interval()
            .saturating_mul(self.max_attempts.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollingConfig::default();
        assert_eq!(config.max_attempts, 30);
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.total_timeout(), Duration::from_secs(290));
    }

    #[test]
    fn test_builder_methods() {
        let config = PollingConfig::default()
            .with_max_attempts(3)
            .with_poll_interval_ms(250);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.total_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_attempts_has_no_timeout() {
        let config = PollingConfig::default().with_max_attempts(0);
        assert_eq!(config.total_timeout(), Duration::ZERO);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PollingConfig = serde_json::from_str(r#"{"max_attempts": 5}"#).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.poll_interval_ms, 10_000);
    }
}
