//! Server-reported usage counters.
//!
//! The snapshot is a read-only mirror of what the server reports. It is
//! advisory: the client uses it to pre-emptively disable input near the
//! daily limit, while the server remains the enforcement point.

use serde::{Deserialize, Serialize};

/// Advisory daily token allowance, mirroring the server's quota.
pub const DAILY_TOKEN_LIMIT: u64 = 90_000;

/// Usage counters for the signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Tokens used today; resets at midnight UTC.
    #[serde(default)]
    pub daily_tokens: u64,
    /// Lifetime tokens used.
    #[serde(default)]
    pub total_tokens: u64,
    /// Total conversations started.
    #[serde(default)]
    pub total_conversations: u64,
}

impl UsageSnapshot {
    /// True once today's tokens meet or exceed [`DAILY_TOKEN_LIMIT`].
    #[must_use]
    pub fn is_over_daily_limit(&self) -> bool {
        self.daily_tokens >= DAILY_TOKEN_LIMIT
    }

    /// Tokens left in today's allowance.
    #[must_use]
    pub fn daily_remaining(&self) -> u64 {
        DAILY_TOKEN_LIMIT.saturating_sub(self.daily_tokens)
    }

    /// Fraction of today's allowance used, clamped to `1.0`.
    #[must_use]
    pub fn daily_fraction_used(&self) -> f64 {
        (self.daily_tokens as f64 / DAILY_TOKEN_LIMIT as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_limit() {
        let usage = UsageSnapshot {
            daily_tokens: 1_000,
            total_tokens: 50_000,
            total_conversations: 3,
        };
        assert!(!usage.is_over_daily_limit());
        assert_eq!(usage.daily_remaining(), 89_000);
    }

    #[test]
    fn test_over_limit() {
        let usage = UsageSnapshot {
            daily_tokens: 95_000,
            ..UsageSnapshot::default()
        };
        assert!(usage.is_over_daily_limit());
        assert_eq!(usage.daily_remaining(), 0);
        assert_eq!(usage.daily_fraction_used(), 1.0);
    }

    #[test]
    fn test_deserialize_missing_fields_default() {
        let usage: UsageSnapshot = serde_json::from_str(r#"{"daily_tokens": 12}"#).unwrap();
        assert_eq!(usage.daily_tokens, 12);
        assert_eq!(usage.total_tokens, 0);
    }
}
