//! Engine settings.

use std::time::Duration;

use rust_decimal::Decimal;
use tieout_shared::config::ReportingConfig;

/// Tunables of the reporting engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// How long a computed statement may be served from cache.
    pub cache_ttl: Duration,
    /// Maximum number of cached statements.
    pub cache_capacity: u64,
    /// How long dashboard metrics may be served from cache.
    pub dashboard_cache_ttl: Duration,
    /// Largest accepted difference between a note and its statement.
    pub tie_out_tolerance: Decimal,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&ReportingConfig::default())
    }
}

impl From<&ReportingConfig> for EngineSettings {
    fn from(config: &ReportingConfig) -> Self {
        Self {
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            cache_capacity: config.cache_capacity,
            dashboard_cache_ttl: Duration::from_secs(config.dashboard_cache_ttl_secs),
            tie_out_tolerance: config.tie_out_tolerance.abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_follow_config() {
        let settings = EngineSettings::default();
        assert_eq!(settings.cache_ttl, Duration::from_secs(60));
        assert_eq!(settings.tie_out_tolerance, dec!(0.01));
    }

    #[test]
    fn test_negative_tolerance_is_normalised() {
        let config = ReportingConfig {
            tie_out_tolerance: dec!(-0.05),
            ..ReportingConfig::default()
        };
        assert_eq!(EngineSettings::from(&config).tie_out_tolerance, dec!(0.05));
    }
}
