use crate::application::use_cases::QueueConfig;
use crate::install_guard::policies::RootFailurePolicy;
use crate::shared::error::GuardError;
use crate::shared::Result;
use std::time::Duration;

/// Tunables of one guarded install, after CLI and config file are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub queue_capacity: usize,
    pub analysis_workers: usize,
    pub max_concurrent_fetches: usize,
    /// Deadline for each root's resolve, fetch and analysis
    pub scan_timeout: Duration,
    pub root_failure_policy: RootFailurePolicy,
}

impl ScanSettings {
    pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
    pub const DEFAULT_ANALYSIS_WORKERS: usize = 10;
    pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 32;
    pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 300;

    /// Rejects zero-sized pools and timeouts
    pub fn validate(&self) -> Result<()> {
        let zero = |field: &str| GuardError::Validation {
            message: format!("{} must be greater than 0", field),
        };

        if self.queue_capacity == 0 {
            return Err(zero("queue_capacity").into());
        }
        if self.analysis_workers == 0 {
            return Err(zero("analysis_workers").into());
        }
        if self.max_concurrent_fetches == 0 {
            return Err(zero("max_concurrent_fetches").into());
        }
        if self.scan_timeout.is_zero() {
            return Err(zero("scan_timeout_secs").into());
        }
        Ok(())
    }

    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            capacity: self.queue_capacity,
            workers: self.analysis_workers,
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            queue_capacity: Self::DEFAULT_QUEUE_CAPACITY,
            analysis_workers: Self::DEFAULT_ANALYSIS_WORKERS,
            max_concurrent_fetches: Self::DEFAULT_MAX_CONCURRENT_FETCHES,
            scan_timeout: Duration::from_secs(Self::DEFAULT_SCAN_TIMEOUT_SECS),
            root_failure_policy: RootFailurePolicy::FailFast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ScanSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.queue_config(), QueueConfig::default());
    }

    #[test]
    fn test_zero_values_rejected() {
        let settings = ScanSettings {
            analysis_workers: 0,
            ..ScanSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("analysis_workers must be greater than 0"));

        let settings = ScanSettings {
            scan_timeout: Duration::ZERO,
            ..ScanSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
