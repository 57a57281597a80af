// tests/breaker/config_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use flux_breaker::{AdaptiveBreaker, Breaker, BreakerConfig, BreakerError, BreakerRegistry};
    use std::time::Duration;

    #[test]
    fn defaults_match_reference_design() {
        let config = BreakerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket_interval(), Duration::from_millis(250));

        let breaker = AdaptiveBreaker::with_config(config, TestClock::new()).unwrap();
        assert_eq!(breaker.weight_factor(), 1.5);
        assert_eq!(breaker.protection(), 5);
    }

    #[test]
    fn config_rejects_zero_buckets() {
        let config = BreakerConfig::new().buckets(0);
        assert!(matches!(
            config.validate().unwrap_err(),
            BreakerError::InvalidBucketCount
        ));
    }

    #[test]
    fn config_rejects_window_shorter_than_bucket_count() {
        let config = BreakerConfig::new()
            .window(Duration::from_nanos(10))
            .buckets(40);
        assert!(matches!(
            config.validate().unwrap_err(),
            BreakerError::InvalidBucketInterval
        ));
    }

    #[test]
    fn config_rejects_zero_window() {
        let config = BreakerConfig::new().window(Duration::ZERO);
        assert!(matches!(
            config.validate().unwrap_err(),
            BreakerError::InvalidBucketInterval
        ));
    }

    #[test]
    fn config_rejects_bad_weight_factor() {
        for k in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = BreakerConfig::new().weight_factor(k);
            assert!(
                matches!(
                    config.validate().unwrap_err(),
                    BreakerError::InvalidWeightFactor
                ),
                "k = {k} should be rejected"
            );
        }
    }

    #[test]
    fn config_accepts_zero_protection() {
        let config = BreakerConfig::new().protection(0);
        assert!(config.validate().is_ok());
    }

    // Test config builder pattern
    #[test]
    fn config_builder_pattern_works() {
        let config = BreakerConfig::new()
            .window(Duration::from_secs(3))
            .buckets(3)
            .weight_factor(2.0)
            .protection(10)
            .ignore_current_bucket(true);

        assert!(config.validate().is_ok());
        assert_eq!(config.bucket_interval(), Duration::from_secs(1));

        let breaker = AdaptiveBreaker::with_config(config, TestClock::new()).unwrap();
        assert_eq!(breaker.weight_factor(), 2.0);
        assert_eq!(breaker.protection(), 10);
    }

    // Constructor tests with config
    #[test]
    fn constructors_with_invalid_config_fail() {
        let config = BreakerConfig::new().buckets(0);

        let result = AdaptiveBreaker::with_config(config.clone(), TestClock::new());
        assert!(matches!(result.unwrap_err(), BreakerError::InvalidBucketCount));

        let result = Breaker::with_config(config.clone(), TestClock::new());
        assert!(matches!(result.unwrap_err(), BreakerError::InvalidBucketCount));

        let result = BreakerRegistry::with_config(config, TestClock::new());
        assert!(matches!(result.unwrap_err(), BreakerError::InvalidBucketCount));
    }

    #[test]
    fn error_display_formatting() {
        let message = BreakerError::ServiceUnavailable.to_string();
        assert!(message.contains("circuit breaker"));
        assert!(BreakerError::ServiceUnavailable.is_rejection());
        assert!(!BreakerError::InvalidBucketCount.is_rejection());
    }
}
