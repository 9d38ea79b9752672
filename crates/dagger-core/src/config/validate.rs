//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.interrogator.threshold) {
            return Err(ConfigError::ValidationError(
                "interrogator.threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if self.processing.caption_ext.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.caption_ext must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.dart.prompt_threshold) {
            return Err(ConfigError::ValidationError(
                "dart.prompt_threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if self.dart.temperature <= 0.0 {
            return Err(ConfigError::ValidationError(
                "dart.temperature must be > 0".into(),
            ));
        }
        if self.dart.top_p <= 0.0 || self.dart.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "dart.top_p must be in (0.0, 1.0]".into(),
            ));
        }
        if self.dart.max_new_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "dart.max_new_tokens must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.interrogator.threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threshold"));

        config.interrogator.threshold = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = Config::default();
        config.processing.supported_formats.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("supported_formats"));
    }

    #[test]
    fn test_validate_rejects_zero_temperature() {
        let mut config = Config::default();
        config.dart.temperature = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_validate_rejects_bad_top_p() {
        let mut config = Config::default();
        config.dart.top_p = 1.2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("top_p"));
    }

    #[test]
    fn test_validate_rejects_zero_max_new_tokens() {
        let mut config = Config::default();
        config.dart.max_new_tokens = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_new_tokens"));
    }
}
