use matledger_core::pricing::{DEFAULT_ALIAS_RARITY_FACTOR, DEFAULT_LOSS_FACTOR};
use matledger_core::{Error, PricingEngine, Result};
use matledger_similarity::{DEFAULT_EMBEDDING_DIM, DEFAULT_MATCH_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Matches scoring below this are flagged for review
    pub match_threshold: f32,
    pub embedding_dim: usize,
    /// Alternatives recorded for each flagged match
    pub review_candidates: usize,
    pub loss_factor: f64,
    pub alias_rarity_factor: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            review_candidates: 3,
            loss_factor: DEFAULT_LOSS_FACTOR,
            alias_rarity_factor: DEFAULT_ALIAS_RARITY_FACTOR,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.match_threshold) {
            return Err(Error::InvalidConfig(format!(
                "match_threshold must be within [-1, 1], got {}",
                self.match_threshold
            )));
        }
        if self.embedding_dim == 0 {
            return Err(Error::InvalidConfig(
                "embedding_dim must be positive".to_string(),
            ));
        }
        if !self.loss_factor.is_finite() || self.loss_factor < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "loss_factor must be a non-negative number, got {}",
                self.loss_factor
            )));
        }
        if !self.alias_rarity_factor.is_finite() || self.alias_rarity_factor <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "alias_rarity_factor must be positive, got {}",
                self.alias_rarity_factor
            )));
        }
        Ok(())
    }

    pub fn pricing(&self) -> PricingEngine {
        PricingEngine::new(self.loss_factor, self.alias_rarity_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.match_threshold, 0.85);
        assert_eq!(config.pricing(), PricingEngine::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"match_threshold": 0.7, "review_candidates": 5}"#).unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.match_threshold, 0.7);
        assert_eq!(config.review_candidates, 5);
        assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_threshold = PipelineConfig {
            match_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(bad_threshold.validate(), Err(Error::InvalidConfig(_))));

        let bad_dim = PipelineConfig {
            embedding_dim: 0,
            ..Default::default()
        };
        assert!(bad_dim.validate().is_err());

        let bad_loss = PipelineConfig {
            loss_factor: -0.1,
            ..Default::default()
        };
        assert!(bad_loss.validate().is_err());

        let bad_rarity = PipelineConfig {
            alias_rarity_factor: 0.0,
            ..Default::default()
        };
        assert!(matches!(bad_rarity.validate(), Err(Error::InvalidConfig(_))));

        let nan_rarity = PipelineConfig {
            alias_rarity_factor: f64::NAN,
            ..Default::default()
        };
        assert!(nan_rarity.validate().is_err());
    }
}
