//! Run configuration
//!
//! One YAML file drives a whole attribution run: where the prepared
//! datasets and trained models live, which (system, mechanism) units to
//! process, and the numerical parameters of the gradient, reweighting and
//! bootstrap stages.

use crate::error::{Error, Result};
use crate::features::Mechanism;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_nrep() -> usize {
    50
}

fn default_pert() -> f64 {
    crate::gradient::DEFAULT_PERT
}

fn default_temperature() -> f64 {
    crate::reweight::DEFAULT_TEMPERATURE
}

fn default_trials() -> usize {
    10
}

fn default_seed() -> u64 {
    42
}

fn default_workers() -> usize {
    4
}

/// Parameters of one attribution run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Directory with the prepared `x` / `x_onehot` / `y` / `y_pred` arrays
    pub data_dir: PathBuf,
    /// Directory with the trained model state files
    pub model_dir: PathBuf,
    /// Directory the artifact store writes under
    pub output_dir: PathBuf,

    /// Systems to process, e.g. the ligand complexes
    pub systems: Vec<String>,
    /// Mechanisms to process
    pub mechanisms: Vec<Mechanism>,

    /// Replicas per path
    #[serde(default = "default_nrep")]
    pub nrep: usize,
    /// Perturbation fraction for the gradient estimator
    #[serde(default = "default_pert")]
    pub pert: f64,
    /// Boltzmann temperature, K
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Bootstrap trials per subsample size
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Subsample sizes swept by the convergence test
    #[serde(default)]
    pub subsample_sizes: Vec<usize>,
    /// RNG seed for bootstrap draws
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Worker threads for independent units
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl RunConfig {
    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            ))
        })?;
        let config: RunConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters make sense before any computation starts
    pub fn validate(&self) -> Result<()> {
        if self.systems.is_empty() {
            return Err(Error::InvalidConfig("no systems configured".to_string()));
        }
        if self.mechanisms.is_empty() {
            return Err(Error::InvalidConfig("no mechanisms configured".to_string()));
        }
        if self.nrep < 3 {
            return Err(Error::InvalidConfig(format!(
                "nrep must be at least 3, got {}",
                self.nrep
            )));
        }
        if !(self.pert > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "pert must be positive, got {}",
                self.pert
            )));
        }
        if !(self.temperature > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        if self.trials == 0 {
            return Err(Error::InvalidConfig(
                "trials must be at least 1".to_string(),
            ));
        }
        if self.subsample_sizes.iter().any(|&n| n == 0) {
            return Err(Error::InvalidConfig(
                "subsample sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = "\
data_dir: ./data
model_dir: ./models
output_dir: ./out
systems: [toho_amp, toho_cex]
mechanisms: [r1ae, r2ae]
";

    #[test]
    fn test_minimal_config_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.nrep, 50);
        assert_eq!(config.trials, 10);
        assert_eq!(config.seed, 42);
        assert_eq!(config.workers, 4);
        assert_eq!(config.mechanisms.len(), 2);
        assert!(config.subsample_sizes.is_empty());
    }

    #[test]
    fn test_overrides_parse() {
        let yaml = format!("{MINIMAL}nrep: 10\npert: 0.05\nsubsample_sizes: [100, 110]\n");
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.nrep, 10);
        assert_eq!(config.pert, 0.05);
        assert_eq!(config.subsample_sizes, vec![100, 110]);
    }

    #[test]
    fn test_bad_mechanism_rejected() {
        let yaml = MINIMAL.replace("r2ae", "r9ae");
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        assert!(matches!(
            RunConfig::load(file.path()),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for bad in [
            "nrep: 2\n",
            "pert: 0.0\n",
            "temperature: -1\n",
            "trials: 0\n",
            "subsample_sizes: [0]\n",
        ] {
            let yaml = format!("{MINIMAL}{bad}");
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(yaml.as_bytes()).unwrap();
            assert!(
                matches!(RunConfig::load(file.path()), Err(Error::InvalidConfig(_))),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_empty_systems_rejected() {
        let yaml = MINIMAL.replace("systems: [toho_amp, toho_cex]", "systems: []");
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        assert!(RunConfig::load(file.path()).is_err());
    }
}
