use crate::crypto::HashAlgorithm;
use crate::error::{Error, Result};
use crate::utils::random_graph::{DEFAULT_SIZE, EDGE_DENSITY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Session settings, loadable from a TOML file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocolConfig {
    pub size: usize,
    pub edge_density: f64,
    pub rounds: u64,
    pub hash: HashAlgorithm,
    pub provers: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            size: DEFAULT_SIZE,
            edge_density: EDGE_DENSITY,
            rounds: 200,
            hash: HashAlgorithm::Blake3,
            provers: 1,
        }
    }
}

impl ProtocolConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ProtocolConfig =
            toml::from_str(text).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size < 1 {
            return Err(Error::InvalidGraphSize(self.size));
        }
        if !(self.edge_density > 0.0 && self.edge_density <= 1.0) {
            return Err(Error::InvalidEdgeDensity(self.edge_density));
        }
        if self.rounds < 1 {
            return Err(Error::Config("rounds must be at least 1".into()));
        }
        if self.provers < 1 {
            return Err(Error::Config("provers must be at least 1".into()));
        }
        Ok(())
    }
}
