use crate::crypto::hash::CommitmentHash;
use crate::graph::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length in bytes of the per-node blinding salt.
pub const SALT_LEN: usize = 128;

pub type Digest = [u8; 32];

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(Vec<u8>);

impl Salt {
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut bytes = vec![0u8; SALT_LEN];
        rng.fill_bytes(&mut bytes);
        Salt(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Salt(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Salts are secret until opened; keep them out of logs.
impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Salt({} bytes)", self.0.len())
    }
}

pub fn commit(hasher: &dyn CommitmentHash, color: Color, salt: &Salt) -> Digest {
    hasher.commit(color.label(), salt.as_bytes())
}
