use blake3::Hasher as Blake3Hasher;
use digest::Digest;
use serde::{Deserialize, Serialize};
use sha3::Sha3_256;
use std::fmt;
use std::str::FromStr;

pub trait CommitmentHash: Send + Sync {
    fn hash(&self, data: &[u8]) -> [u8; 32];

    /// Hash of `label || salt`.
    fn commit(&self, label: &[u8], salt: &[u8]) -> [u8; 32] {
        let mut buf = Vec::with_capacity(label.len() + salt.len());
        buf.extend_from_slice(label);
        buf.extend_from_slice(salt);
        self.hash(&buf)
    }
}

#[derive(Clone, Default)]
pub struct Blake3Hash;

impl CommitmentHash for Blake3Hash {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Blake3Hasher::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

#[derive(Clone, Default)]
pub struct Sha3Hash;

impl CommitmentHash for Sha3Hash {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(data);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }
}

/// Hash function both parties agree on for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha3,
}

impl CommitmentHash for HashAlgorithm {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        match self {
            HashAlgorithm::Blake3 => Blake3Hash.hash(data),
            HashAlgorithm::Sha3 => Sha3Hash.hash(data),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Blake3 => f.write_str("blake3"),
            HashAlgorithm::Sha3 => f.write_str("sha3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha3" | "sha3-256" => Ok(HashAlgorithm::Sha3),
            other => Err(format!("unknown hash algorithm '{other}'")),
        }
    }
}
