pub mod commitment;
pub mod hash;

pub use commitment::{commit, Digest, Salt, SALT_LEN};
pub use hash::{Blake3Hash, CommitmentHash, HashAlgorithm, Sha3Hash};
