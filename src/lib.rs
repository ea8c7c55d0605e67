pub mod config;
pub mod crypto;
pub mod error;
pub mod graph;
pub mod protocol;
pub mod utils;

pub use config::ProtocolConfig;
pub use crypto::*;
pub use error::{Error, Result};
pub use graph::*;
pub use protocol::{
	messages::{Challenge, Commitment, NodeOpening, ProverId, Response},
	prover::Prover,
	runner::{replay, rounds_for_error, soundness_error, ProtocolRunner, SessionReport},
	verifier::{SessionRecord, SessionTally, Verifier},
};
pub use utils::permutation::ColorPermutation;
pub use utils::random_graph::{generate, InstanceParameters};
pub use utils::serialization::{GraphInstance, Transcript, TranscriptRound};
