pub mod messages;
pub mod prover;
pub mod runner;
pub mod verifier;

pub use messages::{Challenge, Commitment, NodeOpening, ProverId, Response};
pub use prover::Prover;
pub use runner::{replay, rounds_for_error, soundness_error, ProtocolRunner, SessionReport};
pub use verifier::{SessionRecord, SessionTally, Verifier};
