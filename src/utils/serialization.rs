use crate::crypto::HashAlgorithm;
use crate::error::Result;
use crate::graph::Graph;
use crate::protocol::messages::{Challenge, Commitment, ProverId, Response};
use crate::utils::random_graph::InstanceParameters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphInstance {
    pub graph: Graph,
    pub metadata: Option<InstanceParameters>,
}

impl GraphInstance {
    pub fn with_metadata(graph: Graph, metadata: InstanceParameters) -> Self {
        GraphInstance {
            graph,
            metadata: Some(metadata),
        }
    }
}

pub fn save_graph_instance<P: AsRef<Path>>(path: P, instance: &GraphInstance) -> Result<()> {
    let bytes = bincode::serialize(instance)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Decoding runs the graph through `Graph::from_parts`, so an edited file that breaks
/// the coloring or the matrix shape fails with `Error::Codec`.
pub fn load_graph_instance<P: AsRef<Path>>(path: P) -> Result<GraphInstance> {
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}

/// One complete round as seen on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRound {
    pub commitment: Commitment,
    pub challenge: Challenge,
    pub response: Response,
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub prover: ProverId,
    pub hasher: HashAlgorithm,
    pub rounds: Vec<TranscriptRound>,
}

pub fn save_transcript<P: AsRef<Path>>(path: P, transcript: &Transcript) -> Result<()> {
    let bytes = bincode::serialize(transcript)?;
    let mut file = fs::File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

pub fn load_transcript<P: AsRef<Path>>(path: P) -> Result<Transcript> {
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}
