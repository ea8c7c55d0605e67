use crate::crypto::{commit, CommitmentHash, HashAlgorithm};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::protocol::messages::{Challenge, Commitment, NodeOpening, ProverId, Response};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Success and failure counts accumulated for one prover identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTally {
    pub successes: u64,
    pub failures: u64,
}

impl SessionTally {
    pub fn rounds(&self) -> u64 {
        self.successes + self.failures
    }
}

/// Per-prover state: at most one pending commitment plus running counts.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    pending: Option<Commitment>,
    tally: SessionTally,
}

impl SessionRecord {
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn tally(&self) -> SessionTally {
        self.tally
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    DigestMismatch(usize),
    SameLabel,
}

pub struct Verifier {
    graph: Graph,
    hasher: HashAlgorithm,
    rng: StdRng,
    sessions: HashMap<ProverId, SessionRecord>,
}

impl Verifier {
    pub fn new(graph: Graph) -> Self {
        Verifier {
            graph,
            hasher: HashAlgorithm::default(),
            rng: StdRng::from_os_rng(),
            sessions: HashMap::new(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_hasher(mut self, hasher: HashAlgorithm) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn hasher(&self) -> HashAlgorithm {
        self.hasher
    }

    /// Stores `commitment` as the pending one for `prover`, dropping any earlier one.
    pub fn record_commitment(&mut self, prover: ProverId, commitment: Commitment) -> Result<()> {
        let expected = self.graph.size();
        if commitment.len() != expected {
            return Err(Error::CommitmentSizeMismatch {
                expected,
                actual: commitment.len(),
            });
        }
        let record = self.sessions.entry(prover).or_default();
        if record.pending.is_some() {
            debug!(%prover, "overwriting unanswered commitment");
        }
        record.pending = Some(commitment);
        Ok(())
    }

    /// Uniformly random edge of the trusted graph.
    pub fn choose_challenge(&mut self) -> Result<Challenge> {
        let (i, j) = self.graph.random_edge(&mut self.rng)?;
        Ok(Challenge { i, j })
    }

    /// Checks the openings of nodes `i` and `j` against the pending commitment and
    /// consumes it. A rejected opening is counted as a failure and returned as `Ok(false)`.
    pub fn verify(
        &mut self,
        prover: ProverId,
        i: usize,
        j: usize,
        response: &Response,
    ) -> Result<bool> {
        let size = self.graph.size();
        if let Some(&index) = [i, j].iter().find(|&&index| index >= size) {
            return Err(Error::IndexOutOfRange { index, size });
        }
        let record = self
            .sessions
            .get_mut(&prover)
            .ok_or(Error::StaleCommitment(prover))?;
        let commitment = record
            .pending
            .take()
            .ok_or(Error::StaleCommitment(prover))?;

        match check_openings(&self.hasher, &commitment, i, j, response) {
            None => {
                record.tally.successes += 1;
                debug!(%prover, i, j, "opening accepted");
                Ok(true)
            }
            Some(rejection) => {
                record.tally.failures += 1;
                warn!(%prover, i, j, ?rejection, "opening rejected");
                Ok(false)
            }
        }
    }

    pub fn session(&self, prover: ProverId) -> Option<&SessionRecord> {
        self.sessions.get(&prover)
    }

    pub fn report(&self, prover: ProverId) -> Option<SessionTally> {
        self.sessions.get(&prover).map(SessionRecord::tally)
    }

    /// Tallies of every known prover, ordered by identity.
    pub fn reports(&self) -> Vec<(ProverId, SessionTally)> {
        let mut reports: Vec<_> = self
            .sessions
            .iter()
            .map(|(&id, record)| (id, record.tally))
            .collect();
        reports.sort_by_key(|(id, _)| *id);
        reports
    }

    /// Verifier over the same graph with no sessions and an RNG derived from this one.
    pub fn fork(&mut self) -> Verifier {
        Verifier {
            graph: self.graph.clone(),
            hasher: self.hasher,
            rng: StdRng::from_rng(&mut self.rng),
            sessions: HashMap::new(),
        }
    }

    /// Folds the sessions of a fork back in. Counts add up; a pending commitment from
    /// `other` replaces the local one.
    pub fn merge(&mut self, other: Verifier) {
        for (id, incoming) in other.sessions {
            let record = self.sessions.entry(id).or_default();
            record.tally.successes += incoming.tally.successes;
            record.tally.failures += incoming.tally.failures;
            if incoming.pending.is_some() {
                record.pending = incoming.pending;
            }
        }
    }
}

fn check_openings(
    hasher: &dyn CommitmentHash,
    commitment: &Commitment,
    i: usize,
    j: usize,
    response: &Response,
) -> Option<Rejection> {
    let opens = |index: usize, opening: &NodeOpening| {
        commit(hasher, opening.label, &opening.salt) == commitment.digests[index]
    };
    if !opens(i, &response.first) {
        return Some(Rejection::DigestMismatch(i));
    }
    if !opens(j, &response.second) {
        return Some(Rejection::DigestMismatch(j));
    }
    if response.first.label == response.second.label {
        return Some(Rejection::SameLabel);
    }
    None
}
