use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::protocol::messages::ProverId;
use crate::protocol::prover::Prover;
use crate::protocol::verifier::Verifier;
use crate::utils::serialization::{Transcript, TranscriptRound};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Outcome of one session of repeated rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub prover: ProverId,
    pub rounds: u64,
    pub successes: u64,
    pub failures: u64,
    pub edges: usize,
    /// Upper bound on the chance that a prover with a bad edge passed every round.
    pub soundness_error: f64,
}

impl SessionReport {
    fn new(prover: ProverId, edges: usize) -> Self {
        SessionReport {
            prover,
            rounds: 0,
            successes: 0,
            failures: 0,
            edges,
            soundness_error: 1.0,
        }
    }

    fn record(&mut self, accepted: bool) {
        self.rounds += 1;
        if accepted {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.soundness_error = soundness_error(self.edges, self.rounds);
    }

    pub fn accepted(&self) -> bool {
        self.rounds > 0 && self.failures == 0
    }
}

/// `(1 - 1/|E|)^k`: probability that `rounds` uniform challenges all miss one bad edge.
pub fn soundness_error(edges: usize, rounds: u64) -> f64 {
    if edges == 0 {
        return 1.0;
    }
    (1.0 - 1.0 / edges as f64).powf(rounds as f64)
}

/// Smallest round count whose soundness error is at most `target`.
pub fn rounds_for_error(edges: usize, target: f64) -> Option<u64> {
    if edges == 0 || !(target > 0.0 && target < 1.0) {
        return None;
    }
    if edges == 1 {
        return Some(1);
    }
    let per_round = (1.0 - 1.0 / edges as f64).ln();
    Some((target.ln() / per_round).ceil() as u64)
}

/// Drives sequential commit, challenge, respond and verify rounds.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolRunner {
    rounds: u64,
}

impl ProtocolRunner {
    pub fn new(rounds: u64) -> Self {
        ProtocolRunner { rounds }
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn run(&self, prover: &mut Prover, verifier: &mut Verifier) -> Result<SessionReport> {
        self.run_with(prover, verifier, |_, _| {})
    }

    /// Same as [`run`](Self::run), also keeping every round for later replay.
    pub fn run_recorded(
        &self,
        prover: &mut Prover,
        verifier: &mut Verifier,
    ) -> Result<(SessionReport, Transcript)> {
        let mut rounds = Vec::new();
        let report = self.run_with(prover, verifier, |_, round| rounds.push(round.clone()))?;
        let transcript = Transcript {
            prover: prover.id(),
            hasher: prover.hasher(),
            rounds,
        };
        Ok((report, transcript))
    }

    /// Runs every round, handing each finished one to `observer` with its index.
    pub fn run_with<F>(
        &self,
        prover: &mut Prover,
        verifier: &mut Verifier,
        mut observer: F,
    ) -> Result<SessionReport>
    where
        F: FnMut(u64, &TranscriptRound),
    {
        if prover.hasher() != verifier.hasher() {
            warn!(
                prover = %prover.id(),
                prover_hash = %prover.hasher(),
                verifier_hash = %verifier.hasher(),
                "parties use different commitment hashes"
            );
        }
        let mut report = SessionReport::new(prover.id(), verifier.graph().edge_count());
        for index in 0..self.rounds {
            let round = play_round(prover, verifier)?;
            debug!(
                prover = %prover.id(),
                round = index,
                i = round.challenge.i,
                j = round.challenge.j,
                accepted = round.accepted,
                "round complete"
            );
            report.record(round.accepted);
            observer(index, &round);
        }
        info!(
            prover = %report.prover,
            rounds = report.rounds,
            successes = report.successes,
            failures = report.failures,
            soundness_error = report.soundness_error,
            "session finished"
        );
        Ok(report)
    }

    /// Runs distinct provers on worker threads, each against its own fork of `verifier`,
    /// then merges their session records back into `verifier`.
    pub fn run_parallel(
        &self,
        provers: &mut [Prover],
        verifier: &mut Verifier,
    ) -> Result<Vec<SessionReport>> {
        let mut seen = HashSet::new();
        for prover in provers.iter() {
            if !seen.insert(prover.id()) {
                return Err(Error::DuplicateProver(prover.id()));
            }
        }

        let forks: Vec<Verifier> = provers.iter().map(|_| verifier.fork()).collect();
        let outcomes: Vec<(SessionReport, Verifier)> = provers
            .par_iter_mut()
            .zip(forks.into_par_iter())
            .map(|(prover, mut fork)| -> Result<(SessionReport, Verifier)> {
                let report = self.run(prover, &mut fork)?;
                Ok((report, fork))
            })
            .collect::<Result<_>>()?;

        let mut reports = Vec::with_capacity(outcomes.len());
        for (report, fork) in outcomes {
            verifier.merge(fork);
            reports.push(report);
        }
        Ok(reports)
    }
}

fn play_round(prover: &mut Prover, verifier: &mut Verifier) -> Result<TranscriptRound> {
    let id = prover.id();
    let commitment = prover.generate_commitment();
    verifier.record_commitment(id, commitment.clone())?;
    let challenge = verifier.choose_challenge()?;
    let response = prover.respond(challenge.i, challenge.j)?;
    let accepted = verifier.verify(id, challenge.i, challenge.j, &response)?;
    Ok(TranscriptRound {
        commitment,
        challenge,
        response,
        accepted,
    })
}

/// Re-verifies a stored transcript against `graph` with a fresh verifier.
///
/// Challenges are taken from the transcript, so a replay confirms the openings and the
/// recorded verdicts but cannot show the challenges were drawn at random.
pub fn replay(graph: &Graph, transcript: &Transcript) -> Result<SessionReport> {
    let mut verifier = Verifier::new(graph.clone()).with_hasher(transcript.hasher);
    let mut report = SessionReport::new(transcript.prover, graph.edge_count());
    for (index, round) in transcript.rounds.iter().enumerate() {
        let challenge = round.challenge;
        if !graph.is_adjacent(challenge.i, challenge.j) {
            return Err(Error::TranscriptMismatch(index));
        }
        verifier.record_commitment(transcript.prover, round.commitment.clone())?;
        let accepted =
            verifier.verify(transcript.prover, challenge.i, challenge.j, &round.response)?;
        if accepted != round.accepted {
            return Err(Error::TranscriptMismatch(index));
        }
        report.record(accepted);
    }
    Ok(report)
}
