use crate::crypto::{commit, Digest, HashAlgorithm, Salt};
use crate::error::{Error, Result};
use crate::graph::{Color, Graph};
use crate::protocol::messages::{Commitment, NodeOpening, ProverId, Response};
use crate::utils::permutation::ColorPermutation;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Secrets of the current round. Replaced wholesale by every new commitment.
struct RoundState {
    labels: Vec<Color>,
    salts: Vec<Salt>,
    digests: Vec<Digest>,
}

pub struct Prover {
    id: ProverId,
    coloring: Vec<Color>,
    hasher: HashAlgorithm,
    rng: StdRng,
    round: Option<RoundState>,
}

impl Prover {
    /// Honest prover holding the graph's own coloring as its witness.
    pub fn new(id: ProverId, graph: &Graph) -> Self {
        Self::from_coloring(id, graph.colors().to_vec())
    }

    /// Prover claiming an arbitrary coloring, which need not be valid for any graph.
    pub fn from_coloring(id: ProverId, coloring: Vec<Color>) -> Self {
        Prover {
            id,
            coloring,
            hasher: HashAlgorithm::default(),
            rng: StdRng::from_os_rng(),
            round: None,
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

    pub fn id(&self) -> ProverId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.coloring.len()
    }

    pub fn hasher(&self) -> HashAlgorithm {
        self.hasher
    }

    /// Starts a round: fresh color permutation, fresh salt per node, one digest per node.
    pub fn generate_commitment(&mut self) -> Commitment {
        let permutation = ColorPermutation::random(&mut self.rng);
        let salts = (0..self.size())
            .map(|_| Salt::random(&mut self.rng))
            .collect();
        self.commit_with(permutation, salts)
    }

    pub(crate) fn commit_with(
        &mut self,
        permutation: ColorPermutation,
        salts: Vec<Salt>,
    ) -> Commitment {
        debug_assert_eq!(salts.len(), self.size());
        let labels: Vec<Color> = self
            .coloring
            .iter()
            .map(|&color| permutation.apply(color))
            .collect();
        let digests: Vec<Digest> = labels
            .iter()
            .zip(&salts)
            .map(|(&label, salt)| commit(&self.hasher, label, salt))
            .collect();

        self.round = Some(RoundState {
            labels,
            salts,
            digests: digests.clone(),
        });
        Commitment { digests }
    }

    /// Opens nodes `i` and `j` of the current round. Opening does not end the round.
    pub fn respond(&self, i: usize, j: usize) -> Result<Response> {
        let round = self.round.as_ref().ok_or(Error::StaleCommitment(self.id))?;
        Ok(Response {
            first: self.open(round, i)?,
            second: self.open(round, j)?,
        })
    }

    /// Digests of the current round, if one is open.
    pub fn current_digests(&self) -> Option<&[Digest]> {
        self.round.as_ref().map(|round| round.digests.as_slice())
    }

    fn open(&self, round: &RoundState, index: usize) -> Result<NodeOpening> {
        let size = self.size();
        if index >= size {
            return Err(Error::IndexOutOfRange { index, size });
        }
        Ok(NodeOpening {
            salt: round.salts[index].clone(),
            label: round.labels[index],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CommitmentHash;
    use crate::utils::random_graph;

    fn setup(seed: u64) -> (Graph, Prover) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (graph, _) = random_graph::generate(12, 0.6, &mut rng).unwrap();
        let prover = Prover::new(ProverId(1), &graph).with_rng(StdRng::seed_from_u64(seed + 1));
        (graph, prover)
    }

    #[test]
    fn respond_without_commitment_is_stale() {
        let (_, prover) = setup(1);
        assert!(matches!(
            prover.respond(0, 1),
            Err(Error::StaleCommitment(ProverId(1)))
        ));
    }

    #[test]
    fn respond_rejects_out_of_range_indices() {
        let (_, mut prover) = setup(2);
        prover.generate_commitment();
        assert!(matches!(
            prover.respond(0, 12),
            Err(Error::IndexOutOfRange { index: 12, size: 12 })
        ));
    }

    #[test]
    fn openings_match_published_digests() {
        let (graph, mut prover) = setup(3);
        let commitment = prover.generate_commitment();
        assert_eq!(commitment.len(), graph.size());
        for edge in graph.edges() {
            let response = prover.respond(edge.a, edge.b).unwrap();
            let hasher = prover.hasher();
            assert_eq!(
                hasher.commit(response.first.label.label(), response.first.salt.as_bytes()),
                commitment.digests[edge.a]
            );
            assert_eq!(
                hasher.commit(response.second.label.label(), response.second.salt.as_bytes()),
                commitment.digests[edge.b]
            );
            assert_ne!(response.first.label, response.second.label);
        }
    }

    #[test]
    fn labels_follow_one_permutation() {
        let (graph, mut prover) = setup(4);
        prover.generate_commitment();
        let n = graph.size();
        for i in 0..n {
            for j in 0..n {
                let opened = prover.respond(i, j).unwrap();
                let same_true = graph.colors()[i] == graph.colors()[j];
                assert_eq!(opened.first.label == opened.second.label, same_true);
            }
        }
    }

    #[test]
    fn new_commitment_replaces_round_state() {
        let (_, mut prover) = setup(5);
        let first = prover.generate_commitment();
        let second = prover.generate_commitment();
        assert_eq!(prover.current_digests(), Some(second.digests.as_slice()));
        assert_ne!(first, second);
    }

    #[test]
    fn hasher_choice_changes_digests() {
        let (graph, _) = setup(6);
        let salts = || -> Vec<Salt> {
            (0..graph.size())
                .map(|n| Salt::from_bytes(vec![n as u8; 128]))
                .collect()
        };
        let mut blake = Prover::new(ProverId(1), &graph);
        let mut sha = Prover::new(ProverId(1), &graph).with_hasher(HashAlgorithm::Sha3);
        let a = blake.commit_with(ColorPermutation::identity(), salts());
        let b = sha.commit_with(ColorPermutation::identity(), salts());
        assert_ne!(a, b);
    }
}
