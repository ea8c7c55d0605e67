mod common;

use common::{alternating_path, init_tracing, random_graph};
use rand::rngs::StdRng;
use rand::SeedableRng;
use zkp_three_coloring::utils::serialization::{
    load_graph_instance, load_transcript, save_graph_instance, save_transcript, GraphInstance,
};
use zkp_three_coloring::{
    generate, replay, soundness_error, Color, Error, Graph, HashAlgorithm, ProtocolRunner,
    Prover, ProverId, Verifier,
};

#[test]
fn generated_graphs_respect_their_coloring() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let (graph, params) = generate(25, 0.5, &mut rng).unwrap();
        assert_eq!(params.edges, graph.edge_count());
        for i in 0..graph.size() {
            for j in 0..graph.size() {
                if graph.is_adjacent(i, j) {
                    assert_ne!(graph.colors()[i], graph.colors()[j]);
                }
            }
        }
    }
}

#[test]
fn honest_prover_passes_every_round() {
    init_tracing();
    let graph = random_graph(20, 0.5, 2);
    let mut prover = Prover::new(ProverId(1), &graph).with_rng(StdRng::seed_from_u64(3));
    let mut verifier = Verifier::new(graph).with_rng(StdRng::seed_from_u64(4));

    let report = ProtocolRunner::new(1000)
        .run(&mut prover, &mut verifier)
        .unwrap();

    assert_eq!(report.rounds, 1000);
    assert_eq!(report.successes, 1000);
    assert_eq!(report.failures, 0);
    assert!(report.accepted());
    let tally = verifier.report(ProverId(1)).unwrap();
    assert_eq!((tally.successes, tally.failures), (1000, 0));
}

#[test]
fn honest_prover_passes_with_sha3() {
    let graph = random_graph(15, 0.4, 5);
    let mut prover = Prover::new(ProverId(2), &graph).with_hasher(HashAlgorithm::Sha3);
    let mut verifier = Verifier::new(graph).with_hasher(HashAlgorithm::Sha3);
    let report = ProtocolRunner::new(200)
        .run(&mut prover, &mut verifier)
        .unwrap();
    assert_eq!(report.failures, 0);
}

#[test]
fn mismatched_hash_functions_fail_every_round() {
    init_tracing();
    let graph = random_graph(10, 0.5, 6);
    let mut prover = Prover::new(ProverId(3), &graph).with_hasher(HashAlgorithm::Sha3);
    let mut verifier = Verifier::new(graph);
    let report = ProtocolRunner::new(20)
        .run(&mut prover, &mut verifier)
        .unwrap();
    assert_eq!(report.successes, 0);
    assert_eq!(report.failures, 20);
}

/// Claimed coloring of a 5-node path whose last edge is monochromatic: 1 bad edge of 4.
fn one_bad_edge() -> (Graph, Vec<Color>) {
    let graph = alternating_path(5);
    let mut claim = graph.colors().to_vec();
    claim[4] = claim[3];
    (graph, claim)
}

#[test]
fn cheating_prover_is_caught_at_the_expected_rate() {
    init_tracing();
    let (graph, claim) = one_bad_edge();
    assert_eq!(graph.edge_count(), 4);
    let mut cheat = Prover::from_coloring(ProverId(9), claim).with_rng(StdRng::seed_from_u64(7));
    let mut verifier = Verifier::new(graph).with_rng(StdRng::seed_from_u64(8));

    let rounds = 10_000;
    let report = ProtocolRunner::new(rounds)
        .run(&mut cheat, &mut verifier)
        .unwrap();

    let detection = report.failures as f64 / rounds as f64;
    let expected = 0.25;
    assert!(
        (detection - expected).abs() / expected < 0.05,
        "per-round detection rate {detection} more than 5% away from 1/|E|"
    );
}

#[test]
fn undetected_sessions_match_soundness_bound() {
    let (graph, claim) = one_bad_edge();
    let mut cheat = Prover::from_coloring(ProverId(9), claim).with_rng(StdRng::seed_from_u64(11));
    let mut verifier = Verifier::new(graph).with_rng(StdRng::seed_from_u64(12));
    let runner = ProtocolRunner::new(5);

    let sessions = 4_000;
    let mut undetected = 0u32;
    for _ in 0..sessions {
        let report = runner.run(&mut cheat, &mut verifier).unwrap();
        if report.failures == 0 {
            undetected += 1;
        }
    }

    let observed = undetected as f64 / sessions as f64;
    let expected = soundness_error(4, 5);
    assert!((expected - 0.2373).abs() < 1e-3);
    assert!(
        (observed - expected).abs() / expected < 0.05,
        "observed {observed}, theoretical {expected}"
    );
}

#[test]
fn consecutive_commitments_share_no_digest() {
    let graph = random_graph(30, 0.5, 13);
    let mut prover = Prover::new(ProverId(1), &graph);
    let first = prover.generate_commitment();
    let second = prover.generate_commitment();
    for (a, b) in first.digests.iter().zip(&second.digests) {
        assert_ne!(a, b);
    }
}

#[test]
fn single_node_graph_cannot_be_challenged() {
    let mut rng = StdRng::seed_from_u64(14);
    let (graph, _) = generate(1, 1.0, &mut rng).unwrap();
    let mut verifier = Verifier::new(graph.clone());
    assert!(matches!(verifier.choose_challenge(), Err(Error::EmptyEdgeSet)));

    let mut prover = Prover::new(ProverId(1), &graph);
    assert!(matches!(
        ProtocolRunner::new(3).run(&mut prover, &mut verifier),
        Err(Error::EmptyEdgeSet)
    ));
}

#[test]
fn prover_for_other_graph_size_is_refused() {
    let small = alternating_path(3);
    let large = alternating_path(6);
    let mut prover = Prover::new(ProverId(5), &small);
    let mut verifier = Verifier::new(large);
    assert!(matches!(
        ProtocolRunner::new(1).run(&mut prover, &mut verifier),
        Err(Error::CommitmentSizeMismatch {
            expected: 6,
            actual: 3
        })
    ));
}

#[test]
fn parallel_provers_keep_separate_tallies() {
    init_tracing();
    let graph = random_graph(16, 0.5, 15);
    let mut provers: Vec<Prover> = (0..4)
        .map(|id| Prover::new(ProverId(id), &graph))
        .collect();
    let mut verifier = Verifier::new(graph);

    let reports = ProtocolRunner::new(100)
        .run_parallel(&mut provers, &mut verifier)
        .unwrap();

    assert_eq!(reports.len(), 4);
    assert!(reports.iter().all(|report| report.accepted()));
    let tallies = verifier.reports();
    assert_eq!(tallies.len(), 4);
    for (id, tally) in tallies {
        assert_eq!(tally.successes, 100, "prover {id}");
        assert_eq!(tally.failures, 0);
        assert!(!verifier.session(id).unwrap().has_pending());
    }
}

#[test]
fn instance_and_transcript_survive_disk_round_trip() {
    let dir = std::env::temp_dir().join(format!("zkp3c-flow-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let instance_path = dir.join("graph.bin");
    let transcript_path = dir.join("transcript.bin");

    let mut rng = StdRng::seed_from_u64(16);
    let (graph, params) = generate(12, 0.6, &mut rng).unwrap();
    save_graph_instance(&instance_path, &GraphInstance::with_metadata(graph, params.clone()))
        .unwrap();
    let loaded = load_graph_instance(&instance_path).unwrap();
    assert_eq!(loaded.metadata, Some(params));

    let mut prover = Prover::new(ProverId(8), &loaded.graph);
    let mut verifier = Verifier::new(loaded.graph.clone());
    let (report, transcript) = ProtocolRunner::new(30)
        .run_recorded(&mut prover, &mut verifier)
        .unwrap();
    save_transcript(&transcript_path, &transcript).unwrap();

    let restored = load_transcript(&transcript_path).unwrap();
    assert_eq!(restored, transcript);
    assert_eq!(replay(&loaded.graph, &restored).unwrap(), report);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn transcript_replay_fails_on_other_graph() {
    let graph = alternating_path(6);
    let mut prover = Prover::new(ProverId(1), &graph);
    let mut verifier = Verifier::new(graph);
    let (_, transcript) = ProtocolRunner::new(10)
        .run_recorded(&mut prover, &mut verifier)
        .unwrap();

    // Same size, no edges in common with the path.
    let other = Graph::from_edges(
        vec![Color::Red, Color::Green, Color::Blue, Color::Red, Color::Green, Color::Blue],
        &[(0, 2), (3, 5)],
    )
    .unwrap();
    assert!(matches!(
        replay(&other, &transcript),
        Err(Error::TranscriptMismatch(0))
    ));
}
