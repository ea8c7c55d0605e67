use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use zkp_three_coloring::utils::serialization::{
    load_graph_instance, load_transcript, save_graph_instance, save_transcript, GraphInstance,
};
use zkp_three_coloring::{
    generate, replay, rounds_for_error, soundness_error, Graph, HashAlgorithm, ProtocolConfig,
    ProtocolRunner, Prover, ProverId, SessionReport, Transcript, Verifier,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(author, version, about = "Zero-knowledge proof of graph 3-colorability", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random 3-colorable graph and write it to disk
    Generate {
        #[arg(long, default_value_t = 20)]
        size: usize,
        #[arg(long, default_value_t = 0.5)]
        density: f64,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Run repeated commit/challenge/response rounds between honest provers and a verifier
    Run {
        /// TOML file with session settings; flags below override it
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Use a stored graph instead of generating one
        #[arg(short, long, value_name = "FILE")]
        instance: Option<PathBuf>,
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        density: Option<f64>,
        #[arg(long)]
        rounds: Option<u64>,
        #[arg(long)]
        hash: Option<HashAlgorithm>,
        /// Number of independent prover identities, run in parallel
        #[arg(long)]
        provers: Option<u64>,
        /// Write the transcript of a single-prover session
        #[arg(long, value_name = "FILE")]
        transcript: Option<PathBuf>,
        /// Print the graph and its coloring before running
        #[arg(long)]
        show_graph: bool,
        /// Print session reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-verify a stored transcript against a graph instance
    Replay {
        #[arg(short, long, value_name = "FILE")]
        instance: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        transcript: PathBuf,
    },
    /// Soundness error after K rounds, or rounds needed to reach a target error
    Bound {
        #[arg(long)]
        edges: usize,
        #[arg(long, conflicts_with = "target", required_unless_present = "target")]
        rounds: Option<u64>,
        #[arg(long)]
        target: Option<f64>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            size,
            density,
            output,
        } => run_generate(size, density, output)?,
        Commands::Run {
            config,
            instance,
            size,
            density,
            rounds,
            hash,
            provers,
            transcript,
            show_graph,
            json,
        } => {
            let mut settings = match config {
                Some(path) => ProtocolConfig::from_file(path)?,
                None => ProtocolConfig::default(),
            };
            settings.size = size.unwrap_or(settings.size);
            settings.edge_density = density.unwrap_or(settings.edge_density);
            settings.rounds = rounds.unwrap_or(settings.rounds);
            settings.hash = hash.unwrap_or(settings.hash);
            settings.provers = provers.unwrap_or(settings.provers);
            settings.validate()?;
            run_session(&settings, instance, transcript, show_graph, json)?
        }
        Commands::Replay {
            instance,
            transcript,
        } => run_replay(instance, transcript)?,
        Commands::Bound {
            edges,
            rounds,
            target,
        } => run_bound(edges, rounds, target)?,
    }
    Ok(())
}

fn run_generate(size: usize, density: f64, output: PathBuf) -> CliResult<()> {
    println!("Generating 3-colorable graph (n = {size}, p = {density:.2})...");
    let (graph, params) = generate(size, density, &mut StdRng::from_os_rng())?;
    println!(
        "  edges = {}, color classes = {:?}",
        params.edges, params.color_classes
    );
    save_graph_instance(&output, &GraphInstance::with_metadata(graph, params))?;
    println!("Instance saved to {}", output.display());
    Ok(())
}

fn run_session(
    settings: &ProtocolConfig,
    instance: Option<PathBuf>,
    transcript_path: Option<PathBuf>,
    show_graph: bool,
    json: bool,
) -> CliResult<()> {
    let graph = match instance {
        Some(path) => load_graph_instance(path)?.graph,
        None => generate(settings.size, settings.edge_density, &mut StdRng::from_os_rng())?.0,
    };
    if show_graph {
        println!("{graph}");
    }
    if transcript_path.is_some() && settings.provers > 1 {
        return Err("--transcript requires a single prover".into());
    }

    let runner = ProtocolRunner::new(settings.rounds);
    let mut verifier = Verifier::new(graph.clone()).with_hasher(settings.hash);
    let reports = if settings.provers == 1 {
        vec![run_single(&runner, &graph, &mut verifier, settings, transcript_path)?]
    } else {
        let mut provers: Vec<Prover> = (0..settings.provers)
            .map(|id| Prover::new(ProverId(id), &graph).with_hasher(settings.hash))
            .collect();
        runner.run_parallel(&mut provers, &mut verifier)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn run_single(
    runner: &ProtocolRunner,
    graph: &Graph,
    verifier: &mut Verifier,
    settings: &ProtocolConfig,
    transcript_path: Option<PathBuf>,
) -> CliResult<SessionReport> {
    let mut prover = Prover::new(ProverId(0), graph).with_hasher(settings.hash);
    let progress = ProgressBar::new(runner.rounds());
    progress.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} rounds, {msg}")?);

    let mut rounds = Vec::new();
    let keep = transcript_path.is_some();
    let report = runner.run_with(&mut prover, verifier, |index, round| {
        progress.set_position(index + 1);
        if index == 0 {
            progress.set_message(format!(
                "first digest {}",
                hex::encode(&round.commitment.digests[0][..8])
            ));
        }
        if keep {
            rounds.push(round.clone());
        }
    })?;
    progress.finish_and_clear();

    if let Some(path) = transcript_path {
        let transcript = Transcript {
            prover: prover.id(),
            hasher: prover.hasher(),
            rounds,
        };
        save_transcript(&path, &transcript)?;
        println!("Transcript saved to {}", path.display());
    }
    Ok(report)
}

fn run_replay(instance: PathBuf, transcript: PathBuf) -> CliResult<()> {
    let instance = load_graph_instance(&instance)?;
    let transcript = load_transcript(&transcript)?;
    let report = replay(&instance.graph, &transcript)?;
    println!("Transcript replayed successfully");
    print_report(&report);
    Ok(())
}

fn run_bound(edges: usize, rounds: Option<u64>, target: Option<f64>) -> CliResult<()> {
    match (rounds, target) {
        (Some(rounds), _) => println!(
            "soundness error after {rounds} rounds over {edges} edges: {:.3e}",
            soundness_error(edges, rounds)
        ),
        (None, Some(target)) => match rounds_for_error(edges, target) {
            Some(needed) => println!("{needed} rounds reach soundness error {target:.3e}"),
            None => return Err("need at least one edge and a target in (0, 1)".into()),
        },
        (None, None) => return Err("pass --rounds or --target".into()),
    }
    Ok(())
}

fn print_report(report: &SessionReport) {
    println!("Prover {}:", report.prover);
    println!("  rounds          {}", report.rounds);
    println!("  successes       {}", report.successes);
    println!("  failures        {}", report.failures);
    println!("  edges           {}", report.edges);
    println!("  soundness error {:.3e}", report.soundness_error);
    println!(
        "  verdict         {}",
        if report.accepted() { "accepted" } else { "rejected" }
    );
}
