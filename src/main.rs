use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use songtopics::analyzer::RegexAnalyzer;
use songtopics::corpus;
use songtopics::persistence;
use songtopics::priors::{MissingSeedPolicy, TopicPriors};
use songtopics::report::LabelReport;
use songtopics::{PlsaConfig, PriorPlsa};

/// Label songs with the topics their lyrics discuss.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Lyrics database (7 lines per song)
    songs: PathBuf,
    #[clap(short, long, help = "JSON file of topics and seed words. Defaults to the built-in song topics.")]
    topics: Option<PathBuf>,
    #[clap(long, default_value_t = 100, help = "Maximum EM iterations (0 = initialize only)")]
    max_iterations: usize,
    #[clap(long, default_value_t = 0.001, help = "Stop when log-likelihood improves by less than this")]
    epsilon: f64,
    #[clap(long, default_value_t = 5 * 60 * 60, help = "Wall-clock budget for EM, in seconds")]
    time_cutoff_secs: u64,
    #[clap(long, help = "Random seed for reproducible initialization")]
    seed: Option<u64>,
    #[clap(long, help = "Drop seed words that never occur in the lyrics instead of failing")]
    skip_missing_seeds: bool,
    #[clap(long, help = "Keep filler words like 'the' and 'yeah' in the vocabulary")]
    keep_stop_words: bool,
    #[clap(long, default_value = "topic_models.txt")]
    model_out: PathBuf,
    #[clap(long, help = "Write per-song labels as JSON to this file")]
    labels_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("songtopics=info")),
        )
        .init();

    let args = Args::parse();
    println!("Songs: {}", args.songs.display());

    let priors = match &args.topics {
        Some(path) => TopicPriors::from_json_file(path)
            .with_context(|| format!("loading topics from {}", path.display()))?,
        None => TopicPriors::songs(),
    };

    let mut config = PlsaConfig::default()
        .max_iterations(args.max_iterations)
        .epsilon(args.epsilon)
        .time_cutoff(Duration::from_secs(args.time_cutoff_secs))
        .missing_seeds(if args.skip_missing_seeds {
            MissingSeedPolicy::Skip
        } else {
            MissingSeedPolicy::Reject
        });
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }

    let songs = corpus::load_songs(&args.songs)
        .with_context(|| format!("reading songs from {}", args.songs.display()))?;
    let analyzer = if args.keep_stop_words {
        RegexAnalyzer::plain()
    } else {
        RegexAnalyzer::with_stop_words()
    };

    let plsa = PriorPlsa::new(config, priors);
    let (model, fit) = plsa
        .fit(&corpus::lyrics(&songs), &analyzer)
        .context("topic modeling failed")?;

    println!("📊 Modeling results:");
    println!("   Songs: {}, vocabulary: {}", model.num_documents(), model.vocab_size());
    println!("   Iterations: {} ({:?})", fit.iterations, fit.stop_reason);
    if let Some(likelihood) = fit.log_likelihood {
        println!("   Log-likelihood: {:.3}", likelihood);
    }
    for (topic, name) in model.topic_names().iter().enumerate() {
        let top: Vec<&str> = model.ranked_words(topic).iter().take(8).map(|(word, _)| *word).collect();
        println!("   {:<10} {}", name, top.join(", "));
    }

    persistence::save_model(&model, &args.model_out)
        .with_context(|| format!("writing model to {}", args.model_out.display()))?;

    let report = LabelReport::new(&songs, &model, &fit);
    match &args.labels_out {
        Some(path) => {
            report
                .write_json(path)
                .with_context(|| format!("writing labels to {}", path.display()))?;
            info!(path = %path.display(), "Wrote song labels");
        }
        None => {
            for song in &report.songs {
                println!("{} - {}: {}", song.artist, song.title, song.topics);
            }
        }
    }

    Ok(())
}
