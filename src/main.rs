use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use earcall::config::Config;
use earcall::corpus::file::{read_url_list, TranscriptFile};
use earcall::corpus::labels::load_labels;
use earcall::corpus::traits::CorpusSource;
use earcall::evaluation::svm::SvmClassifier;
use earcall::features::tokenizer::TreebankTokenizer;
use earcall::features::vectorizer::CaseMode;
use earcall::features::vocabulary::CountPolicy;
use earcall::pipeline::evaluate;
use earcall::scrape::client::{ScrapedCorpus, TranscriptClient};

/// earcall: predict earnings outcomes from call transcripts.
///
/// Builds word and word-pair count features from earnings-call transcripts
/// and cross-validates a classifier against known outcomes.
#[derive(Parser)]
#[command(name = "earcall", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Feature selection flags shared by several commands.
#[derive(clap::Args)]
struct FeatureArgs {
    /// Number of unigram features (default: EARCALL_UNIGRAMS or 1000)
    #[arg(long)]
    unigrams: Option<usize>,

    /// Number of bigram features (default: EARCALL_BIGRAMS or 500)
    #[arg(long)]
    bigrams: Option<usize>,

    /// How counts accumulate: "corpus" (every occurrence) or "document"
    #[arg(long)]
    count_policy: Option<CountPolicy>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape transcripts for every URL in the URL list
    Scrape {
        /// Where to write the transcripts (default: the transcript file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of pages to fetch in parallel
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Build the vocabulary and show the selected features
    Features {
        #[command(flatten)]
        features: FeatureArgs,

        /// How many of each feature kind to display
        #[arg(long, default_value = "25")]
        top: usize,
    },

    /// Write one JSON feature vector per document
    Vectorize {
        #[command(flatten)]
        features: FeatureArgs,

        /// Lower-case tokens when vectorizing as well as when counting
        #[arg(long)]
        fold_case: bool,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Cross-validate the classifier over the vectorized corpus
    Evaluate {
        #[command(flatten)]
        features: FeatureArgs,

        /// Lower-case tokens when vectorizing as well as when counting
        #[arg(long)]
        fold_case: bool,

        /// Scrape the URL list instead of reading the transcript file
        #[arg(long)]
        live: bool,

        /// Number of cross-validation folds
        #[arg(long)]
        folds: Option<usize>,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("earcall=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Scrape {
            output,
            concurrency,
        } => {
            config.require_urls()?;
            if let Some(c) = concurrency {
                config.concurrency = c;
            }
            let output = output.unwrap_or_else(|| config.transcripts_path.clone());

            let urls = read_url_list(&config.urls_path).await?;
            println!(
                "Scraping {} transcript pages ({} concurrent)...",
                urls.len(),
                config.concurrency
            );

            let client = TranscriptClient::new(&config.user_agent)?;
            let transcripts = client.fetch_all(&urls, config.concurrency).await?;

            for (url, text) in urls.iter().zip(&transcripts) {
                println!(
                    "  {} {}",
                    format!("{:>7} chars", text.chars().count()).dimmed(),
                    url
                );
            }

            TranscriptFile::write(&output, &transcripts, &config.separator).await?;
            println!(
                "\n{}",
                format!("Saved {} transcripts to {}", transcripts.len(), output.display()).bold()
            );
        }

        Commands::Features { features, top } => {
            apply_feature_args(&mut config, &features);
            config.require_transcripts()?;

            let source = TranscriptFile::new(&config.transcripts_path, &config.separator);
            let corpus = evaluate::load_corpus(&source).await?;
            let tokenizer = TreebankTokenizer::new()?;
            let stage = evaluate::build_features(&corpus, &tokenizer, &config.pipeline_settings())?;

            earcall::output::terminal::display_features(&stage.vocabulary, &stage.features, top);
        }

        Commands::Vectorize {
            features,
            fold_case,
            output,
        } => {
            apply_feature_args(&mut config, &features);
            if fold_case {
                config.case_mode = CaseMode::Fold;
            }
            config.require_transcripts()?;

            let source = TranscriptFile::new(&config.transcripts_path, &config.separator);
            let corpus = evaluate::load_corpus(&source).await?;
            let tokenizer = TreebankTokenizer::new()?;
            let settings = config.pipeline_settings();
            let stage = evaluate::build_features(&corpus, &tokenizer, &settings)?;
            let vectors =
                evaluate::vectorize_corpus(&corpus, &tokenizer, &stage.features, settings.case_mode);

            let mut lines = String::new();
            for vector in &vectors {
                lines.push_str(&serde_json::to_string(vector)?);
                lines.push('\n');
            }

            match output {
                Some(path) => {
                    tokio::fs::write(&path, lines)
                        .await
                        .with_context(|| format!("Failed to write vectors to {}", path.display()))?;
                    info!(path = %path.display(), documents = vectors.len(), "Wrote vectors");
                    println!(
                        "Wrote {} vectors of width {} to {}",
                        vectors.len(),
                        stage.features.len(),
                        path.display()
                    );
                }
                None => {
                    std::io::stdout()
                        .write_all(lines.as_bytes())
                        .context("Failed to write vectors to stdout")?;
                }
            }
        }

        Commands::Evaluate {
            features,
            fold_case,
            live,
            folds,
            json,
        } => {
            apply_feature_args(&mut config, &features);
            if fold_case {
                config.case_mode = CaseMode::Fold;
            }
            if let Some(folds) = folds {
                config.folds = folds;
            }
            config.require_labels()?;

            let source: Box<dyn CorpusSource> = if live {
                config.require_urls()?;
                let urls = read_url_list(&config.urls_path).await?;
                let client = TranscriptClient::new(&config.user_agent)?;
                Box::new(ScrapedCorpus::new(client, urls, config.concurrency))
            } else {
                config.require_transcripts()?;
                Box::new(TranscriptFile::new(
                    &config.transcripts_path,
                    &config.separator,
                ))
            };

            let labels = load_labels(
                &config.labels_path,
                config.label_column,
                config.labels_have_header,
            )
            .await?;

            let tokenizer = TreebankTokenizer::new()?;
            let classifier = SvmClassifier {
                c: config.svm_c,
                gamma: config.svm_gamma,
                ..Default::default()
            };

            if !json {
                println!("Evaluating transcripts from {}...", source.describe());
            }

            let report = evaluate::run(
                source.as_ref(),
                &labels,
                &tokenizer,
                &classifier,
                &config.pipeline_settings(),
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                earcall::output::terminal::display_report(&report);
            }
        }
    }

    Ok(())
}

/// Apply command-line feature flags on top of the loaded configuration.
fn apply_feature_args(config: &mut Config, args: &FeatureArgs) {
    if let Some(n) = args.unigrams {
        config.unigrams = n;
    }
    if let Some(m) = args.bigrams {
        config.bigrams = m;
    }
    if let Some(policy) = args.count_policy {
        config.count_policy = policy;
    }
}
