use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use meteor::corpus::TripleReader;
use meteor::driver::{evaluate_corpus, DEFAULT_BATCH_SIZE};
use meteor::{LexicalResources, Meteor, MeteorConfig, MeteorError, SearchBudget, SynonymTable};

#[derive(Debug, Parser)]
#[command(name = "evaluate")]
#[command(about = "Evaluate translation hypotheses")]
struct Args {
    /// Input file, one `hyp1 ||| hyp2 ||| ref` triple per line
    #[arg(short, long, default_value = "data/hyp1-hyp2-ref")]
    input: PathBuf,
    /// Number of hypothesis pairs to evaluate
    #[arg(short, long)]
    num_sentences: Option<usize>,
    #[arg(short, long, default_value_t = MeteorConfig::DEFAULT_ALPHA)]
    alpha: f64,
    #[arg(short, long, default_value_t = MeteorConfig::DEFAULT_BETA)]
    beta: f64,
    #[arg(short, long, default_value_t = MeteorConfig::DEFAULT_GAMMA)]
    gamma: f64,
    /// Synonym groups, one whitespace-separated group per line
    #[arg(long)]
    synonyms: Option<PathBuf>,
    /// Also apply stem and synonym matching to non-ASCII words
    #[arg(long, default_value_t = false)]
    no_ascii_only: bool,
    /// Alignment search nodes allowed per sentence pair (0 = unbounded)
    #[arg(long, default_value_t = MeteorConfig::DEFAULT_MAX_SEARCH_NODES)]
    max_search_nodes: usize,
    /// Wall-clock budget per sentence pair, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

impl Args {
    fn config(&self) -> MeteorConfig {
        let search_budget = match self.max_search_nodes {
            0 => SearchBudget::unbounded(),
            n => SearchBudget::limited(n),
        };
        MeteorConfig {
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            ascii_only: !self.no_ascii_only,
            search_budget,
            pair_timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), MeteorError> {
    let args = Args::parse();

    let synonyms = match &args.synonyms {
        Some(path) => SynonymTable::load(path)?,
        None => SynonymTable::new(),
    };
    let resources = Arc::new(LexicalResources::with_synonyms(synonyms));
    let meteor = Arc::new(Meteor::with_resources(args.config(), resources)?);

    let reader = TripleReader::open(&args.input)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = evaluate_corpus(
        meteor,
        reader,
        args.num_sentences,
        args.batch_size,
        &mut out,
    )?;

    if summary.failed > 0 {
        log::warn!(
            "{} hypothesis scores failed and were ranked as 0",
            summary.failed
        );
    }
    Ok(())
}
