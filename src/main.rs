use clap::Parser;
use safeground::location::{
    load_gazetteer, load_labels, BatchEvaluator, BatchOutcome, LocationError,
    DEFAULT_GAZETTEER_PATH, DEFAULT_LABELS_PATH, DEFAULT_THRESHOLD,
};
use safeground::report::{render_report, ParsingReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SafeGround: evaluation title parse test
///
/// Extracts city / district / neighborhood from evaluation titles, grades
/// each extraction against the reference neighborhood list, and decides
/// whether the overall parse rate justifies a full collection run.
///
/// Examples:
///   safeground
///   safeground data/sample/eval_names_sample.json --threshold 80
///   safeground --label "강남구 역삼동 위험도평가" --label "향후계획서 설치공사"
///   safeground --output data/sample/parsing_test_results.json
///   safeground --serve --port 3000
#[derive(Parser)]
#[command(name = "safeground", version, about, long_about = None)]
struct Cli {
    /// JSON array of titles (positional).
    #[arg(index = 1)]
    labels_positional: Option<PathBuf>,

    /// JSON array of titles (named).
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Inline title; repeatable. Takes precedence over label files.
    #[arg(long = "label")]
    inline: Vec<String>,

    /// Reference CSV (city,district,neighborhood,...). Missing file = empty gazetteer.
    #[arg(long, default_value = DEFAULT_GAZETTEER_PATH)]
    gazetteer: PathBuf,

    /// Minimum overall parse rate (percent) for a GO decision.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    threshold: f64,

    /// Write the full results as JSON to this path.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Run the HTTP API instead of a one-shot evaluation.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("Invalid threshold '{}': expected a number", s))?;
    BatchEvaluator::new(value)
        .map(|e| e.threshold())
        .map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("safeground=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let evaluator = BatchEvaluator::new(cli.threshold)?;
    let (gazetteer, _rejected) = load_gazetteer(&cli.gazetteer);

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(safeground::server::start(&cli.host, cli.port, gazetteer, evaluator))?;
        return Ok(());
    }

    let labels = collect_labels(cli)?;
    eprintln!("  \u{2713} {} titles loaded", labels.len());

    let outcome = evaluator.evaluate(labels, &gazetteer);
    print_results(&outcome);
    eprint!("{}", render_report(&outcome));

    let report = ParsingReport::new(&outcome);
    if let Some(ref path) = cli.output {
        report.write_json(path)?;
        eprintln!("  \u{2713} Results saved: {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn collect_labels(cli: &Cli) -> Result<Vec<String>, LocationError> {
    // Priority: --label > --labels > positional > default sample file
    if !cli.inline.is_empty() {
        return Ok(cli.inline.clone());
    }
    let path = cli
        .labels
        .clone()
        .or_else(|| cli.labels_positional.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LABELS_PATH));
    load_labels(&path)
}

fn print_results(outcome: &BatchOutcome) {
    for (idx, (label, result)) in outcome.labels.iter().zip(&outcome.results).enumerate() {
        eprintln!("  [{}] {}", idx + 1, label);
        eprintln!("      \u{2192} {}", result.display_line());
    }
    eprintln!();
}
