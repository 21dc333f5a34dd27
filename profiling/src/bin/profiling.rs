use addrner::{prepare, read_dataset, write_jsonl, NotLocatedStrat, PrepConfig, SearchMode};
use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
struct Args {
    /// Labeled CSV dataset
    dataset: PathBuf,
    #[arg(short, long, default_value_t = 1)]
    n_samples: u32,
    #[arg(short, long, default_value_t = SearchMode::Literal, value_parser = parse_search_mode)]
    search_mode: SearchMode,
    #[arg(long, default_value_t = NotLocatedStrat::FailRow, value_parser = parse_not_located)]
    not_located: NotLocatedStrat,
    /// Also write the examples of the last run as JSON lines
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_search_mode(s: &str) -> Result<SearchMode, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_not_located(s: &str) -> Result<NotLocatedStrat, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let config = PrepConfig::builder()
        .search_mode(args.search_mode)
        .not_located(args.not_located)
        .build();
    let records = read_dataset(&args.dataset, &config)?;
    let mut total_duration = Duration::ZERO;
    let mut last = None;
    for _ in 0..args.n_samples {
        let records = records.clone();
        let now = Instant::now();
        let batch = prepare(records, &config)?;
        total_duration += now.elapsed();
        last = Some(batch);
    }
    if let Some(batch) = last {
        println!("{}", batch.report);
        if let Some(output) = args.output {
            write_jsonl(output, &batch.examples)?;
        }
    }
    println!(
        "Total duration: {} with {} samples",
        total_duration.as_secs_f64(),
        args.n_samples
    );
    Ok(())
}
