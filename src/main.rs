use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use apriori_miner::benchmark::{self, format_duration, BenchmarkGrid};
use apriori_miner::config::{ConfigOverrides, MinerConfig};
use apriori_miner::{generate_rules, loader, mine_frequent_itemsets, report};

#[derive(Debug, Parser)]
#[command(
    name = "apriori",
    version,
    about = "Mine frequent itemsets and association rules from basket data"
)]
struct Cli {
    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Mine a `basket,item` CSV and write itemsets and rules.
    Mine(MineArgs),
    /// Sweep a grid of parameters over one dataset and record timings.
    Bench {
        /// `basket,item` CSV to mine.
        input: PathBuf,
        /// Where to write the results CSV.
        #[arg(default_value = "benchmark_results.csv")]
        output: PathBuf,
    },
    /// Summarize a results CSV written by `bench`.
    Visualize {
        results: PathBuf,
    },
}

#[derive(Debug, Args)]
struct MineArgs {
    /// `basket,item` CSV to mine.
    input: PathBuf,
    /// Minimum support in (0, 1] (default 0.01).
    min_support: Option<f64>,
    /// Minimum confidence in [0, 1] (default 0.2).
    min_confidence: Option<f64>,
    /// Maximum itemset length (default 5).
    max_len: Option<usize>,
    /// TOML file with run parameters; positional values override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    itemsets_out: Option<PathBuf>,
    #[arg(long)]
    rules_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Command::Mine(args) => mine(args),
        Command::Bench { input, output } => bench(input, output),
        Command::Visualize { results } => visualize(results),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn mine(args: MineArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        min_support: args.min_support,
        min_confidence: args.min_confidence,
        max_len: args.max_len,
        itemsets_output: args.itemsets_out,
        rules_output: args.rules_out,
    };
    let config =
        MinerConfig::load(args.config.as_deref(), &overrides).context("invalid configuration")?;
    if !args.input.exists() {
        bail!("input file {} does not exist", args.input.display());
    }

    println!("Input file: {}", args.input.display());
    println!(
        "Parameters: minSupport={:.4}, minConfidence={:.4}, maxLen={}",
        config.min_support, config.min_confidence, config.max_len
    );

    let started = Instant::now();
    let dataset = loader::load_csv(&args.input).context("error loading dataset")?;
    println!("Dataset loaded in {}", format_duration(started.elapsed()));
    println!(
        "Found {} transactions and {} unique items",
        dataset.len(),
        dataset.universe().len()
    );

    let mining_started = Instant::now();
    let itemsets = mine_frequent_itemsets(&dataset, config.min_support, config.max_len);
    println!(
        "Found {} frequent itemsets in {}",
        itemsets.len(),
        format_duration(mining_started.elapsed())
    );
    let mut lengths: BTreeMap<usize, usize> = BTreeMap::new();
    for frequent in &itemsets {
        *lengths.entry(frequent.length()).or_default() += 1;
    }
    for (length, count) in &lengths {
        println!("  Length {length}: {count} itemsets");
    }

    let rules_started = Instant::now();
    let rules = generate_rules(&itemsets, config.min_confidence).context("rule generation failed")?;
    println!(
        "Generated {} association rules in {}",
        rules.len(),
        format_duration(rules_started.elapsed())
    );

    report::save_itemsets(&config.itemsets_output, &dataset, &itemsets)
        .context("error saving itemsets")?;
    report::save_rules(&config.rules_output, &dataset, &rules)
        .context("error saving rules")?;
    println!("Frequent itemsets saved to {}", config.itemsets_output.display());
    println!("Association rules saved to {}", config.rules_output.display());
    println!("Total execution time: {}", format_duration(started.elapsed()));
    Ok(())
}

fn bench(input: PathBuf, output: PathBuf) -> Result<()> {
    if !input.exists() {
        bail!("input file {} does not exist", input.display());
    }
    let dataset = loader::load_csv(&input).context("error loading dataset")?;
    println!(
        "Dataset loaded with {} transactions and {} unique items\n",
        dataset.len(),
        dataset.universe().len()
    );

    println!(
        "{:<10} {:<10} {:<10} {:<15} {:<15} {:<15} {:<10} {:<10}",
        "Support",
        "Confidence",
        "MaxLen",
        "Itemset Time",
        "Rule Time",
        "Total Time",
        "Itemsets",
        "Rules"
    );
    println!("{}", "-".repeat(100));

    let results = benchmark::run_grid(&dataset, &BenchmarkGrid::default(), |r| {
        println!(
            "{:<10.4} {:<10.4} {:<10} {:<15} {:<15} {:<15} {:<10} {:<10}",
            r.min_support,
            r.min_confidence,
            r.max_length,
            format_duration(r.itemset_time),
            format_duration(r.rule_time),
            format_duration(r.total_time),
            r.itemset_count,
            r.rule_count
        );
    })
    .context("benchmark run failed")?;

    benchmark::save_results(&output, &results).context("error saving results")?;
    println!("\nBenchmark completed. Results saved to {}", output.display());
    Ok(())
}

fn visualize(path: PathBuf) -> Result<()> {
    let results = benchmark::load_results(&path)
        .with_context(|| format!("error loading {}", path.display()))?;
    benchmark::render_summary(&mut io::stdout().lock(), &results)?;
    Ok(())
}
