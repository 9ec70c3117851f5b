use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use serde::Serialize;
use sortrace::action::{ExternalAction, SortAction};
use sortrace::bench::{BenchConfig, run_word_benchmark};
use sortrace::delimited::read_table;
use sortrace::merge::{self, MergeAlgorithm};
use sortrace::replay::{ArrayReplay, OrderReplay, Playback};
use sortrace::sorting::{self, SortAlgorithm, parse_values, random_values};
use sortrace::words::{WordSortAlgorithm, count_frequencies, extract_words, sort_words};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "sortrace")]
#[command(about = "Replays sorting, external merge and word sorting algorithms step by step")]
struct Args {
    #[arg(short, long, global = true, help = "Verbose logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trace an in-memory sort of integers
    Sort {
        #[arg(short, long, default_value = "bubble", help = "bubble, insertion, heap or quick")]
        algorithm: String,

        #[arg(allow_negative_numbers = true, help = "Integers separated by spaces, commas or semicolons; random when omitted")]
        values: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Trace an external merge of delimited rows
    Merge {
        #[arg(short, long, help = "Delimited text file; the first row holds headers")]
        input: PathBuf,

        #[arg(short, long, default_value = "straight", help = "straight, natural or multiway")]
        algorithm: String,

        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true, help = "Key column (0-based)")]
        key_column: isize,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Sort the words of a text file and count their frequencies
    Words {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "radix", help = "quick or radix")]
        algorithm: String,

        #[arg(long, help = "Print only the first N entries")]
        top: Option<usize>,

        #[arg(long)]
        json: bool,
    },
    /// Time quick and radix word sorting over growing samples
    Bench {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, value_delimiter = ',', help = "Comma-separated sample sizes")]
        sizes: Option<Vec<usize>>,

        #[arg(long, default_value_t = 1)]
        warmup: usize,

        #[arg(long, default_value_t = 3)]
        repetitions: usize,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    #[arg(long, help = "Print the trace as JSON instead of replaying it")]
    json: bool,

    #[arg(long, default_value_t = 0, help = "Pause between replayed actions, in milliseconds")]
    delay_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    match args.command {
        Command::Sort { algorithm, values, output } => run_sort(&algorithm, &values.join(" "), &output),
        Command::Merge { input, algorithm, key_column, output } => {
            run_merge(&input, &algorithm, key_column, &output)
        }
        Command::Words { input, algorithm, top, json } => run_words(&input, &algorithm, top, json),
        Command::Bench { input, sizes, warmup, repetitions } => {
            let mut config = BenchConfig { warmup_runs: warmup, repetitions, ..BenchConfig::default() };
            if let Some(sizes) = sizes {
                config.sample_sizes = sizes;
            }
            run_bench(&input, &config)
        }
    }
}

fn run_sort(algorithm: &str, values: &str, output: &OutputArgs) -> Result<()> {
    let algorithm: SortAlgorithm = algorithm.parse()?;
    let mut values = parse_values(values)?;
    if values.is_empty() {
        values = random_values(&mut rand::rng());
        info!("no values given, generated {:?}", values);
    }
    let actions = sorting::build_actions(&values, algorithm);
    info!("{algorithm} sort: {} values, {} actions", values.len(), actions.len());

    if output.json {
        return print_json(&actions);
    }

    let mut state = ArrayReplay::new(&values);
    replay(actions, output.delay_ms, |step, action: SortAction| {
        state.apply(&action);
        println!("{step:>5} {:<13} {:<50} {:?}", format!("{:?}", action.kind), action.message, state.values());
    });
    Ok(())
}

fn run_merge(input: &Path, algorithm: &str, key_column: isize, output: &OutputArgs) -> Result<()> {
    let algorithm: MergeAlgorithm = algorithm.parse()?;
    let Some(table) = read_table(input).with_context(|| format!("reading {}", input.display()))? else {
        bail!("{} has no data rows", input.display());
    };

    let label = table.column_label(key_column.max(0).unsigned_abs());
    let actions = merge::build_actions(&table.records, algorithm, key_column, &label);
    info!("{algorithm} merge on '{label}': {} rows, {} actions", table.records.len(), actions.len());

    if output.json {
        return print_json(&actions);
    }

    let mut state = OrderReplay::new(&table.records);
    replay(actions, output.delay_ms, |step, action: ExternalAction| {
        state.apply(&action);
        println!("{step:>5} {:<13} {}", format!("{:?}", action.kind), action.message);
    });

    println!("{}", table.headers.join(" | "));
    for &id in state.order() {
        println!("{}", table.records[id].cells().join(" | "));
    }
    Ok(())
}

fn run_words(input: &Path, algorithm: &str, top: Option<usize>, json: bool) -> Result<()> {
    let algorithm: WordSortAlgorithm = algorithm.parse()?;
    let text = std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;

    let words = extract_words(&text);
    let start = Instant::now();
    let sorted = sort_words(&words, algorithm);
    let elapsed = start.elapsed();
    let mut frequencies = count_frequencies(&sorted);
    info!(
        "{} words, {} distinct, sorted with {} in {:.0} ms",
        sorted.len(),
        frequencies.len(),
        algorithm.label(),
        elapsed.as_secs_f64() * 1000.0
    );

    if let Some(top) = top {
        frequencies.truncate(top);
    }

    if json {
        return print_json(&frequencies);
    }
    for entry in &frequencies {
        println!("{:<30} {}", entry.word, entry.count);
    }
    Ok(())
}

fn run_bench(input: &Path, config: &BenchConfig) -> Result<()> {
    let text = std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let words = extract_words(&text);
    let report = run_word_benchmark(&words, config)?;
    info!("benchmark finished in {:.2}s", report.total_seconds);
    print_json(&report)
}

/// Hands actions out one at a time, pausing `delay_ms` between them.
fn replay<A>(actions: Vec<A>, delay_ms: u64, mut apply: impl FnMut(usize, A)) {
    let mut playback = Playback::new(actions);
    while let Some(action) = playback.next_action() {
        apply(playback.position(), action);
        if delay_ms > 0 && !playback.is_finished() {
            thread::sleep(Duration::from_millis(delay_ms));
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
