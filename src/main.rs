//! Command-line front end.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use u_qubo::config::AppConfig;
use u_qubo::problems::lunch::{LunchProblem, MenuTable};
use u_qubo::problems::tsp::TspProblem;
use u_qubo::sampler::SimulatedAnnealingSampler;
use u_qubo::sort::{bubble_sort, selection_sort};
use u_qubo::tts::TtsReport;
use u_qubo::{logging, Result};

#[derive(Parser, Debug)]
#[command(name = "u-qubo", version)]
#[command(about = "QUBO formulations solved by simulated annealing")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time-to-solution study of the idle-time budget
    IdleTime {
        /// Write the TTS series as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the TTS series as a Markdown report
        #[arg(long)]
        markdown: Option<PathBuf>,
    },

    /// Select one option per category for every dish
    Lunch {
        /// Menu CSV (overrides `lunch.input`)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Solve the 5-city TSP with the configured weights
    Tsp,

    /// Grid search over TSP constraint weights and sweep counts
    TspSearch,

    /// Sort integers with bubble and selection sort
    Sort {
        /// Values to sort
        #[arg(default_values_t = [6, 15, 4, 2, 8, 5, 11, 9, 7, 13])]
        values: Vec<i64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::IdleTime { csv, markdown } => idle_time(&config, csv, markdown),
        Command::Lunch { input } => lunch(&config, input),
        Command::Tsp => tsp(&config),
        Command::TspSearch => tsp_search(&config),
        Command::Sort { values } => {
            sort(values);
            Ok(())
        }
    }
}

fn idle_time(config: &AppConfig, csv: Option<PathBuf>, markdown: Option<PathBuf>) -> Result<()> {
    let points = config.idle_time.run_tts_study(&config.sampler)?;
    print!("{}", TtsReport::to_summary(&points));
    println!();
    print!("{}", TtsReport::to_table(&points));

    if let Some(path) = csv {
        TtsReport::csv_to_file(&points, &path)?;
        println!("wrote {}", path.display());
    }
    if let Some(path) = markdown {
        TtsReport::markdown_to_file("Idle-time TTS", &points, &path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn lunch(config: &AppConfig, input: Option<PathBuf>) -> Result<()> {
    let path = input.unwrap_or_else(|| PathBuf::from(&config.lunch.input));
    let table = MenuTable::from_csv_path(&path)?;
    println!("dishes: {}, options: {}", table.num_rows(), table.num_columns());

    let problem = LunchProblem::new(table, config.lunch.clone())?;
    let set = problem.solve(&SimulatedAnnealingSampler::new(config.sampler.clone()))?;
    for (k, view) in set.data().enumerate() {
        let selection = problem.selection(&view)?;
        let status = if selection.is_valid() { "valid" } else { "invalid" };
        println!();
        println!("record {k}: energy {:.3} ({status})", view.energy());
        print!("{selection}");
    }
    Ok(())
}

fn tsp(config: &AppConfig) -> Result<()> {
    let problem = TspProblem::new(config.tsp.clone())?;
    let (set, outcome) = problem.solve(&config.sampler)?;
    for (view, length) in set.data().zip(&outcome.lengths) {
        match (length, problem.decode_tour(&view)) {
            (Some(len), Some(tour)) => {
                println!("Length: {len} ({})", problem.tour_names(&tour).join(" -> "));
            }
            _ => println!("Length: invalid tour"),
        }
    }
    println!("Success count: {} / {}", outcome.success_count, set.len());
    Ok(())
}

fn tsp_search(config: &AppConfig) -> Result<()> {
    let problem = TspProblem::new(config.tsp.clone())?;
    let outcome = config.tsp_search.run(&problem, &config.sampler)?;
    println!(
        "{:>13} {:>13} {:>10} {:>8} {:>6}",
        "weight_const1", "weight_const2", "num_sweeps", "success", "valid"
    );
    for t in &outcome.trials {
        println!(
            "{:>13} {:>13} {:>10} {:>8} {:>6}",
            t.weight_const1, t.weight_const2, t.num_sweeps, t.success_count, t.valid_count
        );
    }
    if let Some(best) = outcome.best_trial() {
        println!(
            "best: weight_const1={} weight_const2={} num_sweeps={} ({} / {})",
            best.weight_const1,
            best.weight_const2,
            best.num_sweeps,
            best.success_count,
            config.tsp_search.num_reads
        );
    }
    Ok(())
}

fn sort(values: Vec<i64>) {
    let mut bubbled = values.clone();
    bubble_sort(&mut bubbled);
    println!("bubble:    {bubbled:?}");

    let mut selected = values;
    selection_sort(&mut selected);
    println!("selection: {selected:?}");
}
