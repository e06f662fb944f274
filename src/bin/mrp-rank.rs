//! Ranks the rows of a candidate CSV against a constraints file.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use u_mrprank::constraints;
use u_mrprank::ranking::{RankingConfig, RankingPipeline, Valuation, DEFAULT_HIERARCHY};
use u_mrprank::solver::ValueIterationConfig;
use u_mrprank::table::Table;

#[derive(Debug, Parser)]
#[command(version, about, rename_all = "kebab")]
struct Args {
    /// JSON file with `constraints_map` and `reward_values`.
    #[arg(long, value_name = "FILE")]
    constraints_json: PathBuf,

    /// Candidate table (CSV with a header row).
    #[arg(long, value_name = "FILE")]
    dataset: PathBuf,

    /// Where the estimated transition matrix is persisted and reread from.
    #[arg(long, value_name = "FILE")]
    probability: Option<PathBuf>,

    /// Ranked table output (CSV).
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Ranked records output (JSON).
    #[arg(long, value_name = "FILE")]
    json_output: PathBuf,

    /// Rows to keep after sorting; 0 or less keeps all.
    #[arg(long, value_name = "N", default_value_t = 0, allow_negative_numbers = true)]
    topk: i64,

    /// Hierarchy columns, coarsest first.
    #[arg(long, value_name = "COL", num_args = 1.., default_values_t = DEFAULT_HIERARCHY.map(String::from))]
    arch_cols: Vec<String>,

    #[arg(long, value_name = "G", default_value_t = ValueIterationConfig::default().gamma)]
    gamma: f64,

    #[arg(long, value_name = "T", default_value_t = ValueIterationConfig::default().theta)]
    theta: f64,

    #[arg(long, value_name = "N", default_value_t = ValueIterationConfig::default().max_iterations)]
    max_iterations: usize,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(args)
}

fn run(args: Args) -> color_eyre::Result<()> {
    let request = constraints::load(&args.constraints_json)
        .wrap_err_with(|| format!("Failed to load {}.", args.constraints_json.display()))?;
    let table = Table::read_csv(&args.dataset)
        .wrap_err_with(|| format!("Failed to read {}.", args.dataset.display()))?;

    let solver = ValueIterationConfig::default()
        .with_gamma(args.gamma)
        .with_theta(args.theta)
        .with_max_iterations(args.max_iterations);
    let mut config = RankingConfig::default()
        .with_hierarchy_columns(args.arch_cols)
        .with_top_k(usize::try_from(args.topk).unwrap_or(0))
        .with_solver(solver);
    if let Some(path) = args.probability {
        config = config.with_transition_path(path);
    }

    let pipeline = RankingPipeline::new(config)?;
    let ranked = pipeline.run(&table, &request)?;

    if let Valuation::Skipped { reason } = &ranked.valuation {
        tracing::info!(reason = %reason, "Ranked by weighted utility only.");
    }

    ranked.table.write_csv(&args.output)?;
    ranked.table.write_records(&args.json_output)?;

    tracing::info!(
        rows = ranked.table.len(),
        output = %args.output.display(),
        json_output = %args.json_output.display(),
        "Ranked table written."
    );
    Ok(())
}
