pub mod analysis {
    pub mod collect;
    pub mod config;
    pub mod cost;
    pub mod error;
    pub mod keywords;
    pub mod report;
    pub mod types;
    pub mod utils {
        pub mod format;
        pub mod print;
    }
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;

use crate::analysis::config::{CostModel, MatchMode};
use crate::analysis::error::Result;
use crate::analysis::report::ReportVariant;

/// Counts LLVM IR instruction keywords and estimates a weighted cycle total.
#[derive(Parser, Debug)]
#[command(name = "llvm_cycle_analyzer", version, about)]
struct Cli {
    /// LLVM IR listing to scan
    #[arg(default_value = "findreturn.ll")]
    input: PathBuf,

    /// CSV report path [default: instruction_analysis.csv, or instructions.csv for --variant basic]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report layout
    #[arg(long, value_enum, default_value_t = ReportVariant::Extended)]
    variant: ReportVariant,

    /// TOML file overriding instruction weights and overhead cycles
    #[arg(long)]
    config: Option<PathBuf>,

    /// How lines are credited to instructions (overrides the config file)
    #[arg(long, value_enum)]
    match_mode: Option<MatchMode>,

    /// Also export the analysis as JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Also export the analysis as TOML
    #[arg(long, value_name = "PATH")]
    toml: Option<PathBuf>,

    /// Skip the console summary
    #[arg(short, long)]
    quiet: bool,

    /// Print the effective cost model and exit
    #[arg(long)]
    info: bool,
}

fn run(cli: &Cli) -> Result<()> {
    use crate::analysis::collect::analyze_and_collect;
    use crate::analysis::report::{export_json, export_toml, write_csv_file};
    use crate::analysis::utils::print::{print_cost_model, print_summary};

    let mut model = match &cli.config {
        Some(path) => CostModel::load(path)?,
        None => CostModel::default(),
    };
    if let Some(mode) = cli.match_mode {
        model.match_mode = mode;
    }

    if cli.info {
        print_cost_model(&model);
        return Ok(());
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(cli.variant.default_output()));

    // The input is read to completion before the report file is touched.
    let output = analyze_and_collect(&cli.input, &model, cli.variant)?;
    write_csv_file(&output_path, &output)?;

    if let Some(path) = &cli.json {
        export_json(path, &output)?;
    }
    if let Some(path) = &cli.toml {
        export_toml(path, &output)?;
    }

    if !cli.quiet {
        print_summary(&output);
    }

    let message = format!("CSV file generated successfully: {}", output_path.display());
    if atty::is(atty::Stream::Stdout) {
        println!("{}", message.bright_green());
    } else {
        println!("{}", message);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if atty::is(atty::Stream::Stderr) {
                eprintln!("{}", e.to_string().red());
            } else {
                eprintln!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}
