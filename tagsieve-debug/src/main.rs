use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::PathBuf;

mod formatters;
mod pipeline_debug;
mod policy_file;
mod test_cases;

use pipeline_debug::{DebugConfig, PipelineDebugger};
use tagsieve::AllowedProtocols;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "tagsieve-debug")]
#[command(about = "Debugging tool for the tagsieve sanitization pipeline")]
pub struct Cli {
    /// Input to analyze (string, hex, or file)
    input: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Input is hexadecimal (e.g., "3c623e")
    #[arg(long)]
    hex: bool,

    /// Read input from file
    #[arg(long)]
    file: Option<PathBuf>,

    /// JSON policy file (defaults to the built-in forum policy)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Comma-separated protocol whitelist (defaults to the standard eight)
    #[arg(long)]
    protocols: Option<String>,

    /// Show the entity-normalized intermediate text
    #[arg(long)]
    pub show_normalized: bool,

    /// Show attribute tokens for every tag span
    #[arg(long)]
    pub show_tokens: bool,

    /// Output format: text, json
    #[arg(long, default_value = "text")]
    output: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run built-in test cases
    Test {
        /// Specific test case to run
        case: Option<String>,
    },
    /// Sanitize multiple inputs
    Batch {
        /// File containing inputs (one per line)
        inputs_file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Test { case }) => {
            test_cases::run_all_tests(case.as_deref())?;
        }
        Some(Commands::Batch { inputs_file }) => {
            run_batch(&cli, inputs_file)?;
        }
        None => {
            let input = get_input(&cli)?;
            let debugger = create_debugger(&cli)?;
            let results = debugger.analyze(&input);

            match cli.output.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&results)?),
                _ => formatters::output_text(&results, &cli),
            }
        }
    }

    Ok(())
}

fn get_input(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.file {
        return Ok(fs::read_to_string(path)?);
    }
    let Some(raw) = &cli.input else {
        return Err("no input given; pass a string, --file, or a subcommand".into());
    };
    if cli.hex {
        let bytes = hex::decode(raw)?;
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(raw.clone())
}

fn create_debugger(cli: &Cli) -> Result<PipelineDebugger, Box<dyn std::error::Error>> {
    let policy = match &cli.policy {
        Some(path) => policy_file::load_policy(path)?,
        None => policy_file::builtin_policy(),
    };
    let protocols = match &cli.protocols {
        Some(list) => AllowedProtocols::new(list.split(',').map(str::trim)),
        None => AllowedProtocols::default(),
    };
    let config = DebugConfig {
        show_tokens: cli.show_tokens,
        show_normalized: cli.show_normalized,
        verbose: cli.verbose,
    };
    Ok(PipelineDebugger::new(config, policy, protocols))
}

fn run_batch(cli: &Cli, inputs_file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let debugger = create_debugger(cli)?;
    let content = fs::read_to_string(inputs_file)?;

    for (lineno, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let results = debugger.analyze(line);
        let changed = results.output != line;
        let marker = if changed {
            "FILTERED".bright_yellow().bold()
        } else {
            "UNCHANGED".bright_green()
        };
        println!("{:>4} {} {} -> {}", lineno + 1, marker, line, results.output);
        if debugger.config().verbose {
            for tag in &results.tags {
                println!("       span {:?} -> {:?}", tag.span, tag.emitted);
            }
        }
    }

    Ok(())
}
