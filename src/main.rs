use anyhow::Result;
use clap::Parser;

use callgauge::cli::{Cli, Commands, OutputFormat};
use callgauge::commands::AnalyzeConfig;
use callgauge::core::FilterSelection;

// Main orchestrator function
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            manager,
            client,
            date_from,
            date_to,
            top,
            verbosity,
        } => {
            init_logging(verbosity);
            let selection = build_selection(manager, client, date_from, date_to)?;
            let config = AnalyzeConfig {
                path,
                format: resolve_format(format),
                output,
                selection,
                top,
            };
            callgauge::commands::handle_analyze(config)
        }
        Commands::Init { force } => {
            init_logging(0);
            callgauge::commands::init_config(force)
        }
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

// Pure function to assemble the immutable selection from CLI arguments
fn build_selection(
    manager: Option<String>,
    client: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
) -> Result<FilterSelection> {
    Ok(FilterSelection {
        manager,
        client,
        date_from: date_from
            .as_deref()
            .map(callgauge::commands::analyze::parse_cli_date)
            .transpose()?,
        date_to: date_to
            .as_deref()
            .map(callgauge::commands::analyze::parse_cli_date)
            .transpose()?,
    })
}

// Pure function to pick the output format, falling back to the configured
// default and finally to the terminal renderer
fn resolve_format(format: Option<OutputFormat>) -> callgauge::io::output::OutputFormat {
    format
        .or_else(|| OutputFormat::from_name(&callgauge::config::get_config().output.default_format))
        .unwrap_or(OutputFormat::Terminal)
        .into()
}
