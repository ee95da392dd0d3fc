use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "callgauge")]
#[command(about = "Call-record quality analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a saved call-record export
    Analyze {
        /// Path of the saved spreadsheet payload
        path: PathBuf,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Restrict to one manager (display name)
        #[arg(long)]
        manager: Option<String>,

        /// Restrict to one client (phone)
        #[arg(long)]
        client: Option<String>,

        /// Start of the inclusive date range (DD.MM.YYYY)
        #[arg(long = "from")]
        date_from: Option<String>,

        /// End of the inclusive date range (DD.MM.YYYY)
        #[arg(long = "to")]
        date_to: Option<String>,

        /// Show only the first N records in the record tables
        #[arg(long = "top", visible_alias = "head")]
        top: Option<usize>,

        /// Increase verbosity level (can be repeated: -v, -vv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a new callgauge configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

impl OutputFormat {
    /// Resolve a configured format name; unknown names are `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "terminal" => Some(OutputFormat::Terminal),
            "json" => Some(OutputFormat::Json),
            "markdown" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_resolve_case_insensitively() {
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(
            OutputFormat::from_name(" terminal "),
            Some(OutputFormat::Terminal)
        );
        assert_eq!(OutputFormat::from_name("yaml"), None);
    }

    #[test]
    fn analyze_arguments_parse() {
        let cli = Cli::try_parse_from([
            "callgauge",
            "analyze",
            "calls.json",
            "--format",
            "json",
            "--manager",
            "Ann",
            "--from",
            "01.01.2025",
            "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                path,
                format,
                manager,
                date_from,
                verbosity,
                ..
            } => {
                assert_eq!(path, PathBuf::from("calls.json"));
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(manager.as_deref(), Some("Ann"));
                assert_eq!(date_from.as_deref(), Some("01.01.2025"));
                assert_eq!(verbosity, 2);
            }
            _ => panic!("expected analyze command"),
        }
    }
}
