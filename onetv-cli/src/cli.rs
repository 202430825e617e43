use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "onetv",
    about = "onetv - resolve live and on-demand streams of the 1tv / CTC channel sites",
    version,
    author
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Timeout of one extraction attempt in seconds [default: from config]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Number of retry attempts [default: from config]
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Proxy URL (supports http, https, socks5)
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Proxy username (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_username: Option<String>,

    /// Proxy password (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the streams of a channel page
    Extract {
        /// The URL of the channel page, e.g. https://www.1tv.ru/live
        #[arg(short, long)]
        url: String,

        /// Endpoint overrides for the request (JSON object)
        #[arg(long)]
        extras: Option<String>,

        /// Output format [default: from config]
        #[arg(short, long)]
        output: Option<OutputFormat>,

        /// Save output to file
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,

        /// Stream to select: a quality label, "best" or "worst".
        /// Comma separated values are tried in order, e.g. "720p,hd,best"
        #[arg(long)]
        quality: Option<String>,

        /// Keep only streams whose format matches (e.g., "hls", "dash|http")
        #[arg(long)]
        format: Option<String>,

        /// Auto-select best quality stream without prompt
        #[arg(long)]
        auto_select: bool,

        /// Print every available stream, ranked from worst to best
        #[arg(short, long)]
        list: bool,

        /// Exclude extra metadata from output
        #[arg(long)]
        no_extras: bool,
    },

    /// List supported channels
    Channels {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show configuration information
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty-printed human-readable output
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// Compact JSON output
    JsonCompact,
    /// Table format
    Table,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonCompact => write!(f, "json-compact"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_extract() {
        let args = Args::parse_from([
            "onetv",
            "--retries",
            "1",
            "extract",
            "-u",
            "https://www.1tv.ru/live",
            "--quality",
            "720p,best",
            "-o",
            "json-compact",
            "--list",
        ]);
        assert_eq!(args.retries, Some(1));
        assert_eq!(args.timeout, None);
        match args.command {
            Commands::Extract {
                url,
                quality,
                output,
                list,
                ..
            } => {
                assert_eq!(url, "https://www.1tv.ru/live");
                assert_eq!(quality.as_deref(), Some("720p,best"));
                assert_eq!(output, Some(OutputFormat::JsonCompact));
                assert!(list);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
