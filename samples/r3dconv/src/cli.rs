use std::path::PathBuf;

use clap::ValueHint;
use r3d::{FormatVariant, IndexPolicy, Options};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        global = true,
        default_value = "warn,r3d=info,r3dconv=info",
        env = "R3DCONV_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, global = true, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Format generation of input files (`legacy` or `current`)
    #[arg(long, global = true, default_value_t = FormatVariant::Legacy, env = "R3DCONV_VARIANT")]
    pub variant: FormatVariant,
    /// Override the variant's handling of out-of-range normal/uv indices (`lenient` or `strict`)
    #[arg(long, global = true)]
    pub index_policy: Option<IndexPolicy>,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Decoding options for input files.
    pub fn options(&self) -> Options {
        let options = Options::new(self.variant);
        match self.index_policy {
            Some(policy) => options.with_index_policy(policy),
            None => options,
        }
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print a summary of an R3D file
    Inspect {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Decode R3D files and report any that are malformed
    Check {
        #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
    /// Re-encode an R3D file, optionally changing its format generation or asset flags
    Convert {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Format generation of the output file; defaults to that of the input
        #[arg(long)]
        to_variant: Option<FormatVariant>,
        /// Mark the output as a car asset
        #[arg(long, conflicts_with = "plain")]
        car: bool,
        /// Mark the output as group-textured
        #[arg(long, conflicts_with = "plain")]
        group_texture: bool,
        /// Clear the car & group-texture flags on the output
        #[arg(long)]
        plain: bool,
    },
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
