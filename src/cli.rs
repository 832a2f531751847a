//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::{
    ConfigOverrides, ErrorMode, PipelineConfig, SeparatorPolicy, TieBreak, UnweightedPolicy,
};
use crate::core::render::{OutputFormat, RenderConfig};

/// docweave - assemble a content tree into one document ordered by front-matter weight.
#[derive(Parser, Debug)]
#[command(name = "docweave")]
#[command(
    author,
    version,
    about,
    long_about = r#"docweave concatenates every file under an input directory whose front matter
declares a numeric `weight`, in ascending weight order, into a single output file.

A file takes part when its first line is exactly `---` and the YAML block that
follows (up to the next `---` line) contains a `weight` key. Each file is copied
in full, header included, followed by one newline.

Results (the resolved manifest and a build summary) are printed to stdout in the
selected format. Logs go to stderr.

Examples:
    docweave build --input-dir content/lectures --output-file lectures.md
    docweave build --tie-break path --separator normalize
    docweave manifest --input-dir content --format md
    docweave --config docweave.toml build
"#
)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        long_help = "Read settings from a TOML file with [input], [output] and [policy]\n\
tables. Command-line flags override values from the file.\n\n\
Relative paths inside the file are resolved against the file's directory."
    )]
    pub config: Option<PathBuf>,

    /// Output format (jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for the manifest and build summary.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode (warnings and errors only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (per-file diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log every scanned, weighted and appended file to stderr.\n\n\
RUST_LOG, when set, takes precedence over -q/-v."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every pipeline command
#[derive(Args, Debug, Default)]
pub struct PipelineArgs {
    /// Directory to assemble.
    #[arg(
        long,
        value_name = "DIR",
        long_help = "Root of the content tree. Every regular file below it is a candidate.\n\n\
Defaults to `content` when neither this flag nor the config file sets it."
    )]
    pub input_dir: Option<PathBuf>,

    /// File to write.
    #[arg(
        long,
        value_name = "FILE",
        long_help = "Destination of the assembled document. It is replaced atomically, and\n\
never read back as input even when it lies inside the input directory.\n\n\
Defaults to `output.md`."
    )]
    pub output_file: Option<PathBuf>,

    /// Handling of files without a weight (exclude/append/error).
    #[arg(
        long,
        value_name = "POLICY",
        long_help = "What to do with files that have no front matter or no `weight` key.\n\n\
Supported values:\n\
- exclude (default): leave them out\n\
- append: add them after all weighted files, ordered by path\n\
- error: fail the run"
    )]
    pub unweighted: Option<UnweightedPolicy>,

    /// Error reporting mode (fail-fast/collect).
    #[arg(
        long,
        value_name = "MODE",
        long_help = "How malformed front matter and bad weights abort the run.\n\n\
Supported values:\n\
- fail-fast (default): stop at the first bad file\n\
- collect: check every file, then report all bad files together"
    )]
    pub errors: Option<ErrorMode>,

    /// Ordering of files with equal weights (path/scan).
    #[arg(
        long,
        value_name = "KEY",
        long_help = "Secondary ordering for files sharing a weight.\n\n\
Supported values:\n\
- path (default): relative path, lexicographically; reproducible\n\
- scan: directory traversal order; depends on the filesystem"
    )]
    pub tie_break: Option<TieBreak>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble the input tree and write the output file.
    #[command(
        long_about = "Scan the input directory, order files by weight, concatenate them and\n\
write the output file. Nothing is written if any step fails.\n\n\
Prints one item per included file followed by an output summary (size and\n\
xxh3 hash), so repeated builds can be compared.\n\n\
Examples:\n\
  docweave build\n\
  docweave build --input-dir content/lectures --output-file build/lectures.md\n\
  docweave build --unweighted append --errors collect\n"
    )]
    Build {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Newline handling between files (always/normalize).
        #[arg(
            long,
            value_name = "POLICY",
            long_help = "How files are separated in the output.\n\n\
Supported values:\n\
- always (default): exactly one newline after every file, even if it\n\
  already ends in one\n\
- normalize: a newline only after files that do not end in one"
        )]
        separator: Option<SeparatorPolicy>,
    },

    /// Print the resolved file order without writing anything.
    #[command(
        long_about = "Run the scan and ordering steps only, and print the manifest: the files\n\
that would be concatenated, in order, with their weights.\n\n\
Examples:\n\
  docweave manifest\n\
  docweave manifest --input-dir content --format md\n"
    )]
    Manifest {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

impl PipelineArgs {
    fn into_overrides(self, separator: Option<SeparatorPolicy>) -> ConfigOverrides {
        ConfigOverrides {
            input_dir: self.input_dir,
            output_file: self.output_file,
            unweighted: self.unweighted,
            error_mode: self.errors,
            tie_break: self.tie_break,
            separator,
        }
    }
}

/// Initialize tracing based on CLI flags; logs go to stderr
pub fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if cli.quiet {
        "docweave=warn"
    } else if cli.verbose {
        "docweave=debug"
    } else {
        "docweave=info"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let (overrides, build) = match cli.command {
        Commands::Build {
            pipeline,
            separator,
        } => (pipeline.into_overrides(separator), true),
        Commands::Manifest { pipeline } => (pipeline.into_overrides(None), false),
    };

    let config = PipelineConfig::resolve(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;
    tracing::debug!(?config, "configuration resolved");

    if build {
        crate::flows::assemble::run_build(&config, render_config)
    } else {
        crate::flows::assemble::run_manifest(&config, render_config)
    }
}
