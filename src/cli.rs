use crate::config::{CliOverrides, Config};
use crate::driver::ExtractionTarget;
use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tsd-extract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract solved analysis results from a running structural analysis application")]
#[command(
    long_about = "tsd-extract connects to the remoting interface of a running structural \
                  analysis application, walks the solved first order linear model, and writes \
                  member forces or nodal deflections to a file next to the open document."
)]
#[command(after_help = "EXAMPLES:\n  \
    tsd-extract member-forces\n  \
    tsd-extract member-forces --format csv --step 0.05\n  \
    tsd-extract nodal-displacements --output-dir ./results\n  \
    tsd-extract member-forces --port 9000 --config my-config.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Remoting host of the analysis application
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Remoting port of the analysis application
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Per-call timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Directory to write output files into
    #[arg(
        short,
        long,
        global = true,
        help = "Output directory (default: directory of the open document)"
    )]
    pub output_dir: Option<PathBuf>,

    /// Position-ratio step between samples along a span
    #[arg(long, global = true, help = "Sampling step as a ratio of span length, in (0, 1]")]
    pub step: Option<f64>,

    /// Output format for results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract member internal forces at positions along each span
    MemberForces {
        /// Output file format
        #[arg(long, value_enum, default_value_t = ForceFormat::Xlsx)]
        format: ForceFormat,
    },
    /// Extract nodal deflections per solved load case
    NodalDisplacements,
}

impl Command {
    pub fn target(&self) -> ExtractionTarget {
        match self {
            Command::MemberForces {
                format: ForceFormat::Xlsx,
            } => ExtractionTarget::MemberForcesWorkbook,
            Command::MemberForces {
                format: ForceFormat::Csv,
            } => ExtractionTarget::MemberForcesCsv,
            Command::NodalDisplacements => ExtractionTarget::NodalDisplacements,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ForceFormat {
    /// Workbook in the model's native units
    Xlsx,
    /// Delimited text in kip and feet
    Csv,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_host(self.host.clone())
            .with_port(self.port)
            .with_timeout(self.timeout)
            .with_step(self.step)
            .with_output_dir(self.output_dir.clone())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
