pub mod cli;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod model;
pub mod sampler;
pub mod traversal;
pub mod units;
pub mod ui;
pub mod writer;

// Public API re-exports
pub use cli::{Cli, Command, ForceFormat, OutputFormat};
pub use config::{CliOverrides, Config};
pub use driver::{ExtractionDriver, ExtractionOutcome, ExtractionReport, ExtractionTarget};
pub use error::{ExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use client::{ModelApi, RemotingClient};
pub use sampler::ResultSampler;
pub use traversal::{MemberTraversal, NodalTraversal};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};
pub use units::UnitConverter;

use indicatif::ProgressBar;
use std::cell::RefCell;
use traversal::member::MemberProgress;
use ui::output::ProgressAwareOutput;

/// Main library interface: owns the configuration and the terminal surfaces,
/// and runs one extraction per invocation.
pub struct TsdExtract {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl TsdExtract {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        // Progress bars only make sense on a human terminal.
        let progress_manager =
            ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Connect to the application and run one extraction. A connection
    /// refusal means no instance is listening, which is the same clean
    /// "nothing to extract" outcome as an empty model.
    pub async fn extract(&self, target: ExtractionTarget) -> Result<ExtractionOutcome> {
        self.output_formatter
            .start_operation(&format!("Extracting {}", target.label()));

        let client = match RemotingClient::connect(
            &self.config.remoting.host,
            self.config.remoting.port,
            self.config.call_timeout(),
        )
        .await
        {
            Ok(client) => client,
            Err(_) => return Ok(ExtractionOutcome::NothingToExtract(driver::NO_INSTANCES)),
        };

        self.run_extraction(&client, target).await
    }

    /// Drive an extraction over an already-connected model API.
    pub async fn run_extraction<A: ModelApi>(
        &self,
        api: &A,
        target: ExtractionTarget,
    ) -> Result<ExtractionOutcome> {
        let driver = ExtractionDriver::new(api, &self.config);

        let spinner = self.progress_manager.create_spinner("Walking solved model");
        let progress_output =
            ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        // The member count is only known once discovery has run, so the
        // spinner is swapped for a bar on the first traversal callback.
        let member_bar: RefCell<Option<ProgressBar>> = RefCell::new(None);
        let on_member = |progress: &MemberProgress| {
            let mut bar = member_bar.borrow_mut();
            let pb = bar.get_or_insert_with(|| {
                spinner.finish_and_clear();
                self.progress_manager
                    .create_member_progress(progress.members_total as u64)
            });
            ui::progress::update_member_progress(pb, progress);
            progress_output.suspend_and_print(|f| {
                f.debug(&format!(
                    "{}: {} rows so far",
                    progress.current_member, progress.rows
                ))
            });
        };

        let outcome = driver.run(target, Some(&on_member)).await;
        if let Some(pb) = member_bar.into_inner() {
            pb.finish_and_clear();
        }
        spinner.finish_and_clear();
        self.progress_manager.clear();

        if let Ok(ExtractionOutcome::Completed(report)) = &outcome {
            for skipped in &report.skipped {
                self.output_formatter.warning(&format!(
                    "No loading result for {} / {}",
                    skipped.member, skipped.loadcase
                ));
            }
        }

        outcome
    }

    pub fn handle_error(&self, error: &ExtractError) {
        self.output_formatter.print_user_friendly_error(error);
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generate_sample_config(path: &str) -> Result<()> {
        let sample = Config::create_sample_config();
        std::fs::write(path, sample).map_err(|e| ExtractError::Config {
            message: format!("Failed to write config file {}: {}", path, e),
        })?;
        Ok(())
    }
}

/// Version and build information.
pub fn version_info() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
