use clap::Parser;
use std::process;
use tsd_extract::{
    Cli, ExtractError, ExtractionOutcome, OutputFormatter, OutputMode, TsdExtract,
    UserFriendlyError,
};

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let Some(ref command) = cli.command else {
        // arg_required_else_help covers the bare invocation; getting here
        // means only global flags were given.
        eprintln!("No extraction command given. Try 'tsd-extract --help'.");
        return 2;
    };
    let target = command.target();

    let app = match TsdExtract::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 2;
        }
    };

    match app.extract(target).await {
        Ok(outcome) => {
            app.output_formatter().print_outcome(&outcome);
            match outcome {
                // A model with nothing to extract is a normal state, not a
                // failure.
                ExtractionOutcome::Completed(_) | ExtractionOutcome::NothingToExtract(_) => 0,
            }
        }
        Err(e) => {
            app.handle_error(&e);

            match e {
                ExtractError::Config { .. } | ExtractError::InvalidStep { .. } => 2,
                ExtractError::Connection { .. } => 3,
                ExtractError::Api { .. } => 4,
                ExtractError::Protocol { .. } => 5,
                ExtractError::Io(_) | ExtractError::Csv(_) | ExtractError::Workbook(_) => 7,
                ExtractError::Timeout { .. } => 9,
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "tsd-extract.toml".to_string());

    match TsdExtract::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  tsd-extract member-forces --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &ExtractError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "tsd-extract",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[remoting]"));
        assert!(content.contains("[extraction]"));
    }
}
