//! Sprout CLI entry point.

use std::process::ExitCode;

use clap::error::ErrorKind;
use sprout::cli::{AppContext, Cli, CommandDispatcher};
use sprout::config::{load_settings, ConfigSource};
use sprout::registry::Registry;
use sprout::shell::{is_ci, SystemRunner};
use sprout::ui::create_ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("sprout=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sprout=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };
    init_tracing(cli.debug);

    tracing::debug!("Sprout starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = create_ui(!is_ci(), cli.output_mode());

    let settings = match load_settings(&ConfigSource::discover(cli.config.as_deref())) {
        Ok(settings) => settings,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(e.exit_code());
        }
    };

    let registry = match Registry::builtin() {
        Ok(registry) => registry,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(e.exit_code());
        }
    };

    let runner = SystemRunner;
    let dispatcher = CommandDispatcher::new(AppContext {
        working_dir: std::env::current_dir().unwrap_or_default(),
        registry: &registry,
        settings: &settings,
        runner: &runner,
    });

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(e.exit_code())
        }
    }
}
