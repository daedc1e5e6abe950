//! `rpsq` startup: parse arguments, load configuration, start logging and
//! run the requested subcommand.

use super::cli::{self, Cli, Command, GlobalArgs, OutputOptions};
use super::config::Config;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, LogFormat};
use crate::core::styles::palette_to_clap;
use crate::queue::QueueResult;
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;
use std::process::ExitCode;

/// Initialize application startup
pub fn startup() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    // Colour for help text has to be decided before clap has parsed anything
    let help_color = color_enabled(
        args.iter().any(|a| a == "--color"),
        args.iter().any(|a| a == "--no-color"),
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
    );
    let matches = Cli::command()
        .styles(palette_to_clap(help_color))
        .get_matches_from(&args);
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let color = color_enabled(
        cli.global.color,
        cli.global.no_color,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
    );
    colored::control::set_override(color);

    let config = match resolve_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            // Logging settings may be what failed, so fall back to the CLI's
            let _ = init_logging(
                cli.global.log_level.as_deref(),
                LogFormat::default(),
                None,
                color,
            );
            log_error_with_context(&e, "Loading configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(
        config.log.level.as_deref(),
        config.log_format(),
        config.log.file.as_deref(),
        color,
    ) {
        eprintln!("Failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    log::debug!("Final configuration: {:?}", config);

    match execute(&cli.command, &config, color) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error_with_context(&e, operation_context(&cli.command));
            ExitCode::FAILURE
        }
    }
}

/// Load the configuration file and apply command line overrides
pub(crate) fn resolve_config(global: &GlobalArgs) -> QueueResult<Config> {
    let mut config = Config::load(global.config_file.as_deref())?;
    global.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

/// `--color` beats everything, then `--no-color`, then TTY and `NO_COLOR`
pub(crate) fn color_enabled(
    force: bool,
    disable: bool,
    is_terminal: bool,
    no_color_env: bool,
) -> bool {
    if force {
        true
    } else if disable {
        false
    } else {
        is_terminal && !no_color_env
    }
}

fn execute(command: &Command, config: &Config, color: bool) -> QueueResult<()> {
    let store = config.connect_store()?;
    let coordinator = config.coordinator(store)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(
        command,
        &coordinator,
        config.consume_options(),
        OutputOptions { color },
        &mut out,
    )
}

fn operation_context(command: &Command) -> &'static str {
    match command {
        Command::Publish { .. } => "Publishing message",
        Command::Subscribe { .. } => "Subscribing consumer",
        Command::Unsubscribe { .. } => "Unsubscribing consumer",
        Command::Consume(_) => "Consuming messages",
        Command::Subscribers { .. } => "Listing subscribers",
    }
}
