use clap::Parser;
use phaseboard::cli::commands::Cli;
use phaseboard::cli::handlers;
use phaseboard::io::{config_io, logging};

fn main() {
    let cli = Cli::parse();

    let mut config = match config_io::read_config() {
        Ok((config, _)) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = logging::init_logging(&config.log) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let result = match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Some(api) = cli.api {
                config.api.base_url = api;
            }
            phaseboard::tui::run(&config)
        }
        Some(_) => handlers::dispatch(cli, config),
    };
    if let Err(e) = result {
        log::error!("{}", e);
        logging::flush_logging();
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    logging::flush_logging();
}
