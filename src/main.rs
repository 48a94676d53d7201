use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;
use taskboard::logging::{self, LogTarget};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => taskboard::tui::run(cli.project_dir.as_deref(), cli.verbose),
        Some(_) => {
            logging::init(LogTarget::Stderr, cli.verbose);
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
