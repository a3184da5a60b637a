use clap::Parser;
use postedit::cli::commands::Cli;
use postedit::cli::handlers;
use postedit::io::config_io::resolve_data_dir;
use postedit::logging;

fn main() {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let guard = logging::init(&data_dir);

    let result = match cli.command {
        // No subcommand → launch TUI
        None => postedit::tui::run(&data_dir),
        Some(_) => handlers::dispatch(cli, &data_dir),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        // Flush the log before exit skips destructors
        drop(guard);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
