use clap::Parser;
use dashboard_lib::cli::Cli;

fn main() {
    // Load .env file if present (for development convenience)
    // Silently ignore if not found - production uses system env vars
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = dashboard_lib::run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
