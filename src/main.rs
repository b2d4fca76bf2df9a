//! Kodegen Bundler Matrix - cross-compile and zip a binary for every target.
//!
//! Runs the cross-compiler once for the whole (arch x os) matrix and then
//! packages each produced binary into its own zip archive.

use kodegen_bundler_matrix::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  • {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
