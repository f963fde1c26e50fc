//! yangtree CLI entry point
//!
//! Parses arguments, dispatches to the CLI module and reports failures as a
//! JSON error object before exiting non-zero. All logic lives in `cli`.

use yangtree::cli;

fn main() {
    if let Err(e) = cli::run() {
        if cli::write_error(e.code(), &e.to_string()).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
