//! Binary entry point for `pkgref-toggle`.

use std::process;

fn main() {
    if let Err(e) = pkgref_toggle::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
