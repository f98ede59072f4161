pub mod build;
pub mod check;
pub mod run;

use std::path::Path;
use std::process;

use hackvm::{Bootstrap, SourceUnit, TranslateOptions};

/// Build translation options from the shared command-line flags.
pub fn resolve_options(bootstrap: &str, entry: &str) -> TranslateOptions {
    let Some(bootstrap) = Bootstrap::from_name(bootstrap) else {
        eprintln!(
            "error: unknown bootstrap mode '{}' (expected auto, always or never)",
            bootstrap
        );
        process::exit(1);
    };
    TranslateOptions {
        bootstrap,
        entry: entry.to_string(),
        ..TranslateOptions::default()
    }
}

/// Load a `.vm` file or directory, exiting on failure.
pub fn load_input(input: &Path) -> Vec<SourceUnit> {
    match hackvm::load_program(input) {
        Ok(units) => units,
        Err(err) => {
            err.render(&input.display().to_string(), "");
            process::exit(1);
        }
    }
}

/// Translate loaded units, exiting on failure. Diagnostics are already
/// rendered by the library.
pub fn translate_or_exit(units: &[SourceUnit], options: &TranslateOptions) -> String {
    match hackvm::translate_units(units, options) {
        Ok(asm) => asm,
        Err(_) => process::exit(1),
    }
}
