use std::path::PathBuf;

use clap::Args;

use super::{load_input, resolve_options, translate_or_exit};

#[derive(Args)]
pub struct CheckArgs {
    /// Input .vm file or directory of .vm files
    pub input: PathBuf,
    /// Bootstrap prologue: auto, always or never
    #[arg(long, default_value = "auto")]
    pub bootstrap: String,
    /// Function called by the bootstrap
    #[arg(long, default_value = "Sys.init")]
    pub entry: String,
}

pub fn cmd_check(args: CheckArgs) {
    let options = resolve_options(&args.bootstrap, &args.entry);
    let units = load_input(&args.input);
    translate_or_exit(&units, &options);
    eprintln!("OK: {}", args.input.display());
}
