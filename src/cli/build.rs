use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{load_input, resolve_options, translate_or_exit};

#[derive(Args)]
pub struct BuildArgs {
    /// Input .vm file or directory of .vm files
    pub input: PathBuf,
    /// Output .asm file (default: <input>.asm, or <dir>/<dir>.asm)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Bootstrap prologue: auto, always or never
    #[arg(long, default_value = "auto")]
    pub bootstrap: String,
    /// Function called by the bootstrap
    #[arg(long, default_value = "Sys.init")]
    pub entry: String,
    /// Omit the `// <command>` comment before each lowering
    #[arg(long)]
    pub no_comments: bool,
    /// Omit the trailing halt loop
    #[arg(long)]
    pub no_halt: bool,
}

pub fn cmd_build(args: BuildArgs) {
    let mut options = resolve_options(&args.bootstrap, &args.entry);
    options.annotate = !args.no_comments;
    options.halt_loop = !args.no_halt;

    let units = load_input(&args.input);
    let asm = translate_or_exit(&units, &options);

    let out_path = args
        .output
        .unwrap_or_else(|| hackvm::default_output_path(&args.input));
    if let Err(e) = std::fs::write(&out_path, &asm) {
        eprintln!("error: cannot write '{}': {}", out_path.display(), e);
        process::exit(1);
    }
    eprintln!(
        "Translated {} file(s) -> {}",
        units.len(),
        out_path.display()
    );
}
