use std::path::PathBuf;
use std::process;

use clap::Args;
use hackvm::runtime::{Exit, HackRunner, ProgramInput, Runner};

use super::{load_input, resolve_options, translate_or_exit};

#[derive(Args)]
pub struct RunArgs {
    /// Input .vm file or directory of .vm files
    pub input: PathBuf,
    /// Give up after this many instructions
    #[arg(long, default_value_t = 1_000_000)]
    pub max_steps: u64,
    /// Initial SP when no bootstrap is emitted
    #[arg(long, default_value_t = 256)]
    pub stack_base: u16,
    /// Bootstrap prologue: auto, always or never
    #[arg(long, default_value = "auto")]
    pub bootstrap: String,
    /// Function called by the bootstrap
    #[arg(long, default_value = "Sys.init")]
    pub entry: String,
}

pub fn cmd_run(args: RunArgs) {
    let options = resolve_options(&args.bootstrap, &args.entry);
    let units = load_input(&args.input);
    let asm = translate_or_exit(&units, &options);

    let runner = HackRunner {
        max_steps: args.max_steps,
        stack_base: args.stack_base,
    };
    let input = ProgramInput::default().with(0, args.stack_base as i16);
    let result = match runner.run(&asm, &input) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let how = match result.exit {
        Exit::HaltLoop => "halted",
        Exit::EndOfProgram => "ran off the end",
    };
    eprintln!("{} after {} instructions", how, result.cycle_count);
    let [sp, lcl, arg, this, that] = result.registers;
    println!("SP={} LCL={} ARG={} THIS={} THAT={}", sp, lcl, arg, this, that);
    let stack: Vec<String> = result.stack.iter().map(|v| v.to_string()).collect();
    println!("stack: [{}]", stack.join(", "));
}
