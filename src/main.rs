use clap::{Parser, Subcommand};

mod cli;

#[derive(Parser)]
#[command(
    name = "hackvm",
    version,
    about = "Translate stack VM programs to Hack assembly"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a .vm file (or directory of .vm files) to .asm
    Build(cli::build::BuildArgs),
    /// Parse and translate without writing output
    Check(cli::check::CheckArgs),
    /// Translate and execute on the built-in Hack interpreter
    Run(cli::run::RunArgs),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => cli::build::cmd_build(args),
        Command::Check(args) => cli::check::cmd_check(args),
        Command::Run(args) => cli::run::cmd_run(args),
    }
}
