use clap::{Parser, Subcommand};

use crate::global_settings::GlobalSettings;

mod compile;
mod gen_completions;
mod lex;

pub fn exec(settings: &GlobalSettings) -> miette::Result<()> {
    use Command::*;
    let cli = Cli::parse();
    match cli.command {
        Compile(args) => compile::exec(args, settings),
        Lex(args) => lex::exec(args),
        GenerateCompletion(args) => gen_completions::exec(args),
    }
}

#[derive(Parser)]
#[clap(version, author, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a file to WebAssembly text
    Compile(compile::Args),
    /// Show the tokens of a file
    Lex(lex::Args),
    /// Generate a shell completion script
    #[clap(name = "gen-completions")]
    GenerateCompletion(gen_completions::Args),
}
