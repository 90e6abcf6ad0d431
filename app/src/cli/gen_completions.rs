use std::io;

use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Elvish, Fish, PowerShell, Zsh},
};

use super::Cli;

#[allow(clippy::enum_variant_names)]
#[derive(clap::ValueEnum, Clone)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    PowerShell,
    Zsh,
}

#[derive(clap::Args)]
pub struct Args {
    /// Target shell
    shell: Shell,
}

pub fn exec(cmd: Args) -> miette::Result<()> {
    let mut command = Cli::command();
    let mut out = io::stdout();
    match cmd.shell {
        Shell::Bash => generate(Bash, &mut command, "wtl", &mut out),
        Shell::Elvish => generate(Elvish, &mut command, "wtl", &mut out),
        Shell::Fish => generate(Fish, &mut command, "wtl", &mut out),
        Shell::PowerShell => generate(PowerShell, &mut command, "wtl", &mut out),
        Shell::Zsh => generate(Zsh, &mut command, "wtl", &mut out),
    }
    Ok(())
}
