use std::io::{self, IsTerminal};
use std::path::PathBuf;

use miette::IntoDiagnostic;

use watling_lang_driver::Database;
use watling_lang_printer::{
    ColorChoice, DEFAULT_WIDTH, PrintCfg, PrintExt, PrintToString, StandardStream,
};

use crate::global_settings::GlobalSettings;
use crate::result::InvalidInput;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
    /// Write the module to this file instead of stdout
    #[clap(value_parser, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Break long lists over several lines
    #[clap(long)]
    pretty: bool,
    /// Line width used with --pretty
    #[clap(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> miette::Result<()> {
    InvalidInput::check(&cmd.filepath)?;
    let mut db = Database::from_cwd();

    let wat = if cmd.pretty {
        let wat = db.compile_pretty(&cmd.filepath).map_err(|err| db.pretty_error(err))?;
        let cfg = PrintCfg { width: cmd.width, ..PrintCfg::default() };
        if cmd.output.is_none() {
            let mut stream = StandardStream::stdout(stdout_colors(settings.colorize));
            return wat.print_colored(&cfg, &mut stream).into_diagnostic();
        }
        wat.print_to_string(Some(&cfg))
    } else {
        let mut wat = db.compile(&cmd.filepath).map_err(|err| db.pretty_error(err))?;
        wat.push('\n');
        wat
    };

    match &cmd.output {
        Some(path) => db.write_source(path, &wat).map_err(|err| db.pretty_error(err)),
        None => {
            print!("{wat}");
            Ok(())
        }
    }
}

/// `auto` only colors a terminal
fn stdout_colors(choice: ColorChoice) -> ColorChoice {
    match choice {
        ColorChoice::Auto if !io::stdout().is_terminal() => ColorChoice::Never,
        choice => choice,
    }
}
