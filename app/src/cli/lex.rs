use std::path::PathBuf;

use miette::IntoDiagnostic;
use watling_lang_parser::lexer::Lexer;

use crate::result::InvalidInput;

#[derive(clap::Args)]
pub struct Args {
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
}

pub fn exec(args: Args) -> miette::Result<()> {
    InvalidInput::check(&args.filepath)?;
    let src = std::fs::read_to_string(&args.filepath).into_diagnostic()?;
    for tok in Lexer::new(&src) {
        match tok {
            Ok((p1, tok, p2)) => println!("{tok} at ({p1},{p2})"),
            Err(err) => println!("{} at ({},{})", err.kind, err.start, err.end),
        }
    }
    Ok(())
}
