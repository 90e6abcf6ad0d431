use std::io;
use std::process;

use watling_lang_driver::render_reports_io;

mod cli;
mod global_settings;
mod result;

use global_settings::GlobalSettings;
use result::InvalidInput;

fn main() {
    let settings = GlobalSettings::from_env();
    env_logger::Builder::new().filter_level(settings.log_level).init();

    if let Err(report) = cli::exec(&settings) {
        let code = if report.downcast_ref::<InvalidInput>().is_some() { 2 } else { 1 };
        let _ = render_reports_io(&mut io::stderr(), &[report], settings.colorize);
        process::exit(code);
    }
}
