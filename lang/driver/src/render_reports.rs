use std::fmt;
use std::io;

use miette::{GraphicalReportHandler, GraphicalTheme, Report};

use watling_lang_printer::ColorChoice;

/// Terminal width for pretty-printing error messages.
const TERMINAL_WIDTH: usize = 200;

struct WriteAdapter<'a, O: io::Write>(&'a mut O);

impl<O: io::Write> fmt::Write for WriteAdapter<'_, O> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

pub fn render_reports_to_string(reports: &[Report], colorize: ColorChoice) -> String {
    let mut output = String::new();
    // Writing into a `String` cannot fail
    let _ = render_reports(&mut output, reports, colorize);
    output
}

pub fn render_reports_io<O>(output: &mut O, reports: &[Report], colorize: ColorChoice) -> fmt::Result
where
    O: io::Write,
{
    render_reports(&mut WriteAdapter(output), reports, colorize)
}

pub fn render_reports<O>(output: &mut O, reports: &[Report], colorize: ColorChoice) -> fmt::Result
where
    O: fmt::Write,
{
    let theme = match colorize {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => GraphicalTheme::unicode(),
        ColorChoice::Auto => GraphicalTheme::default(),
        ColorChoice::Never => GraphicalTheme::unicode_nocolor(),
    };
    let handler = GraphicalReportHandler::new_themed(theme).with_width(TERMINAL_WIDTH);

    let mut reports = reports.iter().peekable();
    while let Some(report) = reports.next() {
        handler.render_report(output, report.as_ref())?;
        if reports.peek().is_some() {
            writeln!(output)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use miette::{NamedSource, SourceSpan};
    use watling_lang_backend::BackendError;

    use super::*;

    #[test]
    fn renders_code_and_file_name() {
        let err = BackendError::UndeclaredSymbol {
            name: "$x".to_owned(),
            span: Some(SourceSpan::from((6, 2))),
        };
        let report = Report::new(err)
            .with_source_code(NamedSource::new("main.php", "<?php $x;".to_owned()));
        let rendered = render_reports_to_string(&[report], ColorChoice::Never);
        assert!(rendered.contains("B-003"));
        assert!(rendered.contains("Undeclared symbol $x"));
        assert!(rendered.contains("main.php"));
    }
}
