mod error;

use clap::{Parser, ValueEnum};
use env_logger::Env;
use error::CliError;
use log::{debug, info};
use std::{fs, io::{self, Read, Write}, path::PathBuf, process::ExitCode};
use symat_expr::fmt::{Formatter, GlmFormatter, LatexFormatter, PlainFormatter};
use symat_parser::Program;

/// Simplifies a list of symbolic matrix definitions and renders the result.
#[derive(Debug, Parser)]
#[command(name = "symat", version, about)]
struct Cli {
    /// The program to read. Reads from stdin if not given.
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Where to write the output. Writes to stdout if not given.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Render only the definition with this name.
    #[arg(short, long, value_name = "NAME")]
    symbol: Option<String>,

    /// Surround operators with spaces and put matrix rows on their own lines.
    #[arg(short, long)]
    pretty: bool,

    /// The output language.
    #[arg(short, long, value_enum, default_value_t = Format::Plain)]
    format: Format,

    /// Log more details to stderr; can be repeated.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// The output languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The definition language itself.
    Plain,

    /// LaTeX math mode.
    Latex,

    /// C++ expressions for the GLM library.
    Glm,
}

impl Format {
    fn formatter(self, pretty: bool) -> Box<dyn Formatter> {
        match self {
            Format::Plain => Box::new(PlainFormatter::new(pretty)),
            Format::Latex => Box::new(LatexFormatter),
            Format::Glm => Box::new(GlmFormatter),
        }
    }
}

/// Returns the log filter for the number of `-v` flags.
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Reads the whole input file, or stdin.
fn read_input(path: Option<&PathBuf>) -> Result<String, CliError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|err| CliError::Io(Some(path.clone()), err)),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|err| CliError::Io(None, err))?;
            Ok(input)
        },
    }
}

fn write_output(path: Option<&PathBuf>, output: &str) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, output).map_err(|err| CliError::Io(Some(path.clone()), err)),
        None => io::stdout()
            .write_all(output.as_bytes())
            .map_err(|err| CliError::Io(None, err)),
    }
}

/// Parses the program and renders either one definition or all of them.
fn render(cli: &Cli, input: &str) -> Result<String, CliError> {
    let program = Program::parse(input)?;
    info!("parsed {} definitions", program.len());

    let formatter = cli.format.formatter(cli.pretty);
    let mut output = match &cli.symbol {
        Some(name) => program.format_definition(name, formatter.as_ref())?,
        None => program.format(formatter.as_ref()),
    };

    // compact plain output has no newlines of its own
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(log_filter(cli.verbose))).init();
    debug!("{:?}", cli);

    let src_id = cli.input
        .as_ref()
        .map_or_else(|| "stdin".to_string(), |path| path.display().to_string());

    let input = match read_input(cli.input.as_ref()) {
        Ok(input) => input,
        Err(err) => {
            err.report_to_stderr(&src_id, "");
            return ExitCode::FAILURE;
        },
    };

    match render(&cli, &input).and_then(|output| write_output(cli.output.as_ref(), &output)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report_to_stderr(&src_id, &input);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("symat").chain(args.iter().copied()))
    }

    #[test]
    fn arguments() {
        let parsed = cli(&["-p", "-f", "latex", "-s", "C", "-vv", "in.txt"]);
        assert!(parsed.pretty);
        assert_eq!(parsed.format, Format::Latex);
        assert_eq!(parsed.symbol.as_deref(), Some("C"));
        assert_eq!(parsed.verbose, 2);
        assert_eq!(parsed.input, Some(PathBuf::from("in.txt")));
        assert_eq!(log_filter(parsed.verbose), "debug");
    }

    #[test]
    fn renders_whole_program() {
        let output = render(&cli(&[]), "b = 2 * a; a = 3;").unwrap();
        assert_eq!(output, "a=3;b=6;\n");
    }

    #[test]
    fn renders_one_symbol() {
        let output = render(&cli(&["-p", "-s", "C"]), "A=[a,b;c,d];B=[1,0;0,1];C=A*B;").unwrap();
        assert_eq!(output, "C = [\n    a, b;\n    c, d\n];\n");
    }

    #[test]
    fn unknown_symbol() {
        let err = render(&cli(&["-s", "X"]), "x = 1;").unwrap_err();
        assert!(matches!(err, CliError::Lookup(_)));
        assert_eq!(err.to_string(), "unknown symbol `X`; did you mean `x`?");
    }

    #[test]
    fn parse_errors() {
        let err = render(&cli(&[]), "x = [1, 2; 3];").unwrap_err();
        assert_eq!(err.to_string(), "parse error at 1:12: expected row to have 2 columns, found 1");
    }
}
