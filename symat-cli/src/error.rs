use std::{fmt, io, path::PathBuf};
use symat_parser::{Error as ParseError, UnknownSymbol};

/// Everything that can stop the binary from rendering a program.
#[derive(Debug)]
pub enum CliError {
    /// The input or output could not be read or written. The path is [`None`] for stdin and
    /// stdout.
    Io(Option<PathBuf>, io::Error),

    /// The program failed to parse.
    Parse(ParseError),

    /// The requested symbol is not defined by the program.
    Lookup(UnknownSymbol),
}

impl CliError {
    /// Report this error to stderr. Parse errors are rendered as a report pointing into `input`.
    pub fn report_to_stderr(self, src_id: &str, input: &str) {
        match self {
            Self::Parse(err) => {
                let err = symat_error::Error::from(err);
                if let Err(io_err) = err.report_to_stderr(src_id, input) {
                    // fall back to the one-line message
                    log::error!("could not write report: {}", io_err);
                    eprintln!("{}", err);
                }
            },
            other => eprintln!("error: {}", other),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(Some(path), err) => write!(f, "{}: {}", path.display(), err),
            Self::Io(None, err) => write!(f, "{}", err),
            Self::Parse(err) => write!(f, "{}", err),
            Self::Lookup(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<UnknownSymbol> for CliError {
    fn from(err: UnknownSymbol) -> Self {
        Self::Lookup(err)
    }
}
