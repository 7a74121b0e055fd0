use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown operation: `{0}`")]
    UnknownOperation(String),

    #[error("`{0}` takes {1} operands, got {2}")]
    OperandCount(String, usize, usize),

    #[error("Cannot parse `{0}` as {1}")]
    ParseArgument(String, String),

    #[error("Unknown directive: `{0}`")]
    UnknownDirective(String),

    #[error("Syntax Error: Cannot parse")]
    SyntaxError,

    #[error("{2} at line {0}: `{1}`")]
    Line(usize, String, Box<Error>),
}

impl Error {
    pub fn at(self, line_idx: usize, text: &str) -> Self {
        Error::Line(line_idx + 1, text.to_string(), Box::new(self))
    }

    /// Print error with the offending line of `file`
    pub fn print_diag(&self, file: &str) {
        match self {
            Error::Line(line_num, text, cause) => {
                cprintln!("<red,bold>error</>: {}", cause);
                cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
                cprintln!("      <blue>|</>");
                cprintln!(" <blue>{:>4} |</> {}", line_num, text);
                cprintln!("      <blue>|</>");
            }
            _ => cprintln!("<red,bold>error</>: {}", self),
        }
    }
}
