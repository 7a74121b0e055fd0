use crate::grammer::token::{Pos, Token};
use color_print::cprintln;
use serde::Serialize;
use std::fmt;
use strum::Display;
use thiserror::Error;

// Token information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub kind: String,
    pub text: String,
    pub pos: Pos,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ('{}')", self.kind, self.text)
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.to_string(),
            text: token.kind.text().to_string(),
            pos: token.pos,
        }
    }
}

impl From<Token> for TokenInfo {
    fn from(token: Token) -> Self {
        TokenInfo::from(&token)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Lexical errors
    #[error("Unterminated character literal at line {0}")]
    UnterminatedChar(Pos),

    #[error("Unterminated string literal at line {0}")]
    UnterminatedString(Pos),

    #[error("Unexpected character '{0}' at line {1}")]
    UnexpectedChar(char, Pos),

    // Syntax errors
    #[error("Unexpected token at line {}. Expected {expected}, got {found}", .found.pos)]
    UnexpectedToken { expected: String, found: TokenInfo },

    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("Expected parameter type at line {}", .0.pos)]
    ExpectedParamType(TokenInfo),

    #[error("Expected assignment or expression at line {}", .0.pos)]
    ExpectedAssignment(TokenInfo),

    // Semantic errors
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),
}

/// Compiler phase an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum Phase {
    #[strum(serialize = "Lexical Analysis")]
    #[serde(rename = "Lexical Analysis")]
    Lexical,
    #[strum(serialize = "Syntax Analysis")]
    #[serde(rename = "Syntax Analysis")]
    Syntax,
    #[strum(serialize = "Semantic Analysis")]
    #[serde(rename = "Semantic Analysis")]
    Semantic,
    #[strum(serialize = "Code Generation")]
    #[serde(rename = "Code Generation")]
    CodeGen,
    #[strum(serialize = "Unknown")]
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Error {
    pub fn phase(&self) -> Phase {
        match self {
            Error::UnterminatedChar(_) | Error::UnterminatedString(_) | Error::UnexpectedChar(..) => {
                Phase::Lexical
            }
            Error::UnexpectedToken { .. }
            | Error::UnexpectedEof
            | Error::ExpectedParamType(_)
            | Error::ExpectedAssignment(_) => Phase::Syntax,
            Error::UndefinedVariable(_) => Phase::Semantic,
            Error::Io(_) => Phase::Unknown,
        }
    }

    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::UnterminatedChar(pos)
            | Error::UnterminatedString(pos)
            | Error::UnexpectedChar(_, pos) => Some(*pos),
            Error::UnexpectedToken { found, .. } => Some(found.pos),
            Error::ExpectedParamType(info) | Error::ExpectedAssignment(info) => Some(info.pos),
            _ => None,
        }
    }
}

/// Print `message` with the offending line of `source`
pub fn print_diag(message: &str, pos: Option<Pos>, file: &str, source: &str) {
    cprintln!("<red,bold>error</>{}", message);
    let Some(pos) = pos else { return };
    let text = source.lines().nth(pos.line.saturating_sub(1)).unwrap_or("");
    cprintln!("     <blue>--></> <underline>{}:{}</>", file, pos);
    cprintln!("      <blue>|</>");
    cprintln!(" <blue>{:>4} |</> {}", pos.line, text);
    let caret = format!("{:>width$}", "^", width = pos.col);
    cprintln!("      <blue>|</> <red,bold>{}</>", caret);
}
