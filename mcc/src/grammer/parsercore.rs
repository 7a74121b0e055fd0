use super::token::Token;
use crate::error::{Error, TokenInfo};
use itertools::PeekNth;

pub struct Parser<I: Iterator<Item = Token>> {
    tokens: PeekNth<I>,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens: itertools::peek_nth(tokens),
        }
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Peek : Watch next token without consuming it
    pub fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    /// Peek n-th token ahead (0 is the next token)
    pub fn peek_nth(&mut self, n: usize) -> Option<&Token> {
        self.tokens.peek_nth(n)
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> bool {
        self.tokens.peek().is_some_and(cond)
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        self.tokens.next_if(|token| cond(token))
    }

    /// Next token must be match with condition
    pub fn expect_tobe<F: Fn(&Token) -> bool>(
        &mut self,
        expected: &str,
        cond: F,
    ) -> Result<Token, Error> {
        match self.tokens.next_if(|token| cond(token)) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(expected)),
        }
    }

    /// Error describing the next token
    pub fn unexpected(&mut self, expected: &str) -> Error {
        match self.tokens.peek() {
            Some(token) => Error::UnexpectedToken {
                expected: expected.to_string(),
                found: TokenInfo::from(token),
            },
            None => Error::UnexpectedEof,
        }
    }
}

/// `Identifier(_) | Number(_)` -> `IDENTIFIER or NUMBER`
pub fn kind_name(pattern: &str) -> String {
    pattern
        .split('|')
        .map(|alt| {
            let name = alt.trim().split('(').next().unwrap_or_default();
            let mut out = String::new();
            for (i, ch) in name.chars().enumerate() {
                if ch.is_ascii_uppercase() && i > 0 {
                    out.push('_');
                }
                out.push(ch.to_ascii_uppercase());
            }
            out
        })
        .collect::<Vec<_>>()
        .join(" or ")
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat) => {
        $parser.expect_tobe(
            &$crate::grammer::parsercore::kind_name(stringify!($kind)),
            |token| matches!(&token.kind, $kind),
        )
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat, $following:expr) => {
        if check!($parser, $trigger) {
            expect!($parser, $trigger)?;
            Some($following)
        } else {
            None
        }
    };
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}

/// Parse repeated elements with optional delimiters
/// 3 args: { element } terminal (no delimiter)
/// 4 args: [ element { delimiter element } ] terminal (with delimiter)
#[macro_export]
macro_rules! repeat {
    ($parser:expr, $elem:expr, $terminal:pat) => {{
        let mut items = Vec::new();
        while !check!($parser, $terminal) {
            items.push($elem?);
        }
        items
    }};

    ($parser:expr, $elem:expr, $delimiter:pat, $terminal:pat) => {{
        let mut items = Vec::new();
        if !check!($parser, $terminal) {
            items.push($elem?);
            while check!($parser, $delimiter) {
                expect!($parser, $delimiter)?;
                items.push($elem?);
            }
        }
        items
    }};
}
