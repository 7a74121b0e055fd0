use serde::Serialize;
use std::fmt;
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Keywords
    Int,    // "int"
    Char,   // "char"
    Void,   // "void"
    If,     // "if"
    Else,   // "else"
    For,    // "for"
    While,  // "while"
    Do,     // "do"
    Return, // "return"
    Printf, // "printf"
    Scanf,  // "scanf"

    // Identifier
    Identifier(String),

    // Literals, kept as written
    Number(String),
    CharLiteral(String),
    StringLiteral(String),

    // Double character tokens
    Eq,          // '=='
    Ne,          // '!='
    Le,          // '<='
    Ge,          // '>='
    LeftShift,   // '<<'
    RightShift,  // '>>'
    And,         // '&&'
    Or,          // '||'
    Increment,   // '++'
    Decrement,   // '--'
    PlusAssign,  // '+='
    MinusAssign, // '-='

    // Single character tokens
    Assign,    // '='
    Plus,      // '+'
    Minus,     // '-'
    Multiply,  // '*'
    Divide,    // '/'
    Modulo,    // '%'
    Lt,        // '<'
    Gt,        // '>'
    Not,       // '!'
    BitAnd,    // '&'
    BitOr,     // '|'
    BitXor,    // '^'
    Semicolon, // ';'
    Comma,     // ','
    LParen,    // '('
    RParen,    // ')'
    LBrace,    // '{'
    RBrace,    // '}'
    LBracket,  // '['
    RBracket,  // ']'

    // End of input
    Eof,
}

impl TokenKind {
    /// Source text of the token
    pub fn text(&self) -> &str {
        use TokenKind::*;
        match self {
            Int => "int",
            Char => "char",
            Void => "void",
            If => "if",
            Else => "else",
            For => "for",
            While => "while",
            Do => "do",
            Return => "return",
            Printf => "printf",
            Scanf => "scanf",
            Identifier(s) | Number(s) | CharLiteral(s) | StringLiteral(s) => s,
            Eq => "==",
            Ne => "!=",
            Le => "<=",
            Ge => ">=",
            LeftShift => "<<",
            RightShift => ">>",
            And => "&&",
            Or => "||",
            Increment => "++",
            Decrement => "--",
            PlusAssign => "+=",
            MinusAssign => "-=",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Lt => "<",
            Gt => ">",
            Not => "!",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            Semicolon => ";",
            Comma => ",",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Eof => "",
        }
    }
}

/// 1-based source position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
