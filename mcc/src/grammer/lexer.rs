use super::token::{Pos, Token, TokenKind};
use crate::error::Error;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            iter: code.chars().peekable(),
            line: 1,
            col: 1,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, cond: F) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.peek_nth(0) {
            if !cond(ch) {
                break;
            }
            self.consume();
            lexeme.push(ch);
        }
        lexeme
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            col: self.col,
        }
    }
}

// ----------------------------------------------------------------------------
// Tokenizer
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        while let Some(ch0) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = self.pos();
            let ch1 = self.peek_nth(1);

            // 1. Comments
            if ch0 == '/' && ch1 == Some('/') {
                self.consume_while(|c| c != '\n');
                self.consume(); // consume '\n'
                continue;
            }
            if ch0 == '/' && ch1 == Some('*') {
                self.skip_block_comment();
                continue;
            }

            // 2. Identifier or keyword
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                let lexeme = self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let kind = keyword(&lexeme).unwrap_or(TokenKind::Identifier(lexeme));
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 3. Number literal
            if ch0.is_ascii_digit() {
                tokens.push(Token::new(self.parse_number(), pos));
                continue;
            }

            // 4. Char literal
            if ch0 == '\'' {
                tokens.push(Token::new(self.parse_char(pos)?, pos));
                continue;
            }

            // 5. String literal
            if ch0 == '"' {
                tokens.push(Token::new(self.parse_text(pos)?, pos));
                continue;
            }

            // 6. Double character token
            if let Some(kind) = ch1.and_then(|ch1| double_char_token(ch0, ch1)) {
                self.consume();
                self.consume();
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 7. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, pos));
                continue;
            }

            return Err(Error::UnexpectedChar(ch0, pos));
        }
        tokens.push(Token::new(TokenKind::Eof, self.pos()));
        Ok(tokens)
    }

    /// Runs to the end of input when the comment is not closed
    fn skip_block_comment(&mut self) {
        self.consume(); // consume '/'
        self.consume(); // consume '*'
        while let Some(ch) = self.consume() {
            if ch == '*' && self.peek_nth(0) == Some('/') {
                self.consume();
                break;
            }
        }
    }

    fn parse_number(&mut self) -> TokenKind {
        if self.peek_nth(0) == Some('0') && self.peek_nth(1) == Some('x') {
            self.consume();
            self.consume();
            let digits = self.consume_while(|c| c.is_ascii_hexdigit());
            return TokenKind::Number(format!("0x{}", digits));
        }
        TokenKind::Number(self.consume_while(|c| c.is_ascii_digit()))
    }

    // Char: 'a' or '\n' (escape kept as written)
    fn parse_char(&mut self, pos: Pos) -> Result<TokenKind, Error> {
        self.consume(); // consume opening '
        let mut lexeme = String::new();
        match self.consume() {
            Some('\\') => {
                lexeme.push('\\');
                lexeme.extend(self.consume());
            }
            Some(ch) => lexeme.push(ch),
            None => return Err(Error::UnterminatedChar(pos)),
        }
        match self.consume() {
            Some('\'') => Ok(TokenKind::CharLiteral(lexeme)),
            _ => Err(Error::UnterminatedChar(pos)),
        }
    }

    // Text: "hoge\nfuga" (escapes kept as written)
    fn parse_text(&mut self, pos: Pos) -> Result<TokenKind, Error> {
        self.consume(); // consume opening "
        let mut lexeme = String::new();
        loop {
            match self.consume() {
                Some('"') => return Ok(TokenKind::StringLiteral(lexeme)),
                Some('\\') => {
                    lexeme.push('\\');
                    lexeme.extend(self.consume());
                }
                Some(ch) => lexeme.push(ch),
                None => return Err(Error::UnterminatedString(pos)),
            }
        }
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::Eq),
        ('!', '=') => Some(TokenKind::Ne),
        ('<', '=') => Some(TokenKind::Le),
        ('>', '=') => Some(TokenKind::Ge),
        ('<', '<') => Some(TokenKind::LeftShift),
        ('>', '>') => Some(TokenKind::RightShift),
        ('&', '&') => Some(TokenKind::And),
        ('|', '|') => Some(TokenKind::Or),
        ('+', '+') => Some(TokenKind::Increment),
        ('-', '-') => Some(TokenKind::Decrement),
        ('+', '=') => Some(TokenKind::PlusAssign),
        ('-', '=') => Some(TokenKind::MinusAssign),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Assign),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Multiply),
        '/' => Some(TokenKind::Divide),
        '%' => Some(TokenKind::Modulo),
        '<' => Some(TokenKind::Lt),
        '>' => Some(TokenKind::Gt),
        '!' => Some(TokenKind::Not),
        '&' => Some(TokenKind::BitAnd),
        '|' => Some(TokenKind::BitOr),
        '^' => Some(TokenKind::BitXor),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        _ => None,
    }
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "int" => Some(TokenKind::Int),
        "char" => Some(TokenKind::Char),
        "void" => Some(TokenKind::Void),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "for" => Some(TokenKind::For),
        "while" => Some(TokenKind::While),
        "do" => Some(TokenKind::Do),
        "return" => Some(TokenKind::Return),
        "printf" => Some(TokenKind::Printf),
        "scanf" => Some(TokenKind::Scanf),
        _ => None,
    }
}
