use mcc::grammer::token::TokenKind;
use mcc::{Lexer, Phase};

fn assert(code: &str, expect: &[&str]) {
    println!("{code}");
    let tokens = match Lexer::new(code).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => panic!("{}", e),
    };
    let kinds: Vec<String> = tokens
        .iter()
        .map(|t| match &t.kind {
            TokenKind::Identifier(s)
            | TokenKind::Number(s)
            | TokenKind::CharLiteral(s)
            | TokenKind::StringLiteral(s) => format!("{}({})", t.kind, s),
            kind => kind.to_string(),
        })
        .collect();
    println!("> {:?}", kinds);
    assert_eq!(kinds, expect);
}

macro_rules! case {
    ($name:ident, $code:expr, [$($expect:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert($code, &[$($expect),*]);
        }
    };
}

case!(
    declaration,
    "int x = 5;",
    ["INT", "IDENTIFIER(x)", "ASSIGN", "NUMBER(5)", "SEMICOLON", "EOF"]
);

case!(
    greedy_operators,
    "a<=b<<c&&d||e++ -=",
    [
        "IDENTIFIER(a)",
        "LE",
        "IDENTIFIER(b)",
        "LEFT_SHIFT",
        "IDENTIFIER(c)",
        "AND",
        "IDENTIFIER(d)",
        "OR",
        "IDENTIFIER(e)",
        "INCREMENT",
        "MINUS_ASSIGN",
        "EOF",
    ]
);

case!(
    comments,
    "// line\nint /* block */ y; /* open",
    ["INT", "IDENTIFIER(y)", "SEMICOLON", "EOF"]
);

case!(
    hex_and_keywords,
    "while (0x1F) return_value;",
    [
        "WHILE",
        "LPAREN",
        "NUMBER(0x1F)",
        "RPAREN",
        "IDENTIFIER(return_value)",
        "SEMICOLON",
        "EOF",
    ]
);

case!(
    literals_keep_escapes,
    r#"'\n' 'a' "x=%d\n""#,
    [
        "CHAR_LITERAL(\\n)",
        "CHAR_LITERAL(a)",
        "STRING_LITERAL(x=%d\\n)",
        "EOF",
    ]
);

#[test]
fn positions() {
    let tokens = Lexer::new("int a;\n  a = 1;").tokenize().unwrap();
    let a = &tokens[3];
    assert_eq!(a.kind, TokenKind::Identifier("a".into()));
    assert_eq!((a.pos.line, a.pos.col), (2, 3));
}

#[test]
fn unexpected_character() {
    let e = Lexer::new("int a;\nint $b;").tokenize().unwrap_err();
    assert_eq!(e.to_string(), "Unexpected character '$' at line 2:5");
    assert_eq!(e.phase(), Phase::Lexical);
}

#[test]
fn unterminated_literals() {
    let e = Lexer::new("char c = 'ab';").tokenize().unwrap_err();
    assert_eq!(e.to_string(), "Unterminated character literal at line 1:10");
    let e = Lexer::new("printf(\"oops);").tokenize().unwrap_err();
    assert_eq!(e.to_string(), "Unterminated string literal at line 1:8");
}
