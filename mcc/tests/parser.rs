use mcc::grammer::ast::{AssignOp, BinaryOp, DataType, Expr, Program, Stmt, UnaryOp};
use mcc::{Error, Lexer, Parser, Phase};

fn parse(code: &str) -> Result<Program, Error> {
    let tokens = Lexer::new(code).tokenize()?;
    Parser::new(tokens.into_iter()).parse()
}

fn assert(code: &str, expect: &str) {
    println!("{code}");
    let program = match parse(code) {
        Ok(program) => program,
        Err(e) => panic!("{}", e),
    };
    let stmt = program.statements.first().expect("one statement");
    let Stmt::Expr(expr) = stmt else {
        panic!("not an expression statement: {:?}", stmt)
    };
    let got = show(expr);
    println!("> {}", got);
    assert_eq!(got, expect);
}

/// Fully parenthesized rendering
fn show(expr: &Expr) -> String {
    match expr {
        Expr::Binary(op, l, r) => format!("({} {} {})", show(l), op, show(r)),
        Expr::Unary(op, e) => format!("({}{})", op, show(e)),
        Expr::Ident(name, None) => name.clone(),
        Expr::Ident(name, Some(idx)) => format!("{}[{}]", name, show(idx)),
        Expr::Number(n) => n.clone(),
        Expr::Char(c) => format!("'{}'", c),
        Expr::String(s) => format!("\"{}\"", s),
        Expr::Call(name, args) => {
            let args: Vec<String> = args.iter().map(show).collect();
            format!("{}({})", name, args.join(", "))
        }
    }
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert(concat!("f(", $code, ");"), concat!("f(", $expect, ")"));
        }
    };
}

case!(mul_before_add, "1 + 2 * 3", "(1 + (2 * 3))");
case!(left_assoc, "a - b - c", "((a - b) - c)");
case!(shift_below_add, "a << b + 1", "(a << (b + 1))");
case!(relational_above_equality, "a < b == c > d", "((a < b) == (c > d))");
case!(bitwise_order, "a | b ^ c & d", "(a | (b ^ (c & d)))");
case!(logical_order, "a || b && c | d", "(a || (b && (c | d)))");
case!(unary_binds_tightest, "-a * !b", "((-a) * (!b))");
case!(parens, "(1 + 2) * 3", "((1 + 2) * 3)");
case!(index_and_call, "arr[i + 1] + g(x, 2)", "(arr[(i + 1)] + g(x, 2))");
case!(literals, "'a' + \"s\"", "('a' + \"s\")");

#[test]
fn top_level_split() {
    let program = parse("int g; int arr[5]; int add(int a, char b) { return a + b; } void main() {}")
        .unwrap();
    assert_eq!(program.declarations.len(), 2);
    assert_eq!(program.declarations[1].array, Some(5));
    assert_eq!(program.functions.len(), 2);
    let add = &program.functions[0];
    assert_eq!(add.return_type, DataType::Int);
    assert_eq!(add.params.len(), 2);
    assert_eq!(add.params[1].ty, DataType::Char);
    assert!(matches!(add.body[0], Stmt::Return(Some(_))));
    assert_eq!(program.functions[1].return_type, DataType::Void);
}

#[test]
fn unsized_array() {
    let program = parse("int a[];").unwrap();
    assert_eq!(program.declarations[0].array, Some(0));
}

#[test]
fn statements() {
    let code = r#"
int main() {
    int i = 0;
    x[2] += 3;
    i++;
    --i;
    if (i) y = 1; else { y = 2; }
    for (i = 0; i < 3; i++) f(i);
    while (i) i -= 1;
    do { i = i + 1; } while (i < 5);
    printf("%d %c\n", i, 'a');
    scanf("%d", &i);
    { return; }
}
"#;
    let program = parse(code).unwrap();
    let body = &program.functions[0].body;
    assert_eq!(body.len(), 11);
    assert!(matches!(body[0], Stmt::Declaration(_)));
    assert!(matches!(body[1], Stmt::Assignment(_, Some(_), AssignOp::AddAssign, _)));
    assert!(matches!(body[2], Stmt::Expr(Expr::Unary(UnaryOp::Inc, _))));
    assert!(matches!(body[3], Stmt::Expr(Expr::Unary(UnaryOp::Dec, _))));
    let Stmt::If(_, then, Some(other)) = &body[4] else {
        panic!("{:?}", body[4])
    };
    assert_eq!((then.len(), other.len()), (1, 1));
    let Stmt::For(Some(init), Some(_), Some(update), for_body) = &body[5] else {
        panic!("{:?}", body[5])
    };
    assert!(matches!(**init, Stmt::Assignment(_, None, AssignOp::Assign, _)));
    assert!(matches!(**update, Stmt::Expr(Expr::Unary(UnaryOp::Inc, _))));
    assert!(matches!(for_body[0], Stmt::Expr(Expr::Call(_, _))));
    assert!(matches!(body[6], Stmt::While(_, _)));
    assert!(matches!(body[7], Stmt::DoWhile(_, Expr::Binary(BinaryOp::Lt, _, _))));
    let Stmt::Printf(format, args) = &body[8] else {
        panic!("{:?}", body[8])
    };
    assert_eq!(format, "%d %c\\n");
    assert_eq!(args.len(), 2);
    assert!(matches!(&body[9], Stmt::Scanf(_, names) if names == &["i"]));
    assert!(matches!(body[10], Stmt::Block(_)));
}

#[test]
fn for_with_declaration() {
    let program = parse("for (int k = 0; k < 2; ++k) {}").unwrap();
    let Stmt::For(Some(init), _, Some(update), body) = &program.statements[0] else {
        panic!()
    };
    assert!(matches!(**init, Stmt::Declaration(_)));
    assert!(matches!(**update, Stmt::Expr(Expr::Unary(UnaryOp::Inc, _))));
    assert!(body.is_empty());
}

#[test]
fn missing_semicolon() {
    let e = parse("int main() {\n    x = 1\n}").unwrap_err();
    assert_eq!(
        e.to_string(),
        "Unexpected token at line 3:1. Expected SEMICOLON, got RBRACE ('}')"
    );
    assert_eq!(e.phase(), Phase::Syntax);
    assert_eq!(e.pos().map(|p| p.line), Some(3));
}

#[test]
fn bad_parameter() {
    let e = parse("int f(void v) { return 0; }").unwrap_err();
    assert_eq!(e.to_string(), "Expected parameter type at line 1:7");
}

#[test]
fn bad_assignment() {
    let e = parse("x 5;").unwrap_err();
    assert_eq!(e.to_string(), "Expected assignment or expression at line 1:1");
}

#[test]
fn unexpected_statement() {
    let e = parse("int main() { ; }").unwrap_err();
    assert_eq!(
        e.to_string(),
        "Unexpected token at line 1:14. Expected statement, got SEMICOLON (';')"
    );
}

#[test]
fn printf_needs_format() {
    let e = parse("printf(x);").unwrap_err();
    assert!(e.to_string().contains("Expected STRING_LITERAL, got IDENTIFIER ('x')"));
}

#[test]
fn large_program() {
    let n = 20000;
    let body = "x = x + g(x); ".repeat(n);
    let code = format!("int x; int g(int a) {{ return a; }} int main() {{ {} return 0; }}", body);
    let program = match parse(&code) {
        Ok(program) => program,
        Err(e) => panic!("{}", e),
    };
    assert_eq!(program.functions.len(), 2);
    assert_eq!(program.functions[1].body.len(), n + 1);
}
