use mcc::grammer::ast::DataType;
use mcc::semantic::Analyzer;
use mcc::symbols::SymbolTable;
use mcc::{Error, Lexer, Parser};

fn analyze(code: &str) -> Result<(SymbolTable, Vec<String>), Error> {
    let tokens = Lexer::new(code).tokenize()?;
    let program = Parser::new(tokens.into_iter()).parse()?;
    let mut analyzer = Analyzer::new();
    analyzer.analyze(&program)?;
    Ok(analyzer.finish())
}

fn assert(code: &str, expect: Result<usize, &str>) {
    println!("{code}");
    let got = analyze(code)
        .map(|(_, warnings)| warnings.len())
        .map_err(|e| e.to_string());
    println!("> {:?}", got);
    assert_eq!(got, expect.map_err(str::to_string));
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert($code, $expect);
        }
    };
}

case!(
    undeclared_variable,
    "int main() { x = 1; return 0; }",
    Err("Undefined variable 'x'")
);
case!(
    undeclared_in_condition,
    "int main() { int a; if (a < b) { a = 1; } return 0; }",
    Err("Undefined variable 'b'")
);
case!(
    undeclared_in_index,
    "int arr[3]; int main() { arr[k] = 1; return 0; }",
    Err("Undefined variable 'k'")
);
case!(
    undeclared_scanf_target,
    "int main() { scanf(\"%d\", &n); return 0; }",
    Err("Undefined variable 'n'")
);
case!(
    undeclared_top_level,
    "printf(\"%d\", q);",
    Err("Undefined variable 'q'")
);
case!(
    forward_call,
    "int main() { return later(1); } int later(int v) { return v; }",
    Ok(0)
);
case!(
    mutual_recursion,
    "int even(int n) { if (n == 0) return 1; return odd(n - 1); } \
     int odd(int n) { if (n == 0) return 0; return even(n - 1); } \
     int main() { return even(4); }",
    Ok(0)
);
case!(
    mixed_scalar_types,
    "char c; int i; int main() { i = c + 1; c = i; return 0; }",
    Ok(0)
);

#[test]
fn undeclared_function_warns_once() {
    let (_, warnings) = analyze("int main() { int r; r = missing(2); return r; }").unwrap();
    assert_eq!(warnings, vec!["Undefined function 'missing'".to_string()]);
}

#[test]
fn flat_namespace() {
    let code = "int g; int f(int a) { int local; local = a; return local; } int main() { return f(g); }";
    let (table, _) = analyze(code).unwrap();
    let names: Vec<&str> = table.variables.keys().map(String::as_str).collect();
    assert_eq!(names, ["g", "a", "local"]);
    assert_eq!(table.stats().total_functions, 2);
    assert_eq!(table.lookup_function("f").map(|f| f.params.len()), Some(1));
}

#[test]
fn redefinition_keeps_first() {
    let code = "int x; int main() { char x; x = 1; return 0; }";
    let (table, _) = analyze(code).unwrap();
    assert_eq!(table.variables.len(), 1);
    assert_eq!(table.lookup("x").unwrap().ty, DataType::Int);
}

#[test]
fn later_function_locals_not_visible_earlier() {
    let code = "int a() { return t; } int b() { int t; return t; }";
    let e = analyze(code).unwrap_err();
    assert_eq!(e.to_string(), "Undefined variable 't'");
}
