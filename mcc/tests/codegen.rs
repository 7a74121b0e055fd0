use mcc::compile;

fn asm(code: &str) -> String {
    let result = compile(code);
    match result.asm {
        Some(asm) => asm,
        None => panic!("{:?}", result.error),
    }
}

/// Instruction and label lines without comments or blank lines
fn body(asm: &str) -> Vec<String> {
    asm.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim_end())
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn assert(code: &str, expect: &[&str]) {
    println!("{code}");
    let asm = asm(code);
    println!("{asm}");
    let lines = body(&asm);
    let mut rest = lines.iter();
    for want in expect {
        assert!(
            rest.any(|line| line == want),
            "missing `{}` (in order) in\n{}",
            want,
            asm
        );
    }
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
    data_section,
    "int x; char c; int arr[5]; char buf[3]; int main() { return 0; }",
    [
        ".data",
        "x: .word 0",
        "c: .byte 0",
        "arr: .space 20",
        "buf: .space 3",
        "_newline: .asciiz \"\\n\"",
        "_space: .asciiz \" \"",
        ".text",
        ".globl main",
        "main:",
    ]
);

case!(
    precedence,
    "int x; int main() { x = 1 + 2 * 3; return 0; }",
    [
        "    li    $t0, 1",
        "    li    $t1, 2",
        "    li    $t2, 3",
        "    mul   $t3, $t1, $t2",
        "    add   $t4, $t0, $t3",
        "    sw    $t4, x",
    ]
);

case!(
    main_first,
    "int helper() { return 1; } int main() { return helper(); }",
    [
        "main:",
        "    jal   helper",
        "    li    $v0, 10",
        "    syscall",
        "helper:",
        "    addi  $sp, $sp, -4",
        "    sw    $ra, 0($sp)",
        "    lw    $ra, 0($sp)",
        "    addi  $sp, $sp, 4",
        "    jr    $ra",
    ]
);

case!(
    parameters_stored,
    "int f(int a, char b) { return a; } int main() { return f(1, 'x'); }",
    [
        "    li    $t1, 120",
        "    move  $a0, $t0",
        "    move  $a1, $t1",
        "    jal   f",
        "f:",
        "    sw    $a0, a",
        "    sb    $a1, b",
    ]
);

case!(
    caller_saved_in_function,
    "int fact(int n) { if (n <= 1) { return 1; } return n * fact(n - 1); } int main() { int r; r = fact(5); return 0; }",
    [
        "fact:",
        "    sw    $t4, 0($sp)",
        "    jal   fact",
        "    lw    $t4, 0($sp)",
        "    move  $t8, $v0",
        "    mul   $t9, $t4, $t8",
    ]
);

case!(
    labels_in_order,
    "int i; int main() { if (i) { i = 1; } else { i = 2; } while (i) { i = 0; } for (i = 0; i < 2; i++) {} do { i = 1; } while (0); return 0; }",
    [
        "    beq   $t0, $zero, else_0",
        "    j     endif_1",
        "else_0:",
        "endif_1:",
        "while_start_2:",
        "    j     while_start_2",
        "while_end_3:",
        "for_start_4:",
        "    j     for_start_4",
        "for_end_5:",
        "do_start_6:",
        "do_end_7:",
    ]
);

case!(
    if_without_else,
    "int i; int main() { if (i) { i = 1; } return 0; }",
    ["    beq   $t0, $zero, endif_1", "endif_1:"]
);

case!(
    array_access,
    "int a[4]; int main() { a[2] = 7; a[1] = a[2]; return 0; }",
    [
        "    li    $t0, 7",
        "    li    $t2, 2",
        "    la    $t1, a",
        "    sll   $t3, $t2, 2",
        "    add   $t1, $t1, $t3",
        "    sw    $t0, 0($t1)",
        "    la    $t4, a",
        "    lw    $t4, 0($t4)",
    ]
);

case!(
    char_array_access,
    "char s[4]; int main() { s[1] = 'h'; return 0; }",
    ["    move  $t3, $t2", "    sb    $t0, 0($t1)"]
);

case!(
    compound_assignment,
    "int x; int main() { x += 2; x -= 1; return 0; }",
    [
        "    li    $t0, 2",
        "    lw    $t1, x",
        "    add   $t2, $t1, $t0",
        "    sw    $t2, x",
        "    sub   $t5, $t4, $t3",
    ]
);

case!(
    increment_statement,
    "int i; int main() { i++; return 0; }",
    ["    lw    $t0, i", "    addi  $t1, $t0, 1", "    sw    $t1, i"]
);

case!(
    printf_lowering,
    "int x; int main() { printf(\"%d %c\\n\", x, 'A'); return 0; }",
    [
        "    move  $a0, $t0",
        "    li    $v0, 1",
        "    syscall",
        "    li    $t1, 65",
        "    li    $v0, 11",
        "    la    $a0, _newline",
        "    li    $v0, 4",
    ]
);

case!(
    scanf_lowering,
    "int n; char c; int main() { scanf(\"%d%c\", &n, &c); return 0; }",
    [
        "    li    $v0, 5",
        "    syscall",
        "    sw    $v0, n",
        "    li    $v0, 12",
        "    sb    $v0, c",
    ]
);

case!(
    no_functions,
    "int x; x = 4; printf(\"%d\", x);",
    ["main:", "    sw    $t0, x", "    li    $v0, 10", "    syscall"]
);

case!(
    logical_and_normalizes,
    "int x; int main() { x = 2 && 4; return 0; }",
    [
        "    sltu  $t0, $zero, $t0",
        "    sltu  $t1, $zero, $t1",
        "    and   $t2, $t0, $t1",
    ]
);

#[test]
fn missing_main() {
    let asm = asm("int f() { return 1; }");
    assert!(asm.contains("main:\n    # Error: No main function found\n    li    $v0, 10\n    syscall"));
}

#[test]
fn header() {
    let asm = asm("int main() { return 0; }");
    assert!(asm.starts_with(
        "# ============================================\n# Generated MIPS Assembly Code\n"
    ));
    assert!(asm.contains("# Function: main\n"));
}

#[test]
fn deterministic() {
    let code = "int i; int main() { for (i = 0; i < 3; i++) { if (i == 1) { printf(\"%d\", i); } } return 0; }";
    assert_eq!(asm(code), asm(code));
}

#[test]
fn warnings_are_collected() {
    let result = compile("int x; int main() { x = \"s\"; printf(\"%f\", x); return 0; }");
    assert!(result.success);
    assert_eq!(result.warnings.len(), 2);
    let asm = result.asm.unwrap();
    assert!(asm.contains("    # Warning: String literal used as a value"));
    assert!(asm.contains("    # Warning: Unsupported printf conversion '%f'"));
}

#[test]
fn global_initializer_warns() {
    let result = compile("int g = 4; char c; int main() { printf(\"%d\", g); return 0; }");
    assert!(result.success);
    assert_eq!(result.warnings, vec!["Initializer of global 'g' is ignored".to_string()]);
    let asm = result.asm.unwrap();
    assert!(asm.contains("g: .word 0    # int"));
    assert!(asm.contains("    # Warning: Initializer of global 'g' is ignored"));
}

#[test]
fn top_level_return_exits() {
    let asm = asm("int x; x = 1; return x;");
    let lines = body(&asm);
    let ret = lines.iter().position(|line| line == "    move  $v0, $t1");
    assert!(ret.is_some(), "{}", asm);
    let after = &lines[ret.unwrap() + 1..];
    assert_eq!(after[0], "    li    $v0, 10");
    assert_eq!(after[1], "    syscall");
    assert!(!asm.contains("jr    $ra"));
}

#[test]
fn stats() {
    let result = compile("int x; int f(int a) { return a; } int main() { x = f(1); return 0; }");
    let stats = result.stats.unwrap();
    assert_eq!(stats.functions, 2);
    assert_eq!(stats.variables, 2);
    assert_eq!(stats.warnings, 0);
    assert_eq!(stats.code_lines, result.asm.unwrap().lines().count());
    assert!(stats.tokens > 20);
}
