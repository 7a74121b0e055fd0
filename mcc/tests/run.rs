use mcc::compile;
use mcemu::{execute, Config, Error};

fn run(code: &str) -> Result<String, Error> {
    let result = compile(code);
    let asm = match result.asm {
        Some(asm) => asm,
        None => panic!("{:?}", result.error),
    };
    match execute(&asm, &Config::default()) {
        Ok(exec) => {
            println!("> {:?} in {} steps", exec.output, exec.instructions_executed);
            Ok(exec.output)
        }
        Err(failure) => Err(failure.error),
    }
}

fn assert(code: &str, expect: &str) {
    println!("{code}");
    assert_eq!(run(code), Ok(expect.to_string()));
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert($code, $expect);
        }
    };
}

/// `r = <expr>` over a = 17, b = 5
macro_rules! op {
    ($name:ident, $expr:expr, $expect:expr) => {
        #[test]
        fn $name() {
            let code = format!(
                "int a; int b; int r;
                 int main() {{ a = 17; b = 5; r = {}; printf(\"%d\", r); return 0; }}",
                $expr
            );
            assert(&code, $expect);
        }
    };
}

case!(
    factorial_loop,
    "int main() {
        int i;
        int f;
        f = 1;
        for (i = 1; i <= 5; i++) {
            f = f * i;
        }
        printf(\"%d\", f);
        return 0;
    }",
    "120"
);

case!(
    array_element,
    "int arr[5];
    int main() {
        arr[2] = 9;
        printf(\"%d\", arr[2]);
        return 0;
    }",
    "9"
);

case!(
    factorial_top_level,
    "int n; int f; int i; n=5; f=1; for(i=1;i<=n;i=i+1){f=f*i;} printf(\"%d\",f);",
    "120"
);

case!(
    array_top_level,
    "int arr[5]; arr[2]=9; printf(\"%d\",arr[2]);",
    "9"
);

case!(
    top_level_return_halts,
    "int x; x = 3; printf(\"%d\", x); return x; printf(\"%d\", 4);",
    "3"
);

case!(
    empty_array_shares_next_address,
    "int z[]; int b;
    int main() { b = 5; printf(\"%d\", z[0]); return 0; }",
    "5"
);

case!(
    recursion,
    "int fact(int n) {
        if (n <= 1) { return 1; }
        return n * fact(n - 1);
    }
    int main() {
        int r;
        r = fact(5);
        printf(\"%d\", r);
        return 0;
    }",
    "120"
);

case!(
    mutual_recursion,
    "int main() {
        printf(\"%d\", even(4));
        return 0;
    }
    int even(int n) {
        if (n == 0) { return 1; }
        return odd(n - 1);
    }
    int odd(int n) {
        if (n == 0) { return 0; }
        return even(n - 1);
    }",
    "1"
);

case!(
    two_arguments,
    "int add(int x, int y) { return x + y; }
    int main() { printf(\"%d\", add(2, 3)); return 0; }",
    "5"
);

case!(
    countdown,
    "int n;
    int main() {
        n = 3;
        while (n > 0) {
            printf(\"%d\", n);
            n--;
        }
        return 0;
    }",
    "321"
);

case!(
    do_while_runs_once,
    "int main() {
        int k;
        k = 0;
        do { k += 4; } while (k > 100);
        printf(\"%d\", k);
        return 0;
    }",
    "4"
);

case!(
    if_else,
    "int main() {
        int x;
        x = 3;
        if (x > 5) { printf(\"%d\", 1); } else { printf(\"%d\", 2); }
        return 0;
    }",
    "2"
);

case!(
    char_output,
    "char c;
    int main() { c = 'A'; printf(\"%c\", c); return 0; }",
    "A"
);

case!(
    newline_after_value,
    "int main() { printf(\"%d\\n\", 5); return 0; }",
    "5\n"
);

case!(
    scanf_reads_zero,
    "int v;
    int main() { v = 7; scanf(\"%d\", &v); printf(\"%d\", v); return 0; }",
    "0"
);

case!(
    legacy_statements,
    "int x;
    x = 6;
    x -= 2;
    printf(\"%d\", x);",
    "4"
);

op!(add, "a + b", "22");
op!(sub, "a - b", "12");
op!(mul, "a * b", "85");
op!(div, "a / b", "3");
op!(rem, "a % b", "2");
op!(lt, "a < b", "0");
op!(gt, "a > b", "1");
op!(le, "a <= b", "0");
op!(ge, "a >= b", "1");
op!(eq, "a == b", "0");
op!(ne, "a != b", "1");
op!(bit_and, "a & b", "1");
op!(bit_or, "a | b", "21");
op!(bit_xor, "a ^ b", "20");
op!(shl, "a << 2", "68");
op!(shr, "a >> 2", "4");
op!(logic_and, "(a - 15) && (b - 1)", "1");
op!(logic_and_false, "a && (b - 5)", "0");
op!(logic_or, "a || b", "1");
op!(logic_or_false, "(a - 17) || (b - 5)", "0");
op!(neg, "-a", "-17");
op!(not, "!a", "0");

#[test]
fn runaway_loop() {
    let code = "int main() { while (1) { } return 0; }";
    assert_eq!(run(code), Err(Error::LimitExceeded(10000)));
}
