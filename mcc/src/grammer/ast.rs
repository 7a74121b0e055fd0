use super::token::Pos;
use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Program {
    pub functions: Vec<Function>,       // { func-def }
    pub declarations: Vec<Declaration>, // { decl }
    pub statements: Vec<Stmt>,          // { stmt }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,  // "int"
    Char, // "char"
    Void, // "void"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub ty: DataType,
    pub name: String,
}

/// type ident "(" [ param { "," param } ] ")" block
#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub return_type: DataType,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub pos: Pos,
}

/// type ident [ "[" [ num ] "]" ] [ "=" expr ] ";"
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    pub ty: DataType,
    pub name: String,
    pub array: Option<usize>,
    pub init: Option<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    Declaration(Declaration),                                      // decl
    Assignment(String, Option<Expr>, AssignOp, Expr),              // ident [ "[" expr "]" ] assign-op expr ";"
    If(Expr, Vec<Stmt>, Option<Vec<Stmt>>),                        // "if" "(" expr ")" body [ "else" body ]
    For(Option<Box<Stmt>>, Option<Expr>, Option<Box<Stmt>>, Vec<Stmt>), // "for" "(" [ init ] ";" [ expr ] ";" [ update ] ")" body
    While(Expr, Vec<Stmt>),                                        // "while" "(" expr ")" body
    DoWhile(Vec<Stmt>, Expr),                                      // "do" body "while" "(" expr ")" ";"
    Printf(String, Vec<Expr>),                                     // "printf" "(" string { "," expr } ")" ";"
    Scanf(String, Vec<String>),                                    // "scanf" "(" string { "," "&" ident } ")" ";"
    Return(Option<Expr>),                                          // "return" [ expr ] ";"
    Expr(Expr),                                                    // expr ";"
    Block(Vec<Stmt>),                                              // "{" { stmt } "}"
}

#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    Binary(BinaryOp, Box<Expr>, Box<Expr>), // expr binop expr
    Unary(UnaryOp, Box<Expr>),              // unop expr
    Ident(String, Option<Box<Expr>>),       // ident [ "[" expr "]" ]
    Number(String),                         // num-lit
    Char(String),                           // char-lit
    String(String),                         // string-lit
    Call(String, Vec<Expr>),                // ident "(" [ expr { "," expr } ] ")"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum UnaryOp {
    #[strum(serialize = "!")]
    Not,
    #[strum(serialize = "-")]
    Neg,
    #[strum(serialize = "++")]
    Inc,
    #[strum(serialize = "--")]
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "&&")]
    LogicAnd,
    #[strum(serialize = "||")]
    LogicOr,
    #[strum(serialize = "&")]
    And,
    #[strum(serialize = "|")]
    Or,
    #[strum(serialize = "^")]
    Xor,
    #[strum(serialize = "<<")]
    Shl,
    #[strum(serialize = ">>")]
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum AssignOp {
    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = "+=")]
    AddAssign,
    #[strum(serialize = "-=")]
    SubAssign,
}

/// Value of a number literal as written (`42`, `0x2A`); out of range yields 0
pub fn literal_value(lit: &str) -> i64 {
    let parsed = match lit.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => lit.parse::<u64>(),
    };
    parsed.map(|v| v as i64).unwrap_or(0)
}

/// Code of a char literal body (`a`, `\n`)
pub fn char_value(lit: &str) -> i32 {
    let mut chars = lit.chars();
    match (chars.next(), chars.next()) {
        (Some('\\'), Some(esc)) => match esc {
            'n' => 10,
            't' => 9,
            'r' => 13,
            '0' => 0,
            '\\' => 92,
            '\'' => 39,
            '"' => 34,
            c => c as i32,
        },
        (Some(c), _) => c as i32,
        (None, _) => 0,
    }
}
