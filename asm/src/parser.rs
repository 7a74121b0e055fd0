use arch::{
    inst::{Addr, Inst},
    op::OpKind,
    reg::Reg,
};
use std::num::ParseIntError;

use crate::error::Error;

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Data,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Word(i32),
    Byte(i32),
    Space(usize),
    Asciiz(String),
}

impl Directive {
    /// Bytes reserved in the data segment
    pub fn size(&self) -> usize {
        match self {
            Directive::Word(_) => 4,
            Directive::Byte(_) => 1,
            Directive::Space(n) => *n,
            Directive::Asciiz(s) => s.len() + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Section(Section),
    Data(String, Directive),
    Label(String),
    Code(Inst),
}

impl Stmt {
    /// Classify one trimmed line. Blank lines, comment lines, `.globl` and
    /// anything outside a section yield `None`.
    pub fn parse(line: &str, section: Option<Section>) -> Result<Option<Stmt>, Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        match line {
            ".data" => return Ok(Some(Stmt::Section(Section::Data))),
            ".text" => return Ok(Some(Stmt::Section(Section::Text))),
            _ if line.starts_with(".globl") => return Ok(None),
            _ => {}
        }

        match section {
            Some(Section::Data) => match line.split_once(':') {
                Some((label, directive)) => {
                    let directive = Directive::parse(directive.trim())?;
                    Ok(Some(Stmt::Data(label.trim().to_string(), directive)))
                }
                None => Ok(None),
            },
            Some(Section::Text) => {
                let code = strip_comment(line);
                if code.is_empty() {
                    return Ok(None);
                }
                // main:
                if let Some(label) = code.strip_suffix(':') {
                    return Ok(Some(Stmt::Label(label.trim().to_string())));
                }
                Ok(Some(Stmt::Code(Code::parse(code)?)))
            }
            None => Ok(None),
        }
    }
}

pub(crate) fn strip_comment(line: &str) -> &str {
    match line.split_once('#') {
        Some((code, _)) => code.trim(),
        None => line.trim(),
    }
}

// ----------------------------------------------------------------------------
// Directive

impl Directive {
    fn parse(s: &str) -> Result<Directive, Error> {
        let (name, rest) = match s.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (s, ""),
        };
        let value = strip_comment(rest);
        let number = |default: i32| -> Result<i32, Error> {
            if value.is_empty() {
                return Ok(default);
            }
            parse_with_prefix(value)
                .map_err(|_| Error::ParseArgument(value.to_string(), "Imm".to_string()))
        };
        match name {
            ".word" => Ok(Directive::Word(number(0)?)),
            ".byte" => Ok(Directive::Byte(number(0)?)),
            ".space" => {
                let size = number(0)?;
                usize::try_from(size)
                    .map(Directive::Space)
                    .map_err(|_| Error::ParseArgument(value.to_string(), "size".to_string()))
            }
            ".asciiz" => {
                // Quotes delimit the text; a `#` inside them is not a comment
                let open = rest.find('"');
                let close = rest.rfind('"');
                match (open, close) {
                    (Some(open), Some(close)) if open < close => {
                        Ok(Directive::Asciiz(unescape(&rest[open + 1..close])))
                    }
                    _ => Err(Error::ParseArgument(rest.to_string(), "string".to_string())),
                }
            }
            _ => Err(Error::UnknownDirective(name.to_string())),
        }
    }
}

/// Resolve `\n` and `\t`; every other backslash sequence stays as written
fn unescape(s: &str) -> String {
    s.replace("\\n", "\n").replace("\\t", "\t")
}

// ----------------------------------------------------------------------------
// Operation

pub struct Code;

impl Code {
    pub fn parse(code: &str) -> Result<Inst, Error> {
        let (op, rest) = match code.split_once(char::is_whitespace) {
            Some((op, rest)) => (op, rest.trim()),
            None => (code, ""),
        };
        let kind = OpKind::parse(op).map_err(|_| Error::UnknownOperation(op.to_string()))?;

        let args: Vec<&str> = rest
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect();
        let expected = kind.arg_field().len();
        if args.len() != expected {
            return Err(Error::OperandCount(op.to_string(), expected, args.len()));
        }

        // Get argument by index and parse as Type
        // Example: arg!(0, Reg) -> Reg
        macro_rules! arg {
            ($index:expr, $Type:ident) => {{
                let arg = args[$index];
                $Type::parse(arg).map_err(|_| {
                    Error::ParseArgument(arg.to_string(), stringify!($Type).to_string())
                })?
            }};
        }

        use OpKind::*;
        let inst = match kind {
            ADD => Inst::ADD(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            ADDI => Inst::ADDI(arg!(0, Reg), arg!(1, Reg), arg!(2, Imm)),
            SUB => Inst::SUB(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            MUL => Inst::MUL(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            DIV => Inst::DIV(arg!(0, Reg), arg!(1, Reg)),
            MFLO => Inst::MFLO(arg!(0, Reg)),
            MFHI => Inst::MFHI(arg!(0, Reg)),
            AND => Inst::AND(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            OR => Inst::OR(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            XOR => Inst::XOR(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            XORI => Inst::XORI(arg!(0, Reg), arg!(1, Reg), arg!(2, Imm)),
            SLT => Inst::SLT(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            SLTU => Inst::SLTU(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            SLTIU => Inst::SLTIU(arg!(0, Reg), arg!(1, Reg), arg!(2, Imm)),
            SLL => Inst::SLL(arg!(0, Reg), arg!(1, Reg), arg!(2, Imm)),
            SLLV => Inst::SLLV(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            SRL => Inst::SRL(arg!(0, Reg), arg!(1, Reg), arg!(2, Imm)),
            SRLV => Inst::SRLV(arg!(0, Reg), arg!(1, Reg), arg!(2, Reg)),
            LW => Inst::LW(arg!(0, Reg), arg!(1, Mem)),
            LB => Inst::LB(arg!(0, Reg), arg!(1, Mem)),
            SW => Inst::SW(arg!(0, Reg), arg!(1, Mem)),
            SB => Inst::SB(arg!(0, Reg), arg!(1, Mem)),
            LA => Inst::LA(arg!(0, Reg), arg!(1, Label)),
            LI => Inst::LI(arg!(0, Reg), arg!(1, Imm)),
            MOVE => Inst::MOVE(arg!(0, Reg), arg!(1, Reg)),
            BEQ => Inst::BEQ(arg!(0, Reg), arg!(1, Reg), arg!(2, Label)),
            BNE => Inst::BNE(arg!(0, Reg), arg!(1, Reg), arg!(2, Label)),
            J => Inst::J(arg!(0, Label)),
            JAL => Inst::JAL(arg!(0, Label)),
            JR => Inst::JR(arg!(0, Reg)),
            SYSCALL => Inst::SYSCALL,
        };
        Ok(inst)
    }
}

// ----------------------------------------------------------------------------
// Operands

struct Imm;

impl Imm {
    fn parse(s: &str) -> Result<i32, ParseIntError> {
        parse_with_prefix(s)
    }
}

struct Label;

impl Label {
    fn parse(s: &str) -> Result<String, ()> {
        let mut chars = s.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '.' => {}
            _ => return Err(()),
        }
        if chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
            Ok(s.to_string())
        } else {
            Err(())
        }
    }
}

/// `offset($reg)` or a data label
struct Mem;

impl Mem {
    fn parse(s: &str) -> Result<Addr, ()> {
        if let Some(inner) = s.strip_suffix(')') {
            let (offset, base) = inner.split_once('(').ok_or(())?;
            let offset = parse_with_prefix(offset.trim()).map_err(|_| ())?;
            let base = Reg::parse(base.trim()).map_err(|_| ())?;
            return Ok(Addr::Offset(offset, base));
        }
        Label::parse(s).map(Addr::Label)
    }
}

/// Decimal or `0x`/`0b`/`0o` prefixed, optionally negative. Values are
/// truncated to 32 bits.
pub fn parse_with_prefix(s: &str) -> Result<i32, ParseIntError> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (radix, num) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        _ => (10, digits),
    };
    let value = u64::from_str_radix(num, radix)? as u32 as i32;
    Ok(if negative { value.wrapping_neg() } else { value })
}
