use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OpKind {
    ADD,
    ADDI,
    SUB,
    MUL,
    DIV,
    MFLO,
    MFHI,
    AND,
    OR,
    XOR,
    XORI,
    SLT,
    SLTU,
    SLTIU,
    SLL,
    SLLV,
    SRL,
    SRLV,
    LW,
    LB,
    SW,
    SB,
    LA,
    LI,
    MOVE,
    BEQ,
    BNE,
    J,
    JAL,
    JR,
    SYSCALL,
}

impl OpKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown operation: {s}")),
        }
    }
}

/// Operand shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    Reg,   // $t0
    Imm,   // -4, 0x10
    Label, // loop_0
    Mem,   // 0($sp) | label
}

impl OpKind {
    pub fn arg_field(&self) -> &'static [Arg] {
        use Arg::*;
        use OpKind::*;
        match self {
            ADD | SUB | MUL | AND | OR | XOR | SLT | SLTU | SLLV | SRLV => &[Reg, Reg, Reg],
            ADDI | XORI | SLTIU | SLL | SRL => &[Reg, Reg, Imm],
            DIV | MOVE => &[Reg, Reg],
            MFLO | MFHI | JR => &[Reg],
            LW | LB | SW | SB => &[Reg, Mem],
            LA => &[Reg, Label],
            LI => &[Reg, Imm],
            BEQ | BNE => &[Reg, Reg, Label],
            J | JAL => &[Label],
            SYSCALL => &[],
        }
    }
}

#[test]
fn test() {
    assert_eq!(OpKind::parse("sltiu"), Ok(OpKind::SLTIU));
    assert_eq!(OpKind::parse("syscall"), Ok(OpKind::SYSCALL));
    assert_eq!(OpKind::MOVE.to_string(), "move");
    assert!(OpKind::parse("nop").is_err());
    assert_eq!(OpKind::BEQ.arg_field().len(), 3);
}
