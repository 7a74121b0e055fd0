use crate::{op::OpKind, reg::Reg};
use color_print::cformat;
use serde::Serialize;
use std::fmt;

/// Memory operand of a load or store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Addr {
    Offset(i32, Reg), // offset($reg)
    Label(String),    // data label
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addr::Offset(offset, base) => write!(f, "{}({})", offset, base.name()),
            Addr::Label(label) => write!(f, "{label}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Inst {
    ADD(Reg, Reg, Reg),
    ADDI(Reg, Reg, i32),
    SUB(Reg, Reg, Reg),
    MUL(Reg, Reg, Reg),
    DIV(Reg, Reg),
    MFLO(Reg),
    MFHI(Reg),

    AND(Reg, Reg, Reg),
    OR(Reg, Reg, Reg),
    XOR(Reg, Reg, Reg),
    XORI(Reg, Reg, i32),

    SLT(Reg, Reg, Reg),
    SLTU(Reg, Reg, Reg),
    SLTIU(Reg, Reg, i32),

    SLL(Reg, Reg, i32),
    SLLV(Reg, Reg, Reg),
    SRL(Reg, Reg, i32),
    SRLV(Reg, Reg, Reg),

    LW(Reg, Addr),
    LB(Reg, Addr),
    SW(Reg, Addr),
    SB(Reg, Addr),
    LA(Reg, String),
    LI(Reg, i32),
    MOVE(Reg, Reg),

    BEQ(Reg, Reg, String),
    BNE(Reg, Reg, String),
    J(String),
    JAL(String),
    JR(Reg),
    SYSCALL,
}

impl Inst {
    pub fn kind(&self) -> OpKind {
        match self {
            Inst::ADD(..) => OpKind::ADD,
            Inst::ADDI(..) => OpKind::ADDI,
            Inst::SUB(..) => OpKind::SUB,
            Inst::MUL(..) => OpKind::MUL,
            Inst::DIV(..) => OpKind::DIV,
            Inst::MFLO(..) => OpKind::MFLO,
            Inst::MFHI(..) => OpKind::MFHI,
            Inst::AND(..) => OpKind::AND,
            Inst::OR(..) => OpKind::OR,
            Inst::XOR(..) => OpKind::XOR,
            Inst::XORI(..) => OpKind::XORI,
            Inst::SLT(..) => OpKind::SLT,
            Inst::SLTU(..) => OpKind::SLTU,
            Inst::SLTIU(..) => OpKind::SLTIU,
            Inst::SLL(..) => OpKind::SLL,
            Inst::SLLV(..) => OpKind::SLLV,
            Inst::SRL(..) => OpKind::SRL,
            Inst::SRLV(..) => OpKind::SRLV,
            Inst::LW(..) => OpKind::LW,
            Inst::LB(..) => OpKind::LB,
            Inst::SW(..) => OpKind::SW,
            Inst::SB(..) => OpKind::SB,
            Inst::LA(..) => OpKind::LA,
            Inst::LI(..) => OpKind::LI,
            Inst::MOVE(..) => OpKind::MOVE,
            Inst::BEQ(..) => OpKind::BEQ,
            Inst::BNE(..) => OpKind::BNE,
            Inst::J(..) => OpKind::J,
            Inst::JAL(..) => OpKind::JAL,
            Inst::JR(..) => OpKind::JR,
            Inst::SYSCALL => OpKind::SYSCALL,
        }
    }

    /// Operands as they are written in assembly text.
    pub fn operands(&self) -> Vec<String> {
        macro_rules! ops {
            ($($x:expr),*) => { vec![$($x.to_string()),*] };
        }
        match self {
            Inst::ADD(rd, rs, rt)
            | Inst::SUB(rd, rs, rt)
            | Inst::MUL(rd, rs, rt)
            | Inst::AND(rd, rs, rt)
            | Inst::OR(rd, rs, rt)
            | Inst::XOR(rd, rs, rt)
            | Inst::SLT(rd, rs, rt)
            | Inst::SLTU(rd, rs, rt)
            | Inst::SLLV(rd, rs, rt)
            | Inst::SRLV(rd, rs, rt) => ops!(rd.name(), rs.name(), rt.name()),
            Inst::ADDI(rd, rs, imm)
            | Inst::XORI(rd, rs, imm)
            | Inst::SLTIU(rd, rs, imm)
            | Inst::SLL(rd, rs, imm)
            | Inst::SRL(rd, rs, imm) => ops!(rd.name(), rs.name(), imm),
            Inst::DIV(rs, rt) | Inst::MOVE(rs, rt) => ops!(rs.name(), rt.name()),
            Inst::MFLO(rd) | Inst::MFHI(rd) | Inst::JR(rd) => ops!(rd.name()),
            Inst::LW(rt, addr) | Inst::LB(rt, addr) | Inst::SW(rt, addr) | Inst::SB(rt, addr) => {
                ops!(rt.name(), addr)
            }
            Inst::LA(rd, label) => ops!(rd.name(), label),
            Inst::LI(rd, imm) => ops!(rd.name(), imm),
            Inst::BEQ(rs, rt, label) | Inst::BNE(rs, rt, label) => {
                ops!(rs.name(), rt.name(), label)
            }
            Inst::J(label) | Inst::JAL(label) => ops!(label),
            Inst::SYSCALL => vec![],
        }
    }

    pub fn cformat(&self) -> String {
        let operands = self.operands().join(", ");
        cformat!("<r>{:<6}</><b>{}</>", self.kind().to_string(), operands)
    }
}

// Mnemonic padded to six columns, operands separated by ", "
impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operands();
        if operands.is_empty() {
            write!(f, "{}", self.kind())
        } else {
            write!(f, "{:<6}{}", self.kind().to_string(), operands.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_inst {
        ($($name:ident: $inst:expr => $text:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!($inst.to_string(), $text);
                }
            )*
        }
    }

    test_inst! {
        test_add: Inst::ADD(Reg::T2, Reg::T0, Reg::T1) => "add   $t2, $t0, $t1",
        test_sltiu: Inst::SLTIU(Reg::T0, Reg::T0, 1) => "sltiu $t0, $t0, 1",
        test_addi_neg: Inst::ADDI(Reg::SP, Reg::SP, -4) => "addi  $sp, $sp, -4",
        test_sw_offset: Inst::SW(Reg::RA, Addr::Offset(0, Reg::SP)) => "sw    $ra, 0($sp)",
        test_lw_label: Inst::LW(Reg::T0, Addr::Label("x".into())) => "lw    $t0, x",
        test_la: Inst::LA(Reg::A0, "_newline".into()) => "la    $a0, _newline",
        test_beq: Inst::BEQ(Reg::T3, Reg::ZERO, "else_0".into()) => "beq   $t3, $zero, else_0",
        test_jal: Inst::JAL("fact".into()) => "jal   fact",
        test_syscall: Inst::SYSCALL => "syscall",
    }
}
