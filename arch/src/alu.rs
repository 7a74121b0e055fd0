use crate::inst::Inst;

/// Register-to-register and register-immediate operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ALU {
    ADD,
    SUB,
    MUL,
    AND,
    OR,
    XOR,
    SLT,
    SLTU,
    SLL,
    SRL,
}

macro_rules! boo {
    ($cond:expr) => {
        if $cond {
            1
        } else {
            0
        }
    };
}

/// Signed 32-bit semantics, wrapping on overflow. Shift amounts use the low five bits.
pub fn alu(op: ALU, a: i32, b: i32) -> i32 {
    use ALU::*;
    match op {
        ADD => a.wrapping_add(b),
        SUB => a.wrapping_sub(b),
        MUL => a.wrapping_mul(b),
        AND => a & b,
        OR => a | b,
        XOR => a ^ b,
        SLT => boo!(a < b),
        SLTU => boo!((a as u32) < (b as u32)),
        SLL => a.wrapping_shl(b as u32 & 31),
        SRL => ((a as u32) >> (b as u32 & 31)) as i32,
    }
}

/// Quotient (floored) and remainder (sign of dividend). `None` on a zero divisor.
pub fn div(a: i32, b: i32) -> Option<(i32, i32)> {
    if b == 0 {
        return None;
    }
    let rem = a.wrapping_rem(b);
    let quo = a.wrapping_div(b);
    let quo = if rem != 0 && ((rem < 0) != (b < 0)) {
        quo - 1
    } else {
        quo
    };
    Some((quo, rem))
}

impl Inst {
    /// ALU operation behind an arithmetic, logic or shift instruction.
    pub fn to_alu(&self) -> Option<ALU> {
        match self {
            Inst::ADD(..) | Inst::ADDI(..) => Some(ALU::ADD),
            Inst::SUB(..) => Some(ALU::SUB),
            Inst::MUL(..) => Some(ALU::MUL),
            Inst::AND(..) => Some(ALU::AND),
            Inst::OR(..) => Some(ALU::OR),
            Inst::XOR(..) | Inst::XORI(..) => Some(ALU::XOR),
            Inst::SLT(..) => Some(ALU::SLT),
            Inst::SLTU(..) | Inst::SLTIU(..) => Some(ALU::SLTU),
            Inst::SLL(..) | Inst::SLLV(..) => Some(ALU::SLL),
            Inst::SRL(..) | Inst::SRLV(..) => Some(ALU::SRL),
            _ => None,
        }
    }
}
