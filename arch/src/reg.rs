use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Reg {
    #[default]
    ZERO,
    AT,
    V0,
    V1,
    A0,
    A1,
    A2,
    A3,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    T8,
    T9,
    K0,
    K1,
    GP,
    SP,
    FP,
    RA,
}

impl Reg {
    /// Argument-passing registers, in parameter order.
    pub const ARGS: [Reg; 4] = [Reg::A0, Reg::A1, Reg::A2, Reg::A3];

    /// Scratch registers, in allocation order.
    pub const TEMPS: [Reg; 10] = [
        Reg::T0,
        Reg::T1,
        Reg::T2,
        Reg::T3,
        Reg::T4,
        Reg::T5,
        Reg::T6,
        Reg::T7,
        Reg::T8,
        Reg::T9,
    ];

    /// Parse `$name` (e.g. `$t0`, `$zero`).
    pub fn parse(s: &str) -> Result<Self, String> {
        s.strip_prefix('$')
            .and_then(|name| name.to_ascii_lowercase().parse::<Self>().ok())
            .ok_or_else(|| format!("Unknown register: {s}"))
    }

    /// Assembly spelling with the `$` sigil.
    pub fn name(&self) -> String {
        format!("${self}")
    }

    pub fn index(self) -> usize {
        u8::from(self) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parse() {
        assert_eq!(Reg::parse("$t0"), Ok(Reg::T0));
        assert_eq!(Reg::parse("$zero"), Ok(Reg::ZERO));
        assert_eq!(Reg::parse("$RA"), Ok(Reg::RA));
        assert!(Reg::parse("t0").is_err());
        assert!(Reg::parse("$hoge").is_err());
    }

    #[test]
    fn numbering() {
        assert_eq!(Reg::ZERO.index(), 0);
        assert_eq!(Reg::V0.index(), 2);
        assert_eq!(Reg::T0.index(), 8);
        assert_eq!(Reg::T8.index(), 24);
        assert_eq!(Reg::SP.index(), 29);
        assert_eq!(Reg::RA.index(), 31);
        assert_eq!(Reg::iter().count(), 32);
        assert_eq!(Reg::from(13u8), Reg::T5);
    }

    #[test]
    fn name() {
        assert_eq!(Reg::S3.name(), "$s3");
        assert_eq!(Reg::ZERO.to_string(), "zero");
    }
}
