use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

/// Service number held in `$v0` when `syscall` executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Display)]
#[repr(i32)]
pub enum Syscall {
    PrintInt = 1,
    PrintString = 4,
    ReadInt = 5,
    Exit = 10,
    PrintChar = 11,
    ReadChar = 12,
}

#[test]
fn test() {
    assert_eq!(Syscall::try_from(10).ok(), Some(Syscall::Exit));
    assert_eq!(i32::from(Syscall::PrintChar), 11);
    assert!(Syscall::try_from(99).is_err());
}
